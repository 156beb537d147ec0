use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::error::Error;
use crate::media::{MediaHost, resolve_image};
use crate::server::AppState;
use crate::server::dto::{
    ContentListResponse, CreateContentRequest, ListContentsParams, UpdateContentRequest,
    UpdatedContentResponse,
};
use crate::server::response::{
    ApiError, ApiJson, MessageResponse, StoreOptionExt, StoreResultExt,
};
use crate::server::validation::{
    parse_category, parse_featured, parse_id, parse_language, parse_page,
};
use crate::types::{Content, ContentQuery, NewContent};

/// Swaps the stored image reference for its public URL.
fn present(media: &dyn MediaHost, mut content: Content) -> Content {
    content.image = media.build_url(&content.image);
    content
}

async fn upload_if_local(media: &dyn MediaHost, image: &str) -> Result<String, ApiError> {
    resolve_image(media, image).await.map_err(|e| {
        tracing::error!("Image upload failed: {e}");
        ApiError::internal("Could not upload the image")
    })
}

pub async fn publish_content(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateContentRequest>,
) -> impl IntoResponse {
    if req.title.trim().is_empty() || req.body.trim().is_empty() {
        return Err(ApiError::bad_request("Title and body are required"));
    }

    let image = upload_if_local(state.media.as_ref(), &req.image).await?;

    let content = state
        .store
        .create_content(&NewContent {
            language: req.language,
            kind: req.kind,
            image,
            title: req.title,
            body: req.body,
            tag: req.tag,
            featured: req.featured,
            created_at: Utc::now(),
        })
        .api_err("Could not publish the blog")?;

    tracing::info!("Published {} #{}", content.kind, content.id);

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(present(state.media.as_ref(), content)),
    ))
}

pub async fn update_content(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateContentRequest>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;

    let mut content = state
        .store
        .get_content(id)
        .api_err("Failed to update blog")?
        .or_not_found("Could not find blog with this ID")?;

    if let Some(language) = req.language {
        content.language = language;
    }
    if let Some(kind) = req.kind {
        content.kind = kind;
    }
    if let Some(title) = req.title {
        content.title = title;
    }
    if let Some(body) = req.body {
        content.body = body;
    }
    if let Some(tag) = req.tag {
        content.tag = tag;
    }
    if let Some(featured) = req.featured {
        content.featured = featured;
    }
    if let Some(image) = req.image {
        content.image = upload_if_local(state.media.as_ref(), &image).await?;
    }

    match state.store.update_content(&content) {
        Ok(()) => {}
        Err(Error::NotFound) => {
            return Err(ApiError::not_found("Could not find blog with this ID"));
        }
        Err(e) => {
            tracing::error!("Failed to update blog: {e}");
            return Err(ApiError::internal("Failed to update blog"));
        }
    }

    tracing::info!("Updated {} #{}", content.kind, content.id);

    Ok::<_, ApiError>(Json(UpdatedContentResponse {
        message: "Blog updated successfully".to_string(),
        content: present(state.media.as_ref(), content),
    }))
}

pub async fn delete_content(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;

    let deleted = state
        .store
        .delete_content(id)
        .api_err("Failed to delete blog")?;
    if !deleted {
        return Err(ApiError::not_found("Could not find blog with this ID"));
    }

    tracing::info!("Deleted content #{id}");

    Ok::<_, ApiError>(Json(MessageResponse::new("Blog deleted successfully")))
}

pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;

    let content = state
        .store
        .get_content(id)
        .api_err("Failed to fetch blog")?
        .or_not_found("Blog not found")?;

    Ok::<_, ApiError>(Json(present(state.media.as_ref(), content)))
}

pub async fn list_contents(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    Query(params): Query<ListContentsParams>,
) -> impl IntoResponse {
    let search = params
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let query = ContentQuery {
        page: parse_page(&page)?,
        language: parse_language(params.language.as_deref())?,
        kind: parse_category(params.category.as_deref())?,
        featured: parse_featured(params.featured.as_deref())?,
        search,
    };

    let contents = match state.store.get_contents(&query) {
        Ok(contents) => contents,
        Err(Error::NoContents) => return Err(ApiError::not_found("No blogs found")),
        Err(e) => {
            tracing::error!("Failed to fetch blogs: {e}");
            return Err(ApiError::internal("Failed to fetch blogs"));
        }
    };

    let message = if query.search.is_some() {
        "We found these blogs"
    } else {
        "All blogs fetched successfully"
    };

    let media = state.media.as_ref();
    Ok::<_, ApiError>(Json(ContentListResponse {
        message: message.to_string(),
        contents: contents.into_iter().map(|c| present(media, c)).collect(),
    }))
}
