use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Address of the visitor: the first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the TCP peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_value(headers, X_FORWARDED_FOR) {
        let first = forwarded.split(',').next().map(str::trim).unwrap_or("");
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    header_value(headers, X_REAL_IP).map(str::to_string)
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = from_headers(&parts.headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIp(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    async fn extract(request: Request<()>) -> String {
        let (mut parts, _) = request.into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        ip
    }

    #[tokio::test]
    async fn test_forwarded_for_wins() {
        let request = Request::builder()
            .header(X_FORWARDED_FOR, "203.0.113.7, 10.0.0.1")
            .header(X_REAL_IP, "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_real_ip_fallback() {
        let request = Request::builder()
            .header(X_REAL_IP, "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, "198.51.100.2");
    }

    #[tokio::test]
    async fn test_peer_address_fallback() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        request
            .headers_mut()
            .insert(X_FORWARDED_FOR, HeaderValue::from_static("  "));
        assert_eq!(extract(request).await, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_unknown_without_any_source() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, "unknown");
    }
}
