/// Extracts the raw token from an `Authorization` header value.
///
/// The header carries the token as-is; a `Bearer ` prefix is tolerated.
/// Returns `None` when the header is absent or blank.
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<String> {
    let header = auth_header?.trim();
    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => header,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_token() {
        assert_eq!(
            extract_token_from_header(Some("abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(
            extract_token_from_header(Some("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_missing_or_blank() {
        assert_eq!(extract_token_from_header(None), None);
        assert_eq!(extract_token_from_header(Some("   ")), None);
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("  Bearer   ")), None);
    }

    #[test]
    fn test_token_starting_with_bearer_kept() {
        assert_eq!(
            extract_token_from_header(Some("BearerLike.token")),
            Some("BearerLike.token".to_string())
        );
    }
}
