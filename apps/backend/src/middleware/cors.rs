use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the excursion API. Origins come from `CORS_ALLOWED_ORIGINS`
/// (comma-separated); with nothing valid configured, only local frontend dev
/// servers are admitted. Methods and headers are pinned to what the routes
/// actually serve: GET/POST/PUT/DELETE with bearer auth and JSON bodies.
pub fn cors_middleware() -> Cors {
    let mut origins = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
    if origins.is_empty() {
        origins = vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

/// Split and sanitize the configured origin list. Entries that are empty,
/// literal "null", or not http(s) URLs are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn keeps_only_http_origins() {
        let origins = parse_origins(
            "http://localhost:3000, https://pack.example.com, ftp://nope, null, ,",
        );
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "https://pack.example.com"]
        );
    }

    #[test]
    fn empty_config_yields_nothing() {
        assert!(parse_origins("").is_empty());
    }
}
