use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Browser hardening headers added to every response
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    /// Send HSTS; only meaningful behind HTTPS
    pub hsts: bool,
}

impl SecurityHeaders {
    pub fn new(is_production: bool) -> Self {
        Self {
            hsts: is_production,
        }
    }
}

// Media is served by the hosting CDN, so images and videos may come from any https origin.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self'; \
    img-src 'self' data: https:; media-src 'self' https:; connect-src 'self'; \
    form-action 'self'; frame-ancestors 'none'";

/// Use with `axum::middleware::from_fn_with_state(SecurityHeaders::new(..), ..)`.
pub async fn security_headers_middleware(
    State(policy): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if policy.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    async fn headers_for(policy: SecurityHeaders) -> axum::http::HeaderMap {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn_with_state(policy, security_headers_middleware));
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_headers_present() {
        let headers = headers_for(SecurityHeaders::new(false)).await;
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert!(headers
            .get("Content-Security-Policy")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("media-src 'self' https:"));
        assert!(headers.get("Strict-Transport-Security").is_none());
    }

    #[tokio::test]
    async fn test_hsts_in_production() {
        let headers = headers_for(SecurityHeaders::new(true)).await;
        assert!(headers.get("Strict-Transport-Security").is_some());
    }
}
