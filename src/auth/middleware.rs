use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::{dto::AUTH_TOKEN_HEADER, error::AuthError, jwt::JwtKeys};

/// Identity resolved by `require_auth`, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub token: String,
}

/// Rejects the request with 401 unless `x-auth-token` holds a valid token.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Unauthenticated("No auth token, access denied"))?
        .to_string();

    let claims = keys.verify(&token).map_err(|e| {
        warn!(error = %e, "token verification failed");
        AuthError::Unauthenticated("Token verification failed, authorization denied")
    })?;

    request.extensions_mut().insert(AuthContext {
        user_id: claims.id,
        token,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn app(keys: JwtKeys) -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(ctx): Extension<AuthContext>| async move { ctx.user_id.to_string() }),
            )
            .layer(axum::middleware::from_fn_with_state(keys, require_auth))
    }

    async fn call(keys: JwtKeys, token: Option<&str>) -> (StatusCode, String) {
        let mut req = HttpRequest::builder().uri("/");
        if let Some(t) = token {
            req = req.header(AUTH_TOKEN_HEADER, t);
        }
        let response = app(keys).oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (status, body) = call(JwtKeys::from_secret(b"k"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("No auth token"));
    }

    #[tokio::test]
    async fn invalid_token_is_rejected() {
        let (status, body) = call(JwtKeys::from_secret(b"k"), Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token verification failed"));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_context() {
        let keys = JwtKeys::from_secret(b"k");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).unwrap();
        let (status, body) = call(keys, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }
}
