use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            CurrentUserResponse, LoginRequest, LoginResponse, SignupRequest, AUTH_TOKEN_HEADER,
        },
        error::AuthError,
        jwt::JwtKeys,
        middleware::{require_auth, AuthContext},
        password::{spawn_hash_password, spawn_verify_password},
        repo_types::{NewUser, User},
    },
    state::AppState,
};

pub fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/tokenIsValid", post(token_is_valid))
        .route(
            "/",
            get(current_user).route_layer(from_fn_with_state(JwtKeys::from_ref(state), require_auth)),
        )
}

/// A body without a JSON content type counts as missing every field.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    missing_fields: &str,
) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => AuthError::Validation(missing_fields.into()),
        other => AuthError::Validation(other.body_text()),
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AuthError> {
    let payload = json_body(payload, SignupRequest::MISSING_FIELDS)?
        .validate()
        .map_err(|e| {
            warn!(error = %e, "signup rejected");
            e
        })?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AuthError::Conflict);
    }

    let password_hash = spawn_hash_password(payload.password).await?;

    let user = state
        .users
        .create(&NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let payload = json_body(payload, LoginRequest::MISSING_FIELDS)?.validate()?;

    let user = match state.users.find_by_email(&payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AuthError::NotFound);
        }
    };

    if !spawn_verify_password(payload.password, user.password.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::IncorrectPassword);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse { token, user }))
}

/// Answers only `true`/`false`; the reason a token is rejected is not exposed.
#[instrument(skip(state, headers))]
pub async fn token_is_valid(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<bool>) {
    let Some(token) = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
    else {
        return (StatusCode::OK, Json(false));
    };

    let claims = match JwtKeys::from_ref(&state).verify(token) {
        Ok(c) => c,
        Err(_) => return (StatusCode::OK, Json(false)),
    };

    match state.users.find_by_id(claims.id).await {
        Ok(Some(_)) => (StatusCode::OK, Json(true)),
        Ok(None) => (StatusCode::OK, Json(false)),
        Err(e) => {
            error!(error = %e, "token validation lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(false))
        }
    }
}

#[instrument(skip(state, ctx))]
pub async fn current_user(
    State(state): State<AppState>,
    ctx: Option<Extension<AuthContext>>,
) -> Result<Json<CurrentUserResponse>, AuthError> {
    let Some(Extension(AuthContext { user_id, token })) = ctx else {
        return Err(AuthError::Unauthenticated("User not found!"));
    };

    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token refers to a missing user");
        AuthError::Unauthenticated("User not found!")
    })?;

    Ok(Json(CurrentUserResponse { user, token }))
}
