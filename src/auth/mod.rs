use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
mod error;
pub mod handlers;
pub mod jwt;
mod middleware;
mod password;
pub mod repo;
mod repo_types;

/// Routes mounted under `/auth`.
pub fn router(state: &AppState) -> Router<AppState> {
    handlers::auth_routes(state)
}
