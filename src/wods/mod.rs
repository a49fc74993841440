use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod form;
pub mod generator;
pub mod handlers;
#[cfg(test)]
pub mod mock_repo;
pub mod prompt;
pub mod render;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
