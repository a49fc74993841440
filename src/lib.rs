pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod state;
pub mod wods;

pub use state::AppState;
