#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractors;
pub mod http;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports for public API
pub use adapters::ownership_memory::MemoryOwnershipStore;
pub use adapters::ownership_sea::SeaOwnershipStore;
pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use config::db::{db_url, DbOwner, DbProfile};
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use infra::db::connect_db;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use repos::ownership::{Excursion, OwnershipStore, User, UserView};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Prelude for test convenience
#[allow(clippy::wildcard_imports)]
pub mod prelude {
    pub use super::auth::jwt::*;
    pub use super::config::db::*;
    pub use super::error::*;
    pub use super::extractors::*;
    pub use super::infra::*;
    pub use super::middleware::*;
    pub use super::state::*;
}
