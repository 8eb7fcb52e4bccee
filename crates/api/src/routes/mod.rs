//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod archives;
pub mod batch;
pub mod contracts;
pub mod events;
pub mod health;
pub mod journal;
pub mod members;
pub mod reports;
pub mod settings;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(journal::routes())
        .merge(members::routes())
        .merge(contracts::routes())
        .merge(batch::routes())
        .merge(archives::routes())
        .merge(reports::routes())
        .merge(settings::routes())
        .merge(events::routes())
}
