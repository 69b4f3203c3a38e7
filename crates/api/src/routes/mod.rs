//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounting_rules;
pub mod events;
pub mod financial_entries;
pub mod health;
pub mod journal_entries;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(events::routes())
        .merge(financial_entries::routes())
        .merge(accounting_rules::routes())
        .merge(journal_entries::routes())
}
