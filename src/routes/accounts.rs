//! Account resource routes.

use crate::handlers::accounts::{
    create_account, delete_account, list_accounts, read_account, update_account,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn account_routes(state: AppState) -> Router {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/:id",
            get(read_account).put(update_account).delete(delete_account),
        )
        .with_state(state)
}
