//! Account service: a REST backend for Account resources over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::AppError;
pub use model::{Account, AccountData};
pub use routes::{account_routes, app, common_routes};
pub use state::AppState;
pub use store::{
    ensure_accounts_table, ensure_database_exists, AccountStore, MemoryAccountStore,
    PgAccountStore,
};
