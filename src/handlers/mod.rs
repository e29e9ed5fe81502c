//! HTTP handlers for the account resource and the informational endpoints.

pub mod accounts;
pub mod common;

pub use accounts::*;
pub use common::*;
