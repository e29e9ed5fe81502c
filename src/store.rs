//! Persistence gateway: the boundary between Account entities and storage.
//!
//! `PgAccountStore` is the production backend. `MemoryAccountStore` keeps the
//! same observable semantics in process memory and backs the test suite.

use crate::error::AppError;
use crate::model::{Account, AccountData};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{ConnectOptions, PgPool};
use std::collections::BTreeMap;
use std::str::FromStr;
use tokio::sync::RwLock;

/// Storage operations for Account records.
///
/// Writes assign or preserve system fields: `create` picks the next unique id
/// and stamps `date_joined` with the current date; `update` leaves both
/// untouched. Any storage malfunction propagates as `AppError::Db`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with `id` and `date_joined` set.
    async fn create(&self, data: &AccountData) -> Result<Account, AppError>;

    /// Fetch one account by id. A missing id is `Ok(None)`, never an error.
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;

    /// Fetch every account, ordered by ascending id (insertion order).
    async fn find_all(&self) -> Result<Vec<Account>, AppError>;

    /// Overwrite the client-settable fields of the account with this id.
    /// Fails with `AppError::NotFound` when the id does not exist; never
    /// creates a row.
    async fn update(&self, id: i64, data: &AccountData) -> Result<Account, AppError>;

    /// Remove the account with this id. Deleting a missing id is a no-op.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

const ACCOUNT_COLUMNS: &str = "id, name, email, address, phone_number, date_joined";

/// PostgreSQL-backed store. Each write runs in its own transaction: committed
/// on success, rolled back when the transaction guard drops on any error path.
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, data: &AccountData) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await?;
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (name, email, address, phone_number, date_joined) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, email, address, phone_number, date_joined",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(Utc::now().date_naive())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        tracing::debug!(id = account.id, "inserted account");
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_all(&self) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    async fn update(&self, id: i64, data: &AccountData) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET name = $1, email = $2, address = $3, phone_number = $4 \
             WHERE id = $5 \
             RETURNING id, name, email, address, phone_number, date_joined",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        updated.ok_or_else(|| AppError::NotFound(format!("account {id} was not found")))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(id, rows = result.rows_affected(), "deleted account");
        Ok(())
    }
}

/// In-memory store with the same semantics as the PostgreSQL backend: ids are
/// assigned from a monotonic counter and never reused within a process, and
/// `find_all` returns ascending-id order.
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    rows: BTreeMap<i64, Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, data: &AccountData) -> Result<Account, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let account = Account {
            id: inner.next_id,
            name: data.name.clone(),
            email: data.email.clone(),
            address: data.address.clone(),
            phone_number: data.phone_number.clone(),
            date_joined: Utc::now().date_naive(),
        };
        inner.rows.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, data: &AccountData) -> Result<Account, AppError> {
        let mut inner = self.inner.write().await;
        let row = inner
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("account {id} was not found")))?;
        row.name = data.name.clone();
        row.email = data.email.clone();
        row.address = data.address.clone();
        row.phone_number = data.phone_number.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }
}

/// Create the accounts table if it does not exist. The only DDL this service
/// performs; further schema changes are out of scope.
pub async fn ensure_accounts_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            address TEXT NOT NULL,
            phone_number TEXT,
            date_joined DATE NOT NULL DEFAULT CURRENT_DATE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Ensure the database named in `database_url` exists; create it if not.
/// Connects to the default `postgres` database to run CREATE DATABASE. Call
/// before opening the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_admin_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {e}")))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Split a connection URL into (url pointing at the admin `postgres` database,
/// database name). The query string, if any, is not part of the name.
fn split_admin_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL has no database path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{base}postgres"), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str) -> AccountData {
        AccountData {
            name: name.into(),
            email: format!("{name}@example.com"),
            address: "1 Main St".into(),
            phone_number: Some("555 0000".into()),
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_sequential_ids() {
        let store = MemoryAccountStore::new();
        let a = store.create(&data("a")).await.unwrap();
        let b = store.create(&data("b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.date_joined, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_missing() {
        let store = MemoryAccountStore::new();
        assert!(store.find_by_id(0).await.unwrap().is_none());
        let a = store.create(&data("a")).await.unwrap();
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let store = MemoryAccountStore::new();
        for name in ["c", "a", "b"] {
            store.create(&data(name)).await.unwrap();
        }
        let all = store.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn update_overwrites_fields_but_not_system_ones() {
        let store = MemoryAccountStore::new();
        let created = store.create(&data("before")).await.unwrap();
        let updated = store
            .update(
                created.id,
                &AccountData {
                    name: "after".into(),
                    email: "after@example.com".into(),
                    address: "2 Side St".into(),
                    phone_number: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.date_joined, created.date_joined);
        assert_eq!(updated.name, "after");
        assert_eq!(updated.phone_number, None);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_creates_nothing() {
        let store = MemoryAccountStore::new();
        let err = store.update(41, &data("ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_ids_are_not_reused() {
        let store = MemoryAccountStore::new();
        let a = store.create(&data("a")).await.unwrap();
        store.delete(a.id).await.unwrap();
        store.delete(a.id).await.unwrap();
        assert!(store.find_by_id(a.id).await.unwrap().is_none());
        let b = store.create(&data("b")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn admin_url_split() {
        let (admin, name) =
            split_admin_url("postgres://u:p@localhost:5432/accounts?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "accounts");
    }
}
