use async_trait::async_trait;
use chrono::NaiveDate;
use libsql::{params, Builder, Connection, Database, Row};
use std::{path::Path, sync::Arc};

use super::{AccountStore, StorageError};
use crate::service::user::{AccountId, UserAccount};

const DATE_FORMAT: &str = "%Y-%m-%d";

const CREATE_ACCOUNTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS accounts (
    user_id INTEGER PRIMARY KEY,
    is_pro INTEGER NOT NULL DEFAULT 0,
    requests_today INTEGER NOT NULL DEFAULT 0 CHECK (requests_today >= 0),
    last_reset_date TEXT NOT NULL
)";

const INSERT_ACCOUNT: &str = "INSERT INTO accounts (user_id, is_pro, requests_today, last_reset_date)
    VALUES (?1, 0, 0, ?2)
    ON CONFLICT(user_id) DO NOTHING";

const ROLL_OVER: &str = "UPDATE accounts
    SET requests_today = CASE WHEN last_reset_date = ?2 THEN requests_today ELSE 0 END,
        last_reset_date = ?2
    WHERE user_id = ?1
    RETURNING user_id, is_pro, requests_today, last_reset_date";

const INCREMENT: &str = "UPDATE accounts
    SET requests_today = CASE WHEN last_reset_date = ?2 THEN requests_today + 1 ELSE 1 END,
        last_reset_date = ?2
    WHERE user_id = ?1
    RETURNING user_id, is_pro, requests_today, last_reset_date";

const MARK_PRO: &str = "UPDATE accounts
    SET is_pro = 1,
        requests_today = CASE WHEN last_reset_date = ?2 THEN requests_today ELSE 0 END,
        last_reset_date = ?2
    WHERE user_id = ?1
    RETURNING user_id, is_pro, requests_today, last_reset_date";

/// libsql-backed account store, either a remote Turso database or a local file.
#[derive(Clone)]
pub struct TursoClient {
    _db: Arc<Database>,
    conn: Connection,
}

impl TursoClient {
    pub async fn remote(url: &str, token: &str) -> Result<Self, StorageError> {
        info!("Initializing TursoClient...");
        let db = Builder::new_remote(url.to_string(), token.to_string()).build().await?;
        Self::from_database(db).await
    }

    pub async fn local(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        info!("Initializing TursoClient on {}...", path.as_ref().display());
        let db = Builder::new_local(path.as_ref()).build().await?;
        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self, StorageError> {
        let conn = db.connect()?;
        conn.execute(CREATE_ACCOUNTS_TABLE, ()).await?;

        info!("TursoClient initialized");
        Ok(Self {
            _db: Arc::new(db),
            conn,
        })
    }

    async fn ensure_account(&self, user_id: AccountId, today: &str) -> Result<(), StorageError> {
        self.conn.execute(INSERT_ACCOUNT, params![user_id.get(), today]).await?;
        Ok(())
    }

    async fn update_returning(
        &self,
        statement: &str,
        user_id: AccountId,
        today: NaiveDate,
    ) -> Result<UserAccount, StorageError> {
        let today = today.format(DATE_FORMAT).to_string();
        self.ensure_account(user_id, &today).await?;

        let mut rows = self.conn.query(statement, params![user_id.get(), today]).await?;

        match rows.next().await? {
            Some(row) => account_from_row(&row),
            None => Err(StorageError::Corrupted(format!("account {} vanished during update", user_id))),
        }
    }
}

fn account_from_row(row: &Row) -> Result<UserAccount, StorageError> {
    let user_id = row.get::<i64>(0)?;
    let is_pro = row.get::<i64>(1)?;
    let requests_today = row.get::<i64>(2)?;
    let last_reset_date = row.get::<String>(3)?;

    Ok(UserAccount {
        user_id: AccountId::new(user_id).map_err(|e| StorageError::Corrupted(e.to_string()))?,
        is_pro: is_pro != 0,
        requests_today: u32::try_from(requests_today)
            .map_err(|_| StorageError::Corrupted(format!("requests_today out of range: {}", requests_today)))?,
        last_reset_date: NaiveDate::parse_from_str(&last_reset_date, DATE_FORMAT)
            .map_err(|e| StorageError::Corrupted(format!("last_reset_date {:?}: {}", last_reset_date, e)))?,
    })
}

#[async_trait]
impl AccountStore for TursoClient {
    async fn load_or_insert(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        self.update_returning(ROLL_OVER, user_id, today).await
    }

    async fn increment(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        self.update_returning(INCREMENT, user_id, today).await
    }

    async fn mark_pro(&self, user_id: AccountId, today: NaiveDate) -> Result<UserAccount, StorageError> {
        self.update_returning(MARK_PRO, user_id, today).await
    }
}
