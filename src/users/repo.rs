use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{User, UserFields, UserId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for `tbl_user`. One statement per call, no cross-call state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row and return the id the store assigned.
    async fn insert(&self, fields: &UserFields) -> Result<UserId, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError>;
    /// Overwrite name, email and hash. Returns rows affected.
    async fn update(&self, id: UserId, fields: &UserFields) -> Result<u64, StoreError>;
    /// Returns rows affected.
    async fn delete(&self, id: UserId) -> Result<u64, StoreError>;
}

/// Postgres-backed store. Every call holds exactly one connection (or one
/// transaction for writes) which goes back on drop, whatever the outcome.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, fields: &UserFields) -> Result<UserId, StoreError> {
        let mut tx = self.pool.begin().await?;
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO tbl_user (user_name, user_email, user_password)
            VALUES ($1, $2, $3)
            RETURNING user_id
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.password_hash)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(UserId::from(id))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, user_email, user_password
            FROM tbl_user
            ORDER BY user_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, user_email, user_password
            FROM tbl_user
            WHERE user_id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE tbl_user
               SET user_name = $1, user_email = $2, user_password = $3
             WHERE user_id = $4
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.password_hash)
        .bind(id.get())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: UserId) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM tbl_user WHERE user_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;

    use tokio::sync::Mutex;

    use super::*;

    /// In-process stand-in for `tbl_user`, ids handed out like a SERIAL column.
    #[derive(Default)]
    pub(crate) struct MemoryUserStore {
        rows: Mutex<(i32, BTreeMap<i64, User>)>,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn insert(&self, fields: &UserFields) -> Result<UserId, StoreError> {
            let mut guard = self.rows.lock().await;
            let (next, rows) = &mut *guard;
            *next += 1;
            rows.insert(
                i64::from(*next),
                User {
                    user_id: *next,
                    user_name: fields.name.clone(),
                    user_email: fields.email.clone(),
                    user_password: fields.password_hash.clone(),
                },
            );
            Ok(UserId::from(*next))
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Ok(self.rows.lock().await.1.values().cloned().collect())
        }

        async fn find(&self, id: UserId) -> Result<Option<User>, StoreError> {
            Ok(self.rows.lock().await.1.get(&id.get()).cloned())
        }

        async fn update(&self, id: UserId, fields: &UserFields) -> Result<u64, StoreError> {
            let mut guard = self.rows.lock().await;
            match guard.1.get_mut(&id.get()) {
                Some(row) => {
                    row.user_name = fields.name.clone();
                    row.user_email = fields.email.clone();
                    row.user_password = fields.password_hash.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete(&self, id: UserId) -> Result<u64, StoreError> {
            Ok(self.rows.lock().await.1.remove(&id.get()).map_or(0, |_| 1))
        }
    }

    /// Every call fails as if the database were unreachable.
    pub(crate) struct FailingUserStore;

    #[async_trait]
    impl UserStore for FailingUserStore {
        async fn insert(&self, _fields: &UserFields) -> Result<UserId, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn find(&self, _id: UserId) -> Result<Option<User>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn update(&self, _id: UserId, _fields: &UserFields) -> Result<u64, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: UserId) -> Result<u64, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}

#[cfg(test)]
mod pg_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a database with tbl_user"]
    async fn postgres_round_trip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect");
        let store = PgUserStore::new(pool);

        let fields = UserFields {
            name: "Alice".into(),
            email: "a@x.com".into(),
            password_hash: "not-really-a-hash".into(),
        };
        let id = store.insert(&fields).await.expect("insert");
        let row = store.find(id).await.expect("find").expect("row exists");
        assert_eq!(row.user_name, "Alice");

        let renamed = UserFields { name: "Alicia".into(), ..fields };
        assert_eq!(store.update(id, &renamed).await.expect("update"), 1);
        assert_eq!(store.delete(id).await.expect("delete"), 1);
        assert_eq!(store.delete(id).await.expect("delete again"), 0);
        assert!(store.find(id).await.expect("find").is_none());

        let wide = UserId::new(3_000_000_000);
        assert!(store.find(wide).await.expect("int8 id against int4 column").is_none());
        assert_eq!(store.delete(wide).await.expect("delete wide id"), 0);
    }
}
