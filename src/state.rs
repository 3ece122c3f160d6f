use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::users::{
    repo::{PgUserStore, UserStore},
    services::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    /// Connects to the configured database through a sqlx pool of at most
    /// `DB_MAX_CONNECTIONS`. Each store call checks out one pooled connection
    /// and returns it on drop; idle connections are reused across requests.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.db.max_connections)
            .connect(&config.db.url)
            .await
            .context("connect to database")?;
        Ok(Self::from_store(Arc::new(PgUserStore::new(db))))
    }

    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self {
            users: UserService::new(store),
        }
    }
}
