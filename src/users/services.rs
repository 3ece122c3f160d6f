use std::sync::Arc;

use tracing::{info, warn};

use super::{
    dto::{AddUserRequest, UpdateUserRequest},
    password::hash_password,
    repo::{StoreError, UserStore},
    repo_types::{User, UserFields, UserId},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
    #[error("store failure")]
    Store(#[from] StoreError),
}

/// CRUD over `tbl_user`. Holds no state of its own beyond the injected store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, req: AddUserRequest) -> Result<UserId, ServiceError> {
        let name = required(req.name, "name")?;
        let email = required(req.email, "email")?;
        let pwd = required(req.pwd, "pwd")?;

        let fields = hashed_fields(name, email, pwd).await?;
        let id = self.store.insert(&fields).await?;
        info!(user_id = %id, "user added");
        Ok(id)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find(id).await?)
    }

    /// Overwrites the row. Zero rows affected still counts as success.
    pub async fn update_user(&self, req: UpdateUserRequest) -> Result<u64, ServiceError> {
        // 0 is not a usable id here, same as an absent one
        let id = req
            .id
            .filter(|id| id.get() != 0)
            .ok_or(ServiceError::MissingField("id"))?;
        let name = required(req.name, "name")?;
        let email = required(req.email, "email")?;
        let pwd = required(req.pwd, "pwd")?;

        let fields = hashed_fields(name, email, pwd).await?;
        let affected = self.store.update(id, &fields).await?;
        if affected == 0 {
            warn!(user_id = %id, "update matched no rows");
        } else {
            info!(user_id = %id, "user updated");
        }
        Ok(affected)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<u64, ServiceError> {
        let affected = self.store.delete(id).await?;
        info!(user_id = %id, affected, "user deleted");
        Ok(affected)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ServiceError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ServiceError::MissingField(field))
}

// Argon2 is CPU-bound, keep it off the async workers.
async fn hashed_fields(
    name: String,
    email: String,
    pwd: String,
) -> Result<UserFields, ServiceError> {
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&pwd))
        .await
        .map_err(|e| ServiceError::Hash(e.into()))?
        .map_err(ServiceError::Hash)?;
    Ok(UserFields {
        name,
        email,
        password_hash,
    })
}
