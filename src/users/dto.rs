use serde::Deserialize;

use super::repo_types::UserId;

/// Body of `POST /add`. Every field is optional on the wire; presence is checked by the service.
#[derive(Debug, Default, Deserialize)]
pub struct AddUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub pwd: Option<String>,
}

/// Body of `POST /update`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub pwd: Option<String>,
}

pub const USER_ADDED: &str = "User added successfully!";
pub const USER_UPDATED: &str = "User updated successfully!";
pub const USER_DELETED: &str = "User deleted successfully!";
