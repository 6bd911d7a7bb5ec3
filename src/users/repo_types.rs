use sqlx::FromRow;

use crate::users::dto::UserCreate;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,       // assigned by the store
    pub name: String,
    pub email: String, // unique
    pub role: String,
}

/// The mutable columns of a user, written together on insert and update.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserCreate> for UserFields {
    fn from(r: UserCreate) -> Self {
        Self {
            name: r.name,
            email: r.email,
            role: r.role,
        }
    }
}
