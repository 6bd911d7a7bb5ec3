use sqlx::SqliteConnection;

pub use crate::users::repo_types::{User, UserFields};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The unique index on `users.email` rejected the write.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl RepoError {
    fn from_write(e: sqlx::Error, email: &str) -> Self {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            Self::DuplicateEmail(email.to_string())
        } else {
            Self::Db(e)
        }
    }
}

impl User {
    /// Find a user by primary key.
    pub async fn find_by_id(db: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Find a user by email.
    pub async fn find_by_email(
        db: &mut SqliteConnection,
        email: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Every stored user, oldest first.
    pub async fn list_all(db: &mut SqliteConnection) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn insert(db: &mut SqliteConnection, fields: &UserFields) -> RepoResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role)
            VALUES (?, ?, ?)
            RETURNING id, name, email, role
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.role)
        .fetch_one(db)
        .await
        .map_err(|e| RepoError::from_write(e, &fields.email))
    }

    /// Overwrites name, email and role. `None` when no row has `id`.
    pub async fn update(
        db: &mut SqliteConnection,
        id: i64,
        fields: &UserFields,
    ) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = ?, email = ?, role = ?
            WHERE id = ?
            RETURNING id, name, email, role
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.role)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| RepoError::from_write(e, &fields.email))
    }

    /// Returns whether a row was removed.
    pub async fn delete(db: &mut SqliteConnection, id: i64) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
