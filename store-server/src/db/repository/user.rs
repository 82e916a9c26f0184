//! User Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{User, UserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self
            .base
            .db()
            .select((USER_TABLE, record_key(USER_TABLE, id)))
            .await?;
        Ok(user)
    }

    /// Find user by unique email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// Fails with [`RepoError::Duplicate`] when the email is already taken;
    /// callers racing on creation should re-fetch by email.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let user = User {
            id: None,
            email: data.email,
            name: data.name,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
