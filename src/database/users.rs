//! User lookup operations

use super::models::UserRecord;
use super::Database;

/// Extension trait for user-related database operations
pub trait UserOps {
    fn create_user(&self, login_name: &str) -> impl std::future::Future<Output = Result<UserRecord, sqlx::Error>> + Send;
    fn user_exists(&self, login_name: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn user_id_for_login(&self, login_name: &str) -> impl std::future::Future<Output = Result<Option<String>, sqlx::Error>> + Send;
}

impl UserOps for Database {
    async fn create_user(&self, login_name: &str) -> Result<UserRecord, sqlx::Error> {
        let user = UserRecord::new(login_name);

        sqlx::query("INSERT INTO users (id, login_name, created_at) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.login_name)
            .bind(&user.created_at)
            .execute(self.pool())
            .await?;

        tracing::info!(user_id = %user.id, login_name, "User created");
        Ok(user)
    }

    async fn user_exists(&self, login_name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE login_name = ?)")
            .bind(login_name)
            .fetch_one(self.pool())
            .await
    }

    async fn user_id_for_login(&self, login_name: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE login_name = ?")
            .bind(login_name)
            .fetch_optional(self.pool())
            .await
    }
}
