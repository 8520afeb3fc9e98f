use anuncios_result::Result;

use crate::{AdminUser, PartialAdminUser};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractAdminUsers: Sync + Send {
    /// Insert a new admin user
    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()>;

    /// Fetch an admin entry by platform user id, if present
    async fn fetch_admin_user(&self, user_id: &str) -> Result<Option<AdminUser>>;

    /// Fetch all admin users, newest first
    async fn fetch_admin_users(&self) -> Result<Vec<AdminUser>>;

    /// Update an admin user by entry id
    async fn update_admin_user(&self, id: &str, partial: &PartialAdminUser) -> Result<()>;

    /// Delete an admin user by entry id
    async fn delete_admin_user(&self, id: &str) -> Result<()>;
}
