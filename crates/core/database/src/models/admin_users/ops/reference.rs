use anuncios_result::Result;

use crate::ReferenceDb;
use crate::{AdminUser, PartialAdminUser};

use super::AbstractAdminUsers;

#[async_trait]
impl AbstractAdminUsers for ReferenceDb {
    /// Insert a new admin user
    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()> {
        let mut admins = self.admin_users.lock().await;
        if admins.contains_key(&admin.id) {
            Err(create_database_error!("insert", "admin_users"))
        } else {
            admins.insert(admin.id.to_string(), admin.clone());
            Ok(())
        }
    }

    /// Fetch an admin entry by platform user id, if present
    async fn fetch_admin_user(&self, user_id: &str) -> Result<Option<AdminUser>> {
        let admins = self.admin_users.lock().await;
        Ok(admins
            .values()
            .find(|admin| admin.user_id == user_id)
            .cloned())
    }

    /// Fetch all admin users, newest first
    async fn fetch_admin_users(&self) -> Result<Vec<AdminUser>> {
        let admins = self.admin_users.lock().await;
        let mut items: Vec<AdminUser> = admins.values().cloned().collect();
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));
        Ok(items)
    }

    /// Update an admin user by entry id
    async fn update_admin_user(&self, id: &str, partial: &PartialAdminUser) -> Result<()> {
        let mut admins = self.admin_users.lock().await;
        if let Some(admin) = admins.get_mut(id) {
            admin.apply_options(partial.clone());
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }

    /// Delete an admin user by entry id
    async fn delete_admin_user(&self, id: &str) -> Result<()> {
        let mut admins = self.admin_users.lock().await;
        if admins.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }
}
