use anuncios_result::Result;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use crate::MongoDb;
use crate::{AdminUser, PartialAdminUser};

use super::AbstractAdminUsers;

static COL: &str = "admin_users";

#[async_trait]
impl AbstractAdminUsers for MongoDb {
    /// Insert a new admin user
    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()> {
        query!(self, insert_one, COL, &admin).map(|_| ())
    }

    /// Fetch an admin entry by platform user id, if present
    async fn fetch_admin_user(&self, user_id: &str) -> Result<Option<AdminUser>> {
        query!(
            self,
            find_one,
            COL,
            doc! {
                "user_id": user_id,
            }
        )
    }

    /// Fetch all admin users, newest first
    async fn fetch_admin_users(&self) -> Result<Vec<AdminUser>> {
        query!(
            self,
            find_with_options,
            COL,
            doc! {},
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .build()
        )
    }

    /// Update an admin user by entry id
    async fn update_admin_user(&self, id: &str, partial: &PartialAdminUser) -> Result<()> {
        query!(self, update_one_by_id, COL, id, partial).map(|_| ())
    }

    /// Delete an admin user by entry id
    async fn delete_admin_user(&self, id: &str) -> Result<()> {
        query!(self, delete_one_by_id, COL, id).map(|_| ())
    }
}
