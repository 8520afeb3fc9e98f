use anuncios_models::v0::AdminRole;
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;
use ulid::Ulid;

use crate::Database;

auto_derived_partial!(
    /// Platform user granted moderation privileges
    pub struct AdminUser {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the underlying platform user
        pub user_id: String,
        /// Privilege level
        pub role: AdminRole,
        /// Who granted the privilege
        pub added_by: String,
        /// When the privilege was granted
        pub created_at: Timestamp,
    },
    "PartialAdminUser"
);

impl AdminUser {
    /// Grant moderation privileges to a user
    pub async fn create(
        db: &Database,
        user_id: String,
        role: AdminRole,
        added_by: String,
    ) -> Result<AdminUser> {
        if db.fetch_admin_user(&user_id).await?.is_some() {
            return Err(create_error!(InvalidOperation));
        }

        let admin = AdminUser {
            id: Ulid::new().to_string(),
            user_id,
            role,
            added_by,
            created_at: Timestamp::now_utc(),
        };

        db.insert_admin_user(&admin).await?;
        Ok(admin)
    }

    /// Update this admin's role
    pub async fn update(&mut self, db: &Database, partial: PartialAdminUser) -> Result<()> {
        self.apply_options(partial.clone());
        db.update_admin_user(&self.id, &partial).await
    }

    /// Revoke this admin's privileges
    pub async fn delete(&self, db: &Database) -> Result<()> {
        db.delete_admin_user(&self.id).await
    }

    /// Whether the given platform user holds any moderation privilege
    pub async fn is_admin(db: &Database, user_id: &str) -> Result<bool> {
        Ok(db.fetch_admin_user(user_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::AdminRole;

    use crate::{AdminUser, PartialAdminUser};

    #[async_std::test]
    async fn privileges_are_granted_and_revoked() {
        database_test!(|db| async move {
            assert!(!AdminUser::is_admin(&db, "carlos").await.unwrap());

            let mut admin = AdminUser::create(
                &db,
                "carlos".to_string(),
                AdminRole::Moderator,
                "root".to_string(),
            )
            .await
            .unwrap();
            assert!(AdminUser::is_admin(&db, "carlos").await.unwrap());

            // one grant per user
            assert!(AdminUser::create(
                &db,
                "carlos".to_string(),
                AdminRole::Admin,
                "root".to_string(),
            )
            .await
            .is_err());

            admin
                .update(
                    &db,
                    PartialAdminUser {
                        role: Some(AdminRole::Admin),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let fetched = db.fetch_admin_user("carlos").await.unwrap().unwrap();
            assert_eq!(fetched.role, AdminRole::Admin);

            admin.delete(&db).await.unwrap();
            assert!(!AdminUser::is_admin(&db, "carlos").await.unwrap());
        });
    }

    #[async_std::test]
    async fn admins_list_newest_first() {
        database_test!(|db| async move {
            for user in ["ana", "beto"] {
                AdminUser::create(
                    &db,
                    user.to_string(),
                    AdminRole::Moderator,
                    "root".to_string(),
                )
                .await
                .unwrap();
            }

            let admins = db.fetch_admin_users().await.unwrap();
            assert_eq!(admins.len(), 2);
            assert_eq!(admins[0].user_id, "beto");
        });
    }
}
