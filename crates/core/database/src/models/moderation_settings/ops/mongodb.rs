use anuncios_result::Result;
use bson::to_bson;
use mongodb::bson::doc;
use mongodb::options::{FindOptions, UpdateOptions};

use crate::ModerationSetting;
use crate::MongoDb;

use super::AbstractModerationSettings;

static COL: &str = "moderation_settings";

#[async_trait]
impl AbstractModerationSettings for MongoDb {
    /// Fetch a setting by key, if present
    async fn fetch_setting(&self, key: &str) -> Result<Option<ModerationSetting>> {
        query!(self, find_one_by_id, COL, key)
    }

    /// Upsert a setting
    async fn set_setting(&self, setting: &ModerationSetting) -> Result<()> {
        let mut set = doc! {
            "value": setting.value.to_string(),
            "kind": to_bson(&setting.kind).map_err(|_| create_database_error!("to_bson", COL))?,
            "updated_at": to_bson(&setting.updated_at)
                .map_err(|_| create_database_error!("to_bson", COL))?,
        };

        if let Some(description) = &setting.description {
            set.insert("description", description.to_string());
        }

        self.col::<ModerationSetting>(COL)
            .update_one(
                doc! {
                    "_id": setting.key.to_string(),
                },
                doc! {
                    "$set": set,
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map(|_| ())
            .map_err(|_| create_database_error!("update_one", COL))
    }

    /// Fetch all settings ordered by key
    async fn fetch_settings(&self) -> Result<Vec<ModerationSetting>> {
        query!(
            self,
            find_with_options,
            COL,
            doc! {},
            FindOptions::builder()
                .sort(doc! {
                    "_id": 1,
                })
                .build()
        )
    }
}
