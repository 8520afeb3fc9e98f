use anuncios_models::v0::BlacklistEntryType;
use anuncios_result::Result;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use crate::MongoDb;
use crate::{BlacklistEntry, PartialBlacklistEntry};

use super::AbstractModerationBlacklist;

static COL: &str = "moderation_blacklist";

#[async_trait]
impl AbstractModerationBlacklist for MongoDb {
    /// Insert a new blacklist entry into the database
    async fn insert_blacklist_entry(&self, entry: &BlacklistEntry) -> Result<()> {
        query!(self, insert_one, COL, &entry).map(|_| ())
    }

    /// Fetch a blacklist entry by its id
    async fn fetch_blacklist_entry(&self, id: &str) -> Result<BlacklistEntry> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch active entries, optionally of one type, newest first
    async fn fetch_blacklist(
        &self,
        entry_type: Option<BlacklistEntryType>,
    ) -> Result<Vec<BlacklistEntry>> {
        let mut filter = doc! {
            "is_active": true,
        };

        if let Some(entry_type) = entry_type {
            filter.insert("entry_type", entry_type.as_str());
        }

        query!(
            self,
            find_with_options,
            COL,
            filter,
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .build()
        )
    }

    /// Update an entry with new information
    async fn update_blacklist_entry(
        &self,
        id: &str,
        partial: &PartialBlacklistEntry,
    ) -> Result<()> {
        query!(self, update_one_by_id, COL, id, partial).map(|_| ())
    }

    /// Delete an entry from the blacklist
    async fn delete_blacklist_entry(&self, id: &str) -> Result<()> {
        query!(self, delete_one_by_id, COL, id).map(|_| ())
    }

    /// Whether an active entry of this type equals the given value
    async fn check_blacklist(&self, entry_type: BlacklistEntryType, value: &str) -> Result<bool> {
        Ok(query!(
            self,
            find_one,
            COL,
            doc! {
                "entry_type": entry_type.as_str(),
                "value": value.to_lowercase(),
                "is_active": true,
            }
        )?
        .map(|_: BlacklistEntry| ())
        .is_some())
    }
}
