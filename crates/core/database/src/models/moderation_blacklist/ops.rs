use anuncios_models::v0::BlacklistEntryType;
use anuncios_result::Result;

use crate::{BlacklistEntry, PartialBlacklistEntry};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractModerationBlacklist: Sync + Send {
    /// Insert a new blacklist entry into the database
    async fn insert_blacklist_entry(&self, entry: &BlacklistEntry) -> Result<()>;

    /// Fetch a blacklist entry by its id
    async fn fetch_blacklist_entry(&self, id: &str) -> Result<BlacklistEntry>;

    /// Fetch active entries, optionally of one type, newest first
    async fn fetch_blacklist(
        &self,
        entry_type: Option<BlacklistEntryType>,
    ) -> Result<Vec<BlacklistEntry>>;

    /// Update an entry with new information
    async fn update_blacklist_entry(
        &self,
        id: &str,
        partial: &PartialBlacklistEntry,
    ) -> Result<()>;

    /// Delete an entry from the blacklist
    async fn delete_blacklist_entry(&self, id: &str) -> Result<()>;

    /// Whether an active entry of this type equals the given value
    ///
    /// The probe is lower-cased before comparison; no substring or fuzzy
    /// matching happens at this layer.
    async fn check_blacklist(&self, entry_type: BlacklistEntryType, value: &str) -> Result<bool>;
}
