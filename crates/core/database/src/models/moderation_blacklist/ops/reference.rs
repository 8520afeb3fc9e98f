use anuncios_models::v0::BlacklistEntryType;
use anuncios_result::Result;

use crate::ReferenceDb;
use crate::{BlacklistEntry, PartialBlacklistEntry};

use super::AbstractModerationBlacklist;

#[async_trait]
impl AbstractModerationBlacklist for ReferenceDb {
    /// Insert a new blacklist entry into the database
    async fn insert_blacklist_entry(&self, entry: &BlacklistEntry) -> Result<()> {
        let mut blacklist = self.moderation_blacklist.lock().await;
        if blacklist.contains_key(&entry.id) {
            Err(create_database_error!("insert", "moderation_blacklist"))
        } else {
            blacklist.insert(entry.id.to_string(), entry.clone());
            Ok(())
        }
    }

    /// Fetch a blacklist entry by its id
    async fn fetch_blacklist_entry(&self, id: &str) -> Result<BlacklistEntry> {
        let blacklist = self.moderation_blacklist.lock().await;
        blacklist
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch active entries, optionally of one type, newest first
    async fn fetch_blacklist(
        &self,
        entry_type: Option<BlacklistEntryType>,
    ) -> Result<Vec<BlacklistEntry>> {
        let blacklist = self.moderation_blacklist.lock().await;
        let mut items: Vec<BlacklistEntry> = blacklist
            .values()
            .filter(|entry| entry.is_active)
            .filter(|entry| {
                entry_type
                    .map(|entry_type| entry.entry_type == entry_type)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));
        Ok(items)
    }

    /// Update an entry with new information
    async fn update_blacklist_entry(
        &self,
        id: &str,
        partial: &PartialBlacklistEntry,
    ) -> Result<()> {
        let mut blacklist = self.moderation_blacklist.lock().await;
        if let Some(entry) = blacklist.get_mut(id) {
            entry.apply_options(partial.clone());
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }

    /// Delete an entry from the blacklist
    async fn delete_blacklist_entry(&self, id: &str) -> Result<()> {
        let mut blacklist = self.moderation_blacklist.lock().await;
        if blacklist.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }

    /// Whether an active entry of this type equals the given value
    async fn check_blacklist(&self, entry_type: BlacklistEntryType, value: &str) -> Result<bool> {
        let value = value.to_lowercase();
        let blacklist = self.moderation_blacklist.lock().await;
        Ok(blacklist
            .values()
            .any(|entry| entry.is_active && entry.entry_type == entry_type && entry.value == value))
    }
}
