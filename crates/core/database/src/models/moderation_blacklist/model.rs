use anuncios_models::v0::{BlacklistEntryType, DataCreateBlacklistEntry};
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::Database;

auto_derived_partial!(
    /// Admin-curated disallowed value
    pub struct BlacklistEntry {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// What kind of value this matches
        pub entry_type: BlacklistEntryType,
        /// The disallowed value, stored lower-cased
        pub value: String,
        /// Why this value is disallowed
        pub reason: String,
        /// Whether this entry participates in checks
        pub is_active: bool,
        /// Admin who added the entry
        #[serde(skip_serializing_if = "Option::is_none")]
        pub added_by: Option<String>,
        /// When this entry was added
        pub created_at: Timestamp,
    },
    "PartialBlacklistEntry"
);

#[allow(clippy::disallowed_methods)]
impl BlacklistEntry {
    /// Add a new active entry to the blacklist
    pub async fn create(
        db: &Database,
        data: DataCreateBlacklistEntry,
        added_by: Option<String>,
    ) -> Result<BlacklistEntry> {
        if data.value.trim().is_empty() {
            return Err(create_error!(FailedValidation {
                error: "blacklist value must not be empty".to_string()
            }));
        }

        let entry = BlacklistEntry {
            id: ulid::Ulid::new().to_string(),
            entry_type: data.entry_type,
            value: data.value.to_lowercase(),
            reason: data.reason,
            is_active: true,
            added_by,
            created_at: Timestamp::now_utc(),
        };

        db.insert_blacklist_entry(&entry).await?;
        Ok(entry)
    }

    /// Update this entry
    pub async fn update(&mut self, db: &Database, partial: PartialBlacklistEntry) -> Result<()> {
        let mut partial = partial;
        if let Some(value) = &partial.value {
            partial.value = Some(value.to_lowercase());
        }

        db.update_blacklist_entry(&self.id, &partial).await?;
        self.apply_options(partial);
        Ok(())
    }

    /// Delete this entry
    pub async fn delete(&self, db: &Database) -> Result<()> {
        db.delete_blacklist_entry(&self.id).await
    }
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::{BlacklistEntryType, DataCreateBlacklistEntry};

    use crate::{BlacklistEntry, PartialBlacklistEntry};

    #[async_std::test]
    async fn check_is_case_insensitive_and_scoped() {
        database_test!(|db| async move {
            let mut entry = BlacklistEntry::create(
                &db,
                DataCreateBlacklistEntry {
                    entry_type: BlacklistEntryType::Word,
                    value: "Palabra".to_string(),
                    reason: "prohibited term".to_string(),
                },
                Some("admin".to_string()),
            )
            .await
            .unwrap();
            assert_eq!(entry.value, "palabra");

            assert!(db
                .check_blacklist(BlacklistEntryType::Word, "PALABRA")
                .await
                .unwrap());
            assert!(db
                .check_blacklist(BlacklistEntryType::Word, "palabra")
                .await
                .unwrap());

            // scoped by type, exact match only
            assert!(!db
                .check_blacklist(BlacklistEntryType::Phone, "palabra")
                .await
                .unwrap());
            assert!(!db
                .check_blacklist(BlacklistEntryType::Word, "palabras")
                .await
                .unwrap());
            assert!(!db
                .check_blacklist(BlacklistEntryType::Phone, "+5350000000")
                .await
                .unwrap());

            // deactivated entries no longer match
            entry
                .update(
                    &db,
                    PartialBlacklistEntry {
                        is_active: Some(false),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert!(!db
                .check_blacklist(BlacklistEntryType::Word, "palabra")
                .await
                .unwrap());
        });
    }

    #[async_std::test]
    async fn empty_values_are_refused() {
        database_test!(|db| async move {
            assert!(BlacklistEntry::create(
                &db,
                DataCreateBlacklistEntry {
                    entry_type: BlacklistEntryType::Word,
                    value: "   ".to_string(),
                    reason: "reason".to_string(),
                },
                None,
            )
            .await
            .is_err());
        });
    }

    #[async_std::test]
    async fn listing_filters_by_type_and_activity() {
        database_test!(|db| async move {
            for (entry_type, value) in [
                (BlacklistEntryType::Word, "armas"),
                (BlacklistEntryType::Phone, "+5351112222"),
                (BlacklistEntryType::Email, "spam@example.com"),
            ] {
                BlacklistEntry::create(
                    &db,
                    DataCreateBlacklistEntry {
                        entry_type,
                        value: value.to_string(),
                        reason: "reason".to_string(),
                    },
                    None,
                )
                .await
                .unwrap();
            }

            assert_eq!(db.fetch_blacklist(None).await.unwrap().len(), 3);
            assert_eq!(
                db.fetch_blacklist(Some(BlacklistEntryType::Word))
                    .await
                    .unwrap()
                    .len(),
                1
            );
        });
    }
}
