use anuncios_models::v0::SettingKind;
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::Database;

auto_derived!(
    /// Tunable moderation parameter
    ///
    /// Decision logic treats a missing key as "use the documented default",
    /// never as an error.
    pub struct ModerationSetting {
        /// Setting key
        #[serde(rename = "_id")]
        pub key: String,
        /// String-encoded value
        pub value: String,
        /// Semantic type of the value
        pub kind: SettingKind,
        /// What this setting controls
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// When the value last changed
        pub updated_at: Timestamp,
    }
);

impl ModerationSetting {
    /// Upsert a setting and return the stored row
    ///
    /// An existing description is kept when the caller passes none.
    pub async fn set(
        db: &Database,
        key: &str,
        value: String,
        kind: SettingKind,
        description: Option<String>,
    ) -> Result<ModerationSetting> {
        let setting = ModerationSetting {
            key: key.to_string(),
            value,
            kind,
            description,
            updated_at: Timestamp::now_utc(),
        };

        db.set_setting(&setting).await?;
        db.fetch_setting(key)
            .await?
            .ok_or_else(|| create_error!(NotFound))
    }
}
