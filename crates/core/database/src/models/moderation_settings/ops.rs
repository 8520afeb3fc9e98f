use anuncios_result::Result;

use crate::ModerationSetting;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractModerationSettings: Sync + Send {
    /// Fetch a setting by key, if present
    async fn fetch_setting(&self, key: &str) -> Result<Option<ModerationSetting>>;

    /// Upsert a setting
    ///
    /// When the incoming description is empty the stored one is preserved.
    async fn set_setting(&self, setting: &ModerationSetting) -> Result<()>;

    /// Fetch all settings ordered by key
    async fn fetch_settings(&self) -> Result<Vec<ModerationSetting>>;
}
