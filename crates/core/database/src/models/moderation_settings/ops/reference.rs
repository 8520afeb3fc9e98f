use anuncios_result::Result;

use crate::ModerationSetting;
use crate::ReferenceDb;

use super::AbstractModerationSettings;

#[async_trait]
impl AbstractModerationSettings for ReferenceDb {
    /// Fetch a setting by key, if present
    async fn fetch_setting(&self, key: &str) -> Result<Option<ModerationSetting>> {
        let settings = self.moderation_settings.lock().await;
        Ok(settings.get(key).cloned())
    }

    /// Upsert a setting
    async fn set_setting(&self, setting: &ModerationSetting) -> Result<()> {
        let mut settings = self.moderation_settings.lock().await;
        if let Some(existing) = settings.get_mut(&setting.key) {
            existing.value = setting.value.to_string();
            existing.kind = setting.kind;
            existing.updated_at = setting.updated_at;
            if setting.description.is_some() {
                existing.description = setting.description.clone();
            }
        } else {
            settings.insert(setting.key.to_string(), setting.clone());
        }

        Ok(())
    }

    /// Fetch all settings ordered by key
    async fn fetch_settings(&self) -> Result<Vec<ModerationSetting>> {
        let settings = self.moderation_settings.lock().await;
        let mut items: Vec<ModerationSetting> = settings.values().cloned().collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }
}
