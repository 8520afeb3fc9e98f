use std::{collections::HashMap, sync::Arc};

use futures::lock::Mutex;

use crate::{
    AdminUser, BlacklistEntry, Listing, ModerationLog, ModerationReport, ModerationReview,
    ModerationSetting,
};

database_derived!(
    /// Reference implementation
    #[derive(Default)]
    pub struct ReferenceDb {
        pub moderation_reviews: Arc<Mutex<HashMap<String, ModerationReview>>>,
        pub moderation_blacklist: Arc<Mutex<HashMap<String, BlacklistEntry>>>,
        pub moderation_reports: Arc<Mutex<HashMap<String, ModerationReport>>>,
        pub moderation_settings: Arc<Mutex<HashMap<String, ModerationSetting>>>,
        pub moderation_logs: Arc<Mutex<HashMap<String, ModerationLog>>>,
        pub admin_users: Arc<Mutex<HashMap<String, AdminUser>>>,
        pub listings: Arc<Mutex<HashMap<String, Listing>>>,
    }
);

impl ReferenceDb {
    /// Wipe all collections
    pub async fn clear(&self) {
        self.moderation_reviews.lock().await.clear();
        self.moderation_blacklist.lock().await.clear();
        self.moderation_reports.lock().await.clear();
        self.moderation_settings.lock().await.clear();
        self.moderation_logs.lock().await.clear();
        self.admin_users.lock().await.clear();
        self.listings.lock().await.clear();
    }
}
