mod admin_users;
mod listings;
mod moderation_blacklist;
mod moderation_logs;
mod moderation_reports;
mod moderation_reviews;
mod moderation_settings;

pub use admin_users::*;
pub use listings::*;
pub use moderation_blacklist::*;
pub use moderation_logs::*;
pub use moderation_reports::*;
pub use moderation_reviews::*;
pub use moderation_settings::*;

#[cfg(feature = "mongodb")]
use crate::MongoDb;
use crate::{Database, ReferenceDb};

pub trait AbstractDatabase:
    Sync
    + Send
    + admin_users::AbstractAdminUsers
    + listings::AbstractListings
    + moderation_blacklist::AbstractModerationBlacklist
    + moderation_logs::AbstractModerationLogs
    + moderation_reports::AbstractModerationReports
    + moderation_reviews::AbstractModerationReviews
    + moderation_settings::AbstractModerationSettings
{
}

impl AbstractDatabase for ReferenceDb {}
#[cfg(feature = "mongodb")]
impl AbstractDatabase for MongoDb {}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            #[cfg(feature = "mongodb")]
            Database::MongoDb(mongo) => mongo,
        }
    }
}
