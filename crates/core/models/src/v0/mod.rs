mod admin_users;
mod classification;
mod listings;
mod moderation_blacklist;
mod moderation_reports;
mod moderation_reviews;
mod moderation_settings;

pub use admin_users::*;
pub use classification::*;
pub use listings::*;
pub use moderation_blacklist::*;
pub use moderation_reports::*;
pub use moderation_reviews::*;
pub use moderation_settings::*;
