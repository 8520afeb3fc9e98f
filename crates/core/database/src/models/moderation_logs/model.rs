use anuncios_result::Result;
use iso8601_timestamp::Timestamp;
use ulid::Ulid;

use crate::Database;

auto_derived!(
    /// Immutable record of a moderation action
    pub struct ModerationLog {
        /// Unique id
        #[serde(rename = "_id")]
        pub id: String,
        /// What happened, e.g. "review.decide"
        pub action: String,
        /// Kind of entity acted upon
        pub target_type: String,
        /// Id of the entity acted upon
        pub target_id: String,
        /// Who performed the action
        pub performed_by: String,
        /// Free-form context for the action
        #[serde(skip_serializing_if = "Option::is_none")]
        pub details: Option<String>,
        /// When the action happened
        pub created_at: Timestamp,
    }
);

/// Criteria for narrowing a log query, all fields optional
#[derive(Default, Debug, Clone)]
pub struct LogFilter {
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub performed_by: Option<String>,
}

impl ModerationLog {
    /// Build a new log entry
    ///
    /// Action, target type, target id and actor must all be non-empty.
    pub fn new(
        action: &str,
        target_type: &str,
        target_id: &str,
        performed_by: &str,
        details: Option<String>,
    ) -> Result<ModerationLog> {
        for value in [action, target_type, target_id, performed_by] {
            if value.trim().is_empty() {
                return Err(create_error!(FailedValidation {
                    error: "log fields must be non-empty".to_string()
                }));
            }
        }

        Ok(ModerationLog {
            id: Ulid::new().to_string(),
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id: target_id.to_string(),
            performed_by: performed_by.to_string(),
            details,
            created_at: Timestamp::now_utc(),
        })
    }

    /// Build and persist a log entry
    pub async fn create(
        db: &Database,
        action: &str,
        target_type: &str,
        target_id: &str,
        performed_by: &str,
        details: Option<String>,
    ) -> Result<ModerationLog> {
        let log = ModerationLog::new(action, target_type, target_id, performed_by, details)?;
        db.insert_log(&log).await?;
        Ok(log)
    }

    /// Whether this entry matches the given filter
    pub fn matches(&self, filter: &LogFilter) -> bool {
        filter
            .action
            .as_ref()
            .map_or(true, |action| &self.action == action)
            && filter
                .target_type
                .as_ref()
                .map_or(true, |target_type| &self.target_type == target_type)
            && filter
                .target_id
                .as_ref()
                .map_or(true, |target_id| &self.target_id == target_id)
            && filter
                .performed_by
                .as_ref()
                .map_or(true, |performed_by| &self.performed_by == performed_by)
    }
}
