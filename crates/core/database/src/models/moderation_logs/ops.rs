use anuncios_result::Result;

use crate::{LogFilter, ModerationLog};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractModerationLogs: Sync + Send {
    /// Insert a new log entry
    async fn insert_log(&self, log: &ModerationLog) -> Result<()>;

    /// Fetch a page of log entries, newest first
    ///
    /// Returns the page and the total count of entries matching the filter.
    async fn fetch_logs(
        &self,
        filter: &LogFilter,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationLog>, u64)>;
}
