use anuncios_result::Result;

use crate::ReferenceDb;
use crate::{LogFilter, ModerationLog};

use super::AbstractModerationLogs;

#[async_trait]
impl AbstractModerationLogs for ReferenceDb {
    /// Insert a new log entry
    async fn insert_log(&self, log: &ModerationLog) -> Result<()> {
        let mut logs = self.moderation_logs.lock().await;
        if logs.contains_key(&log.id) {
            Err(create_database_error!("insert", "moderation_logs"))
        } else {
            logs.insert(log.id.to_string(), log.clone());
            Ok(())
        }
    }

    /// Fetch a page of log entries, newest first
    async fn fetch_logs(
        &self,
        filter: &LogFilter,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationLog>, u64)> {
        let logs = self.moderation_logs.lock().await;
        let mut items: Vec<ModerationLog> = logs
            .values()
            .filter(|log| log.matches(filter))
            .cloned()
            .collect();

        let total = items.len() as u64;
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));

        Ok((
            items
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
            total,
        ))
    }
}
