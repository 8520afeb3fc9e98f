use anuncios_result::Result;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;

use crate::MongoDb;
use crate::{LogFilter, ModerationLog};

use super::AbstractModerationLogs;

static COL: &str = "moderation_logs";

fn filter_document(filter: &LogFilter) -> Document {
    let mut document = doc! {};

    if let Some(action) = &filter.action {
        document.insert("action", action.to_string());
    }

    if let Some(target_type) = &filter.target_type {
        document.insert("target_type", target_type.to_string());
    }

    if let Some(target_id) = &filter.target_id {
        document.insert("target_id", target_id.to_string());
    }

    if let Some(performed_by) = &filter.performed_by {
        document.insert("performed_by", performed_by.to_string());
    }

    document
}

#[async_trait]
impl AbstractModerationLogs for MongoDb {
    /// Insert a new log entry
    async fn insert_log(&self, log: &ModerationLog) -> Result<()> {
        query!(self, insert_one, COL, &log).map(|_| ())
    }

    /// Fetch a page of log entries, newest first
    async fn fetch_logs(
        &self,
        filter: &LogFilter,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationLog>, u64)> {
        let filter = filter_document(filter);

        let total = query!(self, count_documents, COL, filter.clone())?;
        let items = query!(
            self,
            find_with_options,
            COL,
            filter,
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .skip(offset)
                .limit(limit)
                .build()
        )?;

        Ok((items, total))
    }
}
