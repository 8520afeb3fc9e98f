use anuncios_models::v0::{ReportStatus, ReportedTarget};
use anuncios_result::Result;
use mongodb::bson::{doc, to_document, Document};
use mongodb::options::FindOptions;

use crate::MongoDb;
use crate::{ModerationLog, ModerationReport};

use super::AbstractModerationReports;

static COL: &str = "moderation_reports";

#[async_trait]
impl AbstractModerationReports for MongoDb {
    /// Insert a new report into the database
    async fn insert_report(&self, report: &ModerationReport) -> Result<()> {
        query!(self, insert_one, COL, &report).map(|_| ())
    }

    /// Fetch a report by its id
    async fn fetch_report(&self, id: &str) -> Result<ModerationReport> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch reports filed by a given user, newest first
    async fn fetch_reports_by_reporter(&self, reporter_id: &str) -> Result<Vec<ModerationReport>> {
        query!(
            self,
            find_with_options,
            COL,
            doc! {
                "reporter_id": reporter_id,
            },
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .build()
        )
    }

    /// Fetch reports filed against a given target, newest first
    async fn fetch_reports_by_target(
        &self,
        target: &ReportedTarget,
    ) -> Result<Vec<ModerationReport>> {
        query!(
            self,
            find_with_options,
            COL,
            doc! {
                "target.target_type": target.target_type(),
                "target.id": target.id(),
            },
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .build()
        )
    }

    /// Fetch a page of unresolved reports, newest first
    async fn fetch_pending_reports(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReport>, u64)> {
        let filter = doc! {
            "status": "pending",
        };

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

    /// Close a pending report
    async fn resolve_report(
        &self,
        id: &str,
        status: &ReportStatus,
        log: &ModerationLog,
    ) -> Result<()> {
        let mut session = self
            .0
            .start_session()
            .await
            .map_err(|_| create_database_error!("start_session", COL))?;

        session
            .start_transaction()
            .await
            .map_err(|_| create_database_error!("start_transaction", COL))?;

        let status =
            to_document(status).map_err(|_| create_database_error!("to_document", COL))?;

        let result = self
            .col::<Document>(COL)
            .update_one(
                doc! {
                    "_id": id,
                    "status": "pending",
                },
                doc! {
                    "$set": status,
                },
            )
            .session(&mut session)
            .await
            .map_err(|_| create_database_error!("update_one", COL))?;

        if result.matched_count == 0 {
            session.abort_transaction().await.ok();

            return if query!(self, find_one_by_id, COL, id)?
                .map(|report: ModerationReport| report)
                .is_some()
            {
                Err(create_error!(InvalidState))
            } else {
                Err(create_error!(NotFound))
            };
        }

        self.col::<ModerationLog>("moderation_logs")
            .insert_one(log)
            .session(&mut session)
            .await
            .map_err(|_| create_database_error!("insert_one", "moderation_logs"))?;

        session
            .commit_transaction()
            .await
            .map_err(|_| create_database_error!("commit_transaction", COL))
    }
}
