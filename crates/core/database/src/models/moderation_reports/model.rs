use anuncios_models::v0::{DataCreateReport, ReportReason, ReportStatus, ReportedTarget};
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::{Database, ModerationLog};

auto_derived!(
    /// User-submitted abuse report against a listing or user
    ///
    /// Reports are informational: they never feed back into the review state
    /// machine on their own, an admin must act on the target explicitly.
    pub struct ModerationReport {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the user filing this report
        pub reporter_id: String,
        /// Reported object
        pub target: ReportedTarget,
        /// Why it was reported
        pub reason: ReportReason,
        /// Free-form context
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// Status of the report
        #[serde(flatten)]
        pub status: ReportStatus,
        /// When this report was filed
        pub created_at: Timestamp,
    }
);

#[allow(clippy::disallowed_methods)]
impl ModerationReport {
    /// File a new report, always pending
    ///
    /// Repeated identical reports are accepted as-is; deduplication is left
    /// to admins triaging the queue.
    pub async fn create(
        db: &Database,
        reporter_id: String,
        data: DataCreateReport,
    ) -> Result<ModerationReport> {
        let report = ModerationReport {
            id: ulid::Ulid::new().to_string(),
            reporter_id,
            target: data.target,
            reason: data.reason,
            description: data.description,
            status: ReportStatus::Pending {},
            created_at: Timestamp::now_utc(),
        };

        db.insert_report(&report).await?;
        Ok(report)
    }

    /// Close this report, exactly once
    pub async fn resolve(
        &mut self,
        db: &Database,
        resolved_by: String,
        resolution: String,
        log: &ModerationLog,
    ) -> Result<()> {
        if !self.status.is_pending() {
            return Err(create_error!(InvalidState));
        }

        let status = ReportStatus::Resolved {
            resolved_by,
            resolved_at: Some(Timestamp::now_utc()),
            resolution,
        };

        db.resolve_report(&self.id, &status, log).await?;
        self.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::{DataCreateReport, ReportReason, ReportStatus, ReportedTarget};
    use anuncios_result::ErrorType;

    use crate::{ModerationLog, ModerationReport};

    fn data(id: &str) -> DataCreateReport {
        DataCreateReport {
            target: ReportedTarget::Listing { id: id.to_string() },
            reason: ReportReason::Scam,
            description: Some("asks for payment up front".to_string()),
        }
    }

    fn log(report: &ModerationReport) -> ModerationLog {
        ModerationLog::new("report.resolve", "report", &report.id, "admin", None).unwrap()
    }

    #[async_std::test]
    async fn reports_resolve_exactly_once() {
        database_test!(|db| async move {
            let mut report = ModerationReport::create(&db, "reporter".to_string(), data("listing"))
                .await
                .unwrap();
            assert!(report.status.is_pending());

            report
                .resolve(
                    &db,
                    "admin".to_string(),
                    "listing removed".to_string(),
                    &log(&report),
                )
                .await
                .unwrap();

            let stored = db.fetch_report(&report.id).await.unwrap();
            let (resolved_by, resolved_at) = match &stored.status {
                ReportStatus::Resolved {
                    resolved_by,
                    resolved_at,
                    ..
                } => (resolved_by.clone(), *resolved_at),
                _ => panic!("report not resolved"),
            };
            assert_eq!(resolved_by, "admin");

            // the second resolution fails and leaves the first untouched
            let error = report
                .resolve(
                    &db,
                    "other_admin".to_string(),
                    "no action".to_string(),
                    &log(&report),
                )
                .await
                .unwrap_err();
            assert!(matches!(error.error_type, ErrorType::InvalidState));

            let stored = db.fetch_report(&report.id).await.unwrap();
            match &stored.status {
                ReportStatus::Resolved {
                    resolved_by,
                    resolved_at: second_resolved_at,
                    ..
                } => {
                    assert_eq!(resolved_by, "admin");
                    assert_eq!(*second_resolved_at, resolved_at);
                }
                _ => panic!("report not resolved"),
            }
        });
    }

    #[async_std::test]
    async fn identical_reports_are_not_deduplicated() {
        database_test!(|db| async move {
            ModerationReport::create(&db, "reporter".to_string(), data("listing"))
                .await
                .unwrap();
            ModerationReport::create(&db, "reporter".to_string(), data("listing"))
                .await
                .unwrap();

            let (items, total) = db.fetch_pending_reports(10, 0).await.unwrap();
            assert_eq!(total, 2);
            assert_eq!(items.len(), 2);

            let by_target = db
                .fetch_reports_by_target(&ReportedTarget::Listing {
                    id: "listing".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(by_target.len(), 2);

            assert_eq!(db.fetch_reports_by_reporter("reporter").await.unwrap().len(), 2);
            assert!(db.fetch_reports_by_reporter("other").await.unwrap().is_empty());
        });
    }
}
