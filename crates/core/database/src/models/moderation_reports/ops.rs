use anuncios_models::v0::{ReportStatus, ReportedTarget};
use anuncios_result::Result;

use crate::{ModerationLog, ModerationReport};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractModerationReports: Sync + Send {
    /// Insert a new report into the database
    async fn insert_report(&self, report: &ModerationReport) -> Result<()>;

    /// Fetch a report by its id
    async fn fetch_report(&self, id: &str) -> Result<ModerationReport>;

    /// Fetch reports filed by a given user, newest first
    async fn fetch_reports_by_reporter(&self, reporter_id: &str) -> Result<Vec<ModerationReport>>;

    /// Fetch reports filed against a given target, newest first
    async fn fetch_reports_by_target(
        &self,
        target: &ReportedTarget,
    ) -> Result<Vec<ModerationReport>>;

    /// Fetch a page of unresolved reports, newest first
    async fn fetch_pending_reports(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReport>, u64)>;

    /// Close a pending report
    ///
    /// Atomic with its audit log entry; fails with `InvalidState` when the
    /// report was already resolved, leaving the first resolution untouched.
    async fn resolve_report(
        &self,
        id: &str,
        status: &ReportStatus,
        log: &ModerationLog,
    ) -> Result<()>;
}
