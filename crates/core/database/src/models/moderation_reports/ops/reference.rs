use anuncios_models::v0::{ReportStatus, ReportedTarget};
use anuncios_result::Result;

use crate::ReferenceDb;
use crate::{ModerationLog, ModerationReport};

use super::AbstractModerationReports;

#[async_trait]
impl AbstractModerationReports for ReferenceDb {
    /// Insert a new report into the database
    async fn insert_report(&self, report: &ModerationReport) -> Result<()> {
        let mut reports = self.moderation_reports.lock().await;
        if reports.contains_key(&report.id) {
            Err(create_database_error!("insert", "moderation_reports"))
        } else {
            reports.insert(report.id.to_string(), report.clone());
            Ok(())
        }
    }

    /// Fetch a report by its id
    async fn fetch_report(&self, id: &str) -> Result<ModerationReport> {
        let reports = self.moderation_reports.lock().await;
        reports
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch reports filed by a given user, newest first
    async fn fetch_reports_by_reporter(&self, reporter_id: &str) -> Result<Vec<ModerationReport>> {
        let reports = self.moderation_reports.lock().await;
        let mut items: Vec<ModerationReport> = reports
            .values()
            .filter(|report| report.reporter_id == reporter_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));
        Ok(items)
    }

    /// Fetch reports filed against a given target, newest first
    async fn fetch_reports_by_target(
        &self,
        target: &ReportedTarget,
    ) -> Result<Vec<ModerationReport>> {
        let reports = self.moderation_reports.lock().await;
        let mut items: Vec<ModerationReport> = reports
            .values()
            .filter(|report| report.target == *target)
            .cloned()
            .collect();
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));
        Ok(items)
    }

    /// Fetch a page of unresolved reports, newest first
    async fn fetch_pending_reports(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReport>, u64)> {
        let reports = self.moderation_reports.lock().await;
        let mut items: Vec<ModerationReport> = reports
            .values()
            .filter(|report| report.status.is_pending())
            .cloned()
            .collect();
        items.sort_by(|a, b| (*b.created_at, &b.id).cmp(&(*a.created_at, &a.id)));

        let total = items.len() as u64;
        Ok((
            items
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
            total,
        ))
    }

    /// Close a pending report
    async fn resolve_report(
        &self,
        id: &str,
        status: &ReportStatus,
        log: &ModerationLog,
    ) -> Result<()> {
        let mut reports = self.moderation_reports.lock().await;
        let mut logs = self.moderation_logs.lock().await;

        let report = reports.get_mut(id).ok_or_else(|| create_error!(NotFound))?;
        if !report.status.is_pending() {
            return Err(create_error!(InvalidState));
        }

        if logs.contains_key(&log.id) {
            return Err(create_database_error!("insert", "moderation_logs"));
        }

        report.status = status.clone();
        logs.insert(log.id.to_string(), log.clone());
        Ok(())
    }
}
