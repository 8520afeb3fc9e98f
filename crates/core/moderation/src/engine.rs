use anuncios_database::{
    AdminUser, BlacklistEntry, Database, Listing, ListingModeration, LogFilter, ModerationLog,
    ModerationReport, ModerationReview, ModerationSetting,
};
use anuncios_models::v0::{
    AdminRole, BlacklistEntryType, DataAppealReview, DataCreateBlacklistEntry, DataCreateReport,
    DataDecideReview, DataResolveReport, ImageAnalysis, ListingContent, ReviewOutcome, ReviewStats,
    SettingKind,
};
use anuncios_result::Result;

use crate::{
    composite_score, is_spam, keyword_violations, needs_manual_review, project, spam_indicators,
    Classifier, ModerationSettings,
};

/// Orchestrates the moderation pipeline over the database and a classifier
///
/// All admin-facing mutations run through here so that privilege checks
/// and audit logging cannot be bypassed by callers.
pub struct ModerationEngine {
    db: Database,
    classifier: Box<dyn Classifier>,
}

fn reject(reason: String, confidence: i32) -> DataDecideReview {
    DataDecideReview {
        outcome: ReviewOutcome::Rejected,
        reason: Some(reason),
        confidence_score: Some(confidence),
    }
}

/// Listing state after a decision is applied to the review
fn projected(review: &ModerationReview, data: &DataDecideReview) -> ListingModeration {
    let mut next = review.clone();
    next.status = data.outcome.status();
    project(&next)
}

impl ModerationEngine {
    pub fn new(db: Database, classifier: Box<dyn Classifier>) -> ModerationEngine {
        ModerationEngine { db, classifier }
    }

    async fn require_admin(&self, user_id: &str) -> Result<()> {
        if AdminUser::is_admin(&self.db, user_id).await? {
            Ok(())
        } else {
            Err(create_error!(NotPrivileged))
        }
    }

    /// Accept a submission and run the automated pipeline over it
    ///
    /// The listing starts unpublished with a pending review. When automatic
    /// approval is enabled the pipeline decides immediately; manual-review
    /// triggers leave the review pending for a human.
    pub async fn submit(
        &self,
        seller_id: &str,
        content: ListingContent,
    ) -> Result<(Listing, ModerationReview)> {
        let listing = Listing::create(
            &self.db,
            seller_id.to_string(),
            content.title.to_string(),
            content.description.to_string(),
            content.images.clone(),
        )
        .await?;
        let mut review = ModerationReview::create(&self.db, listing.id.to_string()).await?;

        let settings = ModerationSettings::load(&self.db).await?;
        if !settings.auto_approve_enabled || settings.manual_review_required {
            return Ok((listing, review));
        }

        if let Some(data) = self.evaluate(seller_id, &content, &settings).await? {
            info!(
                "Automatically {} listing {}.",
                data.outcome.status().as_str(),
                listing.id
            );

            let log = ModerationLog::new(
                "review.decide",
                "listing",
                &listing.id,
                "system",
                data.reason.clone(),
            )?;

            let projection = projected(&review, &data);
            review.decide(&self.db, &data, &projection, &log).await?;
        }

        let listing = self.db.fetch_listing(&listing.id).await?;
        Ok((listing, review))
    }

    /// Run blacklist, keyword, spam, classifier and image checks over a
    /// submission
    ///
    /// `None` means the submission needs a human decision. The classifier is
    /// only consulted after the cheap checks pass; it is never called while
    /// any database lock or transaction is held.
    async fn evaluate(
        &self,
        seller_id: &str,
        content: &ListingContent,
        settings: &ModerationSettings,
    ) -> Result<Option<DataDecideReview>> {
        if settings.blacklist_enabled {
            if self
                .db
                .check_blacklist(BlacklistEntryType::User, seller_id)
                .await?
            {
                return Ok(Some(reject("blacklisted_user".to_string(), 100)));
            }

            let text = content.text().to_lowercase();
            for entry in self
                .db
                .fetch_blacklist(Some(BlacklistEntryType::Word))
                .await?
            {
                if text.contains(&entry.value) {
                    return Ok(Some(reject(format!("blacklisted_term:{}", entry.value), 100)));
                }
            }
        }

        let violations = keyword_violations(content, settings.cuba_rules_enforcement);
        if !violations.is_empty() {
            return Ok(Some(reject(violations.join(", "), 95)));
        }

        if needs_manual_review(content, settings.cuba_rules_enforcement) {
            return Ok(None);
        }

        let indicators = if settings.spam_detection_enabled {
            spam_indicators(content)
        } else {
            vec![]
        };
        let spam = is_spam(&indicators);

        let classification = self.classifier.classify(content).await?;
        let images = if settings.image_moderation_enabled {
            self.classifier.classify_images(&content.images).await?
        } else {
            ImageAnalysis::default()
        };

        let score = composite_score(&classification, &images.scores, spam);
        let confidence = score.clamp(60, 95);

        if score >= settings.ai_confidence_threshold && !spam {
            Ok(Some(DataDecideReview {
                outcome: ReviewOutcome::Approved,
                reason: None,
                confidence_score: Some(confidence),
            }))
        } else {
            let mut reasons = classification.issues;
            reasons.extend(images.issues);
            reasons.extend(indicators);
            if reasons.is_empty() {
                reasons.push("low_confidence_score".to_string());
            }

            Ok(Some(reject(reasons.join(", "), confidence)))
        }
    }

    /// Apply a moderator's decision to a review
    pub async fn decide(
        &self,
        review_id: &str,
        data: DataDecideReview,
        moderator_id: &str,
    ) -> Result<ModerationReview> {
        self.require_admin(moderator_id).await?;

        let mut review = self.db.fetch_review(review_id).await?;
        let projection = projected(&review, &data);
        let log = ModerationLog::new(
            "review.decide",
            "listing",
            &review.listing_id,
            moderator_id,
            Some(data.outcome.status().as_str().to_string()),
        )?;

        review.decide(&self.db, &data, &projection, &log).await?;
        Ok(review)
    }

    /// File a seller's appeal against the current rejected review
    pub async fn appeal(
        &self,
        listing_id: &str,
        data: DataAppealReview,
    ) -> Result<ModerationReview> {
        let mut review = self
            .db
            .fetch_current_review(listing_id)
            .await?
            .ok_or_else(|| create_error!(NotFound))?;

        let settings = ModerationSettings::load(&self.db).await?;
        review
            .appeal(&self.db, settings.max_appeals_per_listing)
            .await?;

        self.db
            .update_listing_moderation(listing_id, &project(&review))
            .await?;

        let listing = self.db.fetch_listing(listing_id).await?;
        ModerationLog::create(
            &self.db,
            "review.appeal",
            "listing",
            listing_id,
            &listing.seller_id,
            Some(data.reason),
        )
        .await?;

        Ok(review)
    }

    /// File a user report against a listing or user
    pub async fn report(
        &self,
        reporter_id: &str,
        data: DataCreateReport,
    ) -> Result<ModerationReport> {
        ModerationReport::create(&self.db, reporter_id.to_string(), data).await
    }

    /// Close a pending report
    pub async fn resolve_report(
        &self,
        report_id: &str,
        data: DataResolveReport,
        moderator_id: &str,
    ) -> Result<ModerationReport> {
        self.require_admin(moderator_id).await?;

        let mut report = self.db.fetch_report(report_id).await?;
        let log = ModerationLog::new(
            "report.resolve",
            report.target.target_type(),
            report.target.id(),
            moderator_id,
            Some(data.resolution.to_string()),
        )?;

        report
            .resolve(&self.db, moderator_id.to_string(), data.resolution, &log)
            .await?;
        Ok(report)
    }

    /// Add an active blacklist entry
    pub async fn add_blacklist_entry(
        &self,
        data: DataCreateBlacklistEntry,
        admin_id: &str,
    ) -> Result<BlacklistEntry> {
        self.require_admin(admin_id).await?;

        let entry = BlacklistEntry::create(&self.db, data, Some(admin_id.to_string())).await?;
        ModerationLog::create(
            &self.db,
            "blacklist.add",
            "blacklist",
            &entry.id,
            admin_id,
            Some(entry.value.to_string()),
        )
        .await?;

        Ok(entry)
    }

    /// Remove a blacklist entry
    pub async fn remove_blacklist_entry(&self, id: &str, admin_id: &str) -> Result<()> {
        self.require_admin(admin_id).await?;

        let entry = self.db.fetch_blacklist_entry(id).await?;
        entry.delete(&self.db).await?;

        ModerationLog::create(
            &self.db,
            "blacklist.remove",
            "blacklist",
            id,
            admin_id,
            Some(entry.value),
        )
        .await?;

        Ok(())
    }

    /// Change a moderation setting
    pub async fn update_setting(
        &self,
        key: &str,
        value: String,
        kind: SettingKind,
        description: Option<String>,
        admin_id: &str,
    ) -> Result<ModerationSetting> {
        self.require_admin(admin_id).await?;

        let setting = ModerationSetting::set(&self.db, key, value, kind, description).await?;
        ModerationLog::create(
            &self.db,
            "settings.update",
            "setting",
            key,
            admin_id,
            Some(setting.value.to_string()),
        )
        .await?;

        Ok(setting)
    }

    /// Grant moderation privileges to a user
    pub async fn add_admin(
        &self,
        user_id: &str,
        role: AdminRole,
        admin_id: &str,
    ) -> Result<AdminUser> {
        self.require_admin(admin_id).await?;

        let admin =
            AdminUser::create(&self.db, user_id.to_string(), role, admin_id.to_string()).await?;
        ModerationLog::create(&self.db, "admin.add", "user", user_id, admin_id, None).await?;

        Ok(admin)
    }

    /// Revoke a user's moderation privileges
    pub async fn remove_admin(&self, user_id: &str, admin_id: &str) -> Result<()> {
        self.require_admin(admin_id).await?;

        let admin = self
            .db
            .fetch_admin_user(user_id)
            .await?
            .ok_or_else(|| create_error!(NotFound))?;
        admin.delete(&self.db).await?;

        ModerationLog::create(&self.db, "admin.remove", "user", user_id, admin_id, None).await?;
        Ok(())
    }

    /// Page of reviews waiting for a decision, newest first
    pub async fn pending_queue(&self, offset: u64) -> Result<(Vec<ModerationReview>, u64)> {
        let limit = anuncios_config::config().await.moderation.queue_page_size;
        self.db.fetch_pending_reviews(limit, offset).await
    }

    /// Page of appealed reviews, by most recent appeal
    pub async fn appealed_queue(&self, offset: u64) -> Result<(Vec<ModerationReview>, u64)> {
        let limit = anuncios_config::config().await.moderation.queue_page_size;
        self.db.fetch_appealed_reviews(limit, offset).await
    }

    /// Aggregate counts over the review queue
    pub async fn stats(&self) -> Result<ReviewStats> {
        self.db.fetch_review_stats().await
    }

    /// Page of the audit log, newest first
    pub async fn audit_trail(
        &self,
        filter: &LogFilter,
        offset: u64,
    ) -> Result<(Vec<ModerationLog>, u64)> {
        let limit = anuncios_config::config().await.moderation.queue_page_size;
        self.db.fetch_logs(filter, limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use anuncios_database::{AdminUser, BlacklistEntry, Database, LogFilter, ModerationSetting};
    use anuncios_models::v0::{
        AdminRole, BlacklistEntryType, DataAppealReview, DataCreateBlacklistEntry,
        DataCreateReport, DataDecideReview, DataResolveReport, ListingContent, ReportReason,
        ReportStatus, ReportedTarget, ReviewOutcome, ReviewStatus, SettingKind,
    };
    use anuncios_result::ErrorType;

    use crate::{ModerationEngine, StaticClassifier};

    fn engine(db: &Database, score: i32) -> ModerationEngine {
        ModerationEngine::new(db.clone(), Box::new(StaticClassifier::new(score)))
    }

    fn content(title: &str, description: &str) -> ListingContent {
        ListingContent {
            title: title.to_string(),
            description: description.to_string(),
            images: vec![],
        }
    }

    async fn grant_admin(db: &Database, user_id: &str) {
        AdminUser::create(
            db,
            user_id.to_string(),
            AdminRole::Moderator,
            "root".to_string(),
        )
        .await
        .unwrap();
    }

    #[async_std::test]
    async fn clean_submission_is_auto_approved() {
        database_test!(|db| async move {
            let engine = engine(&db, 90);

            let (listing, review) = engine
                .submit("seller", content("Bicicleta 26", "Bicicleta de uso en buen estado"))
                .await
                .unwrap();

            assert_eq!(review.status, ReviewStatus::Approved);
            assert!(listing.is_published);
            assert_eq!(
                listing.moderation_review_id,
                Some(review.id.to_string())
            );

            // the decision rode in with one audit entry
            let (logs, total) = db.fetch_logs(&LogFilter::default(), 10, 0).await.unwrap();
            assert_eq!(total, 1);
            assert_eq!(logs[0].performed_by, "system");
        });
    }

    #[async_std::test]
    async fn blacklisted_seller_is_hard_blocked() {
        database_test!(|db| async move {
            BlacklistEntry::create(
                &db,
                DataCreateBlacklistEntry {
                    entry_type: BlacklistEntryType::User,
                    value: "estafador".to_string(),
                    reason: "repeat scammer".to_string(),
                },
                Some("admin".to_string()),
            )
            .await
            .unwrap();

            let engine = engine(&db, 95);
            let (listing, review) = engine
                .submit("estafador", content("Movil nuevo", "Telefono sin usar"))
                .await
                .unwrap();

            assert_eq!(review.status, ReviewStatus::Rejected);
            assert_eq!(review.reason.as_deref(), Some("blacklisted_user"));
            assert!(!listing.is_published);
        });
    }

    #[async_std::test]
    async fn manual_review_triggers_leave_the_review_pending() {
        database_test!(|db| async move {
            let engine = engine(&db, 95);

            // default enforcement is strict, "vpn" is a borderline term
            let (listing, review) = engine
                .submit("seller", content("Servicio VPN", "acceso rapido"))
                .await
                .unwrap();

            assert_eq!(review.status, ReviewStatus::Pending);
            assert!(!listing.is_published);

            let (queue, total) = engine.pending_queue(0).await.unwrap();
            assert_eq!(total, 1);
            assert_eq!(queue[0].id, review.id);
        });
    }

    #[async_std::test]
    async fn low_scores_are_rejected() {
        database_test!(|db| async move {
            let engine = engine(&db, 20);

            let (listing, review) = engine
                .submit("seller", content("Nevera", "Nevera en buen estado"))
                .await
                .unwrap();

            assert_eq!(review.status, ReviewStatus::Rejected);
            assert_eq!(review.reason.as_deref(), Some("low_confidence_score"));
            assert!(!listing.is_published);
        });
    }

    #[async_std::test]
    async fn image_scores_weigh_into_the_verdict() {
        database_test!(|db| async move {
            let engine = ModerationEngine::new(
                db.clone(),
                Box::new(StaticClassifier::with_image_scores(90, vec![10])),
            );

            let mut submission = content("Nevera", "Nevera en buen estado");
            submission.images = vec!["https://example.com/nevera.jpg".to_string()];

            // 90 * 0.6 + 10 * 0.3 + 1 lands well below the threshold
            let (listing, review) = engine.submit("seller", submission.clone()).await.unwrap();
            assert_eq!(review.status, ReviewStatus::Rejected);
            assert!(!listing.is_published);

            // with image moderation off the no-image default applies instead
            ModerationSetting::set(
                &db,
                "image_moderation_enabled",
                "false".to_string(),
                SettingKind::Toggle,
                None,
            )
            .await
            .unwrap();

            let (listing, review) = engine.submit("seller", submission).await.unwrap();
            assert_eq!(review.status, ReviewStatus::Approved);
            assert!(listing.is_published);
        });
    }

    #[async_std::test]
    async fn decisions_require_privilege() {
        database_test!(|db| async move {
            let engine = engine(&db, 20);
            let (_, review) = engine
                .submit("seller", content("Nevera", "Nevera en buen estado"))
                .await
                .unwrap();

            let data = DataDecideReview {
                outcome: ReviewOutcome::Approved,
                reason: None,
                confidence_score: None,
            };

            assert!(matches!(
                engine
                    .decide(&review.id, data, "random_user")
                    .await
                    .unwrap_err()
                    .error_type,
                ErrorType::NotPrivileged
            ));
        });
    }

    #[async_std::test]
    async fn rejection_appeal_and_reversal() {
        database_test!(|db| async move {
            grant_admin(&db, "moderator").await;

            let engine = engine(&db, 20);
            let (listing, review) = engine
                .submit("seller", content("Nevera", "Nevera en buen estado"))
                .await
                .unwrap();
            assert_eq!(review.status, ReviewStatus::Rejected);

            let review = engine
                .appeal(
                    &listing.id,
                    DataAppealReview {
                        reason: "la nevera funciona perfectamente".to_string(),
                    },
                )
                .await
                .unwrap();
            assert_eq!(review.status, ReviewStatus::Appealed);
            assert_eq!(review.appeal_count, 1);

            let listing = db.fetch_listing(&listing.id).await.unwrap();
            assert_eq!(listing.moderation_status, ReviewStatus::Appealed);
            assert!(!listing.is_published);

            let (queue, total) = engine.appealed_queue(0).await.unwrap();
            assert_eq!(total, 1);
            assert_eq!(queue[0].id, review.id);

            let review = engine
                .decide(
                    &review.id,
                    DataDecideReview {
                        outcome: ReviewOutcome::Approved,
                        reason: Some("appeal accepted".to_string()),
                        confidence_score: None,
                    },
                    "moderator",
                )
                .await
                .unwrap();
            assert_eq!(review.status, ReviewStatus::Approved);

            let listing = db.fetch_listing(&listing.id).await.unwrap();
            assert!(listing.is_published);

            // submit decision, appeal, reversal
            let (_, total) = db.fetch_logs(&LogFilter::default(), 10, 0).await.unwrap();
            assert_eq!(total, 3);
        });
    }

    #[async_std::test]
    async fn reports_resolve_through_the_engine() {
        database_test!(|db| async move {
            grant_admin(&db, "moderator").await;

            let engine = engine(&db, 90);
            let report = engine
                .report(
                    "buyer",
                    DataCreateReport {
                        target: ReportedTarget::Listing {
                            id: "listing".to_string(),
                        },
                        reason: ReportReason::Scam,
                        description: None,
                    },
                )
                .await
                .unwrap();

            let report = engine
                .resolve_report(
                    &report.id,
                    DataResolveReport {
                        resolution: "listing removed".to_string(),
                    },
                    "moderator",
                )
                .await
                .unwrap();
            assert!(matches!(report.status, ReportStatus::Resolved { .. }));

            let filter = LogFilter {
                action: Some("report.resolve".to_string()),
                ..Default::default()
            };
            let (_, total) = db.fetch_logs(&filter, 10, 0).await.unwrap();
            assert_eq!(total, 1);
        });
    }

    #[async_std::test]
    async fn admin_management_is_gated_and_audited() {
        database_test!(|db| async move {
            grant_admin(&db, "chief").await;

            let engine = engine(&db, 90);
            assert!(matches!(
                engine
                    .add_admin("ana", AdminRole::Moderator, "nobody")
                    .await
                    .unwrap_err()
                    .error_type,
                ErrorType::NotPrivileged
            ));

            engine
                .add_admin("ana", AdminRole::Moderator, "chief")
                .await
                .unwrap();
            assert!(AdminUser::is_admin(&db, "ana").await.unwrap());

            engine.remove_admin("ana", "chief").await.unwrap();
            assert!(!AdminUser::is_admin(&db, "ana").await.unwrap());

            let (_, total) = db.fetch_logs(&LogFilter::default(), 10, 0).await.unwrap();
            assert_eq!(total, 2);
        });
    }
}
