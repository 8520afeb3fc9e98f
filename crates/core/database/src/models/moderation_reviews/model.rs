use anuncios_models::v0::{DataDecideReview, ReviewStatus};
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::{Database, ListingModeration, ModerationLog};

auto_derived_partial!(
    /// One moderation decision for one listing submission attempt
    ///
    /// The latest review by `created_at` governs the listing's visible
    /// moderation state; older rows are kept as history and never deleted.
    pub struct ModerationReview {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the listing under review
        pub listing_id: String,
        /// Current state of the review
        pub status: ReviewStatus,
        /// Explanation attached to the decision
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reason: Option<String>,
        /// Classifier confidence backing the decision, 0 to 100
        #[serde(skip_serializing_if = "Option::is_none")]
        pub confidence_score: Option<i32>,
        /// Number of appeals filed against this review so far
        pub appeal_count: u32,
        /// When the latest appeal was filed
        #[serde(skip_serializing_if = "Option::is_none")]
        pub appealed_at: Option<Timestamp>,
        /// When this review was opened
        pub created_at: Timestamp,
    },
    "PartialModerationReview"
);

#[allow(clippy::disallowed_methods)]
impl ModerationReview {
    /// Open a new pending review for a listing submission
    pub async fn create(db: &Database, listing_id: String) -> Result<ModerationReview> {
        let review = ModerationReview {
            id: ulid::Ulid::new().to_string(),
            listing_id,
            status: ReviewStatus::Pending,
            reason: None,
            confidence_score: None,
            appeal_count: 0,
            appealed_at: None,
            created_at: Timestamp::now_utc(),
        };

        db.insert_review(&review).await?;
        Ok(review)
    }

    /// Apply a decision and project it onto the listing as one atomic unit
    ///
    /// The review update, the listing projection and the audit log entry
    /// either all persist or none of them do. A decision owns the
    /// explanation fields: `reason` and `confidence_score` are overwritten
    /// with whatever it carries, absent values clear any earlier ones.
    pub async fn decide(
        &mut self,
        db: &Database,
        data: &DataDecideReview,
        projection: &ListingModeration,
        log: &ModerationLog,
    ) -> Result<()> {
        if !self.status.is_decidable() {
            return Err(create_error!(InvalidState));
        }

        let partial = PartialModerationReview {
            status: Some(data.outcome.status()),
            reason: data.reason.clone(),
            confidence_score: data.confidence_score,
            ..Default::default()
        };

        db.decide_review(&self.id, &self.listing_id, &partial, projection, log)
            .await?;

        self.status = data.outcome.status();
        self.reason = data.reason.clone();
        self.confidence_score = data.confidence_score;
        Ok(())
    }

    /// File an appeal against this review
    ///
    /// Only valid while the review is rejected and the appeal allowance has
    /// not been exhausted; the increment is atomic at the storage layer.
    pub async fn appeal(&mut self, db: &Database, max_appeals: u32) -> Result<()> {
        *self = db
            .appeal_review(&self.id, max_appeals, Timestamp::now_utc())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::{DataDecideReview, ReviewOutcome, ReviewStatus};
    use anuncios_result::ErrorType;
    use iso8601_timestamp::Timestamp;

    use crate::{Listing, ListingModeration, ModerationLog, ModerationReview};

    fn projection(review: &ModerationReview, outcome: ReviewOutcome) -> ListingModeration {
        ListingModeration {
            moderation_status: outcome.status(),
            moderation_review_id: Some(review.id.to_string()),
            is_published: matches!(outcome, ReviewOutcome::Approved),
        }
    }

    fn log(review: &ModerationReview) -> ModerationLog {
        ModerationLog::new(
            "review.decide",
            "listing",
            &review.listing_id,
            "moderator_id",
            None,
        )
        .unwrap()
    }

    #[async_std::test]
    async fn decide_projects_onto_listing() {
        database_test!(|db| async move {
            let listing = Listing::create(
                &db,
                "seller".to_string(),
                "Bicicleta 26".to_string(),
                "Bicicleta de uso en buen estado".to_string(),
                vec![],
            )
            .await
            .unwrap();

            let mut review = ModerationReview::create(&db, listing.id.to_string())
                .await
                .unwrap();
            assert!(matches!(review.status, ReviewStatus::Pending));
            assert!(!db.fetch_listing(&listing.id).await.unwrap().is_published);

            let data = DataDecideReview {
                outcome: ReviewOutcome::Approved,
                reason: None,
                confidence_score: Some(92),
            };
            review
                .decide(
                    &db,
                    &data,
                    &projection(&review, ReviewOutcome::Approved),
                    &log(&review),
                )
                .await
                .unwrap();

            let listing = db.fetch_listing(&listing.id).await.unwrap();
            assert!(listing.is_published);
            assert!(matches!(
                listing.moderation_status,
                ReviewStatus::Approved
            ));
            assert_eq!(
                listing.moderation_review_id.as_deref(),
                Some(review.id.as_str())
            );

            // exactly one audit entry rode along with the decision
            let (logs, total) = db
                .fetch_logs(&Default::default(), 10, 0)
                .await
                .unwrap();
            assert_eq!(total, 1);
            assert_eq!(logs[0].action, "review.decide");

            // a decided review does not accept another decision
            let error = review
                .decide(
                    &db,
                    &data,
                    &projection(&review, ReviewOutcome::Approved),
                    &log(&review),
                )
                .await
                .unwrap_err();
            assert!(matches!(error.error_type, ErrorType::InvalidState));
        });
    }

    #[async_std::test]
    async fn bare_approval_clears_the_rejection_reason() {
        database_test!(|db| async move {
            let listing = Listing::create(
                &db,
                "seller".to_string(),
                "Lavadora".to_string(),
                "Lavadora automatica poco uso".to_string(),
                vec![],
            )
            .await
            .unwrap();

            let mut review = ModerationReview::create(&db, listing.id.to_string())
                .await
                .unwrap();

            review
                .decide(
                    &db,
                    &DataDecideReview {
                        outcome: ReviewOutcome::Rejected,
                        reason: Some("spam".to_string()),
                        confidence_score: Some(40),
                    },
                    &projection(&review, ReviewOutcome::Rejected),
                    &log(&review),
                )
                .await
                .unwrap();
            review.appeal(&db, 2).await.unwrap();

            // an approval without an explanation drops the old one
            review
                .decide(
                    &db,
                    &DataDecideReview {
                        outcome: ReviewOutcome::Approved,
                        reason: None,
                        confidence_score: None,
                    },
                    &projection(&review, ReviewOutcome::Approved),
                    &log(&review),
                )
                .await
                .unwrap();

            assert!(review.reason.is_none());
            assert!(review.confidence_score.is_none());

            let stored = db.fetch_review(&review.id).await.unwrap();
            assert!(matches!(stored.status, ReviewStatus::Approved));
            assert!(stored.reason.is_none());
            assert!(stored.confidence_score.is_none());
        });
    }

    #[async_std::test]
    async fn current_review_breaks_timestamp_ties_by_id() {
        database_test!(|db| async move {
            let listing_id = "listing";
            let created_at = Timestamp::now_utc();

            for id in ["01AAAAAAAAAAAAAAAAAAAAAAAA", "01BBBBBBBBBBBBBBBBBBBBBBBB"] {
                db.insert_review(&ModerationReview {
                    id: id.to_string(),
                    listing_id: listing_id.to_string(),
                    status: ReviewStatus::Pending,
                    reason: None,
                    confidence_score: None,
                    appeal_count: 0,
                    appealed_at: None,
                    created_at,
                })
                .await
                .unwrap();
            }

            let current = db
                .fetch_current_review(listing_id)
                .await
                .unwrap()
                .expect("current review");
            assert_eq!(current.id, "01BBBBBBBBBBBBBBBBBBBBBBBB");

            assert!(db
                .fetch_current_review("never_reviewed")
                .await
                .unwrap()
                .is_none());
        });
    }

    #[async_std::test]
    async fn appeals_are_bounded() {
        database_test!(|db| async move {
            let listing = Listing::create(
                &db,
                "seller".to_string(),
                "Movil usado".to_string(),
                "Telefono movil con cargador".to_string(),
                vec![],
            )
            .await
            .unwrap();

            let mut review = ModerationReview::create(&db, listing.id.to_string())
                .await
                .unwrap();

            let max_appeals = 2;
            let reject = DataDecideReview {
                outcome: ReviewOutcome::Rejected,
                reason: Some("prohibited content".to_string()),
                confidence_score: Some(30),
            };

            // appeals from a non-rejected review are refused
            let error = review.appeal(&db, max_appeals).await.unwrap_err();
            assert!(matches!(error.error_type, ErrorType::InvalidState));

            for attempt in 1..=max_appeals {
                review
                    .decide(
                        &db,
                        &reject,
                        &projection(&review, ReviewOutcome::Rejected),
                        &log(&review),
                    )
                    .await
                    .unwrap();

                review.appeal(&db, max_appeals).await.unwrap();
                assert!(matches!(review.status, ReviewStatus::Appealed));
                assert_eq!(review.appeal_count, attempt);
                assert!(review.appealed_at.is_some());
            }

            review
                .decide(
                    &db,
                    &reject,
                    &projection(&review, ReviewOutcome::Rejected),
                    &log(&review),
                )
                .await
                .unwrap();

            let error = review.appeal(&db, max_appeals).await.unwrap_err();
            assert!(matches!(
                error.error_type,
                ErrorType::AppealLimitExceeded { max: 2 }
            ));
        });
    }
}
