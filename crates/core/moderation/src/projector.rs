use anuncios_database::{ListingModeration, ModerationReview};
use anuncios_models::v0::ReviewStatus;

/// Derive the listing-visible moderation fields from a review
///
/// Pure and idempotent: projecting the same review twice yields the same
/// listing state. Only an approved review publishes the listing.
pub fn project(review: &ModerationReview) -> ListingModeration {
    ListingModeration {
        moderation_status: review.status,
        moderation_review_id: Some(review.id.to_string()),
        is_published: matches!(review.status, ReviewStatus::Approved),
    }
}

#[cfg(test)]
mod tests {
    use anuncios_database::ModerationReview;
    use anuncios_models::v0::ReviewStatus;
    use iso8601_timestamp::Timestamp;

    use super::project;

    fn review(status: ReviewStatus) -> ModerationReview {
        ModerationReview {
            id: "review".to_string(),
            listing_id: "listing".to_string(),
            status,
            reason: None,
            confidence_score: None,
            appeal_count: 0,
            appealed_at: None,
            created_at: Timestamp::now_utc(),
        }
    }

    #[test]
    fn only_approval_publishes() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::Rejected,
            ReviewStatus::Appealed,
        ] {
            let projection = project(&review(status));
            assert!(!projection.is_published);
            assert_eq!(projection.moderation_status, status);
        }

        let projection = project(&review(ReviewStatus::Approved));
        assert!(projection.is_published);
        assert_eq!(projection.moderation_review_id, Some("review".to_string()));
    }
}
