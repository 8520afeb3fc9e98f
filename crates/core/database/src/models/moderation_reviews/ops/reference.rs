use anuncios_models::v0::{ReviewStats, ReviewStatus};
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::ReferenceDb;
use crate::{ListingModeration, ModerationLog, ModerationReview, PartialModerationReview};

use super::AbstractModerationReviews;

#[async_trait]
impl AbstractModerationReviews for ReferenceDb {
    /// Insert a new review into the database
    async fn insert_review(&self, review: &ModerationReview) -> Result<()> {
        let mut reviews = self.moderation_reviews.lock().await;
        if reviews.contains_key(&review.id) {
            Err(create_database_error!("insert", "moderation_reviews"))
        } else {
            reviews.insert(review.id.to_string(), review.clone());
            Ok(())
        }
    }

    /// Fetch a review by its id
    async fn fetch_review(&self, id: &str) -> Result<ModerationReview> {
        let reviews = self.moderation_reviews.lock().await;
        reviews
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch the review governing a listing's visible state
    async fn fetch_current_review(&self, listing_id: &str) -> Result<Option<ModerationReview>> {
        let reviews = self.moderation_reviews.lock().await;
        Ok(reviews
            .values()
            .filter(|review| review.listing_id == listing_id)
            .max_by(|a, b| (*a.created_at, &a.id).cmp(&(*b.created_at, &b.id)))
            .cloned())
    }

    /// Fetch a page of reviews waiting for a decision, newest first
    async fn fetch_pending_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)> {
        let reviews = self.moderation_reviews.lock().await;
        let mut items: Vec<ModerationReview> = reviews
            .values()
            .filter(|review| matches!(review.status, ReviewStatus::Pending))
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

    /// Fetch a page of appealed reviews, by most recent appeal
    async fn fetch_appealed_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)> {
        let reviews = self.moderation_reviews.lock().await;
        let mut items: Vec<ModerationReview> = reviews
            .values()
            .filter(|review| matches!(review.status, ReviewStatus::Appealed))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (b.appealed_at.map(|t| *t), &b.id).cmp(&(a.appealed_at.map(|t| *t), &a.id))
        });

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

    /// Count reviews by status
    async fn fetch_review_stats(&self) -> Result<ReviewStats> {
        let reviews = self.moderation_reviews.lock().await;
        let mut stats = ReviewStats {
            total: reviews.len() as u64,
            ..Default::default()
        };

        for review in reviews.values() {
            match review.status {
                ReviewStatus::Pending => stats.pending += 1,
                ReviewStatus::Approved => stats.approved += 1,
                ReviewStatus::Rejected => stats.rejected += 1,
                ReviewStatus::Appealed => stats.appealed += 1,
            }
        }

        Ok(stats)
    }

    /// Apply a decision to a pending or appealed review
    async fn decide_review(
        &self,
        id: &str,
        listing_id: &str,
        partial: &PartialModerationReview,
        projection: &ListingModeration,
        log: &ModerationLog,
    ) -> Result<()> {
        // All three maps are held for the duration of the unit
        let mut reviews = self.moderation_reviews.lock().await;
        let mut listings = self.listings.lock().await;
        let mut logs = self.moderation_logs.lock().await;

        let review = reviews.get_mut(id).ok_or_else(|| create_error!(NotFound))?;
        if !review.status.is_decidable() {
            return Err(create_error!(InvalidState));
        }

        let listing = listings
            .get_mut(listing_id)
            .ok_or_else(|| create_error!(NotFound))?;
        if logs.contains_key(&log.id) {
            return Err(create_database_error!("insert", "moderation_logs"));
        }

        if let Some(status) = partial.status {
            review.status = status;
        }
        // the decision owns these fields, absent means cleared
        review.reason = partial.reason.clone();
        review.confidence_score = partial.confidence_score;

        listing.moderation_status = projection.moderation_status;
        listing.moderation_review_id = projection.moderation_review_id.clone();
        listing.is_published = projection.is_published;
        listing.updated_at = Timestamp::now_utc();
        logs.insert(log.id.to_string(), log.clone());

        Ok(())
    }

    /// Increment the appeal count and mark the review appealed
    async fn appeal_review(
        &self,
        id: &str,
        max_appeals: u32,
        appealed_at: Timestamp,
    ) -> Result<ModerationReview> {
        let mut reviews = self.moderation_reviews.lock().await;
        let review = reviews.get_mut(id).ok_or_else(|| create_error!(NotFound))?;

        if !matches!(review.status, ReviewStatus::Rejected) {
            return Err(create_error!(InvalidState));
        }

        if review.appeal_count >= max_appeals {
            return Err(create_error!(AppealLimitExceeded { max: max_appeals }));
        }

        review.appeal_count += 1;
        review.status = ReviewStatus::Appealed;
        review.appealed_at = Some(appealed_at);
        Ok(review.clone())
    }
}
