use anuncios_models::v0::ReviewStats;
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::{ListingModeration, ModerationLog, ModerationReview, PartialModerationReview};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractModerationReviews: Sync + Send {
    /// Insert a new review into the database
    async fn insert_review(&self, review: &ModerationReview) -> Result<()>;

    /// Fetch a review by its id
    async fn fetch_review(&self, id: &str) -> Result<ModerationReview>;

    /// Fetch the review governing a listing's visible state
    ///
    /// Latest by `created_at`; identical timestamps are broken by the
    /// higher id. `None` if the listing was never reviewed.
    async fn fetch_current_review(&self, listing_id: &str) -> Result<Option<ModerationReview>>;

    /// Fetch a page of reviews waiting for a decision, newest first
    async fn fetch_pending_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)>;

    /// Fetch a page of appealed reviews, by most recent appeal
    async fn fetch_appealed_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)>;

    /// Count reviews by status
    async fn fetch_review_stats(&self) -> Result<ReviewStats>;

    /// Apply a decision to a pending or appealed review
    ///
    /// Atomic unit: the review update, the listing projection and the audit
    /// log entry must all persist or none may. Fails with `InvalidState` when
    /// the review is in a terminal state.
    async fn decide_review(
        &self,
        id: &str,
        listing_id: &str,
        partial: &PartialModerationReview,
        projection: &ListingModeration,
        log: &ModerationLog,
    ) -> Result<()>;

    /// Increment the appeal count and mark the review appealed
    ///
    /// Atomic read-modify-write: concurrent appeals must observe each other's
    /// increments. Only valid from `rejected` while below `max_appeals`.
    async fn appeal_review(
        &self,
        id: &str,
        max_appeals: u32,
        appealed_at: Timestamp,
    ) -> Result<ModerationReview>;
}
