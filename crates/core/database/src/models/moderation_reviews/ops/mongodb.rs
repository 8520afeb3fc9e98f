use anuncios_models::v0::{ReviewStats, ReviewStatus};
use anuncios_result::Result;
use bson::to_bson;
use iso8601_timestamp::Timestamp;
use mongodb::bson::{doc, to_document, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument};

use crate::MongoDb;
use crate::{ListingModeration, ModerationLog, ModerationReview, PartialModerationReview};

use super::AbstractModerationReviews;

static COL: &str = "moderation_reviews";

#[async_trait]
impl AbstractModerationReviews for MongoDb {
    /// Insert a new review into the database
    async fn insert_review(&self, review: &ModerationReview) -> Result<()> {
        query!(self, insert_one, COL, &review).map(|_| ())
    }

    /// Fetch a review by its id
    async fn fetch_review(&self, id: &str) -> Result<ModerationReview> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch the review governing a listing's visible state
    async fn fetch_current_review(&self, listing_id: &str) -> Result<Option<ModerationReview>> {
        query!(
            self,
            find_one_with_options,
            COL,
            doc! {
                "listing_id": listing_id,
            },
            FindOneOptions::builder()
                .sort(doc! {
                    "created_at": -1,
                    "_id": -1,
                })
                .build()
        )
    }

    /// Fetch a page of reviews waiting for a decision, newest first
    async fn fetch_pending_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)> {
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

    /// Fetch a page of appealed reviews, by most recent appeal
    async fn fetch_appealed_reviews(
        &self,
        limit: i64,
        offset: u64,
    ) -> Result<(Vec<ModerationReview>, u64)> {
        let filter = doc! {
            "status": "appealed",
        };

        let total = query!(self, count_documents, COL, filter.clone())?;
        let items = query!(
            self,
            find_with_options,
            COL,
            filter,
            FindOptions::builder()
                .sort(doc! {
                    "appealed_at": -1,
                    "_id": -1,
                })
                .skip(offset)
                .limit(limit)
                .build()
        )?;

        Ok((items, total))
    }

    /// Count reviews by status
    async fn fetch_review_stats(&self) -> Result<ReviewStats> {
        Ok(ReviewStats {
            total: query!(self, count_documents, COL, doc! {})?,
            pending: query!(self, count_documents, COL, doc! { "status": "pending" })?,
            approved: query!(self, count_documents, COL, doc! { "status": "approved" })?,
            rejected: query!(self, count_documents, COL, doc! { "status": "rejected" })?,
            appealed: query!(self, count_documents, COL, doc! { "status": "appealed" })?,
        })
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
        let mut session = self
            .0
            .start_session()
            .await
            .map_err(|_| create_database_error!("start_session", COL))?;

        session
            .start_transaction()
            .await
            .map_err(|_| create_database_error!("start_transaction", COL))?;

        let set = to_document(partial).map_err(|_| create_database_error!("to_document", COL))?;

        // fields the decision does not carry are cleared, not retained
        let mut unset = Document::new();
        if partial.reason.is_none() {
            unset.insert("reason", 1_i32);
        }
        if partial.confidence_score.is_none() {
            unset.insert("confidence_score", 1_i32);
        }

        let mut update = doc! {
            "$set": set,
        };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        let result = self
            .col::<Document>(COL)
            .update_one(
                doc! {
                    "_id": id,
                    "status": {
                        "$in": ["pending", "appealed"],
                    },
                },
                update,
            )
            .session(&mut session)
            .await
            .map_err(|_| create_database_error!("update_one", COL))?;

        if result.matched_count == 0 {
            session.abort_transaction().await.ok();

            return if query!(self, find_one_by_id, COL, id)?
                .map(|review: ModerationReview| review)
                .is_some()
            {
                Err(create_error!(InvalidState))
            } else {
                Err(create_error!(NotFound))
            };
        }

        let mut listing_set = to_document(projection)
            .map_err(|_| create_database_error!("to_document", "listings"))?;
        listing_set.insert(
            "updated_at",
            to_bson(&Timestamp::now_utc())
                .map_err(|_| create_database_error!("to_bson", "listings"))?,
        );

        let result = self
            .col::<Document>("listings")
            .update_one(
                doc! {
                    "_id": listing_id,
                },
                doc! {
                    "$set": listing_set,
                },
            )
            .session(&mut session)
            .await
            .map_err(|_| create_database_error!("update_one", "listings"))?;

        if result.matched_count == 0 {
            session.abort_transaction().await.ok();
            return Err(create_error!(NotFound));
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

    /// Increment the appeal count and mark the review appealed
    async fn appeal_review(
        &self,
        id: &str,
        max_appeals: u32,
        appealed_at: Timestamp,
    ) -> Result<ModerationReview> {
        let result = self
            .col::<ModerationReview>(COL)
            .find_one_and_update(
                doc! {
                    "_id": id,
                    "status": "rejected",
                    "appeal_count": {
                        "$lt": max_appeals as i64,
                    },
                },
                doc! {
                    "$inc": {
                        "appeal_count": 1,
                    },
                    "$set": {
                        "status": "appealed",
                        "appealed_at": to_bson(&appealed_at)
                            .map_err(|_| create_database_error!("to_bson", COL))?,
                    },
                },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(|_| create_database_error!("find_one_and_update", COL))?;

        if let Some(review) = result {
            return Ok(review);
        }

        // Classify why the filtered update matched nothing
        let review: ModerationReview =
            query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(NotFound))?;

        if matches!(review.status, ReviewStatus::Rejected) {
            Err(create_error!(AppealLimitExceeded { max: max_appeals }))
        } else {
            Err(create_error!(InvalidState))
        }
    }
}
