use anuncios_models::v0::ReviewStatus;
use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::Database;

auto_derived_partial!(
    /// Marketplace listing, reduced to the surface moderation acts upon
    pub struct Listing {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the selling user
        pub seller_id: String,
        /// Listing title
        pub title: String,
        /// Listing body text
        pub description: String,
        /// Image URLs attached to the listing
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub images: Vec<String>,
        /// Visible moderation state, mirrors the current review
        pub moderation_status: ReviewStatus,
        /// Back-reference to the current review, for display only
        #[serde(skip_serializing_if = "Option::is_none")]
        pub moderation_review_id: Option<String>,
        /// Whether the listing is visible to buyers
        pub is_published: bool,
        /// When the listing was submitted
        pub created_at: Timestamp,
        /// When the listing was last changed
        pub updated_at: Timestamp,
    },
    "PartialListing"
);

auto_derived!(
    /// Moderation fields projected onto a listing from its current review
    pub struct ListingModeration {
        /// Visible moderation state
        pub moderation_status: ReviewStatus,
        /// Back-reference to the review that produced this state
        pub moderation_review_id: Option<String>,
        /// Published iff the current review is approved
        pub is_published: bool,
    }
);

#[allow(clippy::disallowed_methods)]
impl Listing {
    /// Record a new submission, unpublished until approved
    pub async fn create(
        db: &Database,
        seller_id: String,
        title: String,
        description: String,
        images: Vec<String>,
    ) -> Result<Listing> {
        let listing = Listing {
            id: ulid::Ulid::new().to_string(),
            seller_id,
            title,
            description,
            images,
            moderation_status: ReviewStatus::Pending,
            moderation_review_id: None,
            is_published: false,
            created_at: Timestamp::now_utc(),
            updated_at: Timestamp::now_utc(),
        };

        db.insert_listing(&listing).await?;
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::ReviewStatus;

    use crate::{Listing, ListingModeration};

    #[async_std::test]
    async fn projection_is_idempotent() {
        database_test!(|db| async move {
            let listing = Listing::create(
                &db,
                "seller".to_string(),
                "Refrigerador".to_string(),
                "Refrigerador poco uso".to_string(),
                vec![],
            )
            .await
            .unwrap();

            let projection = ListingModeration {
                moderation_status: ReviewStatus::Approved,
                moderation_review_id: Some("review".to_string()),
                is_published: true,
            };

            db.update_listing_moderation(&listing.id, &projection)
                .await
                .unwrap();
            let first = db.fetch_listing(&listing.id).await.unwrap();

            db.update_listing_moderation(&listing.id, &projection)
                .await
                .unwrap();
            let second = db.fetch_listing(&listing.id).await.unwrap();

            assert_eq!(first.moderation_status, second.moderation_status);
            assert_eq!(first.moderation_review_id, second.moderation_review_id);
            assert_eq!(first.is_published, second.is_published);
        });
    }
}
