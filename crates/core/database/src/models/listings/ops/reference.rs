use anuncios_result::Result;
use iso8601_timestamp::Timestamp;

use crate::ReferenceDb;
use crate::{Listing, ListingModeration};

use super::AbstractListings;

#[async_trait]
impl AbstractListings for ReferenceDb {
    /// Insert a new listing into the database
    async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        let mut listings = self.listings.lock().await;
        if listings.contains_key(&listing.id) {
            Err(create_database_error!("insert", "listings"))
        } else {
            listings.insert(listing.id.to_string(), listing.clone());
            Ok(())
        }
    }

    /// Fetch a listing by its id
    async fn fetch_listing(&self, id: &str) -> Result<Listing> {
        let listings = self.listings.lock().await;
        listings
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Overwrite a listing's visible moderation fields
    async fn update_listing_moderation(
        &self,
        listing_id: &str,
        projection: &ListingModeration,
    ) -> Result<()> {
        let mut listings = self.listings.lock().await;
        if let Some(listing) = listings.get_mut(listing_id) {
            listing.moderation_status = projection.moderation_status;
            listing.moderation_review_id = projection.moderation_review_id.clone();
            listing.is_published = projection.is_published;
            listing.updated_at = Timestamp::now_utc();
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }
}
