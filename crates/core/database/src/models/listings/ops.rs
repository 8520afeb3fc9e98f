use anuncios_result::Result;

use crate::{Listing, ListingModeration};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractListings: Sync + Send {
    /// Insert a new listing into the database
    async fn insert_listing(&self, listing: &Listing) -> Result<()>;

    /// Fetch a listing by its id
    async fn fetch_listing(&self, id: &str) -> Result<Listing>;

    /// Overwrite a listing's visible moderation fields
    async fn update_listing_moderation(
        &self,
        listing_id: &str,
        projection: &ListingModeration,
    ) -> Result<()>;
}
