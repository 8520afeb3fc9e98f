use anuncios_result::Result;
use bson::to_bson;
use iso8601_timestamp::Timestamp;
use mongodb::bson::{doc, to_document};

use crate::MongoDb;
use crate::{Listing, ListingModeration};

use super::AbstractListings;

static COL: &str = "listings";

#[async_trait]
impl AbstractListings for MongoDb {
    /// Insert a new listing into the database
    async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        query!(self, insert_one, COL, &listing).map(|_| ())
    }

    /// Fetch a listing by its id
    async fn fetch_listing(&self, id: &str) -> Result<Listing> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(NotFound))
    }

    /// Overwrite a listing's visible moderation fields
    async fn update_listing_moderation(
        &self,
        listing_id: &str,
        projection: &ListingModeration,
    ) -> Result<()> {
        let mut set =
            to_document(projection).map_err(|_| create_database_error!("to_document", COL))?;
        set.insert(
            "updated_at",
            to_bson(&Timestamp::now_utc()).map_err(|_| create_database_error!("to_bson", COL))?,
        );

        let result = self
            .col::<Listing>(COL)
            .update_one(
                doc! {
                    "_id": listing_id,
                },
                doc! {
                    "$set": set,
                },
            )
            .await
            .map_err(|_| create_database_error!("update_one", COL))?;

        if result.matched_count == 0 {
            Err(create_error!(NotFound))
        } else {
            Ok(())
        }
    }
}
