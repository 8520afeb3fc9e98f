#[cfg(feature = "validator")]
use validator::Validate;

auto_derived!(
    /// Fields of a listing submission relevant to content review
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct ListingContent {
        /// Listing title
        #[validate(length(min = 1, max = 200))]
        pub title: String,
        /// Listing body text
        #[validate(length(min = 1, max = 5000))]
        pub description: String,
        /// Image URLs attached to the listing
        #[serde(default)]
        pub images: Vec<String>,
    }
);

impl ListingContent {
    /// Combined text surface used by keyword and spam checks
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}
