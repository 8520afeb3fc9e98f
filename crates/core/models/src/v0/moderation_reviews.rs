#[cfg(feature = "validator")]
use validator::Validate;

auto_derived!(
    /// Status of a moderation review
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum ReviewStatus {
        /// Review is waiting for a decision
        Pending,
        /// Listing was approved for publication
        Approved,
        /// Listing was rejected
        Rejected,
        /// Rejection is being contested by the seller
        Appealed,
    }

    /// Terminal outcome an admin or the automated pipeline may decide
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum ReviewOutcome {
        Approved,
        Rejected,
    }

    /// Aggregate counts over the review queue
    #[derive(Default)]
    pub struct ReviewStats {
        pub total: u64,
        pub pending: u64,
        pub approved: u64,
        pub rejected: u64,
        pub appealed: u64,
    }

    /// Decision applied to a pending or appealed review
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct DataDecideReview {
        /// Whether the listing is approved or rejected
        pub outcome: ReviewOutcome,
        /// Human or machine readable explanation
        #[validate(length(min = 0, max = 512))]
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reason: Option<String>,
        /// Classifier confidence backing this decision, 0 to 100
        #[serde(skip_serializing_if = "Option::is_none")]
        pub confidence_score: Option<i32>,
    }

    /// Appeal filed by a seller against a rejected review
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct DataAppealReview {
        /// Why the seller believes the rejection is wrong
        #[validate(length(min = 1, max = 1024))]
        pub reason: String,
    }
);

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Appealed => "appealed",
        }
    }

    /// Whether a decision may still be applied from this status
    pub fn is_decidable(&self) -> bool {
        matches!(self, ReviewStatus::Pending | ReviewStatus::Appealed)
    }
}

impl ReviewOutcome {
    pub fn status(&self) -> ReviewStatus {
        match self {
            ReviewOutcome::Approved => ReviewStatus::Approved,
            ReviewOutcome::Rejected => ReviewStatus::Rejected,
        }
    }
}
