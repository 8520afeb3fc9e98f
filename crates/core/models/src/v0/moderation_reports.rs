use iso8601_timestamp::Timestamp;

#[cfg(feature = "validator")]
use validator::Validate;

auto_derived!(
    /// Reason for reporting a listing or user
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum ReportReason {
        /// Unsolicited or repetitive advertising
        Spam,
        /// Fraudulent listing or seller
        Scam,
        /// Inappropriate or offensive content
        Inappropriate,
        /// Reposted copy of an existing listing
        Duplicate,
        /// Anything else, see description
        Other,
    }

    /// The object being reported
    #[serde(tag = "target_type", rename_all = "snake_case")]
    pub enum ReportedTarget {
        /// Report a listing
        Listing {
            /// ID of the listing
            id: String,
        },
        /// Report a user
        User {
            /// ID of the user
            id: String,
        },
    }

    /// Status of the report
    #[serde(tag = "status", rename_all = "snake_case")]
    pub enum ReportStatus {
        /// Report is waiting for triage
        Pending {},

        /// Report was looked at and closed by an admin
        Resolved {
            /// Admin who closed the report
            resolved_by: String,
            /// When the report was closed
            resolved_at: Option<Timestamp>,
            /// What was done about it
            resolution: String,
        },
    }

    /// New report submitted by a user
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct DataCreateReport {
        /// What is being reported
        pub target: ReportedTarget,
        /// Why it is being reported
        pub reason: ReportReason,
        /// Free-form context
        #[validate(length(min = 0, max = 1000))]
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Resolution applied to a pending report
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct DataResolveReport {
        /// What was done about the report
        #[validate(length(min = 1, max = 1000))]
        pub resolution: String,
    }
);

impl ReportedTarget {
    pub fn id(&self) -> &str {
        match self {
            ReportedTarget::Listing { id } => id,
            ReportedTarget::User { id } => id,
        }
    }

    pub fn target_type(&self) -> &'static str {
        match self {
            ReportedTarget::Listing { .. } => "listing",
            ReportedTarget::User { .. } => "user",
        }
    }
}

impl ReportStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReportStatus::Pending {})
    }
}
