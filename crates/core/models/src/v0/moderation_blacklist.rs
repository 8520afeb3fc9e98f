#[cfg(feature = "validator")]
use validator::Validate;

auto_derived!(
    /// Kind of value a blacklist entry matches against
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum BlacklistEntryType {
        /// Literal word or phrase in listing text
        Word,
        /// Seller contact phone number
        Phone,
        /// Platform user ID
        User,
        /// Contact email address
        Email,
    }

    /// New blacklist entry created by an admin
    #[cfg_attr(feature = "validator", derive(Validate))]
    pub struct DataCreateBlacklistEntry {
        /// What kind of value this matches
        pub entry_type: BlacklistEntryType,
        /// The disallowed value, matched case-insensitively
        #[validate(length(min = 1, max = 256))]
        pub value: String,
        /// Why this value is disallowed
        #[validate(length(min = 1, max = 512))]
        pub reason: String,
    }
);

impl BlacklistEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlacklistEntryType::Word => "word",
            BlacklistEntryType::Phone => "phone",
            BlacklistEntryType::User => "user",
            BlacklistEntryType::Email => "email",
        }
    }
}
