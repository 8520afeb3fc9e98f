auto_derived!(
    /// Privilege tier of a platform administrator
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum AdminRole {
        /// May review listings and resolve reports
        Moderator,
        /// May additionally manage the blacklist and settings
        Admin,
        /// May additionally manage other admins
        SuperAdmin,
    }
);
