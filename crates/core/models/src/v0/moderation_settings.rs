auto_derived!(
    /// Semantic type hint for a stored setting value
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum SettingKind {
        /// Integer value
        Number,
        /// Free-form or enumerated text
        Text,
        /// Boolean feature switch
        Toggle,
    }

    /// How aggressively listing content is policed
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum StrictnessLevel {
        Low,
        Medium,
        High,
        Ultra,
    }

    /// How platform content rules are enforced
    #[derive(Copy)]
    #[serde(rename_all = "snake_case")]
    pub enum RulesEnforcement {
        /// Only hard-prohibited terms are blocked
        Relaxed,
        /// Prohibited and suspicious terms are blocked
        Standard,
        /// As standard, plus borderline terms force manual review
        Strict,
    }
);

impl std::str::FromStr for StrictnessLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(StrictnessLevel::Low),
            "medium" => Ok(StrictnessLevel::Medium),
            "high" => Ok(StrictnessLevel::High),
            "ultra" => Ok(StrictnessLevel::Ultra),
            _ => Err(()),
        }
    }
}

impl std::str::FromStr for RulesEnforcement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relaxed" => Ok(RulesEnforcement::Relaxed),
            "standard" => Ok(RulesEnforcement::Standard),
            "strict" => Ok(RulesEnforcement::Strict),
            _ => Err(()),
        }
    }
}
