auto_derived!(
    /// Verdict returned by a content classifier
    pub struct Classification {
        /// Score between 0 and 100 where 100 is entirely appropriate
        pub score: i32,
        /// Machine-readable issues discovered during analysis
        pub issues: Vec<String>,
    }

    /// Per-image verdicts over a submission's attachments
    #[derive(Default)]
    pub struct ImageAnalysis {
        /// One score per analysed image, 0 to 100
        pub scores: Vec<i32>,
        /// Issues discovered across the images
        pub issues: Vec<String>,
    }
);

impl Classification {
    /// Neutral verdict used when the classifier cannot be reached
    pub fn unavailable() -> Classification {
        Classification {
            score: 50,
            issues: vec!["ai_unavailable".to_string()],
        }
    }
}
