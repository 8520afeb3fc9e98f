use anuncios_models::v0::{Classification, ImageAnalysis, ListingContent};
use anuncios_result::Result;

/// Most images analysed for a single submission, the rest are ignored
pub const IMAGE_ANALYSIS_LIMIT: usize = 8;

/// Content analysis backend
///
/// Implementations must degrade gracefully: a backend that cannot be
/// reached returns the neutral verdict rather than an error, so a broken
/// classifier never blocks the moderation pipeline.
#[async_trait]
pub trait Classifier: Sync + Send {
    async fn classify(&self, content: &ListingContent) -> Result<Classification>;

    /// Score attached images, at most [`IMAGE_ANALYSIS_LIMIT`] of them
    async fn classify_images(&self, urls: &[String]) -> Result<ImageAnalysis>;
}

/// Deterministic classifier for tests and offline deployments
#[derive(Debug, Clone)]
pub struct StaticClassifier {
    score: i32,
    issues: Vec<String>,
    image_scores: Vec<i32>,
}

impl StaticClassifier {
    pub fn new(score: i32) -> StaticClassifier {
        StaticClassifier {
            score,
            issues: vec![],
            image_scores: vec![],
        }
    }

    pub fn with_issues(score: i32, issues: Vec<String>) -> StaticClassifier {
        StaticClassifier {
            score,
            issues,
            image_scores: vec![],
        }
    }

    pub fn with_image_scores(score: i32, image_scores: Vec<i32>) -> StaticClassifier {
        StaticClassifier {
            score,
            issues: vec![],
            image_scores,
        }
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, _content: &ListingContent) -> Result<Classification> {
        Ok(Classification {
            score: self.score,
            issues: self.issues.clone(),
        })
    }

    async fn classify_images(&self, urls: &[String]) -> Result<ImageAnalysis> {
        let scores = urls
            .iter()
            .take(IMAGE_ANALYSIS_LIMIT)
            .enumerate()
            .map(|(i, _)| self.image_scores.get(i).copied().unwrap_or(80))
            .collect();

        Ok(ImageAnalysis {
            scores,
            issues: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Classifier, StaticClassifier};

    #[async_std::test]
    async fn image_analysis_caps_at_the_limit() {
        let classifier = StaticClassifier::with_image_scores(90, vec![10, 20]);
        let urls: Vec<String> = (0..12)
            .map(|i| format!("https://example.com/{i}.jpg"))
            .collect();

        let analysis = classifier.classify_images(&urls).await.unwrap();
        assert_eq!(analysis.scores.len(), 8);
        assert_eq!(&analysis.scores[..2], &[10, 20]);
        // unconfigured slots fall back to the per-image default
        assert!(analysis.scores[2..].iter().all(|score| *score == 80));
    }
}
