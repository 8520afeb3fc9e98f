use std::time::Duration;

use anuncios_models::v0::{Classification, ImageAnalysis, ListingContent};
use anuncios_result::Result;
use serde::Deserialize;
use serde_json::json;

use crate::{Classifier, IMAGE_ANALYSIS_LIMIT};

static TEXT_PROMPT: &str = "Eres un moderador de contenido para una plataforma de \
clasificados en Cuba. Debes analizar el texto y determinar si es apropiado.\n\n\
Responde SOLO con un JSON en este formato:\n\
{\n\
  \"score\": <número 0-100, donde 100 es completamente apropiado>,\n\
  \"issues\": [<array de problemas encontrados, vacío si no hay problemas>],\n\
  \"explanation\": \"<breve explicación>\"\n\
}";

static IMAGE_PROMPT: &str = "Eres un moderador de imágenes para una plataforma de \
clasificados en Cuba. Evalúa si la imagen en la URL es apropiada para un anuncio.\n\n\
Responde SOLO con un JSON en este formato:\n\
{\n\
  \"score\": <0-100, donde 100 es apropiado>,\n\
  \"issues\": [<array de problemas encontrados, vacío si no hay problemas>]\n\
}";

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct Verdict {
    score: i32,
    #[serde(default)]
    issues: Vec<String>,
}

/// Classifier backed by a remote chat-completion endpoint
///
/// Holds no database state, so callers are free to drop it mid-request;
/// any transport or parse failure degrades to the neutral verdict.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpClassifier {
    /// Build a classifier from deployment configuration
    pub async fn from_config() -> Result<HttpClassifier> {
        let config = anuncios_config::config().await.moderation.classifier;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|_| create_error!(InternalError))?;

        Ok(HttpClassifier {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }

    async fn request(&self, system: &str, user: &str) -> Option<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
                "temperature": 0.3,
                "max_tokens": 500,
            }))
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;

        let mut response: ChatResponse = response.json().await.ok()?;
        if response.choices.is_empty() {
            return None;
        }

        Some(response.choices.remove(0).message.content)
    }
}

/// Pull the first JSON object out of a completion that may wrap it in prose
fn extract_json(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }

    Some(&content[start..=end])
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, content: &ListingContent) -> Result<Classification> {
        let text = format!("{}\n{}", content.title, content.description);
        let user = format!("Analiza este texto:\n\n{text}");

        let Some(completion) = self.request(TEXT_PROMPT, &user).await else {
            warn!("Classifier endpoint unavailable, returning neutral verdict.");
            return Ok(Classification::unavailable());
        };

        let verdict = extract_json(&completion)
            .and_then(|blob| serde_json::from_str::<Verdict>(blob).ok());

        Ok(match verdict {
            Some(verdict) => Classification {
                score: verdict.score.clamp(0, 100),
                issues: verdict.issues,
            },
            None => Classification {
                score: 50,
                issues: vec!["ai_parse_error".to_string()],
            },
        })
    }

    async fn classify_images(&self, urls: &[String]) -> Result<ImageAnalysis> {
        let mut analysis = ImageAnalysis::default();

        for url in urls.iter().take(IMAGE_ANALYSIS_LIMIT) {
            let user = format!("Analiza la imagen en esta URL:\n\n{url}");
            let verdict = self
                .request(IMAGE_PROMPT, &user)
                .await
                .as_deref()
                .and_then(extract_json)
                .and_then(|blob| serde_json::from_str::<Verdict>(blob).ok());

            // an unreachable or garbled verdict scores the image 80
            match verdict {
                Some(verdict) => {
                    analysis.scores.push(verdict.score.clamp(0, 100));
                    analysis.issues.extend(verdict.issues);
                }
                None => analysis.scores.push(80),
            }
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::extract_json;

    #[test]
    fn json_is_extracted_from_prose() {
        assert_eq!(
            extract_json("Claro: {\"score\": 90, \"issues\": []} espero que ayude"),
            Some("{\"score\": 90, \"issues\": []}")
        );
        assert_eq!(extract_json("sin json"), None);
    }
}
