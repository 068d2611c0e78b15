//! Keyword translation through an OpenAI-compatible chat completions API.
//!
//! Without a usable credential the translator answers with a fixed mock so
//! the rest of the pipeline can run offline.

use crate::error::DomainScanError;
use crate::providers::TranslationProvider;
use crate::types::{ScanConfig, Translation, TranslationResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Target languages, in the order translations are requested.
pub const LANGUAGES: [&str; 15] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Russian",
    "Chinese",
    "Japanese",
    "Korean",
    "Arabic",
    "Hindi",
    "Turkish",
    "Dutch",
    "Swedish",
];

/// Placeholder key shipped in sample environments; treated as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "dummy-key-replace-in-production";

/// Mock roster: language and the tag appended to the keyword.
const MOCK_SUFFIXES: [(&str, &str); 5] = [
    ("English", ""),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Italian", "it"),
];

const SYSTEM_PROMPT: &str = "You are a helpful translator that only responds with valid JSON. \
Make sure Japanese, Chinese, Korean, Russian, Arabic and other non-Latin scripts are \
transliterated to ASCII.";

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Translates keywords into the language roster.
pub struct Translator {
    client: reqwest::Client,
    base_url: String,
    /// `None` when no usable credential is configured
    api_key: Option<String>,
    model: String,
}

impl Translator {
    /// Build a translator from scan configuration.
    pub fn from_config(config: &ScanConfig) -> Result<Self, DomainScanError> {
        let client = reqwest::Client::builder()
            .timeout(config.translate_timeout)
            .build()
            .map_err(|e| {
                DomainScanError::network_with_source(
                    "Failed to create translation HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: usable_api_key(config.api_key.as_deref()),
            model: config.model.clone(),
        })
    }

    /// Whether translations will come from the mock instead of the API.
    pub fn uses_mock(&self) -> bool {
        self.api_key.is_none()
    }

    /// Translate a keyword.
    ///
    /// Returns the mock roster when no credential is configured. Otherwise a
    /// single request is made; any failure is returned without retrying.
    pub async fn translate_keyword(
        &self,
        keyword: &str,
    ) -> Result<Vec<Translation>, DomainScanError> {
        let Some(api_key) = &self.api_key else {
            info!("Using mock translation data because API key is not available");
            return Ok(mock_translations(keyword));
        };

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(keyword),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("translate: POST {} model={}", url, self.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainScanError::translation(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DomainScanError::translation(format!(
                "provider returned {}: {}",
                status, text
            )));
        }

        let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
            DomainScanError::translation(format!("failed to parse provider response: {}", e))
        })?;

        let content = parsed
            .choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DomainScanError::translation("No content returned from provider"))?;

        parse_translations(content)
    }
}

#[async_trait]
impl TranslationProvider for Translator {
    fn is_mock(&self) -> bool {
        self.uses_mock()
    }

    async fn translate(&self, keyword: &str) -> Result<Vec<Translation>, DomainScanError> {
        self.translate_keyword(keyword).await
    }
}

/// Drop empty and placeholder credentials.
fn usable_api_key(key: Option<&str>) -> Option<String> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() && k != PLACEHOLDER_API_KEY => Some(k.to_string()),
        _ => None,
    }
}

/// Deterministic offline translations.
pub fn mock_translations(keyword: &str) -> Vec<Translation> {
    MOCK_SUFFIXES
        .iter()
        .map(|(language, tag)| Translation::new(*language, format!("{}{}", keyword, tag)))
        .collect()
}

fn build_prompt(keyword: &str) -> String {
    format!(
        "Translate the keyword \"{}\" into the following languages.\n\
         For each translation, provide ONLY the translated word in ASCII format \
         (transliterate non-Latin scripts).\n\n\
         {}\n\n\
         Return the results as a JSON object with a 'translations' array of objects \
         with 'language' and 'translation' keys.\n\
         Make sure all translations use only ASCII characters that are valid for domain names.",
        keyword,
        LANGUAGES.join(", ")
    )
}

/// Parse the model's JSON reply.
///
/// The reply must be a JSON object; a missing `translations` array yields an
/// empty list.
fn parse_translations(content: &str) -> Result<Vec<Translation>, DomainScanError> {
    let parsed: TranslationResponse = serde_json::from_str(content).map_err(|e| {
        DomainScanError::translation(format!("Failed to parse translation response: {}", e))
    })?;
    Ok(parsed.translations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_translations() {
        let translations = mock_translations("coffee");
        assert_eq!(translations.len(), 5);
        assert_eq!(translations[0], Translation::new("English", "coffee"));
        assert_eq!(translations[1], Translation::new("Spanish", "coffeees"));
        assert_eq!(translations[4], Translation::new("Italian", "coffeeit"));
        assert_eq!(translations, mock_translations("coffee"));
    }

    #[test]
    fn test_usable_api_key() {
        assert_eq!(usable_api_key(None), None);
        assert_eq!(usable_api_key(Some("  ")), None);
        assert_eq!(usable_api_key(Some(PLACEHOLDER_API_KEY)), None);
        assert_eq!(usable_api_key(Some("sk-test")), Some("sk-test".to_string()));
    }

    #[test]
    fn test_prompt_lists_every_language() {
        let prompt = build_prompt("tea");
        assert!(prompt.contains("\"tea\""));
        for language in LANGUAGES {
            assert!(prompt.contains(language), "missing {}", language);
        }
    }

    #[test]
    fn test_parse_translations() {
        let content = r#"{"translations": [{"language": "German", "translation": "Tee"}]}"#;
        let parsed = parse_translations(content).unwrap();
        assert_eq!(parsed, vec![Translation::new("German", "Tee")]);

        assert!(parse_translations(r#"{"other": 1}"#).unwrap().is_empty());
        assert!(matches!(
            parse_translations("not json"),
            Err(DomainScanError::TranslationError { .. })
        ));
        assert!(parse_translations("42").is_err());
    }

    #[tokio::test]
    async fn test_translator_without_key_uses_mock() {
        let translator = Translator::from_config(&ScanConfig::default()).unwrap();
        assert!(translator.uses_mock());
        let translations = translator.translate_keyword("tea").await.unwrap();
        assert_eq!(translations, mock_translations("tea"));
    }
}
