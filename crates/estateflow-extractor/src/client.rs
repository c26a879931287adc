// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generateContent API.
//!
//! One analysis call per ingested message: prompt text plus an optional
//! inline photo in, schema-constrained JSON out. Transient errors
//! (429, 500, 503) are retried once after a short delay.

use std::time::Duration;

use estateflow_config::model::ExtractorConfig;
use estateflow_core::EstateError;
use tracing::{debug, warn};

use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ListingAnalysis,
    Part, listing_response_schema,
};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl GeminiClient {
    /// Creates a new extractor client. Requires `config.api_key` to be set.
    pub fn new(config: &ExtractorConfig) -> Result<Self, EstateError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            EstateError::Config("extractor.api_key is required for analysis".into())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| EstateError::Extractor {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_retries: 1,
        })
    }

    /// Analyzes one ingested message (text plus optional base64 JPEG) and
    /// returns the structured listing fields.
    pub async fn analyze_property_media(
        &self,
        text: &str,
        image_base64: Option<&str>,
    ) -> Result<ListingAnalysis, EstateError> {
        let mut parts = vec![Part::text(analysis_prompt(text))];
        if let Some(image) = image_base64 {
            parts.push(Part::inline_jpeg(image));
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: listing_response_schema(),
            },
        };

        let raw = self.generate(&request).await?;
        serde_json::from_str::<ListingAnalysis>(raw.trim()).map_err(|e| EstateError::Extractor {
            message: format!("unparseable analysis output: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, EstateError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying extraction request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| EstateError::Extractor {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "extraction response received");

            if status.is_success() {
                let body: GenerateContentResponse =
                    response.json().await.map_err(|e| EstateError::Extractor {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(body.text());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(EstateError::Extractor {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(EstateError::Extractor {
                message: format!("API returned {status}: {body}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| EstateError::Extractor {
            message: "extraction request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

/// The analysis instruction wrapped around every ingested message.
fn analysis_prompt(text: &str) -> String {
    format!(
        "You are the Lead Architect of EstateFlow AI. Analyze this property input.\n\
         \n\
         INPUT TEXT:\n\
         {text}\n\
         \n\
         TASK:\n\
         1. Determine if this is a property listing.\n\
         2. Extract property details (Title, Price in MYR, Location, Specs).\n\
         3. Generate a \"Malay\" auto-reply for the customer.\n\
         4. Generate a \"Facebook Page\" high-conversion caption.\n\
         5. Generate a \"Messenger Auto-Reply\" template.\n\
         \n\
         Return pure JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GeminiClient {
        let config = ExtractorConfig {
            api_key: Some("gm-test".into()),
            model: "gemini-3-flash-preview".into(),
            base_url: server.uri(),
        };
        GeminiClient::new(&config).unwrap()
    }

    fn analysis_body(inner_json: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": inner_json }] }
            }]
        })
    }

    #[tokio::test]
    async fn analyze_parses_listing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .and(query_param("key", "gm-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(
                r#"{"isPropertyListing": true, "reply": "Terima kasih!", "title": "Condo KLCC", "price": 890000, "location": "KL"}"#,
            )))
            .mount(&server)
            .await;

        let analysis = test_client(&server)
            .analyze_property_media("Condo KLCC 890k", None)
            .await
            .unwrap();
        assert!(analysis.is_property_listing);
        assert_eq!(analysis.title.as_deref(), Some("Condo KLCC"));
        assert_eq!(analysis.reply, "Terima kasih!");
    }

    #[tokio::test]
    async fn image_part_reaches_the_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .and(body_string_contains("inlineData"))
            .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(
                r#"{"isPropertyListing": false, "reply": "Bukan hartanah."}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = test_client(&server)
            .analyze_property_media("see photo", Some("QUJDRA=="))
            .await
            .unwrap();
        assert!(!analysis.is_property_listing);
    }

    #[tokio::test]
    async fn transient_error_is_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(
                r#"{"isPropertyListing": false, "reply": "ok"}"#,
            )))
            .mount(&server)
            .await;

        let analysis = test_client(&server)
            .analyze_property_media("hello", None)
            .await
            .unwrap();
        assert_eq!(analysis.reply, "ok");
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_client(&server).analyze_property_media("hi", None).await;
        assert!(matches!(result, Err(EstateError::Extractor { .. })));
    }

    #[tokio::test]
    async fn garbage_analysis_output_is_an_extractor_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-flash-preview:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(analysis_body("not json at all")),
            )
            .mount(&server)
            .await;

        let result = test_client(&server).analyze_property_media("hi", None).await;
        assert!(matches!(result, Err(EstateError::Extractor { .. })));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_config_error() {
        let config = ExtractorConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(EstateError::Config(_))
        ));
    }
}
