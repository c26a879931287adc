// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde models for the Gemini generateContent API.

use estateflow_core::PropertyDetails;
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One content part: prompt text or an inline image.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Inline JPEG bytes, base64-encoded.
    pub fn inline_jpeg(data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/jpeg".to_string(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// Structured-output settings: JSON responses shaped by a schema.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: serde_json::Value,
}

/// Response body for `generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextPart {
    #[serde(default)]
    pub text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Structured analysis of one ingested property message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAnalysis {
    pub is_property_listing: bool,
    /// Malay auto-reply for the lead.
    pub reply: String,
    #[serde(default)]
    pub page_post_caption: Option<String>,
    #[serde(default)]
    pub messenger_template: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub baths: Option<u32>,
    #[serde(default)]
    pub sqft: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ListingAnalysis {
    /// Extracted property fields, or `None` when the input was not a
    /// listing at all.
    pub fn property_details(&self) -> Option<PropertyDetails> {
        if !self.is_property_listing {
            return None;
        }
        Some(PropertyDetails {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| "Untitled listing".to_string()),
            price: self.price.unwrap_or(0.0),
            location: self.location.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
        })
    }
}

/// JSON schema the extractor is required to answer in.
pub fn listing_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "isPropertyListing": { "type": "BOOLEAN" },
            "reply": { "type": "STRING" },
            "pagePostCaption": { "type": "STRING" },
            "messengerTemplate": { "type": "STRING" },
            "title": { "type": "STRING" },
            "price": { "type": "NUMBER" },
            "location": { "type": "STRING" },
            "beds": { "type": "NUMBER" },
            "baths": { "type": "NUMBER" },
            "sqft": { "type": "NUMBER" },
            "description": { "type": "STRING" }
        },
        "required": ["isPropertyListing", "reply"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_inline_image_part() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text("analyze"), Part::inline_jpeg("QUJD")],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: listing_response_schema(),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "analyze");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn response_text_concatenates_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\""}, {"text": ": 1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), r#"{"a": 1}"#);
    }

    #[test]
    fn analysis_with_listing_yields_details() {
        let analysis: ListingAnalysis = serde_json::from_str(
            r#"{
                "isPropertyListing": true,
                "reply": "Terima kasih!",
                "title": "Teres Setia Alam",
                "price": 550000,
                "location": "Setia Alam",
                "beds": 4,
                "description": "Freehold, renovated"
            }"#,
        )
        .unwrap();

        let details = analysis.property_details().unwrap();
        assert_eq!(details.title, "Teres Setia Alam");
        assert_eq!(details.price, 550_000.0);
        assert_eq!(details.beds, Some(4));
        assert_eq!(details.baths, None);
    }

    #[test]
    fn non_listing_yields_no_details() {
        let analysis: ListingAnalysis = serde_json::from_str(
            r#"{"isPropertyListing": false, "reply": "Boleh saya bantu?"}"#,
        )
        .unwrap();
        assert!(analysis.property_details().is_none());
    }
}
