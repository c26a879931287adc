// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde models for the slice of the Bot API this agent consumes.

use serde::Deserialize;

/// The Bot API response envelope: `{"ok": bool, "result": ..., "description": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiReply<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
}

/// An inbound chat message, text or photo.
#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<TgUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl TgMessage {
    /// The text content to analyze: the message text, or the photo caption.
    pub fn content_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// Largest available photo size. Telegram sorts sizes ascending.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.last()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// Result of `getFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct TgFile {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_photo_and_caption_deserializes() {
        let json = r#"{
            "update_id": 7,
            "message": {
                "message_id": 12,
                "chat": {"id": 555},
                "from": {"id": 9, "first_name": "Aina", "username": "aina_prop"},
                "photo": [
                    {"file_id": "small", "width": 90, "height": 60},
                    {"file_id": "large", "width": 1280, "height": 960}
                ],
                "caption": "Rumah teres untuk dijual RM450k, Shah Alam"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let msg = update.message.unwrap();
        assert_eq!(msg.chat.id, 555);
        assert_eq!(msg.largest_photo().unwrap().file_id, "large");
        assert!(msg.content_text().unwrap().contains("RM450k"));
    }

    #[test]
    fn plain_text_update_deserializes() {
        let json = r#"{
            "update_id": 8,
            "message": {
                "message_id": 13,
                "chat": {"id": 555},
                "text": "Condo KLCC, 2 bilik, RM3200 sewa"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let msg = update.message.unwrap();
        assert!(msg.photo.is_empty());
        assert_eq!(msg.content_text().unwrap(), "Condo KLCC, 2 bilik, RM3200 sewa");
    }

    #[test]
    fn text_takes_priority_over_caption() {
        let msg = TgMessage {
            message_id: 1,
            chat: Chat { id: 1 },
            from: None,
            text: Some("text".into()),
            photo: vec![],
            caption: Some("caption".into()),
        };
        assert_eq!(msg.content_text(), Some("text"));
    }
}
