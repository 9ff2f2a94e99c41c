//! Messages API payload for a dermatology assessment.
//!
//! Wire format follows the Anthropic Messages API:
//! https://docs.anthropic.com/en/api/messages

use super::upload::EncodedImage;
use serde::{Deserialize, Serialize};

pub const MAX_TOKENS: u32 = 400;
pub const TEMPERATURE: f32 = 0.0;

/// Media type attached to every image block, whatever the declared upload type.
pub const IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Upper bound on a caller-supplied profile value.
const MAX_PROFILE_VALUE_CHARS: usize = 100;

pub const SYSTEM_PROMPT: &str = "You are a dermatology-focused chatbot designed to assist users with skin-related concerns, provide general information, and guide users to appropriate actions based on their descriptions. Your primary responsibilities are:\n\nTo offer empathetic, non-judgmental, and user-friendly responses.\nTo provide accurate, medically informed, and evidence-based dermatological advice within your limitations.\nTo clearly state that you are not a substitute for a licensed dermatologist and recommend professional consultation when necessary.\nTo ensure user safety by avoiding speculative diagnoses, especially for potentially serious conditions, and encouraging medical evaluation where appropriate.";

/// The user's stated skin concern and skin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinProfile {
    pub concern: String,
    pub skin_type: String,
}

impl SkinProfile {
    pub fn new(concern: impl Into<String>, skin_type: impl Into<String>) -> Self {
        Self {
            concern: concern.into(),
            skin_type: skin_type.into(),
        }
    }

    /// Overlay request-supplied values on `defaults`. Values are stripped of
    /// control characters, trimmed and capped; blanks fall back to the default.
    pub fn from_form(
        concern: Option<&str>,
        skin_type: Option<&str>,
        defaults: &SkinProfile,
    ) -> Self {
        Self {
            concern: concern
                .and_then(clean_profile_value)
                .unwrap_or_else(|| defaults.concern.clone()),
            skin_type: skin_type
                .and_then(clean_profile_value)
                .unwrap_or_else(|| defaults.skin_type.clone()),
        }
    }

    pub fn user_prompt(&self) -> String {
        format!(
            "You will receive three photographs of a person's face, along with their primary skin concern is {} and skin type is {}. Your task is to:\n\
             Identify visible skin issues related to the concern and skin type.\n\
             Offer a concise skincare recommendation or product suggestion.\n\
             Emphasize the importance of consulting a dermatologist for personalized advice.\n\
             Keep responses brief and practical. Would you like further clarification or assistance?",
            self.concern, self.skin_type
        )
    }
}

fn clean_profile_value(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .chars()
        .take(MAX_PROFILE_VALUE_CHARS)
        .collect();

    let cleaned = cleaned.trim_end().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<InputMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
}

impl MessagesRequest {
    /// One user turn: every image block in the given order, then the prompt text.
    pub fn assessment(model: &str, images: &[EncodedImage], profile: &SkinProfile) -> Self {
        let mut content: Vec<ContentBlock> = images
            .iter()
            .map(|image| ContentBlock::Image {
                source: ImageSource::Base64 {
                    media_type: image.media_type.to_string(),
                    data: image.data.clone(),
                },
            })
            .collect();
        content.push(ContentBlock::Text {
            text: profile.user_prompt(),
        });

        Self {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![InputMessage {
                role: Role::User,
                content,
            }],
        }
    }

    pub fn image_count(&self) -> usize {
        self.messages
            .iter()
            .flat_map(|m| &m.content)
            .filter(|block| matches!(block, ContentBlock::Image { .. }))
            .count()
    }

    /// Text of every text block, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.messages
            .iter()
            .flat_map(|m| &m.content)
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
