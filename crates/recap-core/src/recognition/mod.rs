//! Outbound recognition: one chat-completions call per captcha image.
//!
//! The external API is OpenAI-compatible; the image travels as a base64 data
//! URL inside a single user message, and the recognized text comes back as
//! the first choice's message content.

mod client;

pub use client::RecognitionClient;

/// Fixed instruction sent with every captcha image.
pub const RECOGNITION_PROMPT: &str =
    "Extract the text in this captcha image. Reply with only the text.";

/// Base64-encoded image ready to send to the recognition API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg")
    pub media_type: String,
}

impl ImageInput {
    /// Wrap an already base64-encoded payload.
    ///
    /// Captcha callers send JPEG data; the gateway does not decode or
    /// re-encode the payload, it only forwards it.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: "image/jpeg".to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}
