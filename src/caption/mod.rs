//! Caption generation through the imgflip API.
//!
//! - [`GenerateRequest`]: inbound request body of the generate endpoint
//! - [`ImgflipClient`](imgflip::ImgflipClient): outbound caption and
//!   template catalogue calls
//! - [`CaptionError`]: failure taxonomy, each variant mapped to a status

pub mod imgflip;

pub use imgflip::ImgflipClient;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One positioned text entry. Extra fields sent by clients (style,
/// position) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBox {
    pub id: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub template_id: Option<String>,
    pub text_boxes: Option<Vec<TextBox>>,
    pub top_text: Option<String>,
    pub bottom_text: Option<String>,
}

impl GenerateRequest {
    pub fn template_id(&self) -> Result<&str, CaptionError> {
        self.template_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(CaptionError::MissingTemplate)
    }

    /// Texts in box order. Positioned boxes win over the top/bottom pair.
    pub fn texts(&self) -> Result<Vec<String>, CaptionError> {
        if let Some(boxes) = &self.text_boxes {
            let mut boxes = boxes.clone();
            boxes.sort_by_key(|b| b.id);
            return Ok(boxes
                .into_iter()
                .map(|b| b.text.unwrap_or_default())
                .collect());
        }

        if self.top_text.is_some() || self.bottom_text.is_some() {
            return Ok(vec![
                self.top_text.clone().unwrap_or_default(),
                self.bottom_text.clone().unwrap_or_default(),
            ]);
        }

        Err(CaptionError::NoText)
    }
}

/// Final rendered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub url: String,
    pub page_url: String,
}

/// Template catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub box_count: u32,
}

/// Display strings double as the client-facing error message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    #[error("Missing template ID")]
    MissingTemplate,

    #[error("No text provided")]
    NoText,

    #[error("Service configuration error")]
    MissingCredentials,

    #[error("External service error")]
    Upstream(u16),

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response from meme service")]
    MissingUrl,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Failed to generate meme")]
    Transport(String),
}

impl CaptionError {
    pub fn status(&self) -> StatusCode {
        match self {
            CaptionError::MissingTemplate | CaptionError::NoText | CaptionError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            CaptionError::Timeout => StatusCode::REQUEST_TIMEOUT,
            CaptionError::MissingCredentials
            | CaptionError::Upstream(_)
            | CaptionError::MissingUrl
            | CaptionError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
