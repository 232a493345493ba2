use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::app::Result;
use crate::caption::{Caption, CaptionError, GenerateRequest, Template};
use crate::config::CaptionConfig;

pub struct ImgflipClient {
    client: Client,
    endpoint: String,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    #[serde(default)]
    success: bool,
    data: Option<CaptionData>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionData {
    url: Option<String>,
    #[serde(default)]
    page_url: String,
}

#[derive(Debug, Deserialize)]
struct TemplatesResponse {
    #[serde(default)]
    success: bool,
    data: Option<TemplatesData>,
}

#[derive(Debug, Deserialize)]
struct TemplatesData {
    memes: Vec<Template>,
}

impl ImgflipClient {
    pub fn new(config: &CaptionConfig) -> Result<Self> {
        let client = Client::builder().gzip(true).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            credentials: config
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
            timeout: config.timeout(),
        })
    }

    /// Render `request` onto its template and return the image URL.
    pub async fn caption(&self, request: &GenerateRequest) -> std::result::Result<Caption, CaptionError> {
        let template_id = request.template_id()?;

        let Some((username, password)) = &self.credentials else {
            error!("Missing imgflip credentials");
            return Err(CaptionError::MissingCredentials);
        };

        let texts = request.texts()?;

        let mut form = vec![
            ("template_id".to_string(), template_id.to_string()),
            ("username".to_string(), username.clone()),
            ("password".to_string(), password.clone()),
        ];
        form.extend(
            texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| (format!("text{}", index), text)),
        );

        let response = self
            .client
            .post(format!("{}/caption_image", self.endpoint))
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            error!("Imgflip API response error: {}", status);
            return Err(CaptionError::Upstream(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: CaptionResponse = serde_json::from_slice(&body)
            .map_err(|e| CaptionError::Transport(e.to_string()))?;
        debug!(success = parsed.success, "imgflip caption response");

        if !parsed.success {
            let message = parsed
                .error_message
                .unwrap_or_else(|| "Failed to generate meme".to_string());
            error!("Imgflip API error: {}", message);
            return Err(CaptionError::Rejected(message));
        }

        match parsed.data {
            Some(CaptionData {
                url: Some(url),
                page_url,
            }) if !url.is_empty() => Ok(Caption { url, page_url }),
            _ => {
                error!("No URL in imgflip response");
                Err(CaptionError::MissingUrl)
            }
        }
    }

    /// Fetch the public template catalogue.
    pub async fn templates(&self) -> std::result::Result<Vec<Template>, CaptionError> {
        let response = self
            .client
            .get(format!("{}/get_memes", self.endpoint))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Upstream(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let parsed: TemplatesResponse = serde_json::from_slice(&body)
            .map_err(|e| CaptionError::Transport(e.to_string()))?;

        match parsed.data {
            Some(data) if parsed.success => Ok(data.memes),
            _ => Err(CaptionError::Rejected("Failed to fetch template info".into())),
        }
    }
}

fn transport_error(e: reqwest::Error) -> CaptionError {
    if e.is_timeout() {
        CaptionError::Timeout
    } else {
        error!("Error generating meme: {}", e);
        CaptionError::Transport(e.to_string())
    }
}
