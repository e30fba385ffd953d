//! Postmark HTTP mail client
//!
//! Sends plain-text messages through Postmark's `/email` endpoint and
//! returns the provider message id.

use reqwest::{Client, Url};
use serde::Deserialize;

use credence_core::services::email_change::Mailer;
use credence_shared::config::MailerConfig;

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

/// Mail client backed by the Postmark HTTP API
pub struct PostmarkMailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    server_token: String,
}

impl PostmarkMailClient {
    pub fn new(
        base_url: String,
        sender: String,
        server_token: String,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            server_token,
        }
    }

    /// Build a client from the mailer configuration section
    pub fn from_config(config: &MailerConfig, http_client: Client) -> Self {
        Self::new(
            config.api_base_url.clone(),
            config.sender.clone(),
            config.server_token.clone(),
            http_client,
        )
    }
}

#[async_trait::async_trait]
impl Mailer for PostmarkMailClient {
    #[tracing::instrument(name = "Sending mail", skip_all)]
    async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        let base = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        let url = base.join("/email").map_err(|e| e.to_string())?;

        let request_body = SendEmailRequest {
            from: &self.sender,
            to,
            subject,
            text_body: body,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(url)
            .header(POSTMARK_AUTH_HEADER, &self.server_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let parsed: SendEmailResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(parsed.message_id)
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[derive(Deserialize, Debug)]
struct SendEmailResponse {
    #[serde(rename = "MessageID")]
    message_id: String,
}
