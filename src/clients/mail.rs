//! Transactional email through the SendGrid v3 API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },
}

/// One invitation email, as handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteEmail {
    pub to_email: String,
    pub to_name: String,
    pub registration_url: String,
    pub invite_token: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends exactly one request; retrying is left to the caller.
    async fn send_invite(&self, invite: &InviteEmail) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Address {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateData<'a> {
    registration_url: &'a str,
    invite_token: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address>,
    dynamic_template_data: TemplateData<'a>,
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: &'a Address,
    template_id: &'a str,
}

pub struct SendGridMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    template_id: Option<String>,
    from: Address,
}

impl SendGridMailer {
    pub fn new(config: &Config) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.sg_api_url.trim_end_matches('/')),
            api_key: config.sg_api_key.clone().filter(|k| !k.is_empty()),
            template_id: config.sg_template_id.clone().filter(|t| !t.is_empty()),
            from: Address {
                email: config.sg_sender_email.clone(),
                name: config.sg_sender_name.clone(),
            },
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_invite(&self, invite: &InviteEmail) -> Result<(), MailError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MailError::Config("SG_API_KEY".to_string()))?;
        let template_id = self
            .template_id
            .as_deref()
            .ok_or_else(|| MailError::Config("SG_TEMPLATE_ID".to_string()))?;

        let body = MailSend {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: invite.to_email.clone(),
                    name: invite.to_name.clone(),
                }],
                dynamic_template_data: TemplateData {
                    registration_url: &invite.registration_url,
                    invite_token: &invite.invite_token,
                },
            }],
            from: &self.from,
            template_id,
        };

        debug!(to = %invite.to_email, "posting invitation to sendgrid");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = %invite.to_email, status = status.as_u16(), "invitation accepted by sendgrid");
        Ok(())
    }
}
