//! Process configuration.
//!
//! Loaded once at startup from an optional `auth.toml` and then the process
//! environment (`INVITE_SECRET`, `SG_API_KEY`, ...), and injected into the
//! clients that need it. Nothing reads the environment after this point.

use std::{fmt, time::Duration};

use serde::Deserialize;

use crate::errors::Result;

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // ? invitation signing
    #[serde(default)]
    pub invite_secret: Option<String>,

    // ? sendgrid
    #[serde(default)]
    pub sg_api_key: Option<String>,
    #[serde(default)]
    pub sg_template_id: Option<String>,
    #[serde(default)]
    pub register_url: Option<String>,
    #[serde(default = "default_sg_api_url")]
    pub sg_api_url: String,
    #[serde(default = "default_sender_email")]
    pub sg_sender_email: String,
    #[serde(default = "default_sender_name")]
    pub sg_sender_name: String,
    #[serde(default = "default_mail_timeout_secs")]
    pub mail_timeout_secs: u64,

    // ? identity provider
    #[serde(default)]
    pub firebase_api_key: Option<String>,
    #[serde(default = "default_identity_api_url")]
    pub identity_api_url: String,

    // ? surrealdb
    #[serde(default = "default_db_address")]
    pub db_address: String,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default = "default_db_pass")]
    pub db_pass: String,
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3587
}
fn default_sg_api_url() -> String {
    "https://api.sendgrid.com".to_string()
}
fn default_sender_email() -> String {
    "invitation@schematiccapture.com".to_string()
}
fn default_sender_name() -> String {
    "Schematic Capture".to_string()
}
fn default_mail_timeout_secs() -> u64 {
    10
}
fn default_identity_api_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}
fn default_db_address() -> String {
    "localhost:8050".to_string()
}
fn default_db_user() -> String {
    "root".to_string()
}
fn default_db_pass() -> String {
    "secret".to_string()
}
fn default_db_namespace() -> String {
    "test".to_string()
}
fn default_db_name() -> String {
    "test".to_string()
}

impl Config {
    /// Reads `auth.toml` (if present) overlaid by environment variables.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("auth").required(false))
            .add_source(config::Environment::default())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Same as [`Config::load`] but from an in-memory TOML document only.
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }

    /// Names of the settings a fully working deployment needs but that are unset.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        [
            ("INVITE_SECRET", &self.invite_secret),
            ("SG_API_KEY", &self.sg_api_key),
            ("SG_TEMPLATE_ID", &self.sg_template_id),
            ("REGISTER_URL", &self.register_url),
            ("FIREBASE_API_KEY", &self.firebase_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "<redacted>",
        _ => "<unset>",
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("invite_secret", &redact(&self.invite_secret))
            .field("sg_api_key", &redact(&self.sg_api_key))
            .field("sg_template_id", &self.sg_template_id)
            .field("register_url", &self.register_url)
            .field("sg_api_url", &self.sg_api_url)
            .field("sg_sender_email", &self.sg_sender_email)
            .field("sg_sender_name", &self.sg_sender_name)
            .field("mail_timeout_secs", &self.mail_timeout_secs)
            .field("firebase_api_key", &redact(&self.firebase_api_key))
            .field("identity_api_url", &self.identity_api_url)
            .field("db_address", &self.db_address)
            .field("db_user", &self.db_user)
            .field("db_namespace", &self.db_namespace)
            .field("db_name", &self.db_name)
            .finish()
    }
}
