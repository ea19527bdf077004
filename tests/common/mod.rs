#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;
use invite_auth::{
    app,
    clients::{
        identity::{IdentityError, IdentityProvider},
        mail::SendGridMailer,
    },
    config::Config,
    directory::UserDirectory,
    errors::{Error, Result},
    models::user::{EntityId, NewUser, RequesterIdentity, UserRecord},
    state::AppState,
};
use wiremock::MockServer;

pub const SECRET: &str = "test-invite-secret";
pub const SG_KEY: &str = "SG.test-key";

/// In-memory stand-in for the SurrealDB directory.
#[derive(Default)]
pub struct FakeDirectory {
    pub users: Mutex<HashMap<String, UserRecord>>,
    pub roles: Mutex<HashSet<EntityId>>,
    pub fail_add: bool,
}

impl FakeDirectory {
    pub fn with_inviter(uid: &str, id: i64, organization_id: i64) -> Self {
        let directory = FakeDirectory::default();
        directory.users.lock().unwrap().insert(
            uid.to_string(),
            UserRecord {
                id: id.into(),
                uid: uid.to_string(),
                email: Some(format!("{}@example.com", uid)),
                first_name: "In".to_string(),
                last_name: "Viter".to_string(),
                phone: None,
                organization_id: organization_id.into(),
                role_id: 1.into(),
                invited_by: None,
                created_at: Utc::now(),
            },
        );
        directory
    }

    pub fn with_role(self, role_id: i64) -> Self {
        self.roles.lock().unwrap().insert(role_id.into());
        self
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(uid).cloned())
    }

    async fn role_exists(&self, role_id: &EntityId) -> Result<bool> {
        Ok(self.roles.lock().unwrap().contains(role_id))
    }

    async fn add_user(&self, user: NewUser) -> Result<UserRecord> {
        if self.fail_add {
            return Err(Error::Unknown);
        }
        let record = user.clone().into_record(EntityId::Str(user.uid.clone()));
        self.users
            .lock()
            .unwrap()
            .insert(user.uid, record.clone());
        Ok(record)
    }
}

/// Accepts ID tokens of the form `token-<uid>`.
#[derive(Default)]
pub struct FakeIdentity {
    pub deleted: Mutex<Vec<String>>,
    pub password_resets: Mutex<Vec<String>>,
    pub email_updates: Mutex<Vec<(String, String)>>,
    pub fail_updates: bool,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> std::result::Result<RequesterIdentity, IdentityError> {
        let uid = id_token
            .strip_prefix("token-")
            .ok_or_else(|| IdentityError::Rejected("INVALID_ID_TOKEN".to_string()))?;
        Ok(RequesterIdentity {
            uid: uid.to_string(),
            email: Some(format!("{}@example.com", uid)),
            id_token: id_token.to_string(),
        })
    }

    async fn delete_account(&self, id_token: &str) -> std::result::Result<(), IdentityError> {
        self.deleted.lock().unwrap().push(id_token.to_string());
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> std::result::Result<(), IdentityError> {
        self.password_resets.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn update_email(
        &self,
        id_token: &str,
        new_email: &str,
    ) -> std::result::Result<(), IdentityError> {
        if self.fail_updates {
            return Err(IdentityError::Rejected("TOKEN_EXPIRED".to_string()));
        }
        self.email_updates
            .lock()
            .unwrap()
            .push((id_token.to_string(), new_email.to_string()));
        Ok(())
    }
}

pub fn config(sendgrid_url: &str) -> Config {
    Config::from_toml(&format!(
        r#"
        invite_secret = "{SECRET}"
        sg_api_key = "{SG_KEY}"
        sg_template_id = "d-invite"
        register_url = "https://app.example.com/register"
        sg_api_url = "{sendgrid_url}"
        mail_timeout_secs = 5
        "#
    ))
    .expect("test config")
}

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub directory: Arc<FakeDirectory>,
    pub identity: Arc<FakeIdentity>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(
        sendgrid: &MockServer,
        directory: FakeDirectory,
        identity: FakeIdentity,
    ) -> Self {
        let config = config(&sendgrid.uri());
        let directory = Arc::new(directory);
        let identity = Arc::new(identity);
        let mailer = SendGridMailer::new(&config).expect("sendgrid client");

        let state = AppState::from_parts(
            &config,
            directory.clone(),
            identity.clone(),
            Arc::new(mailer),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            directory,
            identity,
            handle,
        }
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
