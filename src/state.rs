use std::sync::Arc;

use crate::{
    clients::{
        identity::{FirebaseIdentity, IdentityProvider},
        mail::{Mailer, SendGridMailer},
    },
    config::Config,
    directory::{SurrealDirectory, UserDirectory},
    errors::{Error, Result},
    services::invitation::InvitationIssuer,
    utils::invite_token::InviteCodec,
};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub identity: Arc<dyn IdentityProvider>,
    pub codec: InviteCodec,
    pub issuer: Arc<InvitationIssuer>,
}

impl AppState {
    pub async fn init(config: &Config) -> Result<Self> {
        let directory = SurrealDirectory::connect(config).await?;
        let identity = FirebaseIdentity::new(config)?;
        let mailer = SendGridMailer::new(config).map_err(Error::from_mail_setup)?;

        Ok(Self::from_parts(
            config,
            Arc::new(directory),
            Arc::new(identity),
            Arc::new(mailer),
        ))
    }

    /// Wires the shared state around already-built collaborators.
    pub fn from_parts(
        config: &Config,
        directory: Arc<dyn UserDirectory>,
        identity: Arc<dyn IdentityProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let codec = InviteCodec::from_config(config);
        let issuer = InvitationIssuer::new(
            directory.clone(),
            codec.clone(),
            mailer,
            config.register_url.clone(),
        );

        Self {
            directory,
            identity,
            codec,
            issuer: Arc::new(issuer),
        }
    }
}
