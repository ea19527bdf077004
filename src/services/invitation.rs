use std::sync::Arc;

use reqwest::Url;
use tracing::info;
use validator::Validate;

use crate::{
    clients::mail::{InviteEmail, Mailer},
    consts::invite_const::{INVITE_TOKEN_QUERY_PARAM, STEP_SENDGRID_INVITE},
    directory::UserDirectory,
    errors::{Error, Result},
    models::{
        invitation::{InvitationClaims, InviteAck, InviteTarget},
        user::RequesterIdentity,
    },
    utils::invite_token::InviteCodec,
};

/// Sends organization invitations: resolve the inviter, sign a token, mail it.
pub struct InvitationIssuer {
    directory: Arc<dyn UserDirectory>,
    codec: InviteCodec,
    mailer: Arc<dyn Mailer>,
    register_url: Option<String>,
}

impl InvitationIssuer {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        codec: InviteCodec,
        mailer: Arc<dyn Mailer>,
        register_url: Option<String>,
    ) -> Self {
        Self {
            directory,
            codec,
            mailer,
            register_url: register_url.filter(|url| !url.is_empty()),
        }
    }

    /// Issues one invitation. Every failure before the mail call leaves no side
    /// effect; a failed mail call is reported with the `sendgridInvite` step and
    /// is not retried.
    pub async fn issue(
        &self,
        requester: &RequesterIdentity,
        target: &InviteTarget,
    ) -> Result<InviteAck> {
        target.validate()?;

        let inviter = self
            .directory
            .find_by_uid(&requester.uid)
            .await?
            .ok_or_else(|| Error::InviterNotFound(requester.uid.clone()))?;

        let claims = InvitationClaims::new(
            inviter.organization_id.clone(),
            target.role_id.clone(),
            inviter.id.clone(),
        );
        let invite_token = self.codec.mint(&claims)?;
        let registration_url = self.registration_link(&invite_token)?;

        let email = InviteEmail {
            to_email: target.email.clone(),
            to_name: target.name.clone(),
            registration_url,
            invite_token,
        };
        self.mailer
            .send_invite(&email)
            .await
            .map_err(|err| Error::from_mail(STEP_SENDGRID_INVITE, err))?;

        info!(
            inviter = %inviter.id,
            organization = %inviter.organization_id,
            role = %target.role_id,
            "invitation sent"
        );
        Ok(InviteAck::sent_to(&target.email))
    }

    fn registration_link(&self, token: &str) -> Result<String> {
        let base = self
            .register_url
            .as_deref()
            .ok_or_else(|| Error::Configuration("REGISTER_URL".to_string()))?;
        let mut url = Url::parse(base)
            .map_err(|err| Error::Configuration(format!("REGISTER_URL ({})", err)))?;
        url.query_pairs_mut()
            .append_pair(INVITE_TOKEN_QUERY_PARAM, token);
        Ok(url.into())
    }
}
