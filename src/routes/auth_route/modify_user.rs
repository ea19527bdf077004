use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use crate::{
    consts::message_const::PASSWORD_RESET_SENT,
    errors::{Error, Result},
    models::user::RequesterIdentity,
    state::AppState,
    utils::validated_form::ValidatedJson,
};

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: String,
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<SuccessResponse>> {
    state.identity.send_password_reset(&input.email).await?;

    Ok(Json(SuccessResponse {
        success: PASSWORD_RESET_SENT.to_string(),
    }))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailRequest {
    #[validate(email)]
    pub new_email: String,
}

/// Changes the caller's own email address at the identity provider.
pub async fn change_email(
    State(state): State<AppState>,
    requester: RequesterIdentity,
    ValidatedJson(input): ValidatedJson<ChangeEmailRequest>,
) -> Result<Json<SuccessResponse>> {
    state
        .identity
        .update_email(&requester.id_token, &input.new_email)
        .await
        .map_err(Error::EmailChange)?;

    tracing::info!(uid = %requester.uid, "email address changed");
    Ok(Json(SuccessResponse {
        success: format!("Your email address has been changed to {}", input.new_email),
    }))
}
