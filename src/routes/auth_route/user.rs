use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::{error, info};
use validator::Validate;

use crate::{
    errors::{Error, Result},
    models::user::{NewUser, RequesterIdentity, UserRecord},
    state::AppState,
    utils::{
        validated_form::ValidatedJson,
        validator::{validate_person_name, validate_phone},
    },
};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub invite_token: String,
    #[validate(custom(function = "validate_person_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_person_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    requester: RequesterIdentity,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserRecord>)> {
    if state.directory.find_by_uid(&requester.uid).await?.is_some() {
        return Err(Error::AccountExists(requester.uid));
    }

    let claims = state.codec.verify(&input.invite_token)?;

    let user_data = NewUser {
        uid: requester.uid.clone(),
        email: requester.email.clone(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        phone: input.phone,
        organization_id: claims.organization_id().clone(),
        role_id: claims.role_id().clone(),
        invited_by: Some(claims.inviter().clone()),
        created_at: Utc::now(),
    };

    match state.directory.add_user(user_data).await {
        Ok(user) => {
            info!(uid = %user.uid, organization = %user.organization_id, "user registered");
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(err) => {
            // roll back the provider account so the uid can register again
            error!(uid = %requester.uid, "failed to store user: {}", err);
            if let Err(cleanup) = state.identity.delete_account(&requester.id_token).await {
                error!(uid = %requester.uid, "failed to delete identity account: {}", cleanup);
            }
            Err(err)
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    requester: RequesterIdentity,
) -> Result<Json<UserRecord>> {
    let user = state
        .directory
        .find_by_uid(&requester.uid)
        .await?
        .ok_or_else(|| Error::AccountNotFound(requester.uid.clone()))?;

    Ok(Json(user))
}
