use axum::{Json, extract::State, http::StatusCode};

use crate::{
    errors::{Error, Result},
    models::{
        invitation::{InviteAck, InviteTarget},
        user::{EntityId, RequesterIdentity},
    },
    state::AppState,
    utils::validated_form::ValidatedJson,
};

pub async fn send_invitation(
    State(state): State<AppState>,
    requester: RequesterIdentity,
    ValidatedJson(input): ValidatedJson<InviteTarget>,
) -> Result<(StatusCode, Json<InviteAck>)> {
    check_role_exists(&state, &input.role_id).await?;

    let ack = state.issuer.issue(&requester, &input).await?;

    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// Role gate: an invitation may only grant a role that exists.
async fn check_role_exists(state: &AppState, role_id: &EntityId) -> Result<()> {
    if !state.directory.role_exists(role_id).await? {
        return Err(Error::RoleNotFound(role_id.clone()));
    }
    Ok(())
}
