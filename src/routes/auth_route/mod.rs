use axum::{Router, middleware, routing::post};

use crate::{
    middleware::validate_id_token,
    routes::auth_route::{
        invitation::send_invitation,
        modify_user::{change_email, forgot_password},
        user::{login, register},
    },
    state::AppState,
};

pub mod invitation;
pub mod modify_user;
pub mod user;

pub fn auth_router(config: AppState) -> Router<AppState> {
    let unprotected = |config: AppState| -> Router<AppState> {
        Router::new()
            .route("/forgotPassword", post(forgot_password))
            .with_state(config)
    };
    let protected = |config: AppState| -> Router<AppState> {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/changeEmail", post(change_email))
            .route("/invite", post(send_invitation))
            .layer(middleware::from_fn_with_state(
                config.clone(),
                validate_id_token,
            ))
            .with_state(config)
    };
    Router::new()
        .merge(unprotected(config.clone()))
        .merge(protected(config.clone()))
        .with_state(config)
}
