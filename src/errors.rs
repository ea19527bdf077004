use axum::{Json, http::StatusCode, response::IntoResponse};
use jsonwebtoken::errors::Error as JWError;
use serde::Serialize;
use surrealdb::Error as SError;

use thiserror::Error;
use tracing::{error, warn};

use crate::{
    clients::{identity::IdentityError, mail::MailError},
    consts::message_const::EMAIL_CHANGE_FAILED,
    models::user::EntityId,
    utils::invite_token::InviteTokenError,
};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON Web Token Error: {0}")]
    JwTError(#[from] JWError),

    #[error("SurrealDb Error: {0}")]
    SurrealError(#[from] SError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Validator Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Form Rejection Error: {0}")]
    AxumJsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("{message}")]
    Transport { step: &'static str, message: String },

    #[error("Identity provider Error: {0}")]
    Identity(IdentityError),

    #[error("{0}")]
    InviteToken(#[from] InviteTokenError),

    #[error("No user record for uid `{0}`")]
    InviterNotFound(String),

    #[error("Role `{0}` does not exist")]
    RoleNotFound(EntityId),

    #[error("Account `{0}` is already registered")]
    AccountExists(String),

    #[error("Account `{0}` is not registered")]
    AccountNotFound(String),

    #[error("Unable to update email address: {0}")]
    EmailChange(IdentityError),

    #[error("unknown Error")]
    Unknown,

    // ! Auth
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Invalid authorization scheme")]
    InvalidScheme,
}

impl Error {
    /// Wrap a failed mail dispatch, keeping configuration problems apart from
    /// in-flight transport failures.
    pub fn from_mail(step: &'static str, err: MailError) -> Self {
        match err {
            MailError::Config(key) => Error::Configuration(key),
            other => Error::Transport {
                step,
                message: other.to_string(),
            },
        }
    }

    /// A mail client that cannot be built at startup is a deployment problem,
    /// never an in-flight transport failure.
    pub fn from_mail_setup(err: MailError) -> Self {
        match err {
            MailError::Config(key) => Error::Configuration(key),
            other => Error::Configuration(format!("SendGrid client ({})", other)),
        }
    }

    /// The failing step reported alongside server errors, if any.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            Error::Transport { step, .. } => Some(*step),
            Error::InviterNotFound(_) => Some(crate::consts::invite_const::STEP_FIND_INVITER),
            _ => None,
        }
    }
}

impl From<IdentityError> for Error {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Config(key) => Error::Configuration(key),
            other => Error::Identity(other),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<&'static str>,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let step = self.step();
        let (status, message) = match self {
            Error::JwTError(error) => {
                error!("JWT Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::SurrealError(error) => {
                error!("Surreal  Error:{:#?}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            Error::IoError(error) => {
                error!("Io  Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::ConfigError(error) => {
                error!("Config Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error".to_string(),
                )
            }
            Error::ValidationError(error) => {
                let message = format!("Input validation error: [{}]", error).replace('\n', ", ");
                warn!("Validation Error:{:#?}", error);
                (StatusCode::BAD_REQUEST, message)
            }
            Error::AxumJsonRejection(error) => {
                warn!("Axum Json Rejection Error:{:#?}", error);
                (StatusCode::BAD_REQUEST, error.to_string())
            }
            Error::Configuration(key) => {
                error!("Missing configuration: {}", key);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server is missing configuration: {}", key),
                )
            }
            Error::Transport { step, message } => {
                error!(step, "Transport Error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Error::Identity(error) => {
                error!("Identity provider Error:{:#?}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            Error::InviteToken(error) => {
                warn!("Invite token rejected: {}", error);
                (StatusCode::UNAUTHORIZED, error.to_string())
            }
            Error::InviterNotFound(uid) => {
                error!("No user record for authenticated uid {}", uid);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Inviting user has no account".to_string(),
                )
            }
            Error::RoleNotFound(role_id) => (
                StatusCode::NOT_FOUND,
                format!("Role {} does not exist", role_id),
            ),
            Error::AccountExists(uid) => (
                StatusCode::CONFLICT,
                format!("Account {} is already registered", uid),
            ),
            Error::AccountNotFound(uid) => (
                StatusCode::NOT_FOUND,
                format!("Account {} is not registered", uid),
            ),
            Error::EmailChange(error) => {
                error!("Email change Error:{:#?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EMAIL_CHANGE_FAILED.to_string(),
                )
            }
            Error::Unknown => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown".to_string(),
            ),
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing authorization token".to_string(),
            ),
            Error::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization token".to_string(),
            ),
            Error::InvalidScheme => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization scheme".to_string(),
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                step,
            }),
        )
            .into_response()
    }
}
