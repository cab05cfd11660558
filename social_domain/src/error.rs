use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::borrow::Cow;
use std::collections::HashMap;

pub type SocialResult<T, E = SocialError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum SocialError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("user profile not found")]
    ProfileNotFound,

    #[error("cannot follow yourself")]
    SelfFollowRejected,

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: Cow<'static, str>,
    },

    #[error("an error occurred with the database")]
    Sqlx(#[from] sqlx::Error),

    #[error("an internal server error occurred")]
    Anyhow(#[from] anyhow::Error),
}

impl SocialError {
    pub fn validation(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::SelfFollowRejected => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Sqlx(_) | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                self.status_code(),
                [(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))]
                    .into_iter()
                    .collect::<HeaderMap>(),
                self.to_string(),
            )
                .into_response(),
            Self::ProfileNotFound => (self.status_code(), ()).into_response(),
            Self::SelfFollowRejected => unprocessable_entity_with_errors([(
                "target_user_id".into(),
                vec!["cannot follow yourself".into()],
            )]),
            Self::Validation { field, message } => {
                unprocessable_entity_with_errors([(field.into(), vec![message])])
            }
            Self::Sqlx(ref e) => {
                tracing::error!("SQLx error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Anyhow(ref e) => {
                tracing::error!("Generic error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
        }
    }
}

#[derive(serde::Serialize)]
struct JsonErrors {
    errors: HashMap<Cow<'static, str>, Vec<Cow<'static, str>>>,
}

fn unprocessable_entity_with_errors(
    errors: impl Into<HashMap<Cow<'static, str>, Vec<Cow<'static, str>>>>,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(JsonErrors {
            errors: errors.into(),
        }),
    )
        .into_response()
}
