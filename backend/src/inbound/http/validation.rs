//! Maps domain validation failures onto `invalid_request` payloads.
//!
//! Details always carry `field` and a machine-readable `code`; length
//! violations add `max`.

use serde_json::{Value, json};

use crate::domain::{CredentialValidationError, Error, UserValidationError};

fn field_and_code(err: &UserValidationError) -> (&'static str, &'static str) {
    match err {
        UserValidationError::InvalidId => ("id", "invalid_id"),
        UserValidationError::EmptyUsername => ("username", "empty"),
        UserValidationError::UsernameTooLong { .. } => ("username", "too_long"),
        UserValidationError::EmptySecretHash => ("password", "empty"),
        UserValidationError::EmptyNickname => ("nickname", "empty"),
        UserValidationError::NicknameTooLong { .. } => ("nickname", "too_long"),
        UserValidationError::EmptyAvatarRef => ("avatarRef", "empty"),
        UserValidationError::AvatarRefTooLong { .. } => ("avatarRef", "too_long"),
    }
}

fn details(err: &UserValidationError) -> Value {
    let (field, code) = field_and_code(err);
    match err {
        UserValidationError::UsernameTooLong { max }
        | UserValidationError::NicknameTooLong { max }
        | UserValidationError::AvatarRefTooLong { max } => {
            json!({ "field": field, "code": code, "max": max })
        }
        _ => json!({ "field": field, "code": code }),
    }
}

pub(crate) fn field_error(err: &UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(details(err))
}

pub(crate) fn credential_error(err: &CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::Username(inner) | CredentialValidationError::Nickname(inner) => {
            field_error(inner)
        }
        CredentialValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password", "code": "empty" })),
    }
}
