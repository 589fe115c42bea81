//! Diesel table definitions.
//!
//! Must match `backend/migrations`. Regenerate with `diesel print-schema`
//! when the migrations change.

diesel::table! {
    /// Registered users.
    ///
    /// `username` carries a unique index; `secret` holds a PHC hash string.
    users (id) {
        /// Primary key assigned by a `BIGSERIAL` sequence.
        id -> Int8,
        username -> Varchar,
        secret -> Varchar,
        nickname -> Nullable<Varchar>,
        avatar_ref -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
