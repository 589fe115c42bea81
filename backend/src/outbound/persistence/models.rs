//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; `diesel_user_store` converts them
//! to and from domain types.

use diesel::prelude::*;

use super::schema::users;

/// Row read from `users`. Audit timestamps are not selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub secret: String,
    pub nickname: Option<String>,
    pub avatar_ref: Option<String>,
}

/// Insertable user; `id` comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub secret: &'a str,
    pub nickname: Option<&'a str>,
    pub avatar_ref: Option<&'a str>,
}
