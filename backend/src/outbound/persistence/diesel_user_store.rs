//! PostgreSQL-backed [`UserStore`] using Diesel.
//!
//! Username uniqueness is enforced by the database's unique index, so
//! concurrent registrations of one name race there and the loser sees a
//! `UniqueViolation`, reported as [`UserStoreError::DuplicateUsername`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{
    AvatarRef, NewUser, Nickname, ProfileField, SecretHash, User, UserId, UserValidationError,
    Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the [`UserStore`] port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let corrupt = |err: UserValidationError| {
        UserStoreError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let id = UserId::new(row.id).map_err(corrupt)?;
    let draft = NewUser::new(
        Username::new(&row.username).map_err(corrupt)?,
        SecretHash::new(row.secret.clone()).map_err(corrupt)?,
    )
    .with_nickname(row.nickname.as_deref().map(Nickname::new).transpose().map_err(corrupt)?)
    .with_avatar_ref(
        row.avatar_ref
            .as_deref()
            .map(AvatarRef::new)
            .transpose()
            .map_err(corrupt)?,
    );
    Ok(draft.into_user(id))
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            username: user.username().as_ref(),
            secret: user.secret().as_ref(),
            nickname: user.nickname().map(AsRef::as_ref),
            avatar_ref: user.avatar_ref().map(AsRef::as_ref),
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.username().as_ref())))?;
        debug!(user_id = id, "user row inserted");

        UserId::new(id).map_err(|err| UserStoreError::query(err.to_string()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(row_to_user)
            .transpose()
    }

    async fn update_field(&self, id: UserId, field: &ProfileField) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = users::table.filter(users::id.eq(id.get()));
        let now = diesel::dsl::now;

        let affected = match field {
            ProfileField::Nickname(nickname) => {
                diesel::update(target)
                    .set((
                        users::nickname.eq(Some(nickname.as_ref())),
                        users::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await
            }
            ProfileField::AvatarRef(avatar_ref) => {
                diesel::update(target)
                    .set((
                        users::avatar_ref.eq(Some(avatar_ref.as_ref())),
                        users::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(|err| map_diesel_error(err, None))?;

        if affected == 0 {
            return Err(UserStoreError::missing_user(id.get()));
        }
        debug!(user_id = %id, field = field.name(), "user row updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(nickname: Option<&str>) -> UserRow {
        UserRow {
            id: 3,
            username: "carol".to_owned(),
            secret: "$argon2id$carol".to_owned(),
            nickname: nickname.map(str::to_owned),
            avatar_ref: Some("carol.png".to_owned()),
        }
    }

    #[rstest]
    fn rows_convert_to_users() {
        let user = row_to_user(row(Some("Caz"))).expect("valid row");
        assert_eq!(user.id().get(), 3);
        assert_eq!(user.username().as_ref(), "carol");
        assert_eq!(user.nickname().map(AsRef::as_ref), Some("Caz"));
        assert_eq!(user.avatar_ref().map(AsRef::as_ref), Some("carol.png"));
    }

    #[rstest]
    fn corrupt_rows_become_query_errors() {
        let err = row_to_user(row(Some("   "))).expect_err("blank nickname");
        assert!(matches!(err, UserStoreError::Query { .. }));
    }
}
