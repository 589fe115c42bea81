//! Diesel error mapping for the user store.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserStoreError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> UserStoreError {
    UserStoreError::connection(error.into_message())
}

/// Map a Diesel failure. `username` is reported on unique violations.
pub(super) fn map_diesel_error(error: DieselError, username: Option<&str>) -> UserStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::duplicate_username(username.unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        _ => UserStoreError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StaticInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for StaticInfo {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("users_username_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StaticInfo("boom")))
    }

    #[rstest]
    fn unique_violation_is_duplicate_username() {
        let mapped = map_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation),
            Some("alice"),
        );
        assert_eq!(mapped, UserStoreError::duplicate_username("alice"));
    }

    #[rstest]
    fn closed_connection_is_connection_error() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection), None);
        assert!(matches!(mapped, UserStoreError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn everything_else_is_query_error(#[case] error: DieselError) {
        assert!(matches!(
            map_diesel_error(error, None),
            UserStoreError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, UserStoreError::connection("timed out"));
    }
}
