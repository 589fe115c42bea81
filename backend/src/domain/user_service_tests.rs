//! Tests for the account and profile services.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockSecretHasher, MockUserCache, MockUserStore, UserCacheError};
use crate::domain::{ErrorCode, Nickname, SecretHash, User, Username};

type Service = UserAccountService<MockUserStore, MockUserCache, MockSecretHasher>;

fn service(store: MockUserStore, cache: MockUserCache, hasher: MockSecretHasher) -> Service {
    UserAccountService::new(
        UserOrchestrator::new(Arc::new(store), Arc::new(cache)),
        Arc::new(hasher),
    )
}

fn stored_alice() -> User {
    NewUser::new(
        Username::new("alice").expect("valid username"),
        SecretHash::new("$argon2id$alice").expect("non-empty hash"),
    )
    .into_user(UserId::new(1).expect("positive id"))
}

fn relaxed_cache() -> MockUserCache {
    let mut cache = MockUserCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_put().returning(|_| Ok(()));
    cache
}

fn ctx() -> OperationContext {
    OperationContext::background()
}

#[rstest]
#[tokio::test]
async fn register_hashes_and_creates_when_name_is_free() {
    let mut store = MockUserStore::new();
    store.expect_find_by_username().times(1).return_once(|_| Ok(None));
    store
        .expect_create()
        .withf(|draft| {
            draft.secret().as_ref() == "$argon2id$hashed"
                && draft.nickname().map(AsRef::as_ref) == Some("Al")
        })
        .times(1)
        .return_once(|_| Ok(UserId::new(1).expect("positive id")));
    let mut hasher = MockSecretHasher::new();
    hasher
        .expect_hash()
        .withf(|plain| plain == "s1")
        .times(1)
        .return_once(|_| Ok(SecretHash::new("$argon2id$hashed").expect("non-empty hash")));

    let registration =
        Registration::try_from_parts("alice", "s1", Some("Al")).expect("valid registration");
    let profile = service(store, relaxed_cache(), hasher)
        .register(&ctx(), &registration)
        .await
        .expect("registration succeeds");
    assert_eq!(profile.id.get(), 1);
    assert_eq!(profile.username.as_ref(), "alice");
    assert_eq!(profile.nickname, Some(Nickname::new("Al").expect("valid nickname")));
}

#[rstest]
#[tokio::test]
async fn register_rejects_taken_name_before_hashing() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored_alice())));
    store.expect_create().never();
    let mut hasher = MockSecretHasher::new();
    hasher.expect_hash().never();

    let registration = Registration::try_from_parts("alice", "s1", None).expect("valid");
    let err = service(store, relaxed_cache(), hasher)
        .register(&ctx(), &registration)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn register_maps_racing_duplicate_to_conflict() {
    let mut store = MockUserStore::new();
    store.expect_find_by_username().times(1).return_once(|_| Ok(None));
    store
        .expect_create()
        .times(1)
        .return_once(|_| Err(UserStoreError::duplicate_username("alice")));
    let mut hasher = MockSecretHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(SecretHash::new("$argon2id$hashed").expect("non-empty hash")));

    let registration = Registration::try_from_parts("alice", "s1", None).expect("valid");
    let err = service(store, relaxed_cache(), hasher)
        .register(&ctx(), &registration)
        .await
        .expect_err("lost race");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(UserStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserStoreError::query("boom"), ErrorCode::InternalError)]
#[tokio::test]
async fn register_surfaces_store_failures(
    #[case] failure: UserStoreError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_username()
        .times(1)
        .return_once(move |_| Err(failure));
    let registration = Registration::try_from_parts("alice", "s1", None).expect("valid");
    let err = service(store, relaxed_cache(), MockSecretHasher::new())
        .register(&ctx(), &registration)
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::Unauthorized))]
#[tokio::test]
async fn authenticate_checks_the_stored_hash(
    #[case] verifies: bool,
    #[case] expected_error: Option<ErrorCode>,
) {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored_alice())));
    let mut hasher = MockSecretHasher::new();
    hasher
        .expect_verify()
        .withf(|hash, plain| hash.as_ref() == "$argon2id$alice" && plain == "s1")
        .times(1)
        .return_once(move |_, _| Ok(verifies));

    let creds = LoginCredentials::try_from_parts("alice", "s1").expect("valid");
    let result = service(store, relaxed_cache(), hasher)
        .authenticate(&ctx(), &creds)
        .await;
    match expected_error {
        None => assert_eq!(result.expect("authenticated").get(), 1),
        Some(code) => assert_eq!(result.expect_err("rejected").code(), code),
    }
}

#[rstest]
#[tokio::test]
async fn authenticate_hides_unknown_usernames() {
    let mut store = MockUserStore::new();
    store.expect_find_by_username().times(1).return_once(|_| Ok(None));
    let mut hasher = MockSecretHasher::new();
    hasher.expect_verify().never();

    let creds = LoginCredentials::try_from_parts("mallory", "pw").expect("valid");
    let err = service(store, relaxed_cache(), hasher)
        .authenticate(&ctx(), &creds)
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn profile_survives_cache_outage() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(stored_alice())));
    let mut cache = MockUserCache::new();
    cache
        .expect_get()
        .return_once(|_| Err(UserCacheError::backend("down")));
    cache
        .expect_put()
        .return_once(|_| Err(UserCacheError::backend("down")));

    let profile = service(store, cache, MockSecretHasher::new())
        .profile(&ctx(), UserId::new(1).expect("positive id"))
        .await
        .expect("persistent fallback");
    assert_eq!(profile.username.as_ref(), "alice");
    assert!(profile.nickname.is_none());
    assert!(profile.avatar_ref.is_none());
}

#[rstest]
#[tokio::test]
async fn update_profile_maps_missing_user() {
    let mut store = MockUserStore::new();
    store
        .expect_update_field()
        .times(1)
        .return_once(|_, _| Err(UserStoreError::missing_user(4_i64)));

    let field = ProfileField::Nickname(Nickname::new("bob").expect("valid nickname"));
    let err = service(store, relaxed_cache(), MockSecretHasher::new())
        .update_profile(&ctx(), UserId::new(4).expect("positive id"), field)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn cancelled_request_is_service_unavailable() {
    let ctx = OperationContext::background();
    ctx.cancel();
    let mut store = MockUserStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));
    let mut cache = MockUserCache::new();
    cache.expect_get().returning(|_| Ok(None));

    let err = service(store, cache, MockSecretHasher::new())
        .profile(&ctx, UserId::new(1).expect("positive id"))
        .await
        .expect_err("cancelled");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
