//! Tests for the consistency orchestrator.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockUserCache, MockUserStore, UserCacheError};
use crate::domain::{AvatarRef, Nickname, SecretHash};

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

fn draft(username: &str) -> NewUser {
    NewUser::new(
        Username::new(username).expect("valid username"),
        SecretHash::new("$argon2id$stub").expect("non-empty hash"),
    )
}

#[fixture]
fn alice() -> User {
    draft("alice").into_user(user_id(1))
}

fn orchestrator(
    store: MockUserStore,
    cache: MockUserCache,
) -> UserOrchestrator<MockUserStore, MockUserCache> {
    UserOrchestrator::new(Arc::new(store), Arc::new(cache))
}

#[rstest]
#[tokio::test]
async fn create_assigns_id_then_caches() {
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|_| Ok(UserId::new(1).expect("positive id")));
    let mut cache = MockUserCache::new();
    cache
        .expect_put()
        .withf(|user| user.id().get() == 1 && user.username().as_ref() == "alice")
        .times(1)
        .return_once(|_| Ok(()));

    let created = orchestrator(store, cache)
        .create(&OperationContext::background(), draft("alice"))
        .await
        .expect("create succeeds");
    assert_eq!(created.id(), user_id(1));
}

#[rstest]
#[tokio::test]
async fn create_swallows_cache_failure() {
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|_| Ok(UserId::new(5).expect("positive id")));
    let mut cache = MockUserCache::new();
    cache
        .expect_put()
        .times(1)
        .return_once(|_| Err(UserCacheError::backend("connection refused")));

    let created = orchestrator(store, cache)
        .create(&OperationContext::background(), draft("bob"))
        .await
        .expect("cache failure must not fail create");
    assert_eq!(created.id(), user_id(5));
}

#[rstest]
#[case(UserStoreError::duplicate_username("alice"), ConsistencyError::DuplicateUsername { username: "alice".into() })]
#[case(UserStoreError::connection("down"), ConsistencyError::Persistence(UserStoreError::connection("down")))]
#[tokio::test]
async fn create_persistent_failure_leaves_cache_untouched(
    #[case] failure: UserStoreError,
    #[case] expected: ConsistencyError,
) {
    let mut store = MockUserStore::new();
    store.expect_create().times(1).return_once(move |_| Err(failure));
    let mut cache = MockUserCache::new();
    cache.expect_put().never();

    let error = orchestrator(store, cache)
        .create(&OperationContext::background(), draft("alice"))
        .await
        .expect_err("persistent failure surfaces");
    assert_eq!(error, expected);
}

#[rstest]
#[tokio::test]
async fn read_by_id_returns_cache_hit_without_store(alice: User) {
    let mut store = MockUserStore::new();
    store.expect_find_by_id().never();
    let mut cache = MockUserCache::new();
    let hit = alice.clone();
    cache.expect_get().times(1).return_once(move |_| Ok(Some(hit)));
    cache.expect_put().never();

    let found = orchestrator(store, cache)
        .read_by_id(&OperationContext::background(), user_id(1))
        .await
        .expect("cache hit");
    assert_eq!(found, alice);
}

#[rstest]
#[case(Ok(None))]
#[case(Err(UserCacheError::serialization("truncated payload")))]
#[tokio::test]
async fn read_through_repopulates_after_fallback(
    alice: User,
    #[case] cache_result: Result<Option<User>, UserCacheError>,
) {
    let mut store = MockUserStore::new();
    let row = alice.clone();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(row)));
    let mut cache = MockUserCache::new();
    cache.expect_get().times(1).return_once(move |_| cache_result);
    let expected = alice.clone();
    cache
        .expect_put()
        .withf(move |user| *user == expected)
        .times(1)
        .return_once(|_| Ok(()));

    let found = orchestrator(store, cache)
        .read_by_id(&OperationContext::background(), user_id(1))
        .await
        .expect("fallback read");
    assert_eq!(found, alice);
}

#[rstest]
#[tokio::test]
async fn cache_aside_skips_repopulation(alice: User) {
    let mut store = MockUserStore::new();
    let row = alice.clone();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(row)));
    let mut cache = MockUserCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache.expect_put().never();

    let found = orchestrator(store, cache)
        .with_read_policy(ReadPolicy::CacheAside)
        .read_by_id(&OperationContext::background(), user_id(1))
        .await
        .expect("fallback read");
    assert_eq!(found, alice);
}

#[rstest]
#[tokio::test]
async fn read_by_id_surfaces_missing_and_failing_store() {
    let mut store = MockUserStore::new();
    store.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let mut cache = MockUserCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    let error = orchestrator(store, cache)
        .read_by_id(&OperationContext::background(), user_id(9))
        .await
        .expect_err("missing user");
    assert!(matches!(error, ConsistencyError::NotFound { .. }));

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Err(UserStoreError::query("syntax")));
    let mut cache = MockUserCache::new();
    cache
        .expect_get()
        .times(1)
        .return_once(|_| Err(UserCacheError::backend("down")));
    let error = orchestrator(store, cache)
        .read_by_id(&OperationContext::background(), user_id(9))
        .await
        .expect_err("both stores failing");
    assert_eq!(error, ConsistencyError::Persistence(UserStoreError::query("syntax")));
}

#[rstest]
#[tokio::test]
async fn read_by_username_uses_store_only(alice: User) {
    let mut store = MockUserStore::new();
    let row = alice.clone();
    store
        .expect_find_by_username()
        .withf(|name| name.as_ref() == "alice")
        .times(1)
        .return_once(move |_| Ok(Some(row)));
    let mut cache = MockUserCache::new();
    cache.expect_get().never();
    cache.expect_put().never();

    let username = Username::new("alice").expect("valid username");
    let found = orchestrator(store, cache)
        .read_by_username(&OperationContext::background(), &username)
        .await
        .expect("persistent hit");
    assert_eq!(found, alice);
}

#[rstest]
#[tokio::test]
async fn update_failure_leaves_cache_untouched() {
    let mut store = MockUserStore::new();
    store
        .expect_update_field()
        .times(1)
        .return_once(|_, _| Err(UserStoreError::missing_user(3_i64)));
    let mut cache = MockUserCache::new();
    cache.expect_get().never();
    cache.expect_put().never();

    let field = ProfileField::Nickname(Nickname::new("bob").expect("valid nickname"));
    let error = orchestrator(store, cache)
        .update_field(&OperationContext::background(), user_id(3), field)
        .await
        .expect_err("missing user");
    assert_eq!(
        error,
        ConsistencyError::NotFound {
            lookup: "id 3".into()
        }
    );
}

#[rstest]
#[tokio::test]
async fn update_applies_field_to_cached_copy(mut alice: User) {
    let avatar = AvatarRef::new("old.png").expect("valid avatar");
    alice.apply(&ProfileField::AvatarRef(avatar.clone()));

    let mut store = MockUserStore::new();
    store.expect_update_field().times(1).return_once(|_, _| Ok(()));
    store.expect_find_by_id().never();
    let mut cache = MockUserCache::new();
    cache.expect_get().times(1).return_once(move |_| Ok(Some(alice)));
    cache
        .expect_put()
        .withf(move |user| {
            user.nickname().map(AsRef::as_ref) == Some("bob")
                && user.avatar_ref().map(AsRef::as_ref) == Some("old.png")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let field = ProfileField::Nickname(Nickname::new("bob").expect("valid nickname"));
    let updated = orchestrator(store, cache)
        .update_field(&OperationContext::background(), user_id(1), field)
        .await
        .expect("update succeeds");
    assert_eq!(updated.avatar_ref(), Some(&avatar));
}

#[rstest]
#[tokio::test]
async fn update_falls_back_to_store_and_swallows_cache_write_failure(alice: User) {
    let mut persisted = alice.clone();
    persisted.apply(&ProfileField::Nickname(
        Nickname::new("bob").expect("valid nickname"),
    ));

    let mut store = MockUserStore::new();
    store.expect_update_field().times(1).return_once(|_, _| Ok(()));
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(persisted)));
    let mut cache = MockUserCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache
        .expect_put()
        .times(1)
        .return_once(|_| Err(UserCacheError::backend("timeout")));

    let field = ProfileField::Nickname(Nickname::new("bob").expect("valid nickname"));
    let updated = orchestrator(store, cache)
        .update_field(&OperationContext::background(), user_id(1), field)
        .await
        .expect("cache failure is swallowed");
    assert_eq!(updated.nickname().map(AsRef::as_ref), Some("bob"));
}

#[rstest]
#[tokio::test]
async fn cancelled_context_interrupts_create() {
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .returning(|_| Ok(UserId::new(1).expect("positive id")));
    let mut cache = MockUserCache::new();
    cache.expect_put().never();

    let ctx = OperationContext::background();
    ctx.cancel();
    let error = orchestrator(store, cache)
        .create(&ctx, draft("alice"))
        .await
        .expect_err("cancelled");
    assert_eq!(error, ConsistencyError::Interrupted(Interrupted::Cancelled));
}

#[rstest]
#[case("read-through", Ok(ReadPolicy::ReadThrough))]
#[case(" Cache-Aside ", Ok(ReadPolicy::CacheAside))]
#[case("write-back", Err(ReadPolicyParseError("write-back".into())))]
fn read_policy_parses(#[case] raw: &str, #[case] expected: Result<ReadPolicy, ReadPolicyParseError>) {
    assert_eq!(raw.parse::<ReadPolicy>(), expected);
}
