//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn alice() -> User {
    let username = Username::new("alice").expect("valid username");
    let secret = SecretHash::new("$argon2id$stub").expect("non-empty hash");
    NewUser::new(username, secret).into_user(UserId::new(1).expect("positive id"))
}

#[rstest]
#[case(0)]
#[case(-4)]
fn user_id_rejects_non_positive(#[case] raw: i64) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
#[case("42", Ok(42))]
#[case("0", Err(UserValidationError::InvalidId))]
#[case("abc", Err(UserValidationError::InvalidId))]
#[case("", Err(UserValidationError::InvalidId))]
fn user_id_parses_path_segments(
    #[case] raw: &str,
    #[case] expected: Result<i64, UserValidationError>,
) {
    assert_eq!(raw.parse::<UserId>().map(UserId::get), expected);
}

#[rstest]
#[case("  bob  ", "bob")]
#[case("a.b-c_d9", "a.b-c_d9")]
#[case("al ice", "al ice")]
#[case("josé", "josé")]
#[case("alice@example.com", "alice@example.com")]
fn username_trims_and_accepts(#[case] raw: &str, #[case] expected: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("\t\n", UserValidationError::EmptyUsername)]
fn username_rejects(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_enforces_length_bound() {
    let at_limit = "é".repeat(FIELD_MAX);
    assert!(Username::new(&at_limit).is_ok());
    let over = "a".repeat(FIELD_MAX + 1);
    assert_eq!(
        Username::new(&over),
        Err(UserValidationError::UsernameTooLong { max: FIELD_MAX })
    );
}

#[rstest]
fn nickname_and_avatar_reject_blank() {
    assert_eq!(Nickname::new(" "), Err(UserValidationError::EmptyNickname));
    assert_eq!(AvatarRef::new(""), Err(UserValidationError::EmptyAvatarRef));
}

#[rstest]
fn secret_hash_debug_is_redacted() {
    let secret = SecretHash::new("$argon2id$v=19$secret").expect("non-empty hash");
    let rendered = format!("{secret:?}");
    assert!(!rendered.contains("argon2id"));
}

#[rstest]
fn new_user_keeps_fields_when_id_assigned(alice: User) {
    assert_eq!(alice.id().get(), 1);
    assert_eq!(alice.username().as_ref(), "alice");
    assert!(alice.nickname().is_none());
    assert!(alice.avatar_ref().is_none());
}

#[rstest]
fn apply_overwrites_only_named_field(mut alice: User) {
    let nickname = Nickname::new("Al").expect("valid nickname");
    alice.apply(&ProfileField::Nickname(nickname.clone()));
    assert_eq!(alice.nickname(), Some(&nickname));
    assert!(alice.avatar_ref().is_none());

    let avatar = AvatarRef::new("al.png").expect("valid avatar");
    alice.apply(&ProfileField::AvatarRef(avatar.clone()));
    assert_eq!(alice.nickname(), Some(&nickname));
    assert_eq!(alice.avatar_ref(), Some(&avatar));
}

#[rstest]
fn profile_projection_omits_secret(alice: User) {
    let profile = alice.profile();
    assert_eq!(profile.id, alice.id());
    assert_eq!(profile.username, *alice.username());
    assert!(!format!("{profile:?}").contains("argon2id"));
}
