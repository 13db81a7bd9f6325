use nhadat_auth::domain::repository::OtpStore;
use nhadat_auth::domain::types::MOCK_OTP;
use nhadat_auth::error::{AuthServiceError, OtpError};
use nhadat_auth::infra::memory::InMemoryOtpStore;
use nhadat_auth::usecase::auth::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, ResendOtpUseCase,
    SendLoginOtpUseCase, VerifyOtpUseCase,
};
use nhadat_domain::user::{UserStatus, UserType};

use crate::helpers::{
    MockUserRepo, PlainHasher, TEST_EMAIL, TEST_PASSWORD, TEST_PHONE, mock_engine,
    otp_only_user, test_user, token_service,
};

fn register_input(phone: Option<&str>, email: Option<&str>, password: Option<&str>) -> RegisterInput {
    RegisterInput {
        phone: phone.map(str::to_owned),
        email: email.map(str::to_owned),
        password: password.map(str::to_owned),
        full_name: "Tran Thi B".to_owned(),
        user_type: UserType::Partner,
    }
}

fn login_with_password(identifier: &str, password: &str) -> LoginInput {
    LoginInput {
        identifier: Some(identifier.to_owned()),
        phone: None,
        email: None,
        password: Some(password.to_owned()),
        otp: None,
    }
}

fn login_with_otp(identifier: &str, otp: &str) -> LoginInput {
    LoginInput {
        identifier: Some(identifier.to_owned()),
        phone: None,
        email: None,
        password: None,
        otp: Some(otp.to_owned()),
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_unverified_user_and_sends_otp_to_phone() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    let usecase = RegisterUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&store),
    };

    let id = usecase
        .execute(register_input(Some("+84911111111"), Some("b@example.com"), Some("secret123")))
        .await
        .unwrap();

    let users = handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    let user = &users[0];
    assert_eq!(user.id, id);
    assert_eq!(user.status, UserStatus::Active);
    assert_eq!(user.user_type, UserType::Partner);
    assert!(!user.phone_verified && !user.email_verified);
    assert_eq!(user.password_hash.as_deref(), Some("hashed:secret123"));

    // Phone takes precedence as the OTP destination.
    assert!(store.get("+84911111111").await.unwrap().is_some());
    assert!(store.get("b@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn register_losing_a_race_reports_conflict_without_sending_otp() {
    let mut users = MockUserRepo::new(vec![test_user()]);
    users.stale_existence_check = true;
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    let usecase = RegisterUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&store),
    };

    let result = usecase
        .execute(register_input(Some(TEST_PHONE), None, Some("secret123")))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
    assert_eq!(handle.lock().unwrap().len(), 1);
    assert_eq!(store.entry_count().await, 0);
}

#[tokio::test]
async fn register_without_password_creates_otp_only_account() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    let usecase = RegisterUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&store),
    };

    usecase
        .execute(register_input(None, Some("c@example.com"), None))
        .await
        .unwrap();

    assert!(handle.lock().unwrap()[0].password_hash.is_none());
    assert!(store.get("c@example.com").await.unwrap().is_some());
}

#[tokio::test]
async fn register_with_taken_email_conflicts() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    let usecase = RegisterUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&store),
    };

    let result = usecase
        .execute(register_input(Some("+84922222222"), Some(TEST_EMAIL), None))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
    assert_eq!(handle.lock().unwrap().len(), 1);
    assert_eq!(store.entry_count().await, 0);
}

#[tokio::test]
async fn register_without_phone_or_email_is_validation_error() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let usecase = RegisterUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
    };

    let result = usecase.execute(register_input(None, Some(""), None)).await;
    assert!(
        matches!(result, Err(AuthServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(handle.lock().unwrap().is_empty());
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_otp_marks_phone_verified_and_issues_tokens() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send(TEST_PHONE).await.unwrap();

    let usecase = VerifyOtpUseCase {
        users,
        otp: mock_engine(&store),
        tokens: token_service(),
    };
    let pair = usecase.execute(TEST_PHONE, MOCK_OTP).await.unwrap();

    let user = pair.user.expect("user in token pair");
    assert!(user.phone_verified);
    assert!(!user.email_verified);
    let stored = &handle.lock().unwrap()[0];
    assert!(stored.phone_verified);
    assert!(!stored.email_verified);
}

#[tokio::test]
async fn verify_otp_by_email_marks_email_verified() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send(TEST_EMAIL).await.unwrap();

    let usecase = VerifyOtpUseCase {
        users,
        otp: mock_engine(&store),
        tokens: token_service(),
    };
    usecase.execute(TEST_EMAIL, MOCK_OTP).await.unwrap();

    let stored = &handle.lock().unwrap()[0];
    assert!(stored.email_verified);
    assert!(!stored.phone_verified);
}

#[tokio::test]
async fn verify_otp_for_unknown_user_after_valid_code_is_user_not_found() {
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send("ghost@example.com").await.unwrap();

    let usecase = VerifyOtpUseCase {
        users: MockUserRepo::empty(),
        otp: mock_engine(&store),
        tokens: token_service(),
    };
    let result = usecase.execute("ghost@example.com", MOCK_OTP).await;
    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn verify_otp_with_wrong_code_does_not_touch_user() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send(TEST_PHONE).await.unwrap();

    let usecase = VerifyOtpUseCase {
        users,
        otp: mock_engine(&store),
        tokens: token_service(),
    };
    let result = usecase.execute(TEST_PHONE, "999999").await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Otp(OtpError::InvalidCode { remaining: 2 }))
    ));
    assert!(!handle.lock().unwrap()[0].phone_verified);
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_with_password_records_last_login() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let usecase = LoginUseCase {
        users,
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let pair = usecase
        .execute(login_with_password(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    assert!(pair.user.unwrap().last_login_at.is_some());
    assert!(handle.lock().unwrap()[0].last_login_at.is_some());
}

#[tokio::test]
async fn login_resolves_identifier_from_phone_field() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let input = LoginInput {
        identifier: None,
        phone: Some(TEST_PHONE.to_owned()),
        email: None,
        password: Some(TEST_PASSWORD.to_owned()),
        otp: None,
    };
    assert!(usecase.execute(input).await.is_ok());
}

#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let result = usecase
        .execute(login_with_password(TEST_EMAIL, "wrong-password"))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn login_for_unknown_identifier_is_invalid_credentials() {
    let usecase = LoginUseCase {
        users: MockUserRepo::empty(),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let result = usecase
        .execute(login_with_password("nobody@example.com", TEST_PASSWORD))
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn login_to_banned_account_is_rejected() {
    let banned = nhadat_auth::domain::types::User {
        status: UserStatus::Banned,
        ..test_user()
    };
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![banned]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let result = usecase
        .execute(login_with_password(TEST_EMAIL, TEST_PASSWORD))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::AccountInactive)),
        "expected AccountInactive, got {result:?}"
    );
}

#[tokio::test]
async fn password_login_on_otp_only_account_is_rejected() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![otp_only_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let result = usecase
        .execute(login_with_password(TEST_EMAIL, TEST_PASSWORD))
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::PasswordNotSet)),
        "expected PasswordNotSet, got {result:?}"
    );
}

#[tokio::test]
async fn login_with_otp_consumes_challenge() {
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send(TEST_PHONE).await.unwrap();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![otp_only_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&store),
        tokens: token_service(),
    };

    usecase
        .execute(login_with_otp(TEST_PHONE, MOCK_OTP))
        .await
        .unwrap();

    assert!(store.get(TEST_PHONE).await.unwrap().is_none());
}

#[tokio::test]
async fn login_with_otp_but_no_challenge_is_otp_not_found() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let result = usecase.execute(login_with_otp(TEST_PHONE, MOCK_OTP)).await;
    assert!(
        matches!(result, Err(AuthServiceError::Otp(OtpError::NotFound))),
        "expected OTP NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn login_prefers_password_when_both_credentials_given() {
    let store = InMemoryOtpStore::new();
    mock_engine(&store).send(TEST_PHONE).await.unwrap();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&store),
        tokens: token_service(),
    };

    let input = LoginInput {
        otp: Some(MOCK_OTP.to_owned()),
        ..login_with_password(TEST_PHONE, TEST_PASSWORD)
    };
    usecase.execute(input).await.unwrap();

    // The OTP was never checked, so the challenge survives.
    assert!(store.get(TEST_PHONE).await.unwrap().is_some());
}

#[tokio::test]
async fn login_without_any_credential_is_validation_error() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        hasher: PlainHasher,
        otp: mock_engine(&InMemoryOtpStore::new()),
        tokens: token_service(),
    };

    let input = LoginInput {
        identifier: Some(TEST_EMAIL.to_owned()),
        phone: None,
        email: None,
        password: None,
        otp: Some(String::new()),
    };
    let result = usecase.execute(input).await;
    assert!(
        matches!(result, Err(AuthServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

// ── SendLoginOtp / ResendOtp ─────────────────────────────────────────────────

#[tokio::test]
async fn send_login_otp_requires_existing_account() {
    let store = InMemoryOtpStore::new();
    let usecase = SendLoginOtpUseCase {
        users: MockUserRepo::empty(),
        otp: mock_engine(&store),
    };

    let result = usecase.execute(TEST_PHONE).await;
    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert_eq!(store.entry_count().await, 0);
}

#[tokio::test]
async fn send_login_otp_issues_challenge_for_known_account() {
    let store = InMemoryOtpStore::new();
    let usecase = SendLoginOtpUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        otp: mock_engine(&store),
    };

    usecase.execute(TEST_EMAIL).await.unwrap();
    assert!(store.get(TEST_EMAIL).await.unwrap().is_some());
}

#[tokio::test]
async fn resend_otp_does_not_check_account_existence() {
    let store = InMemoryOtpStore::new();
    let usecase = ResendOtpUseCase {
        otp: mock_engine(&store),
    };

    usecase.execute("stranger@example.com").await.unwrap();
    assert!(store.get("stranger@example.com").await.unwrap().is_some());

    let again = usecase.execute("stranger@example.com").await;
    assert!(matches!(
        again,
        Err(AuthServiceError::Otp(OtpError::RateLimited))
    ));
}
