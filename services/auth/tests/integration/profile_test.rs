use uuid::Uuid;

use nhadat_auth::domain::types::User;
use nhadat_auth::error::AuthServiceError;
use nhadat_auth::usecase::profile::{
    ChangePasswordUseCase, GetProfileUseCase, ProfileUpdate, UpdateProfileUseCase,
};

use crate::helpers::{
    MockUserRepo, PlainHasher, TEST_EMAIL, TEST_PASSWORD, TEST_PHONE, otp_only_user, test_user,
};

fn verified_user() -> User {
    let mut user = test_user();
    user.phone_verified = true;
    user.email_verified = true;
    user
}

fn other_user() -> User {
    let mut user = test_user();
    user.id = Uuid::new_v4();
    user.phone = Some("+84988888888".to_owned());
    user.email = Some("seller@example.com".to_owned());
    user
}

// ── get ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_profile_returns_the_account() {
    let usecase = GetProfileUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };

    let user = usecase.execute(test_user().id).await.unwrap();

    assert_eq!(user.phone.as_deref(), Some(TEST_PHONE));
}

#[tokio::test]
async fn get_profile_of_deleted_account_is_not_found() {
    let usecase = GetProfileUseCase {
        users: MockUserRepo::empty(),
    };

    let result = usecase.execute(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AuthServiceError::AccountNotFound)));
}

// ── update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_name_keeps_verification() {
    let users = MockUserRepo::new(vec![verified_user()]);
    let handle = users.users_handle();
    let usecase = UpdateProfileUseCase { users };

    let user = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                full_name: Some("Tran Thi B".to_owned()),
                phone: Some(TEST_PHONE.to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.full_name.as_deref(), Some("Tran Thi B"));
    assert!(user.phone_verified && user.email_verified);
    let stored = &handle.lock().unwrap()[0];
    assert_eq!(stored.full_name.as_deref(), Some("Tran Thi B"));
}

#[tokio::test]
async fn update_new_phone_resets_phone_verification_only() {
    let users = MockUserRepo::new(vec![verified_user()]);
    let handle = users.users_handle();
    let usecase = UpdateProfileUseCase { users };

    let user = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                phone: Some("+84977777777".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.phone.as_deref(), Some("+84977777777"));
    assert!(!user.phone_verified);
    assert!(user.email_verified);
    assert!(!handle.lock().unwrap()[0].phone_verified);
}

#[tokio::test]
async fn update_new_email_resets_email_verification_only() {
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![verified_user()]),
    };

    let user = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                email: Some("new@example.com".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert!(!user.email_verified);
    assert!(user.phone_verified);
}

#[tokio::test]
async fn update_to_someone_elses_phone_is_conflict() {
    let users = MockUserRepo::new(vec![verified_user(), other_user()]);
    let handle = users.users_handle();
    let usecase = UpdateProfileUseCase { users };

    let result = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                phone: Some("+84988888888".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AuthServiceError::PhoneInUse)));
    assert_eq!(handle.lock().unwrap()[0].phone.as_deref(), Some(TEST_PHONE));
}

#[tokio::test]
async fn update_to_someone_elses_email_is_conflict() {
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![verified_user(), other_user()]),
    };

    let result = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                email: Some("seller@example.com".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AuthServiceError::EmailInUse)));
}

#[tokio::test]
async fn update_with_own_email_is_not_a_conflict() {
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![verified_user()]),
    };

    let user = usecase
        .execute(
            test_user().id,
            ProfileUpdate {
                email: Some(TEST_EMAIL.to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    assert!(user.email_verified);
}

// ── change password ──────────────────────────────────────────────────────────

#[tokio::test]
async fn change_password_rehashes_new_password() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let usecase = ChangePasswordUseCase {
        users,
        hasher: PlainHasher,
    };

    usecase
        .execute(test_user().id, TEST_PASSWORD, "brand-new-pass")
        .await
        .unwrap();

    assert_eq!(
        handle.lock().unwrap()[0].password_hash.as_deref(),
        Some("hashed:brand-new-pass")
    );
}

#[tokio::test]
async fn change_password_with_wrong_current_password_is_rejected() {
    let users = MockUserRepo::new(vec![test_user()]);
    let handle = users.users_handle();
    let usecase = ChangePasswordUseCase {
        users,
        hasher: PlainHasher,
    };

    let result = usecase
        .execute(test_user().id, "not-my-password", "brand-new-pass")
        .await;

    assert!(matches!(result, Err(AuthServiceError::WrongCurrentPassword)));
    assert_eq!(
        handle.lock().unwrap()[0].password_hash.as_deref(),
        Some(format!("hashed:{TEST_PASSWORD}").as_str())
    );
}

#[tokio::test]
async fn change_password_for_otp_only_account_is_password_not_set() {
    let usecase = ChangePasswordUseCase {
        users: MockUserRepo::new(vec![otp_only_user()]),
        hasher: PlainHasher,
    };

    let result = usecase
        .execute(test_user().id, TEST_PASSWORD, "brand-new-pass")
        .await;

    assert!(matches!(result, Err(AuthServiceError::PasswordNotSet)));
}
