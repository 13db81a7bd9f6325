use nhadat_auth::error::AuthServiceError;
use nhadat_auth::usecase::auth::RefreshTokenUseCase;
use nhadat_auth::usecase::token::TokenService;
use nhadat_auth_types::token::{TokenType, validate_access_token};

use crate::helpers::{TEST_EMAIL, TEST_JWT_SECRET, TEST_PHONE, test_user, token_service};

// ── TokenService::new ────────────────────────────────────────────────────────

#[test]
fn missing_secret_is_a_configuration_error() {
    let result = TokenService::new(None);
    assert!(
        matches!(result, Err(AuthServiceError::Configuration(_))),
        "expected Configuration, got {result:?}"
    );
    assert!(matches!(
        TokenService::new(Some("")),
        Err(AuthServiceError::Configuration(_))
    ));
}

// ── generate_token_pair ──────────────────────────────────────────────────────

#[test]
fn token_pair_carries_typed_claims() {
    let tokens = token_service();
    let user = test_user();

    let pair = tokens.generate_token_pair(&user).unwrap();
    assert_eq!(pair.expires_in, 900);
    assert_eq!(pair.user.as_ref().map(|u| u.id), Some(user.id));

    let access = tokens.verify_token(&pair.access_token).unwrap();
    assert_eq!(access.token_type, TokenType::Access);
    assert_eq!(access.sub, user.id.to_string());
    assert_eq!(access.email.as_deref(), Some(TEST_EMAIL));
    assert_eq!(access.phone.as_deref(), Some(TEST_PHONE));
    assert_eq!(access.exp - access.iat, 900);

    let refresh = tokens.verify_token(&pair.refresh_token).unwrap();
    assert_eq!(refresh.token_type, TokenType::Refresh);
    assert_eq!(refresh.exp - refresh.iat, 30 * 24 * 60 * 60);
}

#[test]
fn access_token_is_accepted_by_shared_validator() {
    let tokens = token_service();
    let pair = tokens.generate_token_pair(&test_user()).unwrap();

    let info = validate_access_token(&pair.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, test_user().id);
    assert!(validate_access_token(&pair.refresh_token, TEST_JWT_SECRET).is_err());
}

// ── verify_token ─────────────────────────────────────────────────────────────

#[test]
fn token_signed_with_other_secret_is_invalid() {
    let other = TokenService::new(Some("another-secret")).unwrap();
    let pair = other.generate_token_pair(&test_user()).unwrap();

    let result = token_service().verify_token(&pair.access_token);
    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[test]
fn garbage_token_is_invalid() {
    let result = token_service().verify_token("not.a.jwt");
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

// ── refresh ──────────────────────────────────────────────────────────────────

#[test]
fn refresh_mints_new_access_token() {
    let tokens = token_service();
    let pair = tokens.generate_token_pair(&test_user()).unwrap();

    let usecase = RefreshTokenUseCase {
        tokens: tokens.clone(),
    };
    let access = usecase.execute(&pair.refresh_token).unwrap();

    let claims = tokens.verify_token(&access).unwrap();
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.sub, test_user().id.to_string());
    assert_eq!(claims.email.as_deref(), Some(TEST_EMAIL));
}

#[test]
fn refresh_with_access_token_is_wrong_type() {
    let tokens = token_service();
    let pair = tokens.generate_token_pair(&test_user()).unwrap();

    let usecase = RefreshTokenUseCase { tokens };
    let result = usecase.execute(&pair.access_token);
    assert!(
        matches!(result, Err(AuthServiceError::InvalidTokenType)),
        "expected InvalidTokenType, got {result:?}"
    );
}

#[test]
fn refresh_with_garbage_is_invalid_token() {
    let usecase = RefreshTokenUseCase {
        tokens: token_service(),
    };
    let result = usecase.execute("garbage");
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}
