// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use kinde_session_demo::config::KindeConfig;
use kinde_session_demo::identity::{IdentityError, IdentityProvider, KindeClient, TokenSet};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> KindeClient {
    let config = KindeConfig {
        client_id: "client-123".to_string(),
        client_secret: "s3cr3t".to_string(),
        domain: server.uri(),
        callback_url: "http://localhost:3000/auth/callback".to_string(),
        logout_url: "http://localhost:3000".to_string(),
        ..KindeConfig::default()
    };
    KindeClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_tokens_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("code_verifier=verifier-abc"))
        .and(body_string_contains("client_secret=s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access.jwt.token",
            "refresh_token": "refresh-token",
            "id_token": "id.jwt.token",
            "expires_in": 86399,
            "token_type": "bearer",
            "scope": "openid profile email offline"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client_for(&server)
        .fetch_tokens("auth-code", Some("verifier-abc"))
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "access.jwt.token");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-token"));
    assert_eq!(tokens.id_token.as_deref(), Some("id.jwt.token"));
    let remaining = tokens.expires_at.unwrap() - chrono::Utc::now();
    assert!(remaining.num_seconds() > 86_000);
}

#[tokio::test]
async fn test_fetch_tokens_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_tokens("stale-code", None)
        .await
        .unwrap_err();

    match err {
        IdentityError::Provider {
            operation,
            status,
            detail,
        } => {
            assert_eq!(operation, "token exchange");
            assert_eq!(status, 400);
            assert!(detail.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_tokens_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_tokens("auth-code", None)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Http(_)));
}

#[tokio::test]
async fn test_get_user_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/user_profile"))
        .and(header("Authorization", "Bearer access.jwt.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "kp_0123456789",
            "email": "jane@example.com",
            "given_name": "Jane",
            "family_name": "Doe",
            "picture": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = TokenSet {
        access_token: "access.jwt.token".to_string(),
        refresh_token: None,
        id_token: None,
        expires_at: None,
    };
    let profile = client_for(&server).get_user_profile(&tokens).await.unwrap();

    assert_eq!(profile.id, "kp_0123456789");
    assert_eq!(profile.email.as_deref(), Some("jane@example.com"));
    assert_eq!(profile.given_name.as_deref(), Some("Jane"));
}

#[tokio::test]
async fn test_get_user_profile_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/user_profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tokens = TokenSet {
        access_token: "expired".to_string(),
        refresh_token: None,
        id_token: None,
        expires_at: None,
    };
    let err = client_for(&server)
        .get_user_profile(&tokens)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Provider { status: 401, .. }));
}

#[test]
fn test_logout_url_targets_domain() {
    let config = KindeConfig {
        domain: "https://acme.kinde.com".to_string(),
        ..KindeConfig::default()
    };
    let client = KindeClient::new(&config).unwrap();
    assert_eq!(
        client.logout_url(),
        "https://acme.kinde.com/logout?redirect=http%3A%2F%2Flocalhost%3A3000%2F"
    );
}
