mod common;

use chrono::{Duration, Utc};
use invite_auth::{models::invitation::InvitationClaims, utils::invite_token::InviteCodec};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::MockServer;

use common::{FakeDirectory, FakeIdentity, SECRET, TestServer};

fn invite_token() -> String {
    let claims = InvitationClaims::new(42.into(), 3.into(), 7.into());
    InviteCodec::new(Some(SECRET)).mint(&claims).unwrap()
}

fn registration(token: &str) -> Value {
    json!({
        "inviteToken": token,
        "firstName": "Ana",
        "lastName": "Lima",
        "phone": "+1 555 010 2030"
    })
}

#[tokio::test]
async fn register_then_login() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .post(
            "/auth/register",
            Some("token-uid-ana"),
            registration(&invite_token()),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: Value = res.json().await.unwrap();
    assert_eq!(user["uid"], "uid-ana");
    assert_eq!(user["email"], "uid-ana@example.com");
    assert_eq!(user["organizationId"], 42);
    assert_eq!(user["roleId"], 3);
    assert_eq!(user["invitedBy"], 7);

    let res = server.post("/auth/login", Some("token-uid-ana"), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let logged_in: Value = res.json().await.unwrap();
    assert_eq!(logged_in, user);
}

#[tokio::test]
async fn register_twice_conflicts() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::with_inviter("uid-ana", 1, 42),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .post(
            "/auth/register",
            Some("token-uid-ana"),
            registration(&invite_token()),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_with_expired_invite_is_unauthorized() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let claims = InvitationClaims::new(42.into(), 3.into(), 7.into());
    let stale = InviteCodec::new(Some(SECRET))
        .mint_at(&claims, Utc::now() - Duration::hours(2))
        .unwrap();

    let res = server
        .post("/auth/register", Some("token-uid-ana"), registration(&stale))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invite token expired");
    assert!(server.directory.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn register_with_foreign_invite_is_unauthorized() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let claims = InvitationClaims::new(42.into(), 3.into(), 7.into());
    let forged = InviteCodec::new(Some("not the secret"))
        .mint(&claims)
        .unwrap();

    let res = server
        .post("/auth/register", Some("token-uid-ana"), registration(&forged))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid invite token");
}

#[tokio::test]
async fn failed_insert_removes_identity_account() {
    let sendgrid = MockServer::start().await;
    let directory = FakeDirectory {
        fail_add: true,
        ..Default::default()
    };
    let server = TestServer::spawn(&sendgrid, directory, FakeIdentity::default()).await;

    let res = server
        .post(
            "/auth/register",
            Some("token-uid-ana"),
            registration(&invite_token()),
        )
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        *server.identity.deleted.lock().unwrap(),
        vec!["token-uid-ana".to_string()]
    );
}

#[tokio::test]
async fn register_validates_names() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .post(
            "/auth/register",
            Some("token-uid-ana"),
            json!({ "inviteToken": invite_token(), "firstName": " ", "lastName": "Lima" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_unknown_account_is_not_found() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server.post("/auth/login", Some("token-nobody"), json!({})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forgot_password_sends_reset() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .post("/auth/forgotPassword", None, json!({ "email": "ana@example.com" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["success"],
        "Please check your inbox for the password reset e-mail."
    );
    assert_eq!(
        *server.identity.password_resets.lock().unwrap(),
        vec!["ana@example.com".to_string()]
    );

    let res = server
        .post("/auth/forgotPassword", None, json!({ "email": "nope" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_email_uses_callers_token() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .post(
            "/auth/changeEmail",
            Some("token-uid-ana"),
            json!({ "newEmail": "ana.lima@example.com" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["success"],
        "Your email address has been changed to ana.lima@example.com"
    );
    assert_eq!(
        *server.identity.email_updates.lock().unwrap(),
        vec![(
            "token-uid-ana".to_string(),
            "ana.lima@example.com".to_string()
        )]
    );
}

#[tokio::test]
async fn change_email_failure_is_generic() {
    let sendgrid = MockServer::start().await;
    let identity = FakeIdentity {
        fail_updates: true,
        ..Default::default()
    };
    let server = TestServer::spawn(&sendgrid, FakeDirectory::default(), identity).await;

    let res = server
        .post(
            "/auth/changeEmail",
            Some("token-uid-ana"),
            json!({ "newEmail": "ana.lima@example.com" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Unable to update email address." }));
}

#[tokio::test]
async fn health_is_public() {
    let sendgrid = MockServer::start().await;
    let server = TestServer::spawn(
        &sendgrid,
        FakeDirectory::default(),
        FakeIdentity::default(),
    )
    .await;

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
}
