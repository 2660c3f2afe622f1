use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::json;

use localiz_api::app::{build_app, build_services, AppServices};
use localiz_api::config::AppConfig;
use localiz_auth::Role;
use localiz_mail::RecordingMailer;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    mailer: Arc<RecordingMailer>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(AppConfig::default()).await
    }

    async fn spawn_with(config: AppConfig) -> Self {
        // Same router as prod, bound to an ephemeral port, with a recording
        // mailer so tests can read the verification tokens.
        let mailer = Arc::new(RecordingMailer::new());
        let services = build_services(config, mailer.clone());
        let app = build_app(services.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            base_url,
            services,
            mailer,
            handle,
        }
    }

    /// Seed an admin account directly in the store and mint its session.
    async fn seed_admin(&self) -> String {
        let mut user = localiz_users::ActiveUser::from_pending(
            localiz_users::PendingRegistration {
                username: "admin1".into(),
                email: "admin@localiz.fr".into(),
                phone: None,
                password_hash: "unused".into(),
                profile: localiz_users::Profile::default(),
                birthday: chrono::NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
                verification_token: "seed".into(),
                created_at: Utc::now(),
                expires_at: Utc::now(),
            },
            Utc::now(),
        );
        user.role = Role::Admin;
        self.services.users.insert(user.clone()).await.unwrap();
        self.services
            .tokens
            .sign_session(user.id, Role::Admin, Utc::now(), ChronoDuration::days(1))
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn register_body(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "Password1!",
        "birthday": "1990-05-17",
        "agreeToTerms": true,
        "firstName": "Alice",
    })
}

/// The `token=` value from the response's Set-Cookie header, if any.
fn session_cookie_token(res: &reqwest::Response) -> Option<String> {
    let header = res
        .headers()
        .get(reqwest::header::SET_COOKIE)?
        .to_str()
        .ok()?;
    header
        .split(';')
        .next()?
        .strip_prefix("token=")
        .map(str::to_string)
}

/// Register + confirm a fresh user; returns their session token.
async fn register_and_confirm(
    srv: &TestServer,
    client: &reqwest::Client,
    username: &str,
    email: &str,
) -> String {
    let res = client
        .post(format!("{}/user/register", srv.base_url))
        .json(&register_body(username, email))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let token = srv.mailer.last_verification_token().unwrap();
    let res = client
        .post(format!("{}/user/confirm-email", srv.base_url))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    session_cookie_token(&res).expect("confirm should set the session cookie")
}

#[tokio::test]
async fn register_confirm_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/user/register", srv.base_url))
        .json(&register_body("alice92", "alice@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["expiresAt"].is_string());

    // Not an account yet: login must fail while pending.
    let res = client
        .post(format!("{}/user/login", srv.base_url))
        .json(&json!({ "data": "alice92", "password": "Password1!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let token = srv.mailer.last_verification_token().unwrap();
    let res = client
        .post(format!("{}/user/confirm-email", srv.base_url))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let session = session_cookie_token(&res).unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["username"], "alice92");
    assert!(body["user"].get("passwordHash").is_none());

    // The session from confirmation works right away.
    let res = client
        .get(format!("{}/user/me", srv.base_url))
        .bearer_auth(&session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Second confirmation with the same token is rejected.
    let res = client
        .post(format!("{}/user/confirm-email", srv.base_url))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_names_every_missing_field() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/user/register", srv.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    let missing = body["missing"].as_array().unwrap();
    for field in ["username", "email", "password", "birthday", "agreeToTerms"] {
        assert!(missing.iter().any(|f| f == field), "missing `{field}`");
    }
}

#[tokio::test]
async fn consent_refusal_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = register_body("bob77", "bob@example.com");
    body["agreeToTerms"] = json!(false);
    let res = client
        .post(format!("{}/user/register", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "consent_required");
    assert!(srv.mailer.sent().is_empty());
}

#[tokio::test]
async fn expired_verification_token_is_gone() {
    let config = AppConfig {
        token_ttl: ChronoDuration::seconds(0),
        ..AppConfig::default()
    };
    let srv = TestServer::spawn_with(config).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/user/register", srv.base_url))
        .json(&register_body("carol5", "carol@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let token = srv.mailer.last_verification_token().unwrap();
    let res = client
        .post(format!("{}/user/confirm-email", srv.base_url))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::GONE);
}

#[tokio::test]
async fn verify_mail_redirects_to_the_front_end() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    client
        .post(format!("{}/user/register", srv.base_url))
        .json(&register_body("dave42", "dave@example.com"))
        .send()
        .await
        .unwrap();
    let token = srv.mailer.last_verification_token().unwrap();

    let res = client
        .get(format!("{}/user/verifyMail/{token}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let location = res.headers()["location"].to_str().unwrap();
    assert!(location.contains("message=success"));
    assert!(location.contains("clearRegister=1"));
    assert!(session_cookie_token(&res).is_some());

    // A forged token lands on the error redirect, with no detail leaked.
    let res = client
        .get(format!("{}/user/verifyMail/not-a-token", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let location = res.headers()["location"].to_str().unwrap();
    assert!(location.contains("message=error"));
}

#[tokio::test]
async fn login_sets_cookie_and_me_requires_auth() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_and_confirm(&srv, &client, "erin8", "erin@example.com").await;

    let res = client.get(format!("{}/user/me", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/user/login", srv.base_url))
        .json(&json!({ "data": "erin@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/user/login", srv.base_url))
        .json(&json!({ "data": "erin8", "password": "Password1!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let session = session_cookie_token(&res).unwrap();

    let res = client
        .get(format!("{}/user/me", srv.base_url))
        .bearer_auth(&session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "erin@example.com");
}

#[tokio::test]
async fn deal_mutation_is_author_or_admin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let author = register_and_confirm(&srv, &client, "frank3", "frank@example.com").await;
    let other = register_and_confirm(&srv, &client, "grace9", "grace@example.com").await;
    let admin = srv.seed_admin().await;

    let res = client
        .post(format!("{}/deals", srv.base_url))
        .bearer_auth(&author)
        .json(&json!({
            "image": "https://cdn.example.com/crepes.jpg",
            "title": "Crêpes party",
            "startDate": "2025-03-01",
            "description": "Free crêpes for everyone at the market square.",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let deal: serde_json::Value = res.json().await.unwrap();
    let id = deal["id"].as_str().unwrap();

    // Listed publicly.
    let res = client.get(format!("{}/deals", srv.base_url)).send().await.unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 1);

    // A stranger cannot touch it; the author and an admin can.
    let res = client
        .patch(format!("{}/deals/{id}", srv.base_url))
        .bearer_auth(&other)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .patch(format!("{}/deals/{id}", srv.base_url))
        .bearer_auth(&author)
        .json(&json!({ "title": "Crêpes party XXL" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/deals/{id}", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn rating_upsert_keeps_one_row_per_pair() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let rater = register_and_confirm(&srv, &client, "henry2", "henry@example.com").await;
    register_and_confirm(&srv, &client, "iris11", "iris@example.com").await;

    let target = srv
        .services
        .users
        .find_by_username("iris11")
        .await
        .unwrap()
        .unwrap()
        .id;

    for value in [5, 3] {
        let res = client
            .post(format!("{}/ratings/user/{target}", srv.base_url))
            .bearer_auth(&rater)
            .json(&json!({ "value": value }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/ratings/user/{target}/stats", srv.base_url))
        .send()
        .await
        .unwrap();
    let stats: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stats["count"], 1);
    assert_eq!(stats["average"], 3.0);

    // Out-of-range value is rejected.
    let res = client
        .post(format!("{}/ratings/user/{target}", srv.base_url))
        .bearer_auth(&rater)
        .json(&json!({ "value": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_form_validates_and_reaches_support() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/contact", srv.base_url))
        .json(&json!({
            "name": "Bob",
            "email": "bob@example.com",
            "subject": "Hi",
            "message": "too short",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/contact", srv.base_url))
        .json(&json!({
            "name": "Bob",
            "email": "bob@example.com",
            "subject": "Question",
            "message": "Bonjour, comment supprimer mon annonce ?",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(srv.mailer.sent().len(), 1);

    // The inbox is admin-only.
    let res = client.get(format!("{}/contact", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let admin = srv.seed_admin().await;
    let res = client
        .get(format!("{}/contact", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn category_reorder_is_a_permutation() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = srv.seed_admin().await;

    let mut ids = Vec::new();
    for name in ["Restauration", "Sport", "Culture"] {
        let res = client
            .post(format!("{}/admin/categories", srv.base_url))
            .bearer_auth(&admin)
            .json(&json!({ "kind": "deal", "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let cat: serde_json::Value = res.json().await.unwrap();
        ids.push(cat["id"].as_str().unwrap().to_string());
    }

    ids.reverse();
    let res = client
        .patch(format!("{}/admin/categories/reorder", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "kind": "deal", "ids": ids }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/categories?kind=deal", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Culture", "Sport", "Restauration"]);
}

#[tokio::test]
async fn admin_routes_enforce_the_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = register_and_confirm(&srv, &client, "jack6", "jack@example.com").await;
    let admin = srv.seed_admin().await;

    let res = client.get(format!("{}/admin/stats", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stats: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stats["users"], 2);

    // Role patch validates its input, then takes effect on the next request.
    let target = srv
        .services
        .users
        .find_by_username("jack6")
        .await
        .unwrap()
        .unwrap()
        .id;
    let res = client
        .patch(format!("{}/admin/users/{target}/role", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "role": "superuser" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(format!("{}/admin/users/{target}/role", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/admin/stats", srv.base_url))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_account_cascades_to_its_content() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = register_and_confirm(&srv, &client, "kate77", "kate@example.com").await;

    let res = client
        .post(format!("{}/listings", srv.base_url))
        .bearer_auth(&session)
        .json(&json!({
            "title": "Vélo enfant",
            "description": "Small red bike, good shape, outgrown by my kid.",
            "images": ["https://cdn.example.com/bike.jpg"],
            "kind": "donate",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .delete(format!("{}/user/me", srv.base_url))
        .bearer_auth(&session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Session is dead and the listing is gone with the account.
    let res = client
        .get(format!("{}/user/me", srv.base_url))
        .bearer_auth(&session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(format!("{}/listings", srv.base_url)).send().await.unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn postal_lookup_serves_cached_towns() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Seed the cache so the endpoint never leaves the process.
    srv.services.postal.seed("59000", "Lille", Utc::now());

    let res = client
        .get(format!("{}/utils/postal-to-town/59000", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["town"], "Lille");
}
