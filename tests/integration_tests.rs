//! Integration tests for Translator Finder
//!
//! These tests drive the full router (middleware stack included) in-process
//! with `tower::ServiceExt::oneshot`, carrying cookies between requests the
//! way a browser would.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use regex::Regex;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use translator_finder::config::{Config, Environment};
use translator_finder::db::Database;
use translator_finder::state::AppState;

// ==================== Test Helpers ====================

/// Create a test config with a temp database and a cheap password hash cost
fn create_test_config(temp_dir: &TempDir, rate_limit_max: u32) -> Config {
    let db_path = temp_dir.path().join("test.db");
    Config {
        port: 0,
        public_dir: "public".to_string(),
        environment: Environment::Test,
        database_path: db_path.to_str().expect("utf-8 path").to_string(),
        session_secret: "test-session-secret".to_string(),
        csrf_secret: "test-csrf-secret".to_string(),
        password_hash_memory_kib: 64,
        auth_rate_limit_max: rate_limit_max,
        auth_rate_limit_window: Duration::from_secs(900),
    }
}

/// One running application; hand out as many browser-like clients as needed
struct TestApp {
    router: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_rate_limit(10_000).await
    }

    async fn with_rate_limit(max: u32) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(&temp_dir, max);
        let db = Database::new(&config.database_path)
            .await
            .expect("Failed to create database");
        let router = translator_finder::app(AppState::new(config, db));
        Self {
            router,
            _temp_dir: temp_dir,
        }
    }

    fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookies: HashMap::new(),
        }
    }
}

struct TestResponse {
    status: StatusCode,
    headers: header::HeaderMap,
    body: String,
}

impl TestResponse {
    fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    fn set_cookie_names(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split_once('=').map(|(name, _)| name.to_string()))
            .collect()
    }
}

/// Minimal cookie-carrying client
struct TestClient {
    router: Router,
    cookies: HashMap<String, String>,
}

impl TestClient {
    fn store_cookies(&mut self, headers: &header::HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default();
            let Some((name, cookie_value)) = pair.split_once('=') else {
                continue;
            };
            let removed = value.to_ascii_lowercase().contains("max-age=0");
            if removed || cookie_value.is_empty() {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), cookie_value.to_string());
            }
        }
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let builder = if self.cookies.is_empty() {
            builder
        } else {
            builder.header(header::COOKIE, self.cookie_header())
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        self.store_cookies(&headers);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(uri), Body::empty())
            .await
    }

    /// POST a form exactly as given (no CSRF token added)
    async fn post_raw(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    /// Load `form_page`, take its CSRF token and POST `fields` to `uri`
    async fn submit(&mut self, form_page: &str, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let page = self.get(form_page).await;
        let token = extract_csrf(&page.body);
        let mut fields = fields.to_vec();
        fields.push(("_csrf", token.as_str()));
        self.post_raw(uri, &fields).await
    }

    async fn register(&mut self, email: &str, name: &str, role: &str) -> TestResponse {
        self.submit(
            "/auth/register",
            "/auth/register",
            &[
                ("email", email),
                ("password", "pass123"),
                ("name", name),
                ("role", role),
            ],
        )
        .await
    }

    async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.submit(
            "/auth/login",
            "/auth/login",
            &[("email", email), ("password", password)],
        )
        .await
    }
}

fn extract_csrf(html: &str) -> String {
    let re = Regex::new(r#"name="_csrf" value="([^"]+)""#).unwrap();
    re.captures(html)
        .map(|c| c[1].to_string())
        .expect("page should contain a CSRF token")
}

/// The first translator id linked from the directory page
async fn first_translator_id(client: &mut TestClient) -> String {
    let page = client.get("/translators").await;
    let re = Regex::new(r#"href="/translators/(\d+)""#).unwrap();
    re.captures(&page.body)
        .map(|c| c[1].to_string())
        .expect("directory should link a translator")
}

// ==================== Health / Shell ====================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_home_page_and_security_headers() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Translator Finder"));

    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(response.headers["referrer-policy"], "no-referrer");
    assert!(response.headers.contains_key("content-security-policy"));
    assert!(!response.headers.contains_key("strict-transport-security"));

    assert!(response.set_cookie_names().contains(&"_csrf".to_string()));
}

#[tokio::test]
async fn test_unknown_path_renders_404_page() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/no-such-page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Page not found"));
    assert!(response.body.contains("<html"));
}

#[tokio::test]
async fn test_static_files_served() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/public/styles.css").await;
    assert_eq!(response.status, StatusCode::OK);
}

// ==================== Registration / Login ====================

#[tokio::test]
async fn test_register_logs_in_and_redirects() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.register("anna@example.com", "Anna", "client").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));

    let home = client.get("/").await;
    assert!(home.body.contains("Signed in as Anna"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    let mut first = app.client();
    let mut second = app.client();

    first.register("dup@example.com", "First", "client").await;
    let response = second.register("dup@example.com", "Second", "translator").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Email already registered"));
    assert!(response.body.contains("Create Account"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.register("x@example.com", "", "client").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("All fields are required"));

    let response = client.register("x@example.com", "X", "admin").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Invalid role"));
}

#[tokio::test]
async fn test_translator_registration_creates_listing() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut visitor = app.client();

    let empty = visitor.get("/translators").await;
    assert!(empty.body.contains("No translators have registered yet."));

    translator.register("tran@example.com", "Tran", "translator").await;

    let list = visitor.get("/translators").await;
    assert!(list.body.contains("Tran"));
    assert!(list.body.contains("Vietnamese, Czech"));
    assert!(list.body.contains("No reviews"));
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.register("l@example.com", "Lena", "client").await;
    client.get("/auth/logout").await;

    let response = client.login("l@example.com", "pass123").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(client.get("/auth/profile").await.status, StatusCode::OK);

    let response = client.get("/auth/logout").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));

    let response = client.get("/auth/profile").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/auth/login"));
}

#[tokio::test]
async fn test_logout_when_anonymous() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/auth/logout").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.register("l@example.com", "Lena", "client").await;
    client.get("/auth/logout").await;

    let wrong_password = client.login("l@example.com", "wrong").await;
    let unknown_email = client.login("nobody@example.com", "pass123").await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status, StatusCode::BAD_REQUEST);
    assert!(wrong_password.body.contains("Invalid email or password"));
    assert!(unknown_email.body.contains("Invalid email or password"));

    let missing = client.login("", "").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.body.contains("Email and password are required"));
}

// ==================== Directory / Reviews ====================

#[tokio::test]
async fn test_translator_detail_errors() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/translators/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Translator not found"));

    let response = client.get("/translators/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Invalid translator ID"));
}

#[tokio::test]
async fn test_client_reviews_translator() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut client = app.client();

    translator.register("tran@example.com", "Tran", "translator").await;
    client.register("klara@example.com", "Klara", "client").await;

    let id = first_translator_id(&mut client).await;
    let detail_path = format!("/translators/{}", id);

    let response = client
        .submit(
            &detail_path,
            "/reviews",
            &[
                ("translator_id", id.as_str()),
                ("rating", "5"),
                ("comment", "Excellent work!"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some(detail_path.as_str()));

    let detail = client.get(&detail_path).await;
    assert!(detail.body.contains("Excellent work!"));
    assert!(detail.body.contains("5.0"));
    assert!(detail.body.contains("Klara"));

    // The author's profile lists the review
    let profile = client.get("/auth/profile").await;
    assert_eq!(profile.status, StatusCode::OK);
    assert!(profile.body.contains("Excellent work!"));
    assert!(profile.body.contains("Tran"));
}

#[tokio::test]
async fn test_average_rating_rounds() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut client = app.client();

    translator.register("tran@example.com", "Tran", "translator").await;
    client.register("klara@example.com", "Klara", "client").await;
    let id = first_translator_id(&mut client).await;
    let detail_path = format!("/translators/{}", id);

    for rating in ["5", "4"] {
        client
            .submit(&detail_path, "/reviews", &[("translator_id", id.as_str()), ("rating", rating)])
            .await;
    }

    let list = client.get("/translators").await;
    assert!(list.body.contains("4.5"));
    assert!(list.body.contains("2 reviews"));
}

#[tokio::test]
async fn test_review_rejected_for_non_clients() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut anonymous = app.client();

    translator.register("tran@example.com", "Tran", "translator").await;
    let id = first_translator_id(&mut translator).await;
    let detail_path = format!("/translators/{}", id);

    let response = translator
        .submit("/auth/profile", "/reviews", &[("translator_id", id.as_str()), ("rating", "5")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("Access denied"));

    let response = anonymous
        .submit("/auth/login", "/reviews", &[("translator_id", id.as_str()), ("rating", "5")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let detail = anonymous.get(&detail_path).await;
    assert!(detail.body.contains("No reviews"));
}

#[tokio::test]
async fn test_review_validation() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut client = app.client();

    translator.register("tran@example.com", "Tran", "translator").await;
    client.register("klara@example.com", "Klara", "client").await;
    let id = first_translator_id(&mut client).await;
    let detail_path = format!("/translators/{}", id);

    for (translator_id, rating) in [(id.as_str(), "0"), (id.as_str(), "6"), ("abc", "5")] {
        let response = client
            .submit(
                &detail_path,
                "/reviews",
                &[("translator_id", translator_id), ("rating", rating)],
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body.contains("Invalid review data"));
    }

    let response = client
        .submit(&detail_path, "/reviews", &[("translator_id", "999"), ("rating", "3")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_without_form_content_type_renders_error_page() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    let mut client = app.client();

    translator.register("tran@example.com", "Tran", "translator").await;
    client.register("klara@example.com", "Klara", "client").await;
    let id = first_translator_id(&mut client).await;
    let detail_path = format!("/translators/{}", id);

    let token = extract_csrf(&client.get(&detail_path).await.body);
    let body = serde_urlencoded::to_string([
        ("translator_id", id.as_str()),
        ("rating", "5"),
        ("_csrf", token.as_str()),
    ])
    .unwrap();
    let response = client
        .send(Request::builder().method("POST").uri("/reviews"), Body::from(body))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("<!DOCTYPE html>"));
    assert!(response.body.contains("Invalid form submission"));

    let detail = client.get(&detail_path).await;
    assert!(detail.body.contains("No reviews"));
}

#[tokio::test]
async fn test_register_with_json_body_renders_localized_error_page() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let token = extract_csrf(&client.get("/auth/register?lang=cs").await.body);
    let body = format!("_csrf={}&email=a%40b.c", token);
    let response = client
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json"),
            Body::from(body),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains(r#"<html lang="cs">"#));
    assert!(response.body.contains("Invalid form submission"));
}

// ==================== Profile ====================

#[tokio::test]
async fn test_translator_profile_update() {
    let app = TestApp::new().await;
    let mut translator = app.client();
    translator.register("tran@example.com", "Tran", "translator").await;

    let response = translator
        .submit(
            "/auth/profile",
            "/auth/profile",
            &[
                ("name", "Tran Van B"),
                ("email", "tranb@example.com"),
                ("languages", "Vietnamese, English"),
                ("bio", "Medical texts"),
                ("experience_years", "7"),
                ("hourly_rate", "35"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Profile updated successfully"));
    assert!(response.body.contains("Signed in as Tran Van B"));

    let list = translator.get("/translators").await;
    assert!(list.body.contains("Vietnamese, English"));
    assert!(list.body.contains("7 years of experience"));
}

#[tokio::test]
async fn test_profile_email_conflict() {
    let app = TestApp::new().await;
    let mut other = app.client();
    let mut translator = app.client();
    other.register("taken@example.com", "Other", "client").await;
    translator.register("tran@example.com", "Tran", "translator").await;

    let response = translator
        .submit(
            "/auth/profile",
            "/auth/profile",
            &[
                ("name", "Renamed"),
                ("email", "taken@example.com"),
                ("languages", "Czech"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Email already registered"));

    let profile = translator.get("/auth/profile").await;
    assert!(profile.body.contains(r#"value="tran@example.com""#));
    assert!(!profile.body.contains("Renamed"));
}

#[tokio::test]
async fn test_client_profile_created_on_first_view() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.register("klara@example.com", "Klara", "client").await;

    let profile = client.get("/auth/profile").await;
    assert_eq!(profile.status, StatusCode::OK);
    assert!(profile.body.contains("Edit Profile"));
    assert!(profile.body.contains("You have not written any reviews yet."));

    let response = client
        .submit(
            "/auth/profile",
            "/auth/profile",
            &[
                ("name", "Klara"),
                ("email", "klara@example.com"),
                ("company", "Prague Imports"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"value="Prague Imports""#));
}

// ==================== Locale ====================

#[tokio::test]
async fn test_locale_switch_persists() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/?lang=cs").await;
    assert!(response.body.contains(r#"<html lang="cs">"#));
    assert!(response.body.contains("Překladatelé"));
    assert!(response.set_cookie_names().contains(&"lang".to_string()));

    let response = client.get("/translators").await;
    assert!(response.body.contains(r#"<html lang="cs">"#));

    let response = client.get("/?lang=xx").await;
    assert!(response.body.contains(r#"<html lang="en">"#));
}

#[tokio::test]
async fn test_locale_cookie_alone_is_honored() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.cookies.insert("lang".to_string(), "vi".to_string());

    let response = client.get("/").await;
    assert!(response.body.contains(r#"<html lang="vi">"#));
}

// ==================== CSRF / Rate limiting ====================

#[tokio::test]
async fn test_post_without_csrf_token_is_forbidden() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.get("/auth/login").await;

    let response = client
        .post_raw("/auth/login", &[("email", "a@b.c"), ("password", "x")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("Invalid CSRF token"));

    let response = client
        .post_raw(
            "/auth/login",
            &[("email", "a@b.c"), ("password", "x"), ("_csrf", "forged")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_auth_rate_limit() {
    let app = TestApp::with_rate_limit(3).await;
    let mut client = app.client();

    for _ in 0..3 {
        let response = client.get("/auth/login").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers["ratelimit-limit"], "3");
    }

    let response = client.get("/auth/login").await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(response.body.contains("Too many requests"));
    assert!(response.headers.contains_key("retry-after"));
    assert_eq!(response.headers["ratelimit-remaining"], "0");

    // Only /auth is limited
    assert_eq!(client.get("/translators").await.status, StatusCode::OK);
}
