use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use recipebox_api::session::SessionStore;
use recipebox_api::{AppState, AppStateInner, router};
use recipebox_db::Database;

const INSTRUCTIONS: &str =
    "Brown the beef, add tomatoes and beans, then simmer gently for forty five minutes.";

struct TestApp {
    router: Router,
    state: AppState,
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    set_cookie: Option<String>,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let state = AppStateInner::new(
            Database::open_in_memory().unwrap(),
            SessionStore::new(Duration::hours(1)),
            false,
        )
        .unwrap();
        Self {
            router: router(state.clone()),
            state,
        }
    }

    async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let cookie = set_cookie
            .as_deref()
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        Reply {
            status,
            cookie,
            set_cookie,
            body,
        }
    }

    async fn signup(&self, username: &str, password: &str) -> Reply {
        self.send(
            Method::POST,
            "/signup",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Reply {
        self.send(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await
    }
}

fn chili() -> Value {
    json!({
        "title": "Chili",
        "instructions": INSTRUCTIONS,
        "minutes_to_complete": 60,
    })
}

#[tokio::test]
async fn signup_returns_public_user_and_starts_session() {
    let app = TestApp::new();

    let reply = app.signup("ana", "pw1").await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(
        reply.body,
        json!({"id": 1, "username": "ana", "bio": null, "image_url": null})
    );

    let cookie = reply.cookie.expect("signup sets a session cookie");
    let check = app.send(Method::GET, "/check_session", Some(&cookie), None).await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["id"], 1);
    assert_eq!(check.body["username"], "ana");
}

#[tokio::test]
async fn signup_keeps_optional_profile_fields() {
    let app = TestApp::new();
    let reply = app
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({
                "username": "ben",
                "password": "pw",
                "bio": "Weekend baker",
                "image_url": "https://example.com/ben.png",
            })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["bio"], "Weekend baker");
    assert_eq!(reply.body["image_url"], "https://example.com/ben.png");
    assert!(reply.body.get("password_hash").is_none());
}

#[tokio::test]
async fn signup_accepts_a_password_confirmation_key() {
    let app = TestApp::new();
    let reply = app
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({"username": "ana", "password": "pw1", "password_confirmation": "pw1"})),
        )
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["username"], "ana");
    assert!(reply.cookie.is_some());
}

#[tokio::test]
async fn session_cookie_expires_with_the_session() {
    let app = TestApp::new();
    let set_cookie = app.signup("ana", "pw1").await.set_cookie.unwrap();

    assert!(set_cookie.contains("Max-Age=3600"), "got {set_cookie}");
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn padded_username_is_the_same_account() {
    let app = TestApp::new();
    let reply = app.signup(" ana ", "pw1").await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["username"], "ana");

    let duplicate = app.signup("ana", "pw2").await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(duplicate.body, json!({"errors": ["Username already exists"]}));
    assert_eq!(app.state.db.count_users_named("ana").unwrap(), 1);

    let login = app.login("ana  ", "pw1").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["id"], reply.body["id"]);
}

#[tokio::test]
async fn decoy_hash_is_ready_before_the_first_login() {
    let app = TestApp::new();
    assert!(app.state.dummy_hash.starts_with("$argon2id$"));

    let reply = app.login("nobody", "pw1").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_signup_is_rejected_without_a_second_row() {
    let app = TestApp::new();
    assert_eq!(app.signup("ana", "pw1").await.status, StatusCode::CREATED);

    let reply = app.signup("ana", "pw2").await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body, json!({"errors": ["Username already exists"]}));
    assert!(reply.cookie.is_none());
    assert_eq!(app.state.db.count_users_named("ana").unwrap(), 1);
}

#[tokio::test]
async fn signup_validation_errors_are_listed() {
    let app = TestApp::new();
    let reply = app.signup("", "").await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.body,
        json!({"errors": ["Username must be present", "Password must be present"]})
    );
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let app = TestApp::new();
    let reply = app
        .send(Method::POST, "/signup", None, Some(json!({"password": "pw1"})))
        .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body, json!({"errors": ["Invalid request body"]}));
}

#[tokio::test]
async fn login_then_check_session() {
    let app = TestApp::new();
    let id = app.signup("ana", "pw1").await.body["id"].clone();

    let reply = app.login("ana", "pw1").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["id"], id);

    let cookie = reply.cookie.unwrap();
    let check = app.send(Method::GET, "/check_session", Some(&cookie), None).await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["id"], id);
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = TestApp::new();
    app.signup("ana", "pw1").await;

    let wrong_password = app.login("ana", "wrong").await;
    let unknown_user = app.login("nobody", "pw1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.body,
        json!({"errors": ["Invalid username or password"]})
    );
    assert_eq!(unknown_user.status, wrong_password.status);
    assert_eq!(unknown_user.body, wrong_password.body);
    assert!(wrong_password.cookie.is_none());
}

#[tokio::test]
async fn login_rotates_the_previous_session() {
    let app = TestApp::new();
    let first = app.signup("ana", "pw1").await.cookie.unwrap();

    let second = app
        .send(
            Method::POST,
            "/login",
            Some(&first),
            Some(json!({"username": "ana", "password": "pw1"})),
        )
        .await
        .cookie
        .unwrap();
    assert_ne!(first, second);

    let stale = app.send(Method::GET, "/check_session", Some(&first), None).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    let fresh = app.send(Method::GET, "/check_session", Some(&second), None).await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn check_session_without_cookie() {
    let app = TestApp::new();
    let reply = app.send(Method::GET, "/check_session", None, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({"errors": ["Not logged in"]}));
}

#[tokio::test]
async fn session_for_missing_user_is_unauthenticated() {
    let app = TestApp::new();
    let token = app.state.sessions.create(999);
    let cookie = format!("recipebox_session={token}");

    let check = app.send(Method::GET, "/check_session", Some(&cookie), None).await;
    assert_eq!(check.status, StatusCode::UNAUTHORIZED);
    assert_eq!(check.body, json!({"errors": ["User not found"]}));
    assert!(app.state.sessions.resolve(&token).is_none());

    let token = app.state.sessions.create(999);
    let cookie = format!("recipebox_session={token}");
    let create = app.send(Method::POST, "/recipes", Some(&cookie), Some(chili())).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    assert_eq!(create.body, json!({"errors": ["Unauthorized"]}));
    assert_eq!(app.state.db.count_recipes().unwrap(), 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.signup("ana", "pw1").await.cookie.unwrap();

    let reply = app.send(Method::DELETE, "/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(reply.body, Value::Null);

    let check = app.send(Method::GET, "/check_session", Some(&cookie), None).await;
    assert_eq!(check.status, StatusCode::UNAUTHORIZED);
    assert_eq!(check.body, json!({"errors": ["Not logged in"]}));

    let again = app.send(Method::DELETE, "/logout", Some(&cookie), None).await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
    assert_eq!(again.body, json!({"errors": ["Not logged in"]}));
}

#[tokio::test]
async fn recipes_require_a_session() {
    let app = TestApp::new();

    let list = app.send(Method::GET, "/recipes", None, None).await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);
    assert_eq!(list.body, json!({"errors": ["Unauthorized"]}));

    let create = app.send(Method::POST, "/recipes", None, Some(chili())).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    assert_eq!(create.body, json!({"errors": ["Unauthorized"]}));
    assert_eq!(app.state.db.count_recipes().unwrap(), 0);
}

#[tokio::test]
async fn created_recipe_belongs_to_the_session_user_and_is_listed() {
    let app = TestApp::new();
    app.signup("ben", "pw").await;
    let signup = app.signup("ana", "pw1").await;
    let ana_id = signup.body["id"].clone();
    let cookie = signup.cookie.unwrap();

    let created = app.send(Method::POST, "/recipes", Some(&cookie), Some(chili())).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Chili");
    assert_eq!(created.body["instructions"], INSTRUCTIONS);
    assert_eq!(created.body["minutes_to_complete"], 60);
    assert_eq!(created.body["user"]["id"], ana_id);
    assert_eq!(created.body["user"]["username"], "ana");

    let list = app.send(Method::GET, "/recipes", Some(&cookie), None).await;
    assert_eq!(list.status, StatusCode::OK);
    let recipes = list.body.as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0], created.body);
}

#[tokio::test]
async fn list_shows_recipes_from_every_user() {
    let app = TestApp::new();
    let ana = app.signup("ana", "pw1").await.cookie.unwrap();
    let ben = app.signup("ben", "pw2").await.cookie.unwrap();

    app.send(Method::POST, "/recipes", Some(&ana), Some(chili())).await;
    app.send(Method::POST, "/recipes", Some(&ben), Some(chili())).await;

    let list = app.send(Method::GET, "/recipes", Some(&ana), None).await;
    let owners: Vec<&str> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["user"]["username"].as_str().unwrap())
        .collect();
    assert_eq!(owners, vec!["ana", "ben"]);
}

#[tokio::test]
async fn invalid_recipe_is_rejected_and_not_stored() {
    let app = TestApp::new();
    let cookie = app.signup("ana", "pw1").await.cookie.unwrap();

    let reply = app
        .send(
            Method::POST,
            "/recipes",
            Some(&cookie),
            Some(json!({"title": "Toast", "instructions": "Toast it.", "minutes_to_complete": 2})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.body,
        json!({"errors": ["Instructions must be at least 50 characters long"]})
    );

    let missing = app
        .send(Method::POST, "/recipes", Some(&cookie), Some(json!({"title": "Toast"})))
        .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing.body, json!({"errors": ["Invalid request body"]}));

    assert_eq!(app.state.db.count_recipes().unwrap(), 0);
}
