// desk-client/tests/client_integration.rs
// Auth flow and session against an in-process mock of the identity provider
// and the booking service

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use desk_client::{
    AuthFlow, ClientConfig, ClientError, DeskApi, DeskSession, Secret, SecretStorage,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const TX: &str = "StateProperties=eyJUSUQiOiIxIn0";
const USER: &str = "grace@example.com";
const PASS: &str = "hunter2";

#[derive(Default)]
struct Mock {
    confirmations: usize,
    refresh_expired: bool,
    /// `Path` of the refresh cookie, site root when unset
    refresh_cookie_path: Option<&'static str>,
    steps: Vec<&'static str>,
}

type Shared = Arc<Mutex<Mock>>;

fn step(mock: &Shared, name: &'static str) -> usize {
    let mut mock = mock.lock().unwrap();
    mock.steps.push(name);
    mock.confirmations
}

fn expected_csrf(confirmations: usize) -> &'static str {
    if confirmations == 0 { "csrf-1" } else { "csrf-2" }
}

fn refresh_cookie(mock: &Shared, value: &str) -> String {
    let path = mock.lock().unwrap().refresh_cookie_path.unwrap_or("/");
    format!("refresh_token={value}; Path={path}; HttpOnly")
}

fn has(map: &HashMap<String, String>, key: &str, value: &str) -> bool {
    map.get(key).map(String::as_str) == Some(value)
}

async fn authorize(
    State(mock): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    step(&mock, "authorize");
    let callback_ok = q.get("callbackUri").is_some_and(|c| c.ends_with("/callback"));
    if !callback_ok || !has(&q, "emailHint", "") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let page = format!(
        r#"<html><script>var SETTINGS = {{"csrf":"x","transId":"{TX}","pageViewId":"p-1"}};</script></html>"#
    );
    ([(header::SET_COOKIE, "x-ms-cpim-csrf=csrf-1; Path=/")], Html(page)).into_response()
}

async fn self_asserted(
    State(mock): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let with_password = form.contains_key("password");
    let confirmations = step(&mock, if with_password { "password" } else { "username" });

    let csrf_ok = headers
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected_csrf(confirmations));
    let form_ok = has(&form, "request_type", "RESPONSE")
        && has(&form, "signInName", USER)
        && with_password == (confirmations > 0);
    if !csrf_ok || !form_ok || !has(&q, "tx", TX) || !has(&q, "p", "P") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if with_password && !has(&form, "password", PASS) {
        return (StatusCode::BAD_REQUEST, "wrong password").into_response();
    }
    Json(json!({"status": "200"})).into_response()
}

async fn confirm(State(mock): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    let confirmations = step(&mock, "confirm");
    if !has(&q, "csrf_token", expected_csrf(confirmations)) || !has(&q, "tx", TX) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    mock.lock().unwrap().confirmations += 1;
    if confirmations == 0 {
        ([(header::SET_COOKIE, "x-ms-cpim-csrf=csrf-2; Path=/")], "ok").into_response()
    } else {
        Redirect::to("/callback?code=c%2F1&state=st-1").into_response()
    }
}

async fn callback() -> &'static str {
    "signed in"
}

async fn get_token(State(mock): State<Shared>, Json(body): Json<Value>) -> Response {
    step(&mock, "get-token");
    let ok = body["code"] == "c/1"
        && body["state"] == "st-1"
        && body["redirectUri"].as_str().is_some_and(|u| u.ends_with("/callback"));
    if !ok {
        return StatusCode::BAD_REQUEST.into_response();
    }
    (
        [(header::SET_COOKIE, refresh_cookie(&mock, "r-1"))],
        Json(json!({"accessToken": "acc-1"})),
    )
        .into_response()
}

async fn try_refresh(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    step(&mock, "refresh");
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !cookie.contains("refresh_token=stored-r") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if mock.lock().unwrap().refresh_expired {
        return Json(json!({"newTokenOrNull": null})).into_response();
    }
    (
        [(header::SET_COOKIE, refresh_cookie(&mock, "r-2"))],
        Json(json!({"newTokenOrNull": {"accessToken": "acc-2"}})),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer acc-1")
}

async fn zones(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"zones": [
        {"id": "z-1", "name": "Open Space", "isMapAvailable": true},
        {"id": "z-2", "name": "Quiet Room", "isMapAvailable": false},
    ]}))
    .into_response()
}

async fn marketplace_days(Json(body): Json<Value>) -> Response {
    if body["zoneId"] != "z-1" {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({"weeks": [
        {"week": [
            {"day": "2024-05-06", "reservedDeskOrNull": {"id": "d-7"}},
            {"day": "2024-05-07", "reservedDeskOrNull": null},
        ]},
        {"week": [{"day": "2024-05-13"}]},
    ]}))
    .into_response()
}

async fn take(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"receivedDeskOrNull": null, "echo": body}))
}

async fn release() -> Response {
    (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
}

async fn zone_image(Path(id): Path<String>) -> Response {
    let png = vec![0x89u8, b'P', b'N', b'G'];
    if id == "z-1" {
        ([(header::CONTENT_TYPE, "image/png")], png).into_response()
    } else if id == "z-3" {
        // served by a caching proxy
        (
            StatusCode::NON_AUTHORITATIVE_INFORMATION,
            [(header::CONTENT_TYPE, "image/png")],
            png,
        )
            .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn(mock: Shared) -> String {
    let app = Router::new()
        .route("/api/auth0/authorize", get(authorize))
        .route("/idp/P/SelfAsserted", post(self_asserted))
        .route("/idp/P/api/CombinedSigninAndSignup/confirmed", get(confirm))
        .route("/callback", get(callback))
        .route("/api/auth0/get-token", post(get_token))
        .route("/api/auth0/try-refresh-token", post(try_refresh))
        .route(
            "/api/employee-desks/desk-marketplace/get-marketplace-zones",
            post(zones),
        )
        .route(
            "/api/employee-desks/desk-marketplace/get-marketplace-desks",
            post(marketplace_days),
        )
        .route("/api/employee-desks/desk-marketplace/take", post(take))
        .route("/api/employee-desks/share-desk/free", post(release))
        .route(
            "/api/components/desk-zone-map/desk-zone-map-image/{id}",
            get(zone_image),
        )
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base: &str) -> ClientConfig {
    ClientConfig::new(base)
        .with_login_url(format!("{base}/idp"))
        .with_policy("P")
        .with_timeout(5)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_auth_flow_yields_bearer_token() {
    let mock = Shared::default();
    let base = spawn(mock.clone()).await;

    let tokens = AuthFlow::new(&config(&base))
        .unwrap()
        .authenticate(USER, PASS)
        .await
        .unwrap();

    assert!(tokens.bearer_token.starts_with("Bearer "));
    assert_eq!(tokens.bearer_token, "Bearer acc-1");
    assert_eq!(tokens.refresh_token, "r-1");
    assert_eq!(
        mock.lock().unwrap().steps,
        vec!["authorize", "username", "confirm", "password", "confirm", "get-token"]
    );
}

#[tokio::test]
async fn test_auth_flow_reads_path_scoped_refresh_cookie() {
    let mock = Shared::default();
    mock.lock().unwrap().refresh_cookie_path = Some("/api/auth0");
    let base = spawn(mock.clone()).await;

    let tokens = AuthFlow::new(&config(&base))
        .unwrap()
        .authenticate(USER, PASS)
        .await
        .unwrap();

    assert_eq!(tokens.bearer_token, "Bearer acc-1");
    assert_eq!(tokens.refresh_token, "r-1");
}

#[tokio::test]
async fn test_auth_flow_wrong_password_is_fatal() {
    let mock = Shared::default();
    let base = spawn(mock.clone()).await;

    let err = AuthFlow::new(&config(&base))
        .unwrap()
        .authenticate(USER, "nope")
        .await
        .unwrap_err();

    match err {
        ClientError::Status { step, status, .. } => {
            assert_eq!(step, "password submission");
            assert_eq!(status.as_u16(), 400);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!mock.lock().unwrap().steps.contains(&"get-token"));
}

#[tokio::test]
async fn test_login_without_secret_runs_auth_flow_and_saves() {
    let mock = Shared::default();
    let base = spawn(mock.clone()).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_secret.json");

    let mut session = DeskSession::new(&config(&base).with_secret_path(&path)).unwrap();
    session.login(USER, PASS).await.unwrap();

    assert_eq!(session.token(), Some("Bearer acc-1"));
    let saved = SecretStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(saved.bearer_token, "Bearer acc-1");
    assert_eq!(saved.refresh_token, "r-1");
    assert!(!mock.lock().unwrap().steps.contains(&"refresh"));
}

#[tokio::test]
async fn test_login_with_stored_secret_refreshes() {
    let mock = Shared::default();
    let base = spawn(mock.clone()).await;
    let dir = TempDir::new().unwrap();
    let storage = SecretStorage::new(dir.path().join("session_secret.json"));
    storage
        .save(&Secret::new("Bearer old".into(), "stored-r".into()))
        .unwrap();

    let mut session =
        DeskSession::new(&config(&base).with_secret_path(storage.path())).unwrap();
    session.login(USER, PASS).await.unwrap();

    assert_eq!(session.token(), Some("Bearer acc-2"));
    assert_eq!(mock.lock().unwrap().steps, vec!["refresh"]);
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.bearer_token, "Bearer acc-2");
    assert_eq!(saved.refresh_token, "r-2");
}

#[tokio::test]
async fn test_refresh_keeps_path_scoped_rotated_token() {
    let mock = Shared::default();
    mock.lock().unwrap().refresh_cookie_path = Some("/api/auth0");
    let base = spawn(mock.clone()).await;
    let dir = TempDir::new().unwrap();
    let storage = SecretStorage::new(dir.path().join("session_secret.json"));
    storage
        .save(&Secret::new("Bearer old".into(), "stored-r".into()))
        .unwrap();

    let mut session =
        DeskSession::new(&config(&base).with_secret_path(storage.path())).unwrap();
    session.login(USER, PASS).await.unwrap();

    assert_eq!(mock.lock().unwrap().steps, vec!["refresh"]);
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.bearer_token, "Bearer acc-2");
    assert_eq!(saved.refresh_token, "r-2");
}

#[tokio::test]
async fn test_login_with_expired_secret_falls_back() {
    let mock = Shared::default();
    mock.lock().unwrap().refresh_expired = true;
    let base = spawn(mock.clone()).await;
    let dir = TempDir::new().unwrap();
    let storage = SecretStorage::new(dir.path().join("session_secret.json"));
    storage
        .save(&Secret::new("Bearer old".into(), "stored-r".into()))
        .unwrap();

    let mut session =
        DeskSession::new(&config(&base).with_secret_path(storage.path())).unwrap();
    session.login(USER, PASS).await.unwrap();

    assert_eq!(session.token(), Some("Bearer acc-1"));
    let steps = mock.lock().unwrap().steps.clone();
    assert_eq!(steps[0], "refresh");
    assert_eq!(steps.last(), Some(&"get-token"));
    assert_eq!(storage.load().unwrap().unwrap().refresh_token, "r-1");
}

#[tokio::test]
async fn test_login_with_corrupt_secret_falls_back() {
    let mock = Shared::default();
    let base = spawn(mock.clone()).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_secret.json");
    std::fs::write(&path, "definitely not json").unwrap();

    let mut session = DeskSession::new(&config(&base).with_secret_path(&path)).unwrap();
    session.login(USER, PASS).await.unwrap();

    assert_eq!(session.token(), Some("Bearer acc-1"));
    assert!(!mock.lock().unwrap().steps.contains(&"refresh"));
    assert!(SecretStorage::new(&path).load().unwrap().is_some());
}

#[tokio::test]
async fn test_session_requires_bearer_token() {
    let base = spawn(Shared::default()).await;

    let anonymous = DeskSession::new(&config(&base)).unwrap();
    assert!(matches!(
        anonymous.get_zones().await,
        Err(ClientError::Unauthorized)
    ));

    let session = DeskSession::new(&config(&base))
        .unwrap()
        .with_token("Bearer acc-1");
    let zones = session.get_zones().await.unwrap();
    let names: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["Open Space", "Quiet Room"]);
    assert!(zones[0].is_map_available);
}

#[tokio::test]
async fn test_available_days_skip_reserved() {
    let base = spawn(Shared::default()).await;
    let session = DeskSession::new(&config(&base))
        .unwrap()
        .with_token("Bearer acc-1");

    let days = session.get_available_days("z-1").await.unwrap();
    assert_eq!(days, vec![day("2024-05-07"), day("2024-05-13")]);
}

#[tokio::test]
async fn test_take_and_release_pass_body_through() {
    let base = spawn(Shared::default()).await;
    let session = DeskSession::new(&config(&base))
        .unwrap()
        .with_token("Bearer acc-1");

    let taken = session
        .take_desk("z-1", "d-7", day("2024-05-07"))
        .await
        .unwrap();
    assert_eq!(taken["receivedDeskOrNull"], Value::Null);
    assert_eq!(
        taken["echo"],
        json!({"dayToTake": "2024-05-07", "zoneId": "z-1", "deskIdOrNull": "d-7"})
    );

    let released = session.release_desk(day("2024-05-07")).await.unwrap();
    assert_eq!(released, Value::String("Bad Gateway".into()));
}

#[tokio::test]
async fn test_zone_image_only_on_success() {
    let base = spawn(Shared::default()).await;
    let session = DeskSession::new(&config(&base))
        .unwrap()
        .with_token("Bearer acc-1");

    let image = session.get_zone_image("z-1").await.unwrap();
    assert_eq!(image.as_deref(), Some(&[0x89u8, b'P', b'N', b'G'][..]));
    assert_eq!(session.get_zone_image("z-2").await.unwrap(), None);
    let proxied = session.get_zone_image("z-3").await.unwrap();
    assert_eq!(proxied.as_deref(), Some(&[0x89u8, b'P', b'N', b'G'][..]));
}
