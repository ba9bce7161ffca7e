use super::*;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    users: Arc<Mutex<Vec<User>>>,
    seen: Arc<Mutex<Vec<(String, Option<Value>)>>>,
}

impl ServerState {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            seen: Arc::default(),
        }
    }

    async fn record(&self, request: impl Into<String>, body: Option<Value>) {
        self.seen.lock().await.push((request.into(), body));
    }
}

async fn handle_list(State(state): State<ServerState>) -> Json<Vec<User>> {
    state.record("GET /users", None).await;
    Json(state.users.lock().await.clone())
}

async fn handle_create(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("POST /users", Some(body.clone())).await;
    let mut created = body;
    created["id"] = json!(11);
    (StatusCode::CREATED, Json(created))
}

async fn handle_update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(format!("PUT /users/{id}"), Some(body.clone())).await;
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated)
}

async fn handle_delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Json<Value> {
    state.record(format!("DELETE /users/{id}"), None).await;
    Json(json!({}))
}

async fn handle_unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance window")
}

async fn handle_garbled() -> &'static str {
    "<html>not json</html>"
}

async fn handle_slow() -> Json<Vec<User>> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(Vec::new())
}

async fn spawn_directory_server(state: ServerState) -> std::io::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/users", get(handle_list).post(handle_create))
        .route("/users/:id", put(handle_update).delete(handle_delete))
        .route("/down", get(handle_unavailable).post(handle_unavailable))
        .route(
            "/down/:id",
            put(handle_unavailable).delete(handle_unavailable),
        )
        .route("/garbled", get(handle_garbled))
        .route("/slow", get(handle_slow))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn leanne() -> User {
    User {
        id: Some(UserId(1)),
        name: "Leanne Graham".into(),
        email: "Sincere@april.biz".into(),
        phone: "1-770-736-8031".into(),
        website: "hildegard.org".into(),
    }
}

fn draft() -> UserDraft {
    UserDraft {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone: String::new(),
        website: "Engineering".into(),
    }
}

#[tokio::test]
async fn lists_users_from_collection_endpoint() {
    let state = ServerState::with_users(vec![leanne()]);
    let base = spawn_directory_server(state.clone()).await.expect("spawn server");
    let client = HttpDirectoryClient::new(&format!("{base}/users")).expect("client");

    let users = client.list_users().await.expect("list");

    assert_eq!(users, vec![leanne()]);
    assert_eq!(state.seen.lock().await[0].0, "GET /users");
}

#[tokio::test]
async fn create_posts_draft_without_id_and_returns_server_record() {
    let state = ServerState::default();
    let base = spawn_directory_server(state.clone()).await.expect("spawn server");
    let client = HttpDirectoryClient::new(&format!("{base}/users")).expect("client");

    let created = client.create_user(&draft()).await.expect("create");

    assert_eq!(created, draft().into_user(Some(UserId(11))));
    let seen = state.seen.lock().await;
    let (request, body) = &seen[0];
    assert_eq!(request, "POST /users");
    let body = body.as_ref().expect("body");
    assert!(body.get("id").is_none(), "draft must not carry an id: {body}");
    assert_eq!(body["phone"], "");
}

#[tokio::test]
async fn update_and_delete_address_member_url() {
    let state = ServerState::default();
    let base = spawn_directory_server(state.clone()).await.expect("spawn server");
    let client = HttpDirectoryClient::new(&format!("{base}/users/")).expect("client");

    let updated = client.update_user(UserId(4), &draft()).await.expect("update");
    client.delete_user(UserId(4)).await.expect("delete");

    assert_eq!(updated, draft().into_user(Some(UserId(4))));
    let seen = state.seen.lock().await;
    let requests: Vec<&str> = seen.iter().map(|(request, _)| request.as_str()).collect();
    assert_eq!(requests, vec!["PUT /users/4", "DELETE /users/4"]);
}

#[tokio::test]
async fn non_success_status_captures_body_text() {
    let base = spawn_directory_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = HttpDirectoryClient::new(&format!("{base}/down")).expect("client");

    let err = client.list_users().await.expect_err("must fail");
    match &err {
        ClientError::Status { status, body } => {
            assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body, "maintenance window");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorCode::Network);

    let err = client.delete_user(UserId(2)).await.expect_err("must fail");
    assert!(matches!(err, ClientError::Status { .. }), "{err:?}");
}

#[tokio::test]
async fn undecodable_body_is_an_unexpected_error() {
    let base = spawn_directory_server(ServerState::default())
        .await
        .expect("spawn server");
    let client = HttpDirectoryClient::new(&format!("{base}/garbled")).expect("client");

    let err = client.list_users().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Decode { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorCode::Unexpected);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpDirectoryClient::new(&format!("http://{addr}/users")).expect("client");

    let err = client.list_users().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Transport { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorCode::Network);
}

#[tokio::test]
async fn request_timeout_surfaces_as_transport_error() {
    let base = spawn_directory_server(ServerState::default())
        .await
        .expect("spawn server");
    let client =
        HttpDirectoryClient::with_timeout(&format!("{base}/slow"), Some(Duration::from_millis(100)))
            .expect("client");

    let err = client.list_users().await.expect_err("must time out");
    assert!(matches!(err, ClientError::Transport { .. }), "{err:?}");
}

#[test]
fn rejects_unusable_collection_urls() {
    for raw in ["not a url", "mailto:someone@example.com", "ftp://example.com/users"] {
        let err = HttpDirectoryClient::new(raw).expect_err("must reject");
        assert!(matches!(err, ClientError::InvalidUrl { .. }), "{raw}: {err:?}");
    }
}

#[test]
fn member_url_appends_id_to_collection_path() {
    let client = HttpDirectoryClient::new("https://example.com/api/users/").expect("client");
    assert_eq!(client.collection_url().as_str(), "https://example.com/api/users");
    assert_eq!(
        client.member_url(UserId(7)).expect("member url").as_str(),
        "https://example.com/api/users/7"
    );
}
