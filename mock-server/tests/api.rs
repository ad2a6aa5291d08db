use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, failing_app, Store, Todo, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- users ---

#[tokio::test]
async fn users_filtered_by_username() {
    let resp = app().oneshot(get("/users?username=Antonette")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 2);
    assert_eq!(users[0].name, "Ervin Howell");
}

#[tokio::test]
async fn unknown_username_yields_empty_list() {
    let resp = app().oneshot(get("/users?username=nobody")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"[]");
}

#[tokio::test]
async fn users_carry_extra_fields() {
    let resp = app().oneshot(get("/users?username=Bret")).await.unwrap();
    let users: serde_json::Value = body_json(resp).await;
    assert!(users[0]["address"].is_object());
    assert!(users[0]["phone"].is_string());
}

#[tokio::test]
async fn users_without_filter_lists_everyone() {
    let resp = app().oneshot(get("/users")).await.unwrap();
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 2);
}

// --- todos ---

#[tokio::test]
async fn todos_filtered_by_user_in_id_order() {
    let resp = app().oneshot(get("/todos?userId=1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(todos.iter().all(|t| t.user_id == 1));
    assert_eq!(todos[0].title, "delectus aut autem");
    assert!(!todos[0].completed);
}

#[tokio::test]
async fn todos_for_unknown_user_is_empty() {
    let resp = app().oneshot(get("/todos?userId=99")).await.unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn todos_with_non_numeric_user_id_returns_400() {
    let resp = app().oneshot(get("/todos?userId=abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn put_replaces_todo_and_echoes_it() {
    let router = app();
    let body = r#"{"userId":1,"id":1,"title":"delectus aut autem","completed":true}"#;
    let resp = router
        .clone()
        .oneshot(json_request("PUT", "/todos/1", body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todo: Todo = body_json(resp).await;
    assert!(todo.completed);

    let resp = router.oneshot(get("/todos?userId=1")).await.unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.iter().find(|t| t.id == 1).unwrap().completed);
}

#[tokio::test]
async fn put_creates_missing_todo() {
    let router = app_with(Store::default());
    let body = r#"{"userId":5,"id":50,"title":"new","completed":false}"#;
    let resp = router
        .clone()
        .oneshot(json_request("PUT", "/todos/50", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router.oneshot(get("/todos?userId=5")).await.unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 1);
}

#[tokio::test]
async fn put_with_mismatched_id_returns_400() {
    let body = r#"{"userId":1,"id":2,"title":"x","completed":false}"#;
    let resp = app()
        .oneshot(json_request("PUT", "/todos/1", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_with_missing_fields_returns_422() {
    let resp = app()
        .oneshot(json_request("PUT", "/todos/1", r#"{"title":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_with_invalid_id_returns_400() {
    let body = r#"{"userId":1,"id":1,"title":"x","completed":false}"#;
    let resp = app()
        .oneshot(json_request("PUT", "/todos/not-a-number", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- failing backend ---

#[tokio::test]
async fn failing_app_answers_every_path_with_its_status() {
    for uri in ["/users?username=Bret", "/todos?userId=1"] {
        let resp = failing_app(StatusCode::SERVICE_UNAVAILABLE)
            .oneshot(get(uri))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
