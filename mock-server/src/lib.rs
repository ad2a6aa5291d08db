use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zipcode: String,
}

/// A user record. Carries more fields than a login needs, like the real
/// backend does.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<User>,
    pub todos: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoQuery {
    pub user_id: Option<i64>,
}

/// Router over the seeded fixture data.
pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/users", get(list_users))
        .route("/todos", get(list_todos))
        .route("/todos/{id}", put(upsert_todo))
        .with_state(db)
}

/// Router answering every request with `status` and an empty JSON object.
pub fn failing_app(status: StatusCode) -> Router {
    Router::new().fallback(move || async move { (status, Json(serde_json::json!({}))) })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn list_users(State(db): State<Db>, Query(query): Query<UserQuery>) -> Json<Vec<User>> {
    let store = db.read().await;
    let users = store
        .users
        .iter()
        .filter(|u| query.username.as_ref().is_none_or(|name| &u.username == name))
        .cloned()
        .collect();
    Json(users)
}

async fn list_todos(State(db): State<Db>, Query(query): Query<TodoQuery>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let todos = store
        .todos
        .values()
        .filter(|t| query.user_id.is_none_or(|id| t.user_id == id))
        .cloned()
        .collect();
    Json(todos)
}

/// Stores the body under the path id, replacing any existing item.
async fn upsert_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Todo>,
) -> Result<Json<Todo>, StatusCode> {
    if input.id != id {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    store.todos.insert(id, input.clone());
    Ok(Json(input))
}

pub fn seed() -> Store {
    let users = vec![
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
            address: Address {
                street: "Kulas Light".to_string(),
                city: "Gwenborough".to_string(),
                zipcode: "92998-3874".to_string(),
            },
            phone: "1-770-736-8031 x56442".to_string(),
            website: "hildegard.org".to_string(),
        },
        User {
            id: 2,
            name: "Ervin Howell".to_string(),
            username: "Antonette".to_string(),
            email: "Shanna@melissa.tv".to_string(),
            address: Address {
                street: "Victor Plains".to_string(),
                city: "Wisokyburgh".to_string(),
                zipcode: "90566-7771".to_string(),
            },
            phone: "010-692-6593 x09125".to_string(),
            website: "anastasia.net".to_string(),
        },
    ];
    let todos = [
        (1, 1, "delectus aut autem", false),
        (1, 2, "quis ut nam facilis et officia qui", false),
        (1, 3, "fugiat veniam minus", false),
        (1, 4, "et porro tempora", true),
        (2, 21, "suscipit repellat esse quibusdam voluptatem incidunt", false),
        (2, 22, "distinctio vitae autem nihil ut molestias quo", true),
    ]
    .into_iter()
    .map(|(user_id, id, title, completed)| {
        (
            id,
            Todo {
                user_id,
                id,
                title: title.to_string(),
                completed,
            },
        )
    })
    .collect();
    Store { users, todos }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_camel_case_user_id() {
        let todo = Todo {
            user_id: 1,
            id: 1,
            title: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn todo_rejects_missing_completed() {
        let result: Result<Todo, _> =
            serde_json::from_str(r#"{"userId":1,"id":1,"title":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn seed_has_unique_usernames() {
        let store = seed();
        let mut names: Vec<_> = store.users.iter().map(|u| u.username.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), store.users.len());
    }

    #[test]
    fn user_query_username_is_optional() {
        let query: UserQuery = serde_json::from_str("{}").unwrap();
        assert!(query.username.is_none());
    }
}
