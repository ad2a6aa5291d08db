//! The last fetched todo list of the signed-in user.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Todo, TodoChange};

/// Todos in backend order. Updates replace items in place by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoBoard {
    todos: Vec<Todo>,
}

impl TodoBoard {
    pub fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Replace the item with the same id. Returns `false` when no item
    /// matches, in which case the board is unchanged.
    pub fn merge(&mut self, updated: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Send the completion change for `id` and merge the server's reply.
    ///
    /// An unknown id yields `Ok(None)` without a request. On failure the
    /// board is left as it was.
    pub async fn set_completed<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        id: i64,
        completed: bool,
    ) -> Result<Option<Todo>, ApiError> {
        let Some(todo) = self.get(id).cloned() else {
            return Ok(None);
        };
        let updated = api
            .update_todo(&todo, &TodoChange::default().completed(completed))
            .await?;
        self.merge(updated.clone());
        Ok(Some(updated))
    }
}

impl From<Vec<Todo>> for TodoBoard {
    fn from(todos: Vec<Todo>) -> Self {
        Self::new(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;

    use crate::client::TodoClient;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::transport::TransportError;

    /// Answers a PUT by echoing its body, like the backend does.
    struct Echo;

    impl Transport for Echo {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
            let body = request.body.unwrap_or_default();
            async move { Ok(HttpResponse::new(200, body)) }
        }
    }

    /// Always fails at the network level.
    struct Down;

    impl Transport for Down {
        fn execute(
            &self,
            _request: HttpRequest,
        ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
            async { Err(TransportError::Network("unreachable".to_string())) }
        }
    }

    fn todo(id: i64, completed: bool) -> Todo {
        Todo {
            user_id: 1,
            id,
            title: format!("todo {id}"),
            completed,
        }
    }

    #[test]
    fn merge_replaces_by_id_and_keeps_order() {
        let mut board = TodoBoard::new(vec![todo(3, false), todo(1, false), todo(2, false)]);
        assert!(board.merge(todo(1, true)));
        assert_eq!(
            board.todos().iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![3, 1, 2]
        );
        assert!(board.get(1).unwrap().completed);
    }

    #[test]
    fn merge_unknown_id_is_ignored() {
        let mut board = TodoBoard::new(vec![todo(1, false)]);
        assert!(!board.merge(todo(9, true)));
        assert_eq!(board.len(), 1);
        assert!(!board.get(1).unwrap().completed);
    }

    #[tokio::test]
    async fn set_completed_merges_reply() {
        let api = ApiClient::new(TodoClient::new("http://backend"), Echo);
        let mut board = TodoBoard::new(vec![todo(1, false), todo(2, false)]);

        let updated = board.set_completed(&api, 2, true).await.unwrap().unwrap();
        assert!(updated.completed);
        assert!(board.get(2).unwrap().completed);
        assert!(!board.get(1).unwrap().completed);
    }

    #[tokio::test]
    async fn set_completed_unknown_id_is_none() {
        let api = ApiClient::new(TodoClient::new("http://backend"), Down);
        let mut board = TodoBoard::new(vec![todo(1, false)]);
        assert_eq!(board.set_completed(&api, 9, true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_update_leaves_board_unchanged() {
        let api = ApiClient::new(TodoClient::new("http://backend"), Down);
        let mut board = TodoBoard::new(vec![todo(1, false)]);
        let before = board.clone();

        let err = board.set_completed(&api, 1, true).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(board, before);
    }
}
