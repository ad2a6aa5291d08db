//! Client core for a todo backend with a persisted login session.
//!
//! # Overview
//! Logs a user in by username, keeps the signed-in user in a session backed
//! by key-value storage, and fetches/updates that user's todos.
//!
//! # Design
//! - `TodoClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `ApiClient` pairs it with a `Transport` and exposes async operations.
//!   `UreqTransport` is the stock transport; hosts may bring their own.
//! - Every response goes through `classify`, so every failure is one of the
//!   five `ApiError` kinds.
//! - `Session` owns its storage and is passed explicitly; `User` and `Todo`
//!   are plain data.

pub mod account;
pub mod api;
pub mod board;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod serializer;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

pub use account::{load_board, sign_in, sign_out};
pub use api::ApiClient;
pub use board::TodoBoard;
pub use classify::{classify, StatusClass};
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use serializer::UserSerializer;
pub use session::{Session, SessionError, SESSION_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use transport::{
    HeaderInterceptor, Interceptor, LoggingInterceptor, Transport, TransportError, UreqTransport,
};
pub use types::{Email, Todo, TodoChange, User};
