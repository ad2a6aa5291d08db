//! C-ABI wrapper around `taskpad-core`.
//!
//! # Overview
//! Exposes login, todo listing/updating, the user snapshot codec and a
//! file-backed session through `extern "C"` functions, so a native host can
//! drive the core with its own HTTP stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary. A response status outside the backend
//!   contract (1xx, 3xx) is such a panic and surfaces as `FfiErrorCode::Panic`.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `taskpad_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use taskpad_core::{
    ApiError, FileStorage, HttpResponse, Session, SessionError, TodoChange, TodoClient,
    UserSerializer,
};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TodoClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `taskpad_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_client_new(base_url: *const c_char) -> *mut FfiClient {
    catch_unwind(|| match unsafe { read_str(base_url) } {
        Some(url) => Box::into_raw(Box::new(FfiClient {
            inner: TodoClient::new(&url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `taskpad_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the login lookup for `username`.
///
/// Returns null if `client` or `username` is null.
/// The caller must free the returned pointer with `taskpad_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_build_login(
    client: *const FfiClient,
    username: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match unsafe { read_str(username) } {
            Some(name) => FfiHttpRequest::from_core(client.inner.build_login(&name)),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request listing the todos of `user_id`.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_build_list_todos(
    client: *const FfiClient,
    user_id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_todos(user_id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the full-replacement PUT for `todo` with a change applied.
///
/// `title` may be null (keep current). `completed` uses tri-state:
/// -1 = keep, 0 = false, 1 = true.
/// Returns null if `client` or `todo` is null, or if a string is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_build_update_todo(
    client: *const FfiClient,
    todo: *const FfiTodo,
    title: *const c_char,
    completed: i32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || todo.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(current) = (unsafe { (*todo).to_core() }) else {
            return std::ptr::null_mut();
        };
        let title = if title.is_null() {
            None
        } else {
            match unsafe { read_str(title) } {
                Some(t) => Some(t),
                None => return std::ptr::null_mut(),
            }
        };
        let change = TodoChange {
            title,
            completed: match completed {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            },
        };
        match client.inner.build_update_todo(&current, &change) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert a host response, or report the transport failure it carries.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    let body = unsafe { read_str(resp.body) }.unwrap_or_default();
    if resp.transport_failed {
        let reason = if body.is_empty() {
            "transport failure".to_string()
        } else {
            body
        };
        return Err(ApiError::Network(reason));
    }
    Ok(HttpResponse::new(resp.status, body))
}

/// Shared null checks and dispatch for the `taskpad_parse_*` functions.
fn parse_with<T>(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ok: impl FnOnce(T) -> *mut FfiResult,
) -> *mut FfiResult {
    if client.is_null() {
        return FfiResult::null_arg("client");
    }
    if response.is_null() {
        return FfiResult::null_arg("response");
    }
    let client = unsafe { &*client };
    let resp = unsafe { &*response };
    match ffi_response_to_core(resp).and_then(|r| parse(&client.inner, r)) {
        Ok(value) => ok(value),
        Err(e) => FfiResult::from_error(e),
    }
}

/// Parse the login lookup response.
///
/// Returns a result with `data_tag = User` on success.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_parse_login(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| parse_with(client, response, TodoClient::parse_login, FfiResult::ok_user))
        .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_parse_login"))
}

/// Parse a list-todos response.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_parse_list_todos(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        parse_with(
            client,
            response,
            TodoClient::parse_list_todos,
            FfiResult::ok_todo_list,
        )
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_parse_list_todos"))
}

/// Parse an update-todo response.
///
/// Returns a result with `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_parse_update_todo(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        parse_with(
            client,
            response,
            TodoClient::parse_update_todo,
            FfiResult::ok_todo,
        )
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_parse_update_todo"))
}

// ---------------------------------------------------------------------------
// User snapshot
// ---------------------------------------------------------------------------

/// Encode `user` as a JSON snapshot.
///
/// Returns null if `user` is null or holds invalid strings.
/// The caller must free the returned string with `taskpad_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_user_serialize(user: *const FfiUser) -> *mut c_char {
    catch_unwind(|| {
        if user.is_null() {
            return std::ptr::null_mut();
        }
        let Some(user) = (unsafe { (*user).to_core() }) else {
            return std::ptr::null_mut();
        };
        match UserSerializer.serialize(&user) {
            Ok(snapshot) => c_string(snapshot),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Decode a JSON snapshot into a user.
///
/// Returns a result with `data_tag = User` on success and `Unexpected` for
/// a malformed snapshot.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_user_deserialize(snapshot: *const c_char) -> *mut FfiResult {
    catch_unwind(|| {
        let Some(snapshot) = (unsafe { read_str(snapshot) }) else {
            return FfiResult::null_arg("snapshot");
        };
        match UserSerializer.deserialize(&snapshot) {
            Ok(user) => FfiResult::ok_user(user),
            Err(e) => FfiResult::from_error(ApiError::Unexpected(e.to_string())),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_user_deserialize"))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Open the session stored in the JSON file at `path`, restoring any
/// signed-in user.
///
/// Returns null if `path` is null or the file cannot be read.
/// The caller must free the returned pointer with `taskpad_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_session_open(path: *const c_char) -> *mut FfiSession {
    catch_unwind(|| {
        let Some(path) = (unsafe { read_str(path) }) else {
            return std::ptr::null_mut();
        };
        let session = FileStorage::open(path)
            .map_err(SessionError::from)
            .and_then(Session::restore);
        match session {
            Ok(inner) => Box::into_raw(Box::new(FfiSession { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Report the signed-in user.
///
/// Returns `data_tag = User` when signed in, `data_tag = None` otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_session_current_user(session: *const FfiSession) -> *mut FfiResult {
    catch_unwind(|| {
        if session.is_null() {
            return FfiResult::null_arg("session");
        }
        let session = unsafe { &*session };
        match session.inner.current_user() {
            Some(user) => FfiResult::ok_user(user.clone()),
            None => FfiResult::ok_empty(),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_session_current_user"))
}

/// Sign `user` in and persist it. On `Storage` failure the session is
/// unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_session_begin(
    session: *mut FfiSession,
    user: *const FfiUser,
) -> *mut FfiResult {
    catch_unwind(|| {
        if session.is_null() {
            return FfiResult::null_arg("session");
        }
        if user.is_null() {
            return FfiResult::null_arg("user");
        }
        let session = unsafe { &mut *session };
        let Some(user) = (unsafe { (*user).to_core() }) else {
            return FfiResult::null_arg("user fields");
        };
        match session.inner.begin(user) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_session_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_session_begin"))
}

/// Sign out and remove the stored snapshot.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_session_end(session: *mut FfiSession) -> *mut FfiResult {
    catch_unwind(|| {
        if session.is_null() {
            return FfiResult::null_arg("session");
        }
        let session = unsafe { &mut *session };
        match session.inner.end() {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_session_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in taskpad_session_end"))
}

/// Free a session opened by `taskpad_session_open`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(session) });
        });
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `taskpad_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    });
}

/// Free an `FfiResult` returned by this library.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::User => {
                let user = unsafe { Box::from_raw(result.data as *mut FfiUser) };
                unsafe { user.free_fields() };
            }
            FfiDataTag::Todo => {
                let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                unsafe { todo.free_fields() };
            }
            FfiDataTag::TodoList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Vec::from_raw_parts(list.items, list.len as usize, list.len as usize)
                    };
                    for item in &items {
                        unsafe { item.free_fields() };
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn taskpad_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
