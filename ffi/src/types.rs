//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use taskpad_core::{
    ApiError, Email, FileStorage, HttpMethod, HttpRequest, Session, SessionError, Todo,
    TodoClient, User,
};

/// Opaque handle to a `TodoClient`.
pub struct FfiClient {
    pub(crate) inner: TodoClient,
}

/// Opaque handle to a file-backed `Session`.
pub struct FfiSession {
    pub(crate) inner: Session<FileStorage>,
}

/// Copy `s` into a heap C string, dropping interior NUL bytes.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

/// Read a caller-owned C string. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .ok()
        .map(str::to_string)
}

/// Free a C string produced by `c_string`. Null is ignored.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Put = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request for the host to execute.
///
/// `url` is absolute and includes the query string. The host executes the
/// request and passes the outcome back through `taskpad_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = req.body.map_or(std::ptr::null_mut(), c_string);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// Outcome of executing an `FfiHttpRequest`, filled in by the host.
///
/// When the host could not obtain any response (connection refused,
/// timeout, DNS failure) it sets `transport_failed` and may put a
/// description in `body`; `status` is then ignored.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
    pub transport_failed: bool,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Server = 2,
    Client = 3,
    InvalidUsername = 4,
    Unexpected = 5,
    Panic = 6,
    NullArg = 7,
    Storage = 8,
}

/// Tag that tells `taskpad_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    User = 1,
    Todo = 2,
    TodoList = 3,
}

#[repr(C)]
pub struct FfiUser {
    pub id: i64,
    pub name: *mut c_char,
    pub username: *mut c_char,
    pub email: *mut c_char,
}

impl FfiUser {
    fn from_core(user: User) -> Self {
        FfiUser {
            id: user.id,
            name: c_string(user.name),
            username: c_string(user.username),
            email: c_string(user.email.as_str().to_string()),
        }
    }

    /// # Safety
    /// String fields must be null or valid NUL-terminated strings.
    pub(crate) unsafe fn to_core(&self) -> Option<User> {
        Some(User {
            id: self.id,
            name: unsafe { read_str(self.name) }?,
            username: unsafe { read_str(self.username) }?,
            email: Email::new(unsafe { read_str(self.email) }?),
        })
    }

    pub(crate) unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.name);
            free_c_string(self.username);
            free_c_string(self.email);
        }
    }
}

#[repr(C)]
pub struct FfiTodo {
    pub user_id: i64,
    pub id: i64,
    pub title: *mut c_char,
    pub completed: bool,
}

impl FfiTodo {
    fn from_core(todo: Todo) -> Self {
        FfiTodo {
            user_id: todo.user_id,
            id: todo.id,
            title: c_string(todo.title),
            completed: todo.completed,
        }
    }

    /// # Safety
    /// `title` must be null or a valid NUL-terminated string.
    pub(crate) unsafe fn to_core(&self) -> Option<Todo> {
        Some(Todo {
            user_id: self.user_id,
            id: self.id,
            title: unsafe { read_str(self.title) }?,
            completed: self.completed,
        })
    }

    pub(crate) unsafe fn free_fields(&self) {
        unsafe { free_c_string(self.title) };
    }
}

#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for every fallible call.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag` (null for `None`).
/// On failure `error_code` names the kind, `error_message` is a
/// human-readable C string, `http_status` is set for `Server`/`Client`, and
/// `data` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_user(user: User) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiUser::from_core(user)));
        Self::ok(FfiDataTag::User, data as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_todo(todo: Todo) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiTodo::from_core(todo)));
        Self::ok(FfiDataTag::Todo, data as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_todo_list(todos: Vec<Todo>) -> *mut Self {
        let len = todos.len() as u32;
        let items = if todos.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiTodo]> = todos.into_iter().map(FfiTodo::from_core).collect();
            Box::into_raw(items) as *mut FfiTodo
        };
        let data = Box::into_raw(Box::new(FfiTodoList { items, len }));
        Self::ok(FfiDataTag::TodoList, data as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::Network(_) => (FfiErrorCode::Network, 0),
            ApiError::Server(status) => (FfiErrorCode::Server, *status),
            ApiError::Client(status) => (FfiErrorCode::Client, *status),
            ApiError::InvalidUsername => (FfiErrorCode::InvalidUsername, 0),
            ApiError::Unexpected(_) => (FfiErrorCode::Unexpected, 0),
        };
        Self::err(code, status, err.to_string())
    }

    pub(crate) fn from_session_error(err: SessionError) -> *mut Self {
        Self::err(FfiErrorCode::Storage, 0, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
