//! Executing `HttpRequest`s against the network.
//!
//! # Design
//! `Transport` is the seam between the sans-IO `TodoClient` and real I/O.
//! `UreqTransport` runs the blocking ureq call on tokio's blocking pool with
//! a fixed per-call timeout. Status codes are never turned into errors here;
//! 4xx/5xx responses come back as data for the classifier. Only failures to
//! obtain a response at all become `TransportError`.
//!
//! Interceptors see every request before it is sent and every response after
//! it arrives. They are injected when the transport is built.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failure to obtain any HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS, timeout or I/O failure.
    #[error("network failure: {0}")]
    Network(String),

    /// Anything else: invalid request, worker failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Executes one request and yields its response.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Hook around every request a transport sends.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &mut HttpRequest) {}

    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}
}

/// Logs the request line and response status at debug, bodies at trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn on_request(&self, request: &mut HttpRequest) {
        debug!("--> {} {}", request.method.as_str(), request.url);
        if let Some(body) = &request.body {
            trace!("--> body {body}");
        }
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        debug!(
            "<-- {} {} {}",
            response.status,
            request.method.as_str(),
            request.url
        );
        trace!("<-- body {}", response.body);
    }
}

/// Adds a fixed header to every request unless it is already present.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    name: String,
    value: String,
}

impl HeaderInterceptor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Interceptor for HeaderInterceptor {
    fn on_request(&self, request: &mut HttpRequest) {
        if request.header(&self.name).is_none() {
            request.headers.push((self.name.clone(), self.value.clone()));
        }
    }
}

/// `Transport` backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: &ClientConfig) -> UreqTransportBuilder {
        UreqTransportBuilder {
            timeout: config.timeout(),
            interceptors: Vec::new(),
        }
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

pub struct UreqTransportBuilder {
    timeout: Duration,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl UreqTransportBuilder {
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> UreqTransport {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(self.timeout))
            .build()
            .new_agent();
        UreqTransport {
            agent,
            interceptors: Arc::new(self.interceptors),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        run(self.agent.clone(), Arc::clone(&self.interceptors), request)
    }
}

async fn run(
    agent: ureq::Agent,
    interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    mut request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    for interceptor in interceptors.iter() {
        interceptor.on_request(&mut request);
    }
    let sent = request.clone();
    let response = tokio::task::spawn_blocking(move || send(&agent, sent))
        .await
        .map_err(|e| TransportError::Other(format!("request worker failed: {e}")))??;
    for interceptor in interceptors.iter() {
        interceptor.on_response(&request, &response);
    }
    Ok(response)
}

fn send(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let result = match request.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            builder.call()
        }
        HttpMethod::Put => {
            let mut builder = agent.put(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            match request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(from_ureq)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    // Once a status is known, body read failures are classified by status.
    let body = match response.body_mut().read_to_vec() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("could not read body of HTTP {status} response: {e}");
            String::new()
        }
    };

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn from_ureq(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Io(_)
        | ureq::Error::Timeout(_)
        | ureq::Error::HostNotFound
        | ureq::Error::ConnectionFailed
        | ureq::Error::Protocol(_) => TransportError::Network(err.to_string()),
        other => TransportError::Other(other.to_string()),
    }
}
