//! Scripted transport for client tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::http::{BoxError, HttpRequest, HttpResponse, HttpTransport};

#[derive(Debug)]
enum Scripted {
    Response {
        status: u16,
        url: Option<String>,
        body: String,
    },
    Failure(String),
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    script: VecDeque<Scripted>,
}

/// Answers requests from a queue and records everything it was sent.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response served from the request's own URL.
    pub(crate) fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Scripted::Response {
            status,
            url: None,
            body: body.into(),
        })
    }

    /// Queue a response that ended on `url` after redirects.
    pub(crate) fn respond_from(
        &self,
        status: u16,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> &Self {
        self.push(Scripted::Response {
            status,
            url: Some(url.into()),
            body: body.into(),
        })
    }

    pub(crate) fn fail(&self, message: impl Into<String>) -> &Self {
        self.push(Scripted::Failure(message.into()))
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn push(&self, scripted: Scripted) -> &Self {
        self.state.lock().unwrap().script.push_back(scripted);
        self
    }
}

impl HttpTransport for FakeTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut state = self.state.lock().unwrap();
        let request_url = request.url.clone();
        state.requests.push(request);
        match state.script.pop_front() {
            Some(Scripted::Response { status, url, body }) => Ok(HttpResponse {
                status,
                url: url.unwrap_or(request_url),
                body,
            }),
            Some(Scripted::Failure(message)) => Err(message.into()),
            None => Err(format!("no scripted response for {request_url}").into()),
        }
    }
}
