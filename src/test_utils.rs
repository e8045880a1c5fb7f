// In-memory transport for unit tests: replays queued responses in order
// and records every request it was handed.

use crate::api::{HttpRequest, HttpResponse, Transport};
use crate::error::BoxError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Default)]
pub struct MockTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, BoxError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail<E>(self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.replies.borrow_mut().push_back(Err(Box::new(err)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no response queued".into()))
    }
}
