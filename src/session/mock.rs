//! Mock session for testing.
//!
//! Provides a programmable session that replays scripted agent responses
//! without a network, and records every message it was asked to send.

use super::{RequestIdAllocator, Session};
use crate::error::{Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::value::Value;
use crate::varbind::VarBind;
use bytes::Bytes;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A mock response to return for a request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this PDU (request_id will be patched to match)
    Pdu(Pdu),
    /// Return this PDU as-is without patching request_id
    RawPdu(Pdu),
    /// Simulate the session exhausting its timeout retries
    Timeout,
    /// Simulate an IO error
    IoError(String),
}

struct MockSessionInner {
    responses: VecDeque<MockResponse>,
    requests: Vec<CommunityMessage>,
}

/// Mock session for testing bulk operations.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "testing")]
/// # {
/// use snmp_bulk::session::{MockSession, ResponseBuilder};
/// use snmp_bulk::{Value, oid};
///
/// let mock = MockSession::new("public");
/// mock.queue_response(
///     ResponseBuilder::new()
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(100))
///         .build(),
/// );
/// mock.queue_timeout();
/// assert_eq!(mock.queued_response_count(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct MockSession {
    community: Bytes,
    retries: u32,
    ids: Arc<RequestIdAllocator>,
    inner: Arc<Mutex<MockSessionInner>>,
}

impl MockSession {
    /// Create a new mock session with the given community.
    pub fn new(community: impl Into<Bytes>) -> Self {
        Self {
            community: community.into(),
            retries: 3,
            ids: Arc::new(RequestIdAllocator::starting_at(1)),
            inner: Arc::new(Mutex::new(MockSessionInner {
                responses: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    /// Set the retry hint reported by [`Session::retries`].
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Queue a response; its request_id is patched to match the request.
    pub fn queue_response(&self, pdu: Pdu) {
        self.push(MockResponse::Pdu(pdu));
    }

    /// Queue a response returned exactly as given.
    ///
    /// Useful for simulating request_id mismatches.
    pub fn queue_raw_response(&self, pdu: Pdu) {
        self.push(MockResponse::RawPdu(pdu));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.push(MockResponse::Timeout);
    }

    /// Queue an IO error.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.push(MockResponse::IoError(msg.into()));
    }

    fn push(&self, response: MockResponse) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<CommunityMessage> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.responses.len()
    }

    fn answer(&self, message: CommunityMessage) -> Result<Pdu> {
        let request_id = message.request_id();
        let response = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(message);
            inner.responses.pop_front()
        };

        match response {
            Some(MockResponse::Pdu(mut pdu)) => {
                pdu.request_id = request_id;
                Ok(pdu)
            }
            Some(MockResponse::RawPdu(pdu)) => Ok(pdu),
            Some(MockResponse::IoError(msg)) => Err(Error::Network {
                source: std::io::Error::other(msg),
            }
            .boxed()),
            Some(MockResponse::Timeout) | None => Err(Error::Timeout {
                request_id,
                retries: self.retries,
            }
            .boxed()),
        }
    }
}

impl Session for MockSession {
    fn retries(&self) -> u32 {
        self.retries
    }

    fn community(&self) -> &Bytes {
        &self.community
    }

    fn alloc_request_id(&self) -> i32 {
        self.ids.next_id()
    }

    fn send(&self, message: CommunityMessage) -> impl Future<Output = Result<Pdu>> + Send {
        let result = self.answer(message);
        async move { result }
    }
}

/// Builder for response PDUs queued on a [`MockSession`].
#[derive(Default)]
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a new response builder.
    ///
    /// The request ID defaults to 0; [`MockSession::queue_response`]
    /// overwrites it anyway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request ID (only meaningful with `queue_raw_response`).
    pub fn request_id(mut self, request_id: i32) -> Self {
        self.request_id = request_id;
        self
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status and 1-based error index.
    pub fn error(mut self, status: ErrorStatus, index: i32) -> Self {
        self.error_status = status.as_i32();
        self.error_index = index;
        self
    }

    /// Build the response PDU.
    pub fn build(self) -> Pdu {
        let mut pdu = Pdu::response(self.request_id, self.varbinds);
        pdu.error_status = self.error_status;
        pdu.error_index = self.error_index;
        pdu
    }
}
