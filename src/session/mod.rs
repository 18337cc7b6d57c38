//! Session abstraction consumed by bulk operations.
//!
//! A [`Session`] owns everything below the reconciler: BER encoding, the
//! socket, timeouts and timeout retries, and correlating a response with the
//! request ID it answers. The bulk controller only builds messages and
//! reconciles the PDUs that come back.

#[cfg(any(test, feature = "testing"))]
mod mock;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use crate::message::CommunityMessage;
use crate::pdu::Pdu;
use bytes::Bytes;
use std::future::Future;
use std::sync::atomic::{AtomicI32, Ordering};

/// Client-side session used to exchange GetBulk rounds with one agent.
///
/// # Clone Requirement
///
/// Spawned bulk operations own a clone of the session. Implementations are
/// expected to be cheap to clone (`Arc` inside).
pub trait Session: Send + Sync + Clone {
    /// Number of timeout retries the session applies per request.
    ///
    /// Bulk operations record this value but never act on it.
    fn retries(&self) -> u32;

    /// Read-only community string.
    fn community(&self) -> &Bytes;

    /// Allocate a request ID unique among this session's in-flight requests.
    fn alloc_request_id(&self) -> i32;

    /// Deliver `message` and resolve with the response PDU carrying its
    /// request ID.
    ///
    /// Errors are transport failures ([`Error::Timeout`](crate::Error::Timeout)
    /// after the session's own retries, [`Error::Network`](crate::Error::Network)).
    fn send(&self, message: CommunityMessage) -> impl Future<Output = Result<Pdu>> + Send;
}

/// Monotonic request ID source for [`Session`] implementations.
///
/// Starts from a clock-derived value so restarted processes do not reuse
/// recent IDs, wraps within the positive `i32` range and never yields 0.
#[derive(Debug)]
pub struct RequestIdAllocator {
    next: AtomicI32,
}

impl RequestIdAllocator {
    /// Create an allocator seeded from the system clock.
    pub fn new() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as i32)
            .unwrap_or(1);
        Self::starting_at(seed)
    }

    /// Create an allocator whose first ID is `first` (clamped into `1..=i32::MAX`).
    pub fn starting_at(first: i32) -> Self {
        Self {
            next: AtomicI32::new(first.wrapping_abs().max(1)),
        }
    }

    /// Allocate the next request ID.
    pub fn next_id(&self) -> i32 {
        let id = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                Some(if id == i32::MAX { 1 } else { id + 1 })
            })
            .unwrap_or(1);
        tracing::trace!(target: "snmp_bulk::session", { snmp.request_id = id }, "allocated request ID");
        id
    }
}

impl Default for RequestIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_sequential() {
        let ids = RequestIdAllocator::starting_at(10);
        assert_eq!(ids.next_id(), 10);
        assert_eq!(ids.next_id(), 11);
        assert_eq!(ids.next_id(), 12);
    }

    #[test]
    fn test_allocator_wraps_past_max() {
        let ids = RequestIdAllocator::starting_at(i32::MAX);
        assert_eq!(ids.next_id(), i32::MAX);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_allocator_never_zero_or_negative() {
        assert_eq!(RequestIdAllocator::starting_at(0).next_id(), 1);
        assert_eq!(RequestIdAllocator::starting_at(-5).next_id(), 5);
        assert_eq!(RequestIdAllocator::starting_at(i32::MIN).next_id(), 1);
        assert!(RequestIdAllocator::new().next_id() > 0);
    }
}
