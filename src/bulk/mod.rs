//! Multi-round GetBulk reconciliation.
//!
//! A logical bulk fetch may take several physical rounds. Each round sends
//! one GETBULK carrying every OID still pending, then reconciles the reply:
//!
//! - **No error**: the first `non_repeaters` bindings answer the first
//!   pending OIDs one-to-one. The remaining bindings are dealt round-robin
//!   over the OIDs left after that split, which is how an agent interleaves
//!   successive repetitions of each table column. The round then clears the
//!   pending set.
//! - **Error**: the agent's error index names one binding of the request.
//!   That OID is removed from the pending set, marked with the agent's
//!   status, and the shared error budget drops by one. The rest are resent.
//!
//! The operation finishes when nothing is pending or the budget reaches
//! zero. Anything still pending at that point is marked
//! [`EntryError::RetriesExhausted`]. Agent errors never fail the operation;
//! callers inspect the entries of [`BulkResponses`].
//!
//! # Truncated repetitions
//!
//! A successful round is treated as answering every pending OID, even when
//! the page stopped short of `max_repetitions` for some repeaters. Those
//! repeaters keep whatever bindings the page held (possibly none) and are
//! not requested again. Use a walk to follow a table to its end.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "testing")]
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> snmp_bulk::Result<()> {
//! use snmp_bulk::session::{MockSession, ResponseBuilder};
//! use snmp_bulk::{BulkOptions, GetBulk, Value, oid};
//!
//! let session = MockSession::new("public");
//! session.queue_response(
//!     ResponseBuilder::new()
//!         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(4200))
//!         .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1), Value::from("lo"))
//!         .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2), Value::from("eth0"))
//!         .build(),
//! );
//!
//! let responses = GetBulk::new(
//!     session,
//!     [oid!(1, 3, 6, 1, 2, 1, 1, 3), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)],
//!     BulkOptions::default().non_repeaters(1).max_repetitions(2),
//! )?
//! .run()
//! .await?;
//!
//! let if_descr = responses.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)).unwrap();
//! assert_eq!(if_descr.values().unwrap().len(), 2);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "testing"))]
//! # fn main() {}
//! ```

mod handle;
mod options;
mod result;

pub use handle::BulkHandle;
pub use options::BulkOptions;
pub use result::{Binding, BulkEntry, BulkResponses, EntryError, Payload};

use crate::error::{Error, MalformedKind, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{GetBulkPdu, Pdu};
use crate::session::Session;
use tokio::sync::oneshot;
use tracing::instrument;

/// Where a bulk operation is in its round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Ready to start the next round.
    Sending,
    /// A request is in flight.
    AwaitingResponse {
        /// Request ID the response must carry.
        request_id: i32,
    },
    /// Result map handed out; terminal.
    Done,
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundState::Sending => write!(f, "ready to send"),
            RoundState::AwaitingResponse { request_id } => {
                write!(f, "awaiting response to request {}", request_id)
            }
            RoundState::Done => write!(f, "done"),
        }
    }
}

/// What to do after a response has been reconciled.
#[derive(Debug)]
pub enum Progress {
    /// OIDs remain and budget is left: start another round.
    Resend,
    /// Operation finished with this result map.
    Complete(BulkResponses),
}

/// One logical GetBulk operation over a fixed set of OIDs.
///
/// Drive it with [`run`](Self::run), hand it to a task with
/// [`spawn`](Self::spawn), or step it manually with
/// [`start_round`](Self::start_round) and [`reconcile`](Self::reconcile).
pub struct GetBulk<S> {
    session: S,
    options: BulkOptions,
    pending: Vec<Oid>,
    responses: BulkResponses,
    error_retries: u32,
    timeout_retries: u32,
    state: RoundState,
    rounds: u32,
}

impl<S: Session> GetBulk<S> {
    /// Create an operation for `oids`, in request order.
    ///
    /// Fails with [`Error::Config`] if `options` cannot describe a valid
    /// GETBULK (v1, v3, zero repetitions, counts beyond INTEGER range).
    pub fn new(
        session: S,
        oids: impl IntoIterator<Item = Oid>,
        options: BulkOptions,
    ) -> Result<Self> {
        options.validate()?;

        let pending: Vec<Oid> = oids.into_iter().collect();
        let error_retries = options
            .error_retries
            .unwrap_or_else(|| u32::try_from(pending.len()).unwrap_or(u32::MAX));
        let timeout_retries = session.retries();

        tracing::debug!(target: "snmp_bulk::bulk", {
            snmp.oid_count = pending.len(),
            snmp.non_repeaters = options.non_repeaters,
            snmp.max_repetitions = options.max_repetitions,
            snmp.error_retries = error_retries,
        }, "bulk operation created");

        Ok(Self {
            session,
            options,
            pending,
            responses: BulkResponses::new(),
            error_retries,
            timeout_retries,
            state: RoundState::Sending,
            rounds: 0,
        })
    }

    /// OIDs still awaiting an answer, in request order.
    pub fn pending(&self) -> &[Oid] {
        &self.pending
    }

    /// Remaining shared error budget.
    pub fn error_retries(&self) -> u32 {
        self.error_retries
    }

    /// Timeout retry hint copied from the session at construction.
    pub fn timeout_retries(&self) -> u32 {
        self.timeout_retries
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn options(&self) -> &BulkOptions {
        &self.options
    }

    /// Number of rounds started so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Build the request for the next round and enter `AwaitingResponse`.
    pub fn start_round(&mut self) -> Result<CommunityMessage> {
        if self.state != RoundState::Sending {
            return Err(Error::InvalidState {
                state: self.state,
                action: "start a round",
            }
            .boxed());
        }
        if self.pending.is_empty() {
            return Err(Error::config("no OIDs left to request"));
        }

        let request_id = self.session.alloc_request_id();
        // Both counts were range-checked by BulkOptions::validate.
        let pdu = GetBulkPdu::new(
            request_id,
            self.options.non_repeaters as i32,
            self.options.max_repetitions as i32,
            &self.pending,
        );
        let message = CommunityMessage::new(
            self.options.version,
            self.session.community().clone(),
            pdu,
        );

        self.rounds += 1;
        self.state = RoundState::AwaitingResponse { request_id };
        tracing::debug!(target: "snmp_bulk::bulk", {
            snmp.request_id = request_id,
            snmp.round = self.rounds,
            snmp.pending = self.pending.len(),
        }, "starting GETBULK round");

        Ok(message)
    }

    /// Reconcile the response to the round in flight.
    ///
    /// Malformed responses leave the operation untouched and still awaiting.
    pub fn reconcile(&mut self, response: Pdu) -> Result<Progress> {
        let RoundState::AwaitingResponse { request_id } = self.state else {
            return Err(Error::InvalidState {
                state: self.state,
                action: "reconcile a response",
            }
            .boxed());
        };

        if response.request_id != request_id {
            return Err(Error::malformed(
                request_id,
                MalformedKind::RequestIdMismatch {
                    expected: request_id,
                    actual: response.request_id,
                },
            ));
        }

        if response.is_error() {
            self.isolate_error(request_id, &response)?;
        } else {
            self.demultiplex(request_id, response)?;
        }

        if self.pending.is_empty() || self.error_retries == 0 {
            Ok(Progress::Complete(self.finalize()))
        } else {
            self.state = RoundState::Sending;
            Ok(Progress::Resend)
        }
    }

    /// Run rounds against the session until the operation completes.
    ///
    /// Only transport failures from the session and malformed responses
    /// are errors; per-OID agent errors end up in the returned map.
    #[instrument(
        level = "debug",
        skip(self),
        fields(
            snmp.oid_count = self.pending.len(),
            snmp.non_repeaters = self.options.non_repeaters,
            snmp.max_repetitions = self.options.max_repetitions,
        )
    )]
    pub async fn run(mut self) -> Result<BulkResponses> {
        if self.state == RoundState::Sending && self.pending.is_empty() {
            return Ok(self.finalize());
        }

        loop {
            let message = self.start_round()?;
            let response = self.session.send(message).await?;
            match self.reconcile(response)? {
                Progress::Resend => continue,
                Progress::Complete(responses) => return Ok(responses),
            }
        }
    }

    /// Distribute a successful response over the pending OIDs.
    fn demultiplex(&mut self, request_id: i32, response: Pdu) -> Result<()> {
        let non_repeaters = (self.options.non_repeaters as usize).min(self.pending.len());
        let total = response.varbinds.len();
        if total < non_repeaters {
            return Err(Error::malformed(
                request_id,
                MalformedKind::MissingNonRepeaters {
                    expected: non_repeaters,
                    actual: total,
                },
            ));
        }

        let repeaters = self.pending.len() - non_repeaters;
        let repetitions = total - non_repeaters;
        if repetitions > 0 && repeaters == 0 {
            return Err(Error::malformed(
                request_id,
                MalformedKind::UnassignedRepeaters { count: repetitions },
            ));
        }

        let mut varbinds = response.varbinds.into_iter();
        for (requested, vb) in self.pending.drain(..non_repeaters).zip(varbinds.by_ref()) {
            self.responses
                .set_single(&requested, Binding::raw(vb.oid, vb.value));
        }

        // Every repeater gets an entry, even if the page never reaches it.
        for requested in &self.pending {
            self.responses.values_entry(requested);
        }
        for (offset, vb) in varbinds.enumerate() {
            let requested = &self.pending[offset % repeaters];
            tracing::trace!(target: "snmp_bulk::bulk", {
                snmp.index = non_repeaters + offset,
                snmp.requested = %requested,
                snmp.returned = %vb.oid,
            }, "assigned repetition");
            self.responses
                .append(requested, Binding::raw(vb.oid, vb.value));
        }

        tracing::debug!(target: "snmp_bulk::bulk", {
            snmp.request_id = request_id,
            snmp.non_repeaters = non_repeaters,
            snmp.repeaters = repeaters,
            snmp.varbind_count = total,
        }, "bulk round answered");
        self.pending.clear();
        Ok(())
    }

    /// Pull the OID named by the error index out of the pending set.
    fn isolate_error(&mut self, request_id: i32, response: &Pdu) -> Result<()> {
        let index = response.error_index;
        let position = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .filter(|&p| p < self.pending.len())
            .ok_or_else(|| {
                Error::malformed(
                    request_id,
                    MalformedKind::ErrorIndexOutOfRange {
                        index,
                        pending: self.pending.len(),
                    },
                )
            })?;

        let status = response.error_status_enum();
        let oid = self.pending.remove(position);
        self.responses.set_error(&oid, EntryError::Agent(status));
        self.error_retries = self.error_retries.saturating_sub(1);

        tracing::debug!(target: "snmp_bulk::bulk", {
            snmp.request_id = request_id,
            snmp.error_status = %status,
            snmp.error_index = index,
            snmp.oid = %oid,
            snmp.error_retries = self.error_retries,
        }, "isolated failing OID");
        Ok(())
    }

    fn finalize(&mut self) -> BulkResponses {
        if !self.pending.is_empty() {
            tracing::debug!(target: "snmp_bulk::bulk", { snmp.pending = self.pending.len() }, "error budget exhausted");
        }
        for oid in self.pending.drain(..) {
            self.responses.set_error(&oid, EntryError::RetriesExhausted);
        }

        let mut responses = std::mem::take(&mut self.responses);
        if !self.options.return_raw {
            responses.normalize();
        }

        self.state = RoundState::Done;
        tracing::debug!(target: "snmp_bulk::bulk", {
            snmp.rounds = self.rounds,
            snmp.entries = responses.len(),
            snmp.errors = responses.error_count(),
        }, "bulk operation complete");
        responses
    }
}

impl<S: Session + 'static> GetBulk<S> {
    /// Run the operation on a Tokio task.
    ///
    /// The returned handle resolves exactly once. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(self) -> BulkHandle {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = self.run().await;
            if tx.send(result).is_err() {
                tracing::debug!(target: "snmp_bulk::bulk", "bulk handle dropped before completion");
            }
        });
        BulkHandle::new(rx)
    }

    /// Create an operation and immediately start it on a Tokio task.
    pub fn start(
        session: S,
        oids: impl IntoIterator<Item = Oid>,
        options: BulkOptions,
    ) -> Result<BulkHandle> {
        Ok(Self::new(session, oids, options)?.spawn())
    }
}
