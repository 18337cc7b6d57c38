use super::BulkResponses;
use crate::error::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Completion handle for a spawned bulk operation.
///
/// Resolves once with the result map or the error that ended the
/// operation. If the task is torn down before finishing (runtime shutdown),
/// it resolves with [`Error::Abandoned`].
#[derive(Debug)]
#[must_use = "the result of a spawned bulk operation is only reported through its handle"]
pub struct BulkHandle {
    rx: oneshot::Receiver<Result<BulkResponses>>,
}

impl BulkHandle {
    pub(crate) fn new(rx: oneshot::Receiver<Result<BulkResponses>>) -> Self {
        Self { rx }
    }
}

impl Future for BulkHandle {
    type Output = Result<BulkResponses>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(Error::Abandoned.boxed()),
        })
    }
}
