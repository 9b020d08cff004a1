use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use super::SyncError;

/// Resolves once the server has answered a mutation.
///
/// The local change is already visible when this is handed out. Awaiting it
/// is optional; dropping it does not cancel the request.
#[must_use = "dropping a Completion discards the server outcome, not the request"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, SyncError>>,
}

impl<T> Completion<T> {
    pub(crate) fn channel() -> (oneshot::Sender<Result<T, SyncError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// An already-settled completion, for outcomes decided before any
    /// request is sent.
    pub(crate) fn ready(result: Result<T, SyncError>) -> Self {
        let (tx, completion) = Self::channel();
        let _ = tx.send(result);
        completion
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, SyncError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // The request task went away without answering (runtime shutdown).
            Poll::Ready(Err(_)) => Poll::Ready(Err(SyncError::NetworkUnavailable)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_resolves_immediately() {
        let completion: Completion<u32> = Completion::ready(Err(SyncError::NotFound));
        assert_eq!(completion.await, Err(SyncError::NotFound));
    }

    #[tokio::test]
    async fn test_channel_delivers_result() {
        let (tx, completion) = Completion::channel();
        tokio::spawn(async move {
            let _ = tx.send(Ok("done"));
        });
        assert_eq!(completion.await, Ok("done"));
    }

    #[tokio::test]
    async fn test_dropped_sender_maps_to_network_unavailable() {
        let (tx, completion) = Completion::<()>::channel();
        drop(tx);
        assert_eq!(completion.await, Err(SyncError::NetworkUnavailable));
    }
}
