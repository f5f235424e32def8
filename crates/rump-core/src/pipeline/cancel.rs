use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;

/// Await `fut` unless `cancel` fires first.
///
/// Cancellation is polled first, so an already-fired token wins over a ready future.
pub(crate) async fn cancellable<F>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, PipelineError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Canceled),
        out = fut => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_output_when_not_canceled() {
        let cancel = CancellationToken::new();
        let out = cancellable(&cancel, async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn fired_token_wins_over_ready_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let res = cancellable(&cancel, async { 7 }).await;
        assert!(matches!(res, Err(PipelineError::Canceled)));
    }

    #[tokio::test]
    async fn interrupts_pending_future() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move { trigger.cancel() });

        let res = cancellable(&cancel, std::future::pending::<()>()).await;
        assert!(res.is_err());
    }
}
