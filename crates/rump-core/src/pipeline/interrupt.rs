use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::PipelineError;

/// Translate an external interrupt into run cancellation.
///
/// Returns `Ok(())` if the run is canceled for another reason first (including
/// normal completion), `Err(Canceled)` if the interrupt fired.
pub(crate) async fn watch_interrupt<F>(
    interrupt: F,
    cancel: CancellationToken,
) -> Result<(), PipelineError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(()),
        _ = interrupt => {
            info!("interrupt received; cancelling transfer");
            cancel.cancel();
            Err(PipelineError::Canceled)
        }
    }
}
