use tokio::select;
use tokio_util::sync::CancellationToken;

/// Turns process signals into a cancellation. Detached processes on
/// Windows can't receive ctrl-c, so stopping the background daemon there
/// goes through the process-kill path instead.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
