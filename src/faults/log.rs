use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::fault::Fault;

/// Base listener that prints faults to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
pub struct LogWriter;

impl LogWriter {
    /// Spawns a background task printing every fault from `rx`.
    ///
    /// Runs until the fault channel closes; lagged receivers skip ahead.
    pub fn spawn_listener(mut rx: broadcast::Receiver<Fault>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(f) => {
                        println!(
                            "[{}] subsystem={} tag={} detail={}",
                            f.kind.as_label(),
                            f.subsystem,
                            f.tag,
                            f.detail
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        })
    }
}
