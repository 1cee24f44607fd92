//! Async worker - runs in Tokio runtime and decodes off the owner thread

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::domain::abi::{CalldataDecoder, DecodeError};
use crate::infrastructure::runtime::bridge::{DecodeCommand, DecodeEvent};

/// Run the async worker loop until shutdown or until the bridge is dropped
pub(super) async fn run_decode_worker(
    decoder: Arc<dyn CalldataDecoder + Send + Sync>,
    cmd_rx: Receiver<DecodeCommand>,
    evt_tx: Sender<DecodeEvent>,
) {
    let mut poll_interval = interval(Duration::from_millis(5));

    loop {
        // Process commands (non-blocking)
        loop {
            match cmd_rx.try_recv() {
                Ok(DecodeCommand::Shutdown) | Err(TryRecvError::Disconnected) => return,
                Ok(DecodeCommand::Decode(request)) => {
                    let decoder = Arc::clone(&decoder);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let ticket = request.ticket;
                        let outcome = tokio::task::spawn_blocking(move || {
                            decoder.decode(&request.signature, &request.calldata)
                        })
                        .await
                        .unwrap_or_else(|err| {
                            Err(DecodeError::Abi(format!("decoder task failed: {}", err)))
                        });
                        let _ = evt_tx.send(DecodeEvent::Finished { ticket, outcome });
                    });
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        poll_interval.tick().await;
    }
}
