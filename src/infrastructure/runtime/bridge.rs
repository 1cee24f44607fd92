//! Runtime bridge - connects the session owner thread with a Tokio runtime
//!
//! Decoding large calldata can take a while; the bridge runs the decoder on a
//! background runtime while the owning thread keeps handling input. Results
//! come back tagged with the ticket of the cycle that requested them, and the
//! store drops any result that is no longer the latest.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tokio::runtime::Builder;

use crate::domain::abi::{CalldataDecoder, DecodeError, DecodedCalldata};
use crate::domain::location::UrlSync;
use crate::infrastructure::runtime::worker::run_decode_worker;
use crate::store::{DecodeRequest, DecodeTicket, SessionStore};

/// Commands sent to the async worker
#[derive(Debug, Clone)]
pub(super) enum DecodeCommand {
    /// Decode the captured inputs
    Decode(DecodeRequest),
    /// Shutdown the worker
    Shutdown,
}

/// Events sent back from the async worker
#[derive(Debug, Clone)]
pub enum DecodeEvent {
    /// A decode cycle finished
    Finished {
        ticket: DecodeTicket,
        outcome: Result<DecodedCalldata, DecodeError>,
    },
}

/// Bridge between the session owner and the background decoder
pub struct DecodeBridge {
    cmd_tx: Sender<DecodeCommand>,
    evt_rx: Receiver<DecodeEvent>,
}

impl DecodeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new<D>(decoder: D) -> Result<Self>
    where
        D: CalldataDecoder + Send + Sync + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<DecodeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<DecodeEvent>();

        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .context("Failed to create Tokio runtime")?;
        let decoder: Arc<dyn CalldataDecoder + Send + Sync> = Arc::new(decoder);

        thread::Builder::new()
            .name("decode-worker".to_string())
            .spawn(move || {
                rt.block_on(run_decode_worker(decoder, cmd_rx, evt_tx));
            })
            .context("Failed to spawn decode worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    fn send(&self, cmd: DecodeCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Start a decode cycle on `store` and hand it to the worker
    pub fn submit<D, U>(&self, store: &mut SessionStore<D, U>) -> Result<DecodeTicket>
    where
        D: CalldataDecoder,
        U: UrlSync,
    {
        let request = store.begin_decode();
        let ticket = request.ticket;
        self.send(DecodeCommand::Decode(request))?;
        Ok(ticket)
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<DecodeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Block until the next event arrives
    pub fn recv(&self) -> Result<DecodeEvent> {
        self.evt_rx
            .recv()
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Apply finished cycles to `store`; returns how many were accepted
    pub fn apply_events<D, U>(&self, store: &mut SessionStore<D, U>, events: Vec<DecodeEvent>) -> usize
    where
        D: CalldataDecoder,
        U: UrlSync,
    {
        let mut accepted = 0;
        for DecodeEvent::Finished { ticket, outcome } in events {
            if store.finish_decode(ticket, outcome) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Wait for the store's in-flight cycle to complete
    pub fn wait<D, U>(&self, store: &mut SessionStore<D, U>) -> Result<()>
    where
        D: CalldataDecoder,
        U: UrlSync,
    {
        while store.is_decoding() {
            let event = self.recv()?;
            self.apply_events(store, vec![event]);
        }
        Ok(())
    }
}

impl Drop for DecodeBridge {
    fn drop(&mut self) {
        // Try to send shutdown command
        let _ = self.cmd_tx.send(DecodeCommand::Shutdown);
    }
}
