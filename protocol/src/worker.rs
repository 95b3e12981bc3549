use futures_channel::mpsc::{UnboundedReceiver, unbounded};
use std::io;
use std::sync::mpsc::{Sender, channel};
use std::thread::{self, JoinHandle};

use crate::*;

/// Handle to a session running on its own thread.
///
/// Dropping the handle, or calling [`WorkerHandle::join`], stops the worker once queued requests are processed.
#[derive(Debug)]
pub struct WorkerHandle {
    requests: Sender<WorkerRequest>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn send(&self, request: WorkerRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| ProtocolError::Disconnected)
    }

    pub fn join(self) -> Result<()> {
        let Self { requests, thread } = self;
        drop(requests);
        thread.join().map_err(|_| ProtocolError::Disconnected)
    }
}

/// Starts a worker thread owning a [`Session`]. Its events arrive on the returned receiver in order.
pub fn spawn() -> io::Result<(WorkerHandle, UnboundedReceiver<WorkerEvent>)> {
    let (requests, inbox) = channel::<WorkerRequest>();
    let (events, outbox) = unbounded::<WorkerEvent>();

    let thread = thread::Builder::new()
        .name("sweepsync-worker".into())
        .spawn(move || {
            let mut session = Session::new(events);
            for request in inbox {
                session.handle(request);
            }
            log::debug!("Worker stopped");
        })?;

    Ok((WorkerHandle { requests, thread }, outbox))
}
