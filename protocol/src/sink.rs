use futures_channel::mpsc::UnboundedSender;
use std::sync::mpsc::Sender;

use crate::WorkerEvent;

/// Outgoing side of the channel between the board's context and its consumer.
///
/// Delivery must preserve order. A consumer that went away is not an engine error, events are dropped.
pub trait EventSink: Clone + 'static {
    fn send(&self, event: WorkerEvent);
}

impl EventSink for UnboundedSender<WorkerEvent> {
    fn send(&self, event: WorkerEvent) {
        if self.unbounded_send(event).is_err() {
            log::warn!("Consumer disconnected, dropping event");
        }
    }
}

impl EventSink for Sender<WorkerEvent> {
    fn send(&self, event: WorkerEvent) {
        if Sender::send(self, event).is_err() {
            log::warn!("Consumer disconnected, dropping event");
        }
    }
}
