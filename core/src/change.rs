use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::mem;
use serde::{Deserialize, Serialize};

use crate::*;

/// A cell whose visible state changed, with its state right after the change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridChange {
    pub x: Coord,
    pub y: Coord,
    pub cell: CellSnapshot,
}

impl GridChange {
    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }
}

/// Effects of an operation that have not been delivered yet.
///
/// Scalar fields are only present when they changed. Grid changes are in the order the cells were mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<CellCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_reveal: Option<CellCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<PlayMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grid_changes: Vec<GridChange>,
}

impl PendingChange {
    pub fn is_empty(&self) -> bool {
        self.flags.is_none()
            && self.to_reveal.is_none()
            && self.play_mode.is_none()
            && self.grid_changes.is_empty()
    }
}

/// Receiver of flushed changes.
pub trait Subscriber {
    fn notify(&mut self, change: PendingChange);
}

impl<F> Subscriber for F
where
    F: FnMut(PendingChange),
{
    fn notify(&mut self, change: PendingChange) {
        self(change)
    }
}

/// Accumulates changes for the running operation and hands them to the single subscriber.
#[derive(Default)]
pub struct ChangeNotifier {
    pending: PendingChange,
    policy: FlushPolicy,
    subscriber: Option<Box<dyn Subscriber>>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("pending", &self.pending)
            .field("policy", &self.policy)
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new(policy: FlushPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Replaces the current subscriber, returning the previous one.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) -> Option<Box<dyn Subscriber>> {
        self.subscriber.replace(subscriber)
    }

    pub fn unsubscribe(&mut self) -> Option<Box<dyn Subscriber>> {
        self.subscriber.take()
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }

    /// Fails unless a subscriber is registered. Commands call this before their first mutation.
    pub fn ensure_subscriber(&self) -> Result<()> {
        if self.subscriber.is_some() {
            Ok(())
        } else {
            Err(GameError::NoSubscriber)
        }
    }

    pub fn pending(&self) -> &PendingChange {
        &self.pending
    }

    pub fn set_flags(&mut self, flags: CellCount) {
        self.pending.flags = Some(flags);
    }

    pub fn set_to_reveal(&mut self, to_reveal: CellCount) {
        self.pending.to_reveal = Some(to_reveal);
    }

    pub fn set_play_mode(&mut self, play_mode: PlayMode) {
        self.pending.play_mode = Some(play_mode);
    }

    /// Records a changed cell, flushing right away once the threshold is reached.
    pub fn push(&mut self, coords: Coord2, cell: CellSnapshot) -> Result<()> {
        let (x, y) = coords;
        self.pending.grid_changes.push(GridChange { x, y, cell });
        if self.pending.grid_changes.len() >= self.policy.threshold() {
            log::trace!(
                "Flushing {} grid changes mid-operation",
                self.pending.grid_changes.len()
            );
            self.flush()?;
        }
        Ok(())
    }

    /// Delivers the accumulated change if there is one.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let Some(subscriber) = self.subscriber.as_mut() else {
            return Err(GameError::NoSubscriber);
        };
        let change = mem::take(&mut self.pending);
        log::trace!(
            "Delivering change with {} grid changes",
            change.grid_changes.len()
        );
        subscriber.notify(change);
        Ok(())
    }
}
