//! Messages and plumbing that carry board changes from the context owning a board to its consumers.
//!
//! [`Session`] wraps successive boards of one game session and turns their changes into [`WorkerEvent`]s,
//! [`worker::spawn`] runs a session on a dedicated thread, and [`Mirror`] rebuilds the board on the consumer side.

pub use error::*;
pub use message::*;
pub use mirror::*;
pub use session::*;
pub use sink::*;

mod error;
mod message;
mod mirror;
mod session;
mod sink;
pub mod worker;
