#![no_std]

//! Minesweeper board engine with incremental change notification.
//!
//! A [`Board`] owns the grid and the play mode state machine. Every command it accepts records the cells it
//! touched into a [`PendingChange`] and hands it to the registered [`Subscriber`], splitting large flood fills
//! into several bounded changes. A consumer keeps a mirror in sync by applying [`Board::full_state`] once and
//! every delivered change afterwards, in order.

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use change::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod change;
mod config;
mod error;
mod generator;
mod types;
