//! Protocol engine for the Visor HUD
//!
//! This crate drives the display over a single GATT session:
//!
//! - Platform capability traits (GATT transport, scanner)
//! - Session state machine and the single in-flight write slot
//! - Operations and their expansion into text commands
//! - Loading-mode gate for deferred screen uploads
//! - Bitmap inventory fed by device notifications
//! - The [`Hud`] context tying them together, with its pipeline worker
//! - Configuration types
//!
//! The engine is executor-agnostic: it uses `embassy-sync` primitives and
//! `embassy-time` timers, and the host decides where [`Hud::run`] runs.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible in every module
#[macro_use]
mod fmt;

pub mod config;
pub mod events;
pub mod gate;
pub mod hud;
pub mod inventory;
pub mod operation;
pub mod session;
pub mod transport;
pub mod write_slot;

pub use config::{ConfigError, HudConfig, LoadingMode};
pub use events::{HudEvent, HudListener, OperationFailure};
pub use hud::{EnqueueError, Hud};
pub use operation::{Notify, Operation, OperationKind};
pub use session::{SessionId, SessionState};
pub use transport::{
    BondState, DeviceHandle, GattTransport, Scanner, TransportError, TransportEvent,
};

#[cfg(feature = "std")]
pub use config::parse_config;
