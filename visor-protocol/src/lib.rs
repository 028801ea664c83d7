//! Visor HUD wire protocol
//!
//! This crate defines what travels over the GATT link between the host and
//! the heads-up display. The device speaks a line-free ASCII command
//! language on the RxServer characteristic and answers with ASCII
//! notifications on TxServer.
//!
//! # Protocol Overview
//!
//! Every command is serialized as its text followed by one NUL byte and cut
//! into fragments that fit a single BLE write:
//! ```text
//! "savelayout 0x0a00012fff…\0"
//! ┌──────────────────────┬──────────────────────┬─────┐
//! │ fragment 0 (20 B)    │ fragment 1 (20 B)    │ …   │
//! └──────────────────────┴──────────────────────┴─────┘
//! ```
//!
//! Fragments of one command are written strictly in order, each one
//! acknowledged by the transport before the next is sent.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod fragment;
pub mod notification;
pub mod registration;
pub mod status;
pub mod uuids;

pub use command::{Command, CommandError, CommandText, LedState, MAX_COMMAND_LEN};
pub use fragment::{fragment_count, CommandData, Fragment, Fragments, FRAGMENT_SIZE};
pub use notification::{Notification, NotificationText};
pub use registration::LayoutRegistration;
pub use status::{GattClosedReason, WriteStatus};
