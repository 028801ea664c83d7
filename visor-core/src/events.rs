//! Events reported to the host
//!
//! All results leave the engine through one channel, read by one consumer
//! (see [`Hud::next_event`](crate::Hud::next_event)). Whatever state the
//! host's handlers touch is therefore only ever mutated from that consumer.

use visor_protocol::command::CommandError;
use visor_protocol::{GattClosedReason, Notification};

use crate::operation::OperationKind;
use crate::transport::DeviceHandle;

/// Why an operation did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationFailure {
    /// A fragment write was rejected; the rest of the operation was skipped
    Write { status: u16, fragment: usize },
    /// The operation could not be turned into commands
    Encode(CommandError),
}

/// Engine output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HudEvent {
    /// The session is ready for operations
    Established(DeviceHandle),
    /// The session ended; reported once per session
    Terminated {
        device: DeviceHandle,
        reason: GattClosedReason,
    },
    OperationSucceeded(OperationKind),
    OperationFailed {
        kind: OperationKind,
        failure: OperationFailure,
    },
    /// Out-of-band message from the display
    Notification(Notification),
    /// A scan reported a device not seen before
    DeviceFound(DeviceHandle),
}

/// Callback-style consumer of [`HudEvent`]s
///
/// Every method defaults to doing nothing.
pub trait HudListener {
    fn established(&mut self, _device: DeviceHandle) {}

    fn terminated(&mut self, _device: DeviceHandle, _reason: GattClosedReason) {}

    fn success(&mut self, _kind: OperationKind) {}

    fn error(&mut self, _kind: OperationKind, _failure: OperationFailure) {}

    fn notification(&mut self, _notification: &Notification) {}

    fn device_found(&mut self, _device: DeviceHandle) {}
}

impl HudEvent {
    /// Session start and end, which the host must never miss
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, HudEvent::Established(_) | HudEvent::Terminated { .. })
    }

    /// Hand this event to the matching listener callback
    pub fn dispatch<L: HudListener + ?Sized>(&self, listener: &mut L) {
        match self {
            HudEvent::Established(device) => listener.established(*device),
            HudEvent::Terminated { device, reason } => listener.terminated(*device, *reason),
            HudEvent::OperationSucceeded(kind) => listener.success(*kind),
            HudEvent::OperationFailed { kind, failure } => listener.error(*kind, *failure),
            HudEvent::Notification(notification) => listener.notification(notification),
            HudEvent::DeviceFound(device) => listener.device_found(*device),
        }
    }
}
