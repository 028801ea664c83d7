//! The single logical session to the display
//!
//! Every connection attempt gets a fresh [`SessionId`]. Transport events
//! and queued operations carry the id they belong to, so anything left over
//! from a replaced session is recognized and ignored.

pub mod events;
pub mod machine;

pub use events::LinkEvent;
pub use machine::SessionState;

use crate::transport::DeviceHandle;

/// Identifies one connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionId(pub u32);

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    pub id: SessionId,
    pub device: DeviceHandle,
    state: SessionState,
}

impl Session {
    pub fn new(id: SessionId, device: DeviceHandle) -> Self {
        Self {
            id,
            device,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Apply an event, returning true if the state changed
    pub fn apply(&mut self, event: LinkEvent) -> bool {
        let next = self.state.transition(event);
        let changed = next != self.state;
        if changed {
            trace!("session {}: {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visor_protocol::GattClosedReason;

    #[test]
    fn test_apply_reports_changes() {
        let mut session = Session::new(SessionId(1), DeviceHandle::new([1; 6]));
        assert!(session.apply(LinkEvent::ConnectRequested));
        assert!(!session.apply(LinkEvent::ConnectRequested));
        assert!(session.apply(LinkEvent::Closed(GattClosedReason::Success)));
        assert!(!session.apply(LinkEvent::Closed(GattClosedReason::GattError)));
        assert_eq!(session.state().close_reason(), Some(GattClosedReason::Success));
    }
}
