//! Session state machine
//!
//! A session only moves forward. `Closed` is terminal and can be entered
//! once, from any other state.

use visor_protocol::GattClosedReason;

use super::events::LinkEvent;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Created, nothing submitted yet
    Idle,
    /// Waiting for the link and service discovery
    Connecting,
    /// Services known, notifications being enabled
    ServicesDiscovered,
    /// Ready for operations
    Established,
    /// Local disconnect submitted, waiting for the link to drop
    Disconnecting,
    /// Torn down
    Closed(GattClosedReason),
}

impl SessionState {
    pub fn is_established(&self) -> bool {
        matches!(self, SessionState::Established)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed(_))
    }

    /// Why the session ended, if it has
    pub fn close_reason(&self) -> Option<GattClosedReason> {
        match self {
            SessionState::Closed(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use SessionState::*;

        match (self, event) {
            (Idle, LinkEvent::ConnectRequested) => Connecting,
            (Connecting, LinkEvent::ServicesDiscovered) => ServicesDiscovered,
            (ServicesDiscovered, LinkEvent::NotificationsEnabled) => Established,
            (Connecting | ServicesDiscovered | Established, LinkEvent::DisconnectRequested) => {
                Disconnecting
            }

            // Closing is possible from anywhere but only once
            (Closed(_), _) => self,
            (_, LinkEvent::Closed(reason)) => Closed(reason),

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn established() -> SessionState {
        SessionState::Idle
            .transition(LinkEvent::ConnectRequested)
            .transition(LinkEvent::ServicesDiscovered)
            .transition(LinkEvent::NotificationsEnabled)
    }

    #[test]
    fn test_happy_path() {
        let state = SessionState::Idle.transition(LinkEvent::ConnectRequested);
        assert_eq!(state, SessionState::Connecting);
        let state = state.transition(LinkEvent::ServicesDiscovered);
        assert_eq!(state, SessionState::ServicesDiscovered);
        let state = state.transition(LinkEvent::NotificationsEnabled);
        assert!(state.is_established());
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        assert_eq!(
            SessionState::Idle.transition(LinkEvent::NotificationsEnabled),
            SessionState::Idle
        );
        assert_eq!(
            SessionState::Connecting.transition(LinkEvent::NotificationsEnabled),
            SessionState::Connecting
        );
        assert!(established()
            .transition(LinkEvent::ServicesDiscovered)
            .is_established());
    }

    #[test]
    fn test_close_from_any_state() {
        let states = [
            SessionState::Idle,
            SessionState::Connecting,
            SessionState::ServicesDiscovered,
            established(),
        ];
        for state in states {
            let next = state.transition(LinkEvent::Closed(GattClosedReason::ConnectionTimeout));
            assert_eq!(next.close_reason(), Some(GattClosedReason::ConnectionTimeout));
        }
    }

    #[test]
    fn test_disconnect_request() {
        let state = established().transition(LinkEvent::DisconnectRequested);
        assert_eq!(state, SessionState::Disconnecting);
        assert!(!state.is_established());
        assert!(!state.is_closed());

        // No way back to Established
        assert_eq!(
            state.transition(LinkEvent::NotificationsEnabled),
            SessionState::Disconnecting
        );
        assert_eq!(
            state.transition(LinkEvent::Closed(GattClosedReason::Success)),
            SessionState::Closed(GattClosedReason::Success)
        );
        assert_eq!(
            SessionState::Idle.transition(LinkEvent::DisconnectRequested),
            SessionState::Idle
        );
    }

    #[test]
    fn test_closed_is_terminal() {
        let closed = established().transition(LinkEvent::Closed(GattClosedReason::DeviceDisconnect));
        let again = closed.transition(LinkEvent::Closed(GattClosedReason::Success));
        assert_eq!(again, closed);
        assert_eq!(closed.transition(LinkEvent::ConnectRequested), closed);
    }

    #[test]
    fn test_status_mapping_reaches_state() {
        let state = established().transition(LinkEvent::Closed(GattClosedReason::from_status(0x13)));
        assert_eq!(state, SessionState::Closed(GattClosedReason::DeviceDisconnect));

        let state = established().transition(LinkEvent::Closed(GattClosedReason::from_status(0x3e)));
        assert_eq!(state, SessionState::Closed(GattClosedReason::Unknown(0x3e)));
    }
}
