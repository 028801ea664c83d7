//! Events that move a session between states

use visor_protocol::GattClosedReason;

/// Link lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A connection attempt was submitted
    ConnectRequested,
    /// Service discovery succeeded
    ServicesDiscovered,
    /// Notifications are enabled on every subscribed characteristic
    NotificationsEnabled,
    /// The host asked to drop the link
    DisconnectRequested,
    /// The link is gone
    Closed(GattClosedReason),
}
