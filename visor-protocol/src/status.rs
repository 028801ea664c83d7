//! GATT status codes and the outcomes derived from them

/// Operation completed successfully
pub const GATT_SUCCESS: u16 = 0x00;
/// Link supervision timeout
pub const GATT_CONN_TIMEOUT: u16 = 0x08;
/// Remote device terminated the connection
pub const GATT_CONN_TERMINATE_PEER_USER: u16 = 0x13;
/// Generic stack error
pub const GATT_ERROR: u16 = 0x85;
/// Request could not be submitted to the stack
pub const GATT_FAILURE: u16 = 0x101;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GattClosedReason {
    /// Clean close, requested locally
    Success,
    /// The display dropped the link
    DeviceDisconnect,
    /// Supervision timeout (out of range, powered off)
    ConnectionTimeout,
    /// Stack-level failure
    GattError,
    /// Any other status, carried verbatim
    Unknown(u16),
}

impl GattClosedReason {
    /// Map a transport status code to a close reason
    pub fn from_status(status: u16) -> Self {
        match status {
            GATT_SUCCESS => GattClosedReason::Success,
            GATT_CONN_TERMINATE_PEER_USER => GattClosedReason::DeviceDisconnect,
            GATT_CONN_TIMEOUT => GattClosedReason::ConnectionTimeout,
            GATT_ERROR => GattClosedReason::GattError,
            other => GattClosedReason::Unknown(other),
        }
    }

    /// Returns true if the session ended without a fault
    pub fn is_clean(&self) -> bool {
        matches!(self, GattClosedReason::Success)
    }
}

impl core::fmt::Display for GattClosedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Success => write!(f, "closed"),
            Self::DeviceDisconnect => write!(f, "device disconnected"),
            Self::ConnectionTimeout => write!(f, "connection timeout"),
            Self::GattError => write!(f, "GATT error"),
            Self::Unknown(code) => write!(f, "unknown status 0x{:04x}", code),
        }
    }
}

/// Outcome of a single characteristic write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteStatus {
    /// Acknowledged by the transport
    Success,
    /// Rejected with a non-success status
    Failed(u16),
    /// The session was torn down while the write was pending
    Aborted,
}

impl WriteStatus {
    /// Map a write-completion status code
    pub fn from_status(status: u16) -> Self {
        if status == GATT_SUCCESS {
            WriteStatus::Success
        } else {
            WriteStatus::Failed(status)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WriteStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_close_reasons() {
        assert_eq!(GattClosedReason::from_status(0x00), GattClosedReason::Success);
        assert_eq!(
            GattClosedReason::from_status(0x13),
            GattClosedReason::DeviceDisconnect
        );
        assert_eq!(
            GattClosedReason::from_status(0x08),
            GattClosedReason::ConnectionTimeout
        );
        assert_eq!(GattClosedReason::from_status(0x85), GattClosedReason::GattError);
    }

    #[test]
    fn test_unknown_close_reason_keeps_code() {
        assert_eq!(
            GattClosedReason::from_status(0x3E),
            GattClosedReason::Unknown(0x3E)
        );
        assert_eq!(
            GattClosedReason::from_status(0x101),
            GattClosedReason::Unknown(0x101)
        );
    }

    #[test]
    fn test_write_status() {
        assert!(WriteStatus::from_status(GATT_SUCCESS).is_success());
        assert_eq!(WriteStatus::from_status(0x85), WriteStatus::Failed(0x85));
        assert!(!WriteStatus::Aborted.is_success());
    }

    #[test]
    fn test_only_success_is_clean() {
        assert!(GattClosedReason::Success.is_clean());
        assert!(!GattClosedReason::DeviceDisconnect.is_clean());
        assert!(!GattClosedReason::Unknown(0).is_clean());
    }
}
