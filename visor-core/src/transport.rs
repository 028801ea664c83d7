//! Platform capability traits
//!
//! The engine never talks to a BLE stack directly. The host provides a
//! [`GattTransport`] per connection and a [`Scanner`], and feeds stack
//! callbacks back in as [`TransportEvent`]s through
//! [`Hud::handle_transport_event`](crate::Hud::handle_transport_event).
//!
//! Transport methods only *submit* requests. Their outcome arrives later as
//! an event, tagged with the session the request belonged to.

use heapless::Vec;
use uuid::Uuid;
use visor_protocol::notification::MAX_NOTIFICATION_LEN;

/// Errors returned when a request cannot be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No link to the device
    NotConnected,
    /// The stack has another request outstanding
    Busy,
    /// The stack refused the request
    Rejected,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Busy => write!(f, "transport busy"),
            Self::Rejected => write!(f, "request rejected by the stack"),
        }
    }
}

/// Pairing state of the remote device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BondState {
    None,
    Bonding,
    Bonded,
}

/// Longest advertised name kept (a legacy advertising payload holds 29)
pub const MAX_DEVICE_NAME_LEN: usize = 29;

/// Advertised device name, cut at a character boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceName {
    bytes: [u8; MAX_DEVICE_NAME_LEN],
    len: u8,
}

impl DeviceName {
    pub fn new(name: &str) -> Self {
        let mut len = name.len().min(MAX_DEVICE_NAME_LEN);
        while !name.is_char_boundary(len) {
            len -= 1;
        }
        let mut bytes = [0; MAX_DEVICE_NAME_LEN];
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }
}

/// A remote device: its address and, when advertised, its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceHandle {
    pub address: [u8; 6],
    pub name: Option<DeviceName>,
}

impl DeviceHandle {
    pub const fn new(address: [u8; 6]) -> Self {
        Self {
            address,
            name: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(DeviceName::new(name));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(DeviceName::as_str)
    }

    /// True if both handles address the same device, whatever their names
    pub fn same_device(&self, other: &DeviceHandle) -> bool {
        self.address == other.address
    }
}

impl core::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d, e, g] = self.address;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// A GATT client bound to one remote device
pub trait GattTransport {
    /// Start connecting; completion arrives as
    /// [`TransportEvent::ConnectionStateChanged`]
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Current pairing state of the remote device
    fn bond_state(&self) -> BondState;

    /// Start service discovery; completion arrives as
    /// [`TransportEvent::ServicesDiscovered`]
    fn discover_services(&mut self) -> Result<(), TransportError>;

    /// Enable or disable notifications on a characteristic
    fn set_notify(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
        enabled: bool,
    ) -> Result<(), TransportError>;

    /// Submit one characteristic write; completion arrives as
    /// [`TransportEvent::CharacteristicWritten`]
    fn write_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
        value: &[u8],
    ) -> Result<(), TransportError>;

    /// Drop the link
    fn disconnect(&mut self) -> Result<(), TransportError>;
}

/// Device discovery
///
/// Filtering is the scanner's business; matching devices are reported with
/// [`Hud::report_candidates`](crate::Hud::report_candidates).
pub trait Scanner {
    fn start_scan(&mut self) -> Result<(), TransportError>;

    fn stop_scan(&mut self);
}

/// Characteristic value carried by a change event
pub type CharacteristicValue = Vec<u8, MAX_NOTIFICATION_LEN>;

/// Stack callbacks delivered to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link came up or went down
    ConnectionStateChanged { status: u16, connected: bool },
    /// Service discovery finished
    ServicesDiscovered { status: u16 },
    /// The pending characteristic write finished
    CharacteristicWritten { status: u16 },
    /// A subscribed characteristic changed
    CharacteristicChanged {
        characteristic: Uuid,
        value: CharacteristicValue,
    },
}

impl TransportEvent {
    /// Build a change event, truncating oversized values
    pub fn changed(characteristic: Uuid, value: &[u8]) -> Self {
        let len = value.len().min(MAX_NOTIFICATION_LEN);
        let mut buf = CharacteristicValue::new();
        let _ = buf.extend_from_slice(&value[..len]);
        TransportEvent::CharacteristicChanged {
            characteristic,
            value: buf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visor_protocol::uuids::TX_SERVER;

    #[test]
    fn test_device_display() {
        let device = DeviceHandle::new([0xC0, 0x1D, 0x00, 0x0A, 0xBE, 0xEF]);
        assert_eq!(std::format!("{}", device), "C0:1D:00:0A:BE:EF");
    }

    #[test]
    fn test_device_name() {
        let device = DeviceHandle::new([1; 6]).with_name("ENGO 2 HUD");
        assert_eq!(device.name(), Some("ENGO 2 HUD"));
        assert!(device.same_device(&DeviceHandle::new([1; 6])));
        assert!(!device.same_device(&DeviceHandle::new([2; 6])));
        assert_eq!(DeviceHandle::new([1; 6]).name(), None);
    }

    #[test]
    fn test_device_name_is_cut_on_char_boundary() {
        // 28 ASCII bytes, then a 2-byte character straddling the limit
        let long = std::format!("{}é", "a".repeat(28));
        let name = DeviceName::new(&long);
        assert_eq!(name.as_str(), "a".repeat(28));
    }

    #[test]
    fn test_changed_truncates() {
        let big = [b'a'; MAX_NOTIFICATION_LEN + 10];
        match TransportEvent::changed(TX_SERVER, &big) {
            TransportEvent::CharacteristicChanged { value, .. } => {
                assert_eq!(value.len(), MAX_NOTIFICATION_LEN)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
