//! Typed notifications decoded from characteristic-change events

use heapless::String;
use uuid::Uuid;

use crate::registration::LayoutRegistration;
use crate::uuids::{BATTERY_LEVEL, TX_SERVER};

/// Longest TxServer message kept
pub const MAX_NOTIFICATION_LEN: usize = 128;

/// Text received on the TxServer characteristic
pub type NotificationText = String<MAX_NOTIFICATION_LEN>;

/// Notification from the display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// Battery percentage from the Battery Level characteristic
    BatteryLevel(u8),
    /// ASCII message from the command interface
    TxServer(NotificationText),
}

impl Notification {
    /// Decode a characteristic value by the UUID it arrived on
    ///
    /// Returns `None` for characteristics the engine does not consume and
    /// for values that cannot be decoded; callers drop those.
    pub fn decode(characteristic: &Uuid, value: &[u8]) -> Option<Self> {
        if *characteristic == BATTERY_LEVEL {
            value.first().map(|&level| Notification::BatteryLevel(level))
        } else if *characteristic == TX_SERVER {
            decode_text(value).map(Notification::TxServer)
        } else {
            None
        }
    }

    /// Parse a bitmap/layout registration out of a TxServer message
    pub fn registration(&self) -> Option<LayoutRegistration> {
        match self {
            Notification::TxServer(text) => LayoutRegistration::parse(text),
            Notification::BatteryLevel(_) => None,
        }
    }
}

/// Decode device text, dropping trailing NULs and truncating to capacity
fn decode_text(value: &[u8]) -> Option<NotificationText> {
    let end = value
        .iter()
        .rposition(|&b| b != 0)
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let text = core::str::from_utf8(&value[..end]).ok()?;

    let mut out = NotificationText::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuids::{FLOW_CONTROL, RX_SERVER};

    #[test]
    fn test_battery_level() {
        let n = Notification::decode(&BATTERY_LEVEL, &[87]).unwrap();
        assert_eq!(n, Notification::BatteryLevel(87));
    }

    #[test]
    fn test_empty_battery_value() {
        assert!(Notification::decode(&BATTERY_LEVEL, &[]).is_none());
    }

    #[test]
    fn test_tx_server_text() {
        let n = Notification::decode(&TX_SERVER, b"OK\0\0").unwrap();
        match n {
            Notification::TxServer(text) => assert_eq!(text.as_str(), "OK"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tx_server_invalid_utf8() {
        assert!(Notification::decode(&TX_SERVER, &[0xFF, 0xFE]).is_none());
    }

    #[test]
    fn test_tx_server_truncates() {
        let long = [b'a'; MAX_NOTIFICATION_LEN + 20];
        match Notification::decode(&TX_SERVER, &long).unwrap() {
            Notification::TxServer(text) => assert_eq!(text.len(), MAX_NOTIFICATION_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_characteristics_dropped() {
        assert!(Notification::decode(&FLOW_CONTROL, b"1").is_none());
        assert!(Notification::decode(&RX_SERVER, b"x").is_none());
    }

    #[test]
    fn test_registration_from_notification() {
        let n = Notification::decode(&TX_SERVER, b"#7 32 x 16").unwrap();
        let reg = n.registration().unwrap();
        assert_eq!(reg.id, 7);
        assert_eq!(reg.width, 32);
        assert_eq!(reg.height, 16);

        assert!(Notification::BatteryLevel(7).registration().is_none());
    }
}
