//! GATT service and characteristic identifiers
//!
//! All values are bit-exact; the display firmware matches on them.

use uuid::Uuid;

/// Bluetooth SIG base UUID (`0000xxxx-0000-1000-8000-00805f9b34fb`)
const SIG_BASE: u128 = 0x0000_0000_0000_1000_8000_0080_5f9b_34fb;

/// Expand a 16-bit SIG assigned number into a full UUID
pub const fn sig_uuid(short: u16) -> Uuid {
    Uuid::from_u128(SIG_BASE | ((short as u128) << 96))
}

/// Standard Battery Service
pub const BATTERY_SERVICE: Uuid = sig_uuid(0x180F);

/// Battery Level characteristic (notify, 1 byte percentage)
pub const BATTERY_LEVEL: Uuid = sig_uuid(0x2A19);

/// Vendor command interface service
pub const COMMAND_SERVICE: Uuid = Uuid::from_u128(0x0783b03e_8535_b5a0_7140_a304d2495cb7);

/// Host → device command channel (write)
pub const RX_SERVER: Uuid = Uuid::from_u128(0x0783b03e_8535_b5a0_7140_a304d2495cba);

/// Device → host text channel (notify)
pub const TX_SERVER: Uuid = Uuid::from_u128(0x0783b03e_8535_b5a0_7140_a304d2495cb8);

/// Device flow control (notify/write)
pub const FLOW_CONTROL: Uuid = Uuid::from_u128(0x0783b03e_8535_b5a0_7140_a304d2495cb9);

/// Characteristics the session subscribes to once services are discovered,
/// as `(service, characteristic)` pairs
pub const SUBSCRIPTIONS: [(Uuid, Uuid); 2] = [
    (BATTERY_SERVICE, BATTERY_LEVEL),
    (COMMAND_SERVICE, TX_SERVER),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sig_uuids() {
        assert_eq!(
            BATTERY_SERVICE,
            Uuid::parse_str("0000180f-0000-1000-8000-00805f9b34fb").unwrap()
        );
        assert_eq!(
            BATTERY_LEVEL,
            Uuid::parse_str("00002a19-0000-1000-8000-00805f9b34fb").unwrap()
        );
    }

    #[test]
    fn test_command_interface_uuids() {
        assert_eq!(
            COMMAND_SERVICE,
            Uuid::parse_str("0783b03e-8535-b5a0-7140-a304d2495cb7").unwrap()
        );
        assert_eq!(
            RX_SERVER,
            Uuid::parse_str("0783b03e-8535-b5a0-7140-a304d2495cba").unwrap()
        );
        assert_eq!(
            TX_SERVER,
            Uuid::parse_str("0783b03e-8535-b5a0-7140-a304d2495cb8").unwrap()
        );
        assert_eq!(
            FLOW_CONTROL,
            Uuid::parse_str("0783b03e-8535-b5a0-7140-a304d2495cb9").unwrap()
        );
    }
}
