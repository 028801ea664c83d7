//! Bitmaps known to exist on the device
//!
//! The display announces stored bitmaps with `#<id> <w> x <h>` messages.
//! Entries are only ever appended; the highest id seen is tracked so new
//! uploads can pick an id that does not collide.

use heapless::Vec;
use visor_protocol::LayoutRegistration;

/// Registrations kept
pub const MAX_BITMAPS: usize = 64;

#[derive(Debug, Default)]
pub struct BitmapInventory {
    entries: Vec<LayoutRegistration, MAX_BITMAPS>,
    max_id: Option<u8>,
}

impl BitmapInventory {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_id: None,
        }
    }

    /// Record a registration
    ///
    /// The id is tracked even when the entry list is full.
    pub fn register(&mut self, registration: LayoutRegistration) {
        self.max_id = Some(self.max_id.map_or(registration.id, |m| m.max(registration.id)));
        if self.entries.push(registration).is_err() {
            warn!("bitmap inventory full, dropping #{}", registration.id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_id(&self) -> Option<u8> {
        self.max_id
    }

    /// Smallest id above every registered one, `None` once ids run out
    pub fn next_free_id(&self) -> Option<u8> {
        match self.max_id {
            Some(max) => max.checked_add(1),
            None => Some(0),
        }
    }

    /// Most recent registration for `id`
    pub fn get(&self, id: u8) -> Option<&LayoutRegistration> {
        self.entries.iter().rev().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutRegistration> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(id: u8, width: u16, height: u16) -> LayoutRegistration {
        LayoutRegistration { id, width, height }
    }

    #[test]
    fn test_empty() {
        let inventory = BitmapInventory::new();
        assert!(inventory.is_empty());
        assert_eq!(inventory.next_free_id(), Some(0));
    }

    #[test]
    fn test_tracks_max_id() {
        let mut inventory = BitmapInventory::new();
        inventory.register(reg(4, 10, 10));
        inventory.register(reg(2, 8, 8));
        assert_eq!(inventory.max_id(), Some(4));
        assert_eq!(inventory.next_free_id(), Some(5));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_append_only() {
        let mut inventory = BitmapInventory::new();
        inventory.register(reg(1, 10, 10));
        inventory.register(reg(1, 20, 30));
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.get(1), Some(&reg(1, 20, 30)));
        assert_eq!(inventory.get(9), None);
    }

    #[test]
    fn test_ids_run_out() {
        let mut inventory = BitmapInventory::new();
        inventory.register(reg(u8::MAX, 1, 1));
        assert_eq!(inventory.next_free_id(), None);
    }

    #[test]
    fn test_full_inventory_still_tracks_ids() {
        let mut inventory = BitmapInventory::new();
        for i in 0..MAX_BITMAPS as u8 {
            inventory.register(reg(i, 1, 1));
        }
        inventory.register(reg(200, 1, 1));
        assert_eq!(inventory.len(), MAX_BITMAPS);
        assert_eq!(inventory.next_free_id(), Some(201));
    }
}
