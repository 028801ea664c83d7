//! The single in-flight write
//!
//! The link accepts one characteristic write at a time. The writer holds the
//! slot for the whole submit/acknowledge cycle; the acknowledgement (or a
//! teardown) arrives from another context through [`WriteSlot::complete`] or
//! [`WriteSlot::abort`].

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use visor_protocol::WriteStatus;

/// Write slot shared by the writer and the completion path
pub struct WriteSlot {
    slot: Mutex<CriticalSectionRawMutex, ()>,
    in_flight: BlockingMutex<CriticalSectionRawMutex, Cell<bool>>,
    done: Signal<CriticalSectionRawMutex, WriteStatus>,
}

impl Default for WriteSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteSlot {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(()),
            in_flight: BlockingMutex::new(Cell::new(false)),
            done: Signal::new(),
        }
    }

    /// Wait until no other writer holds the slot
    pub async fn acquire(&self) -> WriteGuard<'_> {
        let lock = self.slot.lock().await;
        WriteGuard { slot: self, _lock: lock }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.lock(|f| f.get())
    }

    /// Report the outcome of the pending write
    ///
    /// Returns false (and drops `status`) if nothing is in flight.
    pub fn complete(&self, status: WriteStatus) -> bool {
        let pending = self.in_flight.lock(|f| f.replace(false));
        if pending {
            self.done.signal(status);
        } else {
            trace!("write completion without a pending write: {:?}", status);
        }
        pending
    }

    /// Release a pending writer without an acknowledgement
    pub fn abort(&self) -> bool {
        self.complete(WriteStatus::Aborted)
    }
}

/// Exclusive use of the write slot
pub struct WriteGuard<'a> {
    slot: &'a WriteSlot,
    _lock: MutexGuard<'a, CriticalSectionRawMutex, ()>,
}

impl WriteGuard<'_> {
    /// Mark a write as submitted; call right before handing it to the stack
    pub fn begin(&self) {
        self.slot.done.reset();
        self.slot.in_flight.lock(|f| f.set(true));
    }

    /// Undo [`begin`](Self::begin) after a failed submission
    pub fn cancel(&self) {
        self.slot.in_flight.lock(|f| f.set(false));
    }

    /// Wait for the outcome of the submitted write
    pub async fn completion(&self) -> WriteStatus {
        self.slot.done.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_completion_without_write_is_dropped() {
        let slot = WriteSlot::new();
        assert!(!slot.complete(WriteStatus::Success));
        assert!(!slot.abort());
    }

    #[test]
    fn test_write_cycle() {
        let slot = WriteSlot::new();
        block_on(async {
            let guard = slot.acquire().await;
            guard.begin();
            assert!(slot.is_in_flight());
            assert!(slot.complete(WriteStatus::Failed(0x85)));
            assert_eq!(guard.completion().await, WriteStatus::Failed(0x85));
            assert!(!slot.is_in_flight());
        });
    }

    #[test]
    fn test_abort_releases_writer() {
        let slot = WriteSlot::new();
        block_on(async {
            let guard = slot.acquire().await;
            guard.begin();
            assert!(slot.abort());
            assert_eq!(guard.completion().await, WriteStatus::Aborted);
        });
    }

    #[test]
    fn test_stale_completion_does_not_leak_into_next_write() {
        let slot = WriteSlot::new();
        block_on(async {
            let guard = slot.acquire().await;
            guard.begin();
            guard.cancel();
            // Arrives after the writer gave up on the submission
            assert!(!slot.complete(WriteStatus::Success));

            guard.begin();
            slot.complete(WriteStatus::Failed(1));
            assert_eq!(guard.completion().await, WriteStatus::Failed(1));
        });
    }
}
