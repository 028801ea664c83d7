//! The engine context
//!
//! A [`Hud`] owns everything shared between the host's contexts:
//!
//! ```text
//!  enqueue ──► LoadingGate ──► queue ──► run() ──► fragments ──► transport
//!                                          ▲                        │
//!                                          └── write slot ◄── handle_transport_event
//!  next_event ◄──────────────── events ◄───┘
//! ```
//!
//! The host spawns [`Hud::run`] once, forwards stack callbacks to
//! [`Hud::handle_transport_event`] and reads results from
//! [`Hud::next_event`]. All methods take `&self`.

mod link;
mod pipeline;
mod scan;


use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use heapless::Vec;

use crate::config::{HudConfig, LoadingMode};
use crate::events::HudEvent;
use crate::gate::{LoadingGate, MAX_PENDING_SCREENS};
use crate::inventory::BitmapInventory;
use crate::operation::Operation;
use crate::session::{Session, SessionId, SessionState};
use crate::transport::{DeviceHandle, GattTransport, Scanner};
use crate::write_slot::WriteSlot;

/// Operations waiting for the pipeline
pub const QUEUE_DEPTH: usize = 16;

// A lazy flush (every held upload plus the show) must fit an empty queue
const _: () = assert!(QUEUE_DEPTH > MAX_PENDING_SCREENS);

/// Undelivered events kept before new ones are dropped
pub const EVENT_DEPTH: usize = 32;

/// Event slots only session start and end may fill
pub const LIFECYCLE_RESERVE: usize = 4;

const _: () = assert!(EVENT_DEPTH > LIFECYCLE_RESERVE);

/// Distinct devices remembered per scan
pub const MAX_CANDIDATES: usize = 16;

/// Errors returned by [`Hud::enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnqueueError {
    /// No established session; the operation was dropped
    NotConnected,
    /// The operation queue is full; the operation was dropped
    QueueFull,
}

impl core::fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "no established session"),
            Self::QueueFull => write!(f, "operation queue full"),
        }
    }
}

/// The transport of the current session
struct Binding<T> {
    id: SessionId,
    device: DeviceHandle,
    transport: T,
}

/// An operation bound to the session it was accepted for
struct Queued {
    session: SessionId,
    operation: Operation,
}

struct Discovery<S> {
    scanner: S,
    scanning: bool,
    candidates: Vec<DeviceHandle, MAX_CANDIDATES>,
}

/// HUD protocol engine
pub struct Hud<T: GattTransport, S: Scanner> {
    config: HudConfig,
    binding: Mutex<CriticalSectionRawMutex, Option<Binding<T>>>,
    session: BlockingMutex<CriticalSectionRawMutex, RefCell<Option<Session>>>,
    next_session: BlockingMutex<CriticalSectionRawMutex, Cell<u32>>,
    write_slot: WriteSlot,
    queue: Channel<CriticalSectionRawMutex, Queued, QUEUE_DEPTH>,
    events: Channel<CriticalSectionRawMutex, HudEvent, EVENT_DEPTH>,
    gate: BlockingMutex<CriticalSectionRawMutex, RefCell<LoadingGate>>,
    inventory: BlockingMutex<CriticalSectionRawMutex, RefCell<BitmapInventory>>,
    discovery: BlockingMutex<CriticalSectionRawMutex, RefCell<Discovery<S>>>,
}

impl<T: GattTransport, S: Scanner> Hud<T, S> {
    pub fn new(config: HudConfig, scanner: S) -> Self {
        Self {
            config,
            binding: Mutex::new(None),
            session: BlockingMutex::new(RefCell::new(None)),
            next_session: BlockingMutex::new(Cell::new(0)),
            write_slot: WriteSlot::new(),
            queue: Channel::new(),
            events: Channel::new(),
            gate: BlockingMutex::new(RefCell::new(LoadingGate::new(config.loading_mode))),
            inventory: BlockingMutex::new(RefCell::new(BitmapInventory::new())),
            discovery: BlockingMutex::new(RefCell::new(Discovery {
                scanner,
                scanning: false,
                candidates: Vec::new(),
            })),
        }
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    /// The current (or last) session
    pub fn session(&self) -> Option<Session> {
        self.session.lock(|s| *s.borrow())
    }

    pub fn session_state(&self) -> Option<SessionState> {
        self.session().map(|s| s.state())
    }

    pub fn is_connected(&self) -> bool {
        self.established_session().is_some()
    }

    /// Submit an operation
    ///
    /// Goes through the loading gate first; a held screen upload returns
    /// `Ok` even without a session. Anything else needs an established
    /// session and room in the queue for everything it releases. A flush
    /// is all or nothing: when it does not fit, nothing is queued and the
    /// held uploads stay held.
    pub fn enqueue(&self, operation: Operation) -> Result<(), EnqueueError> {
        self.gate.lock(|gate| {
            let mut gate = gate.borrow_mut();
            let kind = operation.kind();
            let needed = gate.forwards(&operation);
            if needed == 0 {
                gate.admit(operation, |_| {});
                trace!("holding {:?}", kind);
                return Ok(());
            }

            let Some(session) = self.established_session() else {
                debug!("no session, dropping {:?}", kind);
                return Err(EnqueueError::NotConnected);
            };
            // Only producers fill the queue and they all hold the gate lock
            if self.queue.free_capacity() < needed {
                warn!("operation queue full, dropping {:?}", kind);
                return Err(EnqueueError::QueueFull);
            }

            gate.admit(operation, |operation| {
                if self.queue.try_send(Queued { session, operation }).is_err() {
                    error!("operation queue overflowed during {:?}", kind);
                }
            });
            Ok(())
        })
    }

    pub fn loading_mode(&self) -> LoadingMode {
        self.gate.lock(|gate| gate.borrow().mode())
    }

    pub fn set_loading_mode(&self, mode: LoadingMode) {
        self.gate.lock(|gate| gate.borrow_mut().set_mode(mode));
    }

    /// Screen uploads held by the loading gate
    pub fn pending_screens(&self) -> usize {
        self.gate.lock(|gate| gate.borrow().pending())
    }

    /// Wait for the next event
    pub async fn next_event(&self) -> HudEvent {
        self.events.receive().await
    }

    pub fn try_next_event(&self) -> Option<HudEvent> {
        self.events.try_receive().ok()
    }

    /// Id for the next bitmap upload
    pub fn next_bitmap_id(&self) -> Option<u8> {
        self.inventory.lock(|inv| inv.borrow().next_free_id())
    }

    pub fn bitmap_count(&self) -> usize {
        self.inventory.lock(|inv| inv.borrow().len())
    }

    /// Report `event` to the host
    ///
    /// The last [`LIFECYCLE_RESERVE`] slots are kept for lifecycle events,
    /// so a backlog of notifications never hides a disconnect.
    fn emit(&self, event: HudEvent) {
        if !event.is_lifecycle() && self.events.free_capacity() <= LIFECYCLE_RESERVE {
            warn!("event backlog, dropping {:?}", event);
            return;
        }
        if self.events.try_send(event).is_err() {
            warn!("event channel full, dropping event");
        }
    }

    fn established_session(&self) -> Option<SessionId> {
        self.session.lock(|s| {
            s.borrow()
                .as_ref()
                .filter(|s| s.state().is_established())
                .map(|s| s.id)
        })
    }

    /// True while `id` is the live (not yet closed) session
    fn is_current(&self, id: SessionId) -> bool {
        self.session()
            .is_some_and(|s| s.id == id && !s.state().is_closed())
    }

    fn is_established(&self, id: SessionId) -> bool {
        self.established_session() == Some(id)
    }

    /// Drop every queued operation
    fn drain_queue(&self) {
        let mut dropped = 0usize;
        while self.queue.try_receive().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("dropped {} queued operation(s)", dropped);
        }
    }
}
