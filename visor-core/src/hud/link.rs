//! Connection lifecycle
//!
//! connect ─► Connecting ─► (bond settle) ─► discover ─► ServicesDiscovered
//!         ─► enable notifications ─► Established
//!
//! Any failure or disconnect closes the session exactly once, aborts the
//! pending write and drops whatever was queued for it.

use embassy_time::{Duration, Timer};
use visor_protocol::status::GATT_SUCCESS;
use visor_protocol::uuids::SUBSCRIPTIONS;
use visor_protocol::{GattClosedReason, Notification, WriteStatus};

use super::{Binding, Hud};
use crate::events::HudEvent;
use crate::session::{LinkEvent, Session, SessionId, SessionState};
use crate::transport::{
    BondState, CharacteristicValue, DeviceHandle, GattTransport, Scanner, TransportError,
    TransportEvent,
};

/// Sleep unless the delay is zero
pub(super) async fn pause(delay: Duration) {
    if delay.as_ticks() > 0 {
        Timer::after(delay).await;
    }
}

impl<T: GattTransport, S: Scanner> Hud<T, S> {
    /// Open a session to `device` over `transport`
    ///
    /// Connecting to the device that is already connecting is a no-op and
    /// returns the existing session. Any other session is closed first.
    pub async fn connect(
        &self,
        device: DeviceHandle,
        transport: T,
    ) -> Result<SessionId, TransportError> {
        let connecting = self
            .session()
            .filter(|s| s.device.same_device(&device) && s.state() == SessionState::Connecting)
            .map(|s| s.id);
        if let Some(id) = connecting {
            debug!("already connecting to {}", device);
            return Ok(id);
        }

        if let Some(previous) = self.session().filter(|s| !s.state().is_closed()) {
            info!("replacing session {} ({})", previous.id, previous.device);
            self.shutdown_link(previous.id).await;
            self.close(previous.id, GattClosedReason::Success).await;
        }

        let id = self.next_session.lock(|n| {
            let id = n.get().wrapping_add(1);
            n.set(id);
            SessionId(id)
        });
        info!("connecting to {} (session {})", device, id);

        let submitted = {
            let mut binding = self.binding.lock().await;
            self.session.lock(|s| {
                let mut session = Session::new(id, device);
                session.apply(LinkEvent::ConnectRequested);
                *s.borrow_mut() = Some(session);
            });
            binding
                .insert(Binding {
                    id,
                    device,
                    transport,
                })
                .transport
                .connect()
        };
        if let Err(e) = submitted {
            warn!("connect to {} failed: {:?}", device, e);
            self.close(id, GattClosedReason::GattError).await;
            return Err(e);
        }
        Ok(id)
    }

    /// Drop the link to `device`
    ///
    /// The session closes when the transport reports the disconnect. Until
    /// then it is `Disconnecting`: new operations are refused, and queued
    /// operations and the pending write are abandoned right away.
    pub async fn disconnect(&self, device: DeviceHandle) -> Result<(), TransportError> {
        {
            let mut binding = self.binding.lock().await;
            match binding.as_mut() {
                Some(b) if b.device.same_device(&device) => {
                    info!("disconnecting from {}", device);
                    b.transport.disconnect()?;
                    let id = b.id;
                    self.apply(id, LinkEvent::DisconnectRequested);
                }
                _ => return Err(TransportError::NotConnected),
            }
        }
        self.write_slot.abort();
        self.drain_queue();
        Ok(())
    }

    /// Feed a stack callback into the engine
    ///
    /// Events tagged with anything but the current session are ignored.
    pub async fn handle_transport_event(&self, id: SessionId, event: TransportEvent) {
        if !self.is_current(id) {
            trace!("ignoring event for stale session {}", id);
            return;
        }

        match event {
            TransportEvent::ConnectionStateChanged { status, connected } => {
                if connected && status == GATT_SUCCESS {
                    self.on_connected(id).await;
                } else {
                    self.close(id, GattClosedReason::from_status(status)).await;
                }
            }
            TransportEvent::ServicesDiscovered { status } => {
                if status == GATT_SUCCESS {
                    self.on_services_discovered(id).await;
                } else {
                    warn!("service discovery failed: status {}", status);
                    self.shutdown_link(id).await;
                    self.close(id, GattClosedReason::GattError).await;
                }
            }
            TransportEvent::CharacteristicWritten { status } => {
                self.write_slot.complete(WriteStatus::from_status(status));
            }
            TransportEvent::CharacteristicChanged {
                characteristic,
                value,
            } => self.on_characteristic_changed(&characteristic, &value),
        }
    }

    async fn on_connected(&self, id: SessionId) {
        if self.session().map(|s| s.state()) != Some(SessionState::Connecting) {
            trace!("session {} not connecting, ignoring link up", id);
            return;
        }

        let bond = {
            let binding = self.binding.lock().await;
            match binding.as_ref().filter(|b| b.id == id) {
                Some(b) => b.transport.bond_state(),
                None => return,
            }
        };

        // Bonded links need a moment before discovery is reliable
        if bond != BondState::None {
            debug!("device bond state {:?}, settling", bond);
            pause(self.config.bond_settle()).await;
            let current = self.session().map(|s| (s.id, s.state()));
            if current != Some((id, SessionState::Connecting)) {
                return;
            }
        }

        let submitted = self
            .with_transport(id, |transport| transport.discover_services())
            .await;
        if let Err(e) = submitted {
            warn!("service discovery not submitted: {:?}", e);
            self.shutdown_link(id).await;
            self.close(id, GattClosedReason::GattError).await;
        }
    }

    async fn on_services_discovered(&self, id: SessionId) {
        if !self.apply(id, LinkEvent::ServicesDiscovered) {
            return;
        }

        let subscribed = self
            .with_transport(id, |transport| {
                SUBSCRIPTIONS
                    .iter()
                    .try_for_each(|(service, characteristic)| {
                        transport.set_notify(*service, *characteristic, true)
                    })
            })
            .await;
        if let Err(e) = subscribed {
            warn!("enabling notifications failed: {:?}", e);
            self.shutdown_link(id).await;
            self.close(id, GattClosedReason::GattError).await;
            return;
        }

        if self.apply(id, LinkEvent::NotificationsEnabled) {
            if let Some(session) = self.session() {
                info!("session {} established with {}", id, session.device);
                self.emit(HudEvent::Established(session.device));
            }
        }
    }

    fn on_characteristic_changed(&self, characteristic: &uuid::Uuid, value: &CharacteristicValue) {
        let Some(notification) = Notification::decode(characteristic, value) else {
            trace!("dropping change on unsubscribed characteristic");
            return;
        };

        if let Some(registration) = notification.registration() {
            debug!(
                "bitmap #{} registered ({}x{})",
                registration.id,
                registration.width,
                registration.height
            );
            self.inventory
                .lock(|inv| inv.borrow_mut().register(registration));
        }
        self.emit(HudEvent::Notification(notification));
    }

    /// Run `f` on the transport of session `id`
    async fn with_transport<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut T) -> Result<R, TransportError>,
    ) -> Result<R, TransportError> {
        let mut binding = self.binding.lock().await;
        match binding.as_mut().filter(|b| b.id == id) {
            Some(b) => f(&mut b.transport),
            None => Err(TransportError::NotConnected),
        }
    }

    /// Ask the transport of session `id` to drop the link
    async fn shutdown_link(&self, id: SessionId) {
        if let Err(e) = self
            .with_transport(id, |transport| transport.disconnect())
            .await
        {
            debug!("disconnect not submitted: {:?}", e);
        }
    }

    /// Apply `event` to session `id`, returning true if its state changed
    fn apply(&self, id: SessionId, event: LinkEvent) -> bool {
        self.session.lock(|s| match s.borrow_mut().as_mut() {
            Some(session) if session.id == id => session.apply(event),
            _ => false,
        })
    }

    /// Close session `id` and release everything bound to it
    async fn close(&self, id: SessionId, reason: GattClosedReason) {
        if !self.apply(id, LinkEvent::Closed(reason)) {
            return;
        }

        {
            let mut binding = self.binding.lock().await;
            if binding.as_ref().is_some_and(|b| b.id == id) {
                *binding = None;
            }
        }
        self.write_slot.abort();
        self.drain_queue();

        if let Some(session) = self.session() {
            info!("session {} closed: {}", id, reason);
            self.emit(HudEvent::Terminated {
                device: session.device,
                reason,
            });
        }
    }
}
