//! Operation pipeline
//!
//! One consumer drains the queue. For each operation every command is
//! serialized, cut into fragments and written one fragment at a time, each
//! write waiting for its acknowledgement. Between operations the pipeline
//! pauses for the configured pacing delay.

use visor_protocol::status::GATT_FAILURE;
use visor_protocol::uuids::{COMMAND_SERVICE, RX_SERVER};
use visor_protocol::{Fragment, Fragments, WriteStatus};

use super::link::pause;
use super::{Hud, Queued};
use crate::events::{HudEvent, OperationFailure};
use crate::session::SessionId;
use crate::transport::{GattTransport, Scanner};

impl<T: GattTransport, S: Scanner> Hud<T, S> {
    /// Pipeline worker; runs forever
    ///
    /// Spawn exactly once.
    ///
    /// The end of an operation is the point where its result is correlated:
    /// once the last fragment of its last command is acknowledged on the
    /// session it was queued for, exactly one `OperationSucceeded` is
    /// emitted. A rejected fragment ends it early with `OperationFailed`,
    /// and an operation abandoned by a disconnect reports nothing.
    pub async fn run(&self) {
        info!("operation pipeline started");
        loop {
            let queued = self.queue.receive().await;
            self.execute(queued).await;
            pause(self.config.pacing()).await;
        }
    }

    async fn execute(&self, queued: Queued) {
        let Queued { session, operation } = queued;
        let kind = operation.kind();

        if !self.is_established(session) {
            debug!("session {} gone, skipping {:?}", session, kind);
            return;
        }

        let commands = match operation.commands() {
            Ok(commands) => commands,
            Err(e) => {
                warn!("{:?} cannot be encoded: {:?}", kind, e);
                self.emit(HudEvent::OperationFailed {
                    kind,
                    failure: OperationFailure::Encode(e),
                });
                return;
            }
        };

        for command in &commands {
            let data = match command.data() {
                Ok(data) => data,
                Err(e) => {
                    warn!("{:?} cannot be encoded: {:?}", kind, e);
                    self.emit(HudEvent::OperationFailed {
                        kind,
                        failure: OperationFailure::Encode(e),
                    });
                    return;
                }
            };

            for fragment in Fragments::new(&data) {
                match self.write_fragment(session, &fragment).await {
                    WriteStatus::Success => {}
                    WriteStatus::Failed(status) => {
                        warn!(
                            "{:?}: fragment {} rejected with status {}",
                            kind,
                            fragment.index,
                            status
                        );
                        self.emit(HudEvent::OperationFailed {
                            kind,
                            failure: OperationFailure::Write {
                                status,
                                fragment: fragment.index,
                            },
                        });
                        return;
                    }
                    WriteStatus::Aborted => {
                        debug!("{:?} abandoned", kind);
                        return;
                    }
                }
            }
        }

        trace!("{:?} complete", kind);
        self.emit(HudEvent::OperationSucceeded(kind));
    }

    /// Write one fragment and wait for its acknowledgement
    async fn write_fragment(&self, session: SessionId, fragment: &Fragment<'_>) -> WriteStatus {
        let slot = self.write_slot.acquire().await;
        {
            let mut binding = self.binding.lock().await;
            // A local disconnect leaves the binding in place until the link drops
            let Some(bound) = binding
                .as_mut()
                .filter(|b| b.id == session && self.is_established(session))
            else {
                return WriteStatus::Aborted;
            };

            slot.begin();
            if let Err(e) = bound
                .transport
                .write_characteristic(COMMAND_SERVICE, RX_SERVER, fragment.bytes)
            {
                slot.cancel();
                warn!("write not submitted: {:?}", e);
                return WriteStatus::Failed(GATT_FAILURE);
            }
        }
        slot.completion().await
    }
}
