//! Device discovery

use heapless::Vec;

use super::{Hud, MAX_CANDIDATES};
use crate::events::HudEvent;
use crate::transport::{DeviceHandle, GattTransport, Scanner, TransportError};

impl<T: GattTransport, S: Scanner> Hud<T, S> {
    /// Start a fresh scan; earlier candidates are forgotten
    pub fn start_scanning(&self) -> Result<(), TransportError> {
        self.discovery.lock(|d| {
            let mut d = d.borrow_mut();
            d.candidates.clear();
            d.scanner.start_scan()?;
            d.scanning = true;
            debug!("scan started");
            Ok(())
        })
    }

    pub fn stop_scanning(&self) {
        self.discovery.lock(|d| {
            let mut d = d.borrow_mut();
            if d.scanning {
                d.scanner.stop_scan();
                d.scanning = false;
                debug!("scan stopped, {} candidate(s)", d.candidates.len());
            }
        });
    }

    pub fn is_scanning(&self) -> bool {
        self.discovery.lock(|d| d.borrow().scanning)
    }

    /// Report devices matched by the scanner
    ///
    /// Each device is announced with [`HudEvent::DeviceFound`] the first
    /// time it is seen during a scan. Reports outside a scan are ignored.
    pub fn report_candidates(&self, devices: &[DeviceHandle]) {
        let found: Vec<DeviceHandle, MAX_CANDIDATES> = self.discovery.lock(|d| {
            let mut d = d.borrow_mut();
            let mut found = Vec::new();
            if !d.scanning {
                trace!("ignoring {} candidate(s) outside a scan", devices.len());
                return found;
            }
            for device in devices {
                if d.candidates.iter().any(|c| c.same_device(device)) {
                    continue;
                }
                if d.candidates.push(*device).is_err() {
                    warn!("candidate list full, ignoring {}", device);
                    break;
                }
                let _ = found.push(*device);
            }
            found
        });

        for device in found {
            info!("found {}", device);
            self.emit(HudEvent::DeviceFound(device));
        }
    }

    /// Devices seen during the current scan
    pub fn candidates(&self) -> Vec<DeviceHandle, MAX_CANDIDATES> {
        self.discovery.lock(|d| d.borrow().candidates.clone())
    }
}
