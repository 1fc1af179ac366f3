/*
 *  transport/mod.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  I2C transport abstraction used by the VFD driver
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! I2C transport layer
//!
//! The driver never touches a bus directly. It asks an [`I2cTransport`] to
//! open a device session and then pushes raw byte buffers through the
//! returned [`I2cDevice`]. Two implementations ship with the crate:
//!
//! - [`LinuxI2c`] - `/dev/i2c-N` character devices via `linux-embedded-hal`
//! - [`MockTransport`] - records traffic for tests and emulation

pub mod linux;
pub mod mock;

pub use linux::{LinuxI2c, LinuxI2cDevice};
pub use mock::{MockDevice, MockTransport, MockTransportState, TransportEvent};

use log::{debug, info};
use thiserror::Error;

/// First address probed during a bus scan (0x00-0x07 are reserved)
pub const SCAN_FIRST_ADDRESS: u8 = 0x08;

/// One past the last address probed during a bus scan (0x78-0x7F are reserved)
pub const SCAN_END_ADDRESS: u8 = 0x78;

/// Errors raised by a transport implementation
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open I2C bus {bus}: {reason}")]
    Open { bus: u8, reason: String },

    #[error("I2C write to 0x{address:02X} failed: {reason}")]
    Write { address: u8, reason: String },
}

/// An open session with a single device on the bus.
pub trait I2cDevice {
    /// Transmit `bytes` to the device in one transaction.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Release the session. Consumes the handle so it cannot be reused.
    fn close(self);
}

/// Bus level services: discovery and device sessions.
pub trait I2cTransport {
    type Device: I2cDevice;

    /// Returns true when a device acknowledges at `address` on `bus`.
    fn probe(&mut self, bus: u8, address: u8) -> bool;

    /// Open a session with the device at the 7-bit `address` on `bus`.
    fn open(&mut self, bus: u8, address: u8, speed_hz: u32) -> Result<Self::Device, TransportError>;
}

/// Probe every non-reserved 7-bit address on `bus` and log the responders.
///
/// Diagnostic only; nothing downstream depends on the result.
pub fn scan_bus<T: I2cTransport>(transport: &mut T, bus: u8) -> Vec<u8> {
    info!("Scanning I2C bus {} for devices...", bus);

    let found: Vec<u8> = (SCAN_FIRST_ADDRESS..SCAN_END_ADDRESS)
        .filter(|&address| transport.probe(bus, address))
        .collect();

    for address in &found {
        info!("  Bus {}: found device at 0x{:02X}", bus, address);
    }
    debug!("Bus {} scan complete, {} device(s)", bus, found.len());

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_reports_responders_in_order() {
        let mut transport = MockTransport::new();
        transport.respond_at(1, 0x3C);
        transport.respond_at(1, 0x10);
        transport.respond_at(0, 0x50);

        assert_eq!(scan_bus(&mut transport, 1), vec![0x10, 0x3C]);
        assert_eq!(scan_bus(&mut transport, 0), vec![0x50]);
    }

    #[test]
    fn test_scan_skips_reserved_addresses() {
        let mut transport = MockTransport::new();
        transport.respond_at(1, 0x03);
        transport.respond_at(1, 0x7A);

        assert!(scan_bus(&mut transport, 1).is_empty());
    }

    #[test]
    fn test_scan_probes_full_range() {
        let mut transport = MockTransport::new();
        scan_bus(&mut transport, 1);

        let probes = transport.state().lock().unwrap().probe_count;
        assert_eq!(probes, (SCAN_END_ADDRESS - SCAN_FIRST_ADDRESS) as usize);
    }
}
