/*
 *  transport/linux.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Linux i2c-dev transport
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

use std::path::PathBuf;

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;
use log::{debug, info};

use super::{I2cDevice, I2cTransport, TransportError};

/// Bus clock the kernel adapters are normally configured for
pub const STANDARD_MODE_HZ: u32 = 100_000;

/// Transport over the kernel's `/dev/i2c-N` character devices
#[derive(Debug, Clone)]
pub struct LinuxI2c {
    dev_root: PathBuf,
}

impl Default for LinuxI2c {
    fn default() -> Self {
        Self { dev_root: PathBuf::from("/dev") }
    }
}

impl LinuxI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the character device for `bus` (e.g. "/dev/i2c-1")
    pub fn device_path(&self, bus: u8) -> PathBuf {
        self.dev_root.join(format!("i2c-{}", bus))
    }

    fn open_bus(&self, bus: u8) -> Result<I2cdev, TransportError> {
        let path = self.device_path(bus);
        I2cdev::new(&path).map_err(|e| TransportError::Open {
            bus,
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

impl I2cTransport for LinuxI2c {
    type Device = LinuxI2cDevice;

    fn probe(&mut self, bus: u8, address: u8) -> bool {
        let Ok(mut dev) = self.open_bus(bus) else {
            return false;
        };
        // single byte read, the same test i2cdetect uses for most of the range
        let mut scratch = [0u8; 1];
        I2c::read(&mut dev, address, &mut scratch).is_ok()
    }

    fn open(&mut self, bus: u8, address: u8, speed_hz: u32) -> Result<LinuxI2cDevice, TransportError> {
        let dev = self.open_bus(bus)?;

        // bus clock belongs to the adapter driver (device tree / module param)
        if speed_hz != STANDARD_MODE_HZ {
            info!("Requested {} Hz on bus {}; adapter clock is set by the kernel", speed_hz, bus);
        }

        debug!("Opened {} for device 0x{:02X}", self.device_path(bus).display(), address);
        Ok(LinuxI2cDevice { dev, address })
    }
}

/// Open session with one device address on a Linux bus
pub struct LinuxI2cDevice {
    dev: I2cdev,
    address: u8,
}

impl I2cDevice for LinuxI2cDevice {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        I2c::write(&mut self.dev, self.address, bytes).map_err(|e| TransportError::Write {
            address: self.address,
            reason: format!("{:?}", e),
        })
    }

    fn close(self) {
        debug!("Closing I2C session for 0x{:02X}", self.address);
        drop(self.dev);
    }
}
