/*
 *  vfd/driver.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  NE-HCS12SS59T I2C VFD driver
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

use log::{debug, error, info, warn};

use crate::config::VfdConfig;
use crate::transport::{scan_bus, I2cDevice, I2cTransport};
use crate::vfd::error::VfdError;
use crate::vfd::frame::TextFrame;
use crate::vfd::registers::{ControlFlags, RegisterWrite, DEFAULT_BRIGHTNESS};

/// External I2C bus (QWIIC/SAO)
pub const DEFAULT_BUS: u8 = 1;

/// 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x10;

/// 100kHz
pub const DEFAULT_SPEED_HZ: u32 = 100_000;

/// VFD driver
///
/// Owns the transport and at most one open device session. Every text
/// update is a full frame; the tube has no partial update semantics.
pub struct VfdDriver<T: I2cTransport> {
    transport: T,

    /// Live session, present between initialize() and shutdown()
    device: Option<T::Device>,

    bus: u8,
    address: u8,
    speed_hz: u32,
    brightness: u8,

    /// Buses to enumerate (log only) before opening the device
    scan_buses: Vec<u8>,
}

impl<T: I2cTransport> VfdDriver<T> {
    /// Create a driver; nothing touches the bus until [`initialize`](Self::initialize)
    pub fn new(transport: T, config: &VfdConfig) -> Self {
        Self {
            transport,
            device: None,
            bus: config.bus.unwrap_or(DEFAULT_BUS),
            address: config.address.unwrap_or(DEFAULT_ADDRESS),
            speed_hz: config.speed_hz.unwrap_or(DEFAULT_SPEED_HZ),
            brightness: config.brightness.unwrap_or(DEFAULT_BRIGHTNESS),
            scan_buses: config.scan_buses.clone().unwrap_or_default(),
        }
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Open the device, enable it and set brightness.
    ///
    /// A driver that is already open is left untouched.
    pub fn initialize(&mut self) -> Result<(), VfdError> {
        if self.device.is_some() {
            debug!("VFD already open on bus {} at 0x{:02X}", self.bus, self.address);
            return Ok(());
        }

        for bus in self.scan_buses.clone() {
            scan_bus(&mut self.transport, bus);
        }

        let device = self
            .transport
            .open(self.bus, self.address, self.speed_hz)
            .map_err(|source| {
                error!("Failed to open I2C device at 0x{:02X} on bus {}", self.address, self.bus);
                VfdError::DeviceOpen {
                    bus: self.bus,
                    address: self.address,
                    source,
                }
            })?;
        self.device = Some(device);

        if self.brightness > DEFAULT_BRIGHTNESS {
            warn!("Brightness {} above {} shortens tube life", self.brightness, DEFAULT_BRIGHTNESS);
        }

        // enable only; test mode and LED stay clear
        self.set_control(ControlFlags::ENABLE);
        self.set_brightness(self.brightness);

        info!(
            "VFD enabled on bus {} at 0x{:02X}, brightness {}",
            self.bus, self.address, self.brightness
        );
        Ok(())
    }

    /// Show `text`, truncated or space padded to the tube width.
    pub fn write_text(&mut self, text: &str) {
        self.write_frame(&TextFrame::from_text(text));
    }

    pub fn write_frame(&mut self, frame: &TextFrame) {
        self.write_register(RegisterWrite::text(frame));
    }

    pub fn set_control(&mut self, flags: ControlFlags) {
        self.write_register(RegisterWrite::control(flags));
    }

    pub fn set_brightness(&mut self, value: u8) {
        self.brightness = value;
        self.write_register(RegisterWrite::brightness(value));
    }

    /// Blank the glass and clear the control register. The session stays open.
    pub fn blank_and_disable(&mut self) {
        self.write_frame(&TextFrame::blank());
        self.set_control(ControlFlags::OFF);
    }

    /// Blank, disable and close. Does nothing when no session is open.
    pub fn shutdown(&mut self) {
        if self.device.is_none() {
            return;
        }

        self.blank_and_disable();

        if let Some(device) = self.device.take() {
            device.close();
        }
        info!("VFD on bus {} at 0x{:02X} closed", self.bus, self.address);
    }

    /// Best effort: failures after open are logged and dropped.
    fn write_register(&mut self, write: RegisterWrite) {
        let Some(device) = self.device.as_mut() else {
            debug!("VFD not open, register {} write skipped", write.register());
            return;
        };

        if let Err(e) = device.write(&write.encode()) {
            debug!("VFD register {} write dropped: {}", write.register(), e);
        }
    }
}

impl<T: I2cTransport> Drop for VfdDriver<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
