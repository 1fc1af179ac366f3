/*
 *  plugin/vfdclock.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  VFD clock background service plugin
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

use log::{error, info};

use crate::clock::{ClockService, LocalClock, TimeSource};
use crate::config::Config;
use crate::plugin::{HostContext, Plugin, PluginError, PluginInfo, PluginKind, PLUGIN_API_VERSION};
use crate::transport::I2cTransport;
use crate::vfd::VfdDriver;

pub const VFDCLOCK_INFO: PluginInfo = PluginInfo {
    name: "VFD Clock",
    slug: "vfdclock",
    version: env!("CARGO_PKG_VERSION"),
    author: env!("CARGO_PKG_AUTHORS"),
    description: "Displays clock on I2C VFD display",
    api_version: PLUGIN_API_VERSION,
    kind: PluginKind::Service,
};

/// Clock service bound to one tube
pub struct VfdClockPlugin<T: I2cTransport, C: TimeSource = LocalClock> {
    driver: VfdDriver<T>,
    service: ClockService<C>,
}

impl<T: I2cTransport> VfdClockPlugin<T, LocalClock> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self::with_clock(transport, LocalClock, config)
    }
}

impl<T: I2cTransport, C: TimeSource> VfdClockPlugin<T, C> {
    pub fn with_clock(transport: T, clock: C, config: &Config) -> Self {
        Self {
            driver: VfdDriver::new(transport, &config.vfd()),
            service: ClockService::with_clock(clock, &config.clock()),
        }
    }

    pub fn driver(&self) -> &VfdDriver<T> {
        &self.driver
    }

    pub fn service(&self) -> &ClockService<C> {
        &self.service
    }
}

impl<T: I2cTransport, C: TimeSource> Plugin for VfdClockPlugin<T, C> {
    fn info(&self) -> &PluginInfo {
        &VFDCLOCK_INFO
    }

    fn init(&mut self, _ctx: &dyn HostContext) -> Result<(), PluginError> {
        self.driver.initialize()?;
        info!("VFD Clock plugin initialized");
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &dyn HostContext) {
        self.driver.shutdown();
        info!("VFD Clock plugin cleaned up");
    }

    fn run(&mut self, ctx: &dyn HostContext) {
        if !self.driver.is_open() {
            error!("VFD Clock service started without a successful init");
            return;
        }
        self.service.run(&mut self.driver, ctx);
    }
}
