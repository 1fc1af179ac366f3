/*
 *  clock.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall clock refresh loop
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

use std::time::Duration;

use chrono::{Local, NaiveTime, Timelike};
use log::{debug, info};

use crate::config::ClockConfig;
use crate::plugin::HostContext;
use crate::transport::I2cTransport;
use crate::vfd::VfdDriver;

/// Delay between refreshes, also the worst case stop latency
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// "  HH MM SS  " centred on the 12 character tube
pub fn format_hms(hour: u32, minute: u32, second: u32) -> String {
    format!("  {:02} {:02} {:02}  ", hour, minute, second)
}

pub fn format_time<T: Timelike>(time: &T) -> String {
    format_hms(time.hour(), time.minute(), time.second())
}

/// Where the loop reads the time from
pub trait TimeSource {
    fn now(&self) -> NaiveTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl TimeSource for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Running,
    Stopping,
}

/// Drives the tube from the clock until the host asks it to stop
pub struct ClockService<C: TimeSource = LocalClock> {
    clock: C,
    interval: Duration,
    state: ServiceState,
    ticks: u64,
}

impl ClockService<LocalClock> {
    pub fn new(config: &ClockConfig) -> Self {
        Self::with_clock(LocalClock, config)
    }
}

impl<C: TimeSource> ClockService<C> {
    pub fn with_clock(clock: C, config: &ClockConfig) -> Self {
        let interval = config
            .refresh_ms
            .map(Duration::from_millis)
            .unwrap_or(REFRESH_INTERVAL);
        Self {
            clock,
            interval,
            state: ServiceState::Stopped,
            ticks: 0,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames written by the last run
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Write the current time once
    pub fn tick<T: I2cTransport>(&mut self, driver: &mut VfdDriver<T>) {
        let text = format_time(&self.clock.now());
        driver.write_text(&text);
        self.ticks += 1;
    }

    /// Refresh until `ctx` reports stop, then blank and disable the tube.
    ///
    /// The stop flag is only looked at between delays, so shutdown takes up
    /// to one interval.
    pub fn run<T: I2cTransport>(&mut self, driver: &mut VfdDriver<T>, ctx: &dyn HostContext) {
        info!("VFD Clock service starting");
        self.state = ServiceState::Running;
        self.ticks = 0;

        while !ctx.should_stop() {
            self.tick(driver);
            ctx.delay(self.interval);
        }

        self.state = ServiceState::Stopping;
        debug!("Stop requested after {} frame(s)", self.ticks);
        driver.blank_and_disable();

        self.state = ServiceState::Stopped;
        info!("VFD Clock service stopped");
    }
}
