/*
 *  plugin/host.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Services the host lends a running plugin
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

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Host side of a plugin session
pub trait HostContext {
    /// Polled by long running services between units of work.
    fn should_stop(&self) -> bool;

    /// Cooperative sleep. The only point a service yields.
    fn delay(&self, duration: Duration);
}

/// Cloneable stop request shared between the host and a service
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stop: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Host context for a service running on its own (blocking) thread
#[derive(Debug, Clone, Default)]
pub struct ThreadHost {
    token: StopToken,
}

impl ThreadHost {
    pub fn new(token: StopToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> StopToken {
        self.token.clone()
    }
}

impl HostContext for ThreadHost {
    fn should_stop(&self) -> bool {
        self.token.is_stop_requested()
    }

    fn delay(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
