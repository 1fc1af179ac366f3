/*
 *  plugin/mod.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host facing plugin lifecycle
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

//! Plugin lifecycle
//!
//! A host drives a plugin through three entry points:
//!
//! 1. `init` - acquire hardware; a failure means `run` is never called
//! 2. `run` - background services block here until the host asks them to stop
//! 3. `cleanup` - release hardware; safe to call whatever happened before
//!
//! The host lends a [`HostContext`] to each call so the plugin can poll for
//! stop requests and sleep cooperatively.

pub mod host;
pub mod vfdclock;

pub use self::host::{HostContext, StopToken, ThreadHost};
pub use self::vfdclock::{VfdClockPlugin, VFDCLOCK_INFO};

use thiserror::Error;

use crate::vfd::VfdError;

/// Lifecycle contract version this crate implements
pub const PLUGIN_API_VERSION: u32 = 1;

/// What a plugin offers the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// Long running background service with a `run` entry point
    Service,
}

/// Plugin metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub slug: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub api_version: u32,
    pub kind: PluginKind,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("VFD initialization failed: {0}")]
    Vfd(#[from] VfdError),
}

impl PluginError {
    /// Integer status for hosts that speak return codes (0 is success)
    pub fn code(&self) -> i32 {
        match self {
            PluginError::Vfd(_) => -1,
        }
    }
}

/// Entry points a host calls
pub trait Plugin {
    fn info(&self) -> &PluginInfo;

    fn init(&mut self, ctx: &dyn HostContext) -> Result<(), PluginError>;

    fn cleanup(&mut self, ctx: &dyn HostContext);

    /// Blocks until `ctx` reports stop.
    fn run(&mut self, ctx: &dyn HostContext);
}
