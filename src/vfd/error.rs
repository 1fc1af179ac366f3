/*
 *  vfd/error.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the VFD driver
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

use thiserror::Error;

use crate::transport::TransportError;

/// Errors the driver surfaces to its caller.
///
/// Only opening the device can fail visibly. Register writes after a
/// successful open are best effort and never produce one of these.
#[derive(Debug, Error)]
pub enum VfdError {
    /// Transport refused to open the device session
    #[error("failed to open VFD at 0x{address:02X} on bus {bus}")]
    DeviceOpen {
        bus: u8,
        address: u8,
        #[source]
        source: TransportError,
    },
}
