/*
 *  vfd/mod.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  VFD subsystem: register protocol, text frames and the driver
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

pub mod driver;
pub mod error;
pub mod frame;
pub mod registers;

// Re-exports for convenience
pub use driver::{VfdDriver, DEFAULT_ADDRESS, DEFAULT_BUS, DEFAULT_SPEED_HZ};
pub use error::VfdError;
pub use frame::{TextFrame, VFD_CHARS};
pub use registers::{ControlFlags, RegisterWrite, DEFAULT_BRIGHTNESS};
