/*
 *  lib.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
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

//! Wall clock for the NE-HCS12SS59T 12 character I2C VFD
//!
//! Control flows service loop -> VFD driver -> I2C transport:
//!
//! - [`clock`] formats the local time as `"  HH MM SS  "` every 500 ms
//! - [`vfd`] turns text and control changes into register writes
//! - [`transport`] moves the bytes (Linux i2c-dev or a recording mock)
//! - [`plugin`] wraps it all in the host's init / run / cleanup lifecycle

pub mod clock;
pub mod config;
pub mod plugin;
pub mod transport;
pub mod vfd;
