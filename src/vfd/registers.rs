/*
 *  vfd/registers.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  NE-HCS12SS59T register map and write encoding
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

//! Register map
//!
//! | Register | Width    | Meaning                                  |
//! |----------|----------|------------------------------------------|
//! | 0        | 1 byte   | Control: bit0 enable, bit1 test, bit2 LED |
//! | 1        | 1 byte   | Display offset                           |
//! | 4-5      | 2 bytes  | Scroll speed                             |
//! | 6        | 1 byte   | Brightness 0-255                         |
//! | 10+      | 12 bytes | ASCII text buffer                        |

use std::ops::BitOr;

use arrayvec::ArrayVec;

use super::frame::{TextFrame, VFD_CHARS};

pub const REG_CONTROL: u8 = 0;
pub const REG_OFFSET: u8 = 1;
pub const REG_SCROLL_SPEED: u8 = 4;
pub const REG_BRIGHTNESS: u8 = 6;
pub const REG_TEXT: u8 = 10;

/// Factory brightness. Much higher shortens tube life drastically.
pub const DEFAULT_BRIGHTNESS: u8 = 110;

/// Largest payload any single write carries (the text buffer)
pub const MAX_PAYLOAD: usize = VFD_CHARS;

/// Register address byte plus the largest payload
pub const MAX_WIRE_LEN: usize = 1 + MAX_PAYLOAD;

/// Bits of the control register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags(u8);

impl ControlFlags {
    pub const OFF: Self = Self(0);
    pub const ENABLE: Self = Self(1 << 0);
    pub const TEST: Self = Self(1 << 1);
    pub const LED: Self = Self(1 << 2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Undefined bits are dropped
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ControlFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A register address and the bytes destined for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterWrite {
    register: u8,
    payload: ArrayVec<u8, MAX_PAYLOAD>,
}

impl RegisterWrite {
    pub fn control(flags: ControlFlags) -> Self {
        Self::single(REG_CONTROL, flags.bits())
    }

    pub fn brightness(value: u8) -> Self {
        Self::single(REG_BRIGHTNESS, value)
    }

    pub fn text(frame: &TextFrame) -> Self {
        let mut payload = ArrayVec::new();
        payload.extend(frame.as_bytes().iter().copied());
        Self { register: REG_TEXT, payload }
    }

    fn single(register: u8, value: u8) -> Self {
        let mut payload = ArrayVec::new();
        payload.push(value);
        Self { register, payload }
    }

    pub fn register(&self) -> u8 {
        self.register
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Wire form: the register address always leads, data follows.
    pub fn encode(&self) -> ArrayVec<u8, MAX_WIRE_LEN> {
        let mut wire = ArrayVec::new();
        wire.push(self.register);
        wire.extend(self.payload.iter().copied());
        wire
    }
}
