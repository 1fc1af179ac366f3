/*
 *  vfd/frame.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed width text frame for the 12 character tube
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

use std::fmt;

/// Display character count
pub const VFD_CHARS: usize = 12;

const PAD: u8 = b' ';
const UNPRINTABLE: u8 = b'?';

/// One complete screen of text, always exactly [`VFD_CHARS`] bytes.
///
/// Short text is right padded with spaces so nothing from a previous, longer
/// frame survives on the glass. Long text is cut at the tube width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextFrame([u8; VFD_CHARS]);

impl TextFrame {
    /// All spaces
    pub const fn blank() -> Self {
        Self([PAD; VFD_CHARS])
    }

    pub fn from_text(text: &str) -> Self {
        let mut cells = [PAD; VFD_CHARS];
        for (cell, ch) in cells.iter_mut().zip(text.chars()) {
            *cell = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                UNPRINTABLE
            };
        }
        Self(cells)
    }

    pub fn as_bytes(&self) -> &[u8; VFD_CHARS] {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| b == PAD)
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::blank()
    }
}

impl From<&str> for TextFrame {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // every cell is printable ASCII by construction
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextFrame({:?})", self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_space_padded() {
        for text in ["", "A", "12:00", "ELEVEN CHAR", "TWELVE CHARS"] {
            let frame = TextFrame::from_text(text);
            let mut expected = text.as_bytes().to_vec();
            expected.resize(VFD_CHARS, b' ');
            assert_eq!(frame.as_bytes().as_slice(), expected.as_slice(), "text {:?}", text);
        }
    }

    #[test]
    fn test_long_text_is_truncated() {
        let frame = TextFrame::from_text("THIS IS FAR TOO LONG FOR THE TUBE");
        assert_eq!(frame.as_bytes(), b"THIS IS FAR ");
    }

    #[test]
    fn test_non_ascii_replaced() {
        let frame = TextFrame::from_text("12°C\tok");
        assert_eq!(frame.as_bytes(), b"12?C?ok     ");
    }

    #[test]
    fn test_blank() {
        assert!(TextFrame::blank().is_blank());
        assert!(TextFrame::from_text("").is_blank());
        assert!(!TextFrame::from_text("x").is_blank());
        assert_eq!(TextFrame::default(), TextFrame::blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(TextFrame::from("  14 05 09").to_string(), "  14 05 09  ");
    }
}
