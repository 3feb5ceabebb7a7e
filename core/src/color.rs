use std::{error::Error, fmt, str::FromStr};

use bytemuck::{Pod, Zeroable};

pub const DEFAULT_BACKGROUND_COLOR: Chip8Color = Chip8Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Chip8Color = Chip8Color::new(255, 255, 255);

/// A display color laid out as a little-endian RGBX8888 pixel, so a slice of
/// colors can be uploaded to a streaming texture without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Chip8Color {
    padding: u8,
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Chip8Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Chip8Color {
        Chip8Color { r, g, b, padding: 0 }
    }
}

/// Foreground and background colors used when rendering the display buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Chip8Color,
    pub background: Chip8Color,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            foreground: DEFAULT_FOREGROUND_COLOR,
            background: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

/// View a rendered frame as raw RGBX8888 bytes.
pub fn frame_bytes(frame: &[Chip8Color]) -> &[u8] {
    bytemuck::cast_slice(frame)
}

impl FromStr for Chip8Color {
    type Err = Chip8ColorParseError;

    fn from_str(s: &str) -> Result<Chip8Color, Chip8ColorParseError> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix('#'))
            .unwrap_or(s);

        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Chip8ColorParseError);
        }

        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| Chip8ColorParseError)
        };

        Ok(Chip8Color::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8ColorParseError;

impl fmt::Display for Chip8ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "failed to parse hex color, expected RRGGBB".fmt(f)
    }
}

impl Error for Chip8ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!("0xAABBCC".parse::<Chip8Color>(), Ok(Chip8Color::new(0xAA, 0xBB, 0xCC)));
        assert_eq!("#102030".parse::<Chip8Color>(), Ok(Chip8Color::new(0x10, 0x20, 0x30)));
        assert_eq!("ffffff".parse::<Chip8Color>(), Ok(DEFAULT_FOREGROUND_COLOR));
    }

    #[test]
    fn test_parse_color_invalid() {
        assert_eq!("0xAABB".parse::<Chip8Color>(), Err(Chip8ColorParseError));
        assert_eq!("GGHHII".parse::<Chip8Color>(), Err(Chip8ColorParseError));
        assert_eq!("".parse::<Chip8Color>(), Err(Chip8ColorParseError));
    }

    #[test]
    fn test_frame_bytes_layout() {
        let frame = [Chip8Color::new(0x11, 0x22, 0x33)];
        assert_eq!(frame_bytes(&frame), &[0x00, 0x33, 0x22, 0x11]);
    }
}
