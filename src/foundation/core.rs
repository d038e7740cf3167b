use crate::foundation::error::{ComposerError, ComposerResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(self, r: Rect) -> bool {
        r.right() <= u64::from(self.width) && r.bottom() <= u64::from(self.height)
    }
}

/// Axis-aligned pixel rectangle. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u64 {
        u64::from(self.x) + u64::from(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u64 {
        u64::from(self.y) + u64::from(self.h)
    }

    pub fn intersects(self, other: Rect) -> bool {
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }
}

/// Opaque 8-bit frame in B,G,R byte order, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgrFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl BgrFrame {
    pub const CHANNELS: usize = 3;

    /// A frame filled with black.
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; Self::byte_len(width, height)],
        }
    }

    /// A frame filled with one BGR color.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(Self::byte_len(width, height));
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&bgr);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ComposerResult<Self> {
        if data.len() != Self::byte_len(width, height) {
            return Err(ComposerError::media(format!(
                "bgr frame byte len mismatch: got {}, expected {}",
                data.len(),
                Self::byte_len(width, height)
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(Self::CHANNELS)
    }

    pub fn stride(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }

    /// Pixel at (x, y) as `[b, g, r]`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = y as usize * self.stride() + x as usize * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// 8-bit raster with straight (non-premultiplied) alpha in R,G,B,A byte order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaRaster {
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ComposerResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(ComposerError::media(format!(
                "rgba raster byte len mismatch: got {}, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}
