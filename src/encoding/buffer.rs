use super::error::EncodeError;
use super::format::PixelFormat;
use super::traits::PixelWord;

/// A rectangle in framebuffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the rectangle lies inside a `width`x`height` area at the origin.
    pub fn fits_in(&self, width: usize, height: usize) -> bool {
        self.x
            .checked_add(self.width)
            .map_or(false, |right| right <= width)
            && self
                .y
                .checked_add(self.height)
                .map_or(false, |bottom| bottom <= height)
    }

    /// Splits the rectangle into tiles of at most `tile_width`x`tile_height`
    /// pixels, in row-major order. Tiles on the right and bottom edges are clipped.
    ///
    /// # Panics
    ///
    /// Panics if either tile side is 0.
    pub fn tiles(&self, tile_width: usize, tile_height: usize) -> impl Iterator<Item = Rect> {
        assert!(tile_width > 0 && tile_height > 0, "Tiles cannot be empty!");
        let rect = *self;

        (0..rect.height).step_by(tile_height).flat_map(move |dy| {
            (0..rect.width).step_by(tile_width).map(move |dx| Rect {
                x: rect.x + dx,
                y: rect.y + dy,
                width: tile_width.min(rect.width - dx),
                height: tile_height.min(rect.height - dy),
            })
        })
    }
}

/// A read-only view over a caller-owned framebuffer.
///
/// Rows are `stride` bytes apart; each row holds `width` pixels of
/// `format.bytes_per_pixel()` bytes.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PixelBuffer<'a> {
    /// Constructs a view over `data`, checking that the geometry and the
    /// pixel format are consistent.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<PixelBuffer<'a>, EncodeError> {
        format.validate()?;

        let row_length = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(EncodeError::InvalidDimensions { width, height })?;
        if width == 0 || height == 0 || stride < row_length {
            return Err(EncodeError::InvalidDimensions { width, height });
        }

        let expected = stride
            .checked_mul(height)
            .ok_or(EncodeError::InvalidDimensions { width, height })?;
        if data.len() < expected {
            return Err(EncodeError::BufferTooSmall {
                expected,
                got: data.len(),
            });
        }

        Ok(PixelBuffer {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Constructs a view over tightly packed rows.
    pub fn packed(
        data: &'a [u8],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<PixelBuffer<'a>, EncodeError> {
        let stride = width.saturating_mul(format.bytes_per_pixel());
        PixelBuffer::new(data, width, height, stride, format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Returns the rectangle covering the whole buffer.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Returns the value of the pixel at the given position, in the buffer's format.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        assert!(x < self.width && y < self.height, "Pixel out of bounds!");
        let offset = y * self.stride + x * self.format.bytes_per_pixel();
        self.format.read_pixel(&self.data[offset..])
    }
}

/// A block of working pixels, row-major, `width` pixels per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

impl<P> Tile<P>
where
    P: PixelWord,
{
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, pixels: Vec<P>) -> Tile<P> {
        assert_eq!(
            pixels.len(),
            width * height,
            "The pixel count does not match the tile dimensions!"
        );
        Tile {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, x: usize, y: usize) -> P {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }
}

/// Reads a rectangle of the buffer into a tile of working pixels in the
/// `target` format.
///
/// The caller guarantees that `rect` lies inside the buffer and that the
/// buffer's format can be converted to `target`.
pub fn read_tile<P>(buffer: &PixelBuffer, rect: Rect, target: &PixelFormat) -> Tile<P>
where
    P: PixelWord,
{
    let source = buffer.format();
    let mut pixels = Vec::with_capacity(rect.area());
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let value = target.convert_from(source, buffer.pixel(x, y));
            pixels.push(P::from_u32(value));
        }
    }
    Tile::new(rect.width, rect.height, pixels)
}
