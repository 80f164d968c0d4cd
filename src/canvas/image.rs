use super::*;
use crate::util::Array2d;
use crate::{MatrixError, Result};

/// An owned, in-memory pixel buffer.
///
/// An `Image` is a [`Canvas`] in its own right, so it can be drawn on offline and then blitted
/// onto a matrix canvas with [`Canvas::draw_image`].
///
/// ```
/// use rgbmatrix::{Canvas as _, Color, Image};
///
/// let sprite = Image::from_pixels(2, 1, vec![Color::RED, Color::GREEN])?;
/// let mut target = Image::new(4, 4);
/// target.draw_image(3, 0, &sprite);
/// assert_eq!(target.pixel(3, 0), Color::RED);
///
/// // too few pixels for a 2x2 image
/// assert!(Image::from_pixels(2, 2, vec![Color::RED]).is_err());
/// # Ok::<(), rgbmatrix::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Array2d<Color>,
}

impl Image {
    /// A black image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Array2d::new(width, height),
        }
    }

    /// Build an image from row-major pixels. `pixels` must hold exactly `width * height` colors
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let actual = pixels.len();
        Array2d::from_vec(width, height, pixels)
            .map(|pixels| Self { pixels })
            .ok_or(MatrixError::OutOfBounds {
                required: width as usize * height as usize,
                actual,
            })
    }

    /// Build an image from packed 8-bit RGB triples, row-major, like raw `.rgb` files
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let required = width as usize * height as usize;
        if bytes.len() != required * 3 {
            return Err(MatrixError::OutOfBounds {
                required,
                actual: bytes.len() / 3,
            });
        }

        let pixels = bytes
            .chunks_exact(3)
            .map(|rgb| match *rgb {
                [r, g, b] => Color::new(r, g, b),
                _ => Color::BLACK,
            })
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// The pixels, row-major
    pub fn as_slice(&self) -> &[Color] {
        self.pixels.as_slice()
    }

    /// Number of pixels that aren't black
    pub fn lit_pixels(&self) -> usize {
        self.as_slice()
            .iter()
            .filter(|&&color| color != Color::BLACK)
            .count()
    }
}

impl From<Array2d<Color>> for Image {
    fn from(pixels: Array2d<Color>) -> Self {
        Self { pixels }
    }
}

fn index(x: i32, y: i32) -> Option<(u32, u32)> {
    Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

impl Canvas for Image {
    fn size(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(slot) = index(x, y).and_then(|(x, y)| self.pixels.get_mut(x, y)) {
            *slot = color;
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        index(x, y)
            .and_then(|(x, y)| self.pixels.get(x, y))
            .copied()
            .unwrap_or(Color::BLACK)
    }

    fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_bytes_are_unpacked_row_major() {
        let bytes = [255, 0, 0, 0, 255, 0, 0, 0, 255, 1, 2, 3];
        let image = Image::from_rgb_bytes(2, 2, &bytes).unwrap();
        assert_eq!(image.pixel(1, 0), Color::GREEN);
        assert_eq!(image.pixel(0, 1), Color::BLUE);
        assert_eq!(image.pixel(1, 1), Color::new(1, 2, 3));
    }

    #[test]
    fn rgb_bytes_must_match_size() {
        assert!(matches!(
            Image::from_rgb_bytes(2, 2, &[0; 11]),
            Err(MatrixError::OutOfBounds {
                required: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn blit_clips_at_negative_offsets() {
        let mut sprite = Image::new(3, 3);
        sprite.fill(Color::MAGENTA);
        let mut target = Image::new(4, 4);
        target.draw_image(-2, -1, &sprite);
        assert_eq!(target.lit_pixels(), 2);
        assert_eq!(target.pixel(0, 1), Color::MAGENTA);
    }
}
