use super::*;
use crate::{MatrixError, Result};

/// A rectangular grid of pixels that can be drawn on.
///
/// Implementors only provide the single-pixel primitives; every shape is rasterized on top of
/// [`Canvas::set_pixel`] by the default methods, so it works the same on the live matrix, on
/// an offscreen buffer, and on an in-memory [`Image`].
///
/// Coordinates are signed. Pixels outside the canvas are silently dropped, so shapes may hang
/// over the edges.
///
/// ```
/// use rgbmatrix::{Canvas, Color, Image};
///
/// fn frame(canvas: &mut impl Canvas) {
///     let (width, height) = canvas.size();
///     canvas.draw_rect(0, 0, width, height, Color::BLUE);
///     canvas.draw_circle(width as i32 / 2, height as i32 / 2, 5, Color::YELLOW);
/// }
///
/// // The above function works with any canvas, including the one of a real matrix
/// let mut image = Image::new(16, 16);
/// frame(&mut image);
/// assert_eq!(image.pixel(0, 15), Color::BLUE);
/// assert_eq!(image.pixel(13, 8), Color::YELLOW);
/// ```
pub trait Canvas {
    // These are the methods that _need_ to be implemented by the implementor

    /// Width and height in pixels
    fn size(&self) -> (u32, u32);
    /// Set a single pixel. Out-of-range coordinates are ignored
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
    /// Read a single pixel. Out-of-range coordinates read as black
    fn pixel(&self, x: i32, y: i32) -> Color;

    // These are default implementations that you get for free

    /// Set every pixel to black
    fn clear(&mut self) {
        self.fill(Color::BLACK);
    }

    fn width(&self) -> u32 {
        self.size().0
    }

    fn height(&self) -> u32 {
        self.size().1
    }

    /// Check if the location is in bounds
    fn contains(&self, x: i32, y: i32) -> bool {
        let (width, height) = self.size();
        x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
    }

    /// Returns the color at the given position, or None if out of bounds
    fn get(&self, x: i32, y: i32) -> Option<Color> {
        if self.contains(x, y) {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Set every pixel to `color`, one pixel at a time
    fn fill(&mut self, color: Color) {
        for (x, y) in self.iter() {
            self.set_pixel(x, y, color);
        }
    }

    /// Draw a straight line from (x0, y0) to (x1, y1), both ends included, with Bresenham's
    /// algorithm. Only the steps along the major axis that land on the canvas are visited, so
    /// endpoints far outside the canvas are cheap
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (width, height) = self.size();
        let (dx, dy) = (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0));

        if dx.abs() >= dy.abs() {
            for (x, y) in line_steps(x0, y0, dx, dy, width) {
                self.set_pixel(x, y, color);
            }
        } else {
            for (y, x) in line_steps(y0, x0, dy, dx, height) {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Draw the outline of a circle with the midpoint algorithm. A negative radius draws
    /// nothing, a radius of 0 draws the center pixel
    fn draw_circle(&mut self, x0: i32, y0: i32, radius: i32, color: Color) {
        for_each_octant_point(radius, |x, y| {
            for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
                // saturated coordinates are off the canvas
                self.set_pixel(x0.saturating_add(dx), y0.saturating_add(dy), color);
            }
        });
    }

    /// Draw a filled disc, the area [`Canvas::draw_circle`] outlines
    fn fill_circle(&mut self, x0: i32, y0: i32, radius: i32, color: Color) {
        for_each_octant_point(radius, |x, y| {
            for (half_width, dy) in [(x, y), (x, -y), (y, x), (y, -x)] {
                let row = match y0.checked_add(dy) {
                    Some(row) => row,
                    None => continue,
                };
                let left = (i64::from(x0) - i64::from(half_width)).max(-1);
                let right = i64::from(x0) + i64::from(half_width);
                let span = u32::try_from(right - left + 1).unwrap_or(u32::MAX);
                self.fill_rect(left as i32, row, span, 1, color);
            }
        });
    }

    /// Draw the one pixel wide outline of a `width`×`height` rectangle with its top left corner
    /// at (x, y)
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        if width == 0 || height == 0 {
            return;
        }
        let right = i64::from(x) + i64::from(width) - 1;
        let bottom = i64::from(y) + i64::from(height) - 1;

        self.fill_rect(x, y, width, 1, color);
        self.fill_rect(x, y, 1, height, color);
        // edges beyond the coordinate range are off the canvas anyway
        if let Ok(bottom) = i32::try_from(bottom) {
            self.fill_rect(x, bottom, width, 1, color);
        }
        if let Ok(right) = i32::try_from(right) {
            self.fill_rect(right, y, 1, height, color);
        }
    }

    /// Fill a `width`×`height` rectangle with its top left corner at (x, y). Only the part that
    /// overlaps the canvas is visited
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let (canvas_width, canvas_height) = self.size();
        let clip = |start: i32, len: u32, limit: u32| {
            let from = i64::from(start).max(0);
            let to = (i64::from(start) + i64::from(len)).min(i64::from(limit));
            from as i32..to.max(from) as i32
        };

        for py in clip(y, height, canvas_height) {
            for px in clip(x, width, canvas_width) {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Copy a `width`×`height` block of row-major `colors` onto the canvas, top left corner at
    /// (x, y).
    ///
    /// Fails with [`MatrixError::OutOfBounds`] if `colors` holds fewer than `width * height`
    /// pixels; nothing is drawn in that case. Extra pixels are ignored.
    fn set_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        colors: &[Color],
    ) -> Result<()> {
        let required = (width as usize).checked_mul(height as usize).unwrap_or(usize::MAX);
        if colors.len() < required {
            return Err(MatrixError::OutOfBounds {
                required,
                actual: colors.len(),
            });
        }
        if required == 0 {
            return Ok(());
        }

        for (row, line) in colors.chunks(width as usize).take(height as usize).enumerate() {
            let py = match offset(y, row) {
                Some(py) => py,
                None => break,
            };
            for (column, &color) in line.iter().enumerate() {
                match offset(x, column) {
                    Some(px) => self.set_pixel(px, py, color),
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// Blit an image onto the canvas with its top left corner at (x, y), clipping whatever
    /// doesn't fit
    fn draw_image(&mut self, x: i32, y: i32, image: &Image) {
        for (ix, iy) in image.iter() {
            if let (Some(px), Some(py)) = (offset(x, ix as usize), offset(y, iy as usize)) {
                self.set_pixel(px, py, image.pixel(ix, iy));
            }
        }
    }

    /// An iterator over the coordinates of every pixel of the canvas, row by row.
    ///
    /// For example, to dim the whole canvas:
    /// ```
    /// # use rgbmatrix::{Canvas as _, Color, Image};
    /// # let mut canvas = Image::new(4, 4);
    /// # canvas.fill(Color::WHITE);
    /// for (x, y) in canvas.iter() {
    ///     let dimmed = canvas.pixel(x, y) * 0.5;
    ///     canvas.set_pixel(x, y, dimmed);
    /// }
    /// # assert_eq!(canvas.pixel(3, 3), Color::new(128, 128, 128));
    /// ```
    fn iter(&self) -> CanvasIterator {
        let (width, height) = self.size();
        CanvasIterator::new(width, height)
    }
}

/// `base + delta`, or None if that leaves the coordinate range
fn offset(base: i32, delta: usize) -> Option<i32> {
    i32::try_from(delta).ok().and_then(|delta| base.checked_add(delta))
}

/// The points of a line starting at (major0, minor0) that advances `d_major` along its major
/// axis and `d_minor` along the other one, with |d_minor| <= |d_major|. Only steps whose major
/// coordinate lies in `0..extent` are produced.
///
/// Step k sits at minor offset round(k * d_minor / d_major), halves rounding away from the
/// start, which is where Bresenham's algorithm puts it.
fn line_steps(
    major0: i32,
    minor0: i32,
    d_major: i64,
    d_minor: i64,
    extent: u32,
) -> impl Iterator<Item = (i32, i32)> {
    let (major0, minor0) = (i64::from(major0), i64::from(minor0));
    let (run, rise) = (d_major.abs(), d_minor.abs());
    let step = if d_major < 0 { -1 } else { 1 };
    let minor_step = if d_minor < 0 { -1 } else { 1 };

    // steps k in 0..=run with 0 <= major0 + step * k < extent
    let last_on_canvas = i64::from(extent) - 1;
    let (first, last) = if step > 0 {
        (-major0, last_on_canvas - major0)
    } else {
        (major0 - last_on_canvas, major0)
    };
    let (first, last) = (first.max(0), last.min(run));

    (first..=last).filter_map(move |k| {
        let minor_offset = if run == 0 {
            0
        } else {
            (2 * i128::from(k) * i128::from(rise) + i128::from(run)) / (2 * i128::from(run))
        };
        let major = i32::try_from(major0 + step * k).ok()?;
        let minor = i32::try_from(i128::from(minor0) + i128::from(minor_step) * minor_offset).ok()?;
        Some((major, minor))
    })
}

/// Walks the first octant of a midpoint circle, handing out (x, y) with x >= y
fn for_each_octant_point(radius: i32, mut f: impl FnMut(i32, i32)) {
    let mut x = i64::from(radius);
    let mut y = 0i64;
    let mut error = 1 - x;
    while y <= x {
        // x and y stay within 0..=radius
        f(x as i32, y as i32);
        y += 1;
        if error < 0 {
            error += 2 * y + 1;
        } else {
            x -= 1;
            error += 2 * (y - x + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(image: &Image) -> Vec<(i32, i32)> {
        image
            .iter()
            .filter(|&(x, y)| image.pixel(x, y) != Color::BLACK)
            .collect()
    }

    #[test]
    fn line_covers_both_ends() {
        let mut image = Image::new(8, 8);
        image.draw_line(6, 1, 1, 3, Color::RED);
        let pixels = lit(&image);
        assert!(pixels.contains(&(6, 1)));
        assert!(pixels.contains(&(1, 3)));
        // one pixel per column for a shallow line
        assert_eq!(pixels.len(), 6);
    }

    #[test]
    fn vertical_and_point_lines() {
        let mut image = Image::new(4, 4);
        image.draw_line(2, 3, 2, 0, Color::RED);
        assert_eq!(lit(&image), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);

        let mut image = Image::new(4, 4);
        image.draw_line(1, 1, 1, 1, Color::RED);
        assert_eq!(lit(&image), vec![(1, 1)]);
    }

    #[test]
    fn circle_outline_is_symmetric() {
        let mut image = Image::new(11, 11);
        image.draw_circle(5, 5, 3, Color::GREEN);
        let pixels = lit(&image);

        for &(x, y) in &pixels {
            assert!(pixels.contains(&(10 - x, y)));
            assert!(pixels.contains(&(x, 10 - y)));
            assert!(pixels.contains(&(y, x)));
        }
        assert!(pixels.contains(&(8, 5)));
        assert!(pixels.contains(&(5, 2)));
        assert!(!pixels.contains(&(5, 5)));
    }

    #[test]
    fn degenerate_circles() {
        let mut image = Image::new(3, 3);
        image.draw_circle(1, 1, 0, Color::GREEN);
        assert_eq!(lit(&image), vec![(1, 1)]);

        let mut image = Image::new(3, 3);
        image.draw_circle(1, 1, -2, Color::GREEN);
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn huge_circles_are_clipped() {
        let mut image = Image::new(4, 4);
        image.fill_circle(0, 0, 1_000_000, Color::WHITE);
        assert_eq!(lit(&image).len(), 16);

        let mut image = Image::new(4, 4);
        image.draw_circle(i32::MAX, i32::MIN, 1000, Color::WHITE);
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn filled_circle_contains_outline() {
        let mut outline = Image::new(11, 11);
        outline.draw_circle(5, 5, 4, Color::WHITE);
        let mut disc = Image::new(11, 11);
        disc.fill_circle(5, 5, 4, Color::WHITE);

        let disc_pixels = lit(&disc);
        for pixel in lit(&outline) {
            assert!(disc_pixels.contains(&pixel));
        }
        assert!(disc_pixels.contains(&(5, 5)));
        assert!(!disc_pixels.contains(&(1, 1)));
    }

    #[test]
    fn rect_fill_clips() {
        let mut image = Image::new(4, 4);
        image.fill_rect(-2, 2, 4, 10, Color::BLUE);
        assert_eq!(lit(&image), vec![(0, 2), (1, 2), (0, 3), (1, 3)]);

        let mut image = Image::new(4, 4);
        image.fill_rect(10, 10, u32::MAX, u32::MAX, Color::BLUE);
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn huge_rect_outline_is_clipped() {
        let mut image = Image::new(4, 4);
        image.draw_rect(-5, -5, u32::MAX, 3, Color::RED);
        // only the bottom edge, at y = -3, would be near the canvas, and it's above it
        assert!(lit(&image).is_empty());

        let mut image = Image::new(4, 4);
        image.draw_rect(1, 2, u32::MAX, u32::MAX, Color::RED);
        assert_eq!(lit(&image), vec![(1, 2), (2, 2), (3, 2), (1, 3)]);

        let mut image = Image::new(4, 4);
        image.draw_rect(i32::MIN, i32::MIN, u32::MAX, u32::MAX, Color::RED);
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn far_away_lines_are_clipped() {
        let mut image = Image::new(4, 4);
        image.draw_line(i32::MIN, 1, i32::MAX, 1, Color::GREEN);
        assert_eq!(lit(&image), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);

        let mut image = Image::new(4, 4);
        image.draw_line(2, i32::MAX, 2, i32::MIN, Color::GREEN);
        assert_eq!(lit(&image), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);

        let mut image = Image::new(4, 4);
        image.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color::GREEN);
        assert_eq!(lit(&image), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn line_matches_bresenham() {
        let mut image = Image::new(8, 4);
        image.draw_line(0, 0, 7, 3, Color::RED);
        assert_eq!(
            lit(&image),
            vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2), (6, 3), (7, 3)]
        );

        // drawn backwards, the same pixels
        let mut reversed = Image::new(8, 4);
        reversed.draw_line(7, 3, 0, 0, Color::RED);
        assert_eq!(lit(&reversed), lit(&image));
    }

    #[test]
    fn blits_near_the_coordinate_limit() {
        let mut sprite = Image::new(2, 2);
        sprite.fill(Color::WHITE);
        let mut image = Image::new(4, 4);
        image.draw_image(i32::MAX, i32::MAX, &sprite);
        image.set_pixels(i32::MAX, 0, 2, 1, &[Color::RED; 2]).unwrap();
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn rect_outline() {
        let mut image = Image::new(5, 5);
        image.draw_rect(1, 1, 3, 3, Color::BLUE);
        assert_eq!(lit(&image).len(), 8);
        assert_eq!(image.pixel(2, 2), Color::BLACK);

        image.draw_rect(0, 0, 0, 4, Color::RED);
        assert_eq!(image.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn set_pixels_checks_length() {
        let mut image = Image::new(4, 4);
        let colors = [Color::RED; 5];
        let result = image.set_pixels(0, 0, 3, 2, &colors);
        assert!(matches!(
            result,
            Err(MatrixError::OutOfBounds {
                required: 6,
                actual: 5
            })
        ));
        assert!(lit(&image).is_empty());

        let colors = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        image.set_pixels(3, 1, 2, 2, &colors).unwrap();
        assert_eq!(image.pixel(3, 1), Color::RED);
        assert_eq!(image.pixel(3, 2), Color::BLUE);
        // the other column lands outside
        assert_eq!(lit(&image).len(), 2);
    }

    #[test]
    fn fill_then_clear() {
        let mut image = Image::new(3, 2);
        image.fill(Color::CYAN);
        assert_eq!(lit(&image).len(), 6);
        image.clear();
        assert!(lit(&image).is_empty());
    }

    #[test]
    fn get_is_bounds_checked() {
        let image = Image::new(3, 2);
        assert_eq!(image.get(2, 1), Some(Color::BLACK));
        assert_eq!(image.get(3, 1), None);
        assert_eq!(image.get(-1, 0), None);
    }
}
