use std::path::{Path, PathBuf};

use crate::{Color, Driver, MatrixCanvas, MatrixError, Result};

/// Which way [`Font::draw`] lays out a text
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Left to right, glyphs sharing one baseline
    #[default]
    Horizontal,
    /// Top to bottom, one glyph per line
    Vertical,
}

/// A BDF font loaded by the driver.
///
/// The font has to come from the same driver as the canvases it draws on. The native font is
/// freed when this value is dropped.
///
/// ```no_run
/// use rgbmatrix::{Color, Font, Matrix, SoftwareDriver};
///
/// let driver = SoftwareDriver::new();
/// let matrix = Matrix::new(driver.clone(), 32, 2, 1)?;
/// let font = Font::load(driver, "fonts/7x13.bdf")?;
///
/// let mut canvas = matrix.canvas()?;
/// let width = font.draw_text(&mut canvas, 1, font.baseline(), Color::YELLOW, "Hello", 0)?;
/// println!("Text is {} pixels wide", width);
/// # Ok::<(), rgbmatrix::MatrixError>(())
/// ```
#[derive(Debug)]
pub struct Font<D: Driver> {
    driver: D,
    handle: D::FontHandle,
    path: PathBuf,
}

impl<D: Driver> Font<D> {
    /// Load a font from a `.bdf` file
    pub fn load(driver: D, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let handle = match driver.load_font(path) {
            Some(handle) => handle,
            None => {
                log::warn!("Native driver couldn't load font {}", path.display());
                return Err(MatrixError::InvalidArgument(format!(
                    "font from {}",
                    path.display()
                )));
            }
        };
        log::debug!("Loaded font {} as {:?}", path.display(), handle);

        Ok(Self {
            driver,
            handle,
            path: path.to_owned(),
        })
    }

    /// Distance from the top of a line to the baseline, in pixels
    pub fn baseline(&self) -> i32 {
        self.driver.font_baseline(self.handle)
    }

    /// Line height in pixels
    pub fn height(&self) -> i32 {
        self.driver.font_height(self.handle)
    }

    /// The file this font was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> D::FontHandle {
        self.handle
    }

    /// Draw `text` left to right with its baseline at `y`, adding `spacing` pixels after every
    /// glyph. Returns how far the text advanced horizontally.
    ///
    /// Characters the font has no glyph for take up no space. Fails with
    /// [`MatrixError::InteriorNul`] if `text` contains a NUL character.
    pub fn draw_text(
        &self,
        canvas: &mut MatrixCanvas<'_, D>,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        self.draw(canvas, x, y, color, text, spacing, TextDirection::Horizontal)
    }

    /// Like [`Self::draw_text`], but stacks the glyphs top to bottom, `y` being the baseline of
    /// the first one. Returns how far the text advanced vertically
    pub fn draw_text_vertical(
        &self,
        canvas: &mut MatrixCanvas<'_, D>,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        self.draw(canvas, x, y, color, text, spacing, TextDirection::Vertical)
    }

    /// Draw `text` in the given direction. Fails with [`MatrixError::InvalidArgument`] if the
    /// canvas belongs to a different driver than this font
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut MatrixCanvas<'_, D>,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
        direction: TextDirection,
    ) -> Result<i32> {
        let driver = canvas.driver();
        let canvas = canvas.handle();
        if !self.driver.same_instance(driver) {
            log::warn!("Font {} can't draw on {:?} of another driver", self.path.display(), canvas);
            return Err(MatrixError::InvalidArgument(format!(
                "text on {:?} with font {}, which was loaded by another driver",
                canvas,
                self.path.display()
            )));
        }
        match direction {
            TextDirection::Horizontal => {
                driver.draw_text(canvas, self.handle, x, y, color, text, spacing)
            }
            TextDirection::Vertical => {
                driver.vertical_draw_text(canvas, self.handle, x, y, color, text, spacing)
            }
        }
    }
}

impl<D: Driver> Drop for Font<D> {
    fn drop(&mut self) {
        log::debug!("Deleting font {}", self.path.display());
        self.driver.delete_font(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::software::TEST_FONT;
    use crate::{Canvas as _, Matrix, SoftwareDriver};

    fn load(driver: &SoftwareDriver, dir: &tempfile::TempDir) -> Font<SoftwareDriver> {
        let path = dir.path().join("tiny.bdf");
        std::fs::write(&path, TEST_FONT).unwrap();
        Font::load(driver.clone(), &path).unwrap()
    }

    #[test]
    fn metrics() {
        let dir = tempfile::tempdir().unwrap();
        let font = load(&SoftwareDriver::new(), &dir);
        assert_eq!(font.height(), 6);
        assert_eq!(font.baseline(), 5);
        assert!(font.path().ends_with("tiny.bdf"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bdf");
        match Font::load(SoftwareDriver::new(), &path) {
            Err(MatrixError::InvalidArgument(what)) => assert!(what.contains("nope.bdf")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn drop_frees_the_font() {
        let dir = tempfile::tempdir().unwrap();
        let driver = SoftwareDriver::new();
        let font = load(&driver, &dir);
        assert_eq!(driver.loaded_fonts(), 1);
        drop(font);
        assert_eq!(driver.loaded_fonts(), 0);
    }

    #[test]
    fn both_directions_draw() {
        let dir = tempfile::tempdir().unwrap();
        let driver = SoftwareDriver::new();
        let font = load(&driver, &dir);
        let matrix = Matrix::new(driver.clone(), 32, 1, 1).unwrap();
        let mut canvas = matrix.canvas().unwrap();

        let advance = font
            .draw_text(&mut canvas, 0, font.baseline(), Color::RED, "II", 2)
            .unwrap();
        assert_eq!(advance, 12);
        // "I" is one column wide, one pixel in from the glyph's left edge
        assert_eq!(canvas.pixel(1, 0), Color::RED);
        assert_eq!(canvas.pixel(7, 4), Color::RED);
        assert_eq!(canvas.pixel(0, 0), Color::BLACK);

        canvas.clear();
        let advance = font
            .draw_text_vertical(&mut canvas, 0, font.baseline(), Color::GREEN, "II", 0)
            .unwrap();
        assert_eq!(advance, 12);
        assert_eq!(canvas.pixel(1, 6), Color::GREEN);
        assert_eq!(canvas.pixel(5, 0), Color::BLACK);
    }

    #[test]
    fn nul_in_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let driver = SoftwareDriver::new();
        let font = load(&driver, &dir);
        let matrix = Matrix::new(driver, 32, 1, 1).unwrap();
        let mut canvas = matrix.canvas().unwrap();

        let result = canvas.draw_text(&font, 0, 5, Color::WHITE, "I\0I", 0);
        assert!(matches!(result, Err(MatrixError::InteriorNul(_))));
    }

    #[test]
    fn font_of_another_driver_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let font = load(&SoftwareDriver::new(), &dir);
        let other = SoftwareDriver::new();
        let matrix = Matrix::new(other.clone(), 32, 1, 1).unwrap();
        let mut canvas = matrix.canvas().unwrap();

        let result = font.draw_text(&mut canvas, 0, 5, Color::WHITE, "I", 0);
        assert!(matches!(result, Err(MatrixError::InvalidArgument(_))));
        assert_eq!(other.displayed_frame(matrix.handle()).lit_pixels(), 0);
    }
}
