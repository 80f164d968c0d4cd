use std::cell::RefCell;
use std::rc::Rc;

use super::Driver;
use crate::util::Array2d;
use crate::{Color, Image, MatrixOptions, Result};

mod bdf;
mod mapper;

use bdf::BdfFont;
#[cfg(test)]
pub(crate) use bdf::TEST_FONT;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SoftwareMatrix(usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SoftwareCanvas(usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SoftwareFont(usize);

struct MatrixState {
    options: MatrixOptions,
    brightness: u8,
    live: SoftwareCanvas,
    /// Every canvas owned by this matrix, including the live one
    canvases: Vec<SoftwareCanvas>,
    swaps: u64,
}

#[derive(Default)]
struct State {
    matrices: Vec<Option<MatrixState>>,
    canvases: Vec<Option<Array2d<Color>>>,
    fonts: Vec<Option<BdfFont>>,
}

impl State {
    fn matrix(&self, matrix: SoftwareMatrix) -> &MatrixState {
        match self.matrices.get(matrix.0) {
            Some(Some(state)) => state,
            _ => panic!("{:?} used after it was deleted", matrix),
        }
    }

    fn matrix_mut(&mut self, matrix: SoftwareMatrix) -> &mut MatrixState {
        match self.matrices.get_mut(matrix.0) {
            Some(Some(state)) => state,
            _ => panic!("{:?} used after it was deleted", matrix),
        }
    }

    fn canvas(&self, canvas: SoftwareCanvas) -> &Array2d<Color> {
        match self.canvases.get(canvas.0) {
            Some(Some(pixels)) => pixels,
            _ => panic!("{:?} used after its matrix was deleted", canvas),
        }
    }

    fn canvas_mut(&mut self, canvas: SoftwareCanvas) -> &mut Array2d<Color> {
        match self.canvases.get_mut(canvas.0) {
            Some(Some(pixels)) => pixels,
            _ => panic!("{:?} used after its matrix was deleted", canvas),
        }
    }

    fn font(&self, font: SoftwareFont) -> &BdfFont {
        match self.fonts.get(font.0) {
            Some(Some(font)) => font,
            _ => panic!("{:?} used after it was deleted", font),
        }
    }

    fn new_canvas(&mut self, width: u32, height: u32) -> SoftwareCanvas {
        self.canvases.push(Some(Array2d::new(width, height)));
        SoftwareCanvas(self.canvases.len() - 1)
    }
}

/// Canvases larger than this are refused instead of allocated
const MAX_PIXELS: u64 = 1 << 24;

/// Size of the canvas the options describe, after pixel mapping
fn canvas_size(options: &MatrixOptions) -> Result<(u32, u32)> {
    let too_large = || {
        crate::MatrixError::InvalidOptions(format!(
            "{} columns x {} panels by {} rows x {} chains is too large",
            options.cols, options.chain_length, options.rows, options.parallel
        ))
    };

    let width = options.cols.checked_mul(options.chain_length).ok_or_else(too_large)?;
    let height = options.rows.checked_mul(options.parallel).ok_or_else(too_large)?;
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(too_large());
    }

    mapper::mapped_size(&options.pixel_mapper_config, width, height, options.chain_length)
}

fn pixel_index(pixels: &Array2d<Color>, x: i32, y: i32) -> Option<(u32, u32)> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    if x < pixels.width() && y < pixels.height() {
        Some((x, y))
    } else {
        None
    }
}

/// An in-memory implementation of the driver interface.
///
/// Matrices are plain pixel buffers: no GPIO is touched, and brightness is recorded but not
/// applied to pixel values. Options and `--led-*` flags are validated the way the native library
/// validates them, so a configuration that works here has the right shape for the hardware.
///
/// Cloning the driver is cheap; clones share the same state.
///
/// ```
/// use rgbmatrix::{Canvas as _, Color, Matrix, SoftwareDriver};
///
/// let driver = SoftwareDriver::new();
/// let matrix = Matrix::new(driver.clone(), 16, 2, 1)?;
///
/// let mut canvas = matrix.offscreen_canvas()?;
/// canvas.draw_line(0, 0, 63, 15, Color::RED);
/// matrix.swap_on_vsync(canvas)?;
///
/// let frame = driver.displayed_frame(matrix.handle());
/// assert_eq!(frame.pixel(63, 15), Color::RED);
/// # Ok::<(), rgbmatrix::MatrixError>(())
/// ```
#[derive(Clone, Default)]
pub struct SoftwareDriver {
    state: Rc<RefCell<State>>,
}

impl std::fmt::Debug for SoftwareDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareDriver")
            .field("live_matrices", &self.live_matrices())
            .field("live_canvases", &self.live_canvases())
            .field("loaded_fonts", &self.loaded_fonts())
            .finish()
    }
}

impl SoftwareDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matrices that were created and not yet deleted
    pub fn live_matrices(&self) -> usize {
        self.state.borrow().matrices.iter().flatten().count()
    }

    /// Number of canvases, live and offscreen, across all matrices
    pub fn live_canvases(&self) -> usize {
        self.state.borrow().canvases.iter().flatten().count()
    }

    /// Number of fonts that were loaded and not yet deleted
    pub fn loaded_fonts(&self) -> usize {
        self.state.borrow().fonts.iter().flatten().count()
    }

    /// The options a matrix was created with, after command-line overrides
    pub fn matrix_options(&self, matrix: SoftwareMatrix) -> MatrixOptions {
        self.state.borrow().matrix(matrix).options.clone()
    }

    /// How often the matrix swapped canvases
    pub fn swap_count(&self, matrix: SoftwareMatrix) -> u64 {
        self.state.borrow().matrix(matrix).swaps
    }

    /// A copy of what the matrix is currently displaying
    pub fn displayed_frame(&self, matrix: SoftwareMatrix) -> Image {
        let state = self.state.borrow();
        let live = state.matrix(matrix).live;
        Image::from(state.canvas(live).clone())
    }
}

impl Driver for SoftwareDriver {
    type MatrixHandle = SoftwareMatrix;
    type CanvasHandle = SoftwareCanvas;
    type FontHandle = SoftwareFont;

    fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn create_matrix(&self, rows: u32, chain_length: u32, parallel: u32) -> Option<SoftwareMatrix> {
        self.create_matrix_from_options(
            &MatrixOptions::with_geometry(rows, chain_length, parallel),
            &[],
        )
    }

    fn create_matrix_from_options(
        &self,
        options: &MatrixOptions,
        args: &[String],
    ) -> Option<SoftwareMatrix> {
        let mut options = options.clone();
        let checked = options
            .apply_flags(args)
            .and_then(|_unconsumed| options.validate())
            .and_then(|()| canvas_size(&options));
        let (width, height) = match checked {
            Ok(size) => size,
            Err(e) => {
                log::warn!("Software matrix refused: {}", e);
                return None;
            }
        };

        let mut state = self.state.borrow_mut();
        let live = state.new_canvas(width, height);
        state.matrices.push(Some(MatrixState {
            brightness: options.brightness,
            options,
            live,
            canvases: vec![live],
            swaps: 0,
        }));
        Some(SoftwareMatrix(state.matrices.len() - 1))
    }

    fn delete_matrix(&self, matrix: SoftwareMatrix) {
        let mut state = self.state.borrow_mut();
        let removed = state.matrices.get_mut(matrix.0).and_then(Option::take);
        match removed {
            Some(removed) => {
                for canvas in removed.canvases {
                    if let Some(slot) = state.canvases.get_mut(canvas.0) {
                        *slot = None;
                    }
                }
            }
            None => log::warn!("{:?} deleted twice", matrix),
        }
    }

    fn matrix_canvas(&self, matrix: SoftwareMatrix) -> Option<SoftwareCanvas> {
        Some(self.state.borrow().matrix(matrix).live)
    }

    fn create_offscreen_canvas(&self, matrix: SoftwareMatrix) -> Option<SoftwareCanvas> {
        let mut state = self.state.borrow_mut();
        let (width, height) = {
            let live = state.canvas(state.matrix(matrix).live);
            (live.width(), live.height())
        };
        let canvas = state.new_canvas(width, height);
        state.matrix_mut(matrix).canvases.push(canvas);
        Some(canvas)
    }

    fn swap_on_vsync(&self, matrix: SoftwareMatrix, canvas: SoftwareCanvas) -> SoftwareCanvas {
        let mut state = self.state.borrow_mut();
        let matrix = state.matrix_mut(matrix);
        if !matrix.canvases.contains(&canvas) {
            log::warn!("{:?} doesn't belong to this matrix, not swapping", canvas);
            return canvas;
        }
        matrix.swaps += 1;
        log::trace!("Swap #{}, now showing {:?}", matrix.swaps, canvas);
        std::mem::replace(&mut matrix.live, canvas)
    }

    fn brightness(&self, matrix: SoftwareMatrix) -> u8 {
        self.state.borrow().matrix(matrix).brightness
    }

    fn set_brightness(&self, matrix: SoftwareMatrix, brightness: u8) {
        self.state.borrow_mut().matrix_mut(matrix).brightness = brightness;
    }

    fn canvas_size(&self, canvas: SoftwareCanvas) -> (u32, u32) {
        let state = self.state.borrow();
        let pixels = state.canvas(canvas);
        (pixels.width(), pixels.height())
    }

    fn set_pixel(&self, canvas: SoftwareCanvas, x: i32, y: i32, color: Color) {
        let mut state = self.state.borrow_mut();
        let pixels = state.canvas_mut(canvas);
        if let Some((x, y)) = pixel_index(pixels, x, y) {
            if let Some(slot) = pixels.get_mut(x, y) {
                *slot = color;
            }
        }
    }

    fn pixel(&self, canvas: SoftwareCanvas, x: i32, y: i32) -> Color {
        let state = self.state.borrow();
        let pixels = state.canvas(canvas);
        pixel_index(pixels, x, y)
            .and_then(|(x, y)| pixels.get(x, y).copied())
            .unwrap_or(Color::BLACK)
    }

    fn clear_canvas(&self, canvas: SoftwareCanvas) {
        self.state.borrow_mut().canvas_mut(canvas).fill(Color::BLACK);
    }

    fn load_font(&self, path: &std::path::Path) -> Option<SoftwareFont> {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|source| BdfFont::parse(&source));
        let font = match parsed {
            Ok(font) => font,
            Err(e) => {
                log::warn!("Couldn't load font {}: {}", path.display(), e);
                return None;
            }
        };

        let mut state = self.state.borrow_mut();
        state.fonts.push(Some(font));
        Some(SoftwareFont(state.fonts.len() - 1))
    }

    fn delete_font(&self, font: SoftwareFont) {
        let mut state = self.state.borrow_mut();
        if state.fonts.get_mut(font.0).and_then(Option::take).is_none() {
            log::warn!("{:?} deleted twice", font);
        }
    }

    fn font_baseline(&self, font: SoftwareFont) -> i32 {
        self.state.borrow().font(font).baseline()
    }

    fn font_height(&self, font: SoftwareFont) -> i32 {
        self.state.borrow().font(font).height()
    }

    fn draw_text(
        &self,
        canvas: SoftwareCanvas,
        font: SoftwareFont,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        reject_nul(text)?;

        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let font = match state.fonts.get(font.0) {
            Some(Some(font)) => font,
            _ => panic!("{:?} used after it was deleted", font),
        };
        let pixels = match state.canvases.get_mut(canvas.0) {
            Some(Some(pixels)) => pixels,
            _ => panic!("{:?} used after its matrix was deleted", canvas),
        };

        let start_x = x;
        let mut x = x;
        for codepoint in text.chars() {
            x += font.draw_glyph(x, y, codepoint, |px, py| plot(pixels, px, py, color));
            x += spacing;
        }
        Ok(x - start_x)
    }

    fn vertical_draw_text(
        &self,
        canvas: SoftwareCanvas,
        font: SoftwareFont,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        reject_nul(text)?;

        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let font = match state.fonts.get(font.0) {
            Some(Some(font)) => font,
            _ => panic!("{:?} used after it was deleted", font),
        };
        let pixels = match state.canvases.get_mut(canvas.0) {
            Some(Some(pixels)) => pixels,
            _ => panic!("{:?} used after its matrix was deleted", canvas),
        };

        let start_y = y;
        let mut y = y;
        for codepoint in text.chars() {
            font.draw_glyph(x, y, codepoint, |px, py| plot(pixels, px, py, color));
            y += font.height() + spacing;
        }
        Ok(y - start_y)
    }
}

fn plot(pixels: &mut Array2d<Color>, x: i32, y: i32, color: Color) {
    if let Some((x, y)) = pixel_index(pixels, x, y) {
        if let Some(slot) = pixels.get_mut(x, y) {
            *slot = color;
        }
    }
}

/// The native driver can't take strings with NUL bytes; keep the software driver just as strict
fn reject_nul(text: &str) -> Result<()> {
    if text.contains('\0') {
        std::ffi::CString::new(text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("test.bdf");
        std::fs::write(&path, bdf::TEST_FONT).unwrap();
        path
    }

    #[test]
    fn geometry_follows_chain_and_parallel() {
        let driver = SoftwareDriver::new();
        let matrix = driver.create_matrix(16, 3, 2).unwrap();
        let canvas = driver.matrix_canvas(matrix).unwrap();
        assert_eq!(driver.canvas_size(canvas), (96, 32));
    }

    #[test]
    fn flags_override_options() {
        let driver = SoftwareDriver::new();
        let args = vec!["--led-rows=64".to_owned(), "--led-pixel-mapper=Rotate:90".to_owned()];
        let matrix = driver
            .create_matrix_from_options(&MatrixOptions::with_geometry(32, 2, 1), &args)
            .unwrap();
        let canvas = driver.matrix_canvas(matrix).unwrap();
        assert_eq!(driver.canvas_size(canvas), (64, 64));
        assert_eq!(driver.matrix_options(matrix).rows, 64);
    }

    #[test]
    fn invalid_options_give_no_handle() {
        let driver = SoftwareDriver::new();
        assert!(driver.create_matrix(33, 1, 1).is_none());
        assert!(driver
            .create_matrix_from_options(&MatrixOptions::new(), &["--led-chain=x".to_owned()])
            .is_none());
        assert_eq!(driver.live_matrices(), 0);
    }

    #[test]
    fn oversized_geometry_gives_no_handle() {
        let driver = SoftwareDriver::new();
        let overflowing = ["--led-chain=200000000".to_owned()];
        assert!(driver
            .create_matrix_from_options(&MatrixOptions::new(), &overflowing)
            .is_none());

        let mut huge = MatrixOptions::new();
        huge.set_cols(20_000).set_chain_length(20_000);
        assert!(driver.create_matrix_from_options(&huge, &[]).is_none());
        assert_eq!(driver.live_matrices(), 0);
        assert_eq!(driver.live_canvases(), 0);
    }

    #[test]
    fn u_mapper_needs_an_even_chain() {
        let driver = SoftwareDriver::new();
        let mut options = MatrixOptions::new();
        options.set_cols(64).set_pixel_mapper_config("U-mapper");
        assert!(driver.create_matrix_from_options(&options, &[]).is_none());

        options.set_cols(32).set_chain_length(2);
        let matrix = driver.create_matrix_from_options(&options, &[]).unwrap();
        let canvas = driver.matrix_canvas(matrix).unwrap();
        assert_eq!(driver.canvas_size(canvas), (32, 64));
    }

    #[test]
    fn swap_exchanges_live_canvas() {
        let driver = SoftwareDriver::new();
        let matrix = driver.create_matrix(32, 1, 1).unwrap();
        let live = driver.matrix_canvas(matrix).unwrap();
        let offscreen = driver.create_offscreen_canvas(matrix).unwrap();

        assert_eq!(driver.swap_on_vsync(matrix, offscreen), live);
        assert_eq!(driver.matrix_canvas(matrix), Some(offscreen));
        assert_eq!(driver.swap_count(matrix), 1);
    }

    #[test]
    fn foreign_canvas_is_handed_back() {
        let driver = SoftwareDriver::new();
        let first = driver.create_matrix(32, 1, 1).unwrap();
        let second = driver.create_matrix(32, 1, 1).unwrap();
        let live = driver.matrix_canvas(first).unwrap();
        let foreign = driver.create_offscreen_canvas(second).unwrap();

        assert_eq!(driver.swap_on_vsync(first, foreign), foreign);
        assert_eq!(driver.matrix_canvas(first), Some(live));
        assert_eq!(driver.swap_count(first), 0);
    }

    #[test]
    fn pixels_outside_are_ignored() {
        let driver = SoftwareDriver::new();
        let matrix = driver.create_matrix(32, 1, 1).unwrap();
        let canvas = driver.matrix_canvas(matrix).unwrap();

        driver.set_pixel(canvas, -1, 0, Color::RED);
        driver.set_pixel(canvas, 32, 0, Color::RED);
        driver.set_pixel(canvas, 31, 31, Color::RED);
        assert_eq!(driver.pixel(canvas, 31, 31), Color::RED);
        assert_eq!(driver.pixel(canvas, 32, 0), Color::BLACK);
        assert_eq!(driver.displayed_frame(matrix).lit_pixels(), 1);
    }

    #[test]
    fn deleting_matrix_frees_its_canvases() {
        let driver = SoftwareDriver::new();
        let matrix = driver.create_matrix(32, 1, 1).unwrap();
        driver.create_offscreen_canvas(matrix).unwrap();
        assert_eq!(driver.live_canvases(), 2);

        driver.delete_matrix(matrix);
        assert_eq!(driver.live_canvases(), 0);
        assert_eq!(driver.live_matrices(), 0);
    }

    #[test]
    fn text_advances() {
        let dir = tempfile::tempdir().unwrap();
        let driver = SoftwareDriver::new();
        let matrix = driver.create_matrix(32, 1, 1).unwrap();
        let canvas = driver.matrix_canvas(matrix).unwrap();
        let font = driver.load_font(&font_file(&dir)).unwrap();

        let advance = driver
            .draw_text(canvas, font, 0, 10, Color::GREEN, "AI", 1)
            .unwrap();
        assert_eq!(advance, 10);

        let advance = driver
            .vertical_draw_text(canvas, font, 0, 10, Color::GREEN, "AIA", 0)
            .unwrap();
        assert_eq!(advance, 18);

        assert!(matches!(
            driver.draw_text(canvas, font, 0, 10, Color::GREEN, "A\0", 0),
            Err(crate::MatrixError::InteriorNul(_))
        ));
    }

    #[test]
    fn unreadable_font_gives_no_handle() {
        let dir = tempfile::tempdir().unwrap();
        let driver = SoftwareDriver::new();
        assert!(driver.load_font(&dir.path().join("missing.bdf")).is_none());

        let path = dir.path().join("broken.bdf");
        std::fs::write(&path, "STARTFONT 2.1\nENDFONT\n").unwrap();
        assert!(driver.load_font(&path).is_none());
        assert_eq!(driver.loaded_fonts(), 0);
    }

    #[test]
    fn clones_share_one_instance() {
        let driver = SoftwareDriver::new();
        assert!(driver.same_instance(&driver.clone()));
        assert!(!driver.same_instance(&SoftwareDriver::new()));
    }
}
