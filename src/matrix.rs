use crate::{Canvas, Color, Driver, Font, MatrixError, MatrixOptions, Result};

/// A connected LED matrix: one or more chained panels driven as a single display.
///
/// The native matrix is destroyed when this value is dropped. Canvases obtained from it borrow
/// the matrix and therefore can't outlive it.
///
/// ```
/// use rgbmatrix::{Canvas as _, Color, Matrix, MatrixOptions, SoftwareDriver};
///
/// let mut options = MatrixOptions::new();
/// options.set_rows(16).set_chain_length(2).set_brightness(60);
///
/// let matrix = Matrix::from_options(SoftwareDriver::new(), &options)?;
/// let mut canvas = matrix.canvas()?;
/// assert_eq!(canvas.size(), (64, 16));
/// canvas.fill(Color::BLUE);
/// assert_eq!(matrix.brightness(), 60);
/// # Ok::<(), rgbmatrix::MatrixError>(())
/// ```
#[derive(Debug)]
pub struct Matrix<D: Driver> {
    driver: D,
    handle: D::MatrixHandle,
}

fn null_matrix(what: String) -> MatrixError {
    log::warn!("Native driver returned no matrix for {}", what);
    MatrixError::InvalidArgument(what)
}

impl<D: Driver> Matrix<D> {
    /// Create a matrix of `chain_length` panels with `rows` rows each, times `parallel` chains.
    /// Everything else is left at the driver's defaults
    pub fn new(driver: D, rows: u32, chain_length: u32, parallel: u32) -> Result<Self> {
        let handle = driver
            .create_matrix(rows, chain_length, parallel)
            .ok_or_else(|| {
                null_matrix(format!(
                    "matrix with {} rows, chain length {} and {} parallel chains",
                    rows, chain_length, parallel
                ))
            })?;
        Ok(Self::from_handle(driver, handle))
    }

    /// Create a matrix from an options record
    pub fn from_options(driver: D, options: &MatrixOptions) -> Result<Self> {
        Self::from_options_and_args(driver, options, std::iter::empty::<&str>())
    }

    /// Create a matrix from an options record, with `--led-*` command-line flags in `args`
    /// taking precedence over it. `args` doesn't include the program name; arguments the driver
    /// doesn't know are ignored.
    ///
    /// ```
    /// use rgbmatrix::{Canvas as _, Matrix, MatrixOptions, SoftwareDriver};
    ///
    /// let args = ["--led-rows=16", "--led-chain", "4", "--verbose"];
    /// let matrix = Matrix::from_options_and_args(SoftwareDriver::new(), &MatrixOptions::new(), args)?;
    /// assert_eq!(matrix.canvas()?.size(), (128, 16));
    /// # Ok::<(), rgbmatrix::MatrixError>(())
    /// ```
    pub fn from_options_and_args<I, S>(driver: D, options: &MatrixOptions, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
        let handle = driver
            .create_matrix_from_options(options, &args)
            .ok_or_else(|| null_matrix(format!("matrix from options {:?}", options)))?;
        Ok(Self::from_handle(driver, handle))
    }

    fn from_handle(driver: D, handle: D::MatrixHandle) -> Self {
        let matrix = Self { driver, handle };
        if let Ok(canvas) = matrix.canvas() {
            let (width, height) = canvas.size();
            log::info!("Created {}x{} matrix {:?}", width, height, handle);
        }
        matrix
    }

    /// The canvas that is currently being displayed. Drawing on it shows up immediately
    pub fn canvas(&self) -> Result<MatrixCanvas<'_, D>> {
        let handle = self
            .driver
            .matrix_canvas(self.handle)
            .ok_or_else(|| MatrixError::InvalidArgument("live canvas".to_owned()))?;
        Ok(MatrixCanvas::new(self, handle))
    }

    /// Create a new canvas that isn't displayed until it's passed to [`Self::swap_on_vsync`].
    ///
    /// Offscreen canvases stay allocated until the matrix is dropped, so create them once and
    /// reuse them instead of creating one per frame.
    pub fn offscreen_canvas(&self) -> Result<MatrixCanvas<'_, D>> {
        let handle = self
            .driver
            .create_offscreen_canvas(self.handle)
            .ok_or_else(|| MatrixError::InvalidArgument("offscreen canvas".to_owned()))?;
        log::debug!("Created offscreen canvas {:?}", handle);
        Ok(MatrixCanvas::new(self, handle))
    }

    /// Display `canvas` at the next vertical sync and hand back the canvas that was shown until
    /// now, to draw the next frame on.
    ///
    /// Fails with [`MatrixError::InvalidArgument`] if `canvas` belongs to another matrix. Nothing
    /// is swapped in that case.
    ///
    /// ```
    /// use rgbmatrix::{Matrix, SoftwareDriver};
    ///
    /// let driver = SoftwareDriver::new();
    /// let first = Matrix::new(driver.clone(), 32, 1, 1)?;
    /// let second = Matrix::new(driver, 32, 1, 1)?;
    ///
    /// let shown_before = first.swap_on_vsync(first.offscreen_canvas()?)?;
    /// assert!(second.swap_on_vsync(shown_before).is_err());
    /// # Ok::<(), rgbmatrix::MatrixError>(())
    /// ```
    pub fn swap_on_vsync<'m>(&'m self, canvas: MatrixCanvas<'m, D>) -> Result<MatrixCanvas<'m, D>> {
        if !std::ptr::eq(canvas.matrix, self) {
            log::warn!("Refusing to swap in {:?}, which belongs to another matrix", canvas.handle);
            return Err(MatrixError::InvalidArgument(format!(
                "swap of {:?}, a canvas of another matrix",
                canvas.handle
            )));
        }
        let mut canvas = canvas;
        self.swap_owned(&mut canvas);
        Ok(canvas)
    }

    /// Swaps in a canvas that is known to belong to this matrix
    pub(crate) fn swap_owned(&self, canvas: &mut MatrixCanvas<'_, D>) {
        debug_assert!(std::ptr::eq(canvas.matrix, self));
        let previous = self.driver.swap_on_vsync(self.handle, canvas.handle);
        log::trace!("Swapped {:?} in, got {:?} back", canvas.handle, previous);
        canvas.size = self.driver.canvas_size(previous);
        canvas.handle = previous;
    }

    /// Brightness in percent
    pub fn brightness(&self) -> u8 {
        self.driver.brightness(self.handle)
    }

    /// Set the brightness in percent. Values above 100 are treated as 100
    pub fn set_brightness(&self, brightness: u8) {
        self.driver.set_brightness(self.handle, brightness.min(100));
    }

    /// Width and height of the display in pixels, after pixel mapping
    pub fn size(&self) -> Result<(u32, u32)> {
        Ok(self.canvas()?.size())
    }

    /// The raw driver handle
    pub fn handle(&self) -> D::MatrixHandle {
        self.handle
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: Driver> Drop for Matrix<D> {
    fn drop(&mut self) {
        log::debug!("Deleting matrix {:?}", self.handle);
        self.driver.delete_matrix(self.handle);
    }
}

/// A canvas belonging to a [`Matrix`]: either the live one, or an offscreen buffer.
#[derive(Debug)]
pub struct MatrixCanvas<'m, D: Driver> {
    matrix: &'m Matrix<D>,
    handle: D::CanvasHandle,
    size: (u32, u32),
}

impl<'m, D: Driver> MatrixCanvas<'m, D> {
    fn new(matrix: &'m Matrix<D>, handle: D::CanvasHandle) -> Self {
        let size = matrix.driver.canvas_size(handle);
        Self {
            matrix,
            handle,
            size,
        }
    }

    /// The raw driver handle
    pub fn handle(&self) -> D::CanvasHandle {
        self.handle
    }

    pub fn matrix(&self) -> &'m Matrix<D> {
        self.matrix
    }

    pub(crate) fn driver(&self) -> &'m D {
        &self.matrix.driver
    }

    /// Shorthand for [`Font::draw_text`]
    pub fn draw_text(
        &mut self,
        font: &Font<D>,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        font.draw_text(self, x, y, color, text, spacing)
    }
}

impl<D: Driver> Canvas for MatrixCanvas<'_, D> {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.driver().set_pixel(self.handle, x, y, color);
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        self.driver().pixel(self.handle, x, y)
    }

    fn clear(&mut self) {
        self.driver().clear_canvas(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SoftwareDriver;

    #[test]
    fn drop_deletes_the_matrix() {
        let driver = SoftwareDriver::new();
        {
            let matrix = Matrix::new(driver.clone(), 32, 1, 1).unwrap();
            matrix.offscreen_canvas().unwrap();
            assert_eq!(driver.live_matrices(), 1);
            assert_eq!(driver.live_canvases(), 2);
        }
        assert_eq!(driver.live_matrices(), 0);
        assert_eq!(driver.live_canvases(), 0);
    }

    #[test]
    fn refused_geometry_is_an_error() {
        let driver = SoftwareDriver::new();
        let result = Matrix::new(driver.clone(), 0, 1, 1);
        assert!(matches!(result, Err(MatrixError::InvalidArgument(_))));
        assert_eq!(driver.live_matrices(), 0);
    }

    #[test]
    fn brightness_is_clamped() {
        let matrix = Matrix::new(SoftwareDriver::new(), 32, 1, 1).unwrap();
        assert_eq!(matrix.brightness(), 100);
        matrix.set_brightness(40);
        assert_eq!(matrix.brightness(), 40);
        matrix.set_brightness(250);
        assert_eq!(matrix.brightness(), 100);
    }

    #[test]
    fn swap_hands_back_the_shown_canvas() {
        let driver = SoftwareDriver::new();
        let matrix = Matrix::new(driver.clone(), 32, 1, 1).unwrap();
        let live = matrix.canvas().unwrap().handle();

        let mut next = matrix.offscreen_canvas().unwrap();
        let drawn = next.handle();
        next.set_pixel(3, 4, Color::WHITE);

        let back = matrix.swap_on_vsync(next).unwrap();
        assert_eq!(back.handle(), live);
        assert_eq!(matrix.canvas().unwrap().handle(), drawn);
        assert_eq!(driver.displayed_frame(matrix.handle()).pixel(3, 4), Color::WHITE);
        assert_eq!(back.size(), (32, 32));
    }

    #[test]
    fn clear_goes_through_the_driver() {
        let matrix = Matrix::new(SoftwareDriver::new(), 16, 1, 1).unwrap();
        let mut canvas = matrix.canvas().unwrap();
        canvas.fill(Color::RED);
        assert_eq!(canvas.pixel(31, 15), Color::RED);
        canvas.clear();
        assert!(canvas.iter().all(|(x, y)| canvas.pixel(x, y) == Color::BLACK));
    }

    #[test]
    fn foreign_canvas_is_not_swapped_in() {
        let driver = SoftwareDriver::new();
        let first = Matrix::new(driver.clone(), 32, 1, 1).unwrap();
        let first_live = first.canvas().unwrap().handle();
        {
            let second = Matrix::new(driver.clone(), 32, 1, 1).unwrap();
            let foreign = second.offscreen_canvas().unwrap();
            let result = first.swap_on_vsync(foreign);
            assert!(matches!(result, Err(MatrixError::InvalidArgument(_))));
        }

        // the other matrix is gone, and this one still shows its own canvas
        assert_eq!(first.canvas().unwrap().handle(), first_live);
        assert_eq!(driver.swap_count(first.handle()), 0);
        assert_eq!(driver.displayed_frame(first.handle()).lit_pixels(), 0);
    }
}
