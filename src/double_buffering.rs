use crate::{Driver, Matrix, MatrixCanvas, Result};

/// Tear-free animation on top of [`Matrix::swap_on_vsync`].
///
/// Holds one offscreen canvas to draw the next frame on. [`Self::present`] puts it on display
/// and keeps the canvas that was shown before as the new drawing surface. That canvas still
/// holds the frame before last, so clear or fully redraw it.
///
/// ```
/// use rgbmatrix::{Canvas as _, Color, DoubleBuffer, Matrix, SoftwareDriver};
///
/// let matrix = Matrix::new(SoftwareDriver::new(), 32, 1, 1)?;
/// let mut buffer = DoubleBuffer::new(&matrix)?;
///
/// for x in 0..32 {
///     let canvas = buffer.canvas_mut();
///     canvas.clear();
///     canvas.draw_line(x, 0, x, 31, Color::GREEN);
///     buffer.present();
/// }
/// assert_eq!(buffer.frames(), 32);
/// # Ok::<(), rgbmatrix::MatrixError>(())
/// ```
#[derive(Debug)]
pub struct DoubleBuffer<'m, D: Driver> {
    matrix: &'m Matrix<D>,
    back: MatrixCanvas<'m, D>,
    frames: u64,
}

impl<'m, D: Driver> DoubleBuffer<'m, D> {
    /// Allocates the offscreen canvas. Do this once, not per animation
    pub fn new(matrix: &'m Matrix<D>) -> Result<Self> {
        Ok(Self {
            matrix,
            back: matrix.offscreen_canvas()?,
            frames: 0,
        })
    }

    /// The canvas the next frame is drawn on
    pub fn canvas_mut(&mut self) -> &mut MatrixCanvas<'m, D> {
        &mut self.back
    }

    /// Show what was drawn on [`Self::canvas_mut`] at the next vertical sync
    pub fn present(&mut self) {
        self.matrix.swap_owned(&mut self.back);
        self.frames += 1;
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
