//! The foreign-function surface of the LED matrix driver.
//!
//! A [`Driver`] is a thin, handle-based view of the native C API: every method corresponds to
//! exactly one entry point of `led-matrix-c.h`. The wrappers in this crate ([`crate::Matrix`],
//! [`crate::MatrixCanvas`], [`crate::Font`]) are generic over it and take care of handle
//! lifetimes.
//!
//! Two implementations exist:
//! - [`NativeDriver`] (feature `native`) calls into `librgbmatrix`
//! - [`SoftwareDriver`] keeps everything in memory, for development and tests on machines
//!   without a panel attached

use crate::{Color, MatrixOptions, Result};

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
pub use native::NativeDriver;

pub(crate) mod software;
pub use software::{SoftwareCanvas, SoftwareDriver, SoftwareFont, SoftwareMatrix};

/// The handle-based driver interface. You as a user of this library will rarely need to call
/// these methods directly; use [`crate::Matrix`] and friends instead.
///
/// Factories return `None` where the native library returns a null pointer. Handles passed into
/// the other methods must have been returned by the same driver and must not have been destroyed.
pub trait Driver: Clone {
    type MatrixHandle: Copy + std::fmt::Debug;
    type CanvasHandle: Copy + Eq + std::fmt::Debug;
    type FontHandle: Copy + std::fmt::Debug;

    /// Whether `other` hands out handles that are valid for `self` too
    fn same_instance(&self, other: &Self) -> bool;

    /// `led_matrix_create`
    fn create_matrix(&self, rows: u32, chain_length: u32, parallel: u32)
        -> Option<Self::MatrixHandle>;

    /// `led_matrix_create_from_options_const_argv`. `args` are command-line arguments (without
    /// the program name) whose `--led-*` flags override `options`
    fn create_matrix_from_options(
        &self,
        options: &MatrixOptions,
        args: &[String],
    ) -> Option<Self::MatrixHandle>;

    /// `led_matrix_delete`. Also frees all canvases of the matrix
    fn delete_matrix(&self, matrix: Self::MatrixHandle);

    /// `led_matrix_get_canvas`: the canvas currently being displayed
    fn matrix_canvas(&self, matrix: Self::MatrixHandle) -> Option<Self::CanvasHandle>;

    /// `led_matrix_create_offscreen_canvas`
    fn create_offscreen_canvas(&self, matrix: Self::MatrixHandle) -> Option<Self::CanvasHandle>;

    /// `led_matrix_swap_on_vsync`. Displays `canvas` on the next vertical sync and returns the
    /// canvas that was displayed until then
    fn swap_on_vsync(
        &self,
        matrix: Self::MatrixHandle,
        canvas: Self::CanvasHandle,
    ) -> Self::CanvasHandle;

    /// `led_matrix_get_brightness`
    fn brightness(&self, matrix: Self::MatrixHandle) -> u8;
    /// `led_matrix_set_brightness`
    fn set_brightness(&self, matrix: Self::MatrixHandle, brightness: u8);

    /// `led_canvas_get_size`: (width, height)
    fn canvas_size(&self, canvas: Self::CanvasHandle) -> (u32, u32);
    /// `led_canvas_set_pixel`. Out-of-range coordinates are ignored
    fn set_pixel(&self, canvas: Self::CanvasHandle, x: i32, y: i32, color: Color);
    /// `led_canvas_get_pixel`. Out-of-range coordinates read as black
    fn pixel(&self, canvas: Self::CanvasHandle, x: i32, y: i32) -> Color;
    /// `led_canvas_clear`
    fn clear_canvas(&self, canvas: Self::CanvasHandle);

    /// `load_font`: load a BDF font file
    fn load_font(&self, path: &std::path::Path) -> Option<Self::FontHandle>;
    /// `delete_font`
    fn delete_font(&self, font: Self::FontHandle);
    /// `baseline_font`
    fn font_baseline(&self, font: Self::FontHandle) -> i32;
    /// `height_font`
    fn font_height(&self, font: Self::FontHandle) -> i32;

    /// `draw_text`: draws `text` with its baseline at `y`, returns the horizontal advance in
    /// pixels. `spacing` is added after every glyph
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        canvas: Self::CanvasHandle,
        font: Self::FontHandle,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32>;

    /// `vertical_draw_text`: like [`Self::draw_text`], but stacks glyphs top to bottom and
    /// returns the vertical advance
    #[allow(clippy::too_many_arguments)]
    fn vertical_draw_text(
        &self,
        canvas: Self::CanvasHandle,
        font: Self::FontHandle,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32>;
}
