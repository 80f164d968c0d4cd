use std::ffi::CString;
use std::ptr::NonNull;

use libc::{c_char, c_int};

use super::Driver;
use crate::flags::native_argv;
use crate::{Color, MatrixOptions, Result};

/// Declarations from `led-matrix-c.h`
#[allow(non_camel_case_types)]
mod ffi {
    use libc::{c_char, c_int, c_uint};

    pub enum RGBLedMatrix {}
    pub enum LedCanvas {}
    pub enum LedFont {}

    pub const DISABLE_HARDWARE_PULSING: c_uint = 1 << 0;
    pub const SHOW_REFRESH_RATE: c_uint = 1 << 1;
    pub const INVERSE_COLORS: c_uint = 1 << 2;

    /// Mirror of `struct RGBLedMatrixOptions`. The three trailing one-bit fields of the C struct
    /// share one `unsigned` and are packed into `flags`
    #[repr(C)]
    pub struct RGBLedMatrixOptions {
        pub hardware_mapping: *const c_char,
        pub rows: c_int,
        pub cols: c_int,
        pub chain_length: c_int,
        pub parallel: c_int,
        pub pwm_bits: c_int,
        pub pwm_lsb_nanoseconds: c_int,
        pub pwm_dither_bits: c_int,
        pub brightness: c_int,
        pub scan_mode: c_int,
        pub row_address_type: c_int,
        pub multiplexing: c_int,
        pub led_rgb_sequence: *const c_char,
        pub pixel_mapper_config: *const c_char,
        pub panel_type: *const c_char,
        pub flags: c_uint,
        pub limit_refresh_rate_hz: c_int,
    }

    #[link(name = "rgbmatrix")]
    extern "C" {
        pub fn led_matrix_create(rows: c_int, chained: c_int, parallel: c_int) -> *mut RGBLedMatrix;
        pub fn led_matrix_create_from_options_const_argv(
            options: *mut RGBLedMatrixOptions,
            argc: c_int,
            argv: *mut *mut c_char,
        ) -> *mut RGBLedMatrix;
        pub fn led_matrix_delete(matrix: *mut RGBLedMatrix);
        pub fn led_matrix_get_canvas(matrix: *mut RGBLedMatrix) -> *mut LedCanvas;
        pub fn led_matrix_create_offscreen_canvas(matrix: *mut RGBLedMatrix) -> *mut LedCanvas;
        pub fn led_matrix_swap_on_vsync(
            matrix: *mut RGBLedMatrix,
            canvas: *mut LedCanvas,
        ) -> *mut LedCanvas;
        pub fn led_matrix_get_brightness(matrix: *mut RGBLedMatrix) -> u8;
        pub fn led_matrix_set_brightness(matrix: *mut RGBLedMatrix, brightness: u8);

        pub fn led_canvas_get_size(canvas: *const LedCanvas, width: *mut c_int, height: *mut c_int);
        pub fn led_canvas_set_pixel(canvas: *mut LedCanvas, x: c_int, y: c_int, r: u8, g: u8, b: u8);
        pub fn led_canvas_get_pixel(
            canvas: *const LedCanvas,
            x: c_int,
            y: c_int,
            r: *mut u8,
            g: *mut u8,
            b: *mut u8,
        );
        pub fn led_canvas_clear(canvas: *mut LedCanvas);

        pub fn load_font(bdf_font_file: *const c_char) -> *mut LedFont;
        pub fn baseline_font(font: *mut LedFont) -> c_int;
        pub fn height_font(font: *mut LedFont) -> c_int;
        pub fn delete_font(font: *mut LedFont);
        pub fn draw_text(
            canvas: *mut LedCanvas,
            font: *mut LedFont,
            x: c_int,
            y: c_int,
            r: u8,
            g: u8,
            b: u8,
            utf8_text: *const c_char,
            kerning_offset: c_int,
        ) -> c_int;
        pub fn vertical_draw_text(
            canvas: *mut LedCanvas,
            font: *mut LedFont,
            x: c_int,
            y: c_int,
            r: u8,
            g: u8,
            b: u8,
            utf8_text: *const c_char,
            kerning_offset: c_int,
        ) -> c_int;
    }
}

fn to_c_int(value: u32) -> c_int {
    c_int::try_from(value).unwrap_or(c_int::MAX)
}

/// The driver backed by `librgbmatrix`. Creating a matrix usually needs root privileges for GPIO
/// access; the native library drops them again after initialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDriver;

impl NativeDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for NativeDriver {
    type MatrixHandle = NonNull<ffi::RGBLedMatrix>;
    type CanvasHandle = NonNull<ffi::LedCanvas>;
    type FontHandle = NonNull<ffi::LedFont>;

    // there is only one librgbmatrix per process
    fn same_instance(&self, _other: &Self) -> bool {
        true
    }

    fn create_matrix(&self, rows: u32, chain_length: u32, parallel: u32) -> Option<Self::MatrixHandle> {
        let matrix = unsafe {
            ffi::led_matrix_create(to_c_int(rows), to_c_int(chain_length), to_c_int(parallel))
        };
        NonNull::new(matrix)
    }

    fn create_matrix_from_options(
        &self,
        options: &MatrixOptions,
        args: &[String],
    ) -> Option<Self::MatrixHandle> {
        // The C strings must outlive the factory call
        let strings = (|| -> Result<_> {
            Ok((
                CString::new(options.hardware_mapping.as_str())?,
                CString::new(options.led_rgb_sequence.as_str())?,
                CString::new(options.pixel_mapper_config.as_str())?,
                CString::new(options.panel_type.as_str())?,
            ))
        })();
        let (hardware_mapping, led_rgb_sequence, pixel_mapper_config, panel_type) = match strings {
            Ok(strings) => strings,
            Err(e) => {
                log::warn!("Can't pass matrix options to the native driver: {}", e);
                return None;
            }
        };
        let optional = |s: &CString| {
            if s.as_bytes().is_empty() {
                std::ptr::null()
            } else {
                s.as_ptr()
            }
        };

        let mut flags = 0;
        if options.disable_hardware_pulsing {
            flags |= ffi::DISABLE_HARDWARE_PULSING;
        }
        if options.show_refresh_rate {
            flags |= ffi::SHOW_REFRESH_RATE;
        }
        if options.inverse_colors {
            flags |= ffi::INVERSE_COLORS;
        }

        let mut c_options = ffi::RGBLedMatrixOptions {
            hardware_mapping: hardware_mapping.as_ptr(),
            rows: to_c_int(options.rows),
            cols: to_c_int(options.cols),
            chain_length: to_c_int(options.chain_length),
            parallel: to_c_int(options.parallel),
            pwm_bits: to_c_int(options.pwm_bits),
            pwm_lsb_nanoseconds: to_c_int(options.pwm_lsb_nanoseconds),
            pwm_dither_bits: to_c_int(options.pwm_dither_bits),
            brightness: c_int::from(options.brightness),
            scan_mode: to_c_int(options.scan_mode),
            row_address_type: to_c_int(options.row_address_type),
            multiplexing: to_c_int(options.multiplexing),
            led_rgb_sequence: led_rgb_sequence.as_ptr(),
            pixel_mapper_config: optional(&pixel_mapper_config),
            panel_type: optional(&panel_type),
            flags,
            limit_refresh_rate_hz: to_c_int(options.limit_refresh_rate_hz),
        };

        let argv_strings = native_argv(options, args);
        let mut argv: Vec<*mut c_char> = argv_strings
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .collect();
        argv.push(std::ptr::null_mut());

        let matrix = unsafe {
            ffi::led_matrix_create_from_options_const_argv(
                &mut c_options,
                to_c_int(argv_strings.len() as u32),
                argv.as_mut_ptr(),
            )
        };
        NonNull::new(matrix)
    }

    fn delete_matrix(&self, matrix: Self::MatrixHandle) {
        unsafe { ffi::led_matrix_delete(matrix.as_ptr()) }
    }

    fn matrix_canvas(&self, matrix: Self::MatrixHandle) -> Option<Self::CanvasHandle> {
        NonNull::new(unsafe { ffi::led_matrix_get_canvas(matrix.as_ptr()) })
    }

    fn create_offscreen_canvas(&self, matrix: Self::MatrixHandle) -> Option<Self::CanvasHandle> {
        NonNull::new(unsafe { ffi::led_matrix_create_offscreen_canvas(matrix.as_ptr()) })
    }

    fn swap_on_vsync(
        &self,
        matrix: Self::MatrixHandle,
        canvas: Self::CanvasHandle,
    ) -> Self::CanvasHandle {
        let previous = unsafe { ffi::led_matrix_swap_on_vsync(matrix.as_ptr(), canvas.as_ptr()) };
        // the native driver never hands back null here; fall back to the canvas we passed
        NonNull::new(previous).unwrap_or(canvas)
    }

    fn brightness(&self, matrix: Self::MatrixHandle) -> u8 {
        unsafe { ffi::led_matrix_get_brightness(matrix.as_ptr()) }
    }

    fn set_brightness(&self, matrix: Self::MatrixHandle, brightness: u8) {
        unsafe { ffi::led_matrix_set_brightness(matrix.as_ptr(), brightness) }
    }

    fn canvas_size(&self, canvas: Self::CanvasHandle) -> (u32, u32) {
        let (mut width, mut height): (c_int, c_int) = (0, 0);
        unsafe { ffi::led_canvas_get_size(canvas.as_ptr(), &mut width, &mut height) };
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn set_pixel(&self, canvas: Self::CanvasHandle, x: i32, y: i32, color: Color) {
        unsafe { ffi::led_canvas_set_pixel(canvas.as_ptr(), x, y, color.r, color.g, color.b) }
    }

    fn pixel(&self, canvas: Self::CanvasHandle, x: i32, y: i32) -> Color {
        let mut color = Color::BLACK;
        unsafe {
            ffi::led_canvas_get_pixel(
                canvas.as_ptr(),
                x,
                y,
                &mut color.r,
                &mut color.g,
                &mut color.b,
            )
        };
        color
    }

    fn clear_canvas(&self, canvas: Self::CanvasHandle) {
        unsafe { ffi::led_canvas_clear(canvas.as_ptr()) }
    }

    fn load_font(&self, path: &std::path::Path) -> Option<Self::FontHandle> {
        use std::os::unix::ffi::OsStrExt;

        let path = CString::new(path.as_os_str().as_bytes()).ok()?;
        NonNull::new(unsafe { ffi::load_font(path.as_ptr()) })
    }

    fn delete_font(&self, font: Self::FontHandle) {
        unsafe { ffi::delete_font(font.as_ptr()) }
    }

    fn font_baseline(&self, font: Self::FontHandle) -> i32 {
        unsafe { ffi::baseline_font(font.as_ptr()) }
    }

    fn font_height(&self, font: Self::FontHandle) -> i32 {
        unsafe { ffi::height_font(font.as_ptr()) }
    }

    fn draw_text(
        &self,
        canvas: Self::CanvasHandle,
        font: Self::FontHandle,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        let text = CString::new(text)?;
        Ok(unsafe {
            ffi::draw_text(
                canvas.as_ptr(),
                font.as_ptr(),
                x,
                y,
                color.r,
                color.g,
                color.b,
                text.as_ptr(),
                spacing,
            )
        })
    }

    fn vertical_draw_text(
        &self,
        canvas: Self::CanvasHandle,
        font: Self::FontHandle,
        x: i32,
        y: i32,
        color: Color,
        text: &str,
        spacing: i32,
    ) -> Result<i32> {
        let text = CString::new(text)?;
        Ok(unsafe {
            ffi::vertical_draw_text(
                canvas.as_ptr(),
                font.as_ptr(),
                x,
                y,
                color.r,
                color.g,
                color.b,
                text.as_ptr(),
                spacing,
            )
        })
    }
}
