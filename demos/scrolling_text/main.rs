//! Scrolls a line of text across the matrix.
//!
//! Usage: `cargo run --example scrolling-text -- [--led-* flags] <font.bdf> [text]`
//!
//! If a `matrix.toml` exists in the working directory, it's used as the base configuration.
//! Fonts in BDF format ship with the native library, in its `fonts/` directory.

use rgbmatrix::{Canvas as _, Color, DoubleBuffer, Driver, Font, Matrix, MatrixError, MatrixOptions};

const CONFIG_FILE: &str = "matrix.toml";

fn run<D: Driver>(driver: D) -> Result<(), MatrixError> {
    let mut options = if std::path::Path::new(CONFIG_FILE).exists() {
        MatrixOptions::load(CONFIG_FILE)?
    } else {
        MatrixOptions::new()
    };
    let rest = options.apply_flags(std::env::args().skip(1))?;

    let mut rest = rest.into_iter();
    let font_path = rest.next().ok_or_else(|| {
        MatrixError::InvalidOptions("usage: scrolling-text [--led-* flags] <font.bdf> [text]".to_owned())
    })?;
    let text = rest.next().unwrap_or_else(|| "Hello, matrix!".to_owned());

    let matrix = Matrix::from_options(driver.clone(), &options)?;
    let font = Font::load(driver, &font_path)?;
    let (width, height) = matrix.size()?;
    let y = (height as i32 - font.height()) / 2 + font.baseline();

    let mut buffer = DoubleBuffer::new(&matrix)?;
    let mut x = width as i32;
    for step in 0u32.. {
        let canvas = buffer.canvas_mut();
        canvas.clear();
        let color = Color::from_hue(step as f32 / 300.0);
        let text_width = font.draw_text(canvas, x, y, color, &text, 0)?;
        buffer.present();

        x -= 1;
        if x + text_width < 0 {
            log::debug!("Wrapped around after {} frames", buffer.frames());
            x = width as i32;
            if cfg!(not(feature = "native")) {
                // nobody is watching the software driver
                break;
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(30));
    }

    Ok(())
}

fn main() {
    env_logger::init();

    #[cfg(feature = "native")]
    let result = run(rgbmatrix::NativeDriver::new());
    #[cfg(not(feature = "native"))]
    let result = run(rgbmatrix::SoftwareDriver::new());

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
