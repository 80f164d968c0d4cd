//! Draws a few shapes and cycles their colors.
//!
//! Runs on the in-memory driver by default (`RUST_LOG=debug` shows what happens). Build with
//! `--features native` and run as root to see it on real panels. Any `--led-*` flag is passed to
//! the driver, e.g. `cargo run --example shapes -- --led-rows=16 --led-chain=2`.

use rgbmatrix::{Canvas as _, Color, DoubleBuffer, Driver, Image, Matrix, MatrixOptions};

const FRAMES: u32 = 200;

fn run<D: Driver>(driver: D) -> Result<(), rgbmatrix::MatrixError> {
    let options = MatrixOptions::new();
    let matrix = Matrix::from_options_and_args(driver, &options, std::env::args().skip(1))?;
    let (width, height) = matrix.size()?;
    let (center_x, center_y) = (width as i32 / 2, height as i32 / 2);
    let radius = center_x.min(center_y) - 2;

    // A small checkerboard sprite that bounces along the bottom edge
    let mut sprite = Image::new(4, 4);
    for (x, y) in sprite.iter() {
        if (x + y) % 2 == 0 {
            sprite.set_pixel(x, y, Color::WHITE);
        }
    }

    let mut buffer = DoubleBuffer::new(&matrix)?;
    for frame in 0..FRAMES {
        let hue = frame as f32 / FRAMES as f32;
        let canvas = buffer.canvas_mut();
        canvas.clear();

        canvas.draw_rect(0, 0, width, height, Color::from_hue(hue));
        canvas.fill_circle(center_x, center_y, radius, Color::from_hue(hue + 0.33) * 0.5);
        canvas.draw_circle(center_x, center_y, radius, Color::from_hue(hue + 0.33));
        canvas.draw_line(0, 0, width as i32 - 1, height as i32 - 1, Color::from_hue(hue + 0.66));
        canvas.draw_line(0, height as i32 - 1, width as i32 - 1, 0, Color::from_hue(hue + 0.66));

        let sprite_x = (frame as i32 % (width as i32 * 2)) - 4;
        canvas.draw_image(sprite_x, height as i32 - 5, &sprite);

        buffer.present();
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() -> Result<(), rgbmatrix::MatrixError> {
    env_logger::init();

    let driver = rgbmatrix::SoftwareDriver::new();
    run(driver.clone())?;
    log::info!("Done; {:?}", driver);
    Ok(())
}

#[cfg(feature = "native")]
fn main() -> Result<(), rgbmatrix::MatrixError> {
    env_logger::init();
    run(rgbmatrix::NativeDriver::new())
}
