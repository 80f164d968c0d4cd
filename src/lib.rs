/*!
Safe bindings for the rpi-rgb-led-matrix native driver, plus software drawing helpers for the
HUB75 LED panels it drives.

# Drawing through the Canvas API

A [`Matrix`] hands out canvases, and every canvas implements the [`Canvas`] trait: a grid of
pixels with `set_pixel`/`pixel` primitives and a set of shapes rasterized on top of them.

```
use rgbmatrix::{Canvas as _, Color, Matrix, SoftwareDriver};

let matrix = Matrix::new(SoftwareDriver::new(), 32, 2, 1)?;
let mut canvas = matrix.canvas()?;

canvas.draw_rect(0, 0, 64, 32, Color::WHITE);
canvas.fill_circle(31, 15, 10, Color::from_hue(0.6));
canvas.draw_line(0, 31, 63, 0, Color::RED);
# Ok::<(), rgbmatrix::MatrixError>(())
```

# Drivers

Every wrapper is generic over a [`Driver`], the handle-based view of the C API. Every driver
method corresponds to exactly one native call, so the wrappers add lifetime management and
nothing else.

- [`NativeDriver`] (feature `native`) links against `librgbmatrix` and drives real panels.
- [`SoftwareDriver`] keeps matrices in memory. It's what the examples in this documentation use,
  and it's handy for developing an application on a machine without a panel attached.

## Configuring a matrix from a file and the command line

```no_run
use rgbmatrix::{Matrix, MatrixOptions, SoftwareDriver};

// e.g. `--led-rows=16 --led-chain=3 --led-brightness=40`
let options = MatrixOptions::load("matrix.toml")?;
let matrix = Matrix::from_options_and_args(
    SoftwareDriver::new(),
    &options,
    std::env::args().skip(1),
)?;
# Ok::<(), rgbmatrix::MatrixError>(())
```

## Flicker-free animation

Draw on an offscreen canvas and swap it in at the next vertical sync, either by hand with
[`Matrix::swap_on_vsync`] or with a [`DoubleBuffer`]:

```
use rgbmatrix::{Canvas as _, Color, DoubleBuffer, Matrix, SoftwareDriver};

let matrix = Matrix::new(SoftwareDriver::new(), 32, 1, 1)?;
let mut buffer = DoubleBuffer::new(&matrix)?;
for step in 0..100 {
    let canvas = buffer.canvas_mut();
    canvas.fill(Color::from_hue(step as f32 / 100.0));
    buffer.present();
}
# Ok::<(), rgbmatrix::MatrixError>(())
```
*/

pub mod util;

mod errors;
pub use errors::*;

mod color;
pub use color::*;

mod options;
pub use options::*;

mod flags;

mod canvas;
pub use canvas::*;

pub mod driver;
#[cfg(feature = "native")]
pub use driver::NativeDriver;
pub use driver::{Driver, SoftwareDriver};

mod matrix;
pub use matrix::*;

mod font;
pub use font::*;

mod double_buffering;
pub use double_buffering::*;

pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::Color;
    pub use crate::driver::Driver;
    pub use crate::matrix::{Matrix, MatrixCanvas};
}
