use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::Pixel;

use super::{Canvas, Image};
use crate::{Driver, MatrixCanvas};

macro_rules! impl_draw_target {
    ([$($generics:tt)*] $canvas:ty) => {
        impl<$($generics)*> DrawTarget for $canvas {
            type Color = Rgb888;
            type Error = core::convert::Infallible;

            fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Rgb888>>,
            {
                for Pixel(point, color) in pixels {
                    Canvas::set_pixel(self, point.x, point.y, color.into());
                }
                Ok(())
            }

            fn clear(&mut self, color: Rgb888) -> Result<(), Self::Error> {
                Canvas::fill(self, color.into());
                Ok(())
            }
        }

        impl<$($generics)*> OriginDimensions for $canvas {
            fn size(&self) -> Size {
                let (width, height) = Canvas::size(self);
                Size::new(width, height)
            }
        }
    };
}

impl_draw_target!([D: Driver] MatrixCanvas<'_, D>);
impl_draw_target!([] Image);
