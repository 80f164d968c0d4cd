/// An iterator over the pixel coordinates of a [`super::Canvas`], row by row. Create one by
/// calling `.iter()` on a canvas.
///
/// For more information, see [`super::Canvas::iter`].
#[derive(Debug, Clone)]
pub struct CanvasIterator {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

impl CanvasIterator {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x: 0,
            // an empty row means an empty canvas
            y: if width == 0 { height } else { 0 },
        }
    }
}

impl Iterator for CanvasIterator {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.height {
            return None;
        }

        let item = (self.x as i32, self.y as i32);
        self.x += 1;
        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.height.saturating_sub(self.y) as usize * self.width as usize)
            .saturating_sub(self.x as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CanvasIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_rows_in_order() {
        let coordinates: Vec<_> = CanvasIterator::new(2, 2).collect();
        assert_eq!(coordinates, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn empty_canvases_yield_nothing() {
        assert_eq!(CanvasIterator::new(0, 5).count(), 0);
        assert_eq!(CanvasIterator::new(5, 0).count(), 0);
    }

    #[test]
    fn length_is_exact() {
        let mut iter = CanvasIterator::new(3, 2);
        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
    }
}
