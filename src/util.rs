/// A fixed-size row-major grid.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Array2d<T: Default + Copy> {
    width: u32,
    height: u32,
    vec: Vec<T>,
}

impl<T: Default + Copy> Array2d<T> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vec: vec![T::default(); width as usize * height as usize],
        }
    }

    /// Wraps an existing row-major buffer. Returns `None` if the length doesn't match the
    /// dimensions
    pub fn from_vec(width: u32, height: u32, vec: Vec<T>) -> Option<Self> {
        if vec.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, vec })
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        let index = self.index(x, y)?;
        self.vec.get(index)
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        let index = self.index(x, y)?;
        self.vec.get_mut(index)
    }

    pub fn fill(&mut self, value: T) {
        self.vec.iter_mut().for_each(|slot| *slot = value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_access_is_none() {
        let mut grid = Array2d::<u8>::new(3, 2);
        assert!(grid.get(3, 0).is_none());
        assert!(grid.get(0, 2).is_none());
        *grid.get_mut(2, 1).unwrap() = 7;
        assert_eq!(grid.as_slice(), &[0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Array2d::from_vec(2, 2, vec![1u8; 3]).is_none());
        let grid = Array2d::from_vec(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        assert_eq!(grid.get(0, 1), Some(&3));
    }
}
