use std::fmt::Debug;
use crate::error::{ Error, Result };
use crate::pixel_matrix::block_iterator::{ EdgePolicy, PixelMatrixBlockIterator };

/// A single channel over a rectangular grid, stored row-major with row 0 at
/// the top.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMatrix<T> {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<T>,
}

impl<T: Default + Copy + Debug> PixelMatrix<T> {
    pub fn new(width: usize, height: usize) -> PixelMatrix<T> {
        PixelMatrix {
            width,
            height,
            pixels: Vec::<T>::with_capacity(width * height),
        }
    }

    pub fn new_with_default(width: usize, height: usize) -> PixelMatrix<T> {
        PixelMatrix {
            width,
            height,
            pixels: vec![Default::default(); width * height],
        }
    }

    pub fn new_from_pixels(width: usize, height: usize, pixels: Vec<T>) -> Result<PixelMatrix<T>> {
        if pixels.len() != width * height {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: (pixels.len(), 1),
            });
        }
        Ok(PixelMatrix {
            width,
            height,
            pixels,
        })
    }

    pub fn push_next(&mut self, value: T) {
        self.pixels.push(value);
    }

    pub fn get_pixel(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.pixels[row * self.width + col])
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, value: T) {
        self.pixels[row * self.width + col] = value;
    }

    pub fn for_each_pixel<F>(&self, f: &mut F) where F: FnMut(&T) {
        for p in self.pixels.as_slice() {
            f(p);
        }
    }

    pub fn map<U, F>(&self, f: F) -> PixelMatrix<U> where F: FnMut(&T) -> U {
        PixelMatrix {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(f).collect(),
        }
    }

    /// Writes a row-major `block_width` x `block_height` block whose top-left
    /// corner is at block coordinates (`block_row`, `block_col`). Cells that
    /// fall outside the matrix are discarded.
    pub fn set_block(
        &mut self,
        block_row: usize,
        block_col: usize,
        block_width: usize,
        block_height: usize,
        values: &[T]
    ) {
        let start_i = block_row * block_height;
        let start_j = block_col * block_width;
        for i in 0..block_height {
            let row = start_i + i;
            if row >= self.height {
                break;
            }
            for j in 0..block_width {
                let col = start_j + j;
                if col >= self.width {
                    break;
                }
                self.set_pixel(row, col, values[i * block_width + j]);
            }
        }
    }

    pub fn get_block_iterator(
        &self,
        block_width: usize,
        block_height: usize,
        edge_policy: EdgePolicy
    ) -> PixelMatrixBlockIterator<'_, T> {
        PixelMatrixBlockIterator::new(self, block_width, block_height, edge_policy)
    }
}
