use std::fmt::Debug;

use crate::pixel_matrix::pixel_matrix::PixelMatrix;

/// What to do with the partial blocks left over when a dimension is not a
/// multiple of the block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EdgePolicy {
    /// Only whole blocks are visited; remainder rows and columns are skipped.
    #[default]
    Drop,
    /// Partial blocks are visited and filled with `T::default()` past the edge.
    ZeroPad,
}

impl EdgePolicy {
    /// Blocks of size `block` needed along a dimension of length `len`.
    pub fn block_count(&self, len: usize, block: usize) -> usize {
        match self {
            EdgePolicy::Drop => len / block,
            EdgePolicy::ZeroPad => len.div_ceil(block),
        }
    }
}

/// One block of samples, row-major, with its position in the block grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T> {
    pub row: usize,
    pub col: usize,
    pub samples: Vec<T>,
}

pub struct PixelMatrixBlockIterator<'a, T> {
    pixel_matrix: &'a PixelMatrix<T>,
    block_width: usize,
    block_height: usize,
    block_idx: usize,
    edge_policy: EdgePolicy,
}

impl<'a, T: Default + Copy + Debug> PixelMatrixBlockIterator<'a, T> {
    pub fn new(
        pixel_matrix: &'a PixelMatrix<T>,
        block_width: usize,
        block_height: usize,
        edge_policy: EdgePolicy
    ) -> PixelMatrixBlockIterator<'a, T> {
        PixelMatrixBlockIterator {
            pixel_matrix,
            block_width,
            block_height,
            edge_policy,
            block_idx: 0,
        }
    }

    pub fn reset(&mut self) {
        self.block_idx = 0;
    }

    pub fn get_blocks_per_row(&self) -> usize {
        self.edge_policy.block_count(self.pixel_matrix.width, self.block_width)
    }

    pub fn get_blocks_per_column(&self) -> usize {
        self.edge_policy.block_count(self.pixel_matrix.height, self.block_height)
    }

    pub fn get_blocks_amount(&self) -> usize {
        self.get_blocks_per_row() * self.get_blocks_per_column()
    }

    /// Number of samples that belong to no visited block.
    pub fn dropped_samples(&self) -> usize {
        let covered_width = self.get_blocks_per_row() * self.block_width;
        let covered_height = self.get_blocks_per_column() * self.block_height;
        let total = self.pixel_matrix.width * self.pixel_matrix.height;
        total.saturating_sub(
            covered_width.min(self.pixel_matrix.width) * covered_height.min(self.pixel_matrix.height)
        )
    }

    pub fn get_block(&self, block_buffer: &mut Vec<T>) {
        block_buffer.clear();
        let blocks_per_row = self.get_blocks_per_row();
        let block_start_i = (self.block_idx / blocks_per_row) * self.block_height;
        let block_start_j = (self.block_idx % blocks_per_row) * self.block_width;

        for i in 0..self.block_height {
            for j in 0..self.block_width {
                let p = self.pixel_matrix
                    .get_pixel(block_start_i + i, block_start_j + j)
                    .unwrap_or_default();
                block_buffer.push(p);
            }
        }
    }

    pub fn for_each_block<F>(&mut self, f: &mut F) where F: FnMut(usize, usize, &mut Vec<T>) {
        let mut block_buffer = Vec::<T>::with_capacity(self.block_width * self.block_height);
        let blocks_per_row = self.get_blocks_per_row();

        for i in 0..self.get_blocks_amount() {
            self.block_idx = i;
            self.get_block(&mut block_buffer);
            f(i / blocks_per_row, i % blocks_per_row, &mut block_buffer);
        }
        self.reset();
    }
}

impl<'a, T: Default + Copy + Debug> Iterator for PixelMatrixBlockIterator<'a, T> {
    type Item = Block<T>;

    fn next(&mut self) -> Option<Block<T>> {
        if self.block_idx >= self.get_blocks_amount() {
            return None;
        }
        let blocks_per_row = self.get_blocks_per_row();
        let mut samples = Vec::with_capacity(self.block_width * self.block_height);
        self.get_block(&mut samples);
        let block = Block {
            row: self.block_idx / blocks_per_row,
            col: self.block_idx % blocks_per_row,
            samples,
        };
        self.block_idx += 1;
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /*
        test matrix:
        [
        1,1,4,2,
        1,2,2,3,
        8,8,8,9
        ]
    */

    fn initialize_matrix() -> PixelMatrix<i32> {
        PixelMatrix::new_from_pixels(4, 3, vec![1, 1, 4, 2, 1, 2, 2, 3, 8, 8, 8, 9]).unwrap()
    }

    #[test]
    fn for_each_block() {
        let mut matrix = initialize_matrix();
        let mut biggest_of_each_block = Vec::<i32>::new();
        let mut get_biggest = |_: usize, _: usize, block: &mut Vec<i32>| {
            biggest_of_each_block.push(*block.iter().max().unwrap());
        };
        matrix.get_block_iterator(2, 2, EdgePolicy::Drop).for_each_block(&mut get_biggest);

        matrix.set_pixel(2, 3, -10);
        matrix.get_block_iterator(3, 1, EdgePolicy::ZeroPad).for_each_block(&mut get_biggest);

        assert_eq!(biggest_of_each_block, vec![2, 4, 4, 2, 2, 3, 8, i32::default()]);
    }

    #[test]
    fn drop_skips_partial_blocks() {
        let matrix = initialize_matrix();
        let iterator = matrix.get_block_iterator(2, 2, EdgePolicy::Drop);
        assert_eq!(iterator.get_blocks_per_row(), 2);
        assert_eq!(iterator.get_blocks_per_column(), 1);
        assert_eq!(iterator.dropped_samples(), 4);

        let blocks: Vec<Block<i32>> = iterator.collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], Block { row: 0, col: 1, samples: vec![4, 2, 2, 3] });
    }

    #[test]
    fn zero_pad_fills_past_the_edge() {
        let matrix = initialize_matrix();
        let iterator = matrix.get_block_iterator(2, 2, EdgePolicy::ZeroPad);
        assert_eq!(iterator.dropped_samples(), 0);

        let blocks: Vec<Block<i32>> = iterator.collect();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[2], Block { row: 1, col: 0, samples: vec![8, 8, 0, 0] });
        assert_eq!(blocks[3].samples, vec![8, 9, 0, 0]);
    }
}
