use std::fmt::Debug;
use std::sync::Arc;

use log::{ debug, trace, warn };
use nalgebra::DMatrix;

use crate::error::{ Error, Result };
use crate::jpeg::quant_tables::{ dequantize, quantize, QUANTIZATION_BLOCK_SIZE };
use crate::jpeg::tables::{ tables_for, BlockTables };
use crate::pixel_matrix::{ EdgePolicy, PixelMatrix };

/// Coefficient matrices of one plane, in block-raster order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientGrid {
    pub block_size: usize,
    pub blocks_per_row: usize,
    pub blocks_per_column: usize,
    pub blocks: Vec<DMatrix<f64>>,
}

impl CoefficientGrid {
    pub fn block(&self, block_row: usize, block_col: usize) -> &DMatrix<f64> {
        &self.blocks[block_row * self.blocks_per_row + block_col]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn zero_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| block.iter().filter(|c| **c == 0.0).count())
            .sum()
    }
}

/// Intermediate results of one plane round trip, for callers that want to
/// look inside the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneInspection {
    /// Spatial samples of every processed block, before the transform.
    pub source_blocks: Vec<DMatrix<f64>>,
    /// Coefficients after truncation (and quantization, when enabled).
    pub coefficients: CoefficientGrid,
    pub reconstructed: PixelMatrix<f64>,
}

/// Forward DCT, zigzag truncation and inverse DCT over the blocks of a plane.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    tables: Arc<BlockTables>,
    edge_policy: EdgePolicy,
    quantization_table: Option<[u8; 64]>,
}

impl FrameCodec {
    pub fn new(block_size: usize, edge_policy: EdgePolicy) -> Result<FrameCodec> {
        Ok(FrameCodec {
            tables: tables_for(block_size)?,
            edge_policy,
            quantization_table: None,
        })
    }

    /// Rounds every kept coefficient to a multiple of its table entry.
    pub fn with_quantization(mut self, table: [u8; 64]) -> Result<FrameCodec> {
        if self.block_size() != QUANTIZATION_BLOCK_SIZE {
            return Err(Error::QuantizationUnsupported(self.block_size()));
        }
        self.quantization_table = Some(table);
        Ok(self)
    }

    pub fn block_size(&self) -> usize {
        self.tables.size()
    }

    pub fn tables(&self) -> &Arc<BlockTables> {
        &self.tables
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    fn check_keep(&self, keep: usize) -> Result<()> {
        let max = self.tables.coefficient_count();
        if keep > max {
            return Err(Error::InvalidKeepCount { keep, max });
        }
        Ok(())
    }

    fn source_blocks<T>(&self, plane: &PixelMatrix<T>) -> Result<(usize, usize, Vec<DMatrix<f64>>)>
        where T: Into<f64> + Default + Copy + Debug
    {
        if plane.width == 0 || plane.height == 0 {
            return Err(Error::InvalidDimensions { width: plane.width, height: plane.height });
        }
        let n = self.block_size();
        let mut iterator = plane.get_block_iterator(n, n, self.edge_policy);
        let blocks_per_row = iterator.get_blocks_per_row();
        let blocks_per_column = iterator.get_blocks_per_column();

        let dropped = iterator.dropped_samples();
        if dropped > 0 {
            warn!(
                "{}x{} plane: {} samples outside whole {}x{} blocks are not transformed",
                plane.width,
                plane.height,
                dropped,
                n,
                n
            );
        }

        let mut blocks = Vec::with_capacity(iterator.get_blocks_amount());
        let mut non_finite = None;
        iterator.for_each_block(
            &mut (|block_row: usize, block_col: usize, samples: &mut Vec<T>| {
                let values: Vec<f64> = samples.iter().map(|s| (*s).into()).collect();
                if non_finite.is_none() {
                    if let Some(offset) = values.iter().position(|v| !v.is_finite()) {
                        let (i, j) = (offset / n, offset % n);
                        non_finite = Some((block_row * n + i) * plane.width + block_col * n + j);
                    }
                }
                blocks.push(DMatrix::from_row_slice(n, n, &values));
            })
        );
        if let Some(index) = non_finite {
            return Err(Error::NonFiniteSample { index });
        }

        debug!(
            "{}x{} plane split into {}x{} blocks of {}x{}",
            plane.width,
            plane.height,
            blocks_per_column,
            blocks_per_row,
            n,
            n
        );
        Ok((blocks_per_row, blocks_per_column, blocks))
    }

    /// Zeroes every coefficient whose zigzag position is `keep` or later.
    pub fn truncate(&self, coeffs: &DMatrix<f64>, keep: usize) -> DMatrix<f64> {
        let zigzag = &self.tables.zigzag;
        DMatrix::from_fn(coeffs.nrows(), coeffs.ncols(), |i, j| {
            if zigzag.is_kept(i, j, keep) { coeffs[(i, j)] } else { 0.0 }
        })
    }

    fn encode_block(&self, block: &DMatrix<f64>, keep: usize) -> DMatrix<f64> {
        let coeffs = self.truncate(&self.tables.basis.forward_2d(block), keep);
        match &self.quantization_table {
            Some(table) => dequantize(&quantize(&coeffs, table), table),
            None => coeffs,
        }
    }

    /// One truncated coefficient matrix per block of `plane`.
    pub fn compute_coefficients<T>(&self, plane: &PixelMatrix<T>, keep: usize) -> Result<CoefficientGrid>
        where T: Into<f64> + Default + Copy + Debug
    {
        self.check_keep(keep)?;
        let (blocks_per_row, blocks_per_column, blocks) = self.source_blocks(plane)?;
        Ok(CoefficientGrid {
            block_size: self.block_size(),
            blocks_per_row,
            blocks_per_column,
            blocks: blocks
                .iter()
                .map(|block| self.encode_block(block, keep))
                .collect(),
        })
    }

    /// Inverse-transforms every block of `grid` into a plane of the given
    /// size. Samples not covered by any block are 0.
    pub fn reconstruct_plane(&self, grid: &CoefficientGrid, width: usize, height: usize) -> Result<PixelMatrix<f64>> {
        let mut plane = PixelMatrix::new_with_default(width, height);
        self.reconstruct_onto(grid, &mut plane)?;
        Ok(plane)
    }

    /// Like [`FrameCodec::reconstruct_plane`], but samples not covered by any
    /// block keep the values already in `plane`.
    pub fn reconstruct_onto(&self, grid: &CoefficientGrid, plane: &mut PixelMatrix<f64>) -> Result<()> {
        let n = self.block_size();
        let expected_row = self.edge_policy.block_count(plane.width, n);
        let expected_column = self.edge_policy.block_count(plane.height, n);
        if grid.block_size != n ||
            grid.blocks_per_row != expected_row ||
            grid.blocks_per_column != expected_column ||
            grid.blocks.len() != expected_row * expected_column
        {
            return Err(Error::DimensionMismatch {
                expected: (plane.width, plane.height),
                actual: (grid.blocks_per_row * grid.block_size, grid.blocks_per_column * grid.block_size),
            });
        }

        for (idx, coeffs) in grid.blocks.iter().enumerate() {
            let (block_row, block_col) = (idx / grid.blocks_per_row, idx % grid.blocks_per_row);
            trace!("reconstructing block ({}, {})", block_row, block_col);
            let block = self.tables.basis.inverse_2d(coeffs);
            // nalgebra is column-major, set_block wants row-major
            let samples: Vec<f64> = block.transpose().iter().copied().collect();
            plane.set_block(block_row, block_col, n, n, &samples);
        }
        Ok(())
    }

    /// Full round trip of one plane. The reconstruction starts from a copy of
    /// the source, so samples left out of the block grid pass through.
    pub fn process_plane<T>(&self, plane: &PixelMatrix<T>, keep: usize) -> Result<PlaneInspection>
        where T: Into<f64> + Default + Copy + Debug
    {
        self.check_keep(keep)?;
        let (blocks_per_row, blocks_per_column, source_blocks) = self.source_blocks(plane)?;
        let coefficients = CoefficientGrid {
            block_size: self.block_size(),
            blocks_per_row,
            blocks_per_column,
            blocks: source_blocks
                .iter()
                .map(|block| self.encode_block(block, keep))
                .collect(),
        };

        let mut reconstructed: PixelMatrix<f64> = plane.map(|s| (*s).into());
        self.reconstruct_onto(&coefficients, &mut reconstructed)?;

        Ok(PlaneInspection {
            source_blocks,
            coefficients,
            reconstructed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::jpeg::quant_tables::DEFAULT_Y_QUANTIZATION_TABLE;

    fn gradient_plane(width: usize, height: usize) -> PixelMatrix<u8> {
        let pixels = (0..width * height)
            .map(|k| (((k % width) * 13 + (k / width) * 7 + (k * k) % 17) % 256) as u8)
            .collect();
        PixelMatrix::new_from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn keeping_everything_is_lossless() {
        let plane = gradient_plane(16, 16);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let inspection = codec.process_plane(&plane, 64).unwrap();
        for (restored, source) in inspection.reconstructed.pixels.iter().zip(&plane.pixels) {
            assert_abs_diff_eq!(*restored, *source as f64, epsilon = 1e-6);
        }
        assert_eq!(inspection.source_blocks.len(), 4);
    }

    #[test]
    fn keeping_nothing_gives_zero_blocks() {
        let plane = gradient_plane(8, 8);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let grid = codec.compute_coefficients(&plane, 0).unwrap();
        assert_eq!(grid.zero_count(), 64);
        let restored = codec.reconstruct_plane(&grid, 8, 8).unwrap();
        assert!(restored.pixels.iter().all(|p| p.abs() < 1e-12));
    }

    #[test]
    fn dc_only_reconstructs_block_means() {
        let plane = gradient_plane(8, 8);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let inspection = codec.process_plane(&plane, 1).unwrap();
        let mean = plane.pixels.iter().map(|p| *p as f64).sum::<f64>() / 64.0;
        for p in &inspection.reconstructed.pixels {
            assert_abs_diff_eq!(*p, mean, epsilon = 1e-9);
        }
    }

    #[test]
    fn truncation_is_monotonic() {
        let plane = gradient_plane(8, 8);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let full = codec.compute_coefficients(&plane, 64).unwrap();
        let zigzag = &codec.tables().zigzag;
        let mut previous_zeros = usize::MAX;
        for keep in 0..=64 {
            let grid = codec.compute_coefficients(&plane, keep).unwrap();
            let block = grid.block(0, 0);
            for i in 0..8 {
                for j in 0..8 {
                    if zigzag.rank(i, j) < keep {
                        assert_eq!(block[(i, j)], full.block(0, 0)[(i, j)]);
                    } else {
                        assert_eq!(block[(i, j)], 0.0);
                    }
                }
            }
            let zeros = grid.zero_count();
            assert!(zeros <= previous_zeros);
            previous_zeros = zeros;
        }
    }

    #[test]
    fn dropped_edges_pass_through() {
        let plane = gradient_plane(10, 9);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let inspection = codec.process_plane(&plane, 3).unwrap();
        assert_eq!(inspection.coefficients.len(), 1);
        for row in 0..9 {
            for col in 0..10 {
                if row >= 8 || col >= 8 {
                    assert_eq!(
                        inspection.reconstructed.get_pixel(row, col),
                        plane.get_pixel(row, col).map(|p| p as f64)
                    );
                }
            }
        }

        let zeroed = codec.reconstruct_plane(&inspection.coefficients, 10, 9).unwrap();
        assert_eq!(zeroed.get_pixel(8, 9), Some(0.0));
    }

    #[test]
    fn zero_padding_covers_edges() {
        let plane = gradient_plane(10, 9);
        let codec = FrameCodec::new(8, EdgePolicy::ZeroPad).unwrap();
        let inspection = codec.process_plane(&plane, 64).unwrap();
        assert_eq!(inspection.coefficients.len(), 4);
        for (restored, source) in inspection.reconstructed.pixels.iter().zip(&plane.pixels) {
            assert_abs_diff_eq!(*restored, *source as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn plane_smaller_than_a_block() {
        let plane = gradient_plane(5, 5);
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let inspection = codec.process_plane(&plane, 10).unwrap();
        assert!(inspection.coefficients.is_empty());
        assert_eq!(inspection.reconstructed, plane.map(|p| *p as f64));
    }

    #[test]
    fn invalid_arguments() {
        let codec = FrameCodec::new(8, EdgePolicy::Drop).unwrap();
        let plane = gradient_plane(8, 8);
        assert_eq!(
            codec.compute_coefficients(&plane, 65).unwrap_err(),
            Error::InvalidKeepCount { keep: 65, max: 64 }
        );
        let empty = PixelMatrix::<u8>::new_with_default(0, 4);
        assert!(matches!(codec.compute_coefficients(&empty, 1), Err(Error::InvalidDimensions { .. })));
        assert_eq!(FrameCodec::new(0, EdgePolicy::Drop).unwrap_err(), Error::InvalidBlockSize(0));

        let grid = codec.compute_coefficients(&plane, 64).unwrap();
        assert!(matches!(codec.reconstruct_plane(&grid, 16, 8), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn non_finite_samples_are_reported() {
        let mut plane = gradient_plane(8, 8).map(|p| *p as f64);
        plane.set_pixel(3, 5, f64::NAN);
        let codec = FrameCodec::new(4, EdgePolicy::Drop).unwrap();
        assert_eq!(
            codec.process_plane(&plane, 16).unwrap_err(),
            Error::NonFiniteSample { index: 3 * 8 + 5 }
        );
    }

    #[test]
    fn quantization_needs_8x8() {
        let codec = FrameCodec::new(4, EdgePolicy::Drop).unwrap();
        assert_eq!(
            codec.with_quantization(DEFAULT_Y_QUANTIZATION_TABLE).unwrap_err(),
            Error::QuantizationUnsupported(4)
        );

        let codec = FrameCodec::new(8, EdgePolicy::Drop)
            .unwrap()
            .with_quantization(DEFAULT_Y_QUANTIZATION_TABLE)
            .unwrap();
        let grid = codec.compute_coefficients(&gradient_plane(8, 8), 64).unwrap();
        let dc = grid.block(0, 0)[(0, 0)];
        assert_eq!(dc % 16.0, 0.0);
    }
}
