use std::f64::consts::PI;

use nalgebra::DMatrix;

use crate::error::{ Error, Result };

/// Orthonormal N x N cosine basis. Row `w` holds frequency `w` sampled at the
/// N positions, so the transpose is the inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct DctBasis {
    size: usize,
    matrix: DMatrix<f64>,
    transpose: DMatrix<f64>,
}

impl DctBasis {
    pub fn new(size: usize) -> Result<DctBasis> {
        if size == 0 {
            return Err(Error::InvalidBlockSize(size));
        }
        let n = size as f64;
        let dc_scale = 1.0 / n.sqrt();
        let ac_scale = (2.0 / n).sqrt();

        let matrix = DMatrix::from_fn(size, size, |w, i| {
            let scale = if w == 0 { dc_scale } else { ac_scale };
            scale * ((((2 * i + 1) * w) as f64) * PI / (2.0 * n)).cos()
        });
        let transpose = matrix.transpose();

        Ok(DctBasis { size, matrix, transpose })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn transpose(&self) -> &DMatrix<f64> {
        &self.transpose
    }

    /// basis · block · basisᵀ
    pub fn forward_2d(&self, block: &DMatrix<f64>) -> DMatrix<f64> {
        &self.matrix * block * &self.transpose
    }

    /// basisᵀ · coeffs · basis
    pub fn inverse_2d(&self, coeffs: &DMatrix<f64>) -> DMatrix<f64> {
        &self.transpose * coeffs * &self.matrix
    }

    /// One-dimensional pass over every row of the block (block · basisᵀ).
    pub fn forward_rows(&self, block: &DMatrix<f64>) -> DMatrix<f64> {
        block * &self.transpose
    }

    /// Spatial pattern of the frequency pair (`u` vertical, `v` horizontal),
    /// without normalization, so every cell lies in [-1, 1].
    pub fn basis_pattern(&self, u: usize, v: usize) -> DMatrix<f64> {
        let n = self.size as f64;
        DMatrix::from_fn(self.size, self.size, |i, j| {
            let vertical = ((((2 * i + 1) * u) as f64) * PI / (2.0 * n)).cos();
            let horizontal = ((((2 * j + 1) * v) as f64) * PI / (2.0 * n)).cos();
            vertical * horizontal
        })
    }
}
