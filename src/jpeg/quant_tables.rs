use nalgebra::DMatrix;

/// Block size the standard tables are defined for.
pub const QUANTIZATION_BLOCK_SIZE: usize = 8;

/// Annex K luminance table, row-major.
#[rustfmt::skip]
pub const DEFAULT_Y_QUANTIZATION_TABLE: [u8; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Annex K chrominance table, row-major.
#[rustfmt::skip]
pub const DEFAULT_CH_QUANTIZATION_TABLE: [u8; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Divides each coefficient by its table entry and rounds. `coeffs` must be 8x8.
pub fn quantize(coeffs: &DMatrix<f64>, table: &[u8; 64]) -> DMatrix<f64> {
    DMatrix::from_fn(coeffs.nrows(), coeffs.ncols(), |i, j| {
        (coeffs[(i, j)] / (table[i * QUANTIZATION_BLOCK_SIZE + j] as f64)).round()
    })
}

pub fn dequantize(quantized: &DMatrix<f64>, table: &[u8; 64]) -> DMatrix<f64> {
    DMatrix::from_fn(quantized.nrows(), quantized.ncols(), |i, j| {
        quantized[(i, j)] * (table[i * QUANTIZATION_BLOCK_SIZE + j] as f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequantized_values_are_table_multiples() {
        let coeffs = DMatrix::from_fn(8, 8, |i, j| (i as f64 - 3.5) * 41.0 + j as f64 * 7.3);
        let restored = dequantize(&quantize(&coeffs, &DEFAULT_CH_QUANTIZATION_TABLE), &DEFAULT_CH_QUANTIZATION_TABLE);
        for i in 0..8 {
            for j in 0..8 {
                let q = DEFAULT_CH_QUANTIZATION_TABLE[i * 8 + j] as f64;
                assert_eq!(restored[(i, j)] % q, 0.0);
                assert!((restored[(i, j)] - coeffs[(i, j)]).abs() <= q / 2.0);
            }
        }
    }
}
