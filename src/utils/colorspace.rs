use nalgebra::{ Matrix3, Vector3 };
use once_cell::sync::Lazy;

use crate::error::{ Error, Result };

pub type RGBValue = (u8, u8, u8);
pub type YCbCrValue = (u8, u8, u8);

/// A YCbCr triple before quantization to bytes. The forward transform is not
/// clamped, so the components may fall slightly outside [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ycc {
    pub y: f64,
    pub cb: f64,
    pub cr: f64,
}

impl Ycc {
    pub fn new(y: f64, cb: f64, cr: f64) -> Ycc {
        Ycc { y, cb, cr }
    }

    /// Luma with neutral chroma, the greyscale view of a sample.
    pub fn luma_only(y: f64) -> Ycc {
        Ycc { y, cb: YCC_OFFSET[1], cr: YCC_OFFSET[2] }
    }

    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.cb.is_finite() && self.cr.is_finite()
    }

    /// Clamps every component to [0, 255] and rounds it, the form stored in
    /// sample planes.
    pub fn to_bytes(&self) -> YCbCrValue {
        (clamp_round(self.y), clamp_round(self.cb), clamp_round(self.cr))
    }
}

/// The bias added after the forward matrix and removed before the inverse.
/// Luma carries no bias, both chroma differences are centred on 128.
pub const YCC_OFFSET: [f64; 3] = [0.0, 128.0, 128.0];

#[rustfmt::skip]
static YCC_MATRIX: Lazy<Matrix3<f64>> = Lazy::new(|| {
    Matrix3::new(
         0.299,  0.587,  0.114,
        -0.169, -0.331,  0.5,
         0.5,   -0.419, -0.081,
    )
});

static RGB_MATRIX: Lazy<Matrix3<f64>> = Lazy::new(|| {
    YCC_MATRIX.try_inverse().expect("the luma/chroma matrix is non-singular")
});

fn offset() -> Vector3<f64> {
    Vector3::from_column_slice(&YCC_OFFSET)
}

fn clamp_round(x: f64) -> u8 {
    // NaN fails both comparisons and saturates to 0 in the final cast
    if x < 0.0 {
        return 0;
    }
    if x > 255.0 {
        return 255;
    }
    x.round() as u8
}

pub fn rgb_to_ycc((r, g, b): RGBValue) -> Ycc {
    let ycc = *YCC_MATRIX * Vector3::new(r as f64, g as f64, b as f64) + offset();
    Ycc { y: ycc[0], cb: ycc[1], cr: ycc[2] }
}

pub fn rgb_to_ycbcr(rgb: RGBValue) -> YCbCrValue {
    rgb_to_ycc(rgb).to_bytes()
}

/// Removes the bias, applies the inverse matrix, then clamps each channel to
/// [0, 255] and rounds half away from zero.
pub fn ycc_to_rgb(ycc: Ycc) -> RGBValue {
    let rgb = *RGB_MATRIX * (Vector3::new(ycc.y, ycc.cb, ycc.cr) - offset());
    (clamp_round(rgb[0]), clamp_round(rgb[1]), clamp_round(rgb[2]))
}

/// [`ycc_to_rgb`] for callers that cannot rule out NaN or infinite samples.
pub fn checked_ycc_to_rgb(ycc: Ycc, index: usize) -> Result<RGBValue> {
    if !ycc.is_finite() {
        return Err(Error::NonFiniteSample { index });
    }
    Ok(ycc_to_rgb(ycc))
}
