use std::thread;

use log::debug;

use crate::bmp::bmp_image::BitmapView;
use crate::error::{ Error, Result };
use crate::jpeg::codec::{ FrameCodec, PlaneInspection };
use crate::jpeg::quant_tables::{ DEFAULT_CH_QUANTIZATION_TABLE, DEFAULT_Y_QUANTIZATION_TABLE };
use crate::jpeg::sampling::{ ChromaGrid, SubsamplingRatio };
use crate::pixel_matrix::{ EdgePolicy, PixelMatrix };
use crate::utils::colorspace::{ rgb_to_ycbcr, ycc_to_rgb, RGBValue, Ycc };

pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Tunable parameters of a frame round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecParams {
    pub block_size: usize,
    /// Coefficients kept per luma block, in zigzag order.
    pub luma_keep: usize,
    /// Coefficients kept per chroma block, in zigzag order.
    pub chroma_keep: usize,
    /// Chroma layout used when a [`Frame`] is built from these parameters.
    pub subsampling: SubsamplingRatio,
    pub edge_policy: EdgePolicy,
    pub quantize: bool,
}

impl Default for CodecParams {
    fn default() -> Self {
        CodecParams {
            block_size: DEFAULT_BLOCK_SIZE,
            luma_keep: DEFAULT_BLOCK_SIZE * DEFAULT_BLOCK_SIZE,
            chroma_keep: DEFAULT_BLOCK_SIZE * DEFAULT_BLOCK_SIZE,
            subsampling: SubsamplingRatio::default(),
            edge_policy: EdgePolicy::default(),
            quantize: false,
        }
    }
}

impl CodecParams {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        let max = self.block_size * self.block_size;
        for keep in [self.luma_keep, self.chroma_keep] {
            if keep > max {
                return Err(Error::InvalidKeepCount { keep, max });
            }
        }
        Ok(())
    }
}

/// A frame split into a full-resolution luma plane and two subsampled
/// chroma planes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub grid: ChromaGrid,
    pub y_channel: PixelMatrix<u8>,
    pub cb_channel: PixelMatrix<u8>,
    pub cr_channel: PixelMatrix<u8>,
}

impl Frame {
    pub fn from_rgb(pixels: &PixelMatrix<RGBValue>, subsampling: SubsamplingRatio) -> Result<Frame> {
        let grid = ChromaGrid::new(pixels.width, pixels.height, subsampling)?;

        let mut y_channel = PixelMatrix::new(pixels.width, pixels.height);
        let mut cb_full = PixelMatrix::new(pixels.width, pixels.height);
        let mut cr_full = PixelMatrix::new(pixels.width, pixels.height);
        pixels.for_each_pixel(
            &mut (|rgb: &RGBValue| {
                let (y, cb, cr) = rgb_to_ycbcr(*rgb);
                y_channel.push_next(y);
                cb_full.push_next(cb);
                cr_full.push_next(cr);
            })
        );

        Ok(Frame {
            width: pixels.width,
            height: pixels.height,
            grid,
            y_channel,
            cb_channel: grid.subsample(&cb_full),
            cr_channel: grid.subsample(&cr_full),
        })
    }

    pub fn from_bitmap(view: &BitmapView<'_>, subsampling: SubsamplingRatio) -> Result<Frame> {
        Frame::from_rgb(&view.load_pixels()?, subsampling)
    }

    /// Colour image of the planes as they are, with chroma replicated over
    /// each subsampling cell.
    pub fn to_rgb(&self) -> PixelMatrix<RGBValue> {
        let to_f64 = |p: &u8| *p as f64;
        merge_planes(
            &self.grid,
            &self.y_channel.map(to_f64),
            Some((&self.cb_channel.map(to_f64), &self.cr_channel.map(to_f64)))
        )
    }

    /// Round-trips the three planes through the block codec. Luma and the
    /// two chroma planes are processed on separate threads.
    pub fn compress(&self, params: &CodecParams) -> Result<CompressedFrame> {
        params.validate()?;
        let mut luma_codec = FrameCodec::new(params.block_size, params.edge_policy)?;
        let mut chroma_codec = FrameCodec::new(params.block_size, params.edge_policy)?;
        if params.quantize {
            luma_codec = luma_codec.with_quantization(DEFAULT_Y_QUANTIZATION_TABLE)?;
            chroma_codec = chroma_codec.with_quantization(DEFAULT_CH_QUANTIZATION_TABLE)?;
        }
        debug!(
            "compressing {}x{} frame ({}), keeping {} luma / {} chroma coefficients",
            self.width,
            self.height,
            params.block_size,
            params.luma_keep,
            params.chroma_keep
        );

        let (luma, cb, cr) = thread::scope(|s| {
            let y_handle = s.spawn(|| luma_codec.process_plane(&self.y_channel, params.luma_keep));
            let cb_handle = s.spawn(|| chroma_codec.process_plane(&self.cb_channel, params.chroma_keep));
            let cr_handle = s.spawn(|| chroma_codec.process_plane(&self.cr_channel, params.chroma_keep));

            (join_plane(y_handle), join_plane(cb_handle), join_plane(cr_handle))
        });

        Ok(CompressedFrame {
            width: self.width,
            height: self.height,
            grid: self.grid,
            luma: luma?,
            cb: cb?,
            cr: cr?,
        })
    }
}

/// Result of [`Frame::compress`], with the inspection data of every plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedFrame {
    pub width: usize,
    pub height: usize,
    pub grid: ChromaGrid,
    pub luma: PlaneInspection,
    pub cb: PlaneInspection,
    pub cr: PlaneInspection,
}

impl CompressedFrame {
    pub fn to_rgb(&self) -> PixelMatrix<RGBValue> {
        merge_planes(
            &self.grid,
            &self.luma.reconstructed,
            Some((&self.cb.reconstructed, &self.cr.reconstructed))
        )
    }

    /// Greyscale rendering of the reconstructed luma.
    pub fn luma_to_rgb(&self) -> PixelMatrix<RGBValue> {
        merge_planes(&self.grid, &self.luma.reconstructed, None)
    }
}

fn join_plane(handle: thread::ScopedJoinHandle<'_, Result<PlaneInspection>>) -> Result<PlaneInspection> {
    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn merge_planes(
    grid: &ChromaGrid,
    luma: &PixelMatrix<f64>,
    chroma: Option<(&PixelMatrix<f64>, &PixelMatrix<f64>)>
) -> PixelMatrix<RGBValue> {
    let chroma = chroma.map(|(cb, cr)| (grid.upsample(cb), grid.upsample(cr)));
    let mut rgb = PixelMatrix::new(luma.width, luma.height);
    for (idx, y) in luma.pixels.iter().enumerate() {
        let ycc = match &chroma {
            Some((cb, cr)) => Ycc::new(*y, cb.pixels[idx], cr.pixels[idx]),
            None => Ycc::luma_only(*y),
        };
        rgb.push_next(ycc_to_rgb(ycc));
    }
    rgb
}
