use byteorder::{ ByteOrder, LittleEndian };
use std::fs;
use std::path::Path;

use crate::error::{ Error, Result };
use crate::pixel_matrix::PixelMatrix;
use crate::utils::colorspace::RGBValue;

const BMP_MAGIC: &[u8; 2] = b"BM";
const BMP_IMAGE_DATA_START_OFFSET: usize = 10;
const BMP_PIXEL_WIDTH_OFFSET: usize = 18;
const BMP_PIXEL_HEIGHT_OFFSET: usize = 22;
const BMP_BITS_PER_PIXEL_OFFSET: usize = 28;
const BMP_HEADER_SIZE: usize = 30;

/// A decoded pixel buffer with three bytes per pixel in blue, green, red
/// order. `stride` is the distance in bytes between the starts of two rows.
#[derive(Debug, Clone, Copy)]
pub struct BitmapView<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub offset: usize,
    pub stride: usize,
    /// The first row in `data` is the bottom row of the image.
    pub bottom_up: bool,
}

impl<'a> BitmapView<'a> {
    /// Tightly packed, top-down rows starting at byte 0.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> BitmapView<'a> {
        BitmapView {
            data,
            width,
            height,
            offset: 0,
            stride: width * 3,
            bottom_up: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        if self.stride < self.width * 3 {
            return Err(Error::InvalidBitmap("row stride shorter than a row of pixels"));
        }
        let expected = self.offset + (self.height - 1) * self.stride + self.width * 3;
        if self.data.len() < expected {
            return Err(Error::BufferTooSmall { expected, actual: self.data.len() });
        }
        Ok(())
    }

    /// BGR bytes of the pixel at (`row`, `col`), with row 0 at the top.
    pub fn bgr(&self, row: usize, col: usize) -> (u8, u8, u8) {
        let stored_row = if self.bottom_up { self.height - 1 - row } else { row };
        let start = self.offset + stored_row * self.stride + col * 3;
        (self.data[start], self.data[start + 1], self.data[start + 2])
    }

    pub fn load_pixels(&self) -> Result<PixelMatrix<RGBValue>> {
        self.validate()?;
        let mut pixels = PixelMatrix::new(self.width, self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let (b, g, r) = self.bgr(row, col);
                pixels.push_next((r, g, b));
            }
        }
        Ok(pixels)
    }
}

/// A 24-bit BMP file held in memory.
#[derive(Debug, Clone)]
pub struct BmpImage {
    data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    image_data_offset: usize,
    bottom_up: bool,
}

impl BmpImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BmpImage> {
        BmpImage::from_bytes(fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<BmpImage> {
        if data.len() < BMP_HEADER_SIZE {
            return Err(Error::InvalidBitmap("file shorter than the bitmap header"));
        }
        if &data[0..2] != BMP_MAGIC {
            return Err(Error::InvalidBitmap("missing BM signature"));
        }

        let read_u32 = |at: usize| LittleEndian::read_u32(&data[at..at + 4]);
        let image_data_offset = read_u32(BMP_IMAGE_DATA_START_OFFSET) as usize;
        let width = LittleEndian::read_i32(&data[BMP_PIXEL_WIDTH_OFFSET..BMP_PIXEL_WIDTH_OFFSET + 4]);
        let height = LittleEndian::read_i32(&data[BMP_PIXEL_HEIGHT_OFFSET..BMP_PIXEL_HEIGHT_OFFSET + 4]);
        let bits_per_pixel = LittleEndian::read_u16(
            &data[BMP_BITS_PER_PIXEL_OFFSET..BMP_BITS_PER_PIXEL_OFFSET + 2]
        );

        if bits_per_pixel != 24 {
            return Err(Error::UnsupportedBitDepth(bits_per_pixel));
        }
        if width <= 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width.unsigned_abs() as usize,
                height: height.unsigned_abs() as usize,
            });
        }

        // a negative height marks rows stored top to bottom
        let image = BmpImage {
            width: width as usize,
            height: height.unsigned_abs() as usize,
            bottom_up: height > 0,
            image_data_offset,
            data,
        };
        image.view().validate()?;
        Ok(image)
    }

    /// Rows are padded so that their size in bytes is a multiple of 4.
    pub fn row_stride(&self) -> usize {
        (self.width * 3).div_ceil(4) * 4
    }

    pub fn view(&self) -> BitmapView<'_> {
        BitmapView {
            data: &self.data,
            width: self.width,
            height: self.height,
            offset: self.image_data_offset,
            stride: self.row_stride(),
            bottom_up: self.bottom_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::bmp_writer::encode_bmp;

    fn sample_pixels() -> PixelMatrix<RGBValue> {
        // 3 pixels wide so every row needs 3 bytes of padding
        PixelMatrix::new_from_pixels(3, 2, vec![
            (255, 0, 0), (0, 255, 0), (0, 0, 255),
            (10, 20, 30), (40, 50, 60), (70, 80, 90),
        ]).unwrap()
    }

    #[test]
    fn reads_back_written_bitmap() {
        let pixels = sample_pixels();
        let image = BmpImage::from_bytes(encode_bmp(&pixels).unwrap()).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.row_stride(), 12);
        assert_eq!(image.view().load_pixels().unwrap(), pixels);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(matches!(BmpImage::from_bytes(vec![0; 10]), Err(Error::InvalidBitmap(_))));

        let mut data = encode_bmp(&sample_pixels()).unwrap();
        data[0] = b'X';
        assert!(matches!(BmpImage::from_bytes(data), Err(Error::InvalidBitmap(_))));

        let mut data = encode_bmp(&sample_pixels()).unwrap();
        data[BMP_BITS_PER_PIXEL_OFFSET] = 32;
        assert_eq!(BmpImage::from_bytes(data).unwrap_err(), Error::UnsupportedBitDepth(32));

        let mut data = encode_bmp(&sample_pixels()).unwrap();
        data.truncate(data.len() - 4);
        assert!(matches!(BmpImage::from_bytes(data), Err(Error::BufferTooSmall { .. })));
    }

    #[test]
    fn view_reads_bgr_triples() {
        let data = [3u8, 2, 1, 6, 5, 4];
        let view = BitmapView::new(&data, 2, 1);
        assert_eq!(view.load_pixels().unwrap().pixels, vec![(1, 2, 3), (4, 5, 6)]);
    }

    #[test]
    fn bottom_up_view_flips_rows() {
        let data = [1u8, 1, 1, 2, 2, 2];
        let view = BitmapView { bottom_up: true, ..BitmapView::new(&data, 1, 2) };
        assert_eq!(view.load_pixels().unwrap().pixels, vec![(2, 2, 2), (1, 1, 1)]);
    }

    #[test]
    fn view_checks_buffer_size() {
        let data = [0u8; 5];
        assert_eq!(
            BitmapView::new(&data, 2, 1).validate(),
            Err(Error::BufferTooSmall { expected: 6, actual: 5 })
        );
        assert!(BitmapView::new(&data, 0, 1).validate().is_err());
    }
}
