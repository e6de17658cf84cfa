use std::io::{ self, Write };

use byteorder::{ LittleEndian, WriteBytesExt };

use crate::error::{ Error, Result };
use crate::pixel_matrix::PixelMatrix;
use crate::utils::colorspace::RGBValue;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const PIXELS_PER_METER: i32 = 2835; // 72 dpi

fn write_headers<W: Write>(w: &mut W, width: usize, height: usize, row_stride: usize) -> io::Result<()> {
    let image_size = (row_stride * height) as u32;

    // BITMAPFILEHEADER
    w.write_all(b"BM")?;
    w.write_u32::<LittleEndian>(FILE_HEADER_SIZE + INFO_HEADER_SIZE + image_size)?;
    w.write_u32::<LittleEndian>(0)?; // reserved
    w.write_u32::<LittleEndian>(FILE_HEADER_SIZE + INFO_HEADER_SIZE)?; // pixel data offset

    // BITMAPINFOHEADER
    w.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    w.write_i32::<LittleEndian>(width as i32)?;
    w.write_i32::<LittleEndian>(height as i32)?; // positive: bottom-up rows
    w.write_u16::<LittleEndian>(1)?; // planes
    w.write_u16::<LittleEndian>(24)?; // bits per pixel
    w.write_u32::<LittleEndian>(0)?; // no compression
    w.write_u32::<LittleEndian>(image_size)?;
    w.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    w.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    w.write_u32::<LittleEndian>(0)?; // palette colors
    w.write_u32::<LittleEndian>(0) // important colors
}

/// Writes `pixels` as an uncompressed 24-bit BMP.
pub fn write_bmp<W: Write>(w: &mut W, pixels: &PixelMatrix<RGBValue>) -> Result<()> {
    if pixels.width == 0 || pixels.height == 0 {
        return Err(Error::InvalidDimensions { width: pixels.width, height: pixels.height });
    }
    let row_stride = (pixels.width * 3).div_ceil(4) * 4;
    let padding = row_stride - pixels.width * 3;

    write_headers(w, pixels.width, pixels.height, row_stride)?;
    for row in (0..pixels.height).rev() {
        for col in 0..pixels.width {
            let (r, g, b) = pixels.pixels[row * pixels.width + col];
            w.write_all(&[b, g, r])?;
        }
        w.write_all(&[0u8; 3][..padding])?;
    }
    Ok(())
}

pub fn encode_bmp(pixels: &PixelMatrix<RGBValue>) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_bmp(&mut buffer, pixels)?;
    Ok(buffer)
}
