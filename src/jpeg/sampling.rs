use std::fmt::{ self, Debug, Display };
use std::str::FromStr;

use crate::error::{ Error, Result };
use crate::pixel_matrix::PixelMatrix;

pub const DEFAULT_DOWNSAMPLING_RATIO: (u8, u8, u8) = (4, 2, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubsamplingRatio {
    Yuv444,
    Yuv422,
    #[default]
    Yuv420,
}

impl SubsamplingRatio {
    pub fn from_ratio(ratio: (u8, u8, u8)) -> Result<SubsamplingRatio> {
        match ratio {
            (4, 4, 4) => Ok(SubsamplingRatio::Yuv444),
            (4, 2, 2) => Ok(SubsamplingRatio::Yuv422),
            (4, 2, 0) => Ok(SubsamplingRatio::Yuv420),
            (a, b, c) => Err(Error::InvalidSubsampling(format!("{}:{}:{}", a, b, c))),
        }
    }

    pub fn ratio(&self) -> (u8, u8, u8) {
        match self {
            SubsamplingRatio::Yuv444 => (4, 4, 4),
            SubsamplingRatio::Yuv422 => (4, 2, 2),
            SubsamplingRatio::Yuv420 => (4, 2, 0),
        }
    }

    /// The horizontal and vertical factors by which the chrominance channels
    /// are downsampled.
    pub fn get_downsampling_factor(&self) -> (usize, usize) {
        match self {
            SubsamplingRatio::Yuv444 => (1, 1),
            SubsamplingRatio::Yuv422 => (2, 1),
            SubsamplingRatio::Yuv420 => (2, 2),
        }
    }
}

impl Display for SubsamplingRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c) = self.ratio();
        write!(f, "{}:{}:{}", a, b, c)
    }
}

impl FromStr for SubsamplingRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<SubsamplingRatio> {
        let invalid = || Error::InvalidSubsampling(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let parsed: std::result::Result<Vec<u8>, _> = parts
            .iter()
            .map(|part| part.trim().parse::<u8>())
            .collect();
        match parsed {
            Ok(values) => Self::from_ratio((values[0], values[1], values[2])),
            Err(_) => Err(invalid()),
        }
    }
}

/// Index mapping between a full-resolution plane and its subsampled chroma
/// planes. Each chroma sample covers an h x v cell of full-resolution
/// positions; cells on the right and bottom edges may be partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaGrid {
    pub width: usize,
    pub height: usize,
    pub horizontal: usize,
    pub vertical: usize,
    pub chroma_width: usize,
    pub chroma_height: usize,
}

impl ChromaGrid {
    pub fn new(width: usize, height: usize, ratio: SubsamplingRatio) -> Result<ChromaGrid> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let (horizontal, vertical) = ratio.get_downsampling_factor();
        Ok(ChromaGrid {
            width,
            height,
            horizontal,
            vertical,
            chroma_width: width.div_ceil(horizontal),
            chroma_height: height.div_ceil(vertical),
        })
    }

    pub fn chroma_len(&self) -> usize {
        self.chroma_width * self.chroma_height
    }

    /// Chroma sample shared by full-resolution position (`x`, `y`).
    pub fn full_to_chroma_index(&self, x: usize, y: usize) -> usize {
        (y / self.vertical) * self.chroma_width + x / self.horizontal
    }

    /// Keeps the top-left sample of every cell. No averaging.
    pub fn subsample<T: Default + Copy + Debug>(&self, plane: &PixelMatrix<T>) -> PixelMatrix<T> {
        let mut chroma = PixelMatrix::new_with_default(self.chroma_width, self.chroma_height);
        for y in (0..self.height).step_by(self.vertical) {
            for x in (0..self.width).step_by(self.horizontal) {
                if let Some(p) = plane.get_pixel(y, x) {
                    chroma.pixels[self.full_to_chroma_index(x, y)] = p;
                }
            }
        }
        chroma
    }

    /// Every full-resolution position reads the chroma sample of its cell.
    pub fn upsample<T: Default + Copy + Debug>(&self, chroma: &PixelMatrix<T>) -> PixelMatrix<T> {
        let mut plane = PixelMatrix::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                plane.push_next(chroma.pixels[self.full_to_chroma_index(x, y)]);
            }
        }
        plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ratios() {
        assert_eq!("4:2:0".parse::<SubsamplingRatio>(), Ok(SubsamplingRatio::Yuv420));
        assert_eq!("4:4:4".parse::<SubsamplingRatio>(), Ok(SubsamplingRatio::Yuv444));
        assert_eq!(
            "4:1:1".parse::<SubsamplingRatio>(),
            Err(Error::InvalidSubsampling("4:1:1".to_string()))
        );
        assert!("4:2".parse::<SubsamplingRatio>().is_err());
        assert!("a:b:c".parse::<SubsamplingRatio>().is_err());
        assert_eq!(SubsamplingRatio::Yuv422.to_string(), "4:2:2");
    }

    #[test]
    fn chroma_dimensions_round_up() {
        let grid = ChromaGrid::new(5, 3, SubsamplingRatio::Yuv420).unwrap();
        assert_eq!((grid.chroma_width, grid.chroma_height), (3, 2));
        let grid = ChromaGrid::new(5, 3, SubsamplingRatio::Yuv422).unwrap();
        assert_eq!((grid.chroma_width, grid.chroma_height), (3, 3));
        assert!(ChromaGrid::new(0, 3, SubsamplingRatio::Yuv420).is_err());
    }

    #[test]
    fn four_by_four_indexing() {
        let grid = ChromaGrid::new(4, 4, SubsamplingRatio::Yuv420).unwrap();
        assert_eq!(grid.chroma_len(), 4);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(grid.full_to_chroma_index(x, y), 0);
        }
        for (x, y) in [(2, 0), (3, 0), (2, 1), (3, 1)] {
            assert_eq!(grid.full_to_chroma_index(x, y), 1);
        }
        assert_eq!(grid.full_to_chroma_index(3, 3), 3);
    }

    #[test]
    fn subsample_takes_top_left() {
        let grid = ChromaGrid::new(3, 3, SubsamplingRatio::Yuv420).unwrap();
        let plane = PixelMatrix::new_from_pixels(3, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let chroma = grid.subsample(&plane);
        assert_eq!(chroma.pixels, vec![1, 3, 7, 9]);

        let restored = grid.upsample(&chroma);
        assert_eq!(restored.pixels, vec![1, 1, 3, 1, 1, 3, 7, 7, 9]);
    }

    #[test]
    fn full_resolution_is_identity() {
        let grid = ChromaGrid::new(2, 2, SubsamplingRatio::Yuv444).unwrap();
        let plane = PixelMatrix::new_from_pixels(2, 2, vec![4u8, 3, 2, 1]).unwrap();
        assert_eq!(grid.upsample(&grid.subsample(&plane)), plane);
    }
}
