//! Building blocks of a JPEG-style lossy round trip: colour conversion,
//! chroma subsampling, block DCT, zigzag truncation and reconstruction.

pub mod bmp;
pub mod error;
pub mod jpeg;
pub mod pixel_matrix;
pub mod utils;

pub use error::{ Error, Result };
pub use jpeg::codec::{ CoefficientGrid, FrameCodec, PlaneInspection };
pub use jpeg::dct::DctBasis;
pub use jpeg::frame::{ CodecParams, CompressedFrame, Frame };
pub use jpeg::sampling::{ ChromaGrid, SubsamplingRatio };
pub use jpeg::tables::{ tables_for, BlockTables };
pub use jpeg::zigzag::{ coord_to_rank, zigzag_order, ZigzagOrder };
pub use pixel_matrix::{ EdgePolicy, PixelMatrix };
