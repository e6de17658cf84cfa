pub mod block_iterator;
pub mod pixel_matrix;

pub use block_iterator::{ Block, EdgePolicy, PixelMatrixBlockIterator };
pub use pixel_matrix::PixelMatrix;
