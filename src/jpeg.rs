pub mod codec;
pub mod dct;
pub mod frame;
pub mod quant_tables;
pub mod sampling;
pub mod tables;
pub mod zigzag;
