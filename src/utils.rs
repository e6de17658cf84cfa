pub mod arguments;
pub mod colorspace;
