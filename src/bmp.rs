pub mod bmp_image;
pub mod bmp_writer;
