use anyhow::{ bail, Result };
use clap::Parser;

use crate::jpeg::frame::{ CodecParams, DEFAULT_BLOCK_SIZE };
use crate::jpeg::sampling::SubsamplingRatio;
use crate::pixel_matrix::EdgePolicy;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// the input image path
    #[arg(short, long, required = true)]
    pub image: String,

    /// the output image path (optional)
    #[arg(short, long, default_value_t = String::new())]
    pub output: String,

    /// Side length of the square DCT blocks
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Coefficients kept per luma block, in zigzag order (defaults to all)
    #[arg(short, long)]
    pub luma_keep: Option<usize>,

    /// Coefficients kept per chroma block, in zigzag order (defaults to all)
    #[arg(short, long)]
    pub chroma_keep: Option<usize>,

    /// Subsampling ratio in the format `4:2:0`, `4:4:4`, or `4:2:2`
    #[arg(short, long, value_parser = parse_subsampling_ratio, default_value = "4:2:0")]
    pub subsampling_ratio: SubsamplingRatio,

    /// What to do with partial blocks at the right and bottom edges
    #[arg(short, long, value_enum, default_value_t = EdgePolicy::Drop)]
    pub edge_policy: EdgePolicy,

    /// Round kept coefficients with the standard quantization tables (8x8 only)
    #[arg(short, long)]
    pub quantize: bool,

    /// Write the reconstructed luma as a greyscale image
    #[arg(long)]
    pub luma_only: bool,
}

fn parse_subsampling_ratio(s: &str) -> std::result::Result<SubsamplingRatio, String> {
    s.parse::<SubsamplingRatio>().map_err(|err| err.to_string())
}

impl Args {
    pub fn get_args() -> Result<Args> {
        Args::parse().finish()
    }

    fn finish(mut self) -> Result<Args> {
        let stem = match self.image.strip_suffix(".bmp") {
            Some(stem) => stem.to_string(),
            None => bail!("Input image must be a .bmp file"),
        };

        if self.output.is_empty() {
            self.output = format!("{}.reconstructed.bmp", stem);
        }

        self.codec_params().validate()?;
        Ok(self)
    }

    pub fn codec_params(&self) -> CodecParams {
        let all = self.block_size * self.block_size;
        CodecParams {
            block_size: self.block_size,
            luma_keep: self.luma_keep.unwrap_or(all),
            chroma_keep: self.chroma_keep.unwrap_or(all),
            subsampling: self.subsampling_ratio,
            edge_policy: self.edge_policy,
            quantize: self.quantize,
        }
    }

    pub fn print_args(&self) {
        let params = self.codec_params();
        println!("image: \"{}\"", self.image);
        println!("output: \"{}\"", self.output);
        println!("block size: {}", params.block_size);
        println!("luma coefficients kept: {}", params.luma_keep);
        println!("chroma coefficients kept: {}", params.chroma_keep);
        println!("subsampling ratio: \"{}\"", params.subsampling);
        println!("edge policy: \"{:?}\"", params.edge_policy);
        println!("quantize: {}", params.quantize);
        println!();
    }
}
