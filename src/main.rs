use std::fs::File;
use std::io::{ BufWriter, Write };

use anyhow::{ Context, Result };
use log::info;

use jpeg_dct_lab::bmp::{ bmp_image::BmpImage, bmp_writer::write_bmp };
use jpeg_dct_lab::utils::arguments::Args;
use jpeg_dct_lab::Frame;

fn main() -> Result<()> {
    env_logger::init();

    // parse arguments

    let args: Args = Args::get_args()?;
    args.print_args();
    let params = args.codec_params();

    // load the bitmap and convert it to subsampled ycbcr planes

    let bmp_image = BmpImage::open(&args.image)
        .with_context(|| format!("Could not open bitmap image \"{}\"", args.image))?;
    let frame = Frame::from_bitmap(&bmp_image.view(), params.subsampling)?;
    info!("loaded {}x{} image", frame.width, frame.height);

    // forward DCT, zigzag truncation and inverse DCT of every plane

    let compressed = frame.compress(&params)?;
    info!(
        "zeroed coefficients: y {}, cb {}, cr {}",
        compressed.luma.coefficients.zero_count(),
        compressed.cb.coefficients.zero_count(),
        compressed.cr.coefficients.zero_count()
    );

    // write to output file

    let pixels = if args.luma_only { compressed.luma_to_rgb() } else { compressed.to_rgb() };
    let file = File::create(&args.output)
        .with_context(|| format!("Could not create output image \"{}\"", args.output))?;
    let mut writer = BufWriter::new(file);
    write_bmp(&mut writer, &pixels)?;
    writer.flush()?;

    println!("reconstructed image written to \"{}\"", args.output);
    Ok(())
}
