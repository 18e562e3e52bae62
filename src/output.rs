use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{render::FrameBuffer, vec3::Float};

/// Take a positive color value in linear space and convert it to gamma 2
fn linear_to_gamma(value: Float) -> Float {
    value.max(0.0).sqrt()
}

/// Gamma-corrected, clamped 8-bit quantization of one channel.
fn quantize(value: Float) -> u8 {
    (256.0 * linear_to_gamma(value).clamp(0.0, 0.999)) as u8
}

/// Flattens the linear frame buffer into packed RGB8 rows, top row first.
pub fn to_rgb8(frame: &FrameBuffer) -> Vec<u8> {
    frame
        .pixels()
        .iter()
        .flat_map(|c| [quantize(c.x), quantize(c.y), quantize(c.z)])
        .collect()
}

pub fn save_png(frame: &FrameBuffer, path: impl AsRef<Path>) -> image::ImageResult<()> {
    image::save_buffer(
        path,
        &to_rgb8(frame),
        frame.width(),
        frame.height(),
        image::ExtendedColorType::Rgb8,
    )
}

pub fn write_ppm<W: Write>(frame: &FrameBuffer, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "P3\n{} {}\n255", frame.width(), frame.height())?;
    for row in to_rgb8(frame).chunks(3) {
        writeln!(writer, "{} {} {}", row[0], row[1], row[2])?;
    }
    Ok(())
}

pub fn save_ppm(frame: &FrameBuffer, path: impl AsRef<Path>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(frame, &mut writer)?;
    writer.flush()
}
