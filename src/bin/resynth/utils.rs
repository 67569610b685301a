use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{codecs::jpeg::JpegEncoder, ColorType, ImageEncoder};

/// Picks the `image` crate's channel-count-to-`ColorType` mapping.
///
/// Resynthesized output is always `u8` and carries the same channel count
/// as the corpus, so this generalizes the teacher's hardcoded `ColorType::Rgb8`
/// dispatch to every channel count the core supports.
fn color_type(channels: u8) -> Result<ColorType, Box<dyn std::error::Error>> {
    match channels {
        1 => Ok(ColorType::L8),
        2 => Ok(ColorType::La8),
        3 => Ok(ColorType::Rgb8),
        4 => Ok(ColorType::Rgba8),
        other => Err(format!("unsupported channel count: {other}").into()),
    }
}

/// Builds `<stem>.resynth.png` from an input path, the way the reference
/// CLI's `manipulate_filename` appends a fixed suffix.
pub fn default_output_path(input: &std::path::Path) -> std::path::PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let mut name = stem;
    name.push_str(".resynth.png");
    input
        .parent()
        .map(|dir| dir.join(&name))
        .unwrap_or_else(|| std::path::PathBuf::from(&name))
}

/// Saves a raw pixel buffer to `output`, picking the codec from the file
/// extension (JPEG for `.jpg`/`.jpeg`, PNG otherwise), and removing a
/// partially written file if encoding fails partway through.
pub fn save_image(
    output: &std::path::Path,
    imgbuf: &[u8],
    width: u32,
    height: u32,
    channels: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let color = color_type(channels)?;
    let w = std::io::BufWriter::new(std::fs::File::create(output)?);

    if let Some(ext) = output.extension() {
        if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            let mut encoder = JpegEncoder::new_with_quality(w, 90);
            if let Err(err) = encoder.encode(imgbuf, width, height, color) {
                eprintln!("resynth: {err}");
                std::fs::remove_file(output)?;
                return Err(err.into());
            }
            return Ok(());
        }
    }

    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, FilterType::Sub);
    if let Err(err) = encoder.write_image(imgbuf, width, height, color) {
        eprintln!("resynth: {err}");
        std::fs::remove_file(output)?;
        return Err(err.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_appends_suffix() {
        let out = default_output_path(std::path::Path::new("textures/bark.png"));
        assert_eq!(out, std::path::PathBuf::from("textures/bark.resynth.png"));
    }

    #[test]
    fn default_output_path_handles_no_extension() {
        let out = default_output_path(std::path::Path::new("bark"));
        assert_eq!(out, std::path::PathBuf::from("bark.resynth.png"));
    }
}
