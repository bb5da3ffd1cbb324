// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec boundary — translate compressed image bytes (PNG, JPEG, WebP, GIF,
// BMP) to and from a `PixelBuffer` using the `image` crate.

use std::io::Cursor;

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use pixwerk_core::error::{PixwerkError, Result};
use pixwerk_core::types::ImageFormat;
use tracing::{debug, instrument};

use crate::raster::buffer::PixelBuffer;

/// Lowest quality the JPEG encoder accepts.
const MIN_JPEG_QUALITY: u8 = 1;

/// Highest quality accepted by the lossy encoders.
const MAX_QUALITY: u8 = 100;

/// Identify which supported format `data` is encoded in.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    let detected = image::guess_format(data)
        .map_err(|err| PixwerkError::Decode(format!("unrecognised image data: {}", err)))?;
    from_image_format(detected)
        .ok_or_else(|| PixwerkError::UnsupportedFormat(format!("{:?}", detected)))
}

/// Decode PNG, JPEG, WebP, GIF or BMP bytes into an RGBA raster.
///
/// Animated GIF and WebP sources yield their first frame.
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    decode_with_format(data).map(|(buffer, _)| buffer)
}

/// Like [`decode`], also returning the format the header was detected as.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_with_format(data: &[u8]) -> Result<(PixelBuffer, ImageFormat)> {
    let format = detect_format(data)?;
    let image = image::load_from_memory_with_format(data, to_image_format(format))
        .map_err(|err| PixwerkError::Decode(format!("{} data is corrupt: {}", format, err)))?;
    debug!(
        %format,
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok((PixelBuffer::from(image.into_rgba8()), format))
}

/// Encode a raster into `format`.
///
/// `quality` (0-100) applies to the lossy formats, JPEG and WebP. PNG, GIF
/// and BMP are lossless and ignore it.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn encode(buffer: &PixelBuffer, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let image = buffer.as_image();
    let quality = quality.min(MAX_QUALITY);
    if !format.is_lossy() {
        debug!(%format, quality, "Lossless format; quality ignored");
    }

    match format {
        ImageFormat::Jpeg => {
            let quality = quality.max(MIN_JPEG_QUALITY);
            // JPEG carries no alpha channel.
            let rgb: RgbImage = image.convert();
            let encoder = JpegEncoder::new_with_quality(&mut out, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|err| PixwerkError::Encode(format!("JPEG encoding failed: {}", err)))?;
        }
        ImageFormat::WebP => {
            let (width, height) = buffer.dimensions();
            if width == 0 || height == 0 {
                return Err(PixwerkError::Encode(format!(
                    "WebP encoding failed: {}x{} image has no pixels",
                    width, height
                )));
            }
            let encoded = webp::Encoder::from_rgba(buffer.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
                .map_err(|err| PixwerkError::Encode(format!("WebP encoding failed: {:?}", err)))?;
            out.extend_from_slice(&encoded);
        }
        ImageFormat::Png | ImageFormat::Gif | ImageFormat::Bmp => {
            let mut cursor = Cursor::new(&mut out);
            image
                .write_to(&mut cursor, to_image_format(format))
                .map_err(|err| {
                    PixwerkError::Encode(format!("{} encoding failed: {}", format, err))
                })?;
        }
    }

    if out.is_empty() {
        return Err(PixwerkError::Encode(format!(
            "{} encoder produced no data",
            format
        )));
    }
    debug!(%format, bytes = out.len(), "Image encoded");
    Ok(out)
}

fn to_image_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
    }
}

fn from_image_format(format: image::ImageFormat) -> Option<ImageFormat> {
    match format {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::WebP => Some(ImageFormat::WebP),
        image::ImageFormat::Gif => Some(ImageFormat::Gif),
        image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard() -> PixelBuffer {
        PixelBuffer::from_fn(6, 5, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([200, 30, 60, 255])
            } else {
                Rgba([10, 180, 90, 128])
            }
        })
    }

    #[test]
    fn png_is_lossless() {
        let buffer = checkerboard();
        let png = encode(&buffer, ImageFormat::Png, 0).expect("PNG encodes");
        assert_eq!(detect_format(&png).ok(), Some(ImageFormat::Png));
        let decoded = decode(&png).expect("PNG decodes");
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn every_format_produces_recognisable_output() {
        let buffer = checkerboard();
        for format in ImageFormat::ALL {
            let bytes = encode(&buffer, format, 80)
                .unwrap_or_else(|err| panic!("{} failed to encode: {}", format, err));
            assert!(!bytes.is_empty());
            assert_eq!(
                detect_format(&bytes).ok(),
                Some(format),
                "{} output not recognised",
                format
            );
            let decoded = decode(&bytes).expect("own output decodes");
            assert_eq!(decoded.dimensions(), (6, 5));
        }
    }

    #[test]
    fn jpeg_quality_zero_is_accepted() {
        let buffer = checkerboard();
        let low = encode(&buffer, ImageFormat::Jpeg, 0).expect("quality 0 encodes");
        assert_eq!(&low[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn webp_quality_changes_output() {
        let gradient = PixelBuffer::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x * y) % 256) as u8, 255])
        });
        let low = encode(&gradient, ImageFormat::WebP, 5).expect("WebP q5 encodes");
        let high = encode(&gradient, ImageFormat::WebP, 95).expect("WebP q95 encodes");
        assert_ne!(low, high);
        assert!(low.len() < high.len(), "q5 {} bytes, q95 {} bytes", low.len(), high.len());
        assert_eq!(detect_format(&low).ok(), Some(ImageFormat::WebP));
    }

    #[test]
    fn empty_raster_is_an_encode_error() {
        let empty = PixelBuffer::new(0, 0);
        for format in [ImageFormat::Png, ImageFormat::WebP] {
            let result = encode(&empty, format, 80);
            assert!(
                matches!(result, Err(PixwerkError::Encode(_))),
                "{} gave {:?}",
                format,
                result.map(|bytes| bytes.len())
            );
        }
    }

    #[test]
    fn decode_reports_detected_format() {
        let bmp = encode(&checkerboard(), ImageFormat::Bmp, 0).expect("BMP encodes");
        let (buffer, format) = decode_with_format(&bmp).expect("BMP decodes");
        assert_eq!(format, ImageFormat::Bmp);
        assert_eq!(buffer.dimensions(), (6, 5));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode(b"definitely not an image");
        assert!(
            matches!(result, Err(PixwerkError::Decode(_))),
            "got {:?}",
            result.map(|b| b.dimensions())
        );
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let png = encode(&checkerboard(), ImageFormat::Png, 0).expect("PNG encodes");
        let result = decode(&png[..png.len() / 2]);
        assert!(matches!(result, Err(PixwerkError::Decode(_))));
    }

    #[test]
    fn tiff_is_recognised_but_unsupported() {
        let tiff_header = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        assert!(matches!(
            decode(&tiff_header),
            Err(PixwerkError::UnsupportedFormat(_))
        ));
    }
}
