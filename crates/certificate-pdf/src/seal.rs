//! Official seal images
//!
//! A seal is decoded from PNG once, before rendering, and embedded as an
//! image XObject. Alpha becomes a soft mask so round seals keep a
//! transparent background.

use crate::error::CertificateError;
use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRgb,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Decoded seal, samples already Flate-compressed for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct SealImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub data: Vec<u8>,
    /// 8-bit alpha channel, compressed
    pub soft_mask: Option<Vec<u8>>,
}

impl SealImage {
    /// Read and decode a PNG seal from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CertificateError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_png_bytes(&bytes)
    }

    /// Decode PNG bytes into an embeddable seal
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, CertificateError> {
        let mut decoder = png::Decoder::new(bytes);
        // Palette and sub-byte depths expand to 8-bit; 16-bit is truncated
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e| CertificateError::Seal(e.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| CertificateError::Seal(e.to_string()))?;
        let samples = &buf[..info.buffer_size()];

        if info.width == 0 || info.height == 0 {
            return Err(CertificateError::Seal("image has no pixels".to_string()));
        }

        let (color_space, color, alpha) = match info.color_type {
            png::ColorType::Rgb => (ColorSpace::DeviceRgb, samples.to_vec(), None),
            png::ColorType::Rgba => {
                let (color, alpha) = split_alpha(samples, 3);
                (ColorSpace::DeviceRgb, color, Some(alpha))
            }
            png::ColorType::Grayscale => (ColorSpace::DeviceGray, samples.to_vec(), None),
            png::ColorType::GrayscaleAlpha => {
                let (color, alpha) = split_alpha(samples, 1);
                (ColorSpace::DeviceGray, color, Some(alpha))
            }
            png::ColorType::Indexed => {
                return Err(CertificateError::Seal(
                    "indexed color was not expanded".to_string(),
                ))
            }
        };

        let soft_mask = match alpha {
            Some(alpha) if alpha.iter().any(|&a| a != u8::MAX) => Some(deflate(&alpha)?),
            _ => None,
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space,
            data: deflate(&color)?,
            soft_mask,
        })
    }
}

/// Split interleaved samples into color channels and the trailing alpha
fn split_alpha(samples: &[u8], color_channels: usize) -> (Vec<u8>, Vec<u8>) {
    let stride = color_channels + 1;
    let pixels = samples.len() / stride;
    let mut color = Vec::with_capacity(pixels * color_channels);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in samples.chunks_exact(stride) {
        color.extend_from_slice(&pixel[..color_channels]);
        alpha.push(pixel[color_channels]);
    }
    (color, alpha)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, CertificateError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    /// Encode a small PNG for tests
    pub(crate) fn png_bytes(color: png::ColorType, width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(pixels).unwrap();
        }
        out
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_rgb_seal() {
        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30];
        let seal = SealImage::from_png_bytes(&png_bytes(png::ColorType::Rgb, 2, 2, &pixels)).unwrap();
        assert_eq!((seal.width, seal.height), (2, 2));
        assert_eq!(seal.color_space, ColorSpace::DeviceRgb);
        assert_eq!(inflate(&seal.data), pixels.to_vec());
        assert!(seal.soft_mask.is_none());
    }

    #[test]
    fn test_rgba_seal_gets_soft_mask() {
        let pixels = [255, 0, 0, 0, 0, 255, 0, 255];
        let seal =
            SealImage::from_png_bytes(&png_bytes(png::ColorType::Rgba, 2, 1, &pixels)).unwrap();
        assert_eq!(inflate(&seal.data), vec![255, 0, 0, 0, 255, 0]);
        assert_eq!(inflate(seal.soft_mask.as_ref().unwrap()), vec![0, 255]);
    }

    #[test]
    fn test_opaque_alpha_dropped() {
        let pixels = [128, 255, 64, 255];
        let seal = SealImage::from_png_bytes(&png_bytes(
            png::ColorType::GrayscaleAlpha,
            2,
            1,
            &pixels,
        ))
        .unwrap();
        assert_eq!(seal.color_space, ColorSpace::DeviceGray);
        assert_eq!(inflate(&seal.data), vec![128, 64]);
        assert!(seal.soft_mask.is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        let result = SealImage::from_png_bytes(b"definitely not a png");
        assert!(matches!(result, Err(CertificateError::Seal(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SealImage::load("/nonexistent/seal.png");
        assert!(matches!(result, Err(CertificateError::Io(_))));
    }
}
