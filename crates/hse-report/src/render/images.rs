//! Evidence photo embedding
//!
//! PNG images are decoded and re-compressed with Flate; JPEG images are
//! passed through as DCT streams after reading their frame header. Blobs
//! that are empty or cannot be decoded are skipped by the renderer.

use std::io::{Cursor, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Object, Stream};
use tracing::warn;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// An uploaded photo, as handed over by the blob provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read an image from disk. An unreadable file yields an empty blob,
    /// which the renderer skips.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path).unwrap_or_else(|e| {
            warn!("Could not read image {}: {}", path.display(), e);
            Vec::new()
        });
        Self { name, bytes }
    }
}

/// A decoded image ready to be added as an XObject
#[derive(Debug)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    fn pdf_name(&self) -> &'static [u8] {
        match self {
            ColorSpace::Gray => b"DeviceGray",
            ColorSpace::Rgb => b"DeviceRGB",
            ColorSpace::Cmyk => b"DeviceCMYK",
        }
    }
}

/// Decode an attachment, or `None` when it cannot be embedded
pub fn load(attachment: &ImageAttachment) -> Option<PdfImage> {
    let bytes = &attachment.bytes;
    if bytes.is_empty() {
        warn!("Skipping image '{}': no data", attachment.name);
        return None;
    }

    let decoded = if bytes.starts_with(&PNG_MAGIC) {
        decode_png(bytes)
    } else if bytes.starts_with(&JPEG_SOI) {
        decode_jpeg(bytes)
    } else {
        Err("not a PNG or JPEG image".to_string())
    };

    match decoded {
        Ok(image) => Some(image),
        Err(reason) => {
            warn!("Skipping image '{}': {}", attachment.name, reason);
            None
        }
    }
}

fn image_dictionary(width: u32, height: u32, color_space: ColorSpace, filter: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.pdf_name().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.to_vec()));
    dict
}

fn decode_png(bytes: &[u8]) -> Result<PdfImage, String> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette and low bit depths expand to 8-bit samples
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(|e| e.to_string())?;
    let data = &buf[..frame.buffer_size()];

    let (color_space, samples) = match frame.color_type {
        png::ColorType::Grayscale => (ColorSpace::Gray, data.to_vec()),
        png::ColorType::Rgb => (ColorSpace::Rgb, data.to_vec()),
        png::ColorType::GrayscaleAlpha => (ColorSpace::Gray, flatten_alpha(data, 1)),
        png::ColorType::Rgba => (ColorSpace::Rgb, flatten_alpha(data, 3)),
        png::ColorType::Indexed => return Err("unexpanded palette image".to_string()),
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&samples).map_err(|e| e.to_string())?;
    let compressed = encoder.finish().map_err(|e| e.to_string())?;

    let dict = image_dictionary(frame.width, frame.height, color_space, b"FlateDecode");
    Ok(PdfImage {
        width: frame.width,
        height: frame.height,
        stream: Stream::new(dict, compressed),
    })
}

/// Composite pixels with an alpha channel over white
fn flatten_alpha(data: &[u8], channels: usize) -> Vec<u8> {
    data.chunks_exact(channels + 1)
        .flat_map(|px| {
            let alpha = px[channels] as u32;
            px[..channels]
                .iter()
                .map(move |&c| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8)
        })
        .collect()
}

fn decode_jpeg(bytes: &[u8]) -> Result<PdfImage, String> {
    let (width, height, components) = jpeg_frame_header(bytes)?;
    let color_space = match components {
        1 => ColorSpace::Gray,
        3 => ColorSpace::Rgb,
        4 => ColorSpace::Cmyk,
        n => return Err(format!("unsupported JPEG component count {}", n)),
    };
    if width == 0 || height == 0 {
        return Err("JPEG has zero size".to_string());
    }
    let dict = image_dictionary(width, height, color_space, b"DCTDecode");
    Ok(PdfImage {
        width,
        height,
        stream: Stream::new(dict, bytes.to_vec()),
    })
}

/// Find the SOFn segment and read (width, height, components)
fn jpeg_frame_header(bytes: &[u8]) -> Result<(u32, u32, u8), String> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(format!("bad JPEG marker at offset {}", pos));
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Standalone markers carry no length
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        if marker == 0xD9 || marker == 0xDA {
            break;
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let seg = bytes
                .get(pos + 4..pos + 10)
                .ok_or_else(|| "truncated JPEG frame header".to_string())?;
            let height = u16::from_be_bytes([seg[1], seg[2]]) as u32;
            let width = u16::from_be_bytes([seg[3], seg[4]]) as u32;
            return Ok((width, height, seg[5]));
        }
        pos += 2 + length;
    }
    Err("no JPEG frame header found".to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a small RGB PNG for tests
    pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let data = vec![200u8; (width * height * 3) as usize];
            writer.write_image_data(&data).unwrap();
        }
        out
    }

    /// Minimal JPEG header: SOI, APP0 stub, SOF0 and EOI
    pub(crate) fn tiny_jpeg_header(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]);
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.push(3);
        bytes.extend_from_slice(&[0u8; 9]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    #[test]
    fn test_png_is_decoded_and_flate_compressed() {
        let image = load(&ImageAttachment::new("site.png", tiny_png(4, 3))).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(
            image.stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"FlateDecode"
        );
        assert_eq!(
            image.stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
    }

    #[test]
    fn test_jpeg_header_is_read() {
        let image = load(&ImageAttachment::new("site.jpg", tiny_jpeg_header(640, 480))).unwrap();
        assert_eq!((image.width, image.height), (640, 480));
        assert_eq!(
            image.stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
    }

    #[test]
    fn test_empty_and_garbage_blobs_are_skipped() {
        assert!(load(&ImageAttachment::new("missing.png", Vec::new())).is_none());
        assert!(load(&ImageAttachment::new("notes.png", b"hello".to_vec())).is_none());

        // Right magic, broken body
        let mut broken = PNG_MAGIC.to_vec();
        broken.extend_from_slice(b"garbage");
        assert!(load(&ImageAttachment::new("broken.png", broken)).is_none());
    }

    #[test]
    fn test_unreadable_path_gives_empty_blob() {
        let attachment = ImageAttachment::from_path("/definitely/not/here.jpg");
        assert_eq!(attachment.name, "here.jpg");
        assert!(attachment.bytes.is_empty());
    }

    #[test]
    fn test_alpha_flattens_over_white() {
        // Fully transparent black becomes white, opaque red stays red
        let data = [0, 0, 0, 0, 255, 0, 0, 255];
        assert_eq!(flatten_alpha(&data, 3), vec![255, 255, 255, 255, 0, 0]);
    }
}
