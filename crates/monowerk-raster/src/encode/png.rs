// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PNG boundary adapter — hands a packed plane to the `png` crate at bit
// depth 1. Chunk framing, deflate, and CRCs are the codec's job; this module
// only picks the colour type, converts bit polarity to what that colour type
// expects, and sets the compression level.

use std::borrow::Cow;
use std::io::Write;

use monowerk_core::error::{MonowerkError, Result};
use monowerk_core::{PackedBitPlane, PngColorTarget, PngCompression, PngOptions};
use png::{BitDepth, ColorType, Compression, Encoder};
use tracing::{debug, instrument};

/// Palette with black at index 0 and white at index 1.
const PALETTE_BLACK_FIRST: [u8; 6] = [0, 0, 0, 255, 255, 255];
/// Palette with white at index 0 and black at index 1.
const PALETTE_WHITE_FIRST: [u8; 6] = [255, 255, 255, 0, 0, 0];

fn compression_level(compression: PngCompression) -> Compression {
    match compression {
        PngCompression::Fast => Compression::Fast,
        PngCompression::Default => Compression::Default,
        PngCompression::Best => Compression::Best,
    }
}

fn encode_err(err: png::EncodingError) -> MonowerkError {
    MonowerkError::EncodeError(err.to_string())
}

/// Write `plane` as a bit-depth-1 PNG into `writer`.
///
/// The plane is converted to the polarity `options.target` expects before
/// the rows are written, so callers can pass planes of either polarity.
#[instrument(skip_all, fields(width = plane.width(), height = plane.height(), target = ?options.target))]
pub fn write_png<W: Write>(plane: &PackedBitPlane, options: &PngOptions, writer: W) -> Result<()> {
    let wanted = options.target.expected_polarity();
    let rows: Cow<'_, PackedBitPlane> = if plane.polarity() == wanted {
        Cow::Borrowed(plane)
    } else {
        debug!(from = ?plane.polarity(), to = ?wanted, "Inverting bit polarity for encoder");
        Cow::Owned(plane.to_polarity(wanted))
    };

    let mut encoder = Encoder::new(writer, plane.width(), plane.height());
    encoder.set_depth(BitDepth::One);
    match options.target {
        PngColorTarget::Grayscale => encoder.set_color(ColorType::Grayscale),
        PngColorTarget::Indexed { black_index_zero } => {
            encoder.set_color(ColorType::Indexed);
            let palette = if black_index_zero {
                PALETTE_BLACK_FIRST
            } else {
                PALETTE_WHITE_FIRST
            };
            encoder.set_palette(palette.to_vec());
        }
    }
    encoder.set_compression(compression_level(options.compression));

    let mut png_writer = encoder.write_header().map_err(encode_err)?;
    png_writer.write_image_data(rows.as_bytes()).map_err(encode_err)?;
    png_writer.finish().map_err(encode_err)?;
    Ok(())
}

/// Encode `plane` to an in-memory PNG.
pub fn encode_png(plane: &PackedBitPlane, options: &PngOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(plane, options, &mut buffer)?;
    debug!(png_bytes = buffer.len(), "PNG encoding complete");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use monowerk_core::{BinarizationConfig, GrayscaleGrid, Polarity};
    use std::io::Cursor;

    use crate::binarize::binarize;

    struct DecodedPng {
        width: u32,
        height: u32,
        color_type: ColorType,
        bit_depth: BitDepth,
        palette: Option<Vec<u8>>,
        data: Vec<u8>,
    }

    /// Decode without any transformations so the raw packed rows come back.
    fn decode_raw(bytes: &[u8]) -> DecodedPng {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let mut data = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut data).unwrap();
        data.truncate(frame.buffer_size());

        let info = reader.info();
        DecodedPng {
            width: info.width,
            height: info.height,
            color_type: info.color_type,
            bit_depth: info.bit_depth,
            palette: info.palette.as_ref().map(|p| p.to_vec()),
            data,
        }
    }

    /// 10x2 plane: a black/white checker along each row.
    fn sample_plane() -> PackedBitPlane {
        let data = (0..20u8).map(|i| if (i + i / 10) % 2 == 0 { 0 } else { 255 }).collect();
        let gray = GrayscaleGrid::new(10, 2, data).unwrap();
        binarize(&gray, &BinarizationConfig::default()).unwrap()
    }

    #[test]
    fn grayscale_output_keeps_white_as_one() {
        let plane = sample_plane();
        let png = encode_png(&plane, &PngOptions::default()).unwrap();
        let decoded = decode_raw(&png);

        assert_eq!((decoded.width, decoded.height), (10, 2));
        assert_eq!(decoded.color_type, ColorType::Grayscale);
        assert_eq!(decoded.bit_depth, BitDepth::One);
        assert_eq!(decoded.palette, None);
        assert_eq!(decoded.data, plane.as_bytes());
    }

    #[test]
    fn indexed_black_first_needs_no_inversion() {
        let plane = sample_plane();
        let options = PngOptions {
            target: PngColorTarget::Indexed {
                black_index_zero: true,
            },
            ..PngOptions::default()
        };
        let decoded = decode_raw(&encode_png(&plane, &options).unwrap());

        assert_eq!(decoded.color_type, ColorType::Indexed);
        assert_eq!(decoded.palette.as_deref(), Some(&PALETTE_BLACK_FIRST[..]));
        assert_eq!(decoded.data, plane.as_bytes());
    }

    #[test]
    fn indexed_white_first_inverts_bits() {
        let plane = sample_plane();
        let options = PngOptions {
            target: PngColorTarget::Indexed {
                black_index_zero: false,
            },
            compression: PngCompression::Best,
        };
        let decoded = decode_raw(&encode_png(&plane, &options).unwrap());

        assert_eq!(decoded.palette.as_deref(), Some(&PALETTE_WHITE_FIRST[..]));
        assert_eq!(decoded.data, plane.to_polarity(Polarity::BlackIsOne).as_bytes());
    }

    #[test]
    fn black_is_one_plane_is_adapted_for_grayscale() {
        let plane = sample_plane();
        let flipped = plane.to_polarity(Polarity::BlackIsOne);
        let from_original = encode_png(&plane, &PngOptions::default()).unwrap();
        let from_flipped = encode_png(&flipped, &PngOptions::default()).unwrap();
        assert_eq!(from_original, from_flipped);
    }

    #[test]
    fn image_crate_sees_black_and_white() {
        let plane = sample_plane();
        let png = encode_png(&plane, &PngOptions::default()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();

        for y in 0..2 {
            for x in 0..10 {
                let expected = if plane.is_white(x, y).unwrap() { 255 } else { 0 };
                assert_eq!(decoded.get_pixel(x, y).0[0], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn compression_level_does_not_change_pixels() {
        let plane = sample_plane();
        for compression in [PngCompression::Fast, PngCompression::Default, PngCompression::Best] {
            let options = PngOptions {
                compression,
                ..PngOptions::default()
            };
            let decoded = decode_raw(&encode_png(&plane, &options).unwrap());
            assert_eq!(decoded.data, plane.as_bytes(), "{compression:?}");
        }
    }
}
