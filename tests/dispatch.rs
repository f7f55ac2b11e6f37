//! Dispatch behavior through the public API.
//!
//! Covers identifier coverage, case/prefix insensitivity, round trips
//! through every compiled backend, and ownership of wrapped buffers.

use std::sync::Arc;

use memcodecs::{
    ChannelLayout, ChannelType, CodecError, EncodedFormat, ImageFormat, SharedBuffer,
    SourceResource,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A pixel format the backend for `format` accepts.
fn sample_format(format: EncodedFormat) -> ImageFormat {
    match format {
        EncodedFormat::Jpeg => ImageFormat::new(16, 16, ChannelLayout::Rgb, ChannelType::U8),
        EncodedFormat::Png => ImageFormat::new(11, 7, ChannelLayout::Rgba, ChannelType::U8),
        EncodedFormat::Tiff => ImageFormat::new(9, 5, ChannelLayout::Rgb, ChannelType::U16),
        EncodedFormat::Exr => ImageFormat::new(8, 6, ChannelLayout::Rgba, ChannelType::F32),
        _ => unreachable!(),
    }
}

fn sample_pixels(format: &ImageFormat) -> Vec<u8> {
    let n = format.buffer_size().unwrap();
    match (format.layout, format.channel_type) {
        (_, ChannelType::F32) => {
            let samples: Vec<f32> = (0..n / 4).map(|i| (i % 17) as f32 * 0.25).collect();
            bytemuck::cast_slice(&samples).to_vec()
        }
        // Flat color keeps JPEG error small.
        (ChannelLayout::Rgb, ChannelType::U8) => vec![120; n],
        _ => (0..n).map(|i| (i * 13 % 256) as u8).collect(),
    }
}

fn encode(identifier: &str, format: &ImageFormat, pixels: &[u8]) -> Vec<u8> {
    let mut sink = memcodecs::create(identifier, format).unwrap();
    assert_eq!(sink.format(), *format);
    sink.write(pixels).unwrap();
    sink.into_data()
}

fn compiled() -> impl Iterator<Item = EncodedFormat> {
    EncodedFormat::ALL.into_iter().filter(|f| f.is_compiled())
}

#[test]
fn every_identifier_selects_its_family() {
    init_logging();
    for format in compiled() {
        let image = sample_format(format);
        for id in format.identifiers() {
            let sink = memcodecs::create(id, &image).unwrap();
            assert_eq!(sink.encoded_format(), format, "{id}");
        }
    }
}

#[test]
fn prefix_and_case_variants_agree() {
    init_logging();
    for format in compiled() {
        let image = sample_format(format);
        let encoded = encode(format.extension(), &image, &sample_pixels(&image));

        for id in format.identifiers() {
            for variant in [
                id.to_string(),
                id.to_uppercase(),
                format!(".{id}"),
                format!("...{}", id.to_uppercase()),
            ] {
                let source = memcodecs::open_slice(&variant, &encoded).unwrap();
                assert_eq!(source.encoded_format(), format, "{variant}");
                assert_eq!(source.format(), image, "{variant}");
            }
        }
    }
}

#[test]
fn selection_is_deterministic() {
    for format in compiled() {
        let image = sample_format(format);
        let first = memcodecs::create(format.mime_type(), &image).unwrap();
        for _ in 0..4 {
            let again = memcodecs::create(format.mime_type(), &image).unwrap();
            assert_eq!(again.encoded_format(), first.encoded_format());
        }
    }
}

#[test]
fn bmp_is_unsupported() {
    init_logging();
    let image = ImageFormat::new(2, 2, ChannelLayout::Rgb, ChannelType::U8);
    for id in ["bmp", ".BMP", "image/bmp"] {
        match memcodecs::create(id, &image) {
            Err(CodecError::UnsupportedFormat(name)) => {
                assert_eq!(name, memcodecs::normalize(id))
            }
            other => panic!("{id}: {:?}", other.map(|s| s.encoded_format())),
        }
        assert!(matches!(
            memcodecs::open(id, vec![0u8; 8], 8),
            Err(CodecError::UnsupportedFormat(_))
        ));
    }
}

#[test]
fn round_trip_through_every_backend() {
    init_logging();
    for format in compiled() {
        let image = sample_format(format);
        let pixels = sample_pixels(&image);
        let encoded = encode(format.mime_type(), &image, &pixels);
        assert_eq!(EncodedFormat::detect(&encoded), Some(format));

        let len = encoded.len();
        let source = memcodecs::open(format.extension(), encoded, len).unwrap();
        assert_eq!(source.format(), image);
        assert_eq!(source.data().len(), len);

        let decoded = source.read_vec().unwrap();
        assert_eq!(decoded.len(), pixels.len());
        if format.is_lossless() {
            assert_eq!(decoded, pixels, "{format}");
        } else {
            assert!(decoded.iter().zip(&pixels).all(|(a, b)| a.abs_diff(*b) <= 8));
        }
    }
}

#[test]
fn detected_matches_named_open() {
    for format in compiled() {
        let image = sample_format(format);
        let encoded = encode(format.extension(), &image, &sample_pixels(&image));

        let detected = memcodecs::open_detected(&encoded).unwrap();
        let named = memcodecs::open_slice(format.extension(), &encoded).unwrap();
        assert_eq!(detected.encoded_format(), named.encoded_format());
        assert_eq!(detected.format(), named.format());
    }
}

#[test]
fn borrowed_bytes_survive_the_resource() {
    let Some(format) = compiled().next() else {
        return;
    };
    let image = sample_format(format);
    let encoded = encode(format.extension(), &image, &sample_pixels(&image));
    let snapshot = encoded.clone();

    {
        let source: Box<dyn SourceResource + '_> =
            memcodecs::open(format.extension(), &encoded, encoded.len()).unwrap();
        assert_eq!(source.data().as_ptr(), encoded.as_ptr());
        source.read_vec().unwrap();
    }

    // Caller memory is untouched and still usable after the resource is gone.
    assert_eq!(encoded, snapshot);
}

#[test]
fn shared_bytes_are_released_with_the_resource() {
    let Some(format) = compiled().next() else {
        return;
    };
    let image = sample_format(format);
    let encoded: Arc<[u8]> = encode(format.extension(), &image, &sample_pixels(&image)).into();
    assert_eq!(Arc::strong_count(&encoded), 1);

    let source = memcodecs::open(
        format.extension(),
        SharedBuffer::shared(Arc::clone(&encoded)),
        encoded.len(),
    )
    .unwrap();
    assert_eq!(Arc::strong_count(&encoded), 2);
    assert_eq!(source.data(), &encoded[..]);

    drop(source);
    assert_eq!(Arc::strong_count(&encoded), 1);
}

#[test]
fn failed_open_releases_shared_bytes() {
    let Some(format) = compiled().next() else {
        return;
    };
    let junk: Arc<[u8]> = Arc::from(vec![0u8; 32]);
    let result = memcodecs::open(
        format.extension(),
        SharedBuffer::shared(Arc::clone(&junk)),
        junk.len(),
    );
    assert!(result.is_err());
    assert_eq!(Arc::strong_count(&junk), 1);
}

#[test]
fn sink_validates_pixel_buffer() {
    for format in compiled() {
        let image = sample_format(format);
        let mut sink = memcodecs::create(format.extension(), &image).unwrap();
        let short = vec![0u8; image.buffer_size().unwrap() - 1];
        assert!(matches!(
            sink.write(&short),
            Err(CodecError::BufferSize { .. })
        ));
    }
}

#[test]
fn wide_jpeg_reopens_without_limits() {
    if !EncodedFormat::Jpeg.is_compiled() {
        return;
    }
    let image = ImageFormat::new(20_000, 8, ChannelLayout::Gray, ChannelType::U8);
    let encoded = encode("jpg", &image, &vec![200; image.buffer_size().unwrap()]);

    let source = memcodecs::open_slice("jpg", &encoded).unwrap();
    assert_eq!(
        source.format(),
        ImageFormat::new(20_000, 8, ChannelLayout::Rgb, ChannelType::U8)
    );
    assert_eq!(source.read_vec().unwrap().len(), 20_000 * 8 * 3);
}
