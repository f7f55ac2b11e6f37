//! In-memory roundtrip: encode a gradient as PNG and JPEG, then reopen the
//! encoded bytes by identifier and by magic bytes.
//!
//! Run: `RUST_LOG=debug cargo run --example memory_roundtrip`

use memcodecs::{ChannelLayout, ChannelType, CodecConfig, CreateRequest, ImageFormat};

fn main() {
    env_logger::init();

    let format = ImageFormat::new(64, 48, ChannelLayout::Rgb, ChannelType::U8);
    let pixels: Vec<u8> = (0..format.height)
        .flat_map(|y| (0..format.width).flat_map(move |x| [(x * 4) as u8, (y * 5) as u8, 96]))
        .collect();

    for identifier in [".PNG", "image/jpeg"] {
        let config = CodecConfig::default().with_jpeg_quality(85);
        let mut sink = CreateRequest::new(identifier)
            .with_codec_config(&config)
            .create(&format)
            .expect("no backend for identifier");
        sink.write(&pixels).expect("encode failed");

        let encoded = sink.into_data();
        log::info!("{identifier}: {} bytes", encoded.len());

        // Borrow the encoded bytes; the source cannot outlive `encoded`.
        let source = memcodecs::open_slice(identifier, &encoded).expect("open failed");
        let decoded = source.read_vec().expect("decode failed");

        let max_err = decoded
            .iter()
            .zip(&pixels)
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0);
        println!(
            "{identifier:>12} -> {} {}x{}, {} bytes, max error {max_err}",
            source.encoded_format(),
            source.format().width,
            source.format().height,
            encoded.len(),
        );

        let detected = memcodecs::open_detected(encoded.clone()).expect("detection failed");
        assert_eq!(detected.encoded_format(), source.encoded_format());
    }

    println!("\nsupported identifiers:");
    for id in memcodecs::supported_identifiers() {
        println!("  {id}");
    }
}
