#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memcodecs::{ChannelLayout, ChannelType, CodecError, ImageFormat};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    identifier: &'a str,
    width: u8,
    height: u8,
}

fuzz_target!(|input: Input<'_>| {
    let format = ImageFormat::new(
        u32::from(input.width),
        u32::from(input.height),
        ChannelLayout::Rgb,
        ChannelType::U8,
    );
    match memcodecs::create(input.identifier, &format) {
        Ok(sink) => {
            // Selection is insensitive to case and leading dots.
            let variant = format!(".{}", input.identifier.to_uppercase());
            if let Ok(again) = memcodecs::create(&variant, &format) {
                assert_eq!(again.encoded_format(), sink.encoded_format());
            }
        }
        Err(CodecError::UnsupportedFormat(name)) => {
            assert_eq!(name, memcodecs::normalize(input.identifier));
        }
        Err(_) => {}
    }
});
