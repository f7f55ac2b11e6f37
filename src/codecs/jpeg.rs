//! JPEG codec adapter using zune-jpeg (decode) and jpeg-encoder (encode).
//!
//! Sources always decode to interleaved RGB8; grayscale files are expanded.

use std::io::Cursor;

use zune_jpeg::JpegDecoder;
use zune_jpeg::zune_core::options::DecoderOptions;

use crate::backend::BackendOptions;
use crate::resource::check_buffer;
use crate::{
    ChannelLayout, ChannelType, CodecError, EncodedFormat, ImageFormat, SharedBuffer,
    SinkResource, SourceResource,
};

const FORMAT: EncodedFormat = EncodedFormat::Jpeg;

/// Largest dimension a baseline JPEG frame header can carry.
const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Decoder accepting every size a frame header can carry; size policy is
/// left to [`Limits`](crate::Limits).
fn decoder(data: &[u8]) -> JpegDecoder<Cursor<&[u8]>> {
    let options = DecoderOptions::default()
        .set_max_width(MAX_DIMENSION as usize)
        .set_max_height(MAX_DIMENSION as usize);
    JpegDecoder::new_with_options(Cursor::new(data), options)
}

/// Probe JPEG dimensions without decoding pixels.
fn probe(data: &[u8]) -> Result<ImageFormat, CodecError> {
    let mut decoder = decoder(data);
    decoder
        .decode_headers()
        .map_err(|e| CodecError::from_codec_message(FORMAT, e))?;

    let info = decoder
        .info()
        .ok_or_else(|| CodecError::InvalidInput("JPEG header carries no frame info".into()))?;

    Ok(ImageFormat::new(
        info.width as u32,
        info.height as u32,
        ChannelLayout::Rgb,
        ChannelType::U8,
    ))
}

/// Parse the header of `data[..len]` and bind a JPEG source to it.
pub(crate) fn open<'a>(
    data: SharedBuffer<'a>,
    len: usize,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    let format = probe(data.prefix(len)?)?;
    options.check_limits(&format)?;

    log::debug!("jpeg source {}x{}", format.width, format.height);
    Ok(Box::new(JpegSource { data, len, format }))
}

struct JpegSource<'a> {
    data: SharedBuffer<'a>,
    len: usize,
    format: ImageFormat,
}

impl SourceResource for JpegSource<'_> {
    fn encoded_format(&self) -> EncodedFormat {
        FORMAT
    }

    fn format(&self) -> ImageFormat {
        self.format
    }

    fn data(&self) -> &[u8] {
        &self.data.as_slice()[..self.len]
    }

    fn read(&self, dst: &mut [u8]) -> Result<(), CodecError> {
        check_buffer(&self.format, dst)?;

        let mut decoder = decoder(self.data());
        let decoded = decoder
            .decode()
            .map_err(|e| CodecError::from_codec_message(FORMAT, e))?;

        let pixels = self.format.pixel_count() as usize;
        if decoded.len() == dst.len() {
            dst.copy_from_slice(&decoded);
        } else if decoded.len() == pixels {
            // Luma output: replicate into RGB.
            for (rgb, &luma) in dst.chunks_exact_mut(3).zip(&decoded) {
                rgb.fill(luma);
            }
        } else {
            return Err(CodecError::InvalidInput(format!(
                "JPEG decoder produced {} bytes for {}x{}",
                decoded.len(),
                self.format.width,
                self.format.height
            )));
        }
        Ok(())
    }
}

/// Validate `format` for JPEG and create a sink.
pub(crate) fn create(
    format: &ImageFormat,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SinkResource>, CodecError> {
    super::require_interleaved(FORMAT, format)?;
    options.check_limits(format)?;

    if format.channel_type != ChannelType::U8 {
        return Err(CodecError::layout(
            FORMAT,
            format!("{:?} samples", format.channel_type),
        ));
    }
    let color_type = match format.layout {
        ChannelLayout::Gray => jpeg_encoder::ColorType::Luma,
        ChannelLayout::Rgb => jpeg_encoder::ColorType::Rgb,
        // Alpha is discarded by the encoder.
        ChannelLayout::Rgba => jpeg_encoder::ColorType::Rgba,
        ChannelLayout::GrayAlpha => {
            return Err(CodecError::layout(FORMAT, "gray+alpha images"));
        }
    };
    if format.width == 0
        || format.height == 0
        || format.width > MAX_DIMENSION
        || format.height > MAX_DIMENSION
    {
        return Err(CodecError::layout(
            FORMAT,
            format!("{}x{} images", format.width, format.height),
        ));
    }

    let quality = options
        .config
        .map(|c| c.jpeg_quality())
        .unwrap_or(crate::config::DEFAULT_JPEG_QUALITY);

    Ok(Box::new(JpegSink {
        format: *format,
        color_type,
        quality,
        output: Vec::new(),
    }))
}

struct JpegSink {
    format: ImageFormat,
    color_type: jpeg_encoder::ColorType,
    quality: u8,
    output: Vec<u8>,
}

impl SinkResource for JpegSink {
    fn encoded_format(&self) -> EncodedFormat {
        FORMAT
    }

    fn format(&self) -> ImageFormat {
        self.format
    }

    fn write(&mut self, pixels: &[u8]) -> Result<(), CodecError> {
        check_buffer(&self.format, pixels)?;

        let mut output = Vec::new();
        let encoder = jpeg_encoder::Encoder::new(&mut output, self.quality);
        // Dimensions were range-checked at creation.
        encoder
            .encode(
                pixels,
                self.format.width as u16,
                self.format.height as u16,
                self.color_type,
            )
            .map_err(|e| CodecError::from_codec(FORMAT, e))?;

        log::trace!("jpeg sink wrote {} bytes at q{}", output.len(), self.quality);
        self.output = output;
        Ok(())
    }

    fn data(&self) -> &[u8] {
        &self.output
    }

    fn into_data(self: Box<Self>) -> Vec<u8> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecConfig;

    fn encode(format: &ImageFormat, pixels: &[u8], options: &BackendOptions<'_>) -> Vec<u8> {
        let mut sink = create(format, options).unwrap();
        sink.write(pixels).unwrap();
        sink.into_data()
    }

    fn flat(format: &ImageFormat, value: u8) -> Vec<u8> {
        vec![value; format.buffer_size().unwrap()]
    }

    #[test]
    fn rgb_round_trip_is_close() {
        let format = ImageFormat::new(24, 16, ChannelLayout::Rgb, ChannelType::U8);
        let pixels: Vec<u8> = (0..format.pixel_count())
            .flat_map(|_| [200u8, 100, 50])
            .collect();
        let encoded = encode(&format, &pixels, &BackendOptions::default());
        assert_eq!(EncodedFormat::detect(&encoded), Some(EncodedFormat::Jpeg));

        let source = open(
            SharedBuffer::borrowed(&encoded),
            encoded.len(),
            &BackendOptions::default(),
        )
        .unwrap();
        assert_eq!(source.format(), format);

        let decoded = source.read_vec().unwrap();
        assert_eq!(decoded.len(), pixels.len());
        for (a, b) in decoded.iter().zip(&pixels) {
            assert!(a.abs_diff(*b) <= 8, "{a} vs {b}");
        }
    }

    #[test]
    fn gray_decodes_as_rgb() {
        let format = ImageFormat::new(8, 8, ChannelLayout::Gray, ChannelType::U8);
        let encoded = encode(&format, &flat(&format, 128), &BackendOptions::default());

        let source = open(
            SharedBuffer::borrowed(&encoded),
            encoded.len(),
            &BackendOptions::default(),
        )
        .unwrap();
        assert_eq!(source.format().layout, ChannelLayout::Rgb);

        let decoded = source.read_vec().unwrap();
        assert_eq!(decoded.len(), 8 * 8 * 3);
        assert!(decoded.iter().all(|v| v.abs_diff(128) <= 4));
    }

    #[test]
    fn quality_changes_output() {
        let format = ImageFormat::new(32, 32, ChannelLayout::Rgb, ChannelType::U8);
        let pixels: Vec<u8> = (0..format.buffer_size().unwrap())
            .map(|i| (i * 37 % 256) as u8)
            .collect();

        let low = CodecConfig::default().with_jpeg_quality(10);
        let high = CodecConfig::default().with_jpeg_quality(100);
        let low = encode(
            &format,
            &pixels,
            &BackendOptions {
                limits: None,
                config: Some(&low),
            },
        );
        let high = encode(
            &format,
            &pixels,
            &BackendOptions {
                limits: None,
                config: Some(&high),
            },
        );
        assert!(low.len() < high.len());
    }

    #[test]
    fn wide_images_reopen() {
        let format = ImageFormat::new(20_000, 8, ChannelLayout::Gray, ChannelType::U8);
        let encoded = encode(&format, &flat(&format, 64), &BackendOptions::default());

        let source = open(
            SharedBuffer::borrowed(&encoded),
            encoded.len(),
            &BackendOptions::default(),
        )
        .unwrap();
        assert_eq!(source.format().width, 20_000);
        assert_eq!(source.format().height, 8);
        assert_eq!(source.read_vec().unwrap().len(), 20_000 * 8 * 3);
    }

    #[test]
    fn rejects_unencodable_layouts() {
        let options = BackendOptions::default();
        for format in [
            ImageFormat::new(4, 4, ChannelLayout::Rgb, ChannelType::U16),
            ImageFormat::new(4, 4, ChannelLayout::GrayAlpha, ChannelType::U8),
            ImageFormat::new(70_000, 4, ChannelLayout::Rgb, ChannelType::U8),
            ImageFormat::planar(4, 4, ChannelLayout::Rgb, ChannelType::U8),
        ] {
            let err = create(&format, &options).err().unwrap();
            assert!(
                matches!(err, CodecError::UnsupportedLayout { format: EncodedFormat::Jpeg, .. }),
                "{format:?}: {err}"
            );
        }
    }

    #[test]
    fn garbage_is_codec_error() {
        let junk = [0xFFu8, 0xD8, 0xFF, 0x00, 0x01, 0x02];
        let result = open(
            SharedBuffer::borrowed(&junk),
            junk.len(),
            &BackendOptions::default(),
        );
        assert!(matches!(
            result,
            Err(CodecError::Codec {
                format: EncodedFormat::Jpeg,
                ..
            }) | Err(CodecError::InvalidInput(_))
        ));
    }
}
