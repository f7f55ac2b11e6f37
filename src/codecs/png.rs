//! PNG codec adapter using the png crate.
//!
//! Palette and sub-byte images are expanded to 8-bit samples; 16-bit images
//! are exchanged as native-endian `u16`.

use std::io::Cursor;

use crate::backend::BackendOptions;
use crate::resource::check_buffer;
use crate::{
    ChannelLayout, ChannelType, CodecError, EncodedFormat, ImageFormat, SharedBuffer,
    SinkResource, SourceResource,
};

const FORMAT: EncodedFormat = EncodedFormat::Png;

fn codec_err(e: impl std::error::Error + Send + Sync + 'static) -> CodecError {
    CodecError::from_codec(FORMAT, e)
}

/// Start a decoder with header parsed and expansion enabled.
fn reader(data: &[u8]) -> Result<png::Reader<Cursor<&[u8]>>, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND);
    decoder.read_info().map_err(codec_err)
}

/// Pixel format the decoder will emit.
fn output_format(reader: &png::Reader<Cursor<&[u8]>>) -> Result<ImageFormat, CodecError> {
    let info = reader.info();
    let (color_type, bit_depth) = reader.output_color_type();

    let layout = match color_type {
        png::ColorType::Grayscale => ChannelLayout::Gray,
        png::ColorType::GrayscaleAlpha => ChannelLayout::GrayAlpha,
        png::ColorType::Rgb => ChannelLayout::Rgb,
        png::ColorType::Rgba => ChannelLayout::Rgba,
        // EXPAND turns palettes into RGB/RGBA.
        png::ColorType::Indexed => {
            return Err(CodecError::InvalidInput(
                "PNG palette was not expanded".into(),
            ));
        }
    };
    let channel_type = match bit_depth {
        png::BitDepth::Sixteen => ChannelType::U16,
        _ => ChannelType::U8,
    };

    Ok(ImageFormat::new(info.width, info.height, layout, channel_type))
}

/// Parse the header of `data[..len]` and bind a PNG source to it.
pub(crate) fn open<'a>(
    data: SharedBuffer<'a>,
    len: usize,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    let format = output_format(&reader(data.prefix(len)?)?)?;
    options.check_limits(&format)?;

    log::debug!(
        "png source {}x{} {:?} {:?}",
        format.width,
        format.height,
        format.layout,
        format.channel_type
    );
    Ok(Box::new(PngSource { data, len, format }))
}

struct PngSource<'a> {
    data: SharedBuffer<'a>,
    len: usize,
    format: ImageFormat,
}

impl SourceResource for PngSource<'_> {
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

        let mut reader = reader(self.data())?;
        let buffer_size = reader.output_buffer_size().ok_or_else(|| {
            CodecError::InvalidInput("cannot determine PNG output buffer size".into())
        })?;
        let mut raw_pixels = vec![0u8; buffer_size];

        let output_info = reader.next_frame(&mut raw_pixels).map_err(codec_err)?;
        raw_pixels.truncate(output_info.buffer_size());
        super::check_decoded_len(FORMAT, &self.format, dst.len(), raw_pixels.len())?;

        match self.format.channel_type {
            ChannelType::U16 => super::u16_be_to_ne(&raw_pixels, dst),
            _ => dst.copy_from_slice(&raw_pixels),
        }
        Ok(())
    }
}

/// Validate `format` for PNG and create a sink.
pub(crate) fn create(
    format: &ImageFormat,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SinkResource>, CodecError> {
    super::require_interleaved(FORMAT, format)?;
    options.check_limits(format)?;

    let bit_depth = match format.channel_type {
        ChannelType::U8 => png::BitDepth::Eight,
        ChannelType::U16 => png::BitDepth::Sixteen,
        ChannelType::F32 => {
            return Err(CodecError::layout(FORMAT, "32-bit float samples"));
        }
    };
    let color_type = match format.layout {
        ChannelLayout::Gray => png::ColorType::Grayscale,
        ChannelLayout::GrayAlpha => png::ColorType::GrayscaleAlpha,
        ChannelLayout::Rgb => png::ColorType::Rgb,
        ChannelLayout::Rgba => png::ColorType::Rgba,
    };
    if format.width == 0 || format.height == 0 {
        return Err(CodecError::layout(FORMAT, "zero-sized images"));
    }

    let config = options.config;
    Ok(Box::new(PngSink {
        format: *format,
        color_type,
        bit_depth,
        compression: config.and_then(|c| c.png_compression),
        filter: config.and_then(|c| c.png_filter),
        output: Vec::new(),
    }))
}

struct PngSink {
    format: ImageFormat,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    compression: Option<png::Compression>,
    filter: Option<png::Filter>,
    output: Vec<u8>,
}

impl SinkResource for PngSink {
    fn encoded_format(&self) -> EncodedFormat {
        FORMAT
    }

    fn format(&self) -> ImageFormat {
        self.format
    }

    fn write(&mut self, pixels: &[u8]) -> Result<(), CodecError> {
        check_buffer(&self.format, pixels)?;

        let swapped;
        let bytes = match self.bit_depth {
            png::BitDepth::Sixteen => {
                swapped = super::u16_ne_to_be(pixels);
                swapped.as_slice()
            }
            _ => pixels,
        };

        let mut output = Vec::new();
        let mut encoder = png::Encoder::new(&mut output, self.format.width, self.format.height);
        encoder.set_color(self.color_type);
        encoder.set_depth(self.bit_depth);
        if let Some(compression) = self.compression {
            encoder.set_compression(compression);
        }
        if let Some(filter) = self.filter {
            encoder.set_filter(filter);
        }

        let mut writer = encoder.write_header().map_err(codec_err)?;
        writer.write_image_data(bytes).map_err(codec_err)?;
        writer.finish().map_err(codec_err)?;

        log::trace!("png sink wrote {} bytes", output.len());
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
