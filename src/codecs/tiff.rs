//! TIFF codec adapter using the tiff crate.
//!
//! Reads the first image of the file. Samples are unsigned 8/16-bit
//! integers or 32-bit IEEE floats; anything else is rejected when the
//! header is parsed.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::{SampleFormat, Tag};

use crate::backend::BackendOptions;
use crate::resource::check_buffer;
use crate::{
    ChannelLayout, ChannelType, CodecError, EncodedFormat, ImageFormat, SharedBuffer,
    SinkResource, SourceResource,
};

const FORMAT: EncodedFormat = EncodedFormat::Tiff;

fn codec_err(e: tiff::TiffError) -> CodecError {
    CodecError::from_codec(FORMAT, e)
}

fn gray_alpha() -> CodecError {
    CodecError::layout(FORMAT, "gray+alpha images")
}

/// Read dimensions and sample layout of the first image.
fn probe(data: &[u8]) -> Result<ImageFormat, CodecError> {
    let mut decoder = Decoder::new(Cursor::new(data)).map_err(codec_err)?;
    let (width, height) = decoder.dimensions().map_err(codec_err)?;

    let (layout, bits) = match decoder.colortype().map_err(codec_err)? {
        tiff::ColorType::Gray(bits) => (ChannelLayout::Gray, bits),
        tiff::ColorType::GrayA(bits) => (ChannelLayout::GrayAlpha, bits),
        tiff::ColorType::RGB(bits) => (ChannelLayout::Rgb, bits),
        tiff::ColorType::RGBA(bits) => (ChannelLayout::Rgba, bits),
        other => {
            return Err(CodecError::InvalidInput(format!(
                "unsupported TIFF color type {other:?}"
            )));
        }
    };
    // Absent tag means unsigned integer samples.
    let sample_format = decoder
        .find_tag_unsigned_vec::<u16>(Tag::SampleFormat)
        .map_err(codec_err)?
        .and_then(|formats| formats.first().copied())
        .map_or(SampleFormat::Uint, SampleFormat::from_u16_exhaustive);

    let channel_type = match (bits, sample_format) {
        (8, SampleFormat::Uint) => ChannelType::U8,
        (16, SampleFormat::Uint) => ChannelType::U16,
        (32, SampleFormat::IEEEFP) => ChannelType::F32,
        (bits, sample_format) => {
            return Err(CodecError::InvalidInput(format!(
                "unsupported TIFF samples: {bits}-bit {sample_format:?}"
            )));
        }
    };

    Ok(ImageFormat::new(width, height, layout, channel_type))
}

/// Parse the header of `data[..len]` and bind a TIFF source to it.
pub(crate) fn open<'a>(
    data: SharedBuffer<'a>,
    len: usize,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    let format = probe(data.prefix(len)?)?;
    options.check_limits(&format)?;

    log::debug!(
        "tiff source {}x{} {:?} {:?}",
        format.width,
        format.height,
        format.layout,
        format.channel_type
    );
    Ok(Box::new(TiffSource { data, len, format }))
}

struct TiffSource<'a> {
    data: SharedBuffer<'a>,
    len: usize,
    format: ImageFormat,
}

impl SourceResource for TiffSource<'_> {
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

        let mut decoder = Decoder::new(Cursor::new(self.data())).map_err(codec_err)?;
        let image = decoder.read_image().map_err(codec_err)?;

        let bytes: &[u8] = match (&image, self.format.channel_type) {
            (DecodingResult::U8(samples), ChannelType::U8) => samples,
            (DecodingResult::U16(samples), ChannelType::U16) => bytemuck::cast_slice(samples),
            (DecodingResult::F32(samples), ChannelType::F32) => bytemuck::cast_slice(samples),
            _ => {
                return Err(CodecError::InvalidInput(format!(
                    "TIFF samples do not match {:?}",
                    self.format.channel_type
                )));
            }
        };
        super::check_decoded_len(FORMAT, &self.format, dst.len(), bytes.len())?;
        dst.copy_from_slice(bytes);
        Ok(())
    }
}

/// Validate `format` for TIFF and create a sink.
pub(crate) fn create(
    format: &ImageFormat,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SinkResource>, CodecError> {
    super::require_interleaved(FORMAT, format)?;
    options.check_limits(format)?;

    if format.layout == ChannelLayout::GrayAlpha {
        return Err(gray_alpha());
    }
    if format.width == 0 || format.height == 0 {
        return Err(CodecError::layout(FORMAT, "zero-sized images"));
    }

    Ok(Box::new(TiffSink {
        format: *format,
        output: Vec::new(),
    }))
}

struct TiffSink {
    format: ImageFormat,
    output: Vec<u8>,
}

impl TiffSink {
    fn encode(&self, pixels: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (w, h) = (self.format.width, self.format.height);
        let mut output = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut output)).map_err(codec_err)?;

        let written = match self.format.channel_type {
            ChannelType::U8 => match self.format.layout {
                ChannelLayout::Gray => encoder.write_image::<colortype::Gray8>(w, h, pixels),
                ChannelLayout::Rgb => encoder.write_image::<colortype::RGB8>(w, h, pixels),
                ChannelLayout::Rgba => encoder.write_image::<colortype::RGBA8>(w, h, pixels),
                ChannelLayout::GrayAlpha => return Err(gray_alpha()),
            },
            ChannelType::U16 => {
                let samples: Vec<u16> = bytemuck::pod_collect_to_vec(pixels);
                match self.format.layout {
                    ChannelLayout::Gray => encoder.write_image::<colortype::Gray16>(w, h, &samples),
                    ChannelLayout::Rgb => encoder.write_image::<colortype::RGB16>(w, h, &samples),
                    ChannelLayout::Rgba => encoder.write_image::<colortype::RGBA16>(w, h, &samples),
                    ChannelLayout::GrayAlpha => return Err(gray_alpha()),
                }
            }
            ChannelType::F32 => {
                let samples: Vec<f32> = bytemuck::pod_collect_to_vec(pixels);
                match self.format.layout {
                    ChannelLayout::Gray => {
                        encoder.write_image::<colortype::Gray32Float>(w, h, &samples)
                    }
                    ChannelLayout::Rgb => {
                        encoder.write_image::<colortype::RGB32Float>(w, h, &samples)
                    }
                    ChannelLayout::Rgba => {
                        encoder.write_image::<colortype::RGBA32Float>(w, h, &samples)
                    }
                    ChannelLayout::GrayAlpha => return Err(gray_alpha()),
                }
            }
        };
        written.map_err(codec_err)?;

        drop(encoder);
        Ok(output)
    }
}

impl SinkResource for TiffSink {
    fn encoded_format(&self) -> EncodedFormat {
        FORMAT
    }

    fn format(&self) -> ImageFormat {
        self.format
    }

    fn write(&mut self, pixels: &[u8]) -> Result<(), CodecError> {
        check_buffer(&self.format, pixels)?;
        let output = self.encode(pixels)?;
        log::trace!("tiff sink wrote {} bytes", output.len());
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
