//! OpenEXR codec adapter using the exr crate.
//!
//! Only RGB(A) layers are exchanged, always as `f32` samples. Half and
//! integer channels are converted by the decoder.

use std::io::Cursor;

use crate::backend::BackendOptions;
use crate::resource::check_buffer;
use crate::{
    ChannelLayout, ChannelType, CodecError, EncodedFormat, ImageFormat, SharedBuffer,
    SinkResource, SourceResource,
};

const FORMAT: EncodedFormat = EncodedFormat::Exr;

fn codec_err(e: exr::error::Error) -> CodecError {
    CodecError::from_codec(FORMAT, e)
}

/// Find the first layer carrying R, G and B channels.
fn probe(data: &[u8]) -> Result<ImageFormat, CodecError> {
    let meta = exr::meta::MetaData::read_from_buffered(Cursor::new(data), false)
        .map_err(codec_err)?;

    let has = |header: &exr::meta::header::Header, name: &str| {
        header.channels.list.iter().any(|c| c.name.eq(name))
    };
    let header = meta
        .headers
        .iter()
        .find(|h| has(*h, "R") && has(*h, "G") && has(*h, "B"))
        .ok_or_else(|| CodecError::InvalidInput("OpenEXR file has no RGB layer".into()))?;

    let size = header.layer_size;
    let dim = |v: usize| {
        u32::try_from(v)
            .map_err(|_| CodecError::InvalidInput(format!("OpenEXR dimension {v} too large")))
    };
    let layout = if has(header, "A") {
        ChannelLayout::Rgba
    } else {
        ChannelLayout::Rgb
    };

    Ok(ImageFormat::new(
        dim(size.width())?,
        dim(size.height())?,
        layout,
        ChannelType::F32,
    ))
}

/// Parse the header of `data[..len]` and bind an OpenEXR source to it.
pub(crate) fn open<'a>(
    data: SharedBuffer<'a>,
    len: usize,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    let format = probe(data.prefix(len)?)?;
    options.check_limits(&format)?;

    log::debug!(
        "exr source {}x{} {:?}",
        format.width,
        format.height,
        format.layout
    );
    Ok(Box::new(ExrSource { data, len, format }))
}

struct ExrSource<'a> {
    data: SharedBuffer<'a>,
    len: usize,
    format: ImageFormat,
}

impl SourceResource for ExrSource<'_> {
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
        use exr::prelude::*;

        check_buffer(&self.format, dst)?;

        let channels = self.format.channels() as usize;
        let width = self.format.width as usize;

        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .rgba_channels(
                |resolution, _| vec![0.0f32; resolution.area() * channels],
                move |samples: &mut Vec<f32>,
                      position: Vec2<usize>,
                      (r, g, b, a): (f32, f32, f32, f32)| {
                    let start = (position.y() * width + position.x()) * channels;
                    let pixel = [r, g, b, a];
                    samples[start..start + channels].copy_from_slice(&pixel[..channels]);
                },
            )
            .first_valid_layer()
            .all_attributes()
            .from_buffered(Cursor::new(self.data()))
            .map_err(codec_err)?;

        let samples = &image.layer_data.channel_data.pixels;
        let bytes: &[u8] = bytemuck::cast_slice(samples);
        super::check_decoded_len(FORMAT, &self.format, dst.len(), bytes.len())?;
        dst.copy_from_slice(bytes);
        Ok(())
    }
}

/// Validate `format` for OpenEXR and create a sink.
pub(crate) fn create(
    format: &ImageFormat,
    options: &BackendOptions<'_>,
) -> Result<Box<dyn SinkResource>, CodecError> {
    super::require_interleaved(FORMAT, format)?;
    options.check_limits(format)?;

    if format.channel_type != ChannelType::F32 {
        return Err(CodecError::layout(
            FORMAT,
            format!("{:?} samples", format.channel_type),
        ));
    }
    if !matches!(format.layout, ChannelLayout::Rgb | ChannelLayout::Rgba) {
        return Err(CodecError::layout(FORMAT, format!("{:?} images", format.layout)));
    }
    if format.width == 0 || format.height == 0 {
        return Err(CodecError::layout(FORMAT, "zero-sized images"));
    }

    Ok(Box::new(ExrSink {
        format: *format,
        output: Vec::new(),
    }))
}

struct ExrSink {
    format: ImageFormat,
    output: Vec<u8>,
}

impl ExrSink {
    fn encode(&self, samples: &[f32]) -> exr::error::Result<Vec<u8>> {
        use exr::prelude::*;

        let size = (self.format.width as usize, self.format.height as usize);
        let width = size.0;
        let mut output = Vec::new();

        match self.format.layout {
            ChannelLayout::Rgba => {
                let channels = SpecificChannels::rgba(|Vec2(x, y)| {
                    let i = (y * width + x) * 4;
                    (samples[i], samples[i + 1], samples[i + 2], samples[i + 3])
                });
                Image::from_channels(size, channels)
                    .write()
                    .to_buffered(Cursor::new(&mut output))?;
            }
            _ => {
                let channels = SpecificChannels::rgb(|Vec2(x, y)| {
                    let i = (y * width + x) * 3;
                    (samples[i], samples[i + 1], samples[i + 2])
                });
                Image::from_channels(size, channels)
                    .write()
                    .to_buffered(Cursor::new(&mut output))?;
            }
        }
        Ok(output)
    }
}

impl SinkResource for ExrSink {
    fn encoded_format(&self) -> EncodedFormat {
        FORMAT
    }

    fn format(&self) -> ImageFormat {
        self.format
    }

    fn write(&mut self, pixels: &[u8]) -> Result<(), CodecError> {
        check_buffer(&self.format, pixels)?;
        // Caller bytes carry no alignment guarantee.
        let samples: Vec<f32> = bytemuck::pod_collect_to_vec(pixels);
        let output = self.encode(&samples).map_err(codec_err)?;

        log::trace!("exr sink wrote {} bytes", output.len());
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
