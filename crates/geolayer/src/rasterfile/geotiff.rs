//! GeoTIFF reading and writing using the pure Rust tiff crate.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tiff::{
    decoder::{Decoder, DecodingResult, Limits},
    encoder::{TiffEncoder, TiffValue, colortype},
    tags::Tag,
};

use super::{GeoKey, GeoKeyDirectory, GeoTag, RasterFile, RasterFileWriter, RasterSize};
use crate::{Error, RasterSample, Result, SampleType, Window, rastersample::cast_samples};

fn read_f64_tag<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Result<Vec<f64>> {
    match decoder.find_tag(tag)? {
        Some(value) => Ok(value.into_f64_vec()?),
        None => Ok(Vec::new()),
    }
}

fn read_key_directory<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoKeyDirectory>> {
    match decoder.find_tag(Tag::GeoKeyDirectoryTag)? {
        Some(value) => Ok(Some(GeoKeyDirectory::from_tag_values(&value.into_u16_vec()?)?)),
        None => Ok(None),
    }
}

fn read_projection<R: Read + Seek>(decoder: &mut Decoder<R>, key_directory: Option<&GeoKeyDirectory>) -> Result<String> {
    let ascii_params = match decoder.find_tag(Tag::GeoAsciiParamsTag)? {
        Some(value) => value.into_string()?,
        None => return Ok(String::new()),
    };

    // Prefer the citation referenced from the key directory, the ascii params can contain several '|' separated values
    let citation = key_directory
        .and_then(|dir| dir.entry(GeoKey::GeodeticCitation).or_else(|| dir.entry(GeoKey::Citation)))
        .filter(|entry| entry.location == Tag::GeoAsciiParamsTag.to_u16())
        .and_then(|entry| {
            let start = entry.value_or_offset as usize;
            ascii_params.get(start..start + entry.count as usize)
        })
        .unwrap_or(ascii_params.as_str());

    Ok(citation.trim_end_matches(['|', '\0']).to_string())
}

fn decoded_samples<T: RasterSample>(decoded: DecodingResult) -> Result<Vec<T>> {
    match decoded {
        DecodingResult::U8(values) => cast_samples(&values),
        DecodingResult::U16(values) => cast_samples(&values),
        DecodingResult::U32(values) => cast_samples(&values),
        DecodingResult::U64(values) => cast_samples(&values),
        DecodingResult::I8(values) => cast_samples(&values),
        DecodingResult::I16(values) => cast_samples(&values),
        DecodingResult::I32(values) => cast_samples(&values),
        DecodingResult::I64(values) => cast_samples(&values),
        DecodingResult::F32(values) => cast_samples(&values),
        DecodingResult::F64(values) => cast_samples(&values),
        #[allow(unreachable_patterns)]
        _ => Err(Error::Runtime("Unsupported tiff sample format".into())),
    }
}

/// A single band GeoTIFF opened for reading.
///
/// The georeferencing tags are read when the file is opened, pixel data is decoded chunk by chunk on request.
/// Pixels are converted to `T` while decoding, a value that does not fit in `T` results in an error.
pub struct GeoTiffFile<T: RasterSample> {
    path: PathBuf,
    size: RasterSize,
    pixel_scale: Vec<f64>,
    tie_point: Vec<f64>,
    projection: String,
    key_directory: Option<GeoKeyDirectory>,
    decoder: Mutex<Decoder<BufReader<File>>>,
    _sample: PhantomData<T>,
}

impl<T: RasterSample> GeoTiffFile<T> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?.with_limits(Limits::unlimited());

        match decoder.colortype()? {
            tiff::ColorType::Gray(_) => {}
            color_type => {
                return Err(Error::InvalidArgument(format!(
                    "Only single band rasters are supported ({color_type:?})"
                )));
            }
        }

        let (width, height) = decoder.dimensions()?;
        let pixel_scale = read_f64_tag(&mut decoder, GeoTag::PixelScale.tiff_tag())?;
        let tie_point = read_f64_tag(&mut decoder, GeoTag::TiePoint.tiff_tag())?;
        let key_directory = read_key_directory(&mut decoder)?;
        let projection = read_projection(&mut decoder, key_directory.as_ref())?;

        let size = RasterSize::new(width as usize, height as usize);
        log::debug!("Opened geotiff {} ({size}, projection '{projection}')", path.display());

        Ok(GeoTiffFile {
            path: path.to_path_buf(),
            size,
            pixel_scale,
            tie_point,
            projection,
            key_directory,
            decoder: Mutex::new(decoder),
            _sample: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key_directory(&self) -> Option<&GeoKeyDirectory> {
        self.key_directory.as_ref()
    }
}

impl<T: RasterSample> std::fmt::Debug for GeoTiffFile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoTiffFile")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("sample_type", &T::TYPE)
            .finish()
    }
}

impl<T: RasterSample> RasterFile for GeoTiffFile<T> {
    type Sample = T;

    fn raster_size(&self) -> RasterSize {
        self.size
    }

    fn geotag(&self, tag: GeoTag) -> Result<Vec<f64>> {
        Ok(match tag {
            GeoTag::PixelScale => self.pixel_scale.clone(),
            GeoTag::TiePoint => self.tie_point.clone(),
        })
    }

    fn projection(&self) -> Result<String> {
        Ok(self.projection.clone())
    }

    fn read_window(&self, window: &Window) -> Result<Vec<T>> {
        let width = self.size.width as i64;
        if !window.fits_within(width, self.size.height as i64) {
            return Err(Error::WindowExceedsBounds);
        }

        let mut data = vec![T::zero(); window.pixel_count()];
        if window.is_empty() {
            return Ok(data);
        }

        log::trace!("Read {window} from {}", self.path.display());

        let mut decoder = self.decoder.lock()?;
        let (chunk_width, chunk_height) = decoder.chunk_dimensions();
        let (chunk_width, chunk_height) = (chunk_width as i64, chunk_height as i64);
        if chunk_width == 0 || chunk_height == 0 {
            return Err(Error::Runtime(format!("Invalid chunk dimensions in {}", self.path.display())));
        }

        let chunks_across = (width + chunk_width - 1) / chunk_width;
        let window_right = window.xoff + window.xsize;
        let window_bottom = window.yoff + window.ysize;

        for chunk_row in (window.yoff / chunk_height)..=((window_bottom - 1) / chunk_height) {
            for chunk_col in (window.xoff / chunk_width)..=((window_right - 1) / chunk_width) {
                let chunk_index = (chunk_row * chunks_across + chunk_col) as u32;
                let (data_width, data_height) = decoder.chunk_data_dimensions(chunk_index);
                let (data_width, data_height) = (data_width as i64, data_height as i64);
                let chunk: Vec<T> = decoded_samples(decoder.read_chunk(chunk_index)?)?;
                if (chunk.len() as i64) < data_width * data_height {
                    return Err(Error::Runtime(format!("Truncated chunk {chunk_index} in {}", self.path.display())));
                }

                let chunk_left = chunk_col * chunk_width;
                let chunk_top = chunk_row * chunk_height;
                let x_start = window.xoff.max(chunk_left);
                let x_end = window_right.min(chunk_left + data_width);
                let y_start = window.yoff.max(chunk_top);
                let y_end = window_bottom.min(chunk_top + data_height);
                if x_start >= x_end {
                    continue;
                }

                let row_length = (x_end - x_start) as usize;
                for y in y_start..y_end {
                    let src = ((y - chunk_top) * data_width + (x_start - chunk_left)) as usize;
                    let dst = ((y - window.yoff) * window.xsize + (x_start - window.xoff)) as usize;
                    data[dst..dst + row_length].copy_from_slice(&chunk[src..src + row_length]);
                }
            }
        }

        Ok(data)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeoTiffWriteOptions {
    /// Number of rows stored in each strip, the encoder picks a size when not provided
    pub rows_per_strip: Option<u32>,
}

/// Georeferencing tags collected before the pixels are written
#[derive(Debug, Default)]
struct PendingTags {
    geotags: Vec<(GeoTag, Vec<f64>)>,
    ascii_params: Option<String>,
    key_directory: Option<GeoKeyDirectory>,
}

fn write_image<W, C>(
    encoder: &mut TiffEncoder<W>,
    size: RasterSize,
    options: &GeoTiffWriteOptions,
    tags: &PendingTags,
    data: &[C::Inner],
) -> Result<()>
where
    W: Write + Seek,
    C: colortype::ColorType,
    [C::Inner]: TiffValue,
{
    let height = size.height as u32;
    let mut image = encoder.new_image::<C>(size.width as u32, height)?;
    if let Some(rows) = options.rows_per_strip {
        image.rows_per_strip(rows.clamp(1, height))?;
    }

    let directory = image.encoder();
    for (tag, values) in &tags.geotags {
        directory.write_tag(tag.tiff_tag(), &values[..])?;
    }

    if let Some(key_directory) = &tags.key_directory {
        directory.write_tag(Tag::GeoKeyDirectoryTag, &key_directory.to_tag_values()[..])?;
    }

    if let Some(ascii_params) = &tags.ascii_params {
        directory.write_tag(Tag::GeoAsciiParamsTag, ascii_params.as_str())?;
    }

    image.write_data(data)?;
    Ok(())
}

/// A single band GeoTIFF being written.
///
/// The file is created immediately, tags are collected until the pixels are written with [`RasterFileWriter::write_data`].
pub struct GeoTiffFileWriter<T: RasterSample> {
    path: PathBuf,
    writer: BufWriter<File>,
    size: RasterSize,
    options: GeoTiffWriteOptions,
    tags: PendingTags,
    _sample: PhantomData<T>,
}

impl<T: RasterSample> std::fmt::Debug for GeoTiffFileWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoTiffFileWriter")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("sample_type", &T::TYPE)
            .finish()
    }
}

impl<T: RasterSample> RasterFileWriter for GeoTiffFileWriter<T> {
    type Sample = T;
    type Options = GeoTiffWriteOptions;

    fn create(path: &Path, size: RasterSize, samples_per_pixel: u16, options: GeoTiffWriteOptions) -> Result<Self> {
        if samples_per_pixel != 1 {
            return Err(Error::InvalidArgument(format!(
                "Only single band rasters can be written ({samples_per_pixel} samples per pixel requested)"
            )));
        }

        if size.is_empty() {
            return Err(Error::InvalidArgument(format!("Can not create an empty raster ({size})")));
        }

        if u32::try_from(size.width).is_err() || u32::try_from(size.height).is_err() {
            return Err(Error::InvalidArgument(format!("Raster too large for tiff ({size})")));
        }

        log::debug!("Create geotiff {} ({size}, {})", path.display(), T::TYPE);

        Ok(GeoTiffFileWriter {
            path: path.to_path_buf(),
            writer: BufWriter::new(File::create(path)?),
            size,
            options,
            tags: PendingTags::default(),
            _sample: PhantomData,
        })
    }

    fn raster_size(&self) -> RasterSize {
        self.size
    }

    fn write_geotag(&mut self, tag: GeoTag, values: &[f64]) -> Result<()> {
        self.tags.geotags.retain(|(existing, _)| *existing != tag);
        self.tags.geotags.push((tag, values.to_vec()));
        Ok(())
    }

    fn write_projection(&mut self, projection: &str) -> Result<()> {
        if !projection.is_ascii() || projection.contains('|') {
            return Err(Error::InvalidArgument(format!("Invalid projection citation: '{projection}'")));
        }

        self.tags.ascii_params = Some(format!("{projection}|"));
        Ok(())
    }

    fn write_directory(&mut self, directory: &GeoKeyDirectory) -> Result<()> {
        self.tags.key_directory = Some(directory.clone());
        Ok(())
    }

    fn write_data(self, data: &[T]) -> Result<()> {
        let GeoTiffFileWriter {
            path,
            mut writer,
            size,
            options,
            tags,
            ..
        } = self;

        if data.len() != size.pixel_count() {
            return Err(Error::InvalidArgument(format!(
                "Data size mismatch: expected {} pixels, got {}",
                size.pixel_count(),
                data.len()
            )));
        }

        {
            let mut encoder = TiffEncoder::new(&mut writer)?;
            let enc = &mut encoder;
            match T::TYPE {
                SampleType::Uint8 => write_image::<_, colortype::Gray8>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Uint16 => write_image::<_, colortype::Gray16>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Uint32 => write_image::<_, colortype::Gray32>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Uint64 => write_image::<_, colortype::Gray64>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Int8 => write_image::<_, colortype::GrayI8>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Int16 => write_image::<_, colortype::GrayI16>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Int32 => write_image::<_, colortype::GrayI32>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Int64 => write_image::<_, colortype::GrayI64>(enc, size, &options, &tags, bytemuck::cast_slice(data))?,
                SampleType::Float32 => {
                    write_image::<_, colortype::Gray32Float>(enc, size, &options, &tags, bytemuck::cast_slice(data))?
                }
                SampleType::Float64 => {
                    write_image::<_, colortype::Gray64Float>(enc, size, &options, &tags, bytemuck::cast_slice(data))?
                }
            }
        }
        writer.flush()?;

        log::debug!("Finished writing {}", path.display());
        Ok(())
    }
}
