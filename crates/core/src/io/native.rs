//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Built on the `tiff` crate. Georeferencing is carried by the standard
//! GeoTIFF tags:
//! - ModelPixelScale (33550) + ModelTiepoint (33922) for north-up grids
//! - ModelTransformation (34264) for rotated or south-up grids
//! - GeoKeyDirectory (34735) with GeoDoubleParams (34736) and
//!   GeoAsciiParams (34737) for the CRS
//! - GDAL_NODATA (42113) for the nodata value
//!
//! GeoKeys read from a file are kept on the raster's [`CRS`] and written
//! back unchanged, so user-defined systems survive a read/write cycle.

use super::{GeoTiffOptions, TiffCompression};
use crate::crs::{GeoKeys, CRS};
use crate::error::{Error, Result};
use crate::raster::{GeoReference, GeoTransform, Raster, RasterElement};
use std::fs::{self, File};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::compression::{Compression, Deflate, Lzw, Uncompressed};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tracing::debug;

// GeoKey ids and values (GeoTIFF 1.1, section 7)
const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const USER_DEFINED: u16 = 32767;

/// Read one band of a GeoTIFF file into a Raster
///
/// `band` is 1-based and defaults to 1. Pixel-interleaved multi-band
/// images are de-interleaved; a band past the last one is an error.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file, band)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band)
}

/// Read the transform and CRS of a GeoTIFF without decoding pixels
pub fn read_georeference<P: AsRef<Path>>(path: P) -> Result<GeoReference> {
    let file = File::open(path.as_ref())?;
    let mut decoder = Decoder::new(file)?;
    Ok(GeoReference::new(
        read_geotransform(&mut decoder).unwrap_or_default(),
        read_crs(&mut decoder),
    ))
}

fn decode_geotiff<T, R>(reader: R, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;

    let rows = height as usize;
    let cols = width as usize;

    let samples: Vec<T> = match decoder.read_image()? {
        DecodingResult::F32(buf) => cast_samples(buf),
        DecodingResult::F64(buf) => cast_samples(buf),
        DecodingResult::U8(buf) => cast_samples(buf),
        DecodingResult::U16(buf) => cast_samples(buf),
        DecodingResult::U32(buf) => cast_samples(buf),
        DecodingResult::I8(buf) => cast_samples(buf),
        DecodingResult::I16(buf) => cast_samples(buf),
        DecodingResult::I32(buf) => cast_samples(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    let cells = rows * cols;
    if cells == 0 || samples.len() % cells != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let band_count = samples.len() / cells;
    let band = band.unwrap_or(1);
    if band == 0 || band > band_count {
        return Err(Error::InvalidParameter {
            name: "band",
            value: band.to_string(),
            reason: format!("image has {} band(s), numbered from 1", band_count),
        });
    }

    let data = if band_count == 1 {
        samples
    } else {
        samples
            .into_iter()
            .skip(band - 1)
            .step_by(band_count)
            .collect()
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));
    raster.set_nodata(read_nodata(&mut decoder).and_then(num_traits::cast));

    debug!(
        "Decoded {}x{} GeoTIFF, band {} of {}",
        cols, rows, band, band_count
    );

    Ok(raster)
}

fn cast_samples<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok();
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
            let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
            let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    // Row-major 4x4 matrix; the first two rows hold the affine terms
    let matrix = decoder.get_tag_f64_vec(Tag::ModelTransformationTag).ok()?;
    if matrix.len() < 16 {
        return None;
    }
    Some(GeoTransform {
        origin_x: matrix[3],
        origin_y: matrix[7],
        pixel_width: matrix[0],
        pixel_height: matrix[5],
        row_rotation: matrix[1],
        col_rotation: matrix[4],
    })
}

fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let directory = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).ok()?;
    let geokeys = GeoKeys {
        directory,
        double_params: decoder
            .get_tag_f64_vec(Tag::GeoDoubleParamsTag)
            .unwrap_or_default(),
        ascii_params: decoder
            .get_tag_ascii_string(Tag::GeoAsciiParamsTag)
            .ok()
            .map(|text| text.trim_end_matches('\0').to_string()),
    };
    crs_from_geokeys(geokeys)
}

/// Build a CRS from a file's GeoKeys.
///
/// `None` when the directory names no model type and no CRS keys (only
/// raster-type or citation keys, or a malformed header).
fn crs_from_geokeys(geokeys: GeoKeys) -> Option<CRS> {
    let describes_crs = geokey_entries(&geokeys.directory)?
        .any(|[id, ..]| id == GT_MODEL_TYPE || id >= GEOGRAPHIC_TYPE);
    if !describes_crs {
        return None;
    }

    let epsg = epsg_from_geokeys(&geokeys.directory);
    Some(CRS::from_geokeys(geokeys, epsg))
}

/// Entries of a GeoKeyDirectory as `[id, location, count, value]`.
///
/// Layout: `[version, revision, minor, count, (id, location, count, value)*]`.
fn geokey_entries(directory: &[u16]) -> Option<impl Iterator<Item = [u16; 4]> + '_> {
    let count = *directory.get(3)? as usize;
    Some(
        directory
            .get(4..)?
            .chunks_exact(4)
            .take(count)
            .map(|key| [key[0], key[1], key[2], key[3]]),
    )
}

/// EPSG code named by a GeoKeyDirectory.
///
/// GTModelTypeGeoKey picks between ProjectedCSTypeGeoKey and
/// GeographicTypeGeoKey; a projected file also records its base geographic
/// system, which is not the raster's CRS. Only inline (location 0) codes
/// count, and user-defined (32767) is not a code.
fn epsg_from_geokeys(directory: &[u16]) -> Option<u32> {
    let inline = |wanted: u16| {
        geokey_entries(directory)?.find_map(|[id, location, _, value]| {
            (id == wanted && location == 0).then_some(value)
        })
    };
    let code = |wanted: u16| {
        inline(wanted)
            .filter(|&value| value > 0 && value != USER_DEFINED)
            .map(u32::from)
    };

    match inline(GT_MODEL_TYPE) {
        Some(MODEL_TYPE_PROJECTED) => code(PROJECTED_CS_TYPE),
        Some(MODEL_TYPE_GEOGRAPHIC) => code(GEOGRAPHIC_TYPE),
        _ => code(PROJECTED_CS_TYPE).or_else(|| code(GEOGRAPHIC_TYPE)),
    }
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()?;
    text.trim_end_matches('\0').trim().parse::<f64>().ok()
}

/// Write a Raster to a single-band 32-bit float GeoTIFF file
///
/// An existing file at `path` is replaced. The image is encoded in memory
/// first; `path` is untouched when encoding fails.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let buf = write_geotiff_to_buffer(raster, options)?;
    fs::write(path.as_ref(), buf)?;
    Ok(())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

/// Tag payloads derived from a raster's georeferencing
struct GeoTags {
    pixel_scale: Option<Vec<f64>>,
    tiepoint: Option<Vec<f64>>,
    transformation: Option<Vec<f64>>,
    geokeys: GeoKeys,
    nodata: Option<String>,
}

impl GeoTags {
    fn for_raster<T: RasterElement>(raster: &Raster<T>) -> Self {
        let gt = raster.transform();
        let crs = raster.georeference().crs_or_default();

        let (pixel_scale, tiepoint, transformation) = if gt.is_north_up() {
            (
                Some(vec![gt.pixel_width, gt.pixel_height.abs(), 0.0]),
                Some(vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0]),
                None,
            )
        } else {
            #[rustfmt::skip]
            let matrix = vec![
                gt.pixel_width, gt.row_rotation, 0.0, gt.origin_x,
                gt.col_rotation, gt.pixel_height, 0.0, gt.origin_y,
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ];
            (None, None, Some(matrix))
        };

        Self {
            pixel_scale,
            tiepoint,
            transformation,
            geokeys: crs.geokeys().cloned().unwrap_or_else(|| GeoKeys {
                directory: geokey_directory(&crs),
                ..GeoKeys::default()
            }),
            nodata: raster
                .nodata()
                .and_then(|nd| nd.to_f64())
                .map(|nd| nd.to_string()),
        }
    }
}

fn geokey_directory(crs: &CRS) -> Vec<u16> {
    let mut keys: Vec<[u16; 4]> = vec![[GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]];

    match crs.epsg().and_then(|code| u16::try_from(code).ok()) {
        Some(code) if crs.is_geographic() => {
            keys.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_GEOGRAPHIC]);
            keys.push([GEOGRAPHIC_TYPE, 0, 1, code]);
        }
        Some(code) => {
            keys.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED]);
            keys.push([PROJECTED_CS_TYPE, 0, 1, code]);
        }
        None => debug!("CRS {} has no EPSG code, writing without CRS keys", crs),
    }

    // Keys must be sorted by id
    keys.sort_by_key(|key| key[0]);

    let mut directory = vec![1, 1, 0, keys.len() as u16];
    directory.extend(keys.into_iter().flatten());
    directory
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    if raster.is_empty() {
        return Err(Error::InvalidDimensions {
            width: raster.cols(),
            height: raster.rows(),
        });
    }

    let mut encoder = TiffEncoder::new(writer)?;

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();
    let tags = GeoTags::for_raster(raster);

    match options.compression {
        TiffCompression::None => write_image(&mut encoder, raster, &data, &tags, Uncompressed),
        TiffCompression::Lzw => write_image(&mut encoder, raster, &data, &tags, Lzw::default()),
        TiffCompression::Deflate => {
            write_image(&mut encoder, raster, &data, &tags, Deflate::default())
        }
    }
}

fn write_image<T, W, D>(
    encoder: &mut TiffEncoder<W>,
    raster: &Raster<T>,
    data: &[f32],
    tags: &GeoTags,
    compression: D,
) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
    D: Compression,
{
    let (rows, cols) = raster.shape();
    let mut image = encoder.new_image_with_compression::<Gray32Float, D>(
        cols as u32,
        rows as u32,
        compression,
    )?;

    if let Some(scale) = &tags.pixel_scale {
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, scale.as_slice())?;
    }
    if let Some(tiepoint) = &tags.tiepoint {
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, tiepoint.as_slice())?;
    }
    if let Some(matrix) = &tags.transformation {
        image
            .encoder()
            .write_tag(Tag::ModelTransformationTag, matrix.as_slice())?;
    }
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, tags.geokeys.directory.as_slice())?;
    if !tags.geokeys.double_params.is_empty() {
        image
            .encoder()
            .write_tag(Tag::GeoDoubleParamsTag, tags.geokeys.double_params.as_slice())?;
    }
    if let Some(ascii) = &tags.geokeys.ascii_params {
        image
            .encoder()
            .write_tag(Tag::GeoAsciiParamsTag, ascii.as_str())?;
    }
    if let Some(nodata) = &tags.nodata {
        image.encoder().write_tag(Tag::GdalNodata, nodata.as_str())?;
    }

    image.write_data(data)?;
    Ok(())
}
