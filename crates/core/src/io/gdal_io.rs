//! GeoTIFF reading and writing using GDAL

use super::GeoTiffOptions;
use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoReference, GeoTransform, Raster, RasterElement};
use gdal::raster::GdalType;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use std::path::Path;

/// Read one band of a raster file through GDAL
///
/// # Arguments
/// * `path` - Path to the raster file
/// * `band` - Band number (1-indexed), defaults to 1
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let dataset = Dataset::open(path.as_ref())?;
    let band_idx = band.unwrap_or(1);
    if band_idx == 0 || band_idx > dataset.raster_count() as usize {
        return Err(Error::InvalidParameter {
            name: "band",
            value: band_idx.to_string(),
            reason: format!("dataset has {} band(s)", dataset.raster_count()),
        });
    }
    let rasterband = dataset.rasterband(band_idx)?;

    let (cols, rows) = dataset.raster_size();
    let buffer = rasterband.read_as::<T>((0, 0), (cols, rows), (cols, rows), None)?;

    let mut raster = Raster::from_vec(buffer.data().to_vec(), rows, cols)?;

    if let Ok(gt) = dataset.geo_transform() {
        raster.set_transform(GeoTransform::from_gdal(gt));
    }

    if let Ok(srs) = dataset.spatial_ref() {
        let crs = match srs.auth_code() {
            Ok(code) => Some(CRS::from_epsg(code as u32)),
            Err(_) => srs.to_wkt().ok().map(CRS::from_wkt),
        };
        raster.set_crs(crs);
    }

    if let Ok(Some(nodata)) = rasterband.no_data_value() {
        raster.set_nodata(num_traits::cast(nodata));
    }

    Ok(raster)
}

/// Read the transform and CRS of a raster file through GDAL
pub fn read_georeference<P: AsRef<Path>>(path: P) -> Result<GeoReference> {
    let dataset = Dataset::open(path.as_ref())?;
    let transform = dataset
        .geo_transform()
        .map(GeoTransform::from_gdal)
        .unwrap_or_default();
    let crs = dataset.spatial_ref().ok().and_then(|srs| match srs.auth_code() {
        Ok(code) => Some(CRS::from_epsg(code as u32)),
        Err(_) => srs.to_wkt().ok().map(CRS::from_wkt),
    });
    Ok(GeoReference::new(transform, crs))
}

/// Write a Raster to a single-band GeoTIFF through GDAL
///
/// An existing file at `path` is replaced. Without a CRS on the raster,
/// EPSG:4326 is written.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let (rows, cols) = raster.shape();
    let compress = format!("COMPRESS={}", opts.compression.as_gdal_str());
    let create_options = [compress.as_str()];

    let mut dataset = driver.create_with_band_type_with_options::<T, _>(
        path.as_ref(),
        cols as isize,
        rows as isize,
        1,
        &create_options,
    )?;

    dataset.set_geo_transform(&raster.transform().to_gdal())?;

    let crs = raster.georeference().crs_or_default();
    let srs = match (crs.epsg(), crs.wkt()) {
        (Some(epsg), _) => SpatialRef::from_epsg(epsg)?,
        (None, Some(wkt)) => SpatialRef::from_wkt(wkt)?,
        (None, None) => SpatialRef::from_epsg(4326)?,
    };
    dataset.set_spatial_ref(&srs)?;

    let mut band = dataset.rasterband(1)?;
    if let Some(nodata) = raster.nodata().and_then(|nd| nd.to_f64()) {
        band.set_no_data_value(Some(nodata))?;
    }

    let data: Vec<T> = raster.data().iter().copied().collect();
    band.write((0, 0), (cols, rows), &data)?;

    Ok(())
}
