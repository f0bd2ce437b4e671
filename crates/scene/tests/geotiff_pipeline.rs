//! End-to-end runs over GeoTIFF band files in a temporary directory.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use burnratio_core::io::{read_geotiff, write_geotiff};
use burnratio_core::{GeoTransform, Raster, CRS};
use burnratio_scene::{GeoTiffStore, SceneError, SceneProcessor, SensorProfile, WriteOutcome};
use ndarray::{array, Array2};
use tiff::encoder::{colortype::Gray32Float, TiffEncoder};
use tiff::tags::Tag;

const NODATA: f32 = -9999.0;

fn write_band(path: &Path, data: Array2<f32>, epsg: u32) {
    let mut band = Raster::from_array(data);
    band.set_transform(GeoTransform::new(399960.0, 4200000.0, 30.0, -30.0));
    band.set_crs(Some(CRS::from_epsg(epsg)));
    write_geotiff(&band, path, None).unwrap();
}

/// Single-row band tagged with `directory` as its GeoKeys, the way
/// upstream processors write them
fn write_band_with_geokeys(path: &Path, values: &[f32], directory: &[u16]) {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).unwrap();
        let mut image = encoder
            .new_image::<Gray32Float>(values.len() as u32, 1)
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &[30.0_f64, 30.0, 0.0][..])
            .unwrap();
        image
            .encoder()
            .write_tag(
                Tag::ModelTiepointTag,
                &[0.0_f64, 0.0, 0.0, 399960.0, 4200000.0, 0.0][..],
            )
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::GeoKeyDirectoryTag, directory)
            .unwrap();
        image.write_data(values).unwrap();
    }
    std::fs::write(path, buf).unwrap();
}

fn scene(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

#[test]
fn test_single_scene_to_geotiff() {
    let dir = tempfile::tempdir().unwrap();
    let scene = scene(dir.path(), "HLS.S30.T11SKD.2022286T184329.v2.0");
    write_band(
        &dir.path().join("HLS.S30.T11SKD.2022286T184329.v2.0.B8A.tif"),
        array![[0.4, 0.0], [0.3, -0.05]],
        32611,
    );
    write_band(
        &dir.path().join("HLS.S30.T11SKD.2022286T184329.v2.0.B12.tif"),
        array![[0.2, 0.0], [0.3, 0.1]],
        32611,
    );
    let output = dir.path().join("output.tif");

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let result = processor.process(&scene, Some(&output)).unwrap();

    assert_eq!(result.write, Some(WriteOutcome::Written(output.clone())));

    let written: Raster<f32> = read_geotiff(&output, None).unwrap();
    assert_eq!(written.shape(), (2, 2));
    assert_relative_eq!(written.get(0, 0).unwrap(), 0.333333, epsilon = 1e-5);
    assert_eq!(written.get(0, 1).unwrap(), NODATA);
    assert_eq!(written.get(1, 0).unwrap(), 0.0);
    assert_eq!(written.get(1, 1).unwrap(), -1.0);
    assert_eq!(written.data(), result.nbr.data());
    assert_eq!(written.nodata(), Some(NODATA));
    assert_eq!(written.georeference(), result.geo_reference);
    assert_eq!(written.crs().and_then(|c| c.epsg()), Some(32611));
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let scene = scene(dir.path(), "T10SFJ");
    write_band(&dir.path().join("T10SFJ.B08.tif"), array![[0.6, 0.5, 0.4]], 32610);
    write_band(&dir.path().join("T10SFJ.B11.tif"), array![[0.2, 0.5, 0.0]], 32610);
    let output = dir.path().join("nbr.tif");
    std::fs::write(&output, b"stale").unwrap();

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::Sentinel2L2a);
    processor.process(&scene, Some(&output)).unwrap();

    let written: Raster<f32> = read_geotiff(&output, None).unwrap();
    assert_eq!(written.shape(), (1, 3));
    assert_eq!(written.get(0, 1).unwrap(), 0.0);
    assert_eq!(written.get(0, 2).unwrap(), 1.0);
}

#[test]
fn test_unwritable_output_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let scene = scene(dir.path(), "T10SFJ");
    write_band(&dir.path().join("T10SFJ.B8A.tif"), array![[0.6]], 32610);
    write_band(&dir.path().join("T10SFJ.B12.tif"), array![[0.2]], 32610);
    let output = dir.path().join("no/such/dir/nbr.tif");

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let result = processor.process(&scene, Some(&output)).unwrap();

    assert!(matches!(result.write, Some(WriteOutcome::Failed { .. })));
    assert_relative_eq!(result.nbr.get(0, 0).unwrap(), 0.5, epsilon = 1e-6);
    assert!(!output.exists());
}

#[test]
fn test_missing_swir_band_fails() {
    let dir = tempfile::tempdir().unwrap();
    let scene = scene(dir.path(), "T10SFJ");
    write_band(&dir.path().join("T10SFJ.B8A.tif"), array![[0.6]], 32610);

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let err = processor.process(&scene, None).unwrap_err();

    match err {
        SceneError::BandLoad { path, .. } => assert_eq!(path, dir.path().join("T10SFJ.B12.tif")),
        other => panic!("Expected band load error, got {:?}", other),
    }
}

#[test]
fn test_scene_pair_difference() {
    let dir = tempfile::tempdir().unwrap();
    let before = scene(dir.path(), "HLS.S30.T10SFJ.2022239T184919.v2.0");
    let after = scene(dir.path(), "HLS.S30.T10SFJ.2022314T185621.v2.0");

    write_band(
        &dir.path().join("HLS.S30.T10SFJ.2022239T184919.v2.0.B8A.tif"),
        array![[0.75, 0.0, 0.6]],
        32610,
    );
    write_band(
        &dir.path().join("HLS.S30.T10SFJ.2022239T184919.v2.0.B12.tif"),
        array![[0.25, 0.0, 0.4]],
        32610,
    );
    write_band(
        &dir.path().join("HLS.S30.T10SFJ.2022314T185621.v2.0.B8A.tif"),
        array![[0.55, 0.65, 0.0]],
        32610,
    );
    write_band(
        &dir.path().join("HLS.S30.T10SFJ.2022314T185621.v2.0.B12.tif"),
        array![[0.45, 0.35, -0.3]],
        32610,
    );
    let output = dir.path().join("burn_dif.tif");
    let severity = dir.path().join("severity.tif");

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let result = processor
        .process_difference(&before, &after, &output, Some(&severity))
        .unwrap();

    assert!(result.write.is_written());

    let dnbr: Raster<f32> = read_geotiff(&output, None).unwrap();
    assert_relative_eq!(dnbr.get(0, 0).unwrap(), 0.4, epsilon = 1e-5);
    assert_eq!(dnbr.get(0, 1).unwrap(), NODATA);
    assert_eq!(dnbr.get(0, 2).unwrap(), NODATA);
    assert_eq!(dnbr.crs().and_then(|c| c.epsg()), Some(32610));

    let classes: Raster<u8> = read_geotiff(&severity, None).unwrap();
    assert_eq!(classes.get(0, 0).unwrap(), 5);
    assert_eq!(classes.get(0, 1).unwrap(), 0);

    // Intermediate NBR rasters are not written
    let tifs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "tif"))
        .count();
    assert_eq!(tifs, 6);
}

#[test]
fn test_projected_crs_wins_over_recorded_base_datum() {
    let mixed = [1, 1, 0, 4, 1024, 0, 1, 1, 1025, 0, 1, 1, 2048, 0, 1, 4326, 3072, 0, 1, 32611];
    let dir = tempfile::tempdir().unwrap();
    let scene = scene(dir.path(), "T11SKD");
    write_band_with_geokeys(&dir.path().join("T11SKD.B8A.tif"), &[0.4, 0.6], &mixed);
    write_band_with_geokeys(&dir.path().join("T11SKD.B12.tif"), &[0.2, 0.2], &mixed);
    let output = dir.path().join("nbr.tif");

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let result = processor.process(&scene, Some(&output)).unwrap();
    assert_eq!(result.geo_reference.crs.as_ref().and_then(|c| c.epsg()), Some(32611));

    let written: Raster<f32> = read_geotiff(&output, None).unwrap();
    assert_eq!(written.crs().and_then(|c| c.epsg()), Some(32611));
    assert_eq!(written.transform(), &GeoTransform::new(399960.0, 4200000.0, 30.0, -30.0));
}

#[test]
fn test_user_defined_crs_carried_to_dnbr() {
    #[rustfmt::skip]
    let user_defined = [
        1, 1, 0, 6,
        1024, 0, 1, 1,
        1025, 0, 1, 1,
        2048, 0, 1, 32767,
        2056, 0, 1, 7030,
        3072, 0, 1, 32767,
        3074, 0, 1, 16011,
    ];
    let dir = tempfile::tempdir().unwrap();
    let before = scene(dir.path(), "HLS.S30.T11SKD.2022239T183919.v2.0");
    let after = scene(dir.path(), "HLS.S30.T11SKD.2022314T184521.v2.0");
    for (base, nir, swir) in [
        (&before, [0.75_f32, 0.6], [0.25_f32, 0.4]),
        (&after, [0.55_f32, 0.6], [0.45_f32, 0.4]),
    ] {
        let base = base.to_string_lossy();
        write_band_with_geokeys(Path::new(&format!("{}.B8A.tif", base)), &nir, &user_defined);
        write_band_with_geokeys(Path::new(&format!("{}.B12.tif", base)), &swir, &user_defined);
    }
    let output = dir.path().join("burn_dif.tif");

    let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
    let result = processor
        .process_difference(&before, &after, &output, None)
        .unwrap();
    assert!(result.write.is_written());

    let written: Raster<f32> = read_geotiff(&output, None).unwrap();
    let crs = written.crs().unwrap();
    assert_eq!(crs.epsg(), None);
    assert_eq!(
        crs.geokeys().map(|k| k.directory.clone()),
        Some(user_defined.to_vec())
    );
    assert_eq!(written.transform(), &GeoTransform::new(399960.0, 4200000.0, 30.0, -30.0));
    assert_relative_eq!(written.get(0, 0).unwrap(), 0.4, epsilon = 1e-5);
    assert_relative_eq!(written.get(0, 1).unwrap(), 0.0, epsilon = 1e-6);
}
