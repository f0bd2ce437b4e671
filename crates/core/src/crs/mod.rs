//! Coordinate Reference System handling

use std::fmt;

/// GeoTIFF georeferencing keys exactly as stored in a source file.
///
/// `directory` is the GeoKeyDirectory (34735), `double_params` the
/// GeoDoubleParams (34736) and `ascii_params` the GeoAsciiParams (34737)
/// that directory entries may point into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoKeys {
    pub directory: Vec<u16>,
    pub double_params: Vec<f64>,
    pub ascii_params: Option<String>,
}

/// Coordinate reference system of a raster.
///
/// GeoTIFF files produced by HLS and Sentinel-2 processors identify their
/// CRS by EPSG code or by user-defined GeoKeys; WKT is kept for sources
/// (GDAL) that only expose text. GeoKeys read from a file are carried
/// along so a writer can reproduce them unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CRS {
    wkt: Option<String>,
    epsg: Option<u32>,
    geokeys: Option<GeoKeys>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
            geokeys: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
            geokeys: None,
        }
    }

    /// Create a CRS from a file's GeoKeys; `epsg` is the code they resolve
    /// to, if any
    pub fn from_geokeys(geokeys: GeoKeys, epsg: Option<u32>) -> Self {
        Self {
            wkt: None,
            epsg,
            geokeys: Some(geokeys),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    pub fn geokeys(&self) -> Option<&GeoKeys> {
        self.geokeys.as_ref()
    }

    /// Whether the EPSG code names a geographic (lat/lon) system.
    ///
    /// EPSG reserves 4000-4999 for geographic 2D systems; everything else
    /// in use here (UTM 326xx/327xx, web mercator) is projected.
    pub fn is_geographic(&self) -> bool {
        matches!(self.epsg, Some(4000..=4999))
    }

    /// Short identifier, e.g. `EPSG:32611`
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        if self.geokeys.is_some() {
            return "GeoKeys:user-defined".to_string();
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
