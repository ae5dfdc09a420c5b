use proj::Proj;

/// Converts an OSGB36 National Grid (EPSG:27700) easting/northing pair into
/// WGS-84 (EPSG:4326) longitude/latitude degrees.
///
/// Returns `(longitude, latitude)`, matching the axis order NaPTAN and the
/// wider GeoJSON ecosystem expect.
pub fn osgb36_to_wgs84(easting: f64, northing: f64) -> Result<(f64, f64), proj::ProjError> {
    let transform = Proj::new_known_crs("EPSG:27700", "EPSG:4326", None)?;
    transform.convert((easting, northing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_a_known_grid_reference() {
        // Greenwich Observatory, a commonly used OSGB36 reference point.
        let (lon, lat) = osgb36_to_wgs84(538_890.0, 177_320.0).unwrap();
        assert!((lon - (-0.0005)).abs() < 0.01);
        assert!((lat - 51.4779).abs() < 0.01);
    }
}
