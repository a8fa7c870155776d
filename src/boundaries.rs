//! Borough boundary GeoJSON and the map fill expression keyed on it.

use crate::analyzers::color::Rgb;
use crate::borough::{Borough, Bounds};
use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Feature property holding the region name.
pub const REGION_PROPERTY: &str = "BoroName";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub borough: Option<Borough>,
    /// Fit bounds of the matched borough, `[[west, south], [east, north]]`.
    pub bounds: Option<Bounds>,
}

/// Lists the regions of a GeoJSON `FeatureCollection`.
///
/// Features without the name property are skipped.
pub fn parse_boundaries(text: &str, property: &str) -> Result<Vec<Region>> {
    let geojson: Value = serde_json::from_str(text)?;

    let features = geojson["features"]
        .as_array()
        .ok_or_else(|| anyhow!("No features array in boundary GeoJSON"))?;

    let mut regions = Vec::new();
    for (i, feature) in features.iter().enumerate() {
        let Some(name) = feature["properties"][property].as_str() else {
            warn!(feature = i, property, "Boundary feature has no region name");
            continue;
        };
        let borough = Borough::canonicalize(name);
        regions.push(Region {
            name: name.to_string(),
            borough,
            bounds: borough.map(|b| b.bounds()),
        });
    }

    debug!(regions = regions.len(), "Boundaries parsed");
    Ok(regions)
}

/// `["match", ["get", <property>], name, color, ..., <default>]`.
pub fn fill_expression<'a, I>(colors: I) -> Value
where
    I: IntoIterator<Item = (&'a Borough, &'a Rgb)>,
{
    let mut expr = vec![json!("match"), json!(["get", REGION_PROPERTY])];
    for (borough, color) in colors {
        expr.push(json!(borough.name()));
        expr.push(json!(color.to_string()));
    }
    expr.push(json!(Rgb::NO_DATA.to_string()));
    Value::Array(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"BoroName": "Staten Island", "BoroCode": 5}, "geometry": null},
            {"type": "Feature", "properties": {"BoroName": "Bronx"}, "geometry": null},
            {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn test_parse_boundaries() {
        let regions = parse_boundaries(GEOJSON, REGION_PROPERTY).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].borough, Some(Borough::StatenIsland));
        assert_eq!(regions[1].name, "Bronx");
        assert_eq!(regions[1].bounds, Some(Borough::Bronx.bounds()));
    }

    #[test]
    fn test_unmatched_region_has_no_bounds() {
        let text = r#"{"features": [{"properties": {"BoroName": "Liberty Island"}}]}"#;
        let regions = parse_boundaries(text, REGION_PROPERTY).unwrap();
        assert_eq!(regions[0].borough, None);
        assert_eq!(regions[0].bounds, None);
    }

    #[test]
    fn test_parse_boundaries_rejects_non_collections() {
        assert!(parse_boundaries("{\"type\": \"Point\"}", REGION_PROPERTY).is_err());
        assert!(parse_boundaries("not json", REGION_PROPERTY).is_err());
    }

    #[test]
    fn test_fill_expression_shape() {
        let mut colors = BTreeMap::new();
        colors.insert(Borough::Bronx, Rgb(1, 2, 3));
        let expr = fill_expression(&colors);
        assert_eq!(
            expr,
            json!(["match", ["get", "BoroName"], "Bronx", "#010203", "#cccccc"])
        );
    }
}
