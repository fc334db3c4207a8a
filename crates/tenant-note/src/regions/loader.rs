//! GeoJSON region import.
//!
//! Features carry `adm_cd`, `adm_nm`, and `grade` properties with Polygon or
//! MultiPolygon geometry in `[lng, lat]` order. Only the first outer ring is
//! kept. Malformed features degrade rather than fail the whole load.

use serde::Deserialize;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::domain::{AdminCode, Region};
use crate::listings::domain::Coordinates;
use crate::listings::scoring::Grade;

const FALLBACK_ADMIN_CODE: &str = "0";
const FALLBACK_GRADE: Grade = Grade::C;

#[derive(Debug, Error)]
pub enum RegionLoadError {
    #[error("failed to read region data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("region data is not a valid GeoJSON feature collection: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    adm_cd: Option<Value>,
    #[serde(default)]
    adm_nm: Option<String>,
    #[serde(default)]
    grade: Option<String>,
}

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    fn outer_ring(&self) -> Option<&Ring> {
        match self {
            Self::Polygon { coordinates } => coordinates.first(),
            Self::MultiPolygon { coordinates } => {
                coordinates.first().and_then(|polygon| polygon.first())
            }
            Self::Unsupported => None,
        }
    }
}

/// Parse a GeoJSON document held in memory.
pub fn parse_regions(json: &str) -> Result<Vec<Region>, RegionLoadError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    Ok(collect_regions(collection))
}

pub fn read_regions<R: io::Read>(reader: R) -> Result<Vec<Region>, RegionLoadError> {
    let collection: FeatureCollection = serde_json::from_reader(reader)?;
    Ok(collect_regions(collection))
}

/// Read region geometry from disk without blocking the runtime.
pub async fn fetch_regions(path: impl AsRef<Path>) -> Result<Vec<Region>, RegionLoadError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RegionLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let collection: FeatureCollection = serde_json::from_slice(&bytes)?;
    let regions = collect_regions(collection);
    info!(path = %path.display(), regions = regions.len(), "region geometry loaded");
    Ok(regions)
}

fn collect_regions(collection: FeatureCollection) -> Vec<Region> {
    collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| region_from_feature(index, feature))
        .collect()
}

fn region_from_feature(index: usize, feature: Feature) -> Option<Region> {
    let properties = feature.properties.unwrap_or_default();
    let admin_code = admin_code(properties.adm_cd.as_ref());

    let Some(ring) = feature.geometry.as_ref().and_then(Geometry::outer_ring) else {
        warn!(index, admin_code = %admin_code, "skipping feature without polygon geometry");
        return None;
    };

    let polygon: Vec<Coordinates> = ring
        .iter()
        .filter_map(|position| match position.as_slice() {
            [lng, lat, ..] => Some(Coordinates::new(*lat, *lng)),
            _ => None,
        })
        .collect();

    let base_grade = match properties.grade.as_deref().map(str::trim) {
        Some(letter) => Grade::from_letter(letter).unwrap_or_else(|| {
            warn!(admin_code = %admin_code, grade = letter, "unknown region grade, using C");
            FALLBACK_GRADE
        }),
        None => FALLBACK_GRADE,
    };

    Some(Region::new(
        admin_code,
        properties.adm_nm.unwrap_or_default(),
        base_grade,
        polygon,
    ))
}

fn admin_code(raw: Option<&Value>) -> AdminCode {
    match raw {
        Some(Value::String(code)) if !code.trim().is_empty() => AdminCode::new(code.trim()),
        Some(Value::Number(code)) => AdminCode::new(code.to_string()),
        _ => AdminCode::from(FALLBACK_ADMIN_CODE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"adm_cd": "11210640", "adm_nm": "Seorim-dong", "grade": "B"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[126.93, 37.47], [126.94, 37.47], [126.94, 37.48], [126.93, 37.47]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"adm_cd": 11210650, "adm_nm": "Sinsa-dong", "grade": "Z"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[126.95, 37.46, 12.0], [126.96, 37.46], [126.96, 37.47]]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"adm_nm": "Nameless"},
                "geometry": {"type": "Polygon", "coordinates": [[[126.90, 37.50], [126.91, 37.50]]]}
            },
            {
                "type": "Feature",
                "properties": {"adm_cd": "11210670"},
                "geometry": {"type": "Point", "coordinates": [126.9, 37.5]}
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_in_lng_lat_order() {
        let regions = parse_regions(SAMPLE).expect("sample parses");
        assert_eq!(regions.len(), 3);

        let first = &regions[0];
        assert_eq!(first.admin_code().as_str(), "11210640");
        assert_eq!(first.name(), "Seorim-dong");
        assert_eq!(first.base_grade(), Grade::B);
        assert_eq!(first.polygon()[1], Coordinates::new(37.47, 126.94));
    }

    #[test]
    fn degrades_missing_or_invalid_properties() {
        let regions = parse_regions(SAMPLE).expect("sample parses");

        let multi = &regions[1];
        assert_eq!(multi.admin_code().as_str(), "11210650");
        assert_eq!(multi.base_grade(), Grade::C);
        assert_eq!(multi.polygon()[0], Coordinates::new(37.46, 126.95));

        let nameless = &regions[2];
        assert_eq!(nameless.admin_code().as_str(), "0");
        assert_eq!(nameless.base_grade(), Grade::C);
    }

    #[test]
    fn rejects_non_json_input() {
        let err = parse_regions("not geojson").expect_err("invalid json rejected");
        assert!(matches!(err, RegionLoadError::Parse(_)));
    }

    #[test]
    fn reader_and_str_agree() {
        let from_reader = read_regions(SAMPLE.as_bytes()).expect("reader parses");
        assert_eq!(from_reader, parse_regions(SAMPLE).expect("str parses"));
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = fetch_regions("./definitely/not/here.json")
            .await
            .expect_err("missing file rejected");
        match err {
            RegionLoadError::Io { path, .. } => {
                assert!(path.ends_with("here.json"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
