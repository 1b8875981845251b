//! Boundary topology decoding
//!
//! Country boundaries ship as a shared-arc topology (TopoJSON): every border
//! segment is stored once in a global `arcs` table and polygons reference arcs
//! by index, with `!i` (bitwise complement, i.e. `-i - 1`) meaning arc `i`
//! traversed backwards. Arcs may be quantized, in which case positions are
//! delta-encoded integers mapped through `transform`.

use crate::{DataError, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use std::collections::HashMap;

/// Name of the object collection holding the country features
pub const COUNTRIES_OBJECT: &str = "countries";

/// A named country outline in longitude/latitude degrees
#[derive(Debug, Clone)]
pub struct CountryFeature {
    /// Canonical name used for styling lookups
    pub name: String,
    /// Outline, one polygon per landmass
    pub geometry: MultiPolygon<f64>,
}

/// Parsed topology resource
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: serde_json::Value,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

impl Topology {
    /// Parse a topology from its JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        profiling::scope!("Topology::from_json");
        Ok(serde_json::from_str(text)?)
    }

    /// Names of the object collections in this topology, sorted
    pub fn object_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decode every polygonal feature of the named object collection.
    ///
    /// Geometries that are not polygons (including null geometries) are skipped.
    pub fn features(&self, object: &str) -> Result<Vec<CountryFeature>> {
        profiling::scope!("Topology::features");

        let root = self
            .objects
            .get(object)
            .ok_or_else(|| DataError::MissingObject {
                name: object.to_string(),
                available: self.object_names().join(", "),
            })?;

        let arcs = self.decode_arcs();
        let mut features = Vec::new();
        collect_features(root, &arcs, &mut features)?;

        tracing::debug!(
            "Decoded {} features from {} arcs in object {:?}",
            features.len(),
            arcs.len(),
            object
        );
        Ok(features)
    }

    /// Absolute arc positions, undoing quantization and delta encoding
    fn decode_arcs(&self) -> Vec<Vec<Coord<f64>>> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(Transform { scale, translate }) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|position| position.len() >= 2)
                        .map(|position| {
                            x += position[0];
                            y += position[1];
                            Coord {
                                x: x * scale[0] + translate[0],
                                y: y * scale[1] + translate[1],
                            }
                        })
                        .collect()
                }
                None => arc
                    .iter()
                    .filter(|position| position.len() >= 2)
                    .map(|position| Coord {
                        x: position[0],
                        y: position[1],
                    })
                    .collect(),
            })
            .collect()
    }
}

fn collect_features(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
    out: &mut Vec<CountryFeature>,
) -> Result<()> {
    let polygons = match geometry.kind.as_deref() {
        Some("GeometryCollection") => {
            for child in &geometry.geometries {
                collect_features(child, arcs, out)?;
            }
            return Ok(());
        }
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> = serde_json::from_value(geometry.arcs.clone())?;
            vec![polygon(&rings, arcs)?]
        }
        Some("MultiPolygon") => {
            let parts: Vec<Vec<Vec<i64>>> = serde_json::from_value(geometry.arcs.clone())?;
            parts
                .iter()
                .map(|rings| polygon(rings, arcs))
                .collect::<Result<Vec<_>>>()?
        }
        other => {
            tracing::trace!("Skipping non-polygonal geometry {:?}", other);
            return Ok(());
        }
    };

    let name = geometry
        .properties
        .as_ref()
        .and_then(|properties| properties.name.clone())
        .unwrap_or_default();

    out.push(CountryFeature {
        name,
        geometry: MultiPolygon::new(polygons),
    });
    Ok(())
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|indices| ring(indices, arcs));
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Stitch arcs into one ring; consecutive arcs share their junction point
fn ring(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>> {
    let mut points: Vec<Coord<f64>> = Vec::new();

    for &index in indices {
        let (arc_index, reversed) = if index >= 0 {
            (index as usize, false)
        } else {
            ((!index) as usize, true)
        };
        let arc = arcs.get(arc_index).ok_or(DataError::InvalidArc {
            index,
            count: arcs.len(),
        })?;

        if !points.is_empty() {
            points.pop();
        }
        if reversed {
            points.extend(arc.iter().rev());
        } else {
            points.extend(arc.iter());
        }
    }

    Ok(LineString::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    const QUANTIZED: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.5, 0.5], "translate": [10.0, 20.0]},
        "arcs": [[[0, 0], [20, 0], [0, 20], [-20, 0], [0, -20]]],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0]], "id": "380", "properties": {"name": "Italy"}},
                    {"type": null, "properties": {"name": "Nowhere"}}
                ]
            }
        }
    }"#;

    const SHARED: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[0, 0], [10, 0], [10, 10]],
            [[0, 0], [0, 10], [10, 10]],
            [[20, 0], [30, 0], [30, 10], [20, 0]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, -2]], "properties": {"name": "Square"}},
                    {"type": "MultiPolygon", "arcs": [[[0, -2]], [[2]]]},
                    {"type": "Polygon", "arcs": [[7]], "properties": {"name": "Broken"}}
                ]
            }
        }
    }"#;

    #[test]
    fn test_quantized_arcs_are_delta_decoded() {
        let topology = Topology::from_json(QUANTIZED).unwrap();
        let features = topology.features(COUNTRIES_OBJECT).unwrap();

        // The null geometry is skipped
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Italy");

        let exterior = features[0].geometry.0[0].exterior();
        let first = exterior.0[0];
        assert!((first.x - 10.0).abs() < 1e-9);
        assert!((first.y - 20.0).abs() < 1e-9);
        let second = exterior.0[1];
        assert!((second.x - 20.0).abs() < 1e-9);
        assert!((second.y - 20.0).abs() < 1e-9);
        assert!((features[0].geometry.unsigned_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_arcs_share_junctions() {
        let topology = Topology::from_json(SHARED).unwrap();
        let result = topology.features(COUNTRIES_OBJECT);
        // The third geometry references a missing arc
        assert!(matches!(
            result,
            Err(DataError::InvalidArc { index: 7, count: 3 })
        ));

        let arcs = topology.decode_arcs();
        let square = ring(&[0, -2], &arcs).unwrap();
        assert_eq!(square.0.len(), 5);
        assert_eq!(square.0.first(), square.0.last());
        let polygon = Polygon::new(square, vec![]);
        assert!((polygon.unsigned_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_multipolygon_without_name() {
        let json = SHARED.replace(r#"[[7]]"#, r#"[[2]]"#);
        let topology = Topology::from_json(&json).unwrap();
        let features = topology.features(COUNTRIES_OBJECT).unwrap();

        assert_eq!(features.len(), 3);
        assert_eq!(features[1].name, "");
        assert_eq!(features[1].geometry.0.len(), 2);
        assert!((features[1].geometry.unsigned_area() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_object() {
        let topology = Topology::from_json(QUANTIZED).unwrap();
        let err = topology.features("land").unwrap_err();
        assert!(matches!(
            &err,
            DataError::MissingObject { name, available } if name == "land" && available == "countries"
        ));
        assert!(err.to_string().contains("countries"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Topology::from_json("{\"arcs\": 3}"),
            Err(DataError::Json(_))
        ));
    }
}
