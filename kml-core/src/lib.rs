//! Geo-referenced KML export for traverse polygons.
//!
//! The drawing plane is local and unit-less beyond "meters from the first
//! vertex"; to export something Google Earth, QGIS or AutoCAD Map can open,
//! the surveyor supplies the geodetic coordinate of that first vertex and
//! the remaining vertices are walked out with a small-area equirectangular
//! approximation. Good for parcel-sized extents away from the poles, not
//! for anything measured in tens of kilometers.

use traverse_core::Segment;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEG: f64 = 111_320.0;

/// Geodetic vertex in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoVertex {
    pub lat: f64,
    pub lng: f64,
}

/// Whether a user-supplied origin is a usable geodetic coordinate.
pub fn origin_in_range(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Walk the traverse out from a geo-referenced origin vertex.
///
/// Each segment advances by its northing/easting split, scaling the
/// longitude step by the cosine of the *previous* vertex's latitude.
/// Returns `None` when the origin is out of range; otherwise one vertex
/// per segment plus the origin itself.
pub fn project(segments: &[Segment], origin_lat: f64, origin_lng: f64) -> Option<Vec<GeoVertex>> {
    if !origin_in_range(origin_lat, origin_lng) {
        return None;
    }
    let mut vertices = Vec::with_capacity(segments.len() + 1);
    vertices.push(GeoVertex {
        lat: origin_lat,
        lng: origin_lng,
    });
    for seg in segments {
        let az = seg.azimuth_rad();
        let northing = seg.distance * az.cos();
        let easting = seg.distance * az.sin();
        let prev: GeoVertex = vertices[vertices.len() - 1];
        vertices.push(GeoVertex {
            lat: prev.lat + northing / METERS_PER_DEG,
            lng: prev.lng + easting / (METERS_PER_DEG * prev.lat.to_radians().cos()),
        });
    }
    Some(vertices)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a KML 2.2 polygon document.
///
/// The `LinearRing` repeats the first vertex at the end because KML insists
/// on an explicitly closed ring, even when the source traverse was open.
/// Free text is XML-escaped; coordinates are `lng,lat,0` at 8 decimals.
pub fn build_kml(name: &str, description: Option<&str>, vertices: &[GeoVertex]) -> String {
    let mut coords = String::new();
    for v in vertices {
        coords.push_str(&format!("              {:.8},{:.8},0\n", v.lng, v.lat));
    }
    if let Some(first) = vertices.first() {
        coords.push_str(&format!(
            "              {:.8},{:.8},0",
            first.lng, first.lat
        ));
    }
    let description_el = match description {
        Some(d) if !d.is_empty() => format!("<description>{}</description>\n      ", escape_xml(d)),
        _ => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>{name}</name>
    <Style id="landStyle">
      <LineStyle>
        <color>ff228b3d</color>
        <width>2</width>
      </LineStyle>
      <PolyStyle>
        <color>2622c55e</color>
      </PolyStyle>
    </Style>
    <Placemark>
      <name>{name}</name>
      {description_el}<styleUrl>#landStyle</styleUrl>
      <Polygon>
        <extrude>0</extrude>
        <altitudeMode>clampToGround</altitudeMode>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
{coords}
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#,
        name = escape_xml(name),
        description_el = description_el,
        coords = coords,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use traverse_core::{CardinalDirection, Segment};

    fn seg(from: CardinalDirection, to: CardinalDirection, deg: u32, dist: f64) -> Segment {
        let mut s = Segment::new("t".into());
        s.from = from;
        s.to = to;
        s.degrees = deg;
        s.distance = dist;
        s
    }

    #[test]
    fn rejects_out_of_range_origins() {
        assert!(project(&[], 91.0, 0.0).is_none());
        assert!(project(&[], -91.0, 0.0).is_none());
        assert!(project(&[], 0.0, 181.0).is_none());
        assert!(project(&[], 0.0, -181.0).is_none());
        assert!(project(&[], f64::NAN, 0.0).is_none());
        assert!(origin_in_range(-23.550520, -46.633308));
    }

    #[test]
    fn empty_traverse_projects_to_the_origin_alone() {
        let v = project(&[], -23.5, -46.6).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0], GeoVertex { lat: -23.5, lng: -46.6 });
    }

    #[test]
    fn northward_segment_moves_latitude_only() {
        use CardinalDirection::*;
        let v = project(&[seg(N, N, 0, 1113.20)], 10.0, 20.0).unwrap();
        assert!((v[1].lat - 10.01).abs() < 1e-9);
        assert!((v[1].lng - 20.0).abs() < 1e-9);
    }

    #[test]
    fn eastward_step_scales_with_previous_latitude() {
        use CardinalDirection::*;
        let at_equator = project(&[seg(E, E, 0, 1000.0)], 0.0, 0.0).unwrap();
        let at_60n = project(&[seg(E, E, 0, 1000.0)], 60.0, 0.0).unwrap();
        let d_eq = at_equator[1].lng;
        let d_60 = at_60n[1].lng;
        // cos(60°) = 0.5, so the same easting covers twice the longitude.
        assert!((d_60 / d_eq - 2.0).abs() < 1e-9);
    }

    #[test]
    fn kml_ring_repeats_the_first_vertex() {
        let vertices = [
            GeoVertex { lat: -23.5, lng: -46.6 },
            GeoVertex { lat: -23.4, lng: -46.6 },
            GeoVertex { lat: -23.4, lng: -46.5 },
        ];
        let kml = build_kml("Gleba 7", None, &vertices);
        let coords: Vec<&str> = kml
            .split("<coordinates>")
            .nth(1)
            .unwrap()
            .split("</coordinates>")
            .next()
            .unwrap()
            .split_whitespace()
            .collect();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords.first(), coords.last());
        assert_eq!(coords[0], "-46.60000000,-23.50000000,0");
    }

    #[test]
    fn kml_escapes_free_text() {
        let v = [GeoVertex { lat: 0.0, lng: 0.0 }];
        let kml = build_kml("Sítio \"A & B\" <novo>", Some("area > 2ha"), &v);
        assert!(kml.contains("Sítio &quot;A &amp; B&quot; &lt;novo&gt;"));
        assert!(kml.contains("<description>area &gt; 2ha</description>"));
        assert!(!kml.contains("\"A & B\""));
    }

    #[test]
    fn kml_skips_empty_description() {
        let v = [GeoVertex { lat: 0.0, lng: 0.0 }];
        assert!(!build_kml("x", None, &v).contains("<description>"));
        assert!(!build_kml("x", Some(""), &v).contains("<description>"));
    }

    #[test]
    fn kml_is_valid_2_2_scaffolding() {
        let v = [GeoVertex { lat: 1.0, lng: 2.0 }];
        let kml = build_kml("x", None, &v);
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
        for tag in ["Document", "Placemark", "Polygon", "outerBoundaryIs", "LinearRing"] {
            assert!(kml.contains(&format!("<{tag}>")), "missing <{tag}>");
            assert!(kml.contains(&format!("</{tag}>")), "missing </{tag}>");
        }
    }
}
