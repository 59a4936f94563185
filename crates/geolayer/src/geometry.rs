//! Vector geometry that can be rasterized by a [`GeometryLayer`](crate::GeometryLayer).

use geo_types::{Coord, Geometry, Polygon};

#[cfg(feature = "geopackage")]
mod geopackage;

/// A geometry together with its bounding envelope.
///
/// The envelope uses the GeoPackage order: `[min x, max x, min y, max y]`, optionally followed by z/m ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopedGeometry {
    pub envelope: Vec<f64>,
    pub geometry: Geometry<f64>,
}

impl EnvelopedGeometry {
    /// Computes the envelope from the coordinates of `geometry`, the envelope is empty for a geometry without coordinates.
    pub fn new(geometry: Geometry<f64>) -> Self {
        let mut bounds: Option<[f64; 4]> = None;
        visit_coords(&geometry, &mut |coord| {
            let env = bounds.get_or_insert([coord.x, coord.x, coord.y, coord.y]);
            env[0] = env[0].min(coord.x);
            env[1] = env[1].max(coord.x);
            env[2] = env[2].min(coord.y);
            env[3] = env[3].max(coord.y);
        });

        EnvelopedGeometry {
            envelope: bounds.map(Vec::from).unwrap_or_default(),
            geometry,
        }
    }

    pub fn with_envelope(geometry: Geometry<f64>, envelope: Vec<f64>) -> Self {
        EnvelopedGeometry { envelope, geometry }
    }

    /// Short name of the geometry type, used in error messages
    pub fn type_name(&self) -> &'static str {
        geometry_type_name(&self.geometry)
    }
}

pub(crate) fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

fn visit_polygon_coords(polygon: &Polygon<f64>, visit: &mut impl FnMut(Coord<f64>)) {
    polygon.exterior().coords().copied().for_each(&mut *visit);
    for interior in polygon.interiors() {
        interior.coords().copied().for_each(&mut *visit);
    }
}

fn visit_coords(geometry: &Geometry<f64>, visit: &mut impl FnMut(Coord<f64>)) {
    match geometry {
        Geometry::Point(point) => visit(point.0),
        Geometry::Line(line) => {
            visit(line.start);
            visit(line.end);
        }
        Geometry::LineString(line) => line.coords().copied().for_each(visit),
        Geometry::Polygon(polygon) => visit_polygon_coords(polygon, visit),
        Geometry::MultiPoint(points) => points.iter().for_each(|point| visit(point.0)),
        Geometry::MultiLineString(lines) => lines.iter().flat_map(|line| line.coords()).copied().for_each(visit),
        Geometry::MultiPolygon(polygons) => polygons.iter().for_each(|polygon| visit_polygon_coords(polygon, visit)),
        Geometry::GeometryCollection(collection) => collection.iter().for_each(|geometry| visit_coords(geometry, visit)),
        Geometry::Rect(rect) => {
            visit(rect.min());
            visit(rect.max());
        }
        Geometry::Triangle(triangle) => triangle.to_array().into_iter().for_each(visit),
    }
}
