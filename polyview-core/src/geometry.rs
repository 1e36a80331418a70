/// Scene model: points, edges, surfaces, objects and the world space
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::EngineError;
use crate::transform::{Matrix, Transform};

/// Seed that gives a legible legend palette.
const COLOUR_SEED: u64 = 3;

/// An 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A numbered point in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Stable for the lifetime of the point, starting at 1.
    pub id: u32,
    pub colour: Rgb,
    pub position: Point3<f64>,
}

impl Point {
    /// The same point moved by `m`.
    pub fn transformed(&self, m: &Matrix) -> Self {
        Self {
            position: Transform::apply(m, &self.position),
            ..*self
        }
    }
}

/// Two point indices joined by a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge(pub usize, pub usize);

/// A closed, filled polygon given by point indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface(pub Vec<usize>);

/// Object geometry before it is placed into world space
#[derive(Debug, Clone)]
pub struct ObjectTemplate {
    pub colour: Rgb,
    pub points: Vec<Point3<f64>>,
    pub edges: Vec<Edge>,
    pub surfaces: Vec<Surface>,
}

impl ObjectTemplate {
    /// Four-sided pyramid on a triangular base
    pub fn tetrahedron() -> Self {
        Self {
            colour: Rgb::new(70, 130, 180),
            points: vec![
                Point3::new(0.0, 1.75, 1.0),
                Point3::new(1.5, -1.75, 1.0),
                Point3::new(-1.5, -1.75, 1.0),
                Point3::new(0.0, 0.0, 1.75),
            ],
            edges: vec![Edge(0, 1), Edge(0, 2), Edge(1, 2), Edge(0, 3), Edge(1, 3), Edge(2, 3)],
            surfaces: vec![
                Surface(vec![0, 1, 2]),
                Surface(vec![0, 1, 3]),
                Surface(vec![0, 2, 3]),
                Surface(vec![1, 2, 3]),
            ],
        }
    }

    /// Flat triangle
    pub fn triangle() -> Self {
        Self {
            colour: Rgb::new(205, 92, 92),
            points: vec![
                Point3::new(1.5, 1.5, -1.0),
                Point3::new(1.5, -1.5, -1.0),
                Point3::new(-1.5, -1.5, -1.0),
            ],
            edges: vec![Edge(0, 1), Edge(1, 2), Edge(2, 0)],
            surfaces: vec![Surface(vec![0, 1, 2])],
        }
    }

    /// Pyramid on a rectangular base
    pub fn square_pyramid() -> Self {
        Self {
            colour: Rgb::new(60, 179, 113),
            points: vec![
                Point3::new(2.0, -2.0, 1.0),
                Point3::new(2.0, -4.0, 1.0),
                Point3::new(-2.0, -4.0, 1.0),
                Point3::new(-2.0, -2.0, 1.0),
                Point3::new(0.0, -3.0, 2.5),
            ],
            edges: vec![
                Edge(0, 1),
                Edge(1, 2),
                Edge(2, 3),
                Edge(3, 0),
                Edge(0, 4),
                Edge(1, 4),
                Edge(2, 4),
                Edge(3, 4),
            ],
            surfaces: vec![
                Surface(vec![0, 1, 2, 3]),
                Surface(vec![0, 1, 4]),
                Surface(vec![1, 2, 4]),
                Surface(vec![2, 3, 4]),
                Surface(vec![3, 0, 4]),
            ],
        }
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        Self {
            colour: Rgb::new(218, 165, 32),
            points: vec![
                Point3::new(-half, -half, -half),
                Point3::new(half, -half, -half),
                Point3::new(half, half, -half),
                Point3::new(-half, half, -half),
                Point3::new(-half, -half, half),
                Point3::new(half, -half, half),
                Point3::new(half, half, half),
                Point3::new(-half, half, half),
            ],
            edges: vec![
                Edge(0, 1),
                Edge(1, 2),
                Edge(2, 3),
                Edge(3, 0),
                Edge(4, 5),
                Edge(5, 6),
                Edge(6, 7),
                Edge(7, 4),
                Edge(0, 4),
                Edge(1, 5),
                Edge(2, 6),
                Edge(3, 7),
            ],
            surfaces: vec![
                Surface(vec![0, 1, 2, 3]),
                Surface(vec![5, 4, 7, 6]),
                Surface(vec![4, 0, 3, 7]),
                Surface(vec![1, 5, 6, 2]),
                Surface(vec![4, 5, 1, 0]),
                Surface(vec![3, 2, 6, 7]),
            ],
        }
    }

    pub fn with_colour(mut self, colour: Rgb) -> Self {
        self.colour = colour;
        self
    }

    /// Check that the template can become an object called `name`.
    pub fn validate(&self, name: &str) -> Result<(), EngineError> {
        let count = self.points.len();
        if count == 0 {
            return Err(EngineError::EmptyObject(name.to_string()));
        }

        let out_of_range = |index: usize| EngineError::PointIndexOutOfRange {
            name: name.to_string(),
            index,
            count,
        };
        for &Edge(a, b) in &self.edges {
            if let Some(&index) = [a, b].iter().find(|&&i| i >= count) {
                return Err(out_of_range(index));
            }
        }
        for (surface, Surface(indices)) in self.surfaces.iter().enumerate() {
            if indices.len() < 3 {
                return Err(EngineError::DegenerateSurface {
                    name: name.to_string(),
                    surface,
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= count) {
                return Err(out_of_range(index));
            }
        }
        Ok(())
    }
}

/// A rigid object placed in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub colour: Rgb,
    pub points: Vec<Point>,
    pub edges: Vec<Edge>,
    pub surfaces: Vec<Surface>,
    /// Average of the imported points, moved along with them.
    pub centroid: Point,
}

impl Object {
    /// Move every point and the centroid by `m`.
    pub fn transform(&mut self, m: &Matrix) {
        self.points = self.points.iter().map(|p| p.transformed(m)).collect();
        self.centroid = self.centroid.transformed(m);
    }
}

/// Named collection of every object subject to the shared transforms
#[derive(Debug, Clone)]
pub struct WorldSpace {
    objects: HashMap<String, Object>,
    next_point_id: u32,
    palette: StdRng,
}

impl WorldSpace {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_point_id: 1,
            palette: StdRng::seed_from_u64(COLOUR_SEED),
        }
    }

    /// Place a copy of `template` into the world, translated by `offset`.
    ///
    /// Points are numbered from a counter shared by the whole world and get
    /// a legend colour. The centroid is the mean of the translated points.
    pub fn import(
        &mut self,
        name: &str,
        template: &ObjectTemplate,
        offset: Vector3<f64>,
    ) -> Result<(), EngineError> {
        if self.objects.contains_key(name) {
            return Err(EngineError::DuplicateName(name.to_string()));
        }
        template.validate(name)?;

        let placement = Transform::translate(offset.x, offset.y, offset.z);
        let mut points = Vec::with_capacity(template.points.len());
        for position in &template.points {
            let colour = Rgb::new(
                self.palette.random_range(0..255),
                self.palette.random_range(0..255),
                self.palette.random_range(0..255),
            );
            points.push(Point {
                id: self.next_point_id,
                colour,
                position: Transform::apply(&placement, position),
            });
            self.next_point_id += 1;
        }

        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.position.coords);
        let centroid = Point {
            id: 0,
            colour: template.colour,
            position: Point3::from(sum / points.len() as f64),
        };

        log::debug!("imported `{}` with {} points", name, points.len());
        self.objects.insert(
            name.to_string(),
            Object {
                colour: template.colour,
                points,
                edges: template.edges.clone(),
                surfaces: template.surfaces.clone(),
                centroid,
            },
        );
        Ok(())
    }

    /// Move every object by `m`.
    pub fn transform(&mut self, m: &Matrix) {
        for object in self.objects.values_mut() {
            object.transform(m);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.objects.iter().map(|(name, object)| (name.as_str(), object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for WorldSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(points: Vec<Point3<f64>>) -> ObjectTemplate {
        ObjectTemplate {
            colour: Rgb::new(0, 0, 0),
            points,
            edges: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    #[test]
    fn test_centroid_is_mean_of_points() {
        let mut world = WorldSpace::new();
        let points = vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(2.0, 3.0, 4.0),
            Point3::new(3.0, 4.0, 5.0),
        ];
        world.import("t", &template(points), Vector3::zeros()).unwrap();

        let centroid = world.get("t").unwrap().centroid.position;
        assert!((centroid - Point3::new(2.0, 3.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn test_import_translates_points_and_centroid() {
        let mut world = WorldSpace::new();
        world
            .import("tri", &ObjectTemplate::triangle(), Vector3::new(3.0, -3.0, 1.0))
            .unwrap();

        let object = world.get("tri").unwrap();
        assert_eq!(object.points[0].position, Point3::new(4.5, -1.5, 0.0));
        assert!((object.centroid.position - Point3::new(3.5, -3.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_point_ids_are_shared_across_objects() {
        let mut world = WorldSpace::new();
        world
            .import("a", &ObjectTemplate::tetrahedron(), Vector3::zeros())
            .unwrap();
        world
            .import("b", &ObjectTemplate::triangle(), Vector3::zeros())
            .unwrap();

        let a: Vec<u32> = world.get("a").unwrap().points.iter().map(|p| p.id).collect();
        let b: Vec<u32> = world.get("b").unwrap().points.iter().map(|p| p.id).collect();
        assert_eq!(a, vec![1, 2, 3, 4]);
        assert_eq!(b, vec![5, 6, 7]);
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let mut world = WorldSpace::new();
        let result = world.import("empty", &template(Vec::new()), Vector3::zeros());
        assert_eq!(result, Err(EngineError::EmptyObject("empty".to_string())));
        assert!(world.is_empty());
    }

    #[test]
    fn test_bad_indices_are_rejected() {
        let mut bad_edge = ObjectTemplate::triangle();
        bad_edge.edges.push(Edge(0, 3));
        assert_eq!(
            bad_edge.validate("x"),
            Err(EngineError::PointIndexOutOfRange {
                name: "x".to_string(),
                index: 3,
                count: 3
            })
        );

        let mut flat = ObjectTemplate::triangle();
        flat.surfaces.push(Surface(vec![0, 1]));
        assert_eq!(
            flat.validate("x"),
            Err(EngineError::DegenerateSurface {
                name: "x".to_string(),
                surface: 1
            })
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut world = WorldSpace::new();
        let cube = ObjectTemplate::cube(2.0);
        world.import("cube", &cube, Vector3::zeros()).unwrap();
        assert_eq!(
            world.import("cube", &cube, Vector3::zeros()),
            Err(EngineError::DuplicateName("cube".to_string()))
        );
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_transform_keeps_ids_and_colours() {
        let mut world = WorldSpace::new();
        world
            .import("a", &ObjectTemplate::square_pyramid(), Vector3::zeros())
            .unwrap();
        let before = world.get("a").unwrap().clone();

        world.transform(&Transform::translate(1.0, 0.0, 0.0));

        let after = world.get("a").unwrap();
        assert_eq!(after.points.len(), before.points.len());
        for (old, new) in before.points.iter().zip(&after.points) {
            assert_eq!(old.id, new.id);
            assert_eq!(old.colour, new.colour);
            assert_eq!(new.position.x, old.position.x + 1.0);
        }
        assert_eq!(after.centroid.position.x, before.centroid.position.x + 1.0);
    }

    #[test]
    fn test_builtin_templates_are_valid() {
        for template in [
            ObjectTemplate::tetrahedron(),
            ObjectTemplate::triangle(),
            ObjectTemplate::square_pyramid(),
            ObjectTemplate::cube(1.0),
        ] {
            assert!(template.validate("builtin").is_ok());
        }
    }
}
