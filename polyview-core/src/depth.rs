/// Back-to-front draw order (painter's algorithm)
use crate::geometry::WorldSpace;

/// One object's place in the draw order
#[derive(Debug, Clone, PartialEq)]
pub struct PaintEntry {
    pub name: String,
    /// Z of the transformed centroid
    pub depth: f64,
}

/// Every object in `world`, ordered by ascending centroid Z.
///
/// Objects further along negative Z come first so that nearer ones are
/// drawn over them. Equal depths fall back to the name, which keeps the
/// order independent of hash map iteration. This is a per-object
/// approximation and is only right for objects that do not interpenetrate.
pub fn paint_order(world: &WorldSpace) -> Vec<PaintEntry> {
    let mut order: Vec<PaintEntry> = world
        .iter()
        .map(|(name, object)| PaintEntry {
            name: name.to_string(),
            depth: object.centroid.position.z,
        })
        .collect();
    order.sort_by(|a, b| a.depth.total_cmp(&b.depth).then_with(|| a.name.cmp(&b.name)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ObjectTemplate;
    use crate::transform::Transform;
    use nalgebra::Vector3;
    use std::collections::HashSet;

    #[test]
    fn test_empty_world() {
        assert!(paint_order(&WorldSpace::new()).is_empty());
    }

    #[test]
    fn test_ascending_depth() {
        let mut world = WorldSpace::new();
        let cube = ObjectTemplate::cube(1.0);
        world.import("near", &cube, Vector3::new(0.0, 0.0, 5.0)).unwrap();
        world.import("far", &cube, Vector3::new(0.0, 0.0, -5.0)).unwrap();
        world.import("middle", &cube, Vector3::new(9.0, 9.0, 0.0)).unwrap();

        let names: Vec<String> = paint_order(&world).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["far", "middle", "near"]);
    }

    #[test]
    fn test_order_follows_transforms() {
        let mut world = WorldSpace::new();
        let cube = ObjectTemplate::cube(1.0);
        world.import("a", &cube, Vector3::new(0.0, 0.0, 1.0)).unwrap();
        world.import("b", &cube, Vector3::new(0.0, 0.0, -1.0)).unwrap();

        world.transform(&Transform::rotate_x(180.0));

        let order = paint_order(&world);
        assert_eq!(order[0].name, "a");
        assert!((order[0].depth + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_include_everything_once() {
        let mut world = WorldSpace::new();
        let triangle = ObjectTemplate::triangle();
        for i in 0..20 {
            let offset = Vector3::new(i as f64, 0.0, (i % 3) as f64);
            world.import(&format!("ob{i}"), &triangle, offset).unwrap();
        }

        let order = paint_order(&world);
        assert_eq!(order.len(), 20);
        let unique: HashSet<&str> = order.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(unique.len(), 20);
        assert!(order.windows(2).all(|w| w[0].depth <= w[1].depth));
        assert_eq!(order, paint_order(&world.clone()));
    }
}
