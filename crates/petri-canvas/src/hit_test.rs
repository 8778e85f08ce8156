use petri_core::snapshot::{AntibioticZone, Bacterium};

use crate::geometry::Point;
use crate::quadtree::Quadtree;
use crate::viewport::ViewTransform;

/// Result of a pointer hit test. Indices refer to the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Entity(usize),
    Zone(usize),
}

/// Bacterium under `pixel`, if any.
///
/// Candidates come from the index with the tolerance widened by the current
/// scale, then only those within `point_radius` layout pixels are kept. Ties
/// resolve to the lowest snapshot index.
pub fn hit_test_point(
    pixel: Point,
    transform: &ViewTransform,
    index: &Quadtree,
    bacteria: &[Bacterium],
    point_radius: f64,
    tolerance: f64,
) -> Option<usize> {
    if !pixel.is_finite() || !transform.view.has_area() {
        return None;
    }
    let layout = transform.screen_to_layout(pixel);
    let query = point_radius + tolerance / transform.view.scale;
    let limit = point_radius * point_radius;

    index
        .query_radius(layout, query)
        .into_iter()
        .filter(|item| item.index < bacteria.len())
        .filter(|item| item.position.distance_sq(layout) <= limit)
        .map(|item| item.index)
        .min()
}

/// First zone (in snapshot order) whose drawn disc contains `pixel`.
///
/// Tested in screen space against the same centre and radius the renderer
/// uses, so the clickable area is exactly the visible disc.
pub fn hit_test_zone(
    pixel: Point,
    transform: &ViewTransform,
    zones: &[AntibioticZone],
) -> Option<usize> {
    if !pixel.is_finite() || !transform.view.has_area() {
        return None;
    }
    zones.iter().position(|z| {
        transform
            .zone_disc(z)
            .is_some_and(|(center, r)| pixel.distance_sq(center) <= r * r)
    })
}

/// Point hits win over zone hits.
pub fn hit_test(
    pixel: Point,
    transform: &ViewTransform,
    index: &Quadtree,
    bacteria: &[Bacterium],
    zones: &[AntibioticZone],
    point_radius: f64,
    tolerance: f64,
) -> Option<Hit> {
    hit_test_point(pixel, transform, index, bacteria, point_radius, tolerance)
        .map(Hit::Entity)
        .or_else(|| hit_test_zone(pixel, transform, zones).map(Hit::Zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::config::IndexConfig;
    use petri_core::interfaces::ViewportState;
    use petri_core::snapshot::{BacteriumStatus, Coordinate};

    fn transform() -> ViewTransform {
        ViewTransform::new((100.0, 100.0), ViewportState::new(800.0, 600.0), 20.0)
    }

    fn bacteria(points: &[(f64, f64)]) -> Vec<Bacterium> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Bacterium {
                id: format!("b{i}"),
                position: Coordinate::new(x, y),
                status: BacteriumStatus::Sensitive,
                fitness: 1.0,
                generation: 0,
            })
            .collect()
    }

    fn index(t: &ViewTransform, bacteria: &[Bacterium]) -> Quadtree {
        Quadtree::build(
            t.layout_bounds(),
            &IndexConfig::default(),
            bacteria
                .iter()
                .enumerate()
                .map(|(i, b)| (i, t.to_layout(b.position))),
        )
    }

    #[test]
    fn hit_at_entity_pixel_and_miss_nearby() {
        let t = transform();
        let b = bacteria(&[(50.0, 50.0)]);
        let idx = index(&t, &b);
        let p = t.to_pixel(Coordinate::new(50.0, 50.0));
        assert_eq!(hit_test_point(p, &t, &idx, &b, 3.0, 2.0), Some(0));
        let off = Point::new(p.x + 10.0, p.y + 10.0);
        assert_eq!(hit_test_point(off, &t, &idx, &b, 3.0, 2.0), None);
    }

    #[test]
    fn overlapping_entities_resolve_to_first_in_snapshot_order() {
        let t = transform();
        let b = bacteria(&[(40.0, 40.0), (40.1, 40.0), (40.0, 40.1)]);
        let idx = index(&t, &b);
        let p = t.to_pixel(Coordinate::new(40.05, 40.05));
        assert_eq!(hit_test_point(p, &t, &idx, &b, 3.0, 2.0), Some(0));
    }

    #[test]
    fn tolerance_does_not_widen_final_filter() {
        let t = transform();
        let b = bacteria(&[(50.0, 50.0)]);
        let idx = index(&t, &b);
        let p = t.to_pixel(Coordinate::new(50.0, 50.0));
        // 4 px away: inside the widened query, outside the point radius
        let near = Point::new(p.x + 4.0, p.y);
        assert_eq!(hit_test_point(near, &t, &idx, &b, 3.0, 2.0), None);
        let inside = Point::new(p.x + 2.9, p.y);
        assert_eq!(hit_test_point(inside, &t, &idx, &b, 3.0, 2.0), Some(0));
    }

    #[test]
    fn zone_scan_and_priority() {
        let t = transform();
        let b = bacteria(&[(20.0, 10.0)]);
        let idx = index(&t, &b);
        let zones = vec![AntibioticZone {
            id: "z".into(),
            center: Coordinate::new(20.0, 10.0),
            radius: 5.0,
            concentration: 0.8,
        }];
        let center = t.to_pixel(Coordinate::new(20.0, 10.0));
        assert_eq!(hit_test_zone(center, &t, &zones), Some(0));
        assert_eq!(
            hit_test(center, &t, &idx, &b, &zones, 3.0, 2.0),
            Some(Hit::Entity(0))
        );
        let ring = t.to_pixel(Coordinate::new(23.0, 10.0));
        assert_eq!(hit_test(ring, &t, &idx, &b, &zones, 3.0, 2.0), Some(Hit::Zone(0)));
        let outside = t.to_pixel(Coordinate::new(26.0, 10.0));
        assert_eq!(hit_test(outside, &t, &idx, &b, &zones, 3.0, 2.0), None);
    }

    #[test]
    fn zone_hit_area_matches_drawn_disc_on_both_axes() {
        // 7.6 px per unit along x, 5.6 along y; the disc is drawn 38 px wide
        let t = transform();
        let zones = vec![AntibioticZone {
            id: "z".into(),
            center: Coordinate::new(50.0, 50.0),
            radius: 5.0,
            concentration: 0.5,
        }];
        let (center, r) = t.zone_disc(&zones[0]).unwrap();
        assert!((r - 38.0).abs() < 1e-9);
        let below = Point::new(center.x, center.y + 34.2);
        assert_eq!(hit_test_zone(below, &t, &zones), Some(0));
        let right = Point::new(center.x + 34.2, center.y);
        assert_eq!(hit_test_zone(right, &t, &zones), Some(0));
        let past_rim = Point::new(center.x, center.y + 40.0);
        assert_eq!(hit_test_zone(past_rim, &t, &zones), None);
    }

    #[test]
    fn degenerate_zones_are_never_hit() {
        let t = transform();
        let zones = vec![AntibioticZone {
            id: "z".into(),
            center: Coordinate::new(50.0, 50.0),
            radius: f64::NAN,
            concentration: 0.5,
        }];
        let center = t.to_pixel(Coordinate::new(50.0, 50.0));
        assert_eq!(hit_test_zone(center, &t, &zones), None);
    }

    #[test]
    fn non_finite_pixel_misses() {
        let t = transform();
        let b = bacteria(&[(50.0, 50.0)]);
        let idx = index(&t, &b);
        assert_eq!(
            hit_test_point(Point::new(f64::NAN, 1.0), &t, &idx, &b, 3.0, 2.0),
            None
        );
    }
}
