//! Downward ray probes.
//!
//! A probe returns the first surface along a vertical ray pointing down.
//! Absence of a hit is a valid outcome (void, or out of range).

use seeker_core::types::Position;

use crate::ground::Terrain;

/// Classification of a probe hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Ground,
    Obstruction,
}

/// Which surfaces a probe reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFilter {
    /// Report the first surface of any kind.
    Any,
    /// See through obstructions; report ground only.
    GroundOnly,
}

/// First surface hit along a downward ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Position,
    pub kind: SurfaceKind,
    /// Distance travelled from the ray origin (m).
    pub distance: f64,
}

/// Ray/volume query interface used by sensors and landing controllers.
pub trait GroundProbe {
    /// Cast a ray straight down from `origin` for at most `max_distance` meters.
    fn cast_down(&self, origin: &Position, max_distance: f64, filter: ProbeFilter)
        -> Option<RayHit>;
}

impl GroundProbe for Terrain {
    fn cast_down(
        &self,
        origin: &Position,
        max_distance: f64,
        filter: ProbeFilter,
    ) -> Option<RayHit> {
        let floor = origin.z - max_distance;
        let in_range = |z: f64| z <= origin.z && z >= floor;

        let mut best: Option<(f64, SurfaceKind)> = self
            .ground_height_at(origin.x, origin.y)
            .filter(|z| in_range(*z))
            .map(|z| (z, SurfaceKind::Ground));

        if filter == ProbeFilter::Any {
            for top in self.obstacle_tops_at(origin.x, origin.y) {
                if top > origin.z {
                    // Origin is inside the obstruction: blocked right away.
                    best = Some((origin.z, SurfaceKind::Obstruction));
                    break;
                }
                if !in_range(top) {
                    continue;
                }
                if best.map_or(true, |(z, _)| top > z) {
                    best = Some((top, SurfaceKind::Obstruction));
                }
            }
        }

        best.map(|(z, kind)| RayHit {
            point: origin.with_z(z),
            kind,
            distance: origin.z - z,
        })
    }
}

/// Ground height under a position, or `None` if no ground is found in range.
pub fn ground_height_below(probe: &dyn GroundProbe, origin: &Position, max_distance: f64) -> Option<f64> {
    probe
        .cast_down(origin, max_distance, ProbeFilter::GroundOnly)
        .map(|hit| hit.point.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::Obstacle;

    fn rooftop_terrain() -> Terrain {
        Terrain::flat(1.0)
            .with_obstacle(Obstacle::Cylinder {
                x: 5.0,
                y: 0.0,
                radius: 1.0,
                height: 4.0,
            })
            .with_void(-10.0, 0.0, 2.0)
    }

    #[test]
    fn test_hits_ground_on_open_terrain() {
        let terrain = rooftop_terrain();
        let hit = terrain
            .cast_down(&Position::new(0.0, 0.0, 10.0), 50.0, ProbeFilter::Any)
            .unwrap();
        assert_eq!(hit.kind, SurfaceKind::Ground);
        assert!((hit.point.z - 1.0).abs() < 1e-9);
        assert!((hit.distance - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_obstruction_hit_before_ground() {
        let terrain = rooftop_terrain();
        let hit = terrain
            .cast_down(&Position::new(5.2, 0.0, 10.0), 50.0, ProbeFilter::Any)
            .unwrap();
        assert_eq!(hit.kind, SurfaceKind::Obstruction);
        assert!((hit.point.z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ground_only_filter_sees_through_obstruction() {
        let terrain = rooftop_terrain();
        let hit = terrain
            .cast_down(&Position::new(5.2, 0.0, 10.0), 50.0, ProbeFilter::GroundOnly)
            .unwrap();
        assert_eq!(hit.kind, SurfaceKind::Ground);
        assert!((hit.point.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_starting_inside_obstruction_is_blocked() {
        let terrain = rooftop_terrain();
        let hit = terrain
            .cast_down(&Position::new(5.0, 0.0, 3.0), 50.0, ProbeFilter::Any)
            .unwrap();
        assert_eq!(hit.kind, SurfaceKind::Obstruction);
        assert_eq!(hit.point.z, 3.0);
        assert_eq!(hit.distance, 0.0);

        let ground = terrain
            .cast_down(&Position::new(5.0, 0.0, 3.0), 50.0, ProbeFilter::GroundOnly)
            .unwrap();
        assert_eq!(ground.kind, SurfaceKind::Ground);
    }

    #[test]
    fn test_void_and_range_produce_no_hit() {
        let terrain = rooftop_terrain();
        assert!(terrain
            .cast_down(&Position::new(-10.0, 0.5, 10.0), 50.0, ProbeFilter::Any)
            .is_none());
        assert!(terrain
            .cast_down(&Position::new(0.0, 0.0, 10.0), 5.0, ProbeFilter::Any)
            .is_none());
        assert!(terrain
            .cast_down(&Position::new(0.0, 0.0, 0.5), 5.0, ProbeFilter::Any)
            .is_none());
    }

    #[test]
    fn test_sloped_ground_height() {
        let terrain = Terrain::flat(0.0).with_slope(0.1, 0.0);
        let z = ground_height_below(&terrain, &Position::new(10.0, 3.0, 20.0), 100.0).unwrap();
        assert!((z - 1.0).abs() < 1e-9);
    }
}
