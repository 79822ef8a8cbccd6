//! Terrain: a planar ground surface with voids and obstructions.

use seeker_core::config::{DiscSpec, ObstacleSpec, TerrainConfig};

/// An obstruction standing on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Cylinder {
        x: f64,
        y: f64,
        radius: f64,
        height: f64,
    },
    Cuboid {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        height: f64,
    },
}

impl Obstacle {
    /// Whether the footprint covers the horizontal point.
    pub fn covers(&self, x: f64, y: f64) -> bool {
        match *self {
            Obstacle::Cylinder {
                x: cx,
                y: cy,
                radius,
                ..
            } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= radius * radius
            }
            Obstacle::Cuboid {
                min_x,
                min_y,
                max_x,
                max_y,
                ..
            } => x >= min_x && x <= max_x && y >= min_y && y <= max_y,
        }
    }

    /// Height above local ground.
    pub fn height(&self) -> f64 {
        match *self {
            Obstacle::Cylinder { height, .. } | Obstacle::Cuboid { height, .. } => height,
        }
    }

    /// Footprint anchor used to place the obstacle on the ground plane.
    fn anchor(&self) -> (f64, f64) {
        match *self {
            Obstacle::Cylinder { x, y, .. } => (x, y),
            Obstacle::Cuboid {
                min_x,
                min_y,
                max_x,
                max_y,
                ..
            } => ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
        }
    }
}

impl From<ObstacleSpec> for Obstacle {
    fn from(spec: ObstacleSpec) -> Self {
        match spec {
            ObstacleSpec::Cylinder {
                x,
                y,
                radius,
                height,
            } => Obstacle::Cylinder {
                x,
                y,
                radius,
                height,
            },
            ObstacleSpec::Cuboid {
                min_x,
                min_y,
                max_x,
                max_y,
                height,
            } => Obstacle::Cuboid {
                min_x,
                min_y,
                max_x,
                max_y,
                height,
            },
        }
    }
}

/// Planar ground `z = base + slope_x * x + slope_y * y` with holes and obstructions.
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    base_height: f64,
    slope_x: f64,
    slope_y: f64,
    voids: Vec<DiscSpec>,
    obstacles: Vec<Obstacle>,
}

impl Terrain {
    /// Flat ground at the given height.
    pub fn flat(height: f64) -> Self {
        Self {
            base_height: height,
            ..Self::default()
        }
    }

    pub fn from_config(config: &TerrainConfig) -> Self {
        Self {
            base_height: config.ground_height,
            slope_x: config.slope_x,
            slope_y: config.slope_y,
            voids: config.voids.clone(),
            obstacles: config.obstacles.iter().copied().map(Obstacle::from).collect(),
        }
    }

    pub fn with_slope(mut self, slope_x: f64, slope_y: f64) -> Self {
        self.slope_x = slope_x;
        self.slope_y = slope_y;
        self
    }

    /// Remove the ground inside a disc.
    pub fn with_void(mut self, x: f64, y: f64, radius: f64) -> Self {
        self.voids.push(DiscSpec { x, y, radius });
        self
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Height of the ground plane, ignoring voids.
    fn plane_height(&self, x: f64, y: f64) -> f64 {
        self.base_height + self.slope_x * x + self.slope_y * y
    }

    /// Ground height at a horizontal point. `None` inside a void.
    pub fn ground_height_at(&self, x: f64, y: f64) -> Option<f64> {
        let in_void = self.voids.iter().any(|v| {
            let dx = x - v.x;
            let dy = y - v.y;
            dx * dx + dy * dy <= v.radius * v.radius
        });
        if in_void {
            None
        } else {
            Some(self.plane_height(x, y))
        }
    }

    /// Top surface heights of all obstructions covering a horizontal point.
    pub fn obstacle_tops_at(&self, x: f64, y: f64) -> impl Iterator<Item = f64> + '_ {
        self.obstacles
            .iter()
            .filter(move |o| o.covers(x, y))
            .map(|o| {
                let (ax, ay) = o.anchor();
                self.plane_height(ax, ay) + o.height()
            })
    }
}
