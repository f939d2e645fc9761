use ratatui::style::Color;

use crate::models::{Model, BACKGROUND, GUIDE};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Point, Scene, Stroke, Viewport};

const SPRING_CONSTANT: ParamSpec = ParamSpec::new("springConstant", "Spring k", "N/m", 10.0);
const MASS: ParamSpec = ParamSpec::new("mass", "Mass", "kg", 1.0);
const AMPLITUDE: ParamSpec = ParamSpec::new("amplitude", "Amplitude", "m", 1.0);
const DAMPING: ParamSpec = ParamSpec::new("damping", "Damping", "1/s", 0.1);

pub const PARAMS: &[ParamSpec] = &[SPRING_CONSTANT, MASS, AMPLITUDE, DAMPING];

const COILS: usize = 12;
const COIL_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub spring_constant: f64,
    pub mass: f64,
    pub amplitude: f64,
    pub damping: f64,
}

impl SpringParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            spring_constant: set.resolve(&SPRING_CONSTANT),
            mass: set.resolve(&MASS),
            amplitude: set.resolve(&AMPLITUDE),
            damping: set.resolve(&DAMPING),
        }
    }

    pub fn angular_frequency(&self) -> f64 {
        (self.spring_constant / self.mass).sqrt()
    }

    /// A·exp(−damping·t)
    pub fn envelope(&self, t: f64) -> f64 {
        self.amplitude * (-self.damping * t).exp()
    }

    /// x(t) = A·cos(t·√(k/m))·exp(−damping·t)
    pub fn displacement(&self, t: f64) -> f64 {
        (t * self.angular_frequency()).cos() * self.envelope(t)
    }
}

struct Layout {
    wall_x: f64,
    equilibrium_x: f64,
    mid_y: f64,
    scale: f64,
}

impl Layout {
    fn new(viewport: Viewport) -> Self {
        Self {
            wall_x: viewport.width * 0.08,
            equilibrium_x: viewport.width * 0.55,
            mid_y: viewport.height / 2.0,
            scale: viewport.width * 0.3 / AMPLITUDE.range().1,
        }
    }
}

fn coil(from_x: f64, to_x: f64, y: f64) -> Vec<Point> {
    let segments = COILS * 2;
    let mut points = Vec::with_capacity(segments + 3);
    let lead = (to_x - from_x) * 0.08;
    points.push(Point::new(from_x, y));
    points.push(Point::new(from_x + lead, y));
    let span = (to_x - from_x) - 2.0 * lead;
    for i in 1..segments {
        let x = from_x + lead + span * i as f64 / segments as f64;
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        points.push(Point::new(x, y + side * COIL_WIDTH));
    }
    points.push(Point::new(to_x - lead, y));
    points.push(Point::new(to_x, y));
    points
}

pub struct Spring;

impl Model for Spring {
    type Params = SpringParams;

    fn params(set: &ParameterSet) -> SpringParams {
        SpringParams::from_set(set)
    }

    fn scene(params: &SpringParams, t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let layout = Layout::new(viewport);
        let wall = Color::Rgb(150, 150, 170);

        // Wall with hatching, and the floor
        scene.line(
            Point::new(layout.wall_x, layout.mid_y - 20.0),
            Point::new(layout.wall_x, layout.mid_y + 20.0),
            wall,
        );
        for i in 0..5 {
            let y = layout.mid_y - 20.0 + i as f64 * 10.0;
            scene.line(Point::new(layout.wall_x, y), Point::new(layout.wall_x - 5.0, y + 5.0), wall);
        }
        let half = 5.0 + 2.0 * params.mass.cbrt();
        scene.line(
            Point::new(layout.wall_x, layout.mid_y + half + 1.0),
            Point::new(viewport.width - 2.0, layout.mid_y + half + 1.0),
            wall,
        );

        // Equilibrium and the decaying envelope
        scene.dashed_line(
            Point::new(layout.equilibrium_x, layout.mid_y - 24.0),
            Point::new(layout.equilibrium_x, layout.mid_y + 24.0),
            GUIDE,
        );
        let reach = params.envelope(t) * layout.scale;
        for side in [-1.0, 1.0] {
            let x = layout.equilibrium_x + side * reach;
            scene.dashed_line(
                Point::new(x, layout.mid_y - 14.0),
                Point::new(x, layout.mid_y + 14.0),
                Color::Rgb(90, 120, 90),
            );
        }

        let mass_x = layout.equilibrium_x + params.displacement(t) * layout.scale;
        scene.polyline(coil(layout.wall_x, mass_x - half, layout.mid_y), Color::Rgb(200, 200, 210), Stroke::Solid);
        scene.polygon(
            vec![
                Point::new(mass_x - half, layout.mid_y - half),
                Point::new(mass_x + half, layout.mid_y - half),
                Point::new(mass_x + half, layout.mid_y + half),
                Point::new(mass_x - half, layout.mid_y + half),
            ],
            Color::Rgb(120, 230, 140),
        );
        scene
    }
}
