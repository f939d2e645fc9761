use std::f64::consts::TAU;

use ratatui::style::Color;

use crate::models::{Model, BACKGROUND, GUIDE};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Point, Scene, Stroke, Viewport};

const RADIUS: ParamSpec = ParamSpec::new("radius", "Radius", "AU", 1.0);
const VELOCITY: ParamSpec = ParamSpec::new("velocity", "Velocity", "AU/s", 1.0);
const CENTRAL_MASS: ParamSpec = ParamSpec::new("centralMass", "Central mass", "M☉", 1.0);

pub const PARAMS: &[ParamSpec] = &[RADIUS, VELOCITY, CENTRAL_MASS];

const PATH_SEGMENTS: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    pub radius: f64,
    pub velocity: f64,
    pub central_mass: f64,
}

impl OrbitParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            radius: set.resolve(&RADIUS),
            velocity: set.resolve(&VELOCITY),
            central_mass: set.resolve(&CENTRAL_MASS),
        }
    }

    pub fn angular_velocity(&self) -> f64 {
        self.velocity / self.radius
    }

    /// φ(t) = t·(v/r)
    pub fn angle_at(&self, t: f64) -> f64 {
        t * self.angular_velocity()
    }
}

fn pixels_per_unit(viewport: Viewport) -> f64 {
    viewport.min_side() * 0.45 / RADIUS.range().1
}

pub fn orbit_radius_px(params: &OrbitParams, viewport: Viewport) -> f64 {
    params.radius * pixels_per_unit(viewport)
}

pub fn body_position(params: &OrbitParams, t: f64, viewport: Viewport) -> Point {
    viewport
        .center()
        .polar(orbit_radius_px(params, viewport), params.angle_at(t))
}

pub struct Orbit;

impl Model for Orbit {
    type Params = OrbitParams;

    fn params(set: &ParameterSet) -> OrbitParams {
        OrbitParams::from_set(set)
    }

    fn scene(params: &OrbitParams, t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let center = viewport.center();
        let r = orbit_radius_px(params, viewport);

        let path: Vec<Point> = (0..=PATH_SEGMENTS)
            .map(|i| center.polar(r, TAU * i as f64 / PATH_SEGMENTS as f64))
            .collect();
        scene.polyline(path, GUIDE, Stroke::Dashed);

        scene.disc(center, 5.0 * params.central_mass.cbrt(), Color::Rgb(255, 210, 90));

        let phi = params.angle_at(t);
        let body = center.polar(r, phi);
        let tangent = phi + std::f64::consts::FRAC_PI_2;
        let arrow_len = 8.0 + 6.0 * params.velocity;
        scene.arrow(body, body.polar(arrow_len, tangent), Color::Rgb(120, 255, 160));
        scene.disc(body, 3.0, Color::Rgb(120, 200, 255));
        scene
    }
}
