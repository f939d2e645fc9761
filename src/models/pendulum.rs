use std::f64::consts::TAU;

use ratatui::style::Color;

use crate::models::{Model, BACKGROUND, GUIDE};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Point, Scene, Stroke, Viewport};

const LENGTH: ParamSpec = ParamSpec::new("length", "Length", "m", 1.0);
const MASS: ParamSpec = ParamSpec::new("mass", "Mass", "kg", 1.0);
const GRAVITY: ParamSpec = ParamSpec::new("gravity", "Gravity", "m/s²", 9.8);
const ANGLE: ParamSpec = ParamSpec::new("angle", "Angle", "°", 30.0);

pub const PARAMS: &[ParamSpec] = &[LENGTH, MASS, GRAVITY, ANGLE];

const ARC_SEGMENTS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumParams {
    pub length: f64,
    pub mass: f64,
    pub gravity: f64,
    /// Release angle in degrees.
    pub angle: f64,
}

impl PendulumParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            length: set.resolve(&LENGTH),
            mass: set.resolve(&MASS),
            gravity: set.resolve(&GRAVITY),
            angle: set.resolve(&ANGLE),
        }
    }

    pub fn angular_frequency(&self) -> f64 {
        (self.gravity / self.length).sqrt()
    }

    pub fn period(&self) -> f64 {
        TAU / self.angular_frequency()
    }

    /// θ(t) = θ₀·cos(t·√(g/L)), in radians.
    pub fn angle_at(&self, t: f64) -> f64 {
        self.angle.to_radians() * (t * self.angular_frequency()).cos()
    }
}

fn pivot(viewport: Viewport) -> Point {
    Point::new(viewport.width / 2.0, viewport.height * 0.1)
}

fn pixels_per_metre(viewport: Viewport) -> f64 {
    viewport.height * 0.8 / LENGTH.range().1
}

pub fn bob_position(params: &PendulumParams, t: f64, viewport: Viewport) -> Point {
    let theta = params.angle_at(t);
    let len = params.length * pixels_per_metre(viewport);
    pivot(viewport).offset(len * theta.sin(), len * theta.cos())
}

pub struct Pendulum;

impl Model for Pendulum {
    type Params = PendulumParams;

    fn params(set: &ParameterSet) -> PendulumParams {
        PendulumParams::from_set(set)
    }

    fn scene(params: &PendulumParams, t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let top = pivot(viewport);
        let len = params.length * pixels_per_metre(viewport);

        // Support beam and rest position
        scene.line(top.offset(-18.0, 0.0), top.offset(18.0, 0.0), Color::Rgb(150, 150, 170));
        scene.dashed_line(top, top.offset(0.0, len), GUIDE);

        // Swing range
        let theta0 = params.angle.to_radians();
        let arc: Vec<Point> = (0..=ARC_SEGMENTS)
            .map(|i| {
                let a = -theta0 + 2.0 * theta0 * i as f64 / ARC_SEGMENTS as f64;
                top.offset(len * a.sin(), len * a.cos())
            })
            .collect();
        scene.polyline(arc, GUIDE, Stroke::Dashed);

        let bob = bob_position(params, t, viewport);
        scene.line(top, bob, Color::Rgb(200, 200, 210));
        scene.disc(top, 1.5, Color::Rgb(150, 150, 170));
        scene.disc(bob, 3.0 + 2.0 * params.mass.cbrt(), Color::Rgb(255, 200, 80));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn vp() -> Viewport {
        Viewport::new(160, 96)
    }

    #[test]
    fn test_angle_is_bounded_by_release_angle() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let params = PendulumParams {
                length: rng.gen_range(0.1..=3.0),
                mass: 1.0,
                gravity: rng.gen_range(0.98..=29.4),
                angle: rng.gen_range(3.0..=90.0),
            };
            let t = rng.gen_range(0.0..100.0);
            assert!(params.angle_at(t).abs() <= params.angle.to_radians() + 1e-12);
        }
    }

    #[test]
    fn test_period_does_not_depend_on_amplitude() {
        // Zero crossings sit at t = (k + 1/2)·π/ω; consecutive same-direction
        // crossings are one period apart.
        for angle in [5.0, 30.0, 80.0] {
            let params = PendulumParams { length: 1.0, mass: 1.0, gravity: 9.8, angle };
            let omega = params.angular_frequency();
            let first = std::f64::consts::FRAC_PI_2 / omega;
            let third = first + TAU / omega;
            assert!(params.angle_at(first).abs() < 1e-9);
            assert!(params.angle_at(third).abs() < 1e-9);
            assert!(((third - first) - TAU / (9.8f64).sqrt()).abs() < 1e-9);
            assert!((params.period() - TAU / (9.8f64).sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_release_position_at_t0() {
        let set = ParameterSet::new()
            .with("length", 1.0)
            .with("mass", 1.0)
            .with("gravity", 9.8)
            .with("angle", 30.0);
        let params = PendulumParams::from_set(&set);
        assert!((params.angle_at(0.0) - 30f64.to_radians()).abs() < 1e-12);

        let at_release = bob_position(&params, 0.0, vp());
        let swing = (at_release.x - pivot(vp()).x).abs();
        for i in 1..100 {
            let p = bob_position(&params, i as f64 * 0.037, vp());
            assert!((p.x - pivot(vp()).x).abs() <= swing + 1e-9);
        }
    }

    #[test]
    fn test_string_length_is_constant() {
        let params = PendulumParams::from_set(&ParameterSet::new());
        let expected = params.length * pixels_per_metre(vp());
        for i in 0..50 {
            let bob = bob_position(&params, i as f64 * 0.1, vp());
            assert!((bob.distance(pivot(vp())) - expected).abs() < 1e-9);
        }
    }
}
