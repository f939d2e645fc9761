//! Illustrative wave packet. Not a solution of the Schrödinger equation:
//! the wavefunction is a plain travelling sine and the orbiting marker has no
//! physical basis beyond "moves faster with more momentum".

use std::f64::consts::TAU;

use ratatui::style::Color;

use crate::models::{Model, BACKGROUND, GUIDE};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Point, Scene, Stroke, Viewport};

const AMPLITUDE: ParamSpec = ParamSpec::new("amplitude", "Amplitude", "", 1.0);
const WAVELENGTH: ParamSpec = ParamSpec::new("wavelength", "Wavelength", "nm", 2.0);
const ENERGY: ParamSpec = ParamSpec::new("energy", "Energy", "eV", 2.0);
const MOMENTUM: ParamSpec = ParamSpec::new("momentum", "Momentum", "p", 1.0);

pub const PARAMS: &[ParamSpec] = &[AMPLITUDE, WAVELENGTH, ENERGY, MOMENTUM];

const SPAN: f64 = 10.0;
const SAMPLE_STEP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumParams {
    pub amplitude: f64,
    pub wavelength: f64,
    pub energy: f64,
    pub momentum: f64,
}

impl QuantumParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            amplitude: set.resolve(&AMPLITUDE),
            wavelength: set.resolve(&WAVELENGTH),
            energy: set.resolve(&ENERGY),
            momentum: set.resolve(&MOMENTUM),
        }
    }

    pub fn phase(&self, x: f64, t: f64) -> f64 {
        TAU * x / self.wavelength - self.energy * t
    }

    /// ψ(x,t) = A·sin(2π·x/λ − E·t)
    pub fn psi(&self, x: f64, t: f64) -> f64 {
        self.amplitude * self.phase(x, t).sin()
    }

    /// sin² of the same phase, in [0, 1].
    pub fn density(&self, x: f64, t: f64) -> f64 {
        self.phase(x, t).sin().powi(2)
    }

    pub fn marker_angle(&self, t: f64) -> f64 {
        t * self.momentum
    }
}

struct Layout {
    axis: f64,
    x_scale: f64,
    y_scale: f64,
    orbit_center: Point,
    orbit_radius: f64,
}

impl Layout {
    fn new(viewport: Viewport) -> Self {
        Self {
            axis: viewport.height * 0.62,
            x_scale: SPAN / viewport.width,
            y_scale: viewport.height * 0.25 / AMPLITUDE.range().1,
            orbit_center: Point::new(viewport.width * 0.88, viewport.height * 0.18),
            orbit_radius: viewport.min_side() * 0.08,
        }
    }
}

pub fn marker_position(params: &QuantumParams, t: f64, viewport: Viewport) -> Point {
    let layout = Layout::new(viewport);
    layout
        .orbit_center
        .polar(layout.orbit_radius, params.marker_angle(t))
}

pub struct Quantum;

impl Model for Quantum {
    type Params = QuantumParams;

    fn params(set: &ParameterSet) -> QuantumParams {
        QuantumParams::from_set(set)
    }

    fn scene(params: &QuantumParams, t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let layout = Layout::new(viewport);
        let right = viewport.width - 1.0;
        let count = (viewport.width / SAMPLE_STEP).floor() as usize;
        let xs: Vec<f64> = (0..=count)
            .map(|i| (i as f64 * SAMPLE_STEP).min(right))
            .collect();

        // |ψ|² as a filled region standing on the axis
        let mut region = Vec::with_capacity(xs.len() + 2);
        region.push(Point::new(0.0, layout.axis));
        for &px in &xs {
            let h = params.amplitude * params.density(px * layout.x_scale, t) * layout.y_scale;
            region.push(Point::new(px, layout.axis - h));
        }
        region.push(Point::new(right, layout.axis));
        scene.polygon(region, Color::Rgb(70, 40, 110));

        scene.dashed_line(Point::new(0.0, layout.axis), Point::new(right, layout.axis), GUIDE);

        let psi: Vec<Point> = xs
            .iter()
            .map(|&px| Point::new(px, layout.axis - params.psi(px * layout.x_scale, t) * layout.y_scale))
            .collect();
        scene.polyline(psi, Color::Rgb(200, 140, 255), Stroke::Solid);

        scene.ring(layout.orbit_center, layout.orbit_radius, GUIDE);
        scene.disc(marker_position(params, t, viewport), 2.0, Color::Rgb(255, 230, 120));
        scene.label(layout.orbit_center.offset(-2.0, -2.0), "ψ", Color::Rgb(200, 140, 255));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_is_square_of_unit_wave() {
        let p = QuantumParams { amplitude: 2.0, wavelength: 2.0, energy: 2.0, momentum: 1.0 };
        for i in 0..100 {
            let x = i as f64 * 0.1;
            let t = i as f64 * 0.03;
            let unit = p.psi(x, t) / p.amplitude;
            assert!((p.density(x, t) - unit * unit).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&p.density(x, t)));
        }
    }

    #[test]
    fn test_marker_rate_scales_with_momentum() {
        let slow = QuantumParams { amplitude: 1.0, wavelength: 2.0, energy: 2.0, momentum: 0.5 };
        let fast = QuantumParams { momentum: 1.5, ..slow };
        assert!((fast.marker_angle(2.0) - 3.0 * slow.marker_angle(2.0)).abs() < 1e-12);

        let vp = Viewport::new(160, 96);
        let layout = Layout::new(vp);
        for i in 0..20 {
            let p = marker_position(&fast, i as f64 * 0.4, vp);
            assert!((p.distance(layout.orbit_center) - layout.orbit_radius).abs() < 1e-9);
        }
    }

    #[test]
    fn test_density_region_is_filled_polygon() {
        let vp = Viewport::new(160, 96);
        let scene = Quantum::scene(&QuantumParams::from_set(&ParameterSet::new()), 0.5, vp);
        assert!(matches!(scene.primitives[0], crate::scene::Primitive::Polygon { .. }));
    }
}
