use std::f64::consts::TAU;

use ratatui::style::Color;

use crate::models::{Model, BACKGROUND, GUIDE};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Point, Scene, Stroke, Viewport};

const AMPLITUDE: ParamSpec = ParamSpec::new("amplitude", "Amplitude", "m", 1.0);
const WAVELENGTH: ParamSpec = ParamSpec::new("wavelength", "Wavelength", "m", 2.0);
const FREQUENCY: ParamSpec = ParamSpec::new("frequency", "Frequency", "Hz", 1.0);

pub const PARAMS: &[ParamSpec] = &[AMPLITUDE, WAVELENGTH, FREQUENCY];

/// World units shown across the surface width.
pub const SPAN: f64 = 10.0;
/// Pixel spacing of the sampled polyline.
pub const SAMPLE_STEP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub amplitude: f64,
    pub wavelength: f64,
    pub frequency: f64,
}

impl WaveParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            amplitude: set.resolve(&AMPLITUDE),
            wavelength: set.resolve(&WAVELENGTH),
            frequency: set.resolve(&FREQUENCY),
        }
    }

    /// y(x, t) = A·sin(2π·(x/λ − f·t))
    pub fn height(&self, x: f64, t: f64) -> f64 {
        self.amplitude * (TAU * (x / self.wavelength - self.frequency * t)).sin()
    }
}

/// Samples the wave across the surface at [`SAMPLE_STEP`] spacing.
pub fn samples(params: &WaveParams, t: f64, viewport: Viewport) -> Vec<Point> {
    let axis = viewport.height / 2.0;
    let x_scale = SPAN / viewport.width;
    let y_scale = viewport.height * 0.4 / AMPLITUDE.range().1;
    let count = (viewport.width / SAMPLE_STEP).floor() as usize;
    (0..=count)
        .map(|i| {
            let px = (i as f64 * SAMPLE_STEP).min(viewport.width - 1.0);
            Point::new(px, axis - params.height(px * x_scale, t) * y_scale)
        })
        .collect()
}

pub struct Wave;

impl Model for Wave {
    type Params = WaveParams;

    fn params(set: &ParameterSet) -> WaveParams {
        WaveParams::from_set(set)
    }

    fn scene(params: &WaveParams, t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let axis = viewport.height / 2.0;
        scene.dashed_line(Point::new(0.0, axis), Point::new(viewport.width - 1.0, axis), GUIDE);

        let points = samples(params, t, viewport);
        // A single medium particle bobbing in place a quarter of the way in
        let marker = points[points.len() / 4];
        scene.polyline(points, Color::Rgb(80, 180, 255), Stroke::Solid);
        scene.dashed_line(Point::new(marker.x, axis), marker, Color::Rgb(90, 90, 130));
        scene.disc(marker, 2.5, Color::Rgb(255, 220, 80));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_periodic_in_space_and_time() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = WaveParams {
                amplitude: rng.gen_range(0.1..=3.0),
                wavelength: rng.gen_range(0.2..=6.0),
                frequency: rng.gen_range(0.1..=3.0),
            };
            let x = rng.gen_range(0.0..SPAN);
            let t = rng.gen_range(0.0..10.0);
            assert!((p.height(x, t) - p.height(x + p.wavelength, t)).abs() < 1e-9);
            assert!((p.height(x, t) - p.height(x, t + 1.0 / p.frequency)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_samples_cover_width_at_fixed_step() {
        let vp = Viewport::new(160, 96);
        let points = samples(&WaveParams::from_set(&ParameterSet::new()), 0.0, vp);
        assert_eq!(points.len(), 81);
        assert_eq!(points[1].x - points[0].x, SAMPLE_STEP);
        assert!(points.iter().all(|p| vp.contains(*p)));
    }
}
