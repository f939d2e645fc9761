use ratatui::style::Color;

use crate::models::{Model, BACKGROUND};
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Scene, Stroke, Viewport};
use crate::tracer::{self, PointCharge, Termination, TracerConfig};

const CHARGE_1: ParamSpec = ParamSpec::new("charge1", "Charge 1", "q", 1.0);
const CHARGE_2: ParamSpec = ParamSpec::new("charge2", "Charge 2", "q", -1.0);
const SEPARATION: ParamSpec = ParamSpec::new("separation", "Separation", "m", 4.0);

pub const PARAMS: &[ParamSpec] = &[CHARGE_1, CHARGE_2, SEPARATION];

/// World units shown across the surface width.
pub const SPAN: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub charge1: f64,
    pub charge2: f64,
    pub separation: f64,
}

impl FieldParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            charge1: set.resolve(&CHARGE_1),
            charge2: set.resolve(&CHARGE_2),
            separation: set.resolve(&SEPARATION),
        }
    }
}

/// Charges at (−s/2, 0) and (+s/2, 0), mapped into surface pixels.
pub fn charges(params: &FieldParams, viewport: Viewport) -> [PointCharge; 2] {
    let center = viewport.center();
    let half = params.separation / 2.0 * viewport.width / SPAN;
    [
        PointCharge::new(params.charge1, center.offset(-half, 0.0)),
        PointCharge::new(params.charge2, center.offset(half, 0.0)),
    ]
}

fn charge_color(q: f64) -> Color {
    if q >= 0.0 {
        Color::Rgb(255, 110, 110)
    } else {
        Color::Rgb(110, 160, 255)
    }
}

pub struct Field;

impl Model for Field {
    type Params = FieldParams;

    fn params(set: &ParameterSet) -> FieldParams {
        FieldParams::from_set(set)
    }

    /// Time-independent: `t` is ignored.
    fn scene(params: &FieldParams, _t: f64, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(BACKGROUND);
        let charges = charges(params, viewport);

        for line in tracer::trace(&charges, viewport, &TracerConfig::default()) {
            let color = match line.end {
                Termination::Absorbed(_) => Color::Rgb(230, 200, 120),
                _ => Color::Rgb(150, 130, 90),
            };
            scene.polyline(line.points, color, Stroke::Solid);
        }

        for charge in &charges {
            let radius = 3.0 + 1.5 * charge.q.abs().sqrt();
            scene.disc(charge.at, radius, charge_color(charge.q));
            let sign = if charge.q >= 0.0 { "+" } else { "−" };
            scene.label(charge.at.offset(-1.0, -radius - 6.0), sign, Color::White);
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Primitive;

    #[test]
    fn test_charge_layout_follows_separation() {
        let vp = Viewport::new(160, 96);
        let params = FieldParams { charge1: 1.0, charge2: -1.0, separation: 4.0 };
        let [a, b] = charges(&params, vp);
        // 10 px per unit: (−2, 0) and (2, 0) around the centre
        assert_eq!(a.at, vp.center().offset(-20.0, 0.0));
        assert_eq!(b.at, vp.center().offset(20.0, 0.0));
    }

    #[test]
    fn test_scene_connects_positive_to_negative() {
        let vp = Viewport::new(160, 96);
        let set = ParameterSet::new()
            .with("charge1", 1.0)
            .with("charge2", -1.0)
            .with("separation", 4.0);
        let params = FieldParams::from_set(&set);
        let [pos, neg] = charges(&params, vp);
        let config = TracerConfig::default();

        let scene = Field::scene(&params, 0.0, vp);
        let connected = scene.primitives.iter().any(|p| match p {
            Primitive::Polyline { points, .. } => {
                let first = points[0];
                let last = points[points.len() - 1];
                first.distance(pos.at) <= config.seed_offset + 1e-9
                    && last.distance(neg.at) < config.min_distance
            }
            _ => false,
        });
        assert!(connected);
    }

    #[test]
    fn test_scene_ignores_time() {
        let vp = Viewport::new(160, 96);
        let params = FieldParams::from_set(&ParameterSet::new());
        assert_eq!(Field::scene(&params, 0.0, vp), Field::scene(&params, 12.5, vp));
    }
}
