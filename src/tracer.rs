//! Field-line tracing for a set of fixed point charges.
//!
//! Lines start just outside the first charge and follow the normalised
//! superposed field in fixed pixel steps until they are absorbed by a
//! charge, leave the surface, stall at a zero of the field, or run out of
//! steps.

use std::f64::consts::TAU;

use crate::scene::{Point, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCharge {
    /// Signed magnitude.
    pub q: f64,
    pub at: Point,
}

impl PointCharge {
    pub const fn new(q: f64, at: Point) -> Self {
        Self { q, at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerConfig {
    pub seeds: usize,
    /// Pixels advanced per step.
    pub step: f64,
    pub max_steps: usize,
    /// Lines end once they come this close to any charge.
    pub min_distance: f64,
    /// Distance from the source charge of each seed point.
    pub seed_offset: f64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            seeds: 16,
            step: 2.0,
            max_steps: 900,
            min_distance: 5.0,
            seed_offset: 9.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Reached the charge at this index.
    Absorbed(usize),
    LeftBounds,
    /// Field magnitude was zero at the cursor.
    Stagnant,
    StepLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldLine {
    pub points: Vec<Point>,
    pub end: Termination,
}

/// Superposed field `Σ q·d/|d|³` at `p`. Charges coincident with `p`
/// contribute nothing.
pub fn field_at(charges: &[PointCharge], p: Point) -> (f64, f64) {
    let mut ex = 0.0;
    let mut ey = 0.0;
    for c in charges {
        let dx = p.x - c.at.x;
        let dy = p.y - c.at.y;
        let r2 = dx * dx + dy * dy;
        if r2 == 0.0 {
            continue;
        }
        let r3 = r2 * r2.sqrt();
        ex += c.q * dx / r3;
        ey += c.q * dy / r3;
    }
    (ex, ey)
}

fn absorbed_by(charges: &[PointCharge], p: Point, min_distance: f64) -> Option<usize> {
    charges
        .iter()
        .position(|c| c.at.distance(p) < min_distance)
}

/// Traces `config.seeds` lines around the first charge. A negative source
/// is traced against the field so its lines still leave the charge.
pub fn trace(charges: &[PointCharge], viewport: Viewport, config: &TracerConfig) -> Vec<FieldLine> {
    let Some(source) = charges.first() else {
        return Vec::new();
    };
    if source.q == 0.0 || config.seeds == 0 {
        return Vec::new();
    }
    let direction = source.q.signum();

    (0..config.seeds)
        .map(|i| {
            let angle = TAU * i as f64 / config.seeds as f64;
            let start = source.at.polar(config.seed_offset, angle);
            trace_line(charges, start, direction, viewport, config)
        })
        .collect()
}

fn trace_line(
    charges: &[PointCharge],
    start: Point,
    direction: f64,
    viewport: Viewport,
    config: &TracerConfig,
) -> FieldLine {
    if !viewport.contains(start) {
        return FieldLine { points: Vec::new(), end: Termination::LeftBounds };
    }
    let mut points = Vec::with_capacity(config.max_steps.min(256) + 1);
    if let Some(i) = absorbed_by(charges, start, config.min_distance) {
        if start.distance(charges[i].at) > 0.0 {
            points.push(start);
        }
        return FieldLine { points, end: Termination::Absorbed(i) };
    }
    points.push(start);

    let mut cursor = start;
    for _ in 0..config.max_steps {
        let (ex, ey) = field_at(charges, cursor);
        let magnitude = ex.hypot(ey);
        if magnitude == 0.0 || !magnitude.is_finite() {
            return FieldLine { points, end: Termination::Stagnant };
        }

        let scale = direction * config.step / magnitude;
        let next = cursor.offset(ex * scale, ey * scale);
        if !viewport.contains(next) {
            return FieldLine { points, end: Termination::LeftBounds };
        }
        if let Some(i) = absorbed_by(charges, next, config.min_distance) {
            if next.distance(charges[i].at) > 0.0 {
                points.push(next);
            }
            return FieldLine { points, end: Termination::Absorbed(i) };
        }
        points.push(next);
        cursor = next;
    }
    FieldLine { points, end: Termination::StepLimit }
}
