pub mod field;
pub mod orbit;
pub mod pendulum;
pub mod quantum;
pub mod spring;
pub mod wave;

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::params::{ParamSpec, ParameterSet};
use crate::scene::{Scene, Viewport};

/// Shared dark backdrop for every scene.
pub const BACKGROUND: Color = Color::Rgb(8, 10, 20);
pub const GUIDE: Color = Color::Rgb(70, 75, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualizationKind {
    Pendulum,
    Orbit,
    Spring,
    Wave,
    Field,
    QuantumParticle,
}

impl VisualizationKind {
    pub fn all() -> &'static [VisualizationKind] {
        &[
            VisualizationKind::Pendulum,
            VisualizationKind::Orbit,
            VisualizationKind::Spring,
            VisualizationKind::Wave,
            VisualizationKind::Field,
            VisualizationKind::QuantumParticle,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            VisualizationKind::Pendulum => 0,
            VisualizationKind::Orbit => 1,
            VisualizationKind::Spring => 2,
            VisualizationKind::Wave => 3,
            VisualizationKind::Field => 4,
            VisualizationKind::QuantumParticle => 5,
        }
    }

    /// Stable identifier used by external collaborators.
    pub fn id(&self) -> &'static str {
        match self {
            VisualizationKind::Pendulum => "pendulum",
            VisualizationKind::Orbit => "orbit",
            VisualizationKind::Spring => "spring",
            VisualizationKind::Wave => "wave",
            VisualizationKind::Field => "field",
            VisualizationKind::QuantumParticle => "quantumParticle",
        }
    }

    pub fn info(&self) -> &'static ModelInfo {
        &REGISTRY[self.index()]
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VisualizationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualizationKind::all()
            .iter()
            .copied()
            .find(|k| k.id() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// Static description of one visualization: what it is called, how it is
/// explained to the learner and which parameters it exposes.
#[derive(Debug)]
pub struct ModelInfo {
    pub kind: VisualizationKind,
    pub title: &'static str,
    pub icon: &'static str,
    pub summary: &'static str,
    pub explanation: &'static [&'static str],
    pub params: &'static [ParamSpec],
    pub color: Color,
}

pub static REGISTRY: [ModelInfo; 6] = [
    ModelInfo {
        kind: VisualizationKind::Pendulum,
        title: "Pendulum",
        icon: "⏱",
        summary: "Simple harmonic\nswing",
        explanation: &[
            "For small swings a pendulum is a simple harmonic oscillator.",
            "θ(t) = θ₀·cos(t·√(g/L))",
            "The period 2π·√(L/g) depends on length and gravity, not on the starting angle or the mass.",
        ],
        params: pendulum::PARAMS,
        color: Color::Rgb(255, 200, 80),
    },
    ModelInfo {
        kind: VisualizationKind::Orbit,
        title: "Orbit",
        icon: "🪐",
        summary: "Circular motion\naround a star",
        explanation: &[
            "A body on a circular orbit keeps a constant distance from the centre.",
            "φ(t) = t·v/r",
            "Its velocity is always tangent to the path; the pull of the central mass bends it into a circle.",
        ],
        params: orbit::PARAMS,
        color: Color::Rgb(120, 200, 255),
    },
    ModelInfo {
        kind: VisualizationKind::Spring,
        title: "Spring",
        icon: "🌀",
        summary: "Damped mass on\na spring",
        explanation: &[
            "A mass on a spring oscillates about its equilibrium point.",
            "x(t) = A·cos(t·√(k/m))·e^(−b·t)",
            "Damping drains energy, so the swing shrinks inside an exponential envelope.",
        ],
        params: spring::PARAMS,
        color: Color::Rgb(120, 230, 140),
    },
    ModelInfo {
        kind: VisualizationKind::Wave,
        title: "Wave",
        icon: "🌊",
        summary: "Travelling\nsine wave",
        explanation: &[
            "A travelling wave repeats in space every wavelength and in time every period.",
            "y(x,t) = A·sin(2π·(x/λ − f·t))",
            "Each point only moves up and down; the pattern moves along at speed λ·f.",
        ],
        params: wave::PARAMS,
        color: Color::Rgb(80, 180, 255),
    },
    ModelInfo {
        kind: VisualizationKind::Field,
        title: "E-Field",
        icon: "⚡",
        summary: "Field lines of\ntwo charges",
        explanation: &[
            "Field lines start on positive charges and end on negative ones.",
            "E = Σ q·r̂ / r²",
            "Lines never cross; where they crowd together the field is strong.",
        ],
        params: field::PARAMS,
        color: Color::Rgb(255, 120, 120),
    },
    ModelInfo {
        kind: VisualizationKind::QuantumParticle,
        title: "Quantum",
        icon: "⚛",
        summary: "Wave packet and\nprobability",
        explanation: &[
            "A quantum particle is described by a wavefunction ψ.",
            "ψ(x,t) = A·sin(2π·x/λ − E·t)",
            "The shaded region shows |ψ|², where the particle is likely to be found. The orbiting marker is illustrative.",
        ],
        params: quantum::PARAMS,
        color: Color::Rgb(200, 140, 255),
    },
];

/// A closed-form visualization: typed parameters in, one frame's scene out.
pub trait Model {
    type Params;

    /// Builds the typed record, using registered defaults for anything
    /// missing from `set`.
    fn params(set: &ParameterSet) -> Self::Params;

    fn scene(params: &Self::Params, t: f64, viewport: Viewport) -> Scene;
}

fn run<M: Model>(set: &ParameterSet, t: f64, viewport: Viewport) -> Scene {
    M::scene(&M::params(set), t, viewport)
}

/// Scene for `kind` at simulated time `t`. Pure: identical inputs give an
/// identical scene.
pub fn evaluate(kind: VisualizationKind, params: &ParameterSet, t: f64, viewport: Viewport) -> Scene {
    match kind {
        VisualizationKind::Pendulum => run::<pendulum::Pendulum>(params, t, viewport),
        VisualizationKind::Orbit => run::<orbit::Orbit>(params, t, viewport),
        VisualizationKind::Spring => run::<spring::Spring>(params, t, viewport),
        VisualizationKind::Wave => run::<wave::Wave>(params, t, viewport),
        VisualizationKind::Field => run::<field::Field>(params, t, viewport),
        VisualizationKind::QuantumParticle => run::<quantum::Quantum>(params, t, viewport),
    }
}
