use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{Model, VisualizationKind};

/// Number of slider increments across a parameter's band.
const SLIDER_STEPS: f64 = 40.0;
const BAND_LOW: f64 = 0.1;
const BAND_HIGH: f64 = 3.0;

/// Registry entry for one tunable quantity of a visualization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub default: f64,
}

impl ParamSpec {
    pub const fn new(name: &'static str, label: &'static str, unit: &'static str, default: f64) -> Self {
        Self { name, label, unit, default }
    }

    /// Valid band `[default × 0.1, default × 3]`, ordered so negative
    /// defaults still yield `lo <= hi`.
    pub fn range(&self) -> (f64, f64) {
        let a = self.default * BAND_LOW;
        let b = self.default * BAND_HIGH;
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    /// One slider increment.
    pub fn step(&self) -> f64 {
        let (lo, hi) = self.range();
        (hi - lo) / SLIDER_STEPS
    }

    /// Position of `value` inside the band, 0.0 at the low end.
    pub fn fraction(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        if hi > lo { ((value - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 }
    }
}

/// Loosely-typed name → value map, for code that must stay agnostic of the
/// concrete visualization. Models convert it into their own typed record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults(specs: &[ParamSpec]) -> Self {
        let mut set = Self::new();
        for spec in specs {
            set.insert(spec.name, spec.default);
        }
        set
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Raw insert; values are clamped when resolved, not here.
    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Value for `spec`, clamped into its band; the registered default when
    /// absent or not finite.
    pub fn resolve(&self, spec: &ParamSpec) -> f64 {
        match self.get(spec.name) {
            Some(v) if v.is_finite() => spec.clamp(v),
            _ => spec.default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// What happened to a `set` request. Never an error: bad input is clamped
/// or ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Stored(f64),
    Clamped { requested: f64, stored: f64 },
    Rejected { kept: f64 },
    Unknown,
}

impl ParamUpdate {
    pub fn value(&self) -> Option<f64> {
        match *self {
            ParamUpdate::Stored(v) => Some(v),
            ParamUpdate::Clamped { stored, .. } => Some(stored),
            ParamUpdate::Rejected { kept } => Some(kept),
            ParamUpdate::Unknown => None,
        }
    }
}

/// Current parameter values of one session's visualization.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    kind: VisualizationKind,
    specs: &'static [ParamSpec],
    values: ParameterSet,
}

impl ParameterStore {
    pub fn new(kind: VisualizationKind) -> Self {
        let specs = kind.info().params;
        Self {
            kind,
            specs,
            values: ParameterSet::defaults(specs),
        }
    }

    pub fn kind(&self) -> VisualizationKind {
        self.kind
    }

    pub fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&'static ParamSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn values(&self) -> &ParameterSet {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name)
    }

    /// Current values as the typed record of model `M`.
    pub fn typed<M: Model>(&self) -> M::Params {
        M::params(&self.values)
    }

    pub fn set(&mut self, name: &str, value: f64) -> ParamUpdate {
        let Some(spec) = self.spec(name) else {
            warn!(kind = self.kind.id(), name, "ignoring unknown parameter");
            return ParamUpdate::Unknown;
        };
        let current = self.values.resolve(spec);
        if !value.is_finite() {
            warn!(kind = self.kind.id(), name, value, "rejecting non-finite parameter value");
            return ParamUpdate::Rejected { kept: current };
        }

        let stored = spec.clamp(value);
        self.values.insert(name, stored);
        if stored != value {
            debug!(kind = self.kind.id(), name, requested = value, stored, "parameter clamped");
            ParamUpdate::Clamped { requested: value, stored }
        } else {
            ParamUpdate::Stored(stored)
        }
    }

    /// Moves a parameter by `steps` slider increments.
    pub fn nudge(&mut self, name: &str, steps: i32) -> ParamUpdate {
        let Some(spec) = self.spec(name) else {
            return ParamUpdate::Unknown;
        };
        let current = self.values.resolve(spec);
        self.set(name, current + spec.step() * steps as f64)
    }

    pub fn reset(&mut self) {
        self.values = ParameterSet::defaults(self.specs);
        debug!(kind = self.kind.id(), "parameters reset to defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_seeds_defaults() {
        let store = ParameterStore::new(VisualizationKind::Pendulum);
        assert_eq!(store.get("length"), Some(1.0));
        assert_eq!(store.get("gravity"), Some(9.8));
        assert_eq!(store.get("angle"), Some(30.0));
        assert_eq!(store.values().len(), store.specs().len());
    }

    #[test]
    fn test_typed_record_follows_store() {
        use crate::models::pendulum::Pendulum;
        let mut store = ParameterStore::new(VisualizationKind::Pendulum);
        store.set("length", 2.0);
        let typed = store.typed::<Pendulum>();
        assert_eq!(typed.length, 2.0);
        assert_eq!(typed.gravity, 9.8);
    }

    #[test]
    fn test_set_clamps_into_band() {
        let mut store = ParameterStore::new(VisualizationKind::Pendulum);
        assert_eq!(
            store.set("length", 10.0),
            ParamUpdate::Clamped { requested: 10.0, stored: 3.0 }
        );
        assert_eq!(store.get("length"), Some(3.0));

        store.set("length", 0.0);
        assert!((store.get("length").unwrap() - 0.1).abs() < 1e-12);

        assert_eq!(store.set("length", 2.0), ParamUpdate::Stored(2.0));
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut store = ParameterStore::new(VisualizationKind::Wave);
        store.set("amplitude", 2.0);
        assert_eq!(store.set("amplitude", f64::NAN), ParamUpdate::Rejected { kept: 2.0 });
        assert_eq!(store.set("amplitude", f64::INFINITY), ParamUpdate::Rejected { kept: 2.0 });
        assert_eq!(store.get("amplitude"), Some(2.0));
    }

    #[test]
    fn test_unknown_name_is_ignored() {
        let mut store = ParameterStore::new(VisualizationKind::Orbit);
        let before = store.values().clone();
        assert_eq!(store.set("warp", 1.0), ParamUpdate::Unknown);
        assert_eq!(store.values(), &before);
    }

    #[test]
    fn test_negative_default_band() {
        let store = ParameterStore::new(VisualizationKind::Field);
        let spec = store.spec("charge2").unwrap();
        assert_eq!(spec.range(), (-3.0, -0.1));

        let mut store = store;
        store.set("charge2", 5.0);
        assert_eq!(store.get("charge2"), Some(-0.1));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = ParameterStore::new(VisualizationKind::Spring);
        store.set("damping", 0.25);
        store.set("mass", 2.5);
        store.reset();
        assert_eq!(store.values(), &ParameterSet::defaults(store.specs()));
    }

    #[test]
    fn test_nudge_moves_one_increment() {
        let mut store = ParameterStore::new(VisualizationKind::Pendulum);
        let spec = *store.spec("length").unwrap();
        store.nudge("length", 1);
        assert!((store.get("length").unwrap() - (1.0 + spec.step())).abs() < 1e-12);
        for _ in 0..200 {
            store.nudge("length", 1);
        }
        assert_eq!(store.get("length"), Some(3.0));
    }

    #[test]
    fn test_resolve_substitutes_default() {
        let spec = ParamSpec::new("k", "K", "", 10.0);
        let empty = ParameterSet::new();
        assert_eq!(empty.resolve(&spec), 10.0);
        assert_eq!(empty.clone().with("k", 100.0).resolve(&spec), 30.0);
        assert_eq!(empty.with("k", f64::NAN).resolve(&spec), 10.0);
    }
}
