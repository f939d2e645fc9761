//! Interactive physics visualizations for the terminal.
//!
//! Each concept is a closed-form model evaluated against simulated time,
//! described as a [`scene::Scene`] and rasterised onto a braille
//! [`render::BrailleSurface`]. A [`session::ConceptSession`] ties one model to
//! its parameters, its animation clock and the surface it draws on.

pub mod app;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod logging;
pub mod models;
pub mod params;
pub mod progress;
pub mod render;
pub mod scene;
pub mod session;
pub mod tracer;
pub mod ui;

pub use error::{Error, Result};
