#![deny(unsafe_code)]
//! Core types and traits for the plotgen procedural SVG system.
//!
//! Provides the `Generator` trait, declarative `Schema`s and the total
//! `coerce` engine that turns raw input into validated `Params`, the
//! string-seeded `Mulberry32` PRNG, pure layout geometry, and the `Canvas`
//! drawing capability with its call-scoped `Session`.

pub mod canvas;
pub mod coerce;
pub mod color;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod schema;
pub mod seed;

pub use canvas::{Canvas, ItemId, Session, Stroke};
pub use coerce::coerce;
pub use color::Srgb;
pub use error::PlotError;
pub use generator::{Generator, GroupMeta, Rendering, UiMeta};
pub use geometry::Point;
pub use params::{ParamValue, Params};
pub use prng::{make_rng, Mulberry32};
pub use schema::{FieldKind, FieldSpec, Schema};
