//! GST calculations.
//!
//! [`engine`] holds the tax computation itself; [`projection`] is the toy
//! price forecaster. Shared rounding and clamping helpers live in [`common`].

pub mod common;
pub mod engine;
pub mod projection;

pub use engine::{TaxEngine, compute};
pub use projection::{
    GstOutlook, LinearModel, PriceCategory, PriceProjection, PriceProjector, ProjectionError,
};
