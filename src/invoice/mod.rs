//! Invoice derivation: raw form data in, render-ready invoice out

pub mod derivation;

pub use derivation::*;
