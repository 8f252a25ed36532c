//! Tax computation: GST rates, per-line breakdown and the HSN summary

pub mod gst;
pub mod summary;

pub use gst::*;
pub use summary::*;
