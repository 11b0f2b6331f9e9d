//! Domain types shared across the layout pipeline.
//!
//! Recognizer output arrives as [`RawLine`]s, is normalized into [`LineRecord`]s,
//! and leaves the pipeline as [`Block`]s.

pub mod block;
pub mod line;
pub mod raw;

pub use block::Block;
pub use line::{LineRecord, NormalizedBox, Orientation};
pub use raw::{CenterGeometry, RawLine, RawWord};
