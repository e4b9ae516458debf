//! Reference systems and coordinate transforms

pub mod cache;
pub mod reference;
pub mod transformer;

pub use cache::TransformCache;
pub use reference::{MapUnits, ReferenceSystem};
pub use transformer::Transformer;
