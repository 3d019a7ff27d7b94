//! Body movement applied before detection.

pub mod integrator;

pub use integrator::Integrator;
