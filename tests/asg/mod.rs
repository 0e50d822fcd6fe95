//! ASG builder integration tests:
//! - End-to-end pipeline scenarios
//! - Structural invariants (registry bijection, tree shape)
//! - Name resolution and diagnostics

pub mod tests_builder;
pub mod tests_resolution;
pub mod tests_scenarios;
