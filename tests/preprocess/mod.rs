//! Preprocessor integration tests:
//! - Source formats and indicator-area handling
//! - COPY / REPLACE directive expansion against on-disk copybooks

pub mod tests_directives;
pub mod tests_formats;
