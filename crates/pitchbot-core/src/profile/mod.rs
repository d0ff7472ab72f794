//! Company profile extraction.

pub mod extractor;
