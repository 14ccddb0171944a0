//! Unit test modules.

mod detection_test;
mod flatten_test;
mod scoring_test;
