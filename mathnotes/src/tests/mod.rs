// Classifier tests
mod classifier;

// Parser tests
mod basic_parsing;
mod calculus_parsing;

mod simplifying;
