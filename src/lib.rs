//! # dfasim
//!
//! A deterministic finite automaton simulator.
//!
//! This library provides functionality to:
//! - Read an automaton description (word, alphabet, start state, accepting states and
//!   transition table) from a line oriented text file
//! - Run a word through the DFA and collect the path of visited states
//! - Report the verdict and path as text or JSON
//! - Export the automaton as a Graphviz graph or visualize it interactively

pub mod dfa;
pub mod fa;
pub mod loader;
pub mod reporter;
pub mod visualizer;

// Re-export commonly used items for convenience
pub use dfa::{DFAError, DFA};
pub use fa::{RunResult, FA};
pub use loader::{parse_dfa_description, read_dfa_file};
pub use reporter::{render, validate, OutputFormat};
pub use visualizer::visualize;
