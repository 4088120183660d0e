/* Table driven deterministic finite automaton. A word is run by walking the transition table
 * one symbol at a time, the row is the current state and the column is the position of the
 * symbol within the alphabet. */

use crate::fa::{RunResult, FA};
use bitvec::prelude::*;
use color_eyre::eyre::Result;
use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use petgraph::prelude::StableGraph;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tracing::{debug, info, warn};

/// List of possible errors while running or validating a DFA
#[derive(Debug, PartialEq, Eq)]
pub enum DFAError {
    /// A symbol of the word at the given position is not part of the alphabet
    UnknownSymbol(char, usize),
    /// The run reached a state which has no row in the transition table
    InvalidState(usize, char),
    /// The row of the state has no entry for the column of the symbol
    MissingTransition(usize, char),
    StartStateOutOfRange(usize),
    AcceptStateOutOfRange(usize),
    /// A row whose length is not the size of the alphabet: (state, found, expected)
    RaggedRow(usize, usize, usize),
    /// A table entry pointing past the last state: (state, symbol, target)
    SuccessorOutOfRange(usize, char, usize),
}

impl DFAError {
    /// True for the errors raised while walking the table, as opposed to validation errors
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            DFAError::UnknownSymbol(..) | DFAError::InvalidState(..) | DFAError::MissingTransition(..)
        )
    }
}

impl fmt::Display for DFAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DFAError::UnknownSymbol(symbol, position) => write!(
                f,
                "Error: Invalid transition! Symbol '{}' at position {} is not in the alphabet",
                symbol, position
            ),
            DFAError::InvalidState(state, symbol) => write!(
                f,
                "Error: Invalid transition! State {} has no row in the transition table (reading '{}')",
                state, symbol
            ),
            DFAError::MissingTransition(state, symbol) => write!(
                f,
                "Error: Invalid transition! State {} has no transition on '{}'",
                state, symbol
            ),
            DFAError::StartStateOutOfRange(state) => {
                write!(f, "Error: Start state {} is not a state of the DFA!", state)
            }
            DFAError::AcceptStateOutOfRange(state) => {
                write!(f, "Error: Accepting state {} is not a state of the DFA!", state)
            }
            DFAError::RaggedRow(state, found, expected) => write!(
                f,
                "Error: Row of state {} has {} transitions but the alphabet has {} symbols!",
                state, found, expected
            ),
            DFAError::SuccessorOutOfRange(state, symbol, target) => write!(
                f,
                "Error: Transition from state {} on '{}' points to unknown state {}!",
                state, symbol, target
            ),
        }
    }
}

impl std::error::Error for DFAError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    alphabet: Vec<char>,
    start_state: usize,
    accept_states: BitVec<u8>, // One bit per row of the transition table
    outside_accept_states: BTreeSet<usize>, // Accepting states without a row
    transition_table: Vec<Vec<usize>>, // Row per state, column per alphabet position
}

impl FA for DFA {
    type Error = DFAError;

    fn run(&self, word: &str) -> Result<RunResult, DFAError> {
        let mut current = self.start_state;
        let mut path = Vec::with_capacity(word.len() + 1);
        path.push(current);

        for (position, symbol) in word.chars().enumerate() {
            let next = self.next_state(current, symbol, position)?;
            debug!("{} --{}--> {}", current, symbol, next);
            current = next;
            path.push(current);
        }

        Ok(RunResult::new(self.is_accepting(current), path))
    }

    fn get_num_states(&self) -> usize {
        self.transition_table.len()
    }

    fn get_start_state(&self) -> usize {
        self.start_state
    }

    fn get_alphabet(&self) -> &[char] {
        &self.alphabet
    }

    fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    fn get_state_transitions(&self, state_id: usize) -> Vec<(char, usize)> {
        let row = match self.transition_table.get(state_id) {
            Some(row) => row,
            None => return Vec::new(),
        };

        // Later duplicates of a symbol are unreachable, only its first column counts
        self.alphabet
            .iter()
            .enumerate()
            .filter(|(column, symbol)| self.symbol_column(**symbol) == Some(*column))
            .filter_map(|(column, symbol)| row.get(column).map(|target| (*symbol, *target)))
            .collect()
    }
}

impl DFA {
    /// Build a DFA from its parts. Accepting states outside the table are kept so that runs
    /// ending on them still report acceptance, `validate` flags them.
    pub fn new(
        alphabet: Vec<char>,
        start_state: usize,
        accept_states: &[usize],
        transition_table: Vec<Vec<usize>>,
    ) -> Self {
        let num_states = transition_table.len();

        let mut accept_bits: BitVec<u8> = BitVec::repeat(false, num_states);
        let mut outside_accept_states = BTreeSet::new();

        for state in accept_states {
            if *state < num_states {
                accept_bits.set(*state, true);
            } else {
                outside_accept_states.insert(*state);
            }
        }

        DFA {
            alphabet,
            start_state,
            accept_states: accept_bits,
            outside_accept_states,
            transition_table,
        }
    }

    /// Column of the symbol in the transition table, the first one if the alphabet repeats it
    pub fn symbol_column(&self, symbol: char) -> Option<usize> {
        self.alphabet.iter().position(|ch| *ch == symbol)
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accept_states.get(state).is_some_and(|bit| *bit)
            || self.outside_accept_states.contains(&state)
    }

    /// Accepting states which have no row in the transition table
    pub fn get_outside_accept_states(&self) -> &BTreeSet<usize> {
        &self.outside_accept_states
    }

    /// Returns the transition table of the DFA
    pub fn get_transition_table(&self) -> &[Vec<usize>] {
        &self.transition_table
    }

    fn next_state(&self, state: usize, symbol: char, position: usize) -> Result<usize, DFAError> {
        let column = self
            .symbol_column(symbol)
            .ok_or(DFAError::UnknownSymbol(symbol, position))?;

        let row = self
            .transition_table
            .get(state)
            .ok_or(DFAError::InvalidState(state, symbol))?;

        row.get(column)
            .copied()
            .ok_or(DFAError::MissingTransition(state, symbol))
    }

    /// Check that every state referenced by the DFA has a row and that the table is
    /// rectangular with one column per alphabet symbol.
    pub fn validate(&self) -> Result<(), DFAError> {
        let num_states = self.get_num_states();

        if self.start_state >= num_states {
            return Err(DFAError::StartStateOutOfRange(self.start_state));
        }

        if let Some(state) = self.outside_accept_states.first() {
            return Err(DFAError::AcceptStateOutOfRange(*state));
        }

        for (state, row) in self.transition_table.iter().enumerate() {
            if row.len() != self.alphabet.len() {
                return Err(DFAError::RaggedRow(state, row.len(), self.alphabet.len()));
            }

            for (column, target) in row.iter().enumerate() {
                if *target >= num_states {
                    return Err(DFAError::SuccessorOutOfRange(
                        state,
                        self.alphabet[column],
                        *target,
                    ));
                }
            }
        }

        Ok(())
    }

    fn build_graph(&self) -> StableGraph<String, String> {
        let mut stable_graph = StableGraph::new();

        let num_states = self.get_num_states();

        for state_idx in 0..num_states {
            let mut node_label = format!("State {}", state_idx);
            if state_idx == self.start_state {
                node_label.push_str(" [start]");
            }
            if self.is_accepting(state_idx) {
                node_label.push_str(" [accept]");
            }
            stable_graph.add_node(node_label);
        }

        // Symbols sharing a source and a target end up on a single edge

        let mut edge_labels: BTreeMap<(usize, usize), Vec<String>> = BTreeMap::new();

        for state_idx in 0..num_states {
            for (symbol, target) in self.get_state_transitions(state_idx) {
                if target >= num_states {
                    warn!(
                        "Skipping edge from state {} on '{}' to missing state {}",
                        state_idx, symbol, target
                    );
                    continue;
                }
                edge_labels
                    .entry((state_idx, target))
                    .or_default()
                    .push(symbol.to_string());
            }
        }

        for ((source, target), symbols) in edge_labels {
            stable_graph.add_edge(
                NodeIndex::new(source),
                NodeIndex::new(target),
                symbols.join(", "),
            );
        }

        stable_graph
    }

    /// Graphviz representation of the DFA
    pub fn to_dot(&self) -> String {
        let stable_graph = self.build_graph();
        Dot::new(&stable_graph).to_string()
    }

    /// Save the DFA as `<filename>.dot` and render it to `<filename>.jpg` when Graphviz is
    /// installed.
    pub fn show_fa(&self, filename: &str) -> Result<()> {
        let dot_filename = format!("{}.dot", filename);
        let mut dot_file = File::create(&dot_filename)?;
        dot_file.write_all(self.to_dot().as_bytes())?;

        info!("DFA graph saved as {}", dot_filename);

        let jpg_filename = format!("{}.jpg", filename);
        let output = Command::new("dot")
            .args(["-Tjpg", &dot_filename, "-o", &jpg_filename])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                info!("DFA vizualization saved as {}", jpg_filename)
            }
            Ok(output) => warn!(
                "Graphviz failed to render {}: {}",
                dot_filename,
                String::from_utf8_lossy(&output.stderr)
            ),
            Err(error) => warn!("Could not run Graphviz, only {} was written: {}", dot_filename, error),
        }

        Ok(())
    }
}
