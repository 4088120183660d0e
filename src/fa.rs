use bitvec::prelude::BitVec;
use serde::Serialize;

/// Outcome of running a word through a finite automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    accepted: bool,
    path: Vec<usize>,
}

impl RunResult {
    pub fn new(accepted: bool, path: Vec<usize>) -> Self {
        RunResult { accepted, path }
    }
    /// Whether the word ended in an accepting state
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
    /// Every state visited, starting with the start state
    pub fn get_path(&self) -> &[usize] {
        &self.path
    }
    /// The state the run ended in
    pub fn get_final_state(&self) -> Option<usize> {
        self.path.last().copied()
    }
}

pub trait FA {
    type Error;

    fn run(&self, word: &str) -> Result<RunResult, Self::Error>;
    fn get_num_states(&self) -> usize;
    fn get_start_state(&self) -> usize;
    fn get_alphabet(&self) -> &[char];
    fn get_acceptor_states(&self) -> &BitVec<u8>;
    fn get_state_transitions(&self, state_id: usize) -> Vec<(char, usize)>;
}
