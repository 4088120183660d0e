/* Reader for the line oriented automaton description:
 *   word
 *   alphabet symbols separated by ';'
 *   start state
 *   accepting states separated by ';'
 *   one transition table row per remaining line, separated by ';' */

use crate::dfa::DFA;
use color_eyre::eyre::{Report, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{debug, warn};

const FIELD_SEPARATOR: char = ';';

#[derive(Debug)]
pub enum LoaderError {
    FileOpenError(String),
    FileReadError(String),
    /// A field which should have been a state index: (line number, field)
    MalformedField(usize, String),
    /// One of the four header lines is absent
    MissingLine(&'static str),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::FileOpenError(err_line) => write!(f, "{}", err_line),
            LoaderError::FileReadError(err_line) => write!(f, "{}", err_line),
            LoaderError::MalformedField(line_number, field) => write!(
                f,
                "Error: Malformed field '{}' on line {}, expected a state number!",
                field, line_number
            ),
            LoaderError::MissingLine(name) => {
                write!(f, "Error: The automaton file has no {} line!", name)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

struct LineReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_number: usize,
    strict: bool,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R, strict: bool) -> Self {
        LineReader {
            lines: reader.lines(),
            line_number: 0,
            strict,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, LoaderError> {
        match self.lines.next() {
            None => Ok(None),
            Some(Ok(line)) => {
                self.line_number += 1;
                Ok(Some(line))
            }
            Some(Err(error)) => {
                let err_line = format!(
                    "Error: Failed to read line number {} in the automaton file {}",
                    self.line_number + 1,
                    error
                );
                Err(LoaderError::FileReadError(err_line))
            }
        }
    }

    /// Header lines read as empty when missing, unless loading strictly
    fn header_line(&mut self, name: &'static str) -> Result<String, LoaderError> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None if self.strict => Err(LoaderError::MissingLine(name)),
            None => {
                warn!("The automaton file has no {} line, reading it as empty", name);
                self.line_number += 1;
                Ok(String::new())
            }
        }
    }

    fn parse_state(&self, field: &str) -> Result<Option<usize>, LoaderError> {
        match field.parse::<usize>() {
            Ok(state) => Ok(Some(state)),
            Err(_) if self.strict => Err(LoaderError::MalformedField(
                self.line_number,
                field.to_string(),
            )),
            Err(_) => {
                warn!(
                    "Skipping malformed field '{}' on line {}",
                    field, self.line_number
                );
                Ok(None)
            }
        }
    }

    /// Empty fields are always skipped, malformed ones only when loading leniently
    fn parse_state_list(&self, line: &str) -> Result<Vec<usize>, LoaderError> {
        let mut states = Vec::new();

        for field in line.split(FIELD_SEPARATOR) {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            if let Some(state) = self.parse_state(field)? {
                states.push(state);
            }
        }

        Ok(states)
    }
}

fn parse_alphabet(line: &str) -> Vec<char> {
    let alphabet: Vec<char> = line
        .split(FIELD_SEPARATOR)
        .filter(|field| !field.is_empty())
        .flat_map(|field| field.chars())
        .collect();

    let mut seen = HashSet::new();
    for symbol in &alphabet {
        if !seen.insert(symbol) {
            warn!(
                "Symbol '{}' appears more than once in the alphabet, only its first column is used",
                symbol
            );
        }
    }

    alphabet
}

/// Parse an automaton description and return the DFA together with the word to test.
/// In strict mode malformed fields and missing lines are errors and the DFA is validated.
pub fn parse_dfa_description<R: BufRead>(reader: R, strict: bool) -> Result<(DFA, String)> {
    let mut line_reader = LineReader::new(reader, strict);

    let word = line_reader.header_line("word")?;

    let alphabet = parse_alphabet(&line_reader.header_line("alphabet")?);

    // A start state which does not parse falls back to state 0 when loading leniently
    let start_line = line_reader.header_line("start state")?;
    let start_state = line_reader.parse_state(start_line.trim())?.unwrap_or(0);

    let accept_line = line_reader.header_line("accepting states")?;
    let accept_states = line_reader.parse_state_list(&accept_line)?;

    let mut transition_table: Vec<Vec<usize>> = Vec::new();
    let mut trailing_blank_lines = 0;

    while let Some(line) = line_reader.next_line()? {
        if line.trim().is_empty() {
            trailing_blank_lines += 1;
        } else {
            trailing_blank_lines = 0;
        }
        transition_table.push(line_reader.parse_state_list(&line)?);
    }

    transition_table.truncate(transition_table.len() - trailing_blank_lines);

    debug!(
        "Loaded DFA with {} states over {:?}, start state {}, accepting states {:?}",
        transition_table.len(),
        alphabet,
        start_state,
        accept_states
    );

    let dfa = DFA::new(alphabet, start_state, &accept_states, transition_table);

    if strict {
        dfa.validate()?;
    }

    Ok((dfa, word))
}

/// Read an automaton description file, see `parse_dfa_description`
pub fn read_dfa_file(file_path: &str, strict: bool) -> Result<(DFA, String)> {
    let file = match File::open(file_path) {
        Ok(file) => file,
        Err(error) => {
            let err_line = format!(
                "Error: Failed to open the automaton file {}: {}",
                file_path, error
            );
            return Err(Report::new(LoaderError::FileOpenError(err_line)));
        }
    };

    parse_dfa_description(BufReader::new(file), strict)
}

#[cfg(test)]
mod loader_tests {
    use super::*;
    use crate::dfa::DFAError;
    use crate::fa::FA;

    fn parse(description: &str, strict: bool) -> Result<(DFA, String)> {
        parse_dfa_description(description.as_bytes(), strict)
    }

    #[test]
    fn test_parse_description() {
        let (dfa, word) = parse("101\n0;1\n0\n1\n0;1\n0;1\n", false).unwrap();

        assert_eq!(word, "101");
        assert_eq!(dfa.get_alphabet(), &['0', '1']);
        assert_eq!(dfa.get_start_state(), 0);
        assert_eq!(dfa.get_acceptor_states().iter_ones().collect::<Vec<_>>(), vec![1]);
        assert_eq!(dfa.get_transition_table(), &[vec![0, 1], vec![0, 1]]);
    }

    #[test_log::test]
    fn test_malformed_fields_are_skipped() {
        let (dfa, _) = parse("\nab\n0\n1;;x;2\n1;2\n2;2\n0;0\n", false).unwrap();
        let accept_states: Vec<usize> = dfa.get_acceptor_states().iter_ones().collect();
        assert_eq!(accept_states, vec![1, 2]);

        let (dfa, _) = parse("\nab\n0\n1\n1;-1;0\n", false).unwrap();
        assert_eq!(dfa.get_transition_table(), &[vec![1, 0]]);
    }

    #[test]
    fn test_strict_rejects_malformed_field() {
        let err = parse("\nab\n0\n1;;x;2\n1;2\n2;2\n0;0\n", true).unwrap_err();
        match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::MalformedField(4, field)) => assert_eq!(field, "x"),
            other => panic!("Expected a malformed field error, got {:?}", other),
        }
    }

    #[test]
    fn test_alphabet_fields_are_concatenated() {
        let (dfa, _) = parse("\nab;;c;\n0\n\n", false).unwrap();
        assert_eq!(dfa.get_alphabet(), &['a', 'b', 'c']);
    }

    #[test]
    fn test_empty_word_and_missing_table() {
        let (dfa, word) = parse("\n\n2\n2\n", false).unwrap();
        assert_eq!(word, "");
        assert_eq!(dfa.get_num_states(), 0);
        let result = dfa.run(&word).unwrap();
        assert!(result.is_accepted());
        assert_eq!(result.get_path(), &[2]);
    }

    #[test]
    fn test_lenient_start_state_defaults_to_zero() {
        let (dfa, _) = parse("a\na\nstart\n0\n0\n", false).unwrap();
        assert_eq!(dfa.get_start_state(), 0);

        let (dfa, word) = parse("", false).unwrap();
        assert_eq!(word, "");
        assert_eq!(dfa.get_start_state(), 0);
    }

    #[test]
    fn test_strict_missing_line() {
        let err = parse("a\na\n", true).unwrap_err();
        match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::MissingLine(name)) => assert_eq!(*name, "start state"),
            other => panic!("Expected a missing line error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_lines_are_not_rows() {
        let (dfa, _) = parse("a\na\n0\n0\n0\n\n\n", true).unwrap();
        assert_eq!(dfa.get_num_states(), 1);
    }

    #[test]
    fn test_strict_validates_table() {
        let err = parse("a\nab\n0\n1\n0;1\n0\n", true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DFAError>(),
            Some(&DFAError::RaggedRow(1, 1, 2))
        );

        // The same table loads leniently and only fails when the short row is used
        let (dfa, _) = parse("a\nab\n0\n1\n0;1\n0\n", false).unwrap();
        assert_eq!(dfa.run("bb"), Err(DFAError::MissingTransition(1, 'b')));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let (dfa, _) = parse("a\na\n 1 \n 0 ; 1\n1\n0 \n", true).unwrap();
        assert_eq!(dfa.get_start_state(), 1);
        assert_eq!(dfa.get_acceptor_states().iter_ones().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_huge_accepting_state() {
        let (dfa, word) = parse("a\na\n0\n1;18446744073709551615;40000000000\n0\n", false).unwrap();
        assert_eq!(dfa.get_acceptor_states().len(), 1);
        let result = dfa.run(&word).unwrap();
        assert!(!result.is_accepted());
        assert_eq!(result.get_path(), &[0, 0]);

        let err = parse("a\na\n0\n18446744073709551615\n0\n", true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DFAError>(),
            Some(&DFAError::AcceptStateOutOfRange(usize::MAX))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_dfa_file("test_data/does_not_exist.txt", false).unwrap_err();
        match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::FileOpenError(err_line)) => {
                assert!(err_line.contains("does_not_exist.txt"))
            }
            other => panic!("Expected a file open error, got {:?}", other),
        }
    }
}
