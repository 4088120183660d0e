mod integration_tests_helper {

    use dfasim::{read_dfa_file, DFA, FA};

    pub fn get_dfa(file_path: &str, strict: bool) -> (DFA, String) {
        let loaded = read_dfa_file(file_path, strict);

        // assert that reading the file was successful
        assert!(loaded.is_ok());

        loaded.unwrap()
    }

    pub fn run_text(file_path: &str) -> String {
        let (dfa, word) = get_dfa(file_path, false);
        let result = dfa.run(&word);

        // assert that the run succeeded
        assert!(result.is_ok());

        dfasim::render(&result.unwrap(), dfasim::OutputFormat::Text).unwrap()
    }
}

mod integration_tests {
    use crate::integration_tests_helper::{get_dfa, run_text};

    use dfasim::loader::LoaderError;
    use dfasim::{read_dfa_file, validate, DFAError, OutputFormat, FA};

    #[test]
    fn test_accepted_word() {
        assert_eq!(run_text("test_data/ends_in_one_accept.txt"), "ACCEPTED\n0/1/0/1");
    }

    #[test]
    fn test_rejected_word() {
        assert_eq!(run_text("test_data/ends_in_one_reject.txt"), "REJECTED\n0/1/0/0");
    }

    #[test]
    fn test_empty_word() {
        assert_eq!(run_text("test_data/empty_word.txt"), "ACCEPTED\n2");

        let (dfa, word) = get_dfa("test_data/empty_word.txt", true);
        assert_eq!(word, "");
        assert_eq!(dfa.get_num_states(), 3);
    }

    #[test]
    fn test_unknown_symbol() {
        let (dfa, word) = get_dfa("test_data/unknown_symbol.txt", true);

        let err = validate(&dfa, &word, OutputFormat::Text).unwrap_err();

        let err = err.downcast_ref::<DFAError>().unwrap();

        match err {
            DFAError::UnknownSymbol(symbol, position) => {
                assert_eq!(*symbol, 'c');
                assert_eq!(*position, 2);
            }
            _ => panic!("Expected an unknown symbol error, got {:?}", err),
        }
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_malformed_fields() {
        let (dfa, word) = get_dfa("test_data/malformed_fields.txt", false);
        let accept_states: Vec<usize> = dfa.get_acceptor_states().iter_ones().collect();
        assert_eq!(accept_states, vec![1, 2]);
        assert_eq!(
            validate(&dfa, &word, OutputFormat::Text).unwrap(),
            "ACCEPTED\n0/1/2"
        );

        let err = read_dfa_file("test_data/malformed_fields.txt", true).unwrap_err();
        match err.downcast_ref::<LoaderError>() {
            Some(LoaderError::MalformedField(line_number, field)) => {
                assert_eq!(*line_number, 4);
                assert_eq!(field, "x");
            }
            _ => panic!("Expected a malformed field error"),
        }
    }

    #[test]
    fn test_ragged_table() {
        let (dfa, word) = get_dfa("test_data/ragged.txt", false);
        assert_eq!(dfa.run(&word), Err(DFAError::MissingTransition(1, 'b')));

        let err = read_dfa_file("test_data/ragged.txt", true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DFAError>(),
            Some(&DFAError::RaggedRow(1, 1, 2))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_dfa_file("test_data/missing.txt", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoaderError>(),
            Some(LoaderError::FileOpenError(_))
        ));
    }

    #[test]
    fn test_json_output() {
        let (dfa, word) = get_dfa("test_data/ends_in_one_reject.txt", true);
        let json = validate(&dfa, &word, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["accepted"], serde_json::json!(false));
        assert_eq!(value["path"], serde_json::json!([0, 1, 0, 0]));
    }
}
