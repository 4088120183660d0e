use clap::{Arg, Command};
use color_eyre::eyre::Result;
use dfasim::{read_dfa_file, render, visualize, OutputFormat, FA};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn cli() -> Command {
    Command::new("dfasim")
                        .version("1.0")
                        .about("Runs a word through a deterministic finite automaton read from a file and prints whether it is accepted along with the states visited")
                        .arg(
                            Arg::new("file")
                                .short('f')
                                .long("file")
                                .help("The automaton description: the word, the ';' separated alphabet, the start state, the ';' separated accepting states and one transition table row per line")
                                .value_name("FILE")
                                .value_parser(clap::value_parser!(String))
                                .default_value("in.txt")
                        )
                        .arg(
                            Arg::new("strict")
                                .short('s')
                                .long("strict")
                                .help("Reject malformed fields and missing lines instead of skipping them, and check the transition table before running")
                                .action(clap::ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("json")
                                .short('j')
                                .long("json")
                                .help("Print the result as JSON instead of the verdict and path lines")
                                .action(clap::ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("save-dfa")
                                .short('d')
                                .long("save-dfa")
                                .help("Save the DFA as NAME.dot and render it to NAME.jpg if Graphviz is installed")
                                .value_name("NAME")
                                .value_parser(clap::value_parser!(String))
                        )
                        .arg(
                            Arg::new("visualize")
                                .short('v')
                                .long("visualize")
                                .help("Visualize the DFA inside an interactive window, highlighting the states visited by the word")
                                .action(clap::ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("log-level")
                                .short('l')
                                .long("log-level")
                                .help("Verbosity of the diagnostics written to stderr")
                                .value_name("LEVEL")
                                .value_parser(LOG_LEVELS)
                                .default_value("warn")
                        )
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli().get_matches();

    let log_level = args
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn")
        .parse::<LevelFilter>()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(log_level),
        )
        .init();

    let file_path = args
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or("in.txt");

    let strict = args.get_flag("strict");

    let format = if args.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let (dfa, word) = read_dfa_file(file_path, strict)?;

    if let Some(name) = args.get_one::<String>("save-dfa") {
        dfa.show_fa(name)?;
    }

    debug!("Running word {:?}", word);
    let result = dfa.run(&word)?;

    println!("{}", render(&result, format)?);

    if args.get_flag("visualize") {
        visualize(&dfa, Some(&result))?;
    }

    Ok(())
}
