use crate::fa::{RunResult, FA};
use color_eyre::eyre::Result;

pub const ACCEPTED: &str = "ACCEPTED";
pub const REJECTED: &str = "REJECTED";

const PATH_SEPARATOR: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The verdict on one line and the path on the next
    #[default]
    Text,
    Json,
}

pub fn verdict(accepted: bool) -> &'static str {
    if accepted {
        ACCEPTED
    } else {
        REJECTED
    }
}

/// Join the visited states as `start/state1/.../stateN`
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(|state| state.to_string())
        .collect::<Vec<String>>()
        .join(PATH_SEPARATOR)
}

/// Render the result of a run in the requested format
pub fn render(result: &RunResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "{}\n{}",
            verdict(result.is_accepted()),
            format_path(result.get_path())
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

/// Run the word through the automaton and render the outcome
pub fn validate<T>(fa: &T, word: &str, format: OutputFormat) -> Result<String>
where
    T: FA,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    let result = fa.run(word)?;
    render(&result, format)
}
