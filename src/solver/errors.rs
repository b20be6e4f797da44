use std::io;
use itertools::Itertools;
use thiserror::Error;





#[derive(Debug, Error)]
#[error("Malformed input{}. {}", .line.map(|x| format!(" (line {})", x)).unwrap_or_default(), .description)]
pub struct MalformedInputError {
    pub line: Option<usize>,
    pub description: String,
}

// MalformedInputError::MalformedInputError
impl MalformedInputError {
    #[inline]
    pub fn new(description: impl Into<String>) -> Self {
        MalformedInputError { line: None, description: description.into() }
    }

    #[inline]
    pub fn at_line(line: usize, description: impl Into<String>) -> Self {
        MalformedInputError { line: Some(line), description: description.into() }
    }
}



#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown model type {0}. Possible values: scf, mcf, mtz.")]
pub struct UnknownModelTypeError(pub String);



#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("The model could not be handed to the solver. Offending constructs: {}.", .constructs.iter().join("; "))]
    CannotExtract { constructs: Vec<String> },
    #[error("The solver backend failed. {0}")]
    Backend(String),
}



#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Values of {group} are unavailable in the solver solution ({missing} of {requested} missing).")]
pub struct ExtractionError {
    pub group: String,
    pub missing: usize,
    pub requested: usize,
}



#[derive(Debug, Error)]
pub enum KmstError {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    #[error(transparent)]
    UnknownModelType(#[from] UnknownModelTypeError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("I/O failure. {0}")]
    Io(#[from] io::Error),
    #[error("Run log failure. {0}")]
    Csv(#[from] csv::Error),
    #[error("Formulations disagree on the optimum. {0}")]
    Disagreement(String),
    #[error("Unknown failure. {0}")]
    Unknown(String),
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_mentions_line() {
        let error = MalformedInputError::at_line(3, "Endpoint 7 is out of range.");
        assert_eq!(error.to_string(), "Malformed input (line 3). Endpoint 7 is out of range.");
        assert_eq!(MalformedInputError::new("Empty file.").to_string(), "Malformed input. Empty file.");
    }

    #[test]
    fn cannot_extract_lists_constructs() {
        let error = SolverError::CannotExtract { constructs: vec!["x(0,1)".to_string(), "flow(2)".to_string()] };
        assert!(error.to_string().ends_with("Offending constructs: x(0,1); flow(2)."));
    }

    #[test]
    fn umbrella_keeps_message() {
        let error: KmstError = UnknownModelTypeError("flow".to_string()).into();
        assert_eq!(error.to_string(), "Unknown model type flow. Possible values: scf, mcf, mtz.");
    }
}
