/// Error type for shader preprocessing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreprocessError {
    /// `#else` or `#endif` without an open conditional
    #[error("line {line}: #{directive} without matching #ifdef")]
    UnmatchedDirective { directive: &'static str, line: usize },
    /// `#ifdef` still open at end of input
    #[error("line {line}: conditional is never closed")]
    UnterminatedConditional { line: usize },
    #[error("line {line}: #{directive} requires an argument")]
    MissingArgument { directive: &'static str, line: usize },
    #[error("line {line}: unknown directive #{directive}")]
    UnknownDirective { directive: String, line: usize },
}
