use thiserror::Error;

/// Errors reported by the engine and its building blocks.
#[derive(Error, Debug)]
pub enum StakitError {
    /// The rule string could not be parsed
    #[error("Could not parse rule: {0}")]
    ParseError(String),

    /// The name is not part of the declared variables
    #[error("There is no variable named '{0}'")]
    UnknownVariable(String),

    /// The same name was declared twice
    #[error("The variable '{0}' is declared more than once")]
    DuplicateVariable(String),

    /// The name is not a valid identifier
    #[error("The name '{0}' is invalid")]
    InvalidName(String),

    /// The same variable was pinned to both values in a single evidence call
    #[error("The evidence assigns conflicting values to '{0}'")]
    ConflictingEvidence(String),

    /// A query requiring a compiled valid set was made before compilation
    #[error("The engine has not been compiled")]
    NotCompiled,
}
