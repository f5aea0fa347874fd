use std::fmt;

/// A `run-collection` argument failed validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationError {
    /// The offending argument, when the failure is tied to one field.
    pub field: Option<String>,
    /// Human-readable error description.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error that is not tied to a single field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a validation error for a named field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The collection engine could not execute a collection.
///
/// The message is reported to callers verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineError {
    /// Human-readable error description.
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EngineError {}

/// Business-level failure of a single `run-collection` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallError {
    /// The tool arguments were rejected.
    Validation(ValidationError),
    /// The engine failed to run the collection.
    Engine(EngineError),
}

impl CallError {
    /// The message reported to the caller.
    pub fn message(&self) -> &str {
        match self {
            CallError::Validation(error) => &error.message,
            CallError::Engine(error) => &error.message,
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CallError {}

impl From<ValidationError> for CallError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<EngineError> for CallError {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}
