use thiserror::Error;

/// Errors emitted while producing a learning path.
///
/// Resource lookups never surface here: an unverifiable resource is a normal
/// outcome handled inside the enricher.
#[derive(Debug, Error)]
pub enum PathError {
    /// Raised when the goal or level is missing from the request.
    #[error("El objetivo y el nivel son requeridos.")]
    MissingInput,

    /// Raised when the text generation backend fails or returns nothing usable.
    #[error("text generation failed: {0}")]
    Generation(String),

    /// Raised when the generated text does not contain a learning path document.
    #[error("La IA devolvió una estructura de datos inesperada: {0}")]
    UnexpectedStructure(String),

    /// Raised when a backend cannot be built from the supplied settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PathError {
    /// Helper for generation backend failures.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Helper for unusable model output.
    pub fn unexpected_structure(message: impl Into<String>) -> Self {
        Self::UnexpectedStructure(message.into())
    }

    /// Helper for configuration problems.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the caller is at fault (as opposed to a backend failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingInput)
    }
}

pub type PathResult<T> = Result<T, PathError>;
