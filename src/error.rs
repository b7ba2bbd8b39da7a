use thiserror::Error;

/// Errors recovered at the command boundary. None of them end the session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("Passage \"{0}\" not found")]
    NotFound(String),

    #[error("invalid passage: {0}")]
    InvalidPassage(&'static str),

    #[error("could not access passage data: {0}")]
    Persistence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Fold a storage failure into the domain taxonomy, keeping the full context chain.
    pub fn persistence(err: anyhow::Error) -> Self {
        AppError::Persistence(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_quotes_selector() {
        let err = AppError::NotFound("Psalm 23".to_string());
        assert_eq!(err.to_string(), "Passage \"Psalm 23\" not found");
    }

    #[test]
    fn test_persistence_keeps_context_chain() {
        let inner = anyhow::anyhow!("permission denied").context("writing library.json");
        let err = AppError::persistence(inner);
        let msg = err.to_string();
        assert!(msg.contains("writing library.json"));
        assert!(msg.contains("permission denied"));
    }
}
