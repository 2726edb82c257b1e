use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("supplier record invariant violation: {0}")]
    InvariantViolation(String),
}

/// Errors surfaced by the matching engine. Filtering, geo adjustment, and
/// ranking never fail for a non-empty catalog; their empty intermediate
/// results are absorbed by fallback policies instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("supplier catalog is empty")]
    EmptyCatalog,
    #[error("unknown supplier id `{0}`")]
    UnknownSupplier(String),
}

#[cfg(test)]
mod tests {
    use super::{DomainError, MatchError};

    #[test]
    fn match_errors_render_caller_facing_messages() {
        let invalid = MatchError::InvalidRequest("add at least one product".to_owned());
        assert_eq!(invalid.to_string(), "invalid request: add at least one product");
        assert_eq!(MatchError::EmptyCatalog.to_string(), "supplier catalog is empty");
        assert_eq!(
            MatchError::UnknownSupplier("acme-1".to_owned()).to_string(),
            "unknown supplier id `acme-1`"
        );
    }

    #[test]
    fn domain_error_names_the_violated_invariant() {
        let error = DomainError::InvariantViolation("base price must be positive".to_owned());
        assert!(error.to_string().contains("base price must be positive"));
    }
}
