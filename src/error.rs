use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid value for `{property}`: {reason}")]
    InvalidConfiguration {
        property: &'static str,
        reason: String,
    },

    #[error("property `{property}` expects {expected}, got {found}")]
    PropertyTypeMismatch {
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("subscription {subscription} is not registered on this collection")]
    NotSubscribed { subscription: u64 },

    #[error("re-entrant call rejected: {operation}")]
    Reentrancy { operation: &'static str },

    #[error("calculation engine failure: {0}")]
    Engine(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
