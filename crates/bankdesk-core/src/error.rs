use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankDeskError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic degenerate in {context}")]
    ArithmeticDegenerate { context: String },

    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BankDeskError {
    /// Stable reason code surfaced to callers alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            BankDeskError::InvalidInput { .. } => "INVALID_INPUT",
            BankDeskError::ArithmeticDegenerate { .. } => "ARITHMETIC_DEGENERATE",
            BankDeskError::UnknownBank(_) => "UNKNOWN_BANK",
            BankDeskError::InsufficientData(_) => "INSUFFICIENT_DATA",
            BankDeskError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for BankDeskError {
    fn from(e: serde_json::Error) -> Self {
        BankDeskError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = BankDeskError::InvalidInput {
            field: "term_years".into(),
            reason: "must be > 0".into(),
        };
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(err.to_string(), "Invalid input: term_years: must be > 0");
        assert_eq!(
            BankDeskError::UnknownBank("YESBANK".into()).code(),
            "UNKNOWN_BANK"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: BankDeskError = parse.unwrap_err().into();
        assert_eq!(err.code(), "SERIALIZATION_ERROR");
    }
}
