//! Unified error types for the workflow core.
//!
//! Every failure surfaces as a specific [`Error`] variant so callers can tell
//! exactly which precondition was violated. [`Error::kind`] folds those variants
//! into the coarse [`ErrorKind`] taxonomy that the HTTP layer maps to responses.

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An entity id did not resolve.
    NotFound,
    /// The requested status change is not permitted from the current state.
    InvalidTransition,
    /// The at-most-one-selected-quotation invariant would be violated.
    ConflictingSelection,
    /// No authenticated administrator was supplied.
    Unauthorized,
    /// Malformed input, such as an unknown enum value.
    ValidationError,
    /// Storage, configuration, or environment failure.
    Internal,
}

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unauthorized: an authenticated administrator is required")]
    Unauthorized,

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Diagnosis not found: {id}")]
    DiagnosisNotFound { id: i64 },

    #[error("Quotation not found: {id}")]
    QuotationNotFound { id: i64 },

    #[error("No quotation from partner {partner_id} for diagnosis {diagnosis_id}")]
    PartnerQuotationNotFound { diagnosis_id: i64, partner_id: i64 },

    #[error("Order not found: {id}")]
    OrderNotFound { id: i64 },

    #[error("Partner application not found: {id}")]
    ApplicationNotFound { id: i64 },

    #[error("Partner not found: {id}")]
    PartnerNotFound { id: i64 },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    #[error("Inquiry not found: {id}")]
    InquiryNotFound { id: i64 },

    #[error("Admin not found: {id}")]
    AdminNotFound { id: i64 },

    #[error("Column not found: {id}")]
    ColumnNotFound { id: i64 },

    #[error("Quotation {quotation_id} belongs to diagnosis {actual}, not {expected}")]
    QuotationNotInDiagnosis {
        quotation_id: i64,
        expected: i64,
        actual: i64,
    },

    #[error("Diagnosis {diagnosis_id} already has a decided contractor")]
    DiagnosisAlreadyDecided { diagnosis_id: i64 },

    #[error("Diagnosis {diagnosis_id} has been cancelled")]
    DiagnosisCancelled { diagnosis_id: i64 },

    #[error("Diagnosis {diagnosis_id} already has quotation {selected_quotation_id} selected")]
    AnotherQuotationAlreadySelected {
        diagnosis_id: i64,
        selected_quotation_id: i64,
    },

    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Partner {partner_id} already quoted diagnosis {diagnosis_id}")]
    DuplicateQuotation { diagnosis_id: i64, partner_id: i64 },

    #[error("Partner {partner_id} may not quote diagnosis {diagnosis_id}")]
    PartnerNotEligible { diagnosis_id: i64, partner_id: i64 },

    #[error("Application {application_id} was already provisioned as partner {partner_id}")]
    ApplicationAlreadyProvisioned {
        application_id: i64,
        partner_id: i64,
    },

    #[error("Partner {partner_id} still has {quotations} quotation(s)")]
    PartnerHasQuotations { partner_id: i64, quotations: u64 },
}

impl Error {
    /// Classifies the error into the coarse taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => ErrorKind::Internal,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidValue { .. }
            | Self::QuotationNotInDiagnosis { .. }
            | Self::DuplicateQuotation { .. }
            | Self::PartnerNotEligible { .. } => ErrorKind::ValidationError,
            Self::DiagnosisNotFound { .. }
            | Self::QuotationNotFound { .. }
            | Self::PartnerQuotationNotFound { .. }
            | Self::OrderNotFound { .. }
            | Self::ApplicationNotFound { .. }
            | Self::PartnerNotFound { .. }
            | Self::CustomerNotFound { .. }
            | Self::InquiryNotFound { .. }
            | Self::AdminNotFound { .. }
            | Self::ColumnNotFound { .. } => ErrorKind::NotFound,
            Self::DiagnosisAlreadyDecided { .. }
            | Self::DiagnosisCancelled { .. }
            | Self::InvalidTransition { .. }
            | Self::ApplicationAlreadyProvisioned { .. }
            | Self::PartnerHasQuotations { .. } => ErrorKind::InvalidTransition,
            Self::AnotherQuotationAlreadySelected { .. } => ErrorKind::ConflictingSelection,
        }
    }

    pub(crate) fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_errors_classify_per_taxonomy() {
        let conflict = Error::AnotherQuotationAlreadySelected {
            diagnosis_id: 3,
            selected_quotation_id: 8,
        };
        assert_eq!(conflict.kind(), ErrorKind::ConflictingSelection);
        assert_eq!(
            Error::DiagnosisAlreadyDecided { diagnosis_id: 3 }.kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            Error::QuotationNotInDiagnosis {
                quotation_id: 1,
                expected: 2,
                actual: 3
            }
            .kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(Error::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            Error::QuotationNotFound { id: 4 }.kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = Error::from(sea_orm::DbErr::Custom("boom".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("boom"));
    }
}
