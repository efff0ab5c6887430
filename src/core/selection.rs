//! Selection invariant checker.
//!
//! A diagnosis has at most one selected quotation. Once one is selected no
//! other may be, and the diagnosis is terminal. [`can_select`] is a pure
//! predicate over a snapshot of the entity graph; the workflow in
//! [`crate::core::decision`] evaluates it inside the same transaction that
//! performs the writes.

use crate::{
    entities::{diagnosis_request, quotation, status::DiagnosisStatus},
    errors::Error,
};

/// Why a quotation cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRejection {
    /// The diagnosis is already `DECIDED`, or this very quotation was already
    /// selected.
    AlreadyDecided,
    /// The diagnosis was cancelled.
    Cancelled,
    /// The quotation was submitted against a different diagnosis.
    QuotationMismatch,
    /// A different quotation of the diagnosis is already selected.
    AlreadySelectedElsewhere {
        /// The quotation currently holding the selection
        selected_quotation_id: i64,
    },
}

impl SelectionRejection {
    /// Converts the rejection into the error reported to callers.
    #[must_use]
    pub fn into_error(
        self,
        diagnosis: &diagnosis_request::Model,
        quotation: &quotation::Model,
    ) -> Error {
        match self {
            Self::AlreadyDecided => Error::DiagnosisAlreadyDecided {
                diagnosis_id: diagnosis.id,
            },
            Self::Cancelled => Error::DiagnosisCancelled {
                diagnosis_id: diagnosis.id,
            },
            Self::QuotationMismatch => Error::QuotationNotInDiagnosis {
                quotation_id: quotation.id,
                expected: diagnosis.id,
                actual: quotation.diagnosis_request_id,
            },
            Self::AlreadySelectedElsewhere {
                selected_quotation_id,
            } => Error::AnotherQuotationAlreadySelected {
                diagnosis_id: diagnosis.id,
                selected_quotation_id,
            },
        }
    }
}

/// Decides whether `quotation` may become the selected quotation of `diagnosis`.
///
/// `all_quotations` is every quotation currently recorded for the diagnosis.
/// Checks run in a fixed order: ownership, re-selection of the same quotation,
/// a competing selection, then the diagnosis status.
pub fn can_select(
    diagnosis: &diagnosis_request::Model,
    quotation: &quotation::Model,
    all_quotations: &[quotation::Model],
) -> std::result::Result<(), SelectionRejection> {
    if quotation.diagnosis_request_id != diagnosis.id {
        return Err(SelectionRejection::QuotationMismatch);
    }

    if quotation.is_selected {
        return Err(SelectionRejection::AlreadyDecided);
    }

    if let Some(selected) = all_quotations
        .iter()
        .find(|other| other.is_selected && other.id != quotation.id)
    {
        return Err(SelectionRejection::AlreadySelectedElsewhere {
            selected_quotation_id: selected.id,
        });
    }

    match diagnosis.status {
        DiagnosisStatus::Decided => Err(SelectionRejection::AlreadyDecided),
        DiagnosisStatus::Cancelled => Err(SelectionRejection::Cancelled),
        DiagnosisStatus::Designated | DiagnosisStatus::Recruiting | DiagnosisStatus::Comparing => {
            Ok(())
        }
    }
}
