use thiserror::Error;

use crate::domain::request::{RequestId, RequestStatus};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a recognized document type is required")]
    MissingDocumentType,
    #[error("a school year from the recent-years window is required")]
    MissingYear,
    #[error("copies must be a whole number of at least 1")]
    InvalidCopies,
    #[error("copies must not exceed {max}")]
    TooManyCopies { max: u32 },
    #[error("reason must contain at least 3 characters")]
    ReasonTooShort,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CancelError {
    #[error("request {id} is {status:?} and can no longer be cancelled")]
    NotCancelable { id: RequestId, status: RequestStatus },
    #[error("request {0} was not found")]
    NotFound(RequestId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("a decision reason of at least 3 characters is required")]
    ReasonRequired,
    #[error("request {id} is already {status:?}")]
    AlreadyFinalized { id: RequestId, status: RequestStatus },
    #[error("request {0} was not found")]
    NotFound(RequestId),
}

/// Alert style the portal uses to surface an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Cancel(#[from] CancelError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

impl LifecycleError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingDocumentType) => "missing_document_type",
            Self::Validation(ValidationError::MissingYear) => "missing_year",
            Self::Validation(ValidationError::InvalidCopies) => "invalid_copies",
            Self::Validation(ValidationError::TooManyCopies { .. }) => "too_many_copies",
            Self::Validation(ValidationError::ReasonTooShort) => "reason_too_short",
            Self::Cancel(CancelError::NotCancelable { .. }) => "not_cancelable",
            Self::Cancel(CancelError::NotFound(_)) | Self::Decision(DecisionError::NotFound(_)) => {
                "not_found"
            }
            Self::Decision(DecisionError::ReasonRequired) => "reason_required",
            Self::Decision(DecisionError::AlreadyFinalized { .. }) => "already_finalized",
        }
    }

    pub fn alert_level(&self) -> AlertLevel {
        match self {
            Self::Validation(
                ValidationError::InvalidCopies | ValidationError::TooManyCopies { .. },
            ) => AlertLevel::Warning,
            Self::Validation(ValidationError::ReasonTooShort) => AlertLevel::Info,
            _ => AlertLevel::Error,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingDocumentType) => {
                "Sélectionnez le type de document."
            }
            Self::Validation(ValidationError::MissingYear) => "Indiquez l'année scolaire.",
            Self::Validation(ValidationError::InvalidCopies) => {
                "Le nombre d'exemplaires doit être au moins 1."
            }
            Self::Validation(ValidationError::TooManyCopies { .. }) => {
                "Le nombre d'exemplaires demandé est trop élevé."
            }
            Self::Validation(ValidationError::ReasonTooShort) => {
                "Expliquez brièvement la raison (au moins 3 caractères)."
            }
            Self::Cancel(CancelError::NotCancelable { .. }) => {
                "Vous ne pouvez annuler qu'une demande en cours."
            }
            Self::Cancel(CancelError::NotFound(_)) | Self::Decision(DecisionError::NotFound(_)) => {
                "Cette demande n'existe plus."
            }
            Self::Decision(DecisionError::ReasonRequired) => "Veuillez indiquer la raison.",
            Self::Decision(DecisionError::AlreadyFinalized { .. }) => {
                "Cette demande a déjà été traitée."
            }
        }
    }
}
