use serde::Deserialize;

use crate::domain::request::DocumentType;
use crate::domain::school_year::SchoolYearWindow;
use crate::errors::ValidationError;

pub const MIN_REASON_CHARS: usize = 3;
pub const MAX_COPIES: u32 = 20;

/// The request form as the requester filled it in, every field still raw text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRequestInput {
    pub document_type: String,
    pub school_year: String,
    pub copies: String,
    pub reason: String,
}

impl CreateRequestInput {
    pub fn new(
        document_type: DocumentType,
        school_year: impl Into<String>,
        copies: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.label().to_string(),
            school_year: school_year.into(),
            copies: copies.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub document_type: DocumentType,
    pub school_year: String,
    pub copies: u32,
    pub reason: String,
}

/// Checks the form in the order the portal does; the first failing field wins.
pub fn validate(
    input: &CreateRequestInput,
    years: &SchoolYearWindow,
) -> Result<ValidatedRequest, ValidationError> {
    let document_type = DocumentType::parse_input(&input.document_type)
        .ok_or(ValidationError::MissingDocumentType)?;
    let school_year = years.resolve(&input.school_year).ok_or(ValidationError::MissingYear)?;
    let copies = parse_copies(&input.copies)?;
    let reason = input.reason.trim();
    if !meets_min_reason(reason) {
        return Err(ValidationError::ReasonTooShort);
    }

    Ok(ValidatedRequest {
        document_type,
        school_year: school_year.to_string(),
        copies,
        reason: reason.to_string(),
    })
}

pub(crate) fn meets_min_reason(text: &str) -> bool {
    text.trim().chars().count() >= MIN_REASON_CHARS
}

fn parse_copies(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    match raw.parse::<u64>() {
        Ok(0) => Err(ValidationError::InvalidCopies),
        Ok(copies) => u32::try_from(copies)
            .ok()
            .filter(|copies| *copies <= MAX_COPIES)
            .ok_or(ValidationError::TooManyCopies { max: MAX_COPIES }),
        // Digits that overflow are still a count, just far too large.
        Err(_) if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) => {
            Err(ValidationError::TooManyCopies { max: MAX_COPIES })
        }
        Err(_) => Err(ValidationError::InvalidCopies),
    }
}
