use std::str::FromStr;

use crate::domain::document::IssuedDocument;
use crate::domain::notification::Notification;
use crate::domain::request::{DocumentRequest, RequestStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RequestStatus),
}

impl StatusFilter {
    pub fn matches(self, status: RequestStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" | "tous" => Ok(Self::All),
            other => RequestStatus::parse_input(other)
                .map(Self::Only)
                .ok_or_else(|| format!("unknown status filter `{other}`")),
        }
    }
}

/// Anything listed on a portal screen with a status chip and a search box.
pub trait Searchable {
    fn status(&self) -> RequestStatus;
    /// Fields the text query is matched against, one at a time.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for DocumentRequest {
    fn status(&self) -> RequestStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.document_type.label(), self.school_year.as_str(), self.reason.as_str()]
    }
}

impl Searchable for Notification {
    fn status(&self) -> RequestStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.subtitle.as_str()]
    }
}

impl Searchable for IssuedDocument {
    fn status(&self) -> RequestStatus {
        IssuedDocument::status(self)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.format.as_str(), self.category.label()]
    }
}

/// Keeps the items matching both the status filter and the text query, in
/// their original order. The query must appear inside a single field; an
/// empty query matches everything.
pub fn filter<T>(items: &[T], status: StatusFilter, query: &str) -> Vec<T>
where
    T: Searchable + Clone,
{
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| status.matches(item.status()))
        .filter(|item| {
            needle.is_empty()
                || item.search_fields().iter().any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
