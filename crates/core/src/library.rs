use std::str::FromStr;

use crate::domain::document::{DocumentCategory, IssuedDocument};
use crate::filter::{filter, StatusFilter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(DocumentCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: DocumentCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" | "tous" => Ok(Self::All),
            other => DocumentCategory::parse_input(other)
                .map(Self::Only)
                .ok_or_else(|| format!("unknown document category `{other}`")),
        }
    }
}

/// Issued documents the session owner can browse, most recent issue date first.
#[derive(Clone, Debug, Default)]
pub struct DocumentLibrary {
    documents: Vec<IssuedDocument>,
}

impl DocumentLibrary {
    /// Files a document ahead of every document issued on the same day or earlier.
    pub fn file(&mut self, document: IssuedDocument) {
        let at = self
            .documents
            .iter()
            .position(|existing| existing.issued_on <= document.issued_on)
            .unwrap_or(self.documents.len());
        self.documents.insert(at, document);
    }

    pub fn documents(&self) -> &[IssuedDocument] {
        &self.documents
    }

    pub fn search(
        &self,
        category: CategoryFilter,
        status: StatusFilter,
        query: &str,
    ) -> Vec<IssuedDocument> {
        filter(&self.documents, status, query)
            .into_iter()
            .filter(|document| category.matches(document.category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::document::{DocumentCategory, IssuedDocument};
    use crate::domain::request::{Decision, RequestStatus};
    use crate::filter::StatusFilter;

    use super::{CategoryFilter, DocumentLibrary};

    fn document(
        id: &str,
        title: &str,
        category: DocumentCategory,
        (year, month, day): (i32, u32, u32),
        decision: Decision,
    ) -> IssuedDocument {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        IssuedDocument::new(id, title, category, date, decision)
    }

    fn library() -> DocumentLibrary {
        let mut library = DocumentLibrary::default();
        library.file(document(
            "doc-0002",
            "Relevé de notes S2",
            DocumentCategory::Bulletin,
            (2025, 7, 2),
            Decision::Approved,
        ));
        library.file(document(
            "doc-0001",
            "Certificat de scolarité",
            DocumentCategory::Attestation,
            (2025, 9, 18),
            Decision::Approved,
        ));
        library.file(document(
            "doc-0003",
            "Attestation de stage",
            DocumentCategory::Attestation,
            (2025, 5, 14),
            Decision::Rejected,
        ));
        library
    }

    fn ids(documents: &[IssuedDocument]) -> Vec<&str> {
        documents.iter().map(|document| document.id.as_str()).collect()
    }

    #[test]
    fn documents_are_ordered_by_issue_date() {
        assert_eq!(ids(library().documents()), vec!["doc-0001", "doc-0002", "doc-0003"]);
    }

    #[test]
    fn search_matches_title_or_format() {
        let library = library();

        assert_eq!(
            ids(&library.search(CategoryFilter::All, StatusFilter::All, "RELEVÉ")),
            vec!["doc-0002"]
        );
        assert_eq!(library.search(CategoryFilter::All, StatusFilter::All, "pdf").len(), 3);
        assert!(library.search(CategoryFilter::All, StatusFilter::All, "stage pdf").is_empty());
    }

    #[test]
    fn category_status_and_text_combine() {
        let library = library();
        let attestations = library.search(
            CategoryFilter::Only(DocumentCategory::Attestation),
            StatusFilter::All,
            "",
        );
        assert_eq!(ids(&attestations), vec!["doc-0001", "doc-0003"]);

        let rejected = library.search(
            CategoryFilter::Only(DocumentCategory::Attestation),
            StatusFilter::Only(RequestStatus::Rejected),
            "stage",
        );
        assert_eq!(ids(&rejected), vec!["doc-0003"]);

        let bulletins = library.search(
            CategoryFilter::Only(DocumentCategory::Bulletin),
            StatusFilter::All,
            "certificat",
        );
        assert!(bulletins.is_empty());
    }

    #[test]
    fn category_filter_parses_chip_labels() {
        assert_eq!("All".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "bulletin".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(DocumentCategory::Bulletin))
        );
        assert!("diplôme".parse::<CategoryFilter>().is_err());
    }
}
