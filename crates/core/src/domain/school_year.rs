pub const DEFAULT_WINDOW_SIZE: u8 = 6;

/// The recent school years a request can target, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchoolYearWindow {
    labels: Vec<String>,
}

impl SchoolYearWindow {
    pub fn recent(current_year: i32, size: u8) -> Self {
        let labels =
            (0..i32::from(size)).map(|offset| (current_year - offset).to_string()).collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn current(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Returns the normalized label when `value` names a year of the window.
    pub fn resolve(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        self.labels.iter().map(String::as_str).find(|label| *label == value)
    }
}

#[cfg(test)]
mod tests {
    use super::{SchoolYearWindow, DEFAULT_WINDOW_SIZE};

    #[test]
    fn window_lists_years_newest_first() {
        let window = SchoolYearWindow::recent(2026, DEFAULT_WINDOW_SIZE);

        assert_eq!(window.labels(), ["2026", "2025", "2024", "2023", "2022", "2021"]);
        assert_eq!(window.current(), Some("2026"));
    }

    #[test]
    fn resolve_trims_and_rejects_years_outside_the_window() {
        let window = SchoolYearWindow::recent(2026, 3);

        assert_eq!(window.resolve(" 2025 "), Some("2025"));
        assert_eq!(window.resolve("2023"), None);
        assert_eq!(window.resolve("2027"), None);
        assert_eq!(window.resolve(""), None);
    }
}
