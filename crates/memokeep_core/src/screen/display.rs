//! Display lines shared by both screens.

/// Shown when a line has no text to display.
pub const EMPTY_PLACEHOLDER: &str = "No text saved";

pub const SNAPSHOT_TITLE: &str = "Not persisted";
pub const HOME_PERSISTED_TITLE: &str = "Persisted text";
pub const DETAIL_PERSISTED_TITLE: &str = "Persisted";

/// Whether a line shows the snapshot or the durable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Snapshot,
    Persisted,
}

/// One titled line of screen output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub kind: LineKind,
    pub title: &'static str,
    pub text: String,
}

impl DisplayLine {
    /// Builds a line, substituting the placeholder for absent or empty text.
    pub fn new(kind: LineKind, title: &'static str, text: Option<&str>) -> Self {
        let text = match text {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => EMPTY_PLACEHOLDER.to_string(),
        };
        Self { kind, title, text }
    }

    /// `"<title>: <text>"`
    pub fn render(&self) -> String {
        format!("{}: {}", self.title, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayLine, LineKind, EMPTY_PLACEHOLDER};

    #[test]
    fn empty_and_absent_text_fall_back_to_placeholder() {
        let absent = DisplayLine::new(LineKind::Persisted, "Persisted", None);
        let empty = DisplayLine::new(LineKind::Snapshot, "Not persisted", Some(""));
        assert_eq!(absent.text, EMPTY_PLACEHOLDER);
        assert_eq!(empty.render(), format!("Not persisted: {EMPTY_PLACEHOLDER}"));
    }
}
