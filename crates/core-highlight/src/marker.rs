//! Highlight marker text inserted around each occurrence.

/// Class carried by the default `<mark>` element.
pub const DEFAULT_MARK_CLASS: &str = "bg-yellow-200 text-black";

/// Opening and closing text wrapped around a matched occurrence.
///
/// The marker is inserted verbatim; neither it nor the surrounding line is
/// escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub open: String,
    pub close: String,
}

impl Marker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `<mark class="...">` / `</mark>` pair for the given class list.
    pub fn with_class(class: &str) -> Self {
        Self::new(format!("<mark class=\"{class}\">"), "</mark>")
    }

    /// Write `text` wrapped in this marker into `out`.
    pub(crate) fn wrap_into(&self, out: &mut String, text: &str) {
        out.reserve(self.open.len() + text.len() + self.close.len());
        out.push_str(&self.open);
        out.push_str(text);
        out.push_str(&self.close);
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::with_class(DEFAULT_MARK_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_is_yellow_mark() {
        let m = Marker::default();
        assert_eq!(m.open, r#"<mark class="bg-yellow-200 text-black">"#);
        assert_eq!(m.close, "</mark>");
    }

    #[test]
    fn wrap_into_appends() {
        let mut out = String::from("a");
        Marker::new("[", "]").wrap_into(&mut out, "b");
        assert_eq!(out, "a[b]");
    }
}
