use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub matched: bool,
}

/// Splits `text` into runs of matched and unmatched chars.
///
/// `indices` are char positions as produced by the matcher; positions past
/// the end of `text` are ignored.
pub fn spans(text: &str, indices: &[usize]) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::new();
    let mut wanted = indices.iter().copied().peekable();

    for (position, ch) in text.chars().enumerate() {
        while wanted.next_if(|index| *index < position).is_some() {}
        let matched = wanted.next_if_eq(&position).is_some();

        match out.last_mut() {
            Some(last) if last.matched == matched => last.text.push(ch),
            _ => out.push(Span {
                text: ch.to_string(),
                matched,
            }),
        }
    }

    out
}

/// Wraps matched runs in `open`/`close` markers.
///
/// With `escape_html` set, `&`, `<` and `>` in the row text are written as
/// entities; the markers themselves are emitted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
    escape_html: bool,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("<mark>", "</mark>").escaping_html(true)
    }
}

impl Highlighter {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            escape_html: false,
        }
    }

    pub fn escaping_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    /// Row text with no marked runs.
    pub fn plain(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.push_text(&mut out, text);
        out
    }

    pub fn render(&self, text: &str, indices: &[usize]) -> String {
        if indices.is_empty() {
            return self.plain(text);
        }

        let mut out = String::with_capacity(text.len() + indices.len() * 4);
        for span in spans(text, indices) {
            if span.matched {
                out.push_str(&self.open);
                self.push_text(&mut out, &span.text);
                out.push_str(&self.close);
            } else {
                self.push_text(&mut out, &span.text);
            }
        }
        out
    }

    fn push_text(&self, out: &mut String, text: &str) {
        if !self.escape_html {
            out.push_str(text);
            return;
        }
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{spans, Highlighter};

    #[test]
    fn wraps_adjacent_hits_in_one_marker() {
        let marker = Highlighter::new("[", "]");
        assert_eq!(marker.render("Facebook", &[0, 4]), "[F]ace[b]ook");
        assert_eq!(marker.render("github", &[0, 1, 2]), "[git]hub");
    }

    #[test]
    fn no_indices_returns_text_unchanged() {
        assert_eq!(Highlighter::default().render("plain", &[]), "plain");
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let marker = Highlighter::new("<", ">");
        assert_eq!(marker.render("ab", &[1, 9]), "a<b>");
    }

    #[test]
    fn html_in_row_text_is_escaped_outside_the_markers() {
        let marker = Highlighter::default();
        assert_eq!(
            marker.render("<b>R&D</b>", &[1]),
            "&lt;<mark>b</mark>&gt;R&amp;D&lt;/b&gt;"
        );
        assert_eq!(marker.render("a > b", &[]), "a &gt; b");
        assert_eq!(marker.plain("<img src=x>"), "&lt;img src=x&gt;");
    }

    #[test]
    fn raw_highlighter_leaves_text_alone() {
        let marker = Highlighter::new("[", "]");
        assert_eq!(marker.render("a<b", &[0]), "[a]<b");
        assert_eq!(marker.clone().escaping_html(true).render("a<b", &[0]), "[a]&lt;b");
    }

    #[test]
    fn spans_follow_char_positions() {
        let parts = spans("Ébène", &[0, 1]);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text, "Éb");
        assert!(parts[0].matched);
        assert_eq!(parts[1].text, "ène");
    }
}
