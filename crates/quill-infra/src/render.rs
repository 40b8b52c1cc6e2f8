//! CommonMark rendering for post bodies.

use pulldown_cmark::{Options, Parser, html};

use quill_core::ports::MarkupRenderer;

/// Markdown renderer using pulldown-cmark with the common extensions.
pub struct CommonMarkRenderer {
    options: Options,
}

impl CommonMarkRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for CommonMarkRenderer {
    fn render(&self, markup: &str) -> String {
        let parser = Parser::new_ext(markup, self.options);
        let mut out = String::with_capacity(markup.len() + markup.len() / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_fragment() {
        let html = CommonMarkRenderer::new().render("# Title\n\nSome *text*.");
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_void_tags_are_self_closed() {
        let html = CommonMarkRenderer::new().render("a\n\n---\n");
        assert!(html.contains("<hr />"));
    }

    #[test]
    fn test_empty_body_renders_empty() {
        assert_eq!(CommonMarkRenderer::new().render(""), "");
    }
}
