/// Markup renderer - turns post body source into an HTML fragment.
///
/// Rendering is a pure function and cannot fail; unsupported syntax is passed
/// through as text by implementations.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, markup: &str) -> String;
}
