//! Read access to the document being edited.

use std::sync::{Arc, PoisonError, RwLock};

/// Supplies the document's current text.
///
/// Called at save time, so it must be cheap and must not block.
pub trait DocumentSource: Send + Sync {
    fn content(&self) -> String;
}

impl<F> DocumentSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn content(&self) -> String {
        self()
    }
}

/// A text buffer shared between the editing front end and the coordinator.
///
/// Cloning yields another handle to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    text: Arc<RwLock<String>>,
}

impl SharedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(RwLock::new(text.into())),
        }
    }

    /// Replace the whole buffer.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    /// Append a line, adding the newline.
    pub fn push_line(&self, line: &str) {
        let mut text = self.text.write().unwrap_or_else(PoisonError::into_inner);
        text.push_str(line);
        text.push('\n');
    }

    pub fn clear(&self) {
        self.text
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.text.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSource for SharedDocument {
    fn content(&self) -> String {
        self.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_document_handles_see_same_text() {
        let doc = SharedDocument::new("hello");
        let other = doc.clone();

        other.push_line(" world");
        assert_eq!(doc.content(), "hello world\n");

        doc.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_closure_source() {
        let source = || "from closure".to_string();
        assert_eq!(DocumentSource::content(&source), "from closure");
    }
}
