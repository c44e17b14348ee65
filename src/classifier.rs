//! Editor-side plumbing around the marker scanner: classification types,
//! the bold format, and the classifier the editor calls once per span.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::error::BoldTodoError;
use crate::parser::{CommentMarkerScanner, MatchRange, ScanInput};

/// Name of the classification type given to marker tokens.
pub const CLASSIFICATION_NAME: &str = "TodoClassifier";

/// A named classification that formats attach to.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassificationType {
    name: String,
}

impl ClassificationType {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of classification types, filled once at startup.
#[derive(Debug, Default)]
pub struct ClassificationTypeRegistry {
    types: HashMap<String, Arc<ClassificationType>>,
}

impl ClassificationTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str) -> Result<Arc<ClassificationType>, BoldTodoError> {
        if self.types.contains_key(name) {
            return Err(BoldTodoError::DuplicateClassification(name.to_string()));
        }
        let ty = Arc::new(ClassificationType {
            name: name.to_string(),
        });
        self.types.insert(name.to_string(), Arc::clone(&ty));
        debug!("registered classification type {}", name);
        Ok(ty)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ClassificationType>> {
        self.types.get(name).cloned()
    }
}

/// How text of a classification is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDefinition {
    pub classification: String,
    pub name: String,
    pub display_name: String,
    pub user_visible: bool,
    pub bold: bool,
    /// Formats this one is applied after.
    pub order_after: Vec<String>,
}

impl FormatDefinition {
    /// Bold, user-visible, applied after identifier highlighting.
    pub fn todo() -> Self {
        FormatDefinition {
            classification: CLASSIFICATION_NAME.to_string(),
            name: CLASSIFICATION_NAME.to_string(),
            display_name: CLASSIFICATION_NAME.to_string(),
            user_visible: true,
            bold: true,
            order_after: vec!["identifier".to_string()],
        }
    }
}

/// Register the marker classification type and return its format.
pub fn register_defaults(
    registry: &mut ClassificationTypeRegistry,
) -> Result<FormatDefinition, BoldTodoError> {
    registry.register(CLASSIFICATION_NAME)?;
    Ok(FormatDefinition::todo())
}

/// A window into a document, in byte coordinates.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotSpan<'a> {
    document: &'a str,
    start: usize,
    length: usize,
}

impl<'a> SnapshotSpan<'a> {
    pub fn new(document: &'a str, start: usize, length: usize) -> Result<Self, BoldTodoError> {
        let end = start.saturating_add(length);
        if end > document.len()
            || !document.is_char_boundary(start)
            || !document.is_char_boundary(end)
        {
            return Err(BoldTodoError::SpanOutOfBounds {
                start,
                end,
                len: document.len(),
            });
        }
        Ok(SnapshotSpan {
            document,
            start,
            length,
        })
    }

    /// Span covering the whole document.
    pub fn whole(document: &'a str) -> Self {
        SnapshotSpan {
            document,
            start: 0,
            length: document.len(),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn text(&self) -> &'a str {
        &self.document[self.start..self.start + self.length]
    }
}

/// A classified range of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSpan {
    pub range: MatchRange,
    pub classification: Arc<ClassificationType>,
}

/// Payload of a classification-changed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationChangedEvent {
    pub start: usize,
    pub length: usize,
}

type Handler = Arc<dyn Fn(&ClassificationChangedEvent) + Send + Sync>;

/// Subscribers that want to know when a region must be classified again.
#[derive(Default)]
pub struct ClassificationChanged {
    handlers: Mutex<Vec<Handler>>,
}

impl ClassificationChanged {
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&ClassificationChangedEvent) + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Handlers run without the lock held, so they may subscribe or raise.
    pub fn raise(&self, event: ClassificationChangedEvent) {
        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in &handlers {
            handler(&event);
        }
    }
}

impl std::fmt::Debug for ClassificationChanged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .handlers
            .lock()
            .map(|h| h.len())
            .unwrap_or_default();
        f.debug_struct("ClassificationChanged")
            .field("handlers", &count)
            .finish()
    }
}

/// Something that classifies spans of a document.
pub trait Classifier {
    fn classification_spans(&self, span: &SnapshotSpan<'_>) -> Vec<ClassificationSpan>;
}

/// Classifies `todo`/`hack` markers inside comments.
#[derive(Debug)]
pub struct TodoClassifier {
    classification: Arc<ClassificationType>,
    scanner: CommentMarkerScanner,
    changed: ClassificationChanged,
}

impl TodoClassifier {
    pub fn new(registry: &ClassificationTypeRegistry) -> Result<Self, BoldTodoError> {
        Self::with_scanner(registry, CommentMarkerScanner::default())
    }

    pub fn with_scanner(
        registry: &ClassificationTypeRegistry,
        scanner: CommentMarkerScanner,
    ) -> Result<Self, BoldTodoError> {
        let classification = registry
            .get(CLASSIFICATION_NAME)
            .ok_or_else(|| BoldTodoError::UnknownClassification(CLASSIFICATION_NAME.to_string()))?;
        Ok(TodoClassifier {
            classification,
            scanner,
            changed: ClassificationChanged::default(),
        })
    }

    /// Never raised by the classifier itself; markers are found per span.
    pub fn classification_changed(&self) -> &ClassificationChanged {
        &self.changed
    }
}

impl Classifier for TodoClassifier {
    fn classification_spans(&self, span: &SnapshotSpan<'_>) -> Vec<ClassificationSpan> {
        self.scanner
            .scan(ScanInput::new(span.text(), span.start()))
            .into_iter()
            .map(|range| ClassificationSpan {
                range,
                classification: Arc::clone(&self.classification),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> ClassificationTypeRegistry {
        let mut registry = ClassificationTypeRegistry::new();
        register_defaults(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry();
        let ty = registry.get(CLASSIFICATION_NAME).unwrap();
        assert_eq!(ty.name(), "TodoClassifier");
        assert!(registry.get("comment").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = registry();
        let err = registry.register(CLASSIFICATION_NAME).unwrap_err();
        assert!(matches!(err, BoldTodoError::DuplicateClassification(_)));
    }

    #[test]
    fn test_format_is_bold() {
        let format = FormatDefinition::todo();
        assert!(format.bold);
        assert!(format.user_visible);
        assert_eq!(format.display_name, "TodoClassifier");
        assert_eq!(format.order_after, vec!["identifier".to_string()]);
    }

    #[test]
    fn test_classifier_needs_registered_type() {
        let empty = ClassificationTypeRegistry::new();
        let err = TodoClassifier::new(&empty).unwrap_err();
        assert!(matches!(err, BoldTodoError::UnknownClassification(_)));
    }

    #[test]
    fn test_spans_use_document_coordinates() {
        let registry = registry();
        let classifier = TodoClassifier::new(&registry).unwrap();
        let document = "fn main() {}\n// TODO: later\n";
        let span = SnapshotSpan::new(document, 13, 15).unwrap();
        assert_eq!(span.text(), "// TODO: later\n");

        let spans = classifier.classification_spans(&span);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, MatchRange { offset: 16, length: 4 });
        assert_eq!(&document[spans[0].range.as_range()], "TODO");
        assert_eq!(spans[0].classification.name(), CLASSIFICATION_NAME);
    }

    #[test]
    fn test_non_comment_span_is_empty() {
        let registry = registry();
        let classifier = TodoClassifier::new(&registry).unwrap();
        let spans = classifier.classification_spans(&SnapshotSpan::whole("let todo = 1;"));
        assert!(spans.is_empty());
    }

    #[test]
    fn test_span_bounds_are_checked() {
        assert!(SnapshotSpan::new("abc", 2, 5).is_err());
        assert!(SnapshotSpan::new("é", 1, 0).is_err());
        assert!(SnapshotSpan::new("abc", 3, 0).is_ok());
    }

    #[test]
    fn test_classification_changed_reaches_subscribers() {
        let registry = registry();
        let classifier = TodoClassifier::new(&registry).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        classifier.classification_changed().subscribe(move |event| {
            counter.fetch_add(event.length, Ordering::SeqCst);
        });

        classifier
            .classification_changed()
            .raise(ClassificationChangedEvent { start: 0, length: 7 });
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_handler_can_use_channel_during_raise() {
        let changed = Arc::new(ClassificationChanged::default());
        let inner = Arc::clone(&changed);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        changed.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            inner.subscribe(|_| {});
        });

        let (tx, rx) = std::sync::mpsc::channel();
        let worker = Arc::clone(&changed);
        std::thread::spawn(move || {
            worker.raise(ClassificationChangedEvent { start: 0, length: 1 });
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(std::time::Duration::from_secs(3)).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(format!("{:?}", changed), "ClassificationChanged { handlers: 2 }");
    }
}
