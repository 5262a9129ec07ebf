use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use course_core::highlight::{Language, highlight_keywords};

use crate::Clock;
use crate::error::ClipboardError;

/// Transient label shown after a successful copy.
pub const COPY_FEEDBACK_LABEL: &str = "Copied!";

/// How long the feedback label stays before reverting.
#[must_use]
pub fn copy_feedback_window() -> Duration {
    Duration::seconds(2)
}

/// Injected clipboard capability.
///
/// The write is asynchronous and not cancellable; nothing else waits on it.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Writes the text to the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError` when the clipboard is denied or unavailable.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that accepts every write and discards it.
///
/// Stand-in for environments without a real clipboard (headless runs,
/// tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClipboard;

#[async_trait]
impl Clipboard for NoopClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Ok(())
    }
}

/// A code snippet paired with its optional `language-…` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    code: String,
    language_marker: Option<String>,
}

impl CodeBlock {
    #[must_use]
    pub fn new(code: impl Into<String>, language_marker: Option<String>) -> Self {
        Self {
            code: code.into(),
            language_marker,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language_marker
            .as_deref()
            .and_then(Language::from_marker)
    }
}

/// Copy-trigger state for one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyButton {
    label: String,
    copied_until: Option<DateTime<Utc>>,
}

impl CopyButton {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            copied_until: None,
        }
    }

    #[must_use]
    pub fn original_label(&self) -> &str {
        &self.label
    }
}

/// Copy affordance and cosmetic highlighting for code blocks.
#[derive(Clone)]
pub struct CodeBlockService {
    clock: Clock,
    clipboard: Arc<dyn Clipboard>,
}

impl CodeBlockService {
    #[must_use]
    pub fn new(clock: Clock, clipboard: Arc<dyn Clipboard>) -> Self {
        Self { clock, clipboard }
    }

    /// Writes the block's code to the clipboard.
    ///
    /// On success the button label reads [`COPY_FEEDBACK_LABEL`] for a fixed
    /// two-second window; a re-copy inside the window just re-arms the same
    /// deadline, which is harmless. On failure the error goes to the
    /// diagnostic log and the label is left untouched; there is no
    /// user-visible error state. Returns whether the write succeeded.
    pub async fn copy(&self, block: &CodeBlock, button: &mut CopyButton) -> bool {
        match self.clipboard.write_text(block.code()).await {
            Ok(()) => {
                button.copied_until = Some(self.clock.now() + copy_feedback_window());
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to copy code");
                false
            }
        }
    }

    /// The label the trigger should currently show.
    #[must_use]
    pub fn label<'a>(&self, button: &'a CopyButton) -> &'a str {
        match button.copied_until {
            Some(until) if self.clock.now() < until => COPY_FEEDBACK_LABEL,
            _ => button.original_label(),
        }
    }

    /// Applies the keyword highlighter when the block carries a recognized
    /// language marker; otherwise returns the code unchanged.
    #[must_use]
    pub fn highlighted(&self, block: &CodeBlock) -> String {
        match block.language() {
            Some(language) => highlight_keywords(block.code(), language),
            None => block.code().to_owned(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::{fixed_clock, fixed_now};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.writes.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    struct DeniedClipboard;

    #[async_trait]
    impl Clipboard for DeniedClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("permission denied".into()))
        }
    }

    fn block() -> CodeBlock {
        CodeBlock::new("const x = 1;", Some("javascript".into()))
    }

    #[tokio::test]
    async fn copy_writes_the_code_and_swaps_the_label() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let svc = CodeBlockService::new(fixed_clock(), clipboard.clone());
        let mut button = CopyButton::new("Copy");

        assert!(svc.copy(&block(), &mut button).await);
        assert_eq!(clipboard.writes.lock().unwrap().as_slice(), ["const x = 1;"]);
        assert_eq!(svc.label(&button), COPY_FEEDBACK_LABEL);
    }

    #[tokio::test]
    async fn label_reverts_after_the_two_second_window() {
        let svc = CodeBlockService::new(fixed_clock(), Arc::new(NoopClipboard));
        let mut button = CopyButton::new("Copy");
        svc.copy(&block(), &mut button).await;

        let later = CodeBlockService::new(
            Clock::fixed(fixed_now() + Duration::seconds(3)),
            Arc::new(NoopClipboard),
        );
        assert_eq!(later.label(&button), "Copy");
    }

    #[tokio::test]
    async fn recopy_rearms_the_same_deadline() {
        let svc = CodeBlockService::new(fixed_clock(), Arc::new(NoopClipboard));
        let mut button = CopyButton::new("Copy");
        svc.copy(&block(), &mut button).await;
        svc.copy(&block(), &mut button).await;
        assert_eq!(svc.label(&button), COPY_FEEDBACK_LABEL);
        assert_eq!(button.copied_until, Some(fixed_now() + Duration::seconds(2)));
    }

    #[tokio::test]
    async fn denied_clipboard_leaves_the_label_alone() {
        let svc = CodeBlockService::new(fixed_clock(), Arc::new(DeniedClipboard));
        let mut button = CopyButton::new("Copy");

        assert!(!svc.copy(&block(), &mut button).await);
        assert_eq!(svc.label(&button), "Copy");
    }

    #[tokio::test]
    async fn highlighting_requires_a_known_marker() {
        let svc = CodeBlockService::new(fixed_clock(), Arc::new(NoopClipboard));
        assert!(svc.highlighted(&block()).contains("<span class=\"keyword\">"));

        let plain = CodeBlock::new("const x = 1;", None);
        assert_eq!(svc.highlighted(&plain), "const x = 1;");

        let unknown = CodeBlock::new("const x = 1;", Some("python".into()));
        assert_eq!(svc.highlighted(&unknown), "const x = 1;");
    }
}
