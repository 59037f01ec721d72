use std::time::{Duration, Instant};

use crate::models::ServerEvent;

/// How long after the last keystroke inbound changes stay suppressed
pub const DEFAULT_TYPING_DEBOUNCE: Duration = Duration::from_millis(200);

/// Local view of a shared document.
///
/// Inbound changes replace the whole text unless the user typed within the
/// debounce window. A load always replaces it. Until a document has loaded
/// the view is not joined and inbound changes are dropped.
#[derive(Debug, Clone)]
pub struct EditorView {
    text: String,
    debounce: Duration,
    typing_until: Option<Instant>,
    joined: bool,
}

impl Default for EditorView {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_DEBOUNCE)
    }
}

impl EditorView {
    pub fn new(debounce: Duration) -> Self {
        Self {
            text: String::new(),
            debounce,
            typing_until: None,
            joined: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Clear the view while another document is requested
    pub fn switch_document(&mut self) {
        self.text.clear();
        self.typing_until = None;
        self.joined = false;
    }

    pub fn is_typing(&self, now: Instant) -> bool {
        self.typing_until.is_some_and(|until| now < until)
    }

    /// Record a keystroke that produced `content`
    pub fn local_edit(&mut self, content: impl Into<String>, now: Instant) {
        self.text = content.into();
        self.typing_until = Some(now + self.debounce);
    }

    /// Replace the view with freshly loaded content, discarding local edits
    pub fn load_document(&mut self, content: impl Into<String>) {
        self.text = content.into();
        self.joined = true;
    }

    /// Apply a peer's change unless the user is typing or nothing is loaded.
    /// Returns whether it was applied.
    pub fn receive_changes(&mut self, content: impl Into<String>, now: Instant) -> bool {
        if !self.joined || self.is_typing(now) {
            return false;
        }
        self.text = content.into();
        true
    }

    /// Apply a server event to the view. Returns whether the text changed hands.
    pub fn apply(&mut self, event: &ServerEvent, now: Instant) -> bool {
        match event {
            ServerEvent::LoadDocument(msg) => {
                self.load_document(msg.content.as_str());
                true
            }
            ServerEvent::ReceiveChanges(msg) => self.receive_changes(msg.content.as_str(), now),
            ServerEvent::Pong(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(content: &str) -> EditorView {
        let mut view = EditorView::default();
        view.load_document(content);
        view
    }

    #[test]
    fn inbound_change_is_dropped_while_typing() {
        let start = Instant::now();
        let mut view = loaded("");
        view.local_edit("mine", start);

        assert!(!view.receive_changes("theirs", start + Duration::from_millis(50)));
        assert_eq!(view.text(), "mine");
    }

    #[test]
    fn inbound_change_applies_after_debounce() {
        let start = Instant::now();
        let mut view = loaded("");
        view.local_edit("mine", start);

        let later = start + DEFAULT_TYPING_DEBOUNCE;
        assert!(!view.is_typing(later));
        assert!(view.receive_changes("theirs", later));
        assert_eq!(view.text(), "theirs");
    }

    #[test]
    fn each_keystroke_extends_the_window() {
        let start = Instant::now();
        let mut view = EditorView::default();
        view.local_edit("a", start);
        view.local_edit("ab", start + Duration::from_millis(150));

        assert!(view.is_typing(start + Duration::from_millis(300)));
        assert!(!view.is_typing(start + Duration::from_millis(350)));
    }

    #[test]
    fn load_overwrites_even_while_typing() {
        let start = Instant::now();
        let mut view = EditorView::default();
        view.local_edit("unsaved", start);

        assert!(view.apply(&ServerEvent::load_document("server copy"), start));
        assert_eq!(view.text(), "server copy");
    }

    #[test]
    fn idle_view_takes_changes_immediately() {
        let mut view = loaded("");
        assert!(view.apply(&ServerEvent::receive_changes("hello"), Instant::now()));
        assert_eq!(view.text(), "hello");
    }

    #[test]
    fn changes_before_first_load_are_dropped() {
        let mut view = EditorView::default();
        assert!(!view.is_joined());
        assert!(!view.apply(&ServerEvent::receive_changes("early"), Instant::now()));
        assert_eq!(view.text(), "");
    }

    #[test]
    fn switching_documents_clears_and_drops_stale_changes() {
        let now = Instant::now();
        let mut view = loaded("old text");
        view.local_edit("old text!", now);

        view.switch_document();
        assert_eq!(view.text(), "");
        assert!(!view.is_typing(now));
        assert!(!view.receive_changes("from the old room", now));
        assert_eq!(view.text(), "");

        assert!(view.apply(&ServerEvent::load_document("new text"), now));
        assert!(view.receive_changes("peer edit", now));
        assert_eq!(view.text(), "peer edit");
    }
}
