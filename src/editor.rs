//! Single-line field editor
//!
//! Backs every editable field in the playground: the request path, the request
//! body, the endpoint host and the org id. Keeps a byte cursor that always sits on
//! a UTF-8 boundary.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;
use std::time::Duration;

/// Events that are already waiting, read without blocking
pub trait KeySource {
    fn next_queued(&mut self) -> Option<Event>;
}

/// The terminal's input queue
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_queued(&mut self) -> Option<Event> {
        match event::poll(Duration::ZERO) {
            Ok(true) => event::read().ok(),
            _ => None,
        }
    }
}

/// What a paste batch consumed
#[derive(Debug, PartialEq)]
pub struct PasteBatch {
    /// Characters inserted, including the one that started the batch
    pub count: usize,
    /// The key that ended the batch, still to be handled
    pub pending: Option<KeyEvent>,
}

/// Which field the editor is currently bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Path,
    Body,
    Endpoint,
    OrgId,
}

impl FieldKind {
    pub fn title(&self) -> &'static str {
        match self {
            FieldKind::Path => "Path",
            FieldKind::Body => "Request Body (JSON)",
            FieldKind::Endpoint => "Endpoint",
            FieldKind::OrgId => "Organization ID",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldEditor {
    kind: FieldKind,
    content: String,
    /// Byte offset into `content`
    cursor: usize,
    dirty: bool,
}

impl FieldEditor {
    /// Start editing `kind` with the given initial text, cursor at the end
    pub fn begin(kind: FieldKind, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            kind,
            cursor: content.len(),
            content,
            dirty: false,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Text before and after the cursor, for drawing a cursor between them
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.clamp_cursor_to_boundary(self.cursor))
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.dirty = true;
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        self.content.insert(cursor, c);
        self.cursor = cursor + c.len_utf8();
        self.dirty = true;
    }

    /// Insert pasted text, turning typographic quotes into JSON-safe ones
    pub fn insert_str_normalized(&mut self, s: &str) {
        let normalized = s
            .replace(['\u{201C}', '\u{201D}'], "\"")
            .replace(['\u{2018}', '\u{2019}'], "'")
            .replace(['\r', '\n'], "");

        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        self.content.insert_str(cursor, &normalized);
        self.cursor = cursor + normalized.len();
        self.dirty = true;
    }

    /// Backspace
    pub fn delete_char_before_cursor(&mut self) -> bool {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        let Some((prev, _)) = self.content[..cursor].char_indices().next_back() else {
            return false;
        };

        self.content.remove(prev);
        self.cursor = prev;
        self.dirty = true;
        true
    }

    /// Delete key
    pub fn delete_char_after_cursor(&mut self) -> bool {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        if cursor >= self.content.len() {
            return false;
        }

        self.content.remove(cursor);
        self.dirty = true;
        true
    }

    /// Ctrl+W: remove the word before the cursor
    pub fn delete_word_before_cursor(&mut self) -> bool {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        let before = &self.content[..cursor];
        let trimmed = before.trim_end_matches(|c: char| c.is_whitespace() || c == '/');
        let start = trimmed
            .rfind(|c: char| c.is_whitespace() || c == '/')
            .map(|i| i + 1)
            .unwrap_or(0);

        if start == cursor {
            return false;
        }

        self.content.replace_range(start..cursor, "");
        self.cursor = start;
        self.dirty = true;
        true
    }

    pub fn move_cursor_left(&mut self) -> bool {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        match self.content[..cursor].char_indices().next_back() {
            Some((prev, _)) => {
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    pub fn move_cursor_right(&mut self) -> bool {
        let cursor = self.clamp_cursor_to_boundary(self.cursor);
        match self.content[cursor..].chars().next() {
            Some(c) => {
                self.cursor = cursor + c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Re-serialize the content as compact JSON
    ///
    /// Fields are single-line, so compact output is what fits.
    pub fn format_json(&mut self) -> Result<(), String> {
        let json: Value = serde_json::from_str(&self.content).map_err(|e| format!("Invalid JSON: {e}"))?;
        self.content = json.to_string();
        self.cursor = self.content.len();
        self.dirty = true;
        Ok(())
    }

    /// An empty body is valid: it means "no body"
    pub fn validate_json(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Ok(());
        }
        serde_json::from_str::<Value>(&self.content)
            .map(|_| ())
            .map_err(|e| format!("Invalid JSON: {e}"))
    }

    /// Handle an editing key, returns true if the key was consumed
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Backspace => self.delete_char_before_cursor(),
            KeyCode::Delete => self.delete_char_after_cursor(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => {
                self.move_cursor_to_start();
                true
            }
            KeyCode::End => {
                self.move_cursor_to_end();
                true
            }
            KeyCode::Char('a') if ctrl => {
                self.move_cursor_to_start();
                true
            }
            KeyCode::Char('e') if ctrl => {
                self.move_cursor_to_end();
                true
            }
            KeyCode::Char('l') if ctrl => {
                self.clear();
                true
            }
            KeyCode::Char('w') if ctrl => self.delete_word_before_cursor(),
            KeyCode::Char(c) if !ctrl => {
                self.insert_char(c);
                true
            }
            _ => false,
        }
    }

    /// Drain character events that are already queued (a terminal paste) and
    /// insert them in one go.
    ///
    /// Release and repeat events are skipped. The first key that is not a plain
    /// character ends the batch and is handed back in [`PasteBatch::pending`] so
    /// the caller can still act on it.
    pub fn handle_paste_batch(
        &mut self,
        initial_char: char,
        keys: &mut impl KeySource,
    ) -> PasteBatch {
        let mut batch = String::from(initial_char);
        let mut pending = None;

        while let Some(event) = keys.next_queued() {
            match event {
                Event::Key(key) if key.kind != KeyEventKind::Press => {}
                Event::Key(key) => match key.code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        batch.push(c);
                    }
                    _ => {
                        pending = Some(key);
                        break;
                    }
                },
                Event::Paste(text) => batch.push_str(&text),
                _ => {}
            }
        }

        let count = batch.chars().count();
        self.insert_str_normalized(&batch);
        PasteBatch { count, pending }
    }

    fn clamp_cursor_to_boundary(&self, cursor: usize) -> usize {
        let mut pos = cursor.min(self.content.len());
        while pos > 0 && !self.content.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    impl KeySource for VecDeque<Event> {
        fn next_queued(&mut self) -> Option<Event> {
            self.pop_front()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_begin_puts_cursor_at_end() {
        let editor = FieldEditor::begin(FieldKind::Path, "/api/programs");
        assert_eq!(editor.cursor, "/api/programs".len());
        assert_eq!(editor.kind(), FieldKind::Path);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_insert_in_middle() {
        let mut editor = FieldEditor::begin(FieldKind::Path, "/api/prgrams");
        for _ in 0.."rams".len() + 1 {
            editor.move_cursor_left();
        }
        editor.insert_char('o');
        assert_eq!(editor.content(), "/api/programs");
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = FieldEditor::begin(FieldKind::Path, "abc");
        assert!(editor.delete_char_before_cursor());
        assert_eq!(editor.content(), "ab");

        editor.move_cursor_to_start();
        assert!(!editor.delete_char_before_cursor());
        assert!(editor.delete_char_after_cursor());
        assert_eq!(editor.content(), "b");
    }

    #[test]
    fn test_utf8_cursor_movement() {
        let mut editor = FieldEditor::begin(FieldKind::Body, "\"é\"");
        assert!(editor.move_cursor_left());
        assert!(editor.move_cursor_left());
        assert_eq!(editor.split_at_cursor(), ("\"", "é\""));

        assert!(editor.delete_char_after_cursor());
        assert_eq!(editor.content(), "\"\"");
    }

    #[test]
    fn test_delete_word() {
        let mut editor = FieldEditor::begin(FieldKind::Path, "/api/program/1");
        assert!(editor.handle_key_event(ctrl('w')));
        assert_eq!(editor.content(), "/api/program/");
        assert!(editor.handle_key_event(ctrl('w')));
        assert_eq!(editor.content(), "/api/");
    }

    #[test]
    fn test_handle_keys() {
        let mut editor = FieldEditor::begin(FieldKind::OrgId, "");
        assert!(editor.handle_key_event(key(KeyCode::Char('x'))));
        assert!(editor.handle_key_event(key(KeyCode::Home)));
        assert!(editor.handle_key_event(key(KeyCode::Char('y'))));
        assert_eq!(editor.content(), "yx");

        assert!(editor.handle_key_event(ctrl('l')));
        assert_eq!(editor.content(), "");
        assert!(!editor.handle_key_event(key(KeyCode::Enter)));
    }

    #[test]
    fn test_paste_normalization() {
        let mut editor = FieldEditor::begin(FieldKind::Body, "");
        editor.insert_str_normalized("{\u{201C}name\u{201D}:\n \u{2018}x\u{2019}}");
        assert_eq!(editor.content(), "{\"name\": 'x'}");
    }

    #[test]
    fn test_paste_batch_hands_back_terminating_key() {
        let mut editor = FieldEditor::begin(FieldKind::Path, "/api/");
        let mut queued: VecDeque<Event> = VecDeque::from([
            Event::Key(key(KeyCode::Char('x'))),
            Event::Key(key(KeyCode::Enter)),
            Event::Key(key(KeyCode::Char('z'))),
        ]);

        let batch = editor.handle_paste_batch('w', &mut queued);

        assert_eq!(editor.content(), "/api/wx");
        assert_eq!(
            batch,
            PasteBatch {
                count: 2,
                pending: Some(key(KeyCode::Enter)),
            }
        );
        // Keys after the terminating one stay queued
        assert_eq!(queued.len(), 1);
    }

    #[test]
    fn test_paste_batch_skips_release_events() {
        let mut editor = FieldEditor::begin(FieldKind::OrgId, "");
        let mut queued: VecDeque<Event> = VecDeque::from([
            Event::Key(KeyEvent::new_with_kind(
                KeyCode::Char('a'),
                KeyModifiers::NONE,
                KeyEventKind::Release,
            )),
            Event::Key(key(KeyCode::Char('b'))),
            Event::Key(KeyEvent::new_with_kind(
                KeyCode::Char('b'),
                KeyModifiers::NONE,
                KeyEventKind::Release,
            )),
        ]);

        let batch = editor.handle_paste_batch('a', &mut queued);

        assert_eq!(editor.content(), "ab");
        assert_eq!(batch.count, 2);
        assert_eq!(batch.pending, None);
    }

    #[test]
    fn test_paste_batch_stops_at_control_keys() {
        let mut editor = FieldEditor::begin(FieldKind::Body, "");
        let mut queued: VecDeque<Event> =
            VecDeque::from([Event::Key(ctrl('f')), Event::Key(key(KeyCode::Char('y')))]);

        let batch = editor.handle_paste_batch('{', &mut queued);

        assert_eq!(editor.content(), "{");
        assert_eq!(batch.pending, Some(ctrl('f')));
    }

    #[test]
    fn test_format_json() {
        let mut editor = FieldEditor::begin(FieldKind::Body, "{ \"a\" : [1, 2] }");
        assert!(editor.format_json().is_ok());
        assert_eq!(editor.content(), "{\"a\":[1,2]}");

        let mut invalid = FieldEditor::begin(FieldKind::Body, "{ nope");
        assert!(invalid.format_json().is_err());
        assert_eq!(invalid.content(), "{ nope");
    }

    #[test]
    fn test_validate_json_accepts_empty() {
        assert!(FieldEditor::begin(FieldKind::Body, "  ").validate_json().is_ok());
        assert!(FieldEditor::begin(FieldKind::Body, "{}").validate_json().is_ok());
        assert!(FieldEditor::begin(FieldKind::Body, "{").validate_json().is_err());
    }
}
