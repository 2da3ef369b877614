use crate::slang::SlangError;
use crate::state::{Message, Role};
use crate::wrap::wrap_text_to_width;

/// Where a session is in its request/response turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Awaiting,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// One chat session: transcript, draft and the in-flight flag.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    cursor: usize, // cursor position in input, in chars
    loading: bool,

    // Transcript viewport
    pub scroll: u16,
    pub viewport_height: u16, // inner height, updated during render
    pub viewport_width: u16,  // inner width, updated during render
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Awaiting
        } else {
            Phase::Idle
        }
    }

    /// Whether the Send control is enabled. Derived on every call.
    pub fn can_send(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Replace the draft verbatim and park the cursor at its end
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor = self.input.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Start a turn: commit the trimmed draft as a user message, clear the
    /// draft and mark the session as awaiting a reply.
    ///
    /// Returns the text to send, or `None` when the trimmed draft is empty,
    /// in which case nothing changes. There is no in-flight check here; the
    /// triggers consult [`ChatSession::can_send`].
    pub fn begin_submit(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.messages.push(Message::user(text.clone()));
        self.input.clear();
        self.cursor = 0;
        self.loading = true;
        self.scroll_to_bottom();

        Some(text)
    }

    /// Finish a turn with whatever the backend call produced.
    pub fn settle(&mut self, outcome: Result<String, SlangError>) {
        let text = match outcome {
            Ok(reply) => reply,
            Err(e) => format!("Error contacting backend: {e}"),
        };
        self.messages.push(Message::assistant(text));

        self.loading = false;
        self.scroll_to_bottom();
    }

    /// Number of wrapped lines the transcript occupies at `wrap_width`,
    /// including the transient "Thinking…" entry while loading.
    pub fn transcript_height(&self, wrap_width: usize) -> u16 {
        let wrap_width = wrap_width.max(1);
        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            let rows = wrap_text_to_width(&msg.text, wrap_width).len();
            total_lines = total_lines.saturating_add(1); // role label
            total_lines = total_lines.saturating_add(u16::try_from(rows).unwrap_or(u16::MAX));
            total_lines = total_lines.saturating_add(1); // spacer
        }

        if self.loading {
            total_lines = total_lines.saturating_add(2);
        }

        total_lines
    }

    /// Largest useful scroll offset for the current viewport
    pub fn max_scroll(&self) -> u16 {
        // Fall back to a sane size before the first render has measured the viewport
        let width = if self.viewport_width > 0 { self.viewport_width as usize } else { 50 };
        let height = if self.viewport_height > 0 { self.viewport_height } else { 20 };

        self.transcript_height(width).saturating_sub(height)
    }

    /// Scroll the transcript so the newest entry is visible
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    /// Committed messages by role; the turn number in settlement logs
    pub fn count(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}
