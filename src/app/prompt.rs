//! Single-line text prompt shown in place of the status bar

/// What the prompt input is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenFolder,
    ExportImage,
}

impl PromptKind {
    pub fn message(&self) -> &'static str {
        match self {
            PromptKind::OpenFolder => "Open folder: ",
            PromptKind::ExportImage => "Export image to: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    /// Cursor as a byte offset into `input`, always on a char boundary
    pub cursor: usize,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        let input = initial.into();
        let cursor = input.len();
        Self {
            kind,
            input,
            cursor,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(ch) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.input.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(ch) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.input[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Remove everything before the cursor
    pub fn clear_before_cursor(&mut self) {
        self.input.drain(..self.cursor);
        self.cursor = 0;
    }
}
