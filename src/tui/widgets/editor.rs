use std::cmp;
use std::fmt;

/// Text buffer behind one form field.
/// Single-line editors turn newlines (typed or pasted) into spaces.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // first visible line
    multiline: bool,
    undo_stack: Vec<(Vec<String>, usize, usize)>,
    max_history: usize,
}

impl Editor {
    pub fn new(multiline: bool) -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            multiline,
            undo_stack: Vec::new(),
            max_history: 100,
        }
    }

    /// Build an editor holding `content`, cursor at the end
    pub fn from_string(content: &str, multiline: bool) -> Self {
        let mut editor = Self::new(multiline);
        let content = if multiline { content.to_string() } else { content.replace('\n', " ") };
        if !content.is_empty() {
            editor.lines = content.split('\n').map(|s| s.to_string()).collect();
        }
        editor.move_cursor_to_end();
        editor
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    fn current_line_len(&self) -> usize {
        self.lines.get(self.cursor_line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Byte offset of a char column within a line
    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
    }

    fn snapshot(&mut self) {
        if self.undo_stack.len() >= self.max_history {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push((self.lines.clone(), self.cursor_line, self.cursor_col));
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.snapshot();
        let col = cmp::min(self.cursor_col, self.current_line_len());
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let idx = Self::byte_index(line, col);
            line.insert(idx, ch);
            self.cursor_col = col + 1;
        }
    }

    /// Insert pasted text at the cursor
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|c| *c != '\r') {
            match ch {
                '\n' if !self.multiline => self.insert_char(' '),
                _ => self.insert_char(ch),
            }
        }
    }

    pub fn insert_newline(&mut self) {
        if !self.multiline {
            return;
        }
        self.snapshot();
        let col = cmp::min(self.cursor_col, self.current_line_len());
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let idx = Self::byte_index(line, col);
            let remainder = line.split_off(idx);
            self.lines.insert(self.cursor_line + 1, remainder);
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        let col = cmp::min(self.cursor_col, self.current_line_len());
        if col > 0 {
            self.snapshot();
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let idx = Self::byte_index(line, col - 1);
                line.remove(idx);
                self.cursor_col = col - 1;
            }
        } else if self.cursor_line > 0 {
            self.snapshot();
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            if let Some(prev) = self.lines.get_mut(self.cursor_line) {
                prev.push_str(&current);
            }
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        let col = cmp::min(self.cursor_col, self.current_line_len());
        if col < self.current_line_len() {
            self.snapshot();
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let idx = Self::byte_index(line, col);
                line.remove(idx);
            }
        } else if self.cursor_line + 1 < self.lines.len() {
            self.snapshot();
            let next = self.lines.remove(self.cursor_line + 1);
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                line.push_str(&next);
            }
        }
    }

    pub fn clear(&mut self) {
        self.snapshot();
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((lines, line, col)) => {
                self.lines = lines;
                self.cursor_line = line;
                self.cursor_col = col;
                true
            }
            None => false,
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len()) - 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    fn move_cursor_to_end(&mut self) {
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_col = self.current_line_len();
    }

    /// Keep the cursor line inside a viewport of `viewport_height` lines
    pub fn update_scroll(&mut self, viewport_height: usize) {
        let viewport_height = viewport_height.max(1);
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// Lines visible from the current scroll offset
    pub fn visible_lines(&self, viewport_height: usize) -> &[String] {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());
        &self.lines[start..end]
    }

    /// Cursor position relative to the visible window, as (column, row)
    pub fn cursor_offset(&self) -> (usize, usize) {
        (
            cmp::min(self.cursor_col, self.current_line_len()),
            self.cursor_line.saturating_sub(self.scroll_offset),
        )
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_in_the_middle_of_multibyte_text() {
        let mut editor = Editor::from_string("héllo", false);
        editor.move_cursor_left();
        editor.move_cursor_left();
        editor.insert_char('X');
        assert_eq!(editor.to_string(), "hélXlo");
        editor.delete_char();
        editor.delete_forward();
        assert_eq!(editor.to_string(), "hélo");
    }

    #[test]
    fn single_line_editor_flattens_newlines() {
        let mut editor = Editor::new(false);
        editor.insert_str("a\nb");
        editor.insert_newline();
        assert_eq!(editor.to_string(), "a b");
        assert_eq!(editor.lines.len(), 1);
    }

    #[test]
    fn multiline_editor_splits_and_joins_lines() {
        let mut editor = Editor::from_string("ab", true);
        editor.move_cursor_left();
        editor.insert_newline();
        assert_eq!(editor.to_string(), "a\nb");
        editor.delete_char();
        assert_eq!(editor.to_string(), "ab");
    }

    #[test]
    fn undo_restores_previous_text() {
        let mut editor = Editor::from_string("abc", false);
        editor.clear();
        assert!(editor.is_empty());
        assert!(editor.undo());
        assert_eq!(editor.to_string(), "abc");
        assert!(!Editor::new(false).undo());
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut editor = Editor::from_string("1\n2\n3\n4\n5", true);
        editor.update_scroll(2);
        assert_eq!(editor.scroll_offset, 3);
        assert_eq!(editor.visible_lines(2), ["4".to_string(), "5".to_string()]);
        assert_eq!(editor.cursor_offset(), (1, 1));
    }
}
