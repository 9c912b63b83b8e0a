//! Indentation-tracking writer used to render generated Kotlin.
//!
//! Indentation is held in an `Rc<Cell<usize>>` so an [`IndentGuard`] can be
//! alive while the writer is still borrowed mutably for writes.
//!
//! ```
//! use convgen_core::code_writer::CodeWriter;
//!
//! let mut output = String::new();
//! let mut w = CodeWriter::with_indent_spaces(&mut output, 4);
//! w.writeln("arg(").unwrap();
//! {
//!     let _indent = w.indent();
//!     w.writeln("displayName = displayName,").unwrap();
//! }
//! w.writeln(")").unwrap();
//! assert_eq!(output, "arg(\n    displayName = displayName,\n)\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    indent_string: String,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    pub fn new(writer: W, indent_string: String) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            indent_string,
            at_line_start: true,
        }
    }

    pub fn with_indent_spaces(writer: W, spaces: usize) -> Self {
        Self::new(writer, " ".repeat(spaces))
    }

    /// Write text without a newline. Adds indentation if at line start.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start && !text.trim().is_empty() {
            for _ in 0..self.indent_level.get() {
                self.writer.write_str(&self.indent_string)?;
            }
            self.at_line_start = false;
        }

        self.writer.write_str(text)
    }

    /// Write text followed by a newline. Blank text produces an empty line
    /// without trailing indentation.
    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    pub fn blank_line(&mut self) -> fmt::Result {
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Indentation increases while the returned guard is alive.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Write a KDoc block (`/** ... */`). Empty lines render as a bare ` *`.
    pub fn kdoc(&mut self, lines: &[String]) -> fmt::Result {
        if lines.is_empty() {
            return Ok(());
        }

        self.writeln("/**")?;
        for line in lines {
            if line.is_empty() {
                self.writeln(" *")?;
            } else {
                self.writeln(&format!(" * {}", line))?;
            }
        }
        self.writeln(" */")
    }
}

/// Decrements the writer's indentation when dropped.
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.indent_level.set(self.indent_level.get().saturating_sub(1));
    }
}
