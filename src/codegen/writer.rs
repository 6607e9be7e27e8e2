//! Indentation tracking output writer.

const TAB: &'static str = "  ";

/// Collects output lines, tracking the current block indentation.
pub(crate) struct Writer {
    output: String,
    indent: usize,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            output: String::new(),
            indent: 0,
        }
    }
    /// Writes a line at the current indentation.
    pub fn write_line(self: &mut Self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str(TAB);
        }
        self.output.push_str(line);
        self.output.push('\n');
    }
    /// Writes the opening line of a block and increases the indentation.
    pub fn enter_block(self: &mut Self, line: &str) {
        self.write_line(line);
        self.indent += 1;
    }
    /// Decreases the indentation and writes the closing line of a block.
    pub fn leave_block(self: &mut Self, line: &str) {
        self.indent -= 1;
        self.write_line(line);
    }
    /// Closes the current block and opens the next on the same line, used for
    /// else/else-if chaining.
    pub fn leave_and_enter_block(self: &mut Self, line: &str) {
        self.indent -= 1;
        self.write_line(line);
        self.indent += 1;
    }
    /// Returns the accumulated output.
    pub fn into_output(self: Self) -> String {
        self.output
    }
}
