//! Fixed-width text and markdown tables

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A simple table rendered either as aligned text or as a markdown pipe table
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table; every column defaults to right alignment
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = vec![Align::Right; headers.len()];
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    /// Set alignment for one column
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Add a row; short rows are padded with empty cells
    pub fn add_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| display_width(&r[i]))
                    .chain(std::iter::once(display_width(h)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn pad(text: &str, width: usize, align: Align) -> String {
        let fill = " ".repeat(width.saturating_sub(display_width(text)));
        match align {
            Align::Left => format!("{}{}", text, fill),
            Align::Right => format!("{}{}", fill, text),
        }
    }

    /// Render as space-separated aligned columns
    pub fn to_text(&self) -> String {
        let widths = self.widths();
        let mut output = String::new();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| Self::pad(c, widths[i], self.align[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        output.push_str(&line(&self.headers));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&line(row));
            output.push('\n');
        }

        output
    }

    /// Render as a markdown pipe table
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("| ");
        output.push_str(
            &self
                .headers
                .iter()
                .map(|h| escape_markdown(h))
                .collect::<Vec<_>>()
                .join(" | "),
        );
        output.push_str(" |\n|");
        for align in &self.align {
            output.push_str(match align {
                Align::Left => ":---|",
                Align::Right => "---:|",
            });
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str("| ");
            output.push_str(
                &row.iter()
                    .map(|c| escape_markdown(c))
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
            output.push_str(" |\n");
        }

        output
    }
}

/// Character count, so emoji status cells do not skew alignment by bytes
fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Horizontal rule used around console tables
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["Test", "Runs"]).align(0, Align::Left);
        table.add_row(vec!["two_lock_deloxide".to_string(), "100".to_string()]);
        table.add_row(vec!["x".to_string(), "5".to_string()]);
        table
    }

    #[test]
    fn test_text_alignment() {
        let text = sample().to_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Test               Runs");
        assert_eq!(lines[1], "two_lock_deloxide   100");
        assert_eq!(lines[2], "x                     5");
    }

    #[test]
    fn test_markdown() {
        let md = sample().to_markdown();
        let lines: Vec<_> = md.lines().collect();
        assert_eq!(lines[0], "| Test | Runs |");
        assert_eq!(lines[1], "|:---|---:|");
        assert_eq!(lines[2], "| two_lock_deloxide | 100 |");
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let mut table = Table::new(["A"]);
        table.add_row(vec!["a|b".to_string()]);
        assert!(table.to_markdown().contains("a\\|b"));
    }

    #[test]
    fn test_short_rows_padded() {
        let mut table = Table::new(["A", "B"]);
        table.add_row(vec!["1".to_string()]);
        assert_eq!(table.len(), 1);
        assert!(table.to_markdown().contains("| 1 |  |"));
    }
}
