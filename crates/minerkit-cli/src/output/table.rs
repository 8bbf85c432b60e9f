//! Table formatting for CLI output

use comfy_table::{ContentArrangement, Table};

/// Table builder for CLI output
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set table headers
    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row to the table
    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build the table
    #[must_use]
    pub fn build(self) -> Table {
        let mut table = Table::new();
        table
            .set_header(&self.headers)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);
        for row in self.rows {
            table.add_row(row);
        }
        table
    }
}
