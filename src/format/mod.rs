//! Output rendering for scrape responses (JSON, table).

use crate::config::OutputFormat;
use crate::scrape::{ProductRecord, ScrapeResponse};

/// Formats scrape responses for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full `{ query, results }` response.
    pub fn format_response(&self, response: &ScrapeResponse) -> String {
        match self.format {
            OutputFormat::Json => self.json_response(response),
            OutputFormat::Table => self.table_records(&response.results),
        }
    }

    fn json_response(&self, response: &ScrapeResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn table_records(&self, records: &[ProductRecord]) -> String {
        if records.is_empty() {
            return "No products found.".to_string();
        }

        let price_width = 20;
        let rating_width = 20;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<title_width$}  {:<price_width$}  {:<rating_width$}  {}",
            "Title", "Price", "Rating", "Link"
        ));
        lines.push(format!(
            "{:-<title_width$}  {:-<price_width$}  {:-<rating_width$}  {:-<4}",
            "", "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:<title_width$}  {:<price_width$}  {:<rating_width$}  {}",
                truncate(&record.title, title_width),
                truncate(&record.price, price_width),
                truncate(&record.rating, rating_width),
                record.link.as_deref().unwrap_or("N/A")
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }
}

/// Shortens `text` to `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
