//! Scraped company records.
//!
//! A [`CompanyData`] is what the scraper writes to disk as one JSON file per
//! symbol and what the knowledge base reads back to build retrieval chunks.
//! Tables keep their column order so year-wise figures stay chronological.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cleaned financial figure: a number where one could be parsed,
/// otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinancialValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FinancialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A named headline figure such as "Stock P/E".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub name: String,
    pub value: Option<FinancialValue>,
}

/// One metric row of a financial table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub metric: String,
    /// Values aligned with [`FinancialTable::columns`]; may be shorter.
    pub values: Vec<Option<FinancialValue>>,
}

/// A year-wise (or peer-wise) financial table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl FinancialTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Iterate `(column, value)` pairs of a row, skipping missing values.
    pub fn cells<'a>(
        &'a self,
        row: &'a TableRow,
    ) -> impl Iterator<Item = (&'a str, &'a FinancialValue)> + 'a {
        self.columns
            .iter()
            .zip(row.values.iter())
            .filter_map(|(column, value)| value.as_ref().map(|v| (column.as_str(), v)))
    }
}

/// A news headline, corporate event or exchange announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where and when a record was scraped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeMetadata {
    pub ticker: String,
    pub url: String,
    /// Unix timestamp in seconds.
    pub scraped_at: i64,
}

/// Everything scraped for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyData {
    pub company_name: String,
    #[serde(default)]
    pub ratios: Vec<Ratio>,
    #[serde(default)]
    pub profit_loss: FinancialTable,
    #[serde(default)]
    pub balance_sheet: FinancialTable,
    #[serde(default)]
    pub cash_flow: FinancialTable,
    #[serde(default)]
    pub ratios_table: FinancialTable,
    #[serde(default)]
    pub shareholding_pattern: FinancialTable,
    #[serde(default)]
    pub peer_comparison: FinancialTable,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub events: Vec<NewsItem>,
    #[serde(default)]
    pub announcements: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ScrapeMetadata>,
}

impl CompanyData {
    /// True when any news, event or announcement was captured.
    #[must_use]
    pub fn has_news(&self) -> bool {
        !self.news.is_empty() || !self.events.is_empty() || !self.announcements.is_empty()
    }

    /// A record is worth saving when it names the company and carries
    /// ratios, a profit & loss table, or any news.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.company_name.trim().is_empty()
            && (!self.ratios.is_empty() || !self.profit_loss.is_empty() || self.has_news())
    }
}
