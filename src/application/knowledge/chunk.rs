//! Typed text chunks built from scraped company records.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::domain::{CompanyData, FinancialTable, NewsItem};

/// News and event items kept per chunk.
const MAX_ITEMS: usize = 5;

/// Kind of data a chunk carries. Variant order is the order used by
/// company summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Ratios,
    Financials,
    BalanceSheet,
    CashFlow,
    Shareholding,
    Peers,
    News,
    Events,
}

impl ChunkKind {
    pub const ALL: [ChunkKind; 8] = [
        Self::Ratios,
        Self::Financials,
        Self::BalanceSheet,
        Self::CashFlow,
        Self::Shareholding,
        Self::Peers,
        Self::News,
        Self::Events,
    ];

    /// Snake-case label used in stats and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ratios => "ratios",
            Self::Financials => "financials",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
            Self::Shareholding => "shareholding",
            Self::Peers => "peers",
            Self::News => "news",
            Self::Events => "events",
        }
    }

    /// Heading label: each underscore-separated word capitalised.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Ratios => "Ratios",
            Self::Financials => "Financials",
            Self::BalanceSheet => "Balance_Sheet",
            Self::CashFlow => "Cash_Flow",
            Self::Shareholding => "Shareholding",
            Self::Peers => "Peers",
            Self::News => "News",
            Self::Events => "Events",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One retrievable slice of a company's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// Bare symbol (record file stem).
    pub ticker: String,
    pub company: String,
    pub kind: ChunkKind,
    pub text: String,
}

/// Split a company record into typed chunks. Empty sections produce no
/// chunk.
#[must_use]
pub fn build_chunks(ticker: &str, data: &CompanyData) -> Vec<Chunk> {
    let company = if data.company_name.trim().is_empty() {
        ticker.to_string()
    } else {
        data.company_name.clone()
    };
    let header = format!("Company: {company} ({ticker})\n");

    let mut texts: Vec<(ChunkKind, String)> = Vec::new();

    if !data.ratios.is_empty() {
        let mut text = format!("{header}Key Financial Ratios:\n");
        for ratio in &data.ratios {
            if let Some(value) = &ratio.value {
                let _ = writeln!(text, "- {}: {value}", ratio.name);
            }
        }
        texts.push((ChunkKind::Ratios, text));
    }

    for (kind, heading, table) in [
        (ChunkKind::Financials, "Financial Performance", &data.profit_loss),
        (ChunkKind::BalanceSheet, "Balance Sheet", &data.balance_sheet),
        (ChunkKind::CashFlow, "Cash Flows", &data.cash_flow),
        (ChunkKind::Shareholding, "Shareholding Pattern", &data.shareholding_pattern),
        (ChunkKind::Peers, "Peer Comparison", &data.peer_comparison),
    ] {
        if !table.is_empty() {
            texts.push((kind, format!("{header}{}", table_text(heading, table))));
        }
    }

    if !data.news.is_empty() {
        let mut text = format!("{header}Recent News:\n");
        for item in data.news.iter().take(MAX_ITEMS) {
            push_item(&mut text, item, false);
        }
        texts.push((ChunkKind::News, text));
    }

    if !data.events.is_empty() || !data.announcements.is_empty() {
        let mut text = format!("{header}Corporate Events & Announcements:\n");
        for item in data.events.iter().chain(&data.announcements).take(MAX_ITEMS) {
            push_item(&mut text, item, true);
        }
        texts.push((ChunkKind::Events, text));
    }

    texts
        .into_iter()
        .map(|(kind, text)| Chunk {
            ticker: ticker.to_string(),
            company: company.clone(),
            kind,
            text,
        })
        .collect()
}

fn table_text(heading: &str, table: &FinancialTable) -> String {
    let mut text = format!("{heading}:\n");
    for row in &table.rows {
        let _ = write!(text, "\n{}:\n", row.metric);
        for (column, value) in table.cells(row) {
            let _ = writeln!(text, "  {column}: {value}");
        }
    }
    text
}

fn push_item(text: &mut String, item: &NewsItem, with_kind: bool) {
    let _ = write!(text, "\n- {}", item.title);
    if let Some(date) = item.date.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(text, " ({date})");
    }
    if with_kind {
        if let Some(kind) = item.kind.as_deref().filter(|k| !k.is_empty()) {
            let _ = write!(text, " [Type: {kind}]");
        }
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(text, "\n  {description}\n");
    }
}
