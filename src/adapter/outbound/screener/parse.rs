//! Pure HTML parsers for screener.in company pages.
//!
//! The page layout varies between listings and changes over time, so each
//! extractor tries a list of selectors and takes the first one that yields
//! data. Nothing here touches the network.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::news::extract_news_and_events;
use super::value::clean_financial_value;
use crate::domain::{CompanyData, FinancialTable, Ratio, TableRow};

const NAME_SELECTORS: &[&str] = &[
    "h1",
    ".company-name",
    "[data-company-name]",
    "title",
    ".header h1",
    ".company-info h1",
];

const RATIO_SECTIONS: &[&str] = &[
    ".company-ratios",
    ".ratios",
    ".key-ratios",
    ".financial-ratios",
    "[data-ratios]",
    ".ratio-table",
];

/// Header words of two-column ratio tables.
const RATIO_HEADER_WORDS: &[&str] = &["ratio", "metric", "parameter"];

/// Profit & loss section ids, most specific first.
const PROFIT_LOSS_TYPES: &[&str] = &[
    "stand-alone-profit-loss",
    "consolidated-profit-loss",
    "profit-loss",
];

/// Parse a CSS selector. Selectors here are constants, so a failure is
/// logged and the selector skipped.
pub(super) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(err) => {
            debug!(css, error = %err, "Invalid selector");
            None
        }
    }
}

/// First descendant of `element` matching `css`.
pub(super) fn select_first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    element.select(&selector).next()
}

/// All descendants of `element` matching `css`, in document order.
pub(super) fn select_all<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    selector(css)
        .map(|selector| element.select(&selector).collect())
        .unwrap_or_default()
}

/// Text of an element with each text node trimmed and empty nodes dropped.
pub(super) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Raw concatenated text of an element.
pub(super) fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Table row labels carry an expand button rendered as a trailing `+`.
fn clean_metric(raw: &str) -> String {
    raw.trim_end_matches(|c: char| c == '+' || c.is_whitespace())
        .to_string()
}

/// Trailing `| Screener ...` and `- Stock ...` site suffixes.
fn site_suffixes() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?i)\s*\|\s*Screener.*$").expect("valid suffix pattern"),
            Regex::new(r"(?i)\s*-\s*Stock.*$").expect("valid suffix pattern"),
        ]
    })
}

fn strip_site_suffixes(text: &str) -> String {
    site_suffixes()
        .iter()
        .fold(text.to_string(), |name, pattern| {
            pattern.replace(&name, "").into_owned()
        })
        .trim()
        .to_string()
}

/// Company display name, falling back to `ticker`.
///
/// Site suffixes such as `| Screener` and `- Stock ...` are removed; names
/// of two characters or fewer are rejected.
#[must_use]
pub fn company_name(document: &Html, ticker: &str) -> String {
    let root = document.root_element();
    for css in NAME_SELECTORS {
        let Some(element) = select_first(root, css) else {
            continue;
        };
        let text = text_of(element);
        if text.is_empty() {
            continue;
        }
        let name = strip_site_suffixes(&text);
        if name.chars().count() > 2 {
            return name;
        }
    }
    ticker.to_string()
}

fn upsert_ratio(ratios: &mut Vec<Ratio>, name: String, raw: &str) {
    let value = clean_financial_value(raw);
    match ratios.iter_mut().find(|r| r.name == name) {
        Some(existing) => existing.value = value,
        None => ratios.push(Ratio { name, value }),
    }
}

/// Headline ratios from the first ratio section that yields any.
///
/// Three layouts are understood: list items with name and value spans,
/// a two-column table, and definition lists.
#[must_use]
pub fn key_ratios(document: &Html) -> Vec<Ratio> {
    let root = document.root_element();
    for css in RATIO_SECTIONS {
        let Some(section) = select_first(root, css) else {
            continue;
        };
        let mut ratios = Vec::new();

        let items = select_all(section, "li");
        if !items.is_empty() {
            for item in items {
                let name = select_first(item, ".name, .ratio-name, [data-name]");
                let value = select_first(item, ".value, .ratio-value, [data-value]");
                if let (Some(name), Some(value)) = (name, value) {
                    let (name, value) = (text_of(name), text_of(value));
                    if !name.is_empty() && !value.is_empty() {
                        upsert_ratio(&mut ratios, name, &value);
                    }
                }
            }
            if !ratios.is_empty() {
                return ratios;
            }
        }

        if let Some(table) = select_first(section, "table") {
            for row in select_all(table, "tr") {
                let cells = select_all(row, "td, th");
                if cells.len() < 2 {
                    continue;
                }
                let (name, value) = (text_of(cells[0]), text_of(cells[1]));
                if name.is_empty()
                    || value.is_empty()
                    || RATIO_HEADER_WORDS.contains(&name.to_lowercase().as_str())
                {
                    continue;
                }
                upsert_ratio(&mut ratios, name, &value);
            }
            if !ratios.is_empty() {
                return ratios;
            }
        }

        let terms = select_all(section, "dt");
        let definitions = select_all(section, "dd");
        if terms.len() == definitions.len() {
            for (term, definition) in terms.into_iter().zip(definitions) {
                let (name, value) = (text_of(term), text_of(definition));
                if !name.is_empty() && !value.is_empty() {
                    upsert_ratio(&mut ratios, name, &value);
                }
            }
            if !ratios.is_empty() {
                return ratios;
            }
        }
    }
    Vec::new()
}

fn table_selectors(table_type: &str) -> Vec<String> {
    let mut selectors = vec![
        format!("#{table_type}"),
        format!("[data-table=\"{table_type}\"]"),
        format!(".{table_type}"),
        format!("[id*=\"{table_type}\"]"),
        format!("section[id*=\"{}\"]", table_type.replace('-', "")),
    ];
    if table_type.contains("profit") || table_type.contains("loss") {
        selectors.extend(
            [
                "#profit-loss",
                "#standalone-profit-loss",
                "#stand-alone-profit-loss",
                ".profit-loss-table",
                "[data-table=\"profit-loss\"]",
            ]
            .map(String::from),
        );
    }
    selectors
}

/// Parse a year-wise table found inside a section located by id or class.
///
/// The first header cell is dropped when it is blank or shorter than three
/// characters (a row-label column). Row values beyond the header count
/// are ignored.
#[must_use]
pub fn financial_table(document: &Html, table_type: &str) -> FinancialTable {
    let root = document.root_element();
    for css in table_selectors(table_type) {
        let Some(table) = select_first(root, &css).and_then(|s| select_first(s, "table")) else {
            continue;
        };

        let mut columns: Vec<String> = select_first(table, "thead tr, tr:first-child")
            .map(|row| select_all(row, "th, td").into_iter().map(text_of).collect())
            .unwrap_or_default();
        if columns.len() > 1 && columns[0].chars().count() < 3 {
            columns.remove(0);
        }
        if columns.is_empty() {
            warn!(table_type, "No headers found for table");
            continue;
        }

        let rows = match select_first(table, "tbody") {
            Some(body) => select_all(body, "tr"),
            None => select_all(table, "tr").into_iter().skip(1).collect(),
        };

        let mut parsed = FinancialTable {
            columns,
            rows: Vec::new(),
        };
        for row in rows {
            let cells: Vec<String> = select_all(row, "td, th").into_iter().map(text_of).collect();
            if cells.len() < 2 {
                continue;
            }
            let metric = clean_metric(&cells[0]);
            if metric.chars().count() < 2 {
                continue;
            }
            let values = cells[1..]
                .iter()
                .take(parsed.columns.len())
                .map(|cell| clean_financial_value(cell))
                .collect();
            parsed.rows.push(TableRow { metric, values });
        }

        if !parsed.is_empty() {
            debug!(table_type, rows = parsed.len(), "Extracted table");
            return parsed;
        }
    }
    FinancialTable::default()
}

/// Profit & loss statement, preferring standalone over consolidated.
#[must_use]
pub fn profit_loss(document: &Html) -> FinancialTable {
    PROFIT_LOSS_TYPES
        .iter()
        .map(|table_type| financial_table(document, table_type))
        .find(|table| !table.is_empty())
        .unwrap_or_default()
}

/// Parse a table whose first header cell labels the rows.
fn generic_table(table: ElementRef<'_>) -> FinancialTable {
    let mut headers: Vec<String> = select_first(table, "thead")
        .map(|head| select_all(head, "th").into_iter().map(text_of).collect())
        .unwrap_or_default();
    if headers.is_empty() {
        headers = select_first(table, "tr")
            .map(|row| select_all(row, "th").into_iter().map(text_of).collect())
            .unwrap_or_default();
    }
    let columns: Vec<String> = headers.into_iter().skip(1).collect();

    let rows = match select_first(table, "tbody") {
        Some(body) => select_all(body, "tr"),
        None => select_all(table, "tr").into_iter().skip(1).collect(),
    };

    let rows = rows
        .into_iter()
        .filter_map(|row| {
            let cells: Vec<String> = select_all(row, "td, th").into_iter().map(text_of).collect();
            let (name, values) = cells.split_first()?;
            Some(TableRow {
                metric: clean_metric(name),
                values: values
                    .iter()
                    .take(columns.len())
                    .map(|cell| clean_financial_value(cell))
                    .collect(),
            })
        })
        .collect();

    FinancialTable { columns, rows }
}

/// Table following the `h2` heading whose text equals `heading`.
#[must_use]
pub fn table_after_heading(document: &Html, heading: &str) -> FinancialTable {
    let Some(sel) = selector("h2, table") else {
        return FinancialTable::default();
    };
    let mut found_heading = false;
    for element in document.select(&sel) {
        match element.value().name() {
            "h2" if !found_heading => found_heading = text_of(element) == heading,
            "table" if found_heading => {
                let table = generic_table(element);
                debug!(heading, rows = table.len(), "Extracted table after heading");
                return table;
            }
            _ => {}
        }
    }
    FinancialTable::default()
}

/// Parse a complete company page. Scrape metadata is left unset.
#[must_use]
pub fn parse_company(html: &str, ticker: &str, site_base: &str) -> CompanyData {
    let document = Html::parse_document(html);
    let (news, events, announcements) = extract_news_and_events(&document, site_base);

    CompanyData {
        company_name: company_name(&document, ticker),
        ratios: key_ratios(&document),
        profit_loss: profit_loss(&document),
        peer_comparison: table_after_heading(&document, "Peer comparison"),
        balance_sheet: table_after_heading(&document, "Balance Sheet"),
        cash_flow: table_after_heading(&document, "Cash Flows"),
        ratios_table: table_after_heading(&document, "Ratios"),
        shareholding_pattern: table_after_heading(&document, "Shareholding Pattern"),
        news,
        events,
        announcements,
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FinancialValue;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><head></head><body>{body}</body></html>"))
    }

    #[test]
    fn company_name_strips_site_suffix() {
        let html = Html::parse_document(
            "<html><head><title>Reliance Industries Ltd | Screener</title></head><body></body></html>",
        );
        assert_eq!(company_name(&html, "RELIANCE"), "Reliance Industries Ltd");
    }

    #[test]
    fn company_name_strips_stock_suffix() {
        let html = doc("<h1>Infosys Ltd - Stock Price</h1>");
        assert_eq!(company_name(&html, "INFY"), "Infosys Ltd");
    }

    #[test]
    fn site_suffixes_match_case_insensitively() {
        assert_eq!(strip_site_suffixes("Tata Motors Ltd | SCREENER.in"), "Tata Motors Ltd");
        assert_eq!(strip_site_suffixes("Bajaj-Auto Ltd - stock quote"), "Bajaj-Auto Ltd");
        assert_eq!(strip_site_suffixes("  Wipro Ltd  "), "Wipro Ltd");
    }

    #[test]
    fn company_name_falls_back_to_ticker() {
        assert_eq!(company_name(&doc("<h1>AB</h1>"), "TCS"), "TCS");
        assert_eq!(company_name(&doc("<p>nothing</p>"), "TCS"), "TCS");
    }

    #[test]
    fn ratios_from_list_items() {
        let html = doc(
            r#"<div class="company-ratios"><ul>
                <li><span class="name">Market Cap</span><span class="value">₹ 19,20,000 Cr.</span></li>
                <li><span class="name">Stock P/E</span><span class="value">24.3</span></li>
                <li><span class="name">ROE</span><span class="value">9.25 %</span></li>
            </ul></div>"#,
        );
        let ratios = key_ratios(&html);

        assert_eq!(ratios.len(), 3);
        assert_eq!(ratios[1].name, "Stock P/E");
        assert_eq!(ratios[1].value, Some(FinancialValue::Number(24.3)));
        assert_eq!(ratios[2].value, Some(FinancialValue::Number(9.25)));
    }

    #[test]
    fn ratios_from_two_column_table_skip_header_words() {
        let html = doc(
            r#"<div class="ratios"><table>
                <tr><th>Ratio</th><th>Value</th></tr>
                <tr><td>Book Value</td><td>1,234</td></tr>
                <tr><td>Dividend Yield</td><td>-</td></tr>
            </table></div>"#,
        );
        let ratios = key_ratios(&html);

        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].name, "Book Value");
        assert_eq!(ratios[0].value, Some(FinancialValue::Number(1234.0)));
        assert_eq!(ratios[1].value, None);
    }

    #[test]
    fn ratios_from_definition_list() {
        let html = doc(
            r#"<div class="key-ratios"><dl>
                <dt>Face Value</dt><dd>10</dd>
                <dt>High / Low</dt><dd>3,000 / 2,100</dd>
            </dl></div>"#,
        );
        let ratios = key_ratios(&html);

        assert_eq!(ratios[0].value, Some(FinancialValue::Number(10.0)));
        assert_eq!(
            ratios[1].value,
            Some(FinancialValue::Text("3,000 / 2,100".into()))
        );
    }

    #[test]
    fn profit_loss_table_by_section_id() {
        let html = doc(
            r#"<section id="profit-loss"><table>
                <thead><tr><th></th><th>Mar 2023</th><th>Mar 2024</th></tr></thead>
                <tbody>
                    <tr><td>Sales +</td><td>1,000</td><td>1,200</td><td>extra</td></tr>
                    <tr><td>OPM %</td><td>20%</td></tr>
                    <tr><td>x</td><td>1</td><td>2</td></tr>
                </tbody>
            </table></section>"#,
        );
        let table = profit_loss(&html);

        assert_eq!(table.columns, vec!["Mar 2023", "Mar 2024"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].metric, "Sales");
        assert_eq!(
            table.rows[0].values,
            vec![
                Some(FinancialValue::Number(1000.0)),
                Some(FinancialValue::Number(1200.0))
            ]
        );
        assert_eq!(table.rows[1].values.len(), 1);
    }

    #[test]
    fn table_after_heading_uses_next_table() {
        let html = doc(
            r#"<table><tr><th>ignored</th></tr></table>
            <h2>Balance Sheet</h2>
            <p>Consolidated figures in Rs. Crores</p>
            <table>
                <thead><tr><th></th><th>Mar 2023</th><th>Mar 2024</th></tr></thead>
                <tbody><tr><td>Borrowings +</td><td>10</td><td>12</td></tr></tbody>
            </table>
            <h2>Cash Flows</h2>"#,
        );

        let table = table_after_heading(&html, "Balance Sheet");
        assert_eq!(table.columns, vec!["Mar 2023", "Mar 2024"]);
        assert_eq!(table.rows[0].metric, "Borrowings");

        assert!(table_after_heading(&html, "Cash Flows").is_empty());
        assert!(table_after_heading(&html, "Ratios").is_empty());
    }
}
