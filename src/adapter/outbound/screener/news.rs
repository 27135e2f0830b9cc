//! News, corporate events and announcements from company pages.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use super::parse::{full_text, select_all, select_first, text_of};
use crate::domain::NewsItem;

const NEWS_SECTIONS: &[&str] = &[
    ".news-section",
    ".company-news",
    "#news",
    "[data-section=\"news\"]",
    ".news-container",
    ".recent-news",
    ".news-items",
];

const EVENT_SECTIONS: &[&str] = &[
    ".events-section",
    ".company-events",
    "#events",
    "[data-section=\"events\"]",
    ".events-container",
    ".corporate-events",
    ".event-items",
    ".announcements",
];

/// Generic areas searched for dated text when no dedicated section exists.
const CONTENT_AREAS: &str = ".content, .main-content, .company-info, .details";

/// Titles mentioning any of these are corporate events; the rest are
/// announcements.
const EVENT_KEYWORDS: &[&str] = &["dividend", "agm", "egm", "result", "earnings", "meeting"];

const MIN_NEWS_TITLE: usize = 10;
const MIN_EVENT_TITLE: usize = 5;
const NEWS_DESCRIPTION_LIMIT: usize = 500;
const EVENT_DESCRIPTION_LIMIT: usize = 300;
const MAX_ITEMS: usize = 20;

/// Item layouts for one kind of section.
struct Layout {
    items: [&'static str; 3],
    title: &'static str,
    date: &'static str,
    kind: Option<&'static str>,
    description: &'static str,
    min_title: usize,
    description_limit: usize,
}

const NEWS_LAYOUT: Layout = Layout {
    items: [
        ".news-item, .news, .article, li, .row",
        "div[class*=\"news\"]",
        "p, div",
    ],
    title: ".title, .headline, .news-title, h3, h4, h5, strong, a",
    date: ".date, .news-date, .timestamp, time, [data-date]",
    kind: None,
    description: ".description, .summary, .excerpt, p",
    min_title: MIN_NEWS_TITLE,
    description_limit: NEWS_DESCRIPTION_LIMIT,
};

const EVENT_LAYOUT: Layout = Layout {
    items: [
        ".event-item, .event, .announcement, li, .row",
        "div[class*=\"event\"], div[class*=\"announcement\"]",
        "p, div",
    ],
    title: ".title, .event-title, .announcement-title, h3, h4, h5, strong",
    date: ".date, .event-date, .announcement-date, time, [data-date]",
    kind: Some(".type, .category, .event-type"),
    description: ".description, .details, p",
    min_title: MIN_EVENT_TITLE,
    description_limit: EVENT_DESCRIPTION_LIMIT,
};

/// `12 Mar 2024`, `5-June-24`, `01/Sept/2023`.
fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b\d{1,2}[\s\-/]\w{3,9}[\s\-/]\d{2,4}\b").expect("valid date pattern")
    })
}

/// Find the first date-like phrase: a 1-2 digit day, a 3-9 character month
/// word and a 2-4 digit year, separated by spaces, dashes or slashes.
#[must_use]
pub fn find_date(text: &str) -> Option<String> {
    date_pattern().find(text).map(|m| m.as_str().to_string())
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Absolute links pass through untouched; unparseable bases keep `href`.
fn absolute_link(href: &str, site_base: &str) -> String {
    if !href.starts_with('/') {
        return href.to_string();
    }
    Url::parse(site_base)
        .and_then(|base| base.join(href))
        .map_or_else(|_| href.to_string(), String::from)
}

fn items_in<'a>(section: ElementRef<'a>, layout: &Layout) -> Vec<ElementRef<'a>> {
    layout
        .items
        .iter()
        .map(|css| select_all(section, css))
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn parse_item(item: ElementRef<'_>, layout: &Layout, site_base: &str) -> Option<NewsItem> {
    let title_element = select_first(item, layout.title).unwrap_or(item);
    let title = text_of(title_element);
    if title.chars().count() < layout.min_title {
        return None;
    }

    let date = match select_first(item, layout.date) {
        Some(element) => Some(text_of(element)).filter(|d| !d.is_empty()),
        None => find_date(&full_text(item)),
    };

    let link = select_first(item, "a")
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| absolute_link(href, site_base));

    let kind = layout
        .kind
        .and_then(|css| select_first(item, css))
        .map(text_of);

    let description = select_first(item, layout.description)
        .filter(|element| element.id() != title_element.id())
        .map(text_of)
        .filter(|text| !text.is_empty() && *text != title)
        .map(|text| truncate_chars(&text, layout.description_limit));

    Some(NewsItem {
        title,
        date,
        link,
        kind,
        description,
    })
}

/// Items from the first section in `sections` that yields any.
fn section_items(
    document: &Html,
    sections: &[&str],
    layout: &Layout,
    site_base: &str,
) -> Vec<NewsItem> {
    let root = document.root_element();
    for css in sections {
        let Some(section) = select_first(root, css) else {
            continue;
        };
        let items: Vec<NewsItem> = items_in(section, layout)
            .into_iter()
            .filter_map(|item| parse_item(item, layout, site_base))
            .collect();
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

fn is_event(item: &NewsItem) -> bool {
    let title = item.title.to_lowercase();
    EVENT_KEYWORDS.iter().any(|word| title.contains(word))
}

/// Dated text blocks inside generic content areas.
fn dated_blocks(document: &Html) -> Vec<NewsItem> {
    let root = document.root_element();
    let mut items = Vec::new();
    for area in select_all(root, CONTENT_AREAS) {
        for block in select_all(area, "p, div, li") {
            let text = text_of(block);
            if text.chars().count() <= 20 {
                continue;
            }
            let Some(date) = find_date(&text) else {
                continue;
            };
            items.push(NewsItem {
                title: ellipsize(&text, 100),
                date: Some(date),
                description: Some(ellipsize(&text, 400)),
                ..NewsItem::default()
            });
        }
    }
    items
}

fn ellipsize(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", truncate_chars(text, limit))
    } else {
        text.to_string()
    }
}

/// Keep the first [`MAX_ITEMS`] items, then drop repeated titles.
fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .take(MAX_ITEMS)
        .filter(|item| !item.title.is_empty() && seen.insert(item.title.clone()))
        .collect()
}

/// Extract `(news, events, announcements)` from a company page.
///
/// Relative links are resolved against `site_base`.
#[must_use]
pub fn extract_news_and_events(
    document: &Html,
    site_base: &str,
) -> (Vec<NewsItem>, Vec<NewsItem>, Vec<NewsItem>) {
    let news = section_items(document, NEWS_SECTIONS, &NEWS_LAYOUT, site_base);
    let (events, mut announcements): (Vec<_>, Vec<_>) =
        section_items(document, EVENT_SECTIONS, &EVENT_LAYOUT, site_base)
            .into_iter()
            .partition(is_event);

    if news.is_empty() && events.is_empty() && announcements.is_empty() {
        announcements = dated_blocks(document);
    }

    let (news, events, announcements) = (dedupe(news), dedupe(events), dedupe(announcements));
    debug!(
        news = news.len(),
        events = events.len(),
        announcements = announcements.len(),
        "Extracted news and events"
    );
    (news, events, announcements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://www.screener.in";

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn find_date_matches_common_formats() {
        assert_eq!(find_date("Posted on 12 Mar 2024 by desk").as_deref(), Some("12 Mar 2024"));
        assert_eq!(find_date("5-June-24: board meets").as_deref(), Some("5-June-24"));
        assert_eq!(find_date("on 01/Sept/2023").as_deref(), Some("01/Sept/2023"));
    }

    #[test]
    fn relative_links_resolve_against_site_root() {
        assert_eq!(
            absolute_link("/news/1/", "https://www.screener.in/company/TCS/"),
            "https://www.screener.in/news/1/"
        );
        assert_eq!(absolute_link("https://a.test/x", SITE), "https://a.test/x");
        assert_eq!(absolute_link("/news/1/", "not a url"), "/news/1/");
    }

    #[test]
    fn find_date_rejects_near_misses() {
        assert_eq!(find_date("123 Mar 2024"), None);
        assert_eq!(find_date("12 Mar 20245"), None);
        assert_eq!(find_date("12 Ma 2024"), None);
        assert_eq!(find_date("A12 Mar 2024"), None);
        assert_eq!(find_date("no dates here"), None);
    }

    #[test]
    fn news_items_take_title_date_link_and_description() {
        let html = doc(
            r#"<div class="company-news"><ul>
                <li>
                    <a href="/news/123/">Quarterly revenue beats estimates</a>
                    <span class="date">12 Jan 2024</span>
                    <p>Revenue grew 12% year on year on strong deal wins.</p>
                </li>
                <li><a href="https://example.com/x">Too short</a></li>
            </ul></div>"#,
        );

        let (news, _, _) = extract_news_and_events(&html, SITE);

        assert_eq!(news.len(), 1);
        assert_eq!(news[0].title, "Quarterly revenue beats estimates");
        assert_eq!(news[0].date.as_deref(), Some("12 Jan 2024"));
        assert_eq!(news[0].link.as_deref(), Some("https://www.screener.in/news/123/"));
        assert!(news[0].description.as_deref().unwrap().starts_with("Revenue grew"));
    }

    #[test]
    fn events_are_split_by_keyword() {
        let html = doc(
            r#"<div id="events">
                <div class="event"><strong>Final dividend of Rs 10</strong><span class="type">Dividend</span></div>
                <div class="event"><strong>Change in auditors</strong><p>Board approved 3 May 2024</p></div>
            </div>"#,
        );

        let (_, events, announcements) = extract_news_and_events(&html, SITE);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind.as_deref(), Some("Dividend"));
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].title, "Change in auditors");
        assert_eq!(announcements[0].date.as_deref(), Some("3 May 2024"));
    }

    #[test]
    fn falls_back_to_dated_content_blocks() {
        let long = "x".repeat(120);
        let html = doc(&format!(
            r#"<div class="content"><p>On 14 Feb 2024 the company announced a buyback {long}</p><p>short</p></div>"#
        ));

        let (news, events, announcements) = extract_news_and_events(&html, SITE);

        assert!(news.is_empty() && events.is_empty());
        assert_eq!(announcements.len(), 1);
        assert!(announcements[0].title.ends_with("..."));
        assert_eq!(announcements[0].title.chars().count(), 103);
        assert_eq!(announcements[0].date.as_deref(), Some("14 Feb 2024"));
    }

    #[test]
    fn duplicate_titles_are_dropped() {
        let html = doc(
            r#"<div class="news-section"><ul>
                <li><h4>Same headline repeated twice</h4></li>
                <li><h4>Same headline repeated twice</h4></li>
            </ul></div>"#,
        );
        let (news, _, _) = extract_news_and_events(&html, SITE);
        assert_eq!(news.len(), 1);
    }
}
