//! Listing page parsing.

use std::collections::HashSet;

use lazy_static::lazy_static;
use nf_core::{Error, ListingItem, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

lazy_static! {
    static ref NEWS_ITEM: Selector = Selector::parse("ul.newsList li").expect("valid selector");
    static ref SUBJECT_LINK: Selector = Selector::parse("dd.articleSubject a").expect("valid selector");
    static ref SUMMARY: Selector = Selector::parse("dd.articleSummary").expect("valid selector");
    static ref PRESS: Selector = Selector::parse("span.press").expect("valid selector");
    /// Inline decorations rendered inside the summary block.
    static ref SUMMARY_NOISE: Selector =
        Selector::parse("span.press, span.wdate, span.bar").expect("valid selector");
}

/// Parse a decoded listing page into its complete items.
///
/// Fails with [`Error::Structure`] when the page has no listing nodes at all;
/// items missing a required field are dropped and logged.
pub fn parse_listing(html: &str) -> Result<Vec<ListingItem>> {
    let document = Html::parse_document(html);
    let nodes: Vec<ElementRef<'_>> = document.select(&NEWS_ITEM).collect();

    if nodes.is_empty() {
        return Err(Error::Structure(
            "could not find news list (ul.newsList li)".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(nodes.len());
    for node in nodes {
        let item = parse_item(node);
        let missing = item.missing_fields();
        if missing.is_empty() {
            items.push(item);
        } else {
            warn!(
                missing = ?missing,
                html = %node.html(),
                "Missing required news elements, skipping item"
            );
        }
    }

    debug!(count = items.len(), "Parsed listing items");
    Ok(items)
}

fn parse_item(node: ElementRef<'_>) -> ListingItem {
    let subject = node.select(&SUBJECT_LINK).next();
    let title = subject.map(|a| collect_text(a).trim().to_string()).unwrap_or_default();
    let link = subject
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    let (summary, source) = match node.select(&SUMMARY).next() {
        Some(block) => {
            let source = block
                .select(&PRESS)
                .map(collect_text)
                .collect::<String>()
                .trim()
                .to_string();
            let summary = text_without(block, &SUMMARY_NOISE).trim().to_string();
            (summary, source)
        }
        None => (String::new(), String::new()),
    };

    ListingItem {
        title,
        summary,
        source,
        link,
    }
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of `element` with every subtree matching `excluded` left out.
pub(crate) fn text_without(element: ElementRef<'_>, excluded: &Selector) -> String {
    let skipped: HashSet<_> = element.select(excluded).map(|e| e.id()).collect();
    let mut out = String::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_skipped = node
            .ancestors()
            .take_while(|a| a.id() != element.id())
            .any(|a| skipped.contains(&a.id()));
        if !inside_skipped {
            out.push_str(text);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(items: &str) -> String {
        format!(
            r#"<html><body><div class="mainNewsList"><ul class="newsList">{}</ul></div></body></html>"#,
            items
        )
    }

    fn item_html(title: &str, href: &str, summary: &str, press: &str) -> String {
        let subject = if href.is_empty() {
            format!(r#"<dd class="articleSubject"><a>{}</a></dd>"#, title)
        } else {
            format!(r#"<dd class="articleSubject"><a href="{}">{}</a></dd>"#, href, title)
        };
        let press = if press.is_empty() {
            String::new()
        } else {
            format!(r#"<span class="press">{}</span>"#, press)
        };
        format!(
            r#"<li><dl>{}<dd class="articleSummary">{}
                {}<span class="bar">|</span><span class="wdate">2024-05-02 09:15:00</span>
            </dd></dl></li>"#,
            subject, summary, press
        )
    }

    const LINK: &str = "/news/news_read.naver?article_id=0005012345&office_id=015&mode=mainnews";

    #[test]
    fn test_parses_complete_item() {
        let html = listing(&item_html("코스피, 외국인 매수에 상승", LINK, "외국인이 순매수했다.", "한국경제"));
        let items = parse_listing(&html).unwrap();

        assert_eq!(
            items,
            vec![ListingItem {
                title: "코스피, 외국인 매수에 상승".to_string(),
                summary: "외국인이 순매수했다.".to_string(),
                source: "한국경제".to_string(),
                link: LINK.to_string(),
            }]
        );
    }

    #[test]
    fn test_summary_excludes_inline_spans() {
        let html = listing(&item_html("t", LINK, "Body text", "Press"));
        let item = &parse_listing(&html).unwrap()[0];
        assert_eq!(item.summary, "Body text");
        assert!(!item.summary.contains('|'));
        assert!(!item.summary.contains("2024"));
        assert!(!item.summary.contains("Press"));
    }

    #[test]
    fn test_no_listing_nodes_is_structure_error() {
        let html = "<html><body><ul class=\"other\"><li>x</li></ul></body></html>";
        assert!(matches!(parse_listing(html), Err(Error::Structure(_))));
    }

    #[test]
    fn test_every_incomplete_combination_is_dropped() {
        // Bit i set means field i is empty: title, summary, source, link.
        for mask in 1u8..16 {
            let pick = |bit: u8, value: &'static str| if mask & (1 << bit) != 0 { "" } else { value };
            let html = listing(&item_html(
                pick(0, "Title"),
                pick(3, LINK),
                pick(1, "Summary"),
                pick(2, "Press"),
            ));
            let items = parse_listing(&html).unwrap();
            assert!(items.is_empty(), "mask {mask:04b} produced {items:?}");
        }
    }

    #[test]
    fn test_incomplete_items_do_not_hide_complete_ones() {
        let html = listing(&format!(
            "{}{}",
            item_html("", LINK, "Summary", "Press"),
            item_html("Kept", LINK, "Summary", "Press"),
        ));
        let items = parse_listing(&html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept");
    }

    #[test]
    fn test_missing_summary_block() {
        let html = listing(&format!(r#"<li><dd class="articleSubject"><a href="{}">T</a></dd></li>"#, LINK));
        assert!(parse_listing(&html).unwrap().is_empty());
    }
}
