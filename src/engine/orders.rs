use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{OrderBook, OrderEntry};
use crate::engine::dates::{find_date_token, DateNormalizer};
use crate::engine::html::{element_text, selector};
use crate::engine::EngineConfig;

static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELLS: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));
static CONTAINERS: LazyLock<Selector> = LazyLock::new(|| selector("div[class], ul[class], ol[class]"));
static ITEMS: LazyLock<Selector> = LazyLock::new(|| selector("li, p, div"));

static CONTAINER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)order|judgment|hearing").unwrap());

const ROW_MARKERS: [&str; 5] = ["order", "judgment", "date", "आदेश", "निर्णय"];
const ORDER_KEYWORDS: [&str; 4] = ["order", "judgment", "hearing", "notice"];

const MIN_ROW_TEXT: usize = 20;
const MIN_ITEM_TEXT: usize = 15;

/// Collects orders and case documents from a result page.
///
/// Three sources are read in turn: document links, order-like table rows and
/// elements whose class names mention orders. Entries are deduplicated by
/// description across all three.
pub struct OrderCollector<'a> {
    config: &'a EngineConfig,
    base: Option<Url>,
    dates: DateNormalizer,
}

impl<'a> OrderCollector<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            base: Url::parse(&config.base_url).ok(),
            dates: DateNormalizer::new(),
        }
    }

    pub fn collect(&self, document: &Html) -> OrderBook {
        let mut book = OrderBook::new();
        self.collect_links(document, &mut book);
        self.collect_rows(document, &mut book);
        self.collect_containers(document, &mut book);
        book
    }

    fn collect_links(&self, document: &Html, book: &mut OrderBook) {
        for anchor in document.select(&ANCHORS) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !self.is_document(href) {
                continue;
            }

            let text = element_text(anchor);
            let description = if text.is_empty() {
                self.config.document_placeholder.clone()
            } else {
                text.clone()
            };

            let date = find_date_token(&text)
                .map(str::to_string)
                .or_else(|| {
                    let parent = anchor.parent().and_then(ElementRef::wrap)?;
                    find_date_token(&element_text(parent)).map(str::to_string)
                })
                .map(|token| self.dates.normalize(&token));

            book.push(OrderEntry {
                description,
                document_link: Some(self.absolute(href)),
                date,
            });
        }
    }

    fn collect_rows(&self, document: &Html, book: &mut OrderBook) {
        for row in document.select(&ROWS) {
            let cells: Vec<String> = row.select(&CELLS).map(element_text).collect();
            if cells.len() < 2 {
                continue;
            }
            let first = cells[0].to_lowercase();
            if !ROW_MARKERS.iter().any(|m| first.contains(m)) {
                continue;
            }

            let joined = cells.join(" ");
            if joined.chars().count() <= MIN_ROW_TEXT || !mentions_order(&joined) {
                continue;
            }

            let date = find_date_token(&joined).map(|token| self.dates.normalize(token));
            book.push(OrderEntry {
                description: joined,
                document_link: self.first_document_link(row),
                date,
            });
        }
    }

    fn collect_containers(&self, document: &Html, book: &mut OrderBook) {
        let containers = document.select(&CONTAINERS).filter(|container| {
            container
                .value()
                .attr("class")
                .is_some_and(|class| CONTAINER_CLASS.is_match(class))
        });

        for container in containers {
            for item in container.select(&ITEMS) {
                let text = element_text(item);
                if text.chars().count() <= MIN_ITEM_TEXT || !mentions_order(&text) {
                    continue;
                }

                let date = find_date_token(&text).map(|token| self.dates.normalize(token));
                book.push(OrderEntry {
                    document_link: self.first_document_link(item),
                    description: text,
                    date,
                });
            }
        }
    }

    fn first_document_link(&self, element: ElementRef<'_>) -> Option<String> {
        element
            .select(&ANCHORS)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| self.is_document(href))
            .map(|href| self.absolute(href))
    }

    /// Whether the link path ends in a configured document extension
    fn is_document(&self, href: &str) -> bool {
        let path = href.split(['?', '#']).next().unwrap_or(href).to_lowercase();
        self.config
            .document_extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext.to_lowercase())))
    }

    fn absolute(&self, href: &str) -> String {
        self.base
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| href.to_string())
    }
}

fn mentions_order(text: &str) -> bool {
    let text = text.to_lowercase();
    ORDER_KEYWORDS.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(html: &str) -> Vec<OrderEntry> {
        let config = EngineConfig::default();
        OrderCollector::new(&config)
            .collect(&Html::parse_document(html))
            .into_entries(usize::MAX)
    }

    #[test]
    fn test_document_links_resolved_against_base() {
        let orders = collect(
            r#"<html><body>
                <p>Uploaded 12/01/2023 <a href="/orders/interim.PDF?v=2">Interim order</a></p>
                <a href="https://cdn.example/judgment.docx#page=1"></a>
                <a href="/orders/list.html">All orders</a>
            </body></html>"#,
        );

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].description, "Interim order");
        assert_eq!(
            orders[0].document_link.as_deref(),
            Some("https://wardha.dcourts.gov.in/orders/interim.PDF?v=2")
        );
        assert_eq!(orders[0].date.as_deref(), Some("2023-01-12"));
        assert_eq!(orders[1].description, "Court Document");
        assert_eq!(
            orders[1].document_link.as_deref(),
            Some("https://cdn.example/judgment.docx#page=1")
        );
    }

    #[test]
    fn test_order_rows() {
        let orders = collect(
            r#"<html><body><table>
                <tr><th>Order Date</th><th>Details</th></tr>
                <tr><td>Order dated 05-06-2022</td><td>Notice issued to respondent</td></tr>
                <tr><td>Petitioner</td><td>Ramesh Kumar, order of appearance</td></tr>
            </table></body></html>"#,
        );

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].description, "Order dated 05-06-2022 Notice issued to respondent");
        assert_eq!(orders[0].date.as_deref(), Some("2022-06-05"));
        assert_eq!(orders[0].document_link, None);
    }

    #[test]
    fn test_single_cell_rows_ignored() {
        let orders = collect(
            r#"<html><body><table>
                <tr><td>Order dated 05-06-2022 notice issued to all parties</td></tr>
            </table></body></html>"#,
        );

        assert!(orders.is_empty());
    }

    #[test]
    fn test_order_containers() {
        let orders = collect(
            r#"<html><body><ul class="order-list">
                <li>Next hearing fixed for arguments</li>
                <li>Short item</li>
                <li>Unrelated remark about parking</li>
            </ul></body></html>"#,
        );

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].description, "Next hearing fixed for arguments");
    }

    #[test]
    fn test_duplicates_across_sources_collapse() {
        let orders = collect(
            r#"<html><body><div class="orders">
                <p><a href="/o/1.pdf">Order dated 01-02-2023</a></p>
            </div></body></html>"#,
        );

        let descriptions: Vec<&str> = orders.iter().map(|o| o.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Order dated 01-02-2023"]);
        assert_eq!(
            orders[0].document_link.as_deref(),
            Some("https://wardha.dcourts.gov.in/o/1.pdf")
        );
    }
}
