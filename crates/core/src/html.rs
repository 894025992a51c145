use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// read access to a single element of a parsed document.
pub trait HtmlElement: Sized {
    /// concatenated text content of the element and its descendants.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<&str>;

    /// first descendant with the given tag.
    fn find(&self, tag: &str) -> Option<Self>;
}

/// the queries the page extractors need from an html document.
pub trait HtmlQuery {
    type Element<'a>: HtmlElement
    where
        Self: 'a;

    /// first `tag` element whose class list contains `class`.
    fn find_class(&self, tag: &str, class: &str) -> Option<Self::Element<'_>>;

    /// every `tag` element matching one of `class_lists`. a single-class entry
    /// matches any element carrying that class; a multi-class entry must equal
    /// the element's whole normalized class list.
    fn find_all_class_lists(&self, tag: &str, class_lists: &[&str]) -> Vec<Self::Element<'_>>;

    /// first `tag` element carrying `attr`, optionally with an exact `value`.
    fn find_attr(&self, tag: &str, attr: &str, value: Option<&str>) -> Option<Self::Element<'_>>;
}

/// an html document parsed with `scraper`.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageElement<'a>(ElementRef<'a>);

impl PageElement<'_> {
    /// whitespace-normalized `class` attribute, used as a season marker.
    pub fn class_list(&self) -> String {
        normalize_class_list(self.0.value().attr("class").unwrap_or_default())
    }
}

impl HtmlElement for PageElement<'_> {
    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn find(&self, tag: &str) -> Option<Self> {
        let selector = selector(tag)?;
        self.0.select(&selector).next().map(PageElement)
    }
}

impl HtmlQuery for Page {
    type Element<'a> = PageElement<'a>;

    fn find_class(&self, tag: &str, class: &str) -> Option<PageElement<'_>> {
        let selector = selector(&format!("{tag}.{class}"))?;
        self.html.select(&selector).next().map(PageElement)
    }

    fn find_all_class_lists(&self, tag: &str, class_lists: &[&str]) -> Vec<PageElement<'_>> {
        let Some(selector) = selector(tag) else {
            return Vec::new();
        };
        let wanted: Vec<String> = class_lists
            .iter()
            .map(|list| normalize_class_list(list))
            .collect();

        self.html
            .select(&selector)
            .map(PageElement)
            .filter(|element| {
                let class_list = element.class_list();
                wanted.iter().any(|entry| {
                    if entry.contains(' ') {
                        *entry == class_list
                    } else {
                        class_list.split(' ').any(|class| class == entry)
                    }
                })
            })
            .collect()
    }

    fn find_attr(&self, tag: &str, attr: &str, value: Option<&str>) -> Option<PageElement<'_>> {
        let css = match value {
            Some(value) => format!(r#"{tag}[{attr}="{value}"]"#),
            None => format!("{tag}[{attr}]"),
        };
        let selector = selector(&css)?;
        self.html.select(&selector).next().map(PageElement)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css)
        .inspect_err(|err| debug!(css, error = %err, "invalid selector"))
        .ok()
}

fn normalize_class_list(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
