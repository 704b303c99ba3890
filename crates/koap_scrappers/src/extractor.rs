use koap_core::{Error, Result};
use scraper::{ElementRef, Html, Node, Selector};

pub const FALLBACK_TITLE: &str = "Статья";

const TITLE_SELECTOR: &str = ".article-title, .post-title, .title";
const OG_TITLE_SELECTOR: &str = r#"meta[property="og:title"]"#;
const CONTENT_SELECTOR: &str =
    ".article-text, .content, .post-content, #content, .text, .article-content";
const CHROME_SELECTOR: &str = "nav, header, footer, aside, .menu, .sidebar, .footer, .header";

/// Paragraph prefixes the sibling walk drops as boilerplate.
const BOILERPLATE_PREFIXES: [&str; 2] = ["©", "Источник:"];

/// Elements whose boundaries separate words in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Never rendered as text.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
}

/// Pulls the title and body out of the site's article templates.
pub struct Extractor {
    h1: Selector,
    title: Selector,
    og_title: Selector,
    content: Selector,
    body: Selector,
    chrome: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", css, e)))
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            h1: selector("h1")?,
            title: selector(TITLE_SELECTOR)?,
            og_title: selector(OG_TITLE_SELECTOR)?,
            content: selector(CONTENT_SELECTOR)?,
            body: selector("body")?,
            chrome: selector(CHROME_SELECTOR)?,
        })
    }

    pub fn extract(&self, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);
        ExtractedPage {
            title: self.extract_title(&document),
            text: self.extract_body(&document),
        }
    }

    pub fn extract_title(&self, document: &Html) -> String {
        let from_h1 = document.select(&self.h1).next().map(element_text);
        let from_class = || document.select(&self.title).next().map(element_text);
        let from_meta = || {
            document
                .select(&self.og_title)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(|content| content.trim().to_string())
        };

        from_h1
            .filter(|t| !t.is_empty())
            .or_else(|| from_class().filter(|t| !t.is_empty()))
            .or_else(|| from_meta().filter(|t| !t.is_empty()))
            .unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }

    pub fn extract_body(&self, document: &Html) -> String {
        if let Some(content) = document.select(&self.content).next() {
            return element_text(content);
        }

        if let Some(h1) = document.select(&self.h1).next() {
            return self.walk_siblings(h1);
        }

        // Last resort: whatever the page body says, minus navigation chrome.
        let root = document
            .select(&self.body)
            .next()
            .unwrap_or_else(|| document.root_element());
        let mut out = String::new();
        collect_text(root, &|el| self.chrome.matches(el), &mut out);
        collapse_whitespace(&out)
    }

    /// Legacy layout: the article is a run of `p`/`div` siblings after the
    /// heading, up to the next heading.
    fn walk_siblings(&self, h1: ElementRef) -> String {
        let mut text = element_text(h1);
        text.push('\n');

        let siblings = h1
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|el| el.value().name() != "h1");

        for sibling in siblings {
            let el = sibling.value();
            let wanted = matches!(el.name(), "p" | "div")
                || el.classes().any(|c| c == "article" || c == "content");
            if !wanted {
                continue;
            }

            let paragraph = element_text(sibling);
            if paragraph.is_empty() || BOILERPLATE_PREFIXES.iter().any(|p| paragraph.starts_with(p)) {
                continue;
            }
            text.push_str(&paragraph);
            text.push('\n');
        }

        text.trim().to_string()
    }
}

/// Rendered text of an element: descendant text with whitespace collapsed.
pub fn element_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &|_| false, &mut out);
    collapse_whitespace(&out)
}

fn collect_text(element: ElementRef, skip: &dyn Fn(&ElementRef) -> bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else { continue };
                if INVISIBLE_TAGS.contains(&el.name()) || skip(&child_el) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                collect_text(child_el, skip, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
