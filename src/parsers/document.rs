//! Thin query layer over `scraper` so the extractors describe what they look
//! for, not how the tree is walked.

use scraper::{ElementRef, Html, Selector};

pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Compiles a selector known at build time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Concatenated text content with surrounding whitespace removed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn tag_name<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Element children only; text and comment nodes are skipped.
pub fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Element siblings after `element` at the same tree level.
pub fn following_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

pub fn parent_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

pub fn find_first<'a, P>(
    root: ElementRef<'a>,
    selector: &Selector,
    predicate: P,
) -> Option<ElementRef<'a>>
where
    P: Fn(&ElementRef<'a>) -> bool,
{
    root.select(selector).find(|element| predicate(element))
}

/// First element matching `selector` whose trimmed text equals `text`.
pub fn find_by_text<'a>(
    document: &'a Html,
    selector: &Selector,
    text: &str,
) -> Option<ElementRef<'a>> {
    find_first(document.root_element(), selector, |element| text_of(*element) == text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_skip_text_nodes() {
        let document =
            parse("<div><label for=\"a\">A</label>\n text <select id=\"a\"></select><p></p></div>");
        let label = document.select(&selector("label")).next().unwrap();
        let names: Vec<_> = following_siblings(label).map(|e| tag_name(&e)).collect();
        assert_eq!(names, vec!["select", "p"]);
    }

    #[test]
    fn finds_header_cell_by_caption() {
        let document = parse("<table><tr><th> Socket: </th><td>AM4</td></tr></table>");
        let th = find_by_text(&document, &selector("th"), "Socket:").unwrap();
        let row = parent_element(th).unwrap();
        assert_eq!(tag_name(&row), "tr");
        assert!(find_by_text(&document, &selector("th"), "Cores:").is_none());
    }
}
