//! HTML utility functions for navigating and extracting data from page trees.

use scraper::{ElementRef, Html, Selector};

use crate::error::{HarvesterError, Result};

/// A link found in the page: its trimmed text and raw `href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// Parse a response body into a document tree.
#[must_use]
pub fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

/// Compile a CSS selector.
///
/// # Examples
/// ```
/// use spectrum_harvester::html::selector;
///
/// assert!(selector("div#unit-definition").is_ok());
/// assert!(selector("div[").is_err());
/// ```
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvesterError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// First descendant of `scope` matching `css`.
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

/// All descendants of `scope` matching `css`, in document order.
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

/// First element in the whole document matching `css`.
pub fn find_in_document<'a>(doc: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).next())
}

/// All text below an element, concatenated without separators.
#[must_use]
pub fn raw_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// All text below an element, with surrounding whitespace stripped.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    raw_text(el).trim().to_string()
}

/// First link below an element, if it has an `href`.
#[must_use]
pub fn first_link(el: ElementRef<'_>) -> Option<Link> {
    let sel = selector("a").ok()?;
    let anchor = el.select(&sel).next()?;
    let href = anchor.value().attr("href")?;
    Some(Link {
        text: element_text(anchor),
        href: href.to_string(),
    })
}

/// Parent element, skipping non-element nodes.
#[must_use]
pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Element children of `el` with the given tag name.
pub fn child_elements<'a>(el: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

/// Whether `el` has an ancestor with the given tag strictly below `container`.
#[must_use]
pub fn has_ancestor_below(el: ElementRef<'_>, tag: &str, container: ElementRef<'_>) -> bool {
    for ancestor in el.ancestors() {
        if ancestor.id() == container.id() {
            return false;
        }
        if ancestor
            .value()
            .as_element()
            .is_some_and(|e| e.name() == tag)
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <main class="site-main wide">
            <h1> Object name </h1>
            <div id="unitlist">
              <ul>
                <li><a href="/a/">A</a>
                  <ul><li><a href="/a1/">A1</a></li></ul>
                </li>
                <li><a href="/b/">B</a></li>
              </ul>
            </div>
          </main>
        </body></html>"#;

    #[test]
    fn test_find_by_class_among_several() {
        let doc = parse(PAGE);
        let main = find_in_document(&doc, "main.site-main").unwrap();
        assert!(main.is_some());
    }

    #[test]
    fn test_element_text_is_trimmed() {
        let doc = parse(PAGE);
        let h1 = find_in_document(&doc, "h1").unwrap().unwrap();
        assert_eq!(element_text(h1), "Object name");
        assert_eq!(raw_text(h1), " Object name ");
    }

    #[test]
    fn test_first_link() {
        let doc = parse(PAGE);
        let list = find_in_document(&doc, "div#unitlist").unwrap().unwrap();
        let link = first_link(list).unwrap();
        assert_eq!(
            link,
            Link {
                text: "A".to_string(),
                href: "/a/".to_string()
            }
        );
    }

    #[test]
    fn test_has_ancestor_below() {
        let doc = parse(PAGE);
        let list = find_in_document(&doc, "div#unitlist").unwrap().unwrap();
        let items = select_all(list, "li").unwrap();
        let top_level: Vec<String> = items
            .into_iter()
            .filter(|li| !has_ancestor_below(*li, "li", list))
            .filter_map(|li| first_link(li).map(|l| l.text))
            .collect();
        assert_eq!(top_level, vec!["A", "B"]);
    }

    #[test]
    fn test_child_elements() {
        let doc = parse(PAGE);
        let ul = find_in_document(&doc, "div#unitlist > ul").unwrap().unwrap();
        assert_eq!(child_elements(ul, "li").count(), 2);
    }

    #[test]
    fn test_parent_element() {
        let doc = parse(r#"<p>Intro <a href="/g/">Group</a> tail</p>"#);
        let a = find_in_document(&doc, "p > a[href]").unwrap().unwrap();
        let p = parent_element(a).unwrap();
        assert_eq!(element_text(p), "Intro Group tail");
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(
            selector(":::"),
            Err(HarvesterError::InvalidSelector { .. })
        ));
    }
}
