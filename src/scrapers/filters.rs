use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::models::FilterVocabulary;
use crate::parsers::document::{following_siblings, parse, selector};

static FILTERS: Lazy<Selector> = Lazy::new(|| selector(".filters"));
static LABEL: Lazy<Selector> = Lazy::new(|| selector("label"));
static OPTION: Lazy<Selector> = Lazy::new(|| selector("option"));

const CLOSE_TITLE: &str = "Close";

/// Builds the filter vocabulary from a listing page. A page without a
/// filters container yields an empty vocabulary.
pub fn parse_filter_vocabulary(html: &str) -> FilterVocabulary {
    let document = parse(html);
    let mut vocabulary = FilterVocabulary::new();

    let Some(container) = document.select(&FILTERS).next() else {
        debug!("No filters container on page");
        return vocabulary;
    };

    for label in container.select(&LABEL).filter(|label| !is_close_control(label)) {
        let Some(field) = label.value().attr("for") else {
            debug!("Skipping label without a bound control");
            continue;
        };
        vocabulary.insert_field(field, bound_options(label, field));
    }

    vocabulary
}

fn is_close_control(label: &ElementRef<'_>) -> bool {
    label.value().attr("title") == Some(CLOSE_TITLE)
}

/// Non-empty option values of the control `label` is bound to: the first
/// following sibling whose id or name is `field`, else the first following
/// sibling element.
fn bound_options(label: ElementRef<'_>, field: &str) -> Vec<String> {
    let bound = following_siblings(label)
        .find(|sibling| {
            let element = sibling.value();
            element.id() == Some(field) || element.attr("name") == Some(field)
        })
        .or_else(|| following_siblings(label).next());

    bound
        .map(|list| {
            list.select(&OPTION)
                .filter_map(|option| option.value().attr("value"))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body>
        <fieldset class="filters">
          <label title="Close" class="close">&times;</label>
          <div class="filter">
            <label for="mfgr">Manufacturer</label>
            <select name="mfgr" id="mfgr">
              <option value="">All</option>
              <option value="AMD">AMD</option>
              <option value="Intel">Intel</option>
            </select>
          </div>
          <div class="filter">
            <label for="socket">Socket</label>
            <span class="hint">pick one</span>
            <select name="socket" id="socket">
              <option value="">All</option>
              <option value="AMD Socket AM4">AM4</option>
            </select>
          </div>
          <div class="filter">
            <label for="igp">Integrated Graphics</label>
            <select name="igp" id="igp"><option value="">All</option></select>
          </div>
        </fieldset>
        </body></html>"#;

    #[test]
    fn collects_options_per_field_without_close_control() {
        let vocabulary = parse_filter_vocabulary(PAGE);

        let fields: Vec<_> = vocabulary.fields().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["igp", "mfgr", "socket"]);
        assert!(!vocabulary.contains_field(CLOSE_TITLE));

        let mfgr: Vec<_> = vocabulary.options("mfgr").unwrap().iter().cloned().collect();
        assert_eq!(mfgr, vec!["AMD".to_string(), "Intel".to_string()]);
        assert!(vocabulary.options("socket").unwrap().contains("AMD Socket AM4"));
    }

    #[test]
    fn field_without_values_is_kept_empty() {
        let vocabulary = parse_filter_vocabulary(PAGE);
        assert!(vocabulary.options("igp").unwrap().is_empty());
    }

    #[test]
    fn missing_container_gives_empty_vocabulary() {
        let vocabulary =
            parse_filter_vocabulary("<html><body><label for=\"x\">X</label></body></html>");
        assert!(vocabulary.is_empty());
    }
}
