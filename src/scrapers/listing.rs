use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use crate::config::join_base_url;
use crate::error::{ExtractError, Result};
use crate::models::{ComponentRecord, FilterSelection, FilterVocabulary, SortKey};
use crate::parsers::document::{element_children, parse, selector, tag_name, text_of};
use crate::parsers::strip_cell_text;

/// Rows at the top of the listing table that carry no component: the column
/// header row and the decorative row under it.
pub const LEADING_NON_DATA_ROWS: usize = 2;

static RESULTS: Lazy<Selector> = Lazy::new(|| selector("div#list"));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static HEADER_ROW: Lazy<Selector> =
    Lazy::new(|| selector("thead.colheader tr, tr.colheader"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Checks every selected field and value against `vocabulary`, stopping at the
/// first violation.
pub fn validate_selection(
    selection: &FilterSelection,
    vocabulary: &FilterVocabulary,
) -> Result<()> {
    for (field, value) in selection.iter() {
        let Some(allowed) = vocabulary.options(field) else {
            return Err(ExtractError::UnknownFilter(field.to_string()));
        };
        if !allowed.contains(value) {
            return Err(ExtractError::InvalidFilterValue {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Query suffix for a listing request. No selection means no query at all, so
/// the site applies its own default ordering.
pub fn build_query(selection: Option<&FilterSelection>, sort: SortKey) -> String {
    let Some(selection) = selection else {
        return String::new();
    };

    let pairs: Vec<(&str, &str)> = selection
        .iter()
        .chain(std::iter::once(("sort", sort.as_str())))
        .collect();

    // Encoding a flat list of string pairs cannot fail.
    let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    format!("?{query}")
}

/// Turns a listing page into records, in row order. Relative detail links
/// are prefixed with `base_url`, the same way listing URLs are built.
pub fn parse_listing(html: &str, base_url: &str) -> Result<Vec<ComponentRecord>> {
    let document = parse(html);

    let results = document
        .select(&RESULTS)
        .next()
        .ok_or(ExtractError::MissingMarkup("div#list"))?;
    let table = results
        .select(&TABLE)
        .next()
        .ok_or(ExtractError::MissingMarkup("div#list table"))?;
    let header_row = table
        .select(&HEADER_ROW)
        .next()
        .ok_or(ExtractError::MissingMarkup("colheader row"))?;

    let headers: Vec<String> = element_children(header_row)
        .filter(|cell| tag_name(cell) == "th")
        .map(|cell| strip_cell_text(&text_of(cell)))
        .collect();
    debug!("Listing headers: {:?}", headers);

    // Every header names exactly one field, so repeated (or repeated blank)
    // header texts cannot be mapped.
    if let Some(duplicate) = first_duplicate(&headers) {
        return Err(ExtractError::DuplicateHeader(duplicate.to_string()));
    }

    let rows: Vec<ElementRef<'_>> = table.select(&ROW).collect();
    if rows.len() < LEADING_NON_DATA_ROWS {
        return Err(ExtractError::RowLayout {
            expected: LEADING_NON_DATA_ROWS,
            found: rows.len(),
        });
    }

    for (index, row) in rows.iter().take(LEADING_NON_DATA_ROWS).enumerate() {
        if looks_like_data_row(*row, headers.len()) {
            warn!(
                "Skipped listing row {} looks like a component row; page layout may have changed",
                index
            );
        }
    }

    rows.iter()
        .enumerate()
        .skip(LEADING_NON_DATA_ROWS)
        .map(|(index, row)| parse_row(index, *row, &headers, base_url))
        .collect()
}

fn parse_row(
    index: usize,
    row: ElementRef<'_>,
    headers: &[String],
    base_url: &str,
) -> Result<ComponentRecord> {
    let href = row
        .select(&ANCHOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .ok_or(ExtractError::MissingLink { row: index })?;
    let link = join_base_url(base_url, href.trim());

    let cells: Vec<ElementRef<'_>> = element_children(row).collect();
    if cells.len() != headers.len() {
        return Err(ExtractError::RowShape {
            row: index,
            expected: headers.len(),
            found: cells.len(),
        });
    }

    let mut record = ComponentRecord::new(link);
    for (header, cell) in headers.iter().zip(cells) {
        record.insert(header.clone(), strip_cell_text(&cell.text().collect::<String>()));
    }
    Ok(record)
}

fn first_duplicate(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .enumerate()
        .find(|(i, header)| headers[..*i].contains(header))
        .map(|(_, header)| header.as_str())
}

fn looks_like_data_row(row: ElementRef<'_>, columns: usize) -> bool {
    let has_link = row
        .select(&ANCHOR)
        .any(|anchor| anchor.value().attr("href").is_some());
    has_link && element_children(row).filter(|cell| tag_name(cell) == "td").count() == columns
}
