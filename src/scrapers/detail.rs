use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::{ExtractError, Result};
use crate::models::{CpuDetail, MemorySupport};
use crate::parsers::document::{
    find_by_text, following_siblings, parent_element, parse, selector, tag_name, text_of,
};
use crate::parsers::{parse_ddr_generation, parse_pcie, parse_power_rating, parse_rated_speed};

pub const PCIE_CAPTION: &str = "PCI-Express:";
pub const MEMORY_CAPTION: &str = "Memory Support:";
pub const RATED_SPEED_CAPTION: &str = "Rated Speed:";
pub const TDP_TERM: &str = "TDP";

static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
static TD: Lazy<Selector> = Lazy::new(|| selector("td"));
static DT: Lazy<Selector> = Lazy::new(|| selector("dt"));

pub fn parse_cpu_detail(html: &str) -> Result<CpuDetail> {
    let document = parse(html);

    let pcie = parse_pcie(&caption_value(&document, PCIE_CAPTION)?)?;
    let memory = MemorySupport {
        ddr_generation: parse_ddr_generation(&caption_value(&document, MEMORY_CAPTION)?)?,
        speed_mts: parse_rated_speed(&caption_value(&document, RATED_SPEED_CAPTION)?)?,
    };

    Ok(CpuDetail { pcie, memory })
}

pub fn parse_gpu_power_rating(html: &str) -> Result<u32> {
    let document = parse(html);

    let term = find_by_text(&document, &DT, TDP_TERM)
        .ok_or_else(|| ExtractError::MissingLabel(TDP_TERM.to_string()))?;
    let definition = following_siblings(term)
        .find(|sibling| tag_name(sibling) == "dd")
        .ok_or(ExtractError::MissingMarkup("dd after TDP"))?;

    parse_power_rating(&text_of(definition))
}

/// Trimmed text of the `td` sharing a row with the `th` captioned `caption`.
fn caption_value(document: &Html, caption: &str) -> Result<String> {
    let missing = || ExtractError::MissingLabel(caption.to_string());

    let header = find_by_text(document, &TH, caption).ok_or_else(missing)?;
    let value = parent_element(header)
        .and_then(|row| row.select(&TD).next())
        .ok_or_else(missing)?;

    Ok(text_of(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPU_PAGE: &str = r#"
        <html><body>
        <section class="details"><h1>Processor</h1>
          <table>
            <tr><th>Socket:</th><td>AMD Socket AM4</td></tr>
            <tr><th>PCI-Express:</th><td>
              Gen 4, 24 Lanes<br>(CPU only)
            </td></tr>
          </table>
          <table>
            <tr><th>Memory Support:</th><td>DDR4</td></tr>
            <tr><th>Rated Speed:</th><td>3200 MHz</td></tr>
          </table>
        </section>
        </body></html>"#;

    #[test]
    fn cpu_page_yields_bus_and_memory() {
        let detail = parse_cpu_detail(CPU_PAGE).unwrap();
        assert_eq!(detail.pcie.generation, 4.0);
        assert_eq!(detail.pcie.lanes, 24);
        assert_eq!(detail.memory.ddr_generation, 4);
        assert_eq!(detail.memory.speed_mts, 3200);
    }

    #[test]
    fn missing_caption_is_fatal() {
        let page = CPU_PAGE.replace("Rated Speed:", "Speed:");
        assert!(matches!(
            parse_cpu_detail(&page),
            Err(ExtractError::MissingLabel(label)) if label == RATED_SPEED_CAPTION
        ));
    }

    #[test]
    fn unparsable_value_is_fatal() {
        let page = CPU_PAGE.replace("3200 MHz", "N/A");
        assert!(matches!(
            parse_cpu_detail(&page),
            Err(ExtractError::DetailParse { field: "rated memory speed", .. })
        ));
    }

    #[test]
    fn gpu_tdp_from_definition_list() {
        let page = r#"<dl class="clearfix"><dt>Board Design</dt><dd>Dual-slot</dd>
                      <dt>TDP</dt>
                      <dd>65 W</dd></dl>"#;
        assert_eq!(parse_gpu_power_rating(page).unwrap(), 65);
    }

    #[test]
    fn gpu_tdp_absent_or_unknown() {
        assert!(matches!(
            parse_gpu_power_rating("<dl><dt>Slot Width</dt><dd>Dual-slot</dd></dl>"),
            Err(ExtractError::MissingLabel(_))
        ));
        assert!(matches!(
            parse_gpu_power_rating("<dl><dt>TDP</dt><dd>unknown</dd></dl>"),
            Err(ExtractError::DetailParse { field: "TDP", .. })
        ));
    }
}
