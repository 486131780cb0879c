// src/extract/tiles.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::TableError;

static WIDGET: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#agency-tiles-widget").expect("widget selector"));
static NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.h4.w200").expect("agency name selector"));
static AMOUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.h1.w900").expect("agency amount selector"));

/// Summary tile for one agency on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyTile {
    pub name: String,
    pub amount: String,
}

/// Pair agency names with their total spending, in tile order.
pub fn extract_agency_tiles(markup: &str) -> Result<Vec<AgencyTile>, TableError> {
    let doc = Html::parse_document(markup);
    let widget = doc
        .select(&WIDGET)
        .next()
        .ok_or(TableError::MalformedTable {
            missing: "#agency-tiles-widget",
        })?;

    let names: Vec<String> = widget
        .select(&NAME)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();
    let amounts: Vec<String> = widget
        .select(&AMOUNT)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    if names.len() != amounts.len() {
        warn!(
            names = names.len(),
            amounts = amounts.len(),
            "agency tile counts differ; pairing up to the shorter list"
        );
    }

    let tiles: Vec<AgencyTile> = names
        .into_iter()
        .zip(amounts)
        .map(|(name, amount)| AgencyTile { name, amount })
        .collect();
    debug!(count = tiles.len(), "extracted agency tiles");
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"
        <div id="agency-tiles-widget">
          <div class="col-sm-4 text-center noUnderline">
            <a href="/drupal/summary/393"><div class="row top-gutter-20">
              <span class="h4 w200">Department of Agriculture</span>
              <span class=" h1 w900">$2.8B</span>
            </div></a>
          </div>
          <div class="col-sm-4 text-center noUnderline">
            <a href="/drupal/summary/422"><div class="row top-gutter-20">
              <span class="h4 w200">National Science Foundation</span>
              <span class=" h1 w900">$156.7M</span>
            </div></a>
          </div>
        </div>"#;

    #[test]
    fn pairs_names_and_amounts() {
        let tiles = extract_agency_tiles(HOME).unwrap();
        assert_eq!(
            tiles,
            vec![
                AgencyTile {
                    name: "Department of Agriculture".into(),
                    amount: "$2.8B".into(),
                },
                AgencyTile {
                    name: "National Science Foundation".into(),
                    amount: "$156.7M".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_widget_is_an_error() {
        assert!(extract_agency_tiles("<div id=\"other\"></div>").is_err());
    }

    #[test]
    fn uneven_counts_pair_up_to_shorter() {
        let html = r#"<div id="agency-tiles-widget">
            <span class="h4 w200">A</span><span class="h1 w900">$1</span>
            <span class="h4 w200">B</span></div>"#;
        let tiles = extract_agency_tiles(html).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].name, "A");
    }
}
