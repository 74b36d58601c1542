//! Seasons: the competition dropdown (`#comp`) of the results page.

use scraper::{ElementRef, Html};
use serde_json::{json, Value};

use crate::app::{Result, TapError};
use crate::domain::season::expand_year;
use crate::domain::{Record, Season, SeasonYears};
use crate::streams::html::selector;
use crate::streams::tokens::DigitRuns;
use crate::streams::Records;

pub fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" },
            "years": {
                "type": "object",
                "properties": {
                    "start": { "type": "integer" },
                    "end": { "type": "integer" }
                }
            }
        }
    })
}

pub fn validate(doc: &Html) -> Result<()> {
    let form = doc.select(&selector("#comp")?).next().ok_or_else(|| {
        TapError::RetriableStructure("Cannot find season form in page source".into())
    })?;

    if form.select(&selector("option")?).count() < 2 {
        return Err(TapError::RetriableStructure(
            "Cannot find season dropdown options in page source".into(),
        ));
    }

    Ok(())
}

/// One season per option; the first option is a placeholder and is skipped.
pub fn extract(doc: &Html) -> Result<Records<'_>> {
    let option = selector("option")?;
    let options: Vec<ElementRef<'_>> = match doc.select(&selector("#comp")?).next() {
        Some(form) => form.select(&option).skip(1).collect(),
        None => Vec::new(),
    };

    Ok(Box::new(
        options
            .into_iter()
            .map(|option| parse_option(&option).map(Record::from)),
    ))
}

fn parse_option(option: &ElementRef<'_>) -> Result<Season> {
    let value = option
        .value()
        .attr("value")
        .ok_or_else(|| TapError::malformed("season option has no value attribute"))?;
    let id = value
        .trim()
        .parse()
        .map_err(|e| TapError::malformed(format!("season option value `{}`: {}", value, e)))?;

    let name: String = option.text().collect();
    let runs = DigitRuns::parse(&name);
    let year = |index: usize| {
        runs.token(index).and_then(expand_year).ok_or_else(|| {
            TapError::malformed(format!("season label `{}` lacks two year numbers", name))
        })
    };

    let years = SeasonYears {
        start: year(0)?,
        end: year(1)?,
    };

    Ok(Season { id, name, years })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(options: &str) -> Html {
        Html::parse_document(&format!(
            r#"<form id="comp"><select name="comp_id">
            <option value="-1">Select competition</option>
            {}
            </select></form>"#,
            options
        ))
    }

    fn seasons(doc: &Html) -> Vec<Season> {
        extract(doc)
            .unwrap()
            .map(|r| match r.unwrap() {
                Record::Season(s) => s,
                other => panic!("unexpected record {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_extract_single_season() {
        let doc = page(r#"<option value="689">Premier League 21/22</option>"#);
        validate(&doc).unwrap();

        assert_eq!(
            seasons(&doc),
            vec![Season {
                id: 689,
                name: "Premier League 21/22".into(),
                years: SeasonYears {
                    start: 2021,
                    end: 2022
                },
            }]
        );
    }

    #[test]
    fn test_extract_multiple_seasons_across_centuries() {
        let doc = page(
            r#"<option value="689">Premier League 21/22</option>
            <option value="600">Premier League 99/00</option>"#,
        );
        validate(&doc).unwrap();

        let seasons = seasons(&doc);
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[1].id, 600);
        assert_eq!(seasons[1].years, SeasonYears { start: 1999, end: 2000 });
    }

    #[test]
    fn test_missing_form_is_retriable() {
        let doc = Html::parse_document("<div></div>");
        let err = validate(&doc).unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(err.to_string(), "Cannot find season form in page source");
    }

    #[test]
    fn test_placeholder_only_is_retriable() {
        let doc = page("");
        let err = validate(&doc).unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(
            err.to_string(),
            "Cannot find season dropdown options in page source"
        );
    }

    #[test]
    fn test_label_without_years_is_malformed() {
        let doc = page(r#"<option value="7">World Cup</option>"#);
        validate(&doc).unwrap();

        let first = extract(&doc).unwrap().next().unwrap();
        assert!(matches!(first, Err(TapError::MalformedFragment(_))));
    }
}
