//! Matches: date-sectioned result rows of the results page.
//!
//! The page alternates a date heading (`.slateGrey`) with a result list
//! (`ul.matchLineup`); the n-th heading dates the n-th list. Each row holds
//! six spans: dropdown, home team, versus link with the score, away team,
//! kick-off time, stats link.

use chrono::{NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};

use crate::app::{Result, TapError};
use crate::domain::{HomeAway, Match, Record, Team};
use crate::streams::html::{href, selector, text_content};
use crate::streams::tokens::{club_id, DigitRuns, FixtureRef, FIXTURE_HREF_TOKENS};
use crate::streams::Records;

const ROW_SPANS: usize = 6;
const HOME_SPAN: usize = 1;
const VERSUS_SPAN: usize = 2;
const AWAY_SPAN: usize = 3;
const TIME_SPAN: usize = 4;

/// Heading text format, e.g. `Wednesday 16 March 2022`
const HEADING_DATE_FORMAT: &str = "%A %-d %B %Y";
const TIMESTAMP_FORMAT: &str = "%A %d %B %Y %H:%M";

pub fn schema() -> Value {
    let team = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" }
        }
    });
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "comp_id": { "type": "integer" },
            "teams": {
                "type": "object",
                "properties": { "home": team.clone(), "away": team }
            },
            "scores": {
                "type": "object",
                "properties": {
                    "home": { "type": "integer" },
                    "away": { "type": "integer" }
                }
            },
            "timestamp": { "type": "string", "format": "date-time" }
        }
    })
}

struct RowSelectors {
    heading: Selector,
    lineup: Selector,
    row: Selector,
    span: Selector,
    link: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            heading: selector(".slateGrey")?,
            lineup: selector(".matchLineup")?,
            row: selector("li")?,
            span: selector("span")?,
            link: selector("a")?,
        })
    }
}

/// Checks the first row of the first result list; later rows are trusted to match.
pub fn validate(doc: &Html) -> Result<()> {
    let sel = RowSelectors::new()?;

    let lineup = doc.select(&sel.lineup).next().ok_or_else(|| {
        TapError::RetriableStructure("Cannot find matches in page source".into())
    })?;

    let spans: Vec<ElementRef<'_>> = lineup
        .select(&sel.row)
        .next()
        .map(|row| row.select(&sel.span).collect())
        .unwrap_or_default();
    if spans.len() != ROW_SPANS {
        return Err(TapError::RetriableStructure(
            "Structure of results row is incorrect. It must have 6 spans".into(),
        ));
    }

    let links: Vec<ElementRef<'_>> = spans[VERSUS_SPAN].select(&sel.link).collect();
    if links.len() != 1 {
        return Err(TapError::RetriableStructure(
            "Unable to fetch id and comp_id because there are more than one links in vs span"
                .into(),
        ));
    }

    let tokens = href(&links[0]).map(DigitRuns::parse).map_or(0, |runs| runs.len());
    if tokens != FIXTURE_HREF_TOKENS {
        return Err(TapError::RetriableStructure(
            "Unable to fetch id and comp_id because parse vs span link".into(),
        ));
    }

    Ok(())
}

/// Rows of every date section, or only of sections dated `target_date`.
pub fn extract(doc: &Html, target_date: Option<NaiveDate>) -> Result<Records<'_>> {
    let sel = RowSelectors::new()?;
    let headings: Vec<ElementRef<'_>> = doc.select(&sel.heading).collect();
    let lineups: Vec<ElementRef<'_>> = doc.select(&sel.lineup).collect();

    Ok(Box::new(MatchRows {
        headings: headings.into_iter().enumerate(),
        lineups,
        target_label: target_date.map(|d| d.format(HEADING_DATE_FORMAT).to_string()),
        section: None,
        sel,
    }))
}

/// Walks date headings in order and yields the rows of each active section.
struct MatchRows<'a> {
    headings: std::iter::Enumerate<std::vec::IntoIter<ElementRef<'a>>>,
    lineups: Vec<ElementRef<'a>>,
    target_label: Option<String>,
    /// Heading text and remaining rows of the section being emitted
    section: Option<(String, std::vec::IntoIter<ElementRef<'a>>)>,
    sel: RowSelectors,
}

impl MatchRows<'_> {
    /// Index of the section to process for heading `index`, if any
    fn active_index(&self, index: usize, heading: &str) -> Option<usize> {
        match &self.target_label {
            None => Some(index),
            Some(label) if label == heading => Some(index),
            Some(_) => None,
        }
    }
}

impl<'a> Iterator for MatchRows<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((date, rows)) = &mut self.section {
                if let Some(row) = rows.next() {
                    return Some(parse_row(&self.sel, &row, date).map(Record::from));
                }
                self.section = None;
            }

            let (index, heading) = self.headings.next()?;
            let heading = text_content(&heading);
            let Some(active) = self.active_index(index, &heading) else {
                continue;
            };

            let Some(lineup) = self.lineups.get(active) else {
                return Some(Err(TapError::malformed(format!(
                    "no result list for date section `{}`",
                    heading
                ))));
            };
            let rows: Vec<ElementRef<'a>> = lineup.select(&self.sel.row).collect();
            self.section = Some((heading, rows.into_iter()));
        }
    }
}

fn parse_row(sel: &RowSelectors, row: &ElementRef<'_>, date: &str) -> Result<Match> {
    let spans: Vec<ElementRef<'_>> = row.select(&sel.span).collect();
    if spans.len() != ROW_SPANS {
        return Err(TapError::malformed(format!(
            "result row has {} spans, expected {}",
            spans.len(),
            ROW_SPANS
        )));
    }

    let versus = &spans[VERSUS_SPAN];
    let fixture = versus
        .select(&sel.link)
        .next()
        .and_then(|link| href(&link))
        .ok_or_else(|| TapError::malformed("versus cell has no link"))
        .and_then(FixtureRef::from_href)?;

    let time = text_content(&spans[TIME_SPAN]);

    Ok(Match {
        id: fixture.match_id,
        comp_id: fixture.comp_id,
        teams: HomeAway::new(
            parse_team(sel, &spans[HOME_SPAN])?,
            parse_team(sel, &spans[AWAY_SPAN])?,
        ),
        scores: parse_scores(&text_content(versus))?,
        timestamp: parse_timestamp(date, &time)?,
    })
}

/// Team name is the cell text; the id sits in the cell's second link.
fn parse_team(sel: &RowSelectors, cell: &ElementRef<'_>) -> Result<Team> {
    let link = cell
        .select(&sel.link)
        .nth(1)
        .and_then(|link| href(&link))
        .ok_or_else(|| TapError::malformed("team cell lacks a club link"))?;

    Ok(Team {
        id: club_id(link)?,
        name: text_content(cell),
    })
}

/// `"H - A"` into a home/away pair
fn parse_scores(label: &str) -> Result<HomeAway<i64>> {
    let parts: Vec<&str> = label.split('-').map(str::trim).collect();
    let &[home, away] = parts.as_slice() else {
        return Err(TapError::malformed(format!("score label `{}`", label)));
    };

    let score = |s: &str| {
        s.parse::<i64>()
            .map_err(|e| TapError::malformed(format!("score `{}` in `{}`: {}", s, label, e)))
    };
    Ok(HomeAway::new(score(home)?, score(away)?))
}

/// Heading `Wednesday 16 March 2022` plus row time `20:15`
fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    let combined = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&combined, TIMESTAMP_FORMAT)
        .map_err(|e| TapError::malformed(format!("kick-off `{}`: {}", combined, e)))
}
