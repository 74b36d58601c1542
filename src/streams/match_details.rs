//! Match details: team names from the report title bar and goals from the
//! report intervals.
//!
//! A complete report has five `.matchReportInt` containers; the second holds
//! the home goals and the third the away goals, one `.matchReportSubInt` each:
//!
//! ```text
//! <p>26` Jonny => Francisco Trincao</p>
//! <small>Right Foot, Left, Open Play, 18 yrds</small>
//! ```

use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};

use crate::app::{Result, TapError};
use crate::domain::{Goal, HomeAway, MatchDetails, Record};
use crate::streams::html::{selector, text_content};
use crate::streams::Records;

const REPORT_INTERVALS: usize = 5;
const HOME_GOALS_INTERVAL: usize = 1;
const AWAY_GOALS_INTERVAL: usize = 2;
const ASSIST_SEPARATOR: &str = "=>";

pub fn schema() -> Value {
    let goals = json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "minute": { "type": "integer" },
                "scorer": { "type": "string" },
                "assister": { "type": ["string", "null"] },
                "foot": { "type": "string" },
                "shot_direction": { "type": "string" },
                "type": { "type": "string" },
                "distance": { "type": "integer" }
            }
        }
    });
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "comp_id": { "type": "integer" },
            "teams": {
                "type": "object",
                "properties": {
                    "home": { "type": "string" },
                    "away": { "type": "string" }
                }
            },
            "goals": {
                "type": "object",
                "properties": { "home": goals.clone(), "away": goals }
            }
        }
    })
}

struct ReportSelectors {
    title: Selector,
    title_left: Selector,
    title_right: Selector,
    interval: Selector,
    goal: Selector,
    paragraph: Selector,
    descriptor: Selector,
}

impl ReportSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            title: selector(".matchReportTitle")?,
            title_left: selector(".titleIntLeft")?,
            title_right: selector(".titleIntRight")?,
            interval: selector(".matchReportInt")?,
            goal: selector(".matchReportSubInt")?,
            paragraph: selector("p")?,
            descriptor: selector("small")?,
        })
    }
}

pub fn validate(doc: &Html) -> Result<()> {
    let sel = ReportSelectors::new()?;

    if doc.select(&sel.title).next().is_none() {
        return Err(TapError::FatalStructure(
            "Cannot fetch team names because title bar is not present in page source".into(),
        ));
    }

    if doc.select(&sel.interval).count() != REPORT_INTERVALS {
        return Err(TapError::FatalStructure(
            "Cannot extract goals information because stats containers is not complete in page source"
                .into(),
        ));
    }

    Ok(())
}

/// Exactly one record per page; `id` and `comp_id` come from configuration.
pub fn extract(doc: &Html, id: i64, comp_id: i64) -> Result<Records<'_>> {
    let sel = ReportSelectors::new()?;
    let details = parse_report(&sel, doc, id, comp_id).map(Record::from);
    Ok(Box::new(std::iter::once(details)))
}

fn parse_report(sel: &ReportSelectors, doc: &Html, id: i64, comp_id: i64) -> Result<MatchDetails> {
    let title = doc
        .select(&sel.title)
        .next()
        .ok_or_else(|| TapError::malformed("report title bar missing"))?;
    let team = |side: &Selector, which: &str| {
        title
            .select(side)
            .next()
            .map(|cell| text_content(&cell))
            .ok_or_else(|| TapError::malformed(format!("title bar lacks the {} team", which)))
    };
    let teams = HomeAway::new(team(&sel.title_left, "home")?, team(&sel.title_right, "away")?);

    let intervals: Vec<ElementRef<'_>> = doc.select(&sel.interval).collect();
    let goals = |index: usize| -> Result<Vec<Goal>> {
        let interval = intervals.get(index).ok_or_else(|| {
            TapError::malformed(format!("report interval {} missing", index + 1))
        })?;
        interval
            .select(&sel.goal)
            .map(|goal| parse_goal(sel, &goal))
            .collect()
    };

    Ok(MatchDetails {
        id,
        comp_id,
        teams,
        goals: HomeAway::new(goals(HOME_GOALS_INTERVAL)?, goals(AWAY_GOALS_INTERVAL)?),
    })
}

fn parse_goal(sel: &ReportSelectors, goal: &ElementRef<'_>) -> Result<Goal> {
    let who_when = goal
        .select(&sel.paragraph)
        .next()
        .map(|p| text_content(&p))
        .ok_or_else(|| TapError::malformed("goal entry has no scorer paragraph"))?;
    let how = goal
        .select(&sel.descriptor)
        .next()
        .map(|small| text_content(&small))
        .ok_or_else(|| TapError::malformed("goal entry has no descriptor"))?;

    let (minute, players) = who_when.split_once(' ').unwrap_or((who_when.as_str(), ""));
    let (assister, scorer) = match players.split_once(ASSIST_SEPARATOR) {
        Some((assister, scorer)) => (Some(assister.trim().to_string()), scorer.trim()),
        None => (None, players.trim()),
    };

    let parts: Vec<&str> = how.split(',').collect();
    let &[foot, direction, kind, distance, ..] = parts.as_slice() else {
        return Err(TapError::malformed(format!(
            "goal descriptor `{}` has fewer than four parts",
            how
        )));
    };

    Ok(Goal {
        minute: parse_minute(minute)?,
        scorer: scorer.to_string(),
        assister,
        foot: foot.trim().to_string(),
        shot_direction: direction.trim().to_lowercase(),
        kind: kind.trim().to_string(),
        distance: parse_distance(distance)?,
    })
}

/// `` 26` `` with its trailing mark stripped
fn parse_minute(token: &str) -> Result<i64> {
    let mut chars = token.chars();
    chars.next_back();
    chars
        .as_str()
        .parse()
        .map_err(|e| TapError::malformed(format!("goal minute `{}`: {}", token, e)))
}

/// Leading integer of ` 18 yrds`
fn parse_distance(segment: &str) -> Result<i64> {
    let value = segment.split_whitespace().next().unwrap_or_default();
    value
        .parse()
        .map_err(|e| TapError::malformed(format!("goal distance `{}`: {}", segment, e)))
}
