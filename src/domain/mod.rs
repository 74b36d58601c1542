pub mod fixture;
pub mod match_details;
pub mod season;

pub use fixture::{Match, Team};
pub use match_details::{Goal, MatchDetails};
pub use season::{Season, SeasonYears};

use serde::{Deserialize, Serialize};

use crate::streams::StreamKind;

/// A home/away pair of anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeAway<T> {
    pub home: T,
    pub away: T,
}

impl<T> HomeAway<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }
}

/// One extracted record, shaped as its stream's schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Season(Season),
    Match(Match),
    MatchDetails(MatchDetails),
}

impl Record {
    pub fn stream(&self) -> StreamKind {
        match self {
            Record::Season(_) => StreamKind::Seasons,
            Record::Match(_) => StreamKind::Matches,
            Record::MatchDetails(_) => StreamKind::MatchDetails,
        }
    }

    /// Identifier used to key stored copies of the record
    pub fn key(&self) -> String {
        match self {
            Record::Season(s) => s.id.to_string(),
            Record::Match(m) => m.id.to_string(),
            Record::MatchDetails(d) => d.id.to_string(),
        }
    }
}

impl From<Season> for Record {
    fn from(season: Season) -> Self {
        Record::Season(season)
    }
}

impl From<Match> for Record {
    fn from(m: Match) -> Self {
        Record::Match(m)
    }
}

impl From<MatchDetails> for Record {
    fn from(details: MatchDetails) -> Self {
        Record::MatchDetails(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_as_bare_payload() {
        let record = Record::from(Season {
            id: 689,
            name: "Premier League 21/22".into(),
            years: SeasonYears {
                start: 2021,
                end: 2022,
            },
        });

        assert_eq!(record.stream(), StreamKind::Seasons);
        assert_eq!(record.key(), "689");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 689, "name": "Premier League 21/22", "years": {"start": 2021, "end": 2022}})
        );
    }
}
