use serde::{Deserialize, Serialize};

use crate::domain::HomeAway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub minute: i64,
    pub scorer: String,
    pub assister: Option<String>,
    pub foot: String,
    pub shot_direction: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Yards
    pub distance: i64,
}

/// Match report: team names and goals in on-page order.
///
/// `id` and `comp_id` are echoed from the configuration, not read from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub id: i64,
    pub comp_id: i64,
    pub teams: HomeAway<String>,
    pub goals: HomeAway<Vec<Goal>>,
}
