use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::HomeAway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// A played fixture from the results listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub comp_id: i64,
    pub teams: HomeAway<Team>,
    pub scores: HomeAway<i64>,
    /// Local kick-off time, no offset
    pub timestamp: NaiveDateTime,
}
