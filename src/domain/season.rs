use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonYears {
    pub start: i32,
    pub end: i32,
}

/// A competition season as listed in the season dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub years: SeasonYears,
}

/// Expand a two-digit year: `9x` belongs to the 1900s, everything else to the 2000s.
pub fn expand_year(token: &str) -> Option<i32> {
    let yy: i32 = token.parse().ok()?;
    if token.starts_with('9') {
        Some(1900 + yy)
    } else {
        Some(2000 + yy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_year_century_rule() {
        assert_eq!(expand_year("21"), Some(2021));
        assert_eq!(expand_year("00"), Some(2000));
        assert_eq!(expand_year("99"), Some(1999));
        assert_eq!(expand_year("95"), Some(1995));
        assert_eq!(expand_year("89"), Some(2089));
        assert_eq!(expand_year("x1"), None);
    }
}
