//! Digit-run tokens pulled out of hrefs and labels.
//!
//! The site encodes its ids positionally inside link targets, e.g.
//! `.../Premier-League-21/22/Arsenal-VS-Liverpool?comp_id=689&match_id=115718&date=16-Mar-2022`
//! yields `[21, 22, 689, 115718, 16, 2022]`.

use regex::Regex;
use std::sync::LazyLock;

use crate::app::{Result, TapError};

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

/// Number of digit runs a fixture ("versus") link must carry.
pub const FIXTURE_HREF_TOKENS: usize = 6;
const FIXTURE_COMP_ID_INDEX: usize = 2;
const FIXTURE_MATCH_ID_INDEX: usize = 3;
const CLUB_ID_INDEX: usize = 1;

/// All maximal runs of ASCII digits in `source`, in order.
#[derive(Debug, Clone)]
pub struct DigitRuns<'a> {
    source: &'a str,
    runs: Vec<&'a str>,
}

impl<'a> DigitRuns<'a> {
    pub fn parse(source: &'a str) -> Self {
        let runs = DIGIT_RUN.find_iter(source).map(|m| m.as_str()).collect();
        Self { source, runs }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Raw token text at `index`
    pub fn token(&self, index: usize) -> Option<&'a str> {
        self.runs.get(index).copied()
    }

    /// Token at `index` as an integer
    pub fn number(&self, index: usize) -> Result<i64> {
        let token = self.token(index).ok_or_else(|| {
            TapError::malformed(format!(
                "expected a number at position {} in `{}`, found {}",
                index,
                self.source,
                self.runs.len()
            ))
        })?;
        token.parse().map_err(|e| {
            TapError::malformed(format!("number `{}` in `{}`: {}", token, self.source, e))
        })
    }
}

/// Competition and match ids carried by a fixture link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureRef {
    pub comp_id: i64,
    pub match_id: i64,
}

impl FixtureRef {
    pub fn from_href(href: &str) -> Result<Self> {
        let runs = DigitRuns::parse(href);
        if runs.len() != FIXTURE_HREF_TOKENS {
            return Err(TapError::malformed(format!(
                "fixture link `{}` has {} numbers, expected {}",
                href,
                runs.len(),
                FIXTURE_HREF_TOKENS
            )));
        }
        Ok(Self {
            comp_id: runs.number(FIXTURE_COMP_ID_INDEX)?,
            match_id: runs.number(FIXTURE_MATCH_ID_INDEX)?,
        })
    }
}

/// Club id from a team link such as `/competitions/LastMatches?comp_id=689&club_id=5`
pub fn club_id(href: &str) -> Result<i64> {
    DigitRuns::parse(href).number(CLUB_ID_INDEX)
}
