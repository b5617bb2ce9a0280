//! Consensus betting picks: models, grouping and win/loss records.

pub mod research;

pub use research::{
    decode_research, research_picks, research_prompt, ResearchOutcome, BETTING_SITES,
};

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PickType {
    Spread,
    Total,
    PlayerProp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PickResult {
    Win,
    Loss,
    Push,
    #[default]
    Pending,
}

impl PickResult {
    /// Parse a graded result; `pending` is not a valid update
    pub fn parse_update(s: &str) -> Result<Self> {
        match s.parse::<PickResult>()? {
            PickResult::Pending => Err(Error::Validation(
                "result must be win, loss or push".to_string(),
            )),
            result => Ok(result),
        }
    }
}

impl FromStr for PickResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(PickResult::Win),
            "loss" => Ok(PickResult::Loss),
            "push" => Ok(PickResult::Push),
            "pending" => Ok(PickResult::Pending),
            other => Err(Error::Validation(format!("unknown pick result: {other}"))),
        }
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PickResult::Win => "win",
            PickResult::Loss => "loss",
            PickResult::Push => "push",
            PickResult::Pending => "pending",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickSource {
    pub name: String,
    pub url: String,
}

/// A bet that several sites agree on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusPick {
    pub id: String,
    pub title: String,
    pub matchup: String,
    pub pick: String,
    /// Share of sites agreeing, in percent
    pub consensus_strength: f64,
    pub rationale: String,
    pub sources: Vec<PickSource>,
    pub pick_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: PickType,
    #[serde(default)]
    pub result: PickResult,
}

/// Picks for one date, grouped by type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusPicks {
    pub date: NaiveDate,
    pub spreads: Vec<ConsensusPick>,
    pub totals: Vec<ConsensusPick>,
    pub player_props: Vec<ConsensusPick>,
}

impl ConsensusPicks {
    pub fn group(date: NaiveDate, picks: Vec<ConsensusPick>) -> Self {
        let mut grouped = Self {
            date,
            spreads: Vec::new(),
            totals: Vec::new(),
            player_props: Vec::new(),
        };
        for pick in picks {
            match pick.kind {
                PickType::Spread => grouped.spreads.push(pick),
                PickType::Total => grouped.totals.push(pick),
                PickType::PlayerProp => grouped.player_props.push(pick),
            }
        }
        grouped
    }

    /// Spreads, then totals, then player props
    pub fn all(&self) -> impl Iterator<Item = &ConsensusPick> {
        self.spreads
            .iter()
            .chain(&self.totals)
            .chain(&self.player_props)
    }

    pub fn len(&self) -> usize {
        self.spreads.len() + self.totals.len() + self.player_props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct sources by name, first url seen wins
    pub fn sources(&self) -> Vec<PickSource> {
        let mut sources: Vec<PickSource> = Vec::new();
        for source in self.all().flat_map(|p| &p.sources) {
            if !sources.iter().any(|s| s.name == source.name) {
                sources.push(source.clone());
            }
        }
        sources
    }
}

/// Win/loss record over a set of graded picks.
/// Percentages are fractions in `0.0..=1.0`; pushes and pending picks are
/// left out of them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub win_percentage: f64,
    pub spread_record: String,
    pub spread_win_percentage: f64,
    pub total_record: String,
    pub total_win_percentage: f64,
    pub prop_record: String,
    pub prop_win_percentage: f64,
}

impl RecordStats {
    pub fn from_picks<'a>(picks: impl IntoIterator<Item = &'a ConsensusPick>) -> Self {
        let mut overall = Tally::default();
        let mut spread = Tally::default();
        let mut total = Tally::default();
        let mut prop = Tally::default();

        for pick in picks {
            overall.add(pick.result);
            match pick.kind {
                PickType::Spread => spread.add(pick.result),
                PickType::Total => total.add(pick.result),
                PickType::PlayerProp => prop.add(pick.result),
            }
        }

        Self {
            wins: overall.wins,
            losses: overall.losses,
            pushes: overall.pushes,
            win_percentage: overall.win_percentage(),
            spread_record: spread.record(),
            spread_win_percentage: spread.win_percentage(),
            total_record: total.record(),
            total_win_percentage: total.win_percentage(),
            prop_record: prop.record(),
            prop_win_percentage: prop.win_percentage(),
        }
    }
}

#[derive(Default)]
struct Tally {
    wins: usize,
    losses: usize,
    pushes: usize,
}

impl Tally {
    fn add(&mut self, result: PickResult) {
        match result {
            PickResult::Win => self.wins += 1,
            PickResult::Loss => self.losses += 1,
            PickResult::Push => self.pushes += 1,
            PickResult::Pending => {}
        }
    }

    fn win_percentage(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            0.0
        } else {
            self.wins as f64 / decided as f64
        }
    }

    fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Check an `Authorization` header against `Bearer <secret>`.
/// Always false when no secret is configured.
pub fn authorize_cron(header: Option<&str>, secret: Option<&str>) -> bool {
    let (Some(header), Some(secret)) = (header, secret) else {
        return false;
    };
    if secret.is_empty() {
        return false;
    }
    constant_time_eq(header.as_bytes(), format!("Bearer {secret}").as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(kind: PickType, result: PickResult) -> ConsensusPick {
        ConsensusPick {
            id: "p".to_string(),
            title: "Lakers vs. Warriors".to_string(),
            matchup: "Los Angeles Lakers @ Golden State Warriors".to_string(),
            pick: "Warriors -3.5".to_string(),
            consensus_strength: 80.0,
            rationale: String::new(),
            sources: vec![PickSource {
                name: "Covers".to_string(),
                url: "https://www.covers.com/nba/picks-predictions".to_string(),
            }],
            pick_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            kind,
            result,
        }
    }

    #[test]
    fn result_parsing() {
        assert_eq!("WIN".parse::<PickResult>().unwrap(), PickResult::Win);
        assert_eq!("pending".parse::<PickResult>().unwrap(), PickResult::Pending);
        assert!("tie".parse::<PickResult>().is_err());

        assert_eq!(PickResult::parse_update("push").unwrap(), PickResult::Push);
        assert!(PickResult::parse_update("pending").is_err());
    }

    #[test]
    fn record_stats() {
        let picks = vec![
            pick(PickType::Spread, PickResult::Win),
            pick(PickType::Spread, PickResult::Loss),
            pick(PickType::Spread, PickResult::Win),
            pick(PickType::Total, PickResult::Push),
            pick(PickType::PlayerProp, PickResult::Win),
            pick(PickType::PlayerProp, PickResult::Pending),
        ];
        let stats = RecordStats::from_picks(&picks);

        assert_eq!((stats.wins, stats.losses, stats.pushes), (3, 1, 1));
        assert_eq!(stats.win_percentage, 0.75);
        assert_eq!(stats.spread_record, "2-1");
        assert_eq!(stats.total_record, "0-0");
        assert_eq!(stats.total_win_percentage, 0.0);
        assert_eq!(stats.prop_record, "1-0");
        assert_eq!(stats.prop_win_percentage, 1.0);
    }

    #[test]
    fn no_decided_picks_means_zero_percent() {
        let stats = RecordStats::from_picks(&Vec::<ConsensusPick>::new());
        assert_eq!(stats.win_percentage, 0.0);
        assert_eq!(stats.spread_record, "0-0");
    }

    #[test]
    fn grouping_and_sources() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut prop = pick(PickType::PlayerProp, PickResult::Pending);
        prop.sources.push(PickSource {
            name: "ESPN Betting".to_string(),
            url: "https://www.espn.com/betting/nba/".to_string(),
        });
        let grouped = ConsensusPicks::group(
            date,
            vec![
                prop,
                pick(PickType::Spread, PickResult::Pending),
                pick(PickType::Total, PickResult::Pending),
            ],
        );

        assert_eq!(grouped.spreads.len(), 1);
        assert_eq!(grouped.totals.len(), 1);
        assert_eq!(grouped.player_props.len(), 1);
        let kinds: Vec<PickType> = grouped.all().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PickType::Spread, PickType::Total, PickType::PlayerProp]);

        let names: Vec<String> = grouped.sources().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Covers", "ESPN Betting"]);
    }

    #[test]
    fn cron_authorization() {
        assert!(authorize_cron(Some("Bearer s3cret"), Some("s3cret")));
        assert!(!authorize_cron(Some("Bearer wrong!"), Some("s3cret")));
        assert!(!authorize_cron(Some("s3cret"), Some("s3cret")));
        assert!(!authorize_cron(None, Some("s3cret")));
        assert!(!authorize_cron(Some("Bearer "), Some("")));
        assert!(!authorize_cron(Some("Bearer x"), None));
    }

    #[test]
    fn pick_json_uses_type_key() {
        let json = serde_json::to_value(pick(PickType::PlayerProp, PickResult::Pending)).unwrap();
        assert_eq!(json["type"], "player_prop");
        assert_eq!(json["result"], "pending");
        assert_eq!(json["pickDate"], "2024-03-01");
        assert_eq!(json["consensusStrength"], 80.0);
    }
}
