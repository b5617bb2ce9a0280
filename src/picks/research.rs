use super::{ConsensusPick, ConsensusPicks, PickResult, PickSource, PickType};
use crate::ai::{GenerateRequest, TextModel};
use crate::error::{Error, Result};
use crate::models::generate_id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Picks below this consensus are discarded
pub const MIN_CONSENSUS: f64 = 60.0;

/// Sites the research prompt asks the model to consult
pub const BETTING_SITES: &[(&str, &str)] = &[
    ("ESPN Betting", "https://www.espn.com/betting/nba/"),
    ("Action Network", "https://www.actionnetwork.com/nba/picks"),
    ("CBS Sports", "https://www.cbssports.com/nba/picks/"),
    ("The Athletic", "https://theathletic.com/nba/betting/"),
    ("Vegas Insider", "https://www.vegasinsider.com/nba/odds/las-vegas/"),
    ("Covers", "https://www.covers.com/nba/picks-predictions"),
    ("Odds Shark", "https://www.oddsshark.com/nba"),
    ("Sporting News", "https://www.sportingnews.com/us/nba"),
    ("Rotogrinders", "https://rotogrinders.com/sports/nba"),
    ("Bleacher Report", "https://bleacherreport.com/nba-betting"),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutcome {
    pub picks: ConsensusPicks,
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchReply {
    #[serde(default)]
    spreads: Vec<ReplyPick>,
    #[serde(default)]
    totals: Vec<ReplyPick>,
    #[serde(default)]
    player_props: Vec<ReplyPick>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyPick {
    title: String,
    #[serde(default)]
    matchup: String,
    pick: String,
    consensus_strength: f64,
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    sources: Vec<PickSource>,
}

impl ReplyPick {
    fn into_pick(self, kind: PickType, date: NaiveDate) -> ConsensusPick {
        ConsensusPick {
            id: generate_id(),
            title: self.title,
            matchup: self.matchup,
            pick: self.pick,
            consensus_strength: self.consensus_strength,
            rationale: self.rationale,
            sources: self.sources,
            pick_date: date,
            kind,
            result: PickResult::Pending,
        }
    }
}

pub fn research_prompt(date: NaiveDate) -> String {
    let sites = BETTING_SITES
        .iter()
        .map(|(name, url)| format!("- {name}: {url}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Research NBA betting picks for {date} from the following websites:
{sites}

For each website, identify their recommended picks for:
1. Game spreads
2. Game over/unders (totals)
3. Player props

Then identify consensus picks where multiple sites agree on the same bet.
For each consensus pick, provide the matchup or player, the bet, the
consensus strength (percentage of sites agreeing), a brief rationale and the
sources that agree.

Respond with a JSON object of this shape:
{{
  "date": "{date}",
  "spreads": [
    {{
      "title": "Team A vs Team B",
      "matchup": "Team A @ Team B",
      "pick": "Team A -3.5",
      "consensusStrength": 75,
      "rationale": "Explanation for the pick",
      "sources": [{{ "name": "Source Name", "url": "Source URL" }}]
    }}
  ],
  "totals": [],
  "playerProps": []
}}

Only include picks with a consensus strength of {min}% or higher.
Use exactly the source names listed above.
Your entire response must be valid JSON with no text before or after it."#,
        min = MIN_CONSENSUS,
    )
}

/// Decode a model reply into picks for `date`.
///
/// Fails on prose, malformed JSON or wrongly typed fields. Missing groups
/// are empty and picks below the consensus threshold are dropped.
pub fn decode_research(text: &str, date: NaiveDate) -> Result<ConsensusPicks> {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    };

    if span.starts_with("I'm") || span.starts_with("I am") {
        return Err(Error::Ai(
            "model returned a message instead of JSON".to_string(),
        ));
    }

    let reply: ResearchReply = serde_json::from_str(span)
        .map_err(|e| Error::Ai(format!("could not parse research reply: {e}")))?;

    let groups = [
        (PickType::Spread, reply.spreads),
        (PickType::Total, reply.totals),
        (PickType::PlayerProp, reply.player_props),
    ];

    let mut picks = Vec::new();
    for (kind, group) in groups {
        for raw in group {
            if !raw.consensus_strength.is_finite() || raw.consensus_strength > 100.0 {
                return Err(Error::Ai(format!(
                    "consensus strength out of range: {}",
                    raw.consensus_strength
                )));
            }
            if raw.consensus_strength >= MIN_CONSENSUS {
                picks.push(raw.into_pick(kind, date));
            }
        }
    }

    Ok(ConsensusPicks::group(date, picks))
}

/// Ask the model for the day's consensus picks, falling back to a fixed
/// slate when no model is configured or its reply is unusable.
pub async fn research_picks(model: Option<&dyn TextModel>, date: NaiveDate) -> ResearchOutcome {
    let Some(model) = model else {
        info!(%date, "No AI model configured, using fallback picks");
        return fallback_outcome(date);
    };

    info!(model = model.model_name(), %date, "Researching consensus picks");
    let request = GenerateRequest::new(research_prompt(date))
        .with_temperature(0.2)
        .with_max_tokens(4000);

    let decoded = model
        .generate(&request)
        .await
        .and_then(|text| decode_research(&text, date));

    match decoded {
        Ok(picks) => {
            info!(picks = picks.len(), sources = picks.sources().len(), "Research complete");
            ResearchOutcome {
                picks,
                used_ai: true,
            }
        }
        Err(e) => {
            warn!(error = %e, "Research failed, using fallback picks");
            fallback_outcome(date)
        }
    }
}

fn fallback_outcome(date: NaiveDate) -> ResearchOutcome {
    ResearchOutcome {
        picks: fallback_picks(date),
        used_ai: false,
    }
}

fn fallback_pick(
    id: &str,
    kind: PickType,
    date: NaiveDate,
    (title, matchup, pick): (&str, &str, &str),
    consensus_strength: f64,
    rationale: &str,
    sources: [(&str, &str); 2],
) -> ConsensusPick {
    ConsensusPick {
        id: id.to_string(),
        title: title.to_string(),
        matchup: matchup.to_string(),
        pick: pick.to_string(),
        consensus_strength,
        rationale: rationale.to_string(),
        sources: sources
            .iter()
            .map(|(name, url)| PickSource {
                name: name.to_string(),
                url: url.to_string(),
            })
            .collect(),
        pick_date: date,
        kind,
        result: PickResult::Pending,
    }
}

/// Deterministic slate shown when research is unavailable
pub fn fallback_picks(date: NaiveDate) -> ConsensusPicks {
    ConsensusPicks::group(
        date,
        vec![
            fallback_pick(
                "fallback-spread-1",
                PickType::Spread,
                date,
                (
                    "Lakers vs. Warriors",
                    "Los Angeles Lakers @ Golden State Warriors",
                    "Warriors -3.5",
                ),
                85.0,
                "The Warriors have won 8 of their last 10 at home and the Lakers are on \
                 the second night of a back-to-back.",
                [
                    ("ESPN Betting", "https://www.espn.com/betting/"),
                    ("Action Network", "https://www.actionnetwork.com/"),
                ],
            ),
            fallback_pick(
                "fallback-total-1",
                PickType::Total,
                date,
                (
                    "Nuggets vs. Suns Total",
                    "Denver Nuggets @ Phoenix Suns",
                    "Under 226.5",
                ),
                75.0,
                "Both teams have slowed their pace and the Nuggets have held opponents \
                 under 110 points in 6 of their last 8 games.",
                [
                    ("Odds Shark", "https://www.oddsshark.com/nba"),
                    ("Vegas Insider", "https://www.vegasinsider.com/nba/odds/las-vegas/"),
                ],
            ),
            fallback_pick(
                "fallback-prop-1",
                PickType::PlayerProp,
                date,
                (
                    "Luka Dončić Points",
                    "Dallas Mavericks vs. Minnesota Timberwolves",
                    "Luka Dončić Over 32.5 Points",
                ),
                90.0,
                "Dončić has cleared this line in 7 of his last 8 games, averaging 36.2 \
                 points over that stretch.",
                [
                    ("ESPN Betting", "https://www.espn.com/betting/"),
                    ("Rotogrinders", "https://rotogrinders.com/sports/nba"),
                ],
            ),
        ],
    )
}
