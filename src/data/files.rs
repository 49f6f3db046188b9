//! JSON loading for market odds and simulation summaries
//!
//! Layout:
//!
//! ```text
//! <odds_dir>/<game_id>.json          GameOdds
//! <simulations_dir>/<game_id>.json   SimulationSummary
//! ```

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{DataError, GameDataProvider};
use crate::models::{GameOdds, SimulationSummary};

/// File-backed game data provider
#[derive(Debug, Clone)]
pub struct FileProvider {
    odds_dir: PathBuf,
    simulations_dir: PathBuf,
}

impl FileProvider {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(odds_dir: P, simulations_dir: Q) -> Self {
        Self {
            odds_dir: odds_dir.as_ref().to_path_buf(),
            simulations_dir: simulations_dir.as_ref().to_path_buf(),
        }
    }

    fn record_path(dir: &Path, game_id: &str) -> Result<PathBuf, DataError> {
        if !is_valid_game_id(game_id) {
            return Err(DataError::InvalidGameId(game_id.to_string()));
        }
        Ok(dir.join(format!("{}.json", game_id)))
    }
}

impl GameDataProvider for FileProvider {
    fn market_odds(&self, game_id: &str) -> Result<GameOdds, DataError> {
        let path = Self::record_path(&self.odds_dir, game_id)?;
        load_json(&path, game_id, "market odds")
    }

    fn simulation(&self, game_id: &str) -> Result<SimulationSummary, DataError> {
        let path = Self::record_path(&self.simulations_dir, game_id)?;
        load_json(&path, game_id, "simulation")
    }

    fn list_games(&self, date: Option<NaiveDate>) -> Result<Vec<String>, DataError> {
        let entries = match fs::read_dir(&self.odds_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(DataError::Io {
                    path: self.odds_dir.clone(),
                    source,
                })
            }
        };

        let mut games: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let filename = entry.file_name();
                let game_id = filename.to_str()?.strip_suffix(".json")?.to_string();
                is_valid_game_id(&game_id).then_some(game_id)
            })
            .filter(|game_id| match date {
                Some(d) => parse_game_date(game_id) == Some(d),
                None => true,
            })
            .collect();

        games.sort();
        Ok(games)
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

fn load_json<T: DeserializeOwned>(
    path: &Path,
    game_id: &str,
    kind: &'static str,
) -> Result<T, DataError> {
    debug!("Loading {} from {:?}", kind, path);

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DataError::NotFound {
                game_id: game_id.to_string(),
                kind,
            })
        }
        Err(source) => {
            return Err(DataError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Game ids become file names, so only a safe character set is allowed
fn is_valid_game_id(game_id: &str) -> bool {
    !game_id.is_empty()
        && !game_id.starts_with('.')
        && game_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Parse the date embedded in a game id such as "mlb-2025-03-23-lad-sf"
pub fn parse_game_date(game_id: &str) -> Option<NaiveDate> {
    let mut parts = game_id.split('-');
    if parts.next()? != "mlb" {
        return None;
    }
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ODDS_JSON: &str = r#"{
        "gameId": "mlb-2025-03-23-lad-sf",
        "homeTeam": "SF",
        "awayTeam": "LAD",
        "homeMoneyline": 140,
        "awayMoneyline": -160,
        "totalRuns": 8.5,
        "overOdds": -110,
        "underOdds": -110,
        "lastUpdated": "2025-03-23T15:00:00Z"
    }"#;

    const SIMULATION_JSON: &str = r#"{
        "gameId": "mlb-2025-03-23-lad-sf",
        "simulationCount": 1000,
        "homeTeamName": "Giants",
        "awayTeamName": "Dodgers",
        "homeWinProbability": 0.45,
        "awayWinProbability": 0.55,
        "averageHomeScore": 4.1,
        "averageAwayScore": 4.6,
        "averageTotalRuns": 8.7,
        "bettingInsights": {
            "homeMoneyline": 120,
            "awayMoneyline": -120,
            "overOdds": -115,
            "underOdds": -105
        }
    }"#;

    fn provider_with_files() -> (tempfile::TempDir, FileProvider) {
        let dir = tempfile::tempdir().unwrap();
        let odds_dir = dir.path().join("odds");
        let sims_dir = dir.path().join("simulations");
        fs::create_dir_all(&odds_dir).unwrap();
        fs::create_dir_all(&sims_dir).unwrap();

        fs::write(odds_dir.join("mlb-2025-03-23-lad-sf.json"), ODDS_JSON).unwrap();
        fs::write(odds_dir.join("mlb-2025-03-24-nyy-bos.json"), ODDS_JSON).unwrap();
        fs::write(odds_dir.join("notes.txt"), "ignored").unwrap();
        fs::write(sims_dir.join("mlb-2025-03-23-lad-sf.json"), SIMULATION_JSON).unwrap();

        let provider = FileProvider::new(&odds_dir, &sims_dir);
        (dir, provider)
    }

    #[test]
    fn test_parse_game_date() {
        assert_eq!(
            parse_game_date("mlb-2025-03-23-lad-sf"),
            NaiveDate::from_ymd_opt(2025, 3, 23)
        );
        assert_eq!(parse_game_date("nba-2025-03-23-lal-bos"), None);
        assert_eq!(parse_game_date("mlb-2025-13-40-x-y"), None);
        assert_eq!(parse_game_date("invalid"), None);
    }

    #[test]
    fn test_is_valid_game_id() {
        assert!(is_valid_game_id("mlb-2025-03-23-lad-sf"));
        assert!(is_valid_game_id("12345"));
        assert!(!is_valid_game_id(""));
        assert!(!is_valid_game_id("../secrets"));
        assert!(!is_valid_game_id("a/b"));
    }

    #[test]
    fn test_load_market_odds() {
        let (_dir, provider) = provider_with_files();
        let odds = provider.market_odds("mlb-2025-03-23-lad-sf").unwrap();
        assert_eq!(odds.away_moneyline, -160);
    }

    #[test]
    fn test_load_simulation() {
        let (_dir, provider) = provider_with_files();
        let sim = provider.simulation("mlb-2025-03-23-lad-sf").unwrap();
        assert_eq!(sim.betting_insights.over_odds, -115);
    }

    #[test]
    fn test_missing_record() {
        let (_dir, provider) = provider_with_files();
        let err = provider.simulation("mlb-2025-03-24-nyy-bos").unwrap_err();
        assert!(matches!(err, DataError::NotFound { kind: "simulation", .. }));
    }

    #[test]
    fn test_invalid_game_id() {
        let (_dir, provider) = provider_with_files();
        assert!(matches!(
            provider.market_odds("../odds"),
            Err(DataError::InvalidGameId(_))
        ));
    }

    #[test]
    fn test_malformed_record() {
        let (dir, provider) = provider_with_files();
        fs::write(dir.path().join("odds").join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            provider.market_odds("broken"),
            Err(DataError::Parse { .. })
        ));
    }

    #[test]
    fn test_list_games() {
        let (_dir, provider) = provider_with_files();

        let all = provider.list_games(None).unwrap();
        assert_eq!(all, vec!["mlb-2025-03-23-lad-sf", "mlb-2025-03-24-nyy-bos"]);

        let day = provider
            .list_games(NaiveDate::from_ymd_opt(2025, 3, 24))
            .unwrap();
        assert_eq!(day, vec!["mlb-2025-03-24-nyy-bos"]);
    }

    #[test]
    fn test_list_games_missing_dir() {
        let provider = FileProvider::new("/nonexistent/odds", "/nonexistent/sims");
        assert!(provider.list_games(None).unwrap().is_empty());
    }
}
