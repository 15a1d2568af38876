use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::model::{ClubId, GameId, TeamId};

const DEFAULT_SNAPSHOT: &str = "courtside.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub team_id: Option<TeamId>,
    pub club_id: ClubId,
    pub opponent_id: Option<TeamId>,
    pub exclude_game: Option<GameId>,
    pub cache_ttl: Duration,
    pub report_threads: usize,
}

impl Config {
    /// Read `.env.local` / `.env`, then the environment. Flags from `args`
    /// (`--snapshot=PATH`, `--team=ID`, `--opponent=ID`, `--exclude=ID`,
    /// `--club=ID`) win over the environment.
    pub fn load(args: &[String]) -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let mut cfg = Self::from_env()?;
        cfg.apply_args(args)?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let snapshot_path = env::var("COURTSIDE_SNAPSHOT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
        let team_id = parse_id_var("COURTSIDE_TEAM_ID")?;
        let club_id = parse_id_var("COURTSIDE_CLUB_ID")?.unwrap_or(0);
        let cache_ttl_secs = env::var("COURTSIDE_CACHE_TTL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(300)
            .clamp(5, 3600);
        let report_threads = env::var("COURTSIDE_REPORT_THREADS")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(1, 32);
        Ok(Self {
            snapshot_path,
            team_id,
            club_id,
            opponent_id: None,
            exclude_game: None,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            report_threads,
        })
    }

    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(path) = flag_value(args, "snapshot") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Some(raw) = flag_value(args, "team") {
            self.team_id = Some(parse_id("--team", raw)?);
        }
        if let Some(raw) = flag_value(args, "club") {
            self.club_id = parse_id("--club", raw)?;
        }
        if let Some(raw) = flag_value(args, "opponent") {
            self.opponent_id = Some(parse_id("--opponent", raw)?);
        }
        if let Some(raw) = flag_value(args, "exclude") {
            self.exclude_game = Some(parse_id("--exclude", raw)?);
        }
        Ok(())
    }
}

/// Accepts both `--name=value` and `--name value`.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefix) {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim());
            }
        }
    }
    None
}

fn parse_id(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("{name} expects a numeric id, got {raw:?}"))
}

fn parse_id_var(var: &str) -> Result<Option<u64>> {
    match env::var(var) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => parse_id(var, &val).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(anyhow!("{var}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_accept_both_forms() {
        let a = args(&["--team=12", "--opponent", "40", "--snapshot", "data/s.json"]);
        assert_eq!(flag_value(&a, "team"), Some("12"));
        assert_eq!(flag_value(&a, "opponent"), Some("40"));
        assert_eq!(flag_value(&a, "snapshot"), Some("data/s.json"));
        assert_eq!(flag_value(&a, "exclude"), None);
    }

    #[test]
    fn bad_id_is_an_error() {
        let mut cfg = Config {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT),
            team_id: None,
            club_id: 0,
            opponent_id: None,
            exclude_game: None,
            cache_ttl: Duration::from_secs(300),
            report_threads: 4,
        };
        assert!(cfg.apply_args(&args(&["--team=abc"])).is_err());
        cfg.apply_args(&args(&["--team=7", "--exclude=3"]))
            .expect("numeric ids should parse");
        assert_eq!(cfg.team_id, Some(7));
        assert_eq!(cfg.exclude_game, Some(3));
    }
}
