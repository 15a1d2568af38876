pub mod aggregation;
pub mod config;
pub mod counters;
pub mod lineup;
pub mod model;
pub mod player_totals;
pub mod position_breakdown;
pub mod query_cache;
pub mod report;
pub mod roster;
pub mod score_store;
pub mod snapshot;
pub mod stat_store;
