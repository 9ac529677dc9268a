// Projection orchestration: resolve, adjust, compose, grade.
//
// `project` is a pure function of one player's stat line and a shared,
// read-only `ProjectionContext`. Nothing here mutates the tables, so
// projections for different players can run on separate threads.

use serde::Serialize;
use tracing::debug;

use crate::adjustment::{adjust, default_performance_boost, AdjustmentInput, Boosts};
use crate::aging::AgeCurve;
use crate::config::ModelConfig;
use crate::grading::{war_per_million, GradeTier};
use crate::identity::PlayerIdentity;
use crate::loader::PlayerRow;
use crate::position::Position;
use crate::seasons::{aggregate_seasons, AggregatedLine};
use crate::tables::LookupTables;
use crate::war::{compose, CompositionInput, RunBreakdown};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A required input missing from a player's loaded row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{player}: missing required field `{field}`")]
    MissingField { player: String, field: &'static str },
}

/// One player's aggregated line with every required input present.
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub identity: PlayerIdentity,
    pub age: u32,
    pub position: Position,
    pub raw_ops: f64,
    pub raw_pa: f64,
    /// Trend factor supplied by the caller. `None` uses the default
    /// elite-performance boost.
    pub performance_boost: Option<f64>,
}

impl StatLine {
    /// Build a stat line from a loaded row, aggregating its seasons.
    pub fn from_row(row: &PlayerRow) -> Result<StatLine, InputError> {
        let missing = |field| InputError::MissingField {
            player: row.identity.to_string(),
            field,
        };
        let age = row.age.ok_or_else(|| missing("age"))?;
        let position = row.position.ok_or_else(|| missing("position"))?;
        let AggregatedLine { raw_ops, raw_pa, .. } =
            aggregate_seasons(&row.seasons).ok_or_else(|| missing("seasons"))?;

        Ok(StatLine {
            identity: row.identity.clone(),
            age,
            position,
            raw_ops,
            raw_pa,
            performance_boost: None,
        })
    }
}

/// Everything a projection reads besides the player's own line.
#[derive(Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub tables: &'a LookupTables,
    pub model: &'a ModelConfig,
    pub age_curve: &'a dyn AgeCurve,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub player: PlayerIdentity,
    pub age: u32,
    pub position: Position,
    pub projected_ops: f64,
    pub war: f64,
    pub war_per_million: f64,
    pub grade: GradeTier,

    pub boosts: Boosts,
    pub final_adjusted_ops: f64,
    pub pa_reliability: f64,
    pub est_pa: f64,
    pub wrc_plus: f64,
    pub runs: RunBreakdown,
    pub annual_salary: u64,
    /// True when the player had no compensation record.
    pub salary_defaulted: bool,
    pub career_war: Option<f64>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub fn project(line: &StatLine, ctx: &ProjectionContext<'_>) -> ProjectionResult {
    let model = ctx.model;
    let tables = ctx.tables;
    let who = &line.identity;

    let pa_reliability = model.regression.reliability(line.raw_pa);
    let est_pa = model.playing_time.estimate_pa(line.raw_pa);
    let performance_boost = line.performance_boost.unwrap_or_else(|| {
        default_performance_boost(line.raw_ops, model.performance.elite_ops_threshold)
    });

    let adjusted = adjust(&AdjustmentInput {
        raw_ops: line.raw_ops,
        age_boost: ctx.age_curve.rate_boost(line.age, line.position),
        performance_boost,
        quality: tables.quality_for(who),
        expected: tables.expected_for(who),
        pa_reliability,
        league_ops: model.league.league_ops,
    });

    let composition = compose(&CompositionInput {
        projected_ops: adjusted.projected_ops,
        league_ops: model.league.league_ops,
        est_pa,
        age: line.age,
        position: line.position,
        positional_runs: model.aging.params(line.position).positional_runs,
        replacement_runs: model.league.replacement_runs,
        defense: tables.defense_for(who),
        sprint_speed: tables.sprint_speed_for(who),
    });

    let compensation = tables.compensation_for(who);
    let annual_salary = compensation
        .map(|c| c.annual_salary)
        .unwrap_or(model.league.league_minimum_salary);
    let wpm = war_per_million(composition.war, annual_salary);
    let grade = GradeTier::from_war_per_million(wpm);

    debug!(
        "{}: raw_ops={:.3} projected_ops={:.3} war={:.2} wpm={:.3} grade={}",
        who,
        line.raw_ops,
        adjusted.projected_ops,
        composition.war,
        wpm,
        grade.symbol()
    );

    ProjectionResult {
        player: who.clone(),
        age: line.age,
        position: line.position,
        projected_ops: adjusted.projected_ops,
        war: composition.war,
        war_per_million: wpm,
        grade,
        boosts: adjusted.boosts,
        final_adjusted_ops: adjusted.final_adjusted_ops,
        pa_reliability,
        est_pa,
        wrc_plus: composition.wrc_plus,
        runs: composition.runs,
        annual_salary,
        salary_defaulted: compensation.is_none(),
        career_war: tables.career_for(who).map(|r| r.career_war),
    }
}

/// Project every line, preserving input order.
pub fn project_all(lines: &[StatLine], ctx: &ProjectionContext<'_>) -> Vec<ProjectionResult> {
    lines.iter().map(|line| project(line, ctx)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
