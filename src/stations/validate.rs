use crate::{
    core::station::{
        Violation,
        capacity_violations,
        is_valid_success_rate,
        length_violations,
        probability_violations,
    },
    stations::{ListError, StationRow},
};

/// Problem found in a station table row, 1-based.
#[derive(Clone, Debug, PartialEq, derive_more::Display)]
#[display("row {row}: {problem}")]
pub struct Issue {
    pub row: usize,
    pub problem: Problem,
}

#[derive(Clone, Debug, PartialEq, derive_more::Display)]
pub enum Problem {
    #[display("processTime must be > 0, got {_0}")]
    NonPositiveProcessTime(f64),

    #[display("timeLimit must be >= 0, got {_0}")]
    NegativeTimeLimit(f64),

    #[display("capacities are malformed: {_0}")]
    MalformedCapacities(ListError),

    #[display("probs are malformed: {_0}")]
    MalformedProbabilities(ListError),

    /// Same checks the engine reports as invariant violations.
    #[display("{_0}")]
    Distribution(Violation),

    #[display("p must be within (0, 1], got {_0}")]
    InvalidSuccessRate(f64),

    #[display("{column} must be >= 0, got {value}")]
    NegativePower { column: &'static str, value: f64 },
}

/// Collect every problem of the rows, not just the first one.
pub fn validate(rows: &[StationRow], tolerance: f64) -> Vec<Issue> {
    rows.iter()
        .enumerate()
        .flat_map(|(index, row)| {
            problems(row, tolerance)
                .into_iter()
                .map(move |problem| Issue { row: index + 1, problem })
        })
        .collect()
}

fn problems(row: &StationRow, tolerance: f64) -> Vec<Problem> {
    let mut problems = Vec::new();
    if !(row.process_time.is_finite() && row.process_time > 0.0) {
        problems.push(Problem::NonPositiveProcessTime(row.process_time));
    }
    if !(row.time_limit.is_finite() && row.time_limit >= 0.0) {
        problems.push(Problem::NegativeTimeLimit(row.time_limit));
    }

    let capacities = row.capacities.parse();
    match &capacities {
        Err(error) => problems.push(Problem::MalformedCapacities(error.clone())),
        Ok(capacities) => {
            problems
                .extend(capacity_violations(capacities).into_iter().map(Problem::Distribution));
        }
    }

    let probabilities = row.probabilities.parse();
    match &probabilities {
        Err(error) => problems.push(Problem::MalformedProbabilities(error.clone())),
        Ok(probabilities) => problems.extend(
            probability_violations(probabilities, tolerance).into_iter().map(Problem::Distribution),
        ),
    }

    if let (Ok(capacities), Ok(probabilities)) = (&capacities, &probabilities) {
        problems.extend(
            length_violations(capacities.len(), probabilities.len())
                .into_iter()
                .map(Problem::Distribution),
        );
    }

    if let Some(success_rate) = row.success_rate
        && !is_valid_success_rate(success_rate)
    {
        problems.push(Problem::InvalidSuccessRate(success_rate));
    }
    for (column, power) in [("working_power", row.working_power), ("idle_power", row.idle_power)] {
        if let Some(value) = power
            && !(value.is_finite() && value >= 0.0)
        {
            problems.push(Problem::NegativePower { column, value });
        }
    }
    problems
}
