use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    cli::sweep::SweepPoint,
    core::{
        grade::{EmissionGrade, EnergyLevel, ReliabilityGrade},
        metrics::{Evaluation, MetricsResult},
        reliability::{Bound, meets},
        station::StationSpec,
    },
    fmt::FormattedPercentage,
    stations::Issue,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

const fn reliability_color(grade: ReliabilityGrade) -> Color {
    match grade {
        ReliabilityGrade::Excellent => Color::Green,
        ReliabilityGrade::Fair => Color::DarkYellow,
        ReliabilityGrade::Critical => Color::Red,
    }
}

const fn emission_color(grade: EmissionGrade) -> Color {
    match grade {
        EmissionGrade::Normal => Color::Green,
        EmissionGrade::Elevated => Color::DarkYellow,
        EmissionGrade::Excessive => Color::Red,
    }
}

fn reliability_cell(reliability: f64, bound: Bound) -> Cell {
    let text = match bound {
        Bound::Exact => FormattedPercentage(reliability).to_string(),
        Bound::LowerBound => format!("≥{}", FormattedPercentage(reliability)),
    };
    Cell::new(text)
        .set_alignment(CellAlignment::Right)
        .fg(reliability_color(ReliabilityGrade::of(reliability)))
}

#[must_use]
pub fn build_stations_table(stations: &[StationSpec], metrics: &MetricsResult) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Station", "Input", "Rounded", "Capacity", "Process", "Limit", "Idle", "Energy",
    ]);
    for (index, station) in stations.iter().enumerate() {
        let rounded_input = metrics.rounded_inputs[index];
        let max_capacity = station.max_capacity().unwrap_or_default();
        let process_time = metrics.process_times[index];
        let energy = metrics.energies[index];
        table.add_row(vec![
            Cell::new(&station.name),
            Cell::new(format!("{:.2}", metrics.inputs[index]))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(rounded_input).set_alignment(CellAlignment::Right),
            Cell::new(max_capacity).set_alignment(CellAlignment::Right).fg(
                if meets(max_capacity, rounded_input) { Color::Reset } else { Color::Red },
            ),
            Cell::new(process_time).set_alignment(CellAlignment::Right).fg(
                if process_time > station.time_limit { Color::Red } else { Color::Reset },
            ),
            Cell::new(station.time_limit)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(metrics.idle_times[index]).set_alignment(CellAlignment::Right),
            Cell::new(energy).set_alignment(CellAlignment::Right).fg(match EnergyLevel::of(energy) {
                EnergyLevel::Low => Color::Green,
                EnergyLevel::Moderate => Color::DarkYellow,
                EnergyLevel::High => Color::Red,
            }),
        ]);
    }
    table
}

#[must_use]
pub fn build_summary_table(evaluation: &Evaluation) -> Table {
    let metrics = &evaluation.metrics;
    let reliability_grade = ReliabilityGrade::of(metrics.reliability);
    let emission_grade = EmissionGrade::of(metrics.carbon_emission);

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value", "Grade"]);
    table.add_row(vec![
        Cell::new("Total input"),
        Cell::new(format!("{:.2}", metrics.total_input)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Reliability"),
        reliability_cell(metrics.reliability, metrics.reliability_bound),
        Cell::new(reliability_grade).fg(reliability_color(reliability_grade)),
    ]);
    table.add_row(vec![
        Cell::new("Total energy"),
        Cell::new(metrics.total_energy).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("CO₂ emission"),
        Cell::new(metrics.carbon_emission).set_alignment(CellAlignment::Right),
        Cell::new(emission_grade).fg(emission_color(emission_grade)),
    ]);
    table.add_row(vec![
        Cell::new("Time limit"),
        Cell::new(metrics.time_max_limit).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Process time"),
        Cell::new(metrics.total_process_time).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Idle time"),
        Cell::new(metrics.total_idle_time).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Evaluated states").add_attribute(Attribute::Dim),
        Cell::new(metrics.evaluated_states)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
        Cell::new(""),
    ]);
    table
}

#[must_use]
pub fn build_sweep_table(points: &[SweepPoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Demand", "Input", "Reliability", "Energy", "CO₂", ""]);
    for point in points {
        let emission_grade = EmissionGrade::of(point.carbon_emission);
        table.add_row(vec![
            Cell::new(point.demand).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", point.total_input))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            reliability_cell(point.reliability, point.reliability_bound),
            Cell::new(point.total_energy).set_alignment(CellAlignment::Right),
            Cell::new(point.carbon_emission)
                .set_alignment(CellAlignment::Right)
                .fg(emission_color(emission_grade)),
            if point.is_critical {
                Cell::new("★ critical").fg(Color::Yellow).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            },
        ]);
    }
    table
}

#[must_use]
pub fn build_issues_table(issues: &[Issue]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Row", "Problem"]);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row).set_alignment(CellAlignment::Right),
            Cell::new(&issue.problem).fg(Color::Red),
        ]);
    }
    table
}
