use crate::stations::{StationRow, StationTable};

const PROBABILITIES: &str = "[0.001, 0.003, 0.005, 0.007, 0.012, 0.972]";

impl StationTable {
    /// Five-station line the tool falls back to when no table is given.
    pub fn defaults() -> Self {
        let row = |name: &str, process_time, time_limit, capacities: &str| {
            StationRow::builder()
                .name(name)
                .process_time(process_time)
                .time_limit(time_limit)
                .capacities(capacities)
                .probabilities(PROBABILITIES)
                .build()
        };
        Self {
            stations: vec![
                row("Workstation 1", 0.001686, 10.0, "[0, 700, 1400, 2100, 2800, 3500]"),
                row("Workstation 2", 0.010065, 30.0, "[0, 675, 1350, 2025, 2700, 3375]"),
                row("Workstation 3", 0.032278, 100.0, "[0, 600, 1200, 1800, 2400, 3000]"),
                row("Workstation 4", 0.008732, 25.0, "[0, 565, 1130, 1695, 2260, 2825]"),
                row("Workstation 5", 0.025224, 70.0, "[0, 540, 1080, 1620, 2160, 2700]"),
            ],
        }
    }
}
