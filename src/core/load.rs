use crate::{
    core::station::StationSpec,
    quantity::{energy::KilowattHours, time::Hours},
};

/// Time and energy a station spends on its rounded input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StationLoad {
    pub process_time: Hours,

    /// Unused slack within the allotted window, never negative.
    pub idle_time: Hours,

    pub energy: KilowattHours,
}

impl StationLoad {
    #[expect(clippy::cast_precision_loss)]
    pub fn new(station: &StationSpec, rounded_input: u64) -> Self {
        let process_time = station.process_time * rounded_input as f64;
        let idle_time = (station.time_limit - process_time).max(Hours::ZERO);
        let energy = station.working_power * process_time + station.idle_power * idle_time;
        Self { process_time, idle_time, energy }
    }

    /// Whether the station needs more time than it is allotted.
    pub fn is_overrun(&self, station: &StationSpec) -> bool {
        self.process_time > station.time_limit
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::station::tests::station;

    #[test]
    fn test_idle_station() {
        let station = station("A", &[0.0, 700.0], &[0.1, 0.9]);
        let load = StationLoad::new(&station, 1000);
        assert_abs_diff_eq!(load.process_time.get(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(load.idle_time.get(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(load.energy.get(), 2.89 * 10.0 + 0.4335 * 90.0, epsilon = 1e-9);
        assert!(!load.is_overrun(&station));
    }

    #[test]
    fn test_overrun_clamps_idle_time() {
        let station = station("A", &[0.0, 700.0], &[0.1, 0.9]);
        let load = StationLoad::new(&station, 20_000);
        assert_abs_diff_eq!(load.process_time.get(), 200.0, epsilon = 1e-9);
        assert_eq!(load.idle_time, Hours::ZERO);
        assert_abs_diff_eq!(load.energy.get(), 2.89 * 200.0, epsilon = 1e-9);
        assert!(load.is_overrun(&station));
    }

    #[test]
    fn test_process_time_equal_to_limit() {
        let mut station = station("A", &[0.0, 700.0], &[0.1, 0.9]);
        station.process_time = Hours::from(0.25);

        // 400 × 0.25 h is the whole 100 h window:
        let load = StationLoad::new(&station, 400);
        assert_eq!(load.process_time, station.time_limit);
        assert_eq!(load.idle_time, Hours::ZERO);
        assert_abs_diff_eq!(load.energy.get(), 2.89 * 100.0, epsilon = 1e-9);
        assert!(!load.is_overrun(&station));
    }
}
