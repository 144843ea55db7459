use bon::{Builder, bon};
use itertools::Itertools;

use crate::{
    core::{
        authority::Authority,
        cache::{Key, Memo},
        diagnostic::Diagnostic,
        error::InvalidArgument,
        load::StationLoad,
        metrics::{Evaluation, MetricsResult},
        propagation::{SuccessModel, round_up},
        reliability::{Bound, Method, meets, n_joint_states},
        scenario::Scenario,
        station::StationSpec,
    },
    prelude::*,
    quantity::{energy::KilowattHours, time::Hours},
};

/// Reliability, energy, and emission metrics of a station chain.
///
/// The evaluation is a pure function of its arguments, so it may be memoized.
#[derive(Builder)]
pub struct Engine {
    /// Maximum number of joint capacity states to enumerate.
    #[builder(default = Engine::DEFAULT_ENUMERATION_CAP)]
    enumeration_cap: usize,

    #[builder(default)]
    method: Method,

    /// Allowed deviation of a station's probability sum from one.
    #[builder(default = Engine::DEFAULT_PROBABILITY_TOLERANCE)]
    probability_tolerance: f64,

    memo: Option<Memo>,
}

impl Engine {
    pub const DEFAULT_ENUMERATION_CAP: usize = 50_000;
    pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-6;
}

#[bon]
impl Engine {
    /// Evaluate the chain, front station first.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument`] when the scenario, a station, or the authority has a meaningless
    /// parameter, or there are no stations at all. Everything else is reported via the diagnostics.
    #[builder]
    pub fn evaluate(
        &self,
        scenario: Scenario,
        stations: &[StationSpec],
        authority: Option<&Authority>,
    ) -> Result<Evaluation, InvalidArgument> {
        let Some(memo) = &self.memo else {
            return self.compute(scenario, stations, authority);
        };
        let key = Key { scenario, stations: stations.to_vec(), authority: authority.cloned() };
        if let Some(evaluation) = memo.get(&key) {
            debug!(n_entries = memo.len(), "memo hit");
            return Ok(evaluation);
        }
        let evaluation = self.compute(scenario, stations, authority)?;
        memo.insert(key, evaluation.clone());
        Ok(evaluation)
    }
}

impl Engine {
    #[instrument(skip_all, fields(demand = %scenario.demand, n_stations = stations.len()))]
    fn compute(
        &self,
        scenario: Scenario,
        stations: &[StationSpec],
        authority: Option<&Authority>,
    ) -> Result<Evaluation, InvalidArgument> {
        scenario.check_arguments()?;
        if stations.is_empty() {
            return Err(InvalidArgument::NoStations);
        }
        for station in stations {
            station.check_arguments()?;
        }
        if let Some(authority) = authority {
            authority.check_arguments()?;
        }

        let mut diagnostics = stations
            .iter()
            .flat_map(|station| {
                station.violations(self.probability_tolerance).into_iter().map(|violation| {
                    Diagnostic::InvariantViolation { station: station.name.clone(), violation }
                })
            })
            .collect_vec();

        let authority = authority.filter(|authority| {
            let matches = authority.matches(&scenario);
            if !matches {
                debug!("the authority was recorded under another scenario, ignoring");
            }
            matches
        });

        let model = SuccessModel::new(&scenario, stations);
        let computed_total_input = model.total_input(scenario.demand.0);
        if let Some(authoritative) =
            authority.and_then(|authority| authority.total_input_mismatch(computed_total_input))
        {
            diagnostics.push(Diagnostic::ValidationMismatch {
                computed: computed_total_input,
                authoritative,
            });
        }
        let total_input = authority
            .and_then(|authority| authority.total_input)
            .map_or(computed_total_input, |total_input| total_input.0);

        let inputs = model.propagate(total_input);
        let rounded_inputs = round_up(&inputs);
        let loads = stations
            .iter()
            .zip(&rounded_inputs)
            .map(|(station, rounded_input)| StationLoad::new(station, *rounded_input))
            .collect_vec();

        for ((station, load), required) in stations.iter().zip(&loads).zip(&rounded_inputs) {
            if load.is_overrun(station) {
                diagnostics.push(Diagnostic::TimeOverrun {
                    station: station.name.clone(),
                    process_time: load.process_time,
                    time_limit: station.time_limit,
                });
            }
            let max_capacity = station.max_capacity();
            if !max_capacity.is_some_and(|max_capacity| meets(max_capacity, *required)) {
                diagnostics.push(Diagnostic::CapacityOverrun {
                    station: station.name.clone(),
                    required: *required,
                    max_capacity: max_capacity.unwrap_or_default(),
                });
            }
        }

        let estimate = self.method.estimate(stations, &rounded_inputs, self.enumeration_cap);
        let total_energy = loads.iter().map(|load| load.energy).sum::<KilowattHours>();
        let mut metrics = MetricsResult {
            total_input,
            inputs,
            rounded_inputs,
            process_times: loads.iter().map(|load| load.process_time).collect(),
            idle_times: loads.iter().map(|load| load.idle_time).collect(),
            energies: loads.iter().map(|load| load.energy).collect(),
            total_energy,
            carbon_emission: total_energy * scenario.carbon_factor,
            reliability: estimate.reliability,
            reliability_bound: estimate.bound,
            evaluated_states: estimate.evaluated_states,
            time_max_limit: stations.iter().map(|station| station.time_limit).sum::<Hours>(),
            total_process_time: loads.iter().map(|load| load.process_time).sum::<Hours>(),
            total_idle_time: loads.iter().map(|load| load.idle_time).sum::<Hours>(),
        };

        if let Some(authority) = authority {
            if let Some(reliability) = authority.reliability {
                metrics.reliability = reliability.0;
                metrics.reliability_bound = Bound::Exact;
            }
            if let Some(total_energy) = authority.total_energy {
                metrics.total_energy = total_energy;
            }
            if let Some(carbon_emission) = authority.carbon_emission {
                metrics.carbon_emission = carbon_emission;
            }
        }

        if metrics.reliability_bound == Bound::LowerBound {
            diagnostics.push(Diagnostic::EnumerationTruncated {
                cap: self.enumeration_cap,
                n_states: n_joint_states(stations),
            });
        }

        debug!(
            total_input = metrics.total_input,
            reliability = metrics.reliability,
            total_energy = ?metrics.total_energy,
            n_diagnostics = diagnostics.len(),
            "evaluated",
        );
        Ok(Evaluation::new(metrics, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use enumset::EnumSet;
    use ordered_float::OrderedFloat;

    use super::*;
    use crate::core::{diagnostic::DiagnosticKind, station::tests::station};

    fn scenario(demand: f64) -> Scenario {
        Scenario::builder().demand(demand).carbon_factor(0.5).success_rate(1.0).build()
    }

    fn evaluate(engine: &Engine, scenario: Scenario, stations: &[StationSpec]) -> Evaluation {
        engine.evaluate().scenario(scenario).stations(stations).call().unwrap()
    }

    /// Five stations, each able to carry the whole input in its top capacity level.
    fn chain() -> Vec<StationSpec> {
        (1..=5)
            .map(|index| {
                station(&format!("S{index}"), &[0.0, 1500.0, 3500.0], &[0.01, 0.02, 0.97])
            })
            .collect()
    }

    #[test]
    fn test_single_station_meets_load() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(10.0), &stations);
        assert_eq!(evaluation.metrics.rounded_inputs, vec![10]);
        assert_abs_diff_eq!(evaluation.metrics.reliability, 0.9);
        assert_eq!(evaluation.metrics.reliability_bound, Bound::Exact);
        assert!(evaluation.diagnostics.is_empty());
    }

    #[test]
    fn test_single_station_falls_short() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(11.0), &stations);
        assert_abs_diff_eq!(evaluation.metrics.reliability, 0.0);
        assert_eq!(
            evaluation.diagnostics,
            vec![Diagnostic::CapacityOverrun {
                station: "A".to_string(),
                required: 11,
                max_capacity: 10.0,
            }]
        );
        assert!(evaluation.is_reliable());
    }

    #[test]
    fn test_two_independent_stations() {
        let stations =
            [station("A", &[0.0, 5.0], &[0.2, 0.8]), station("B", &[0.0, 5.0], &[0.2, 0.8])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(5.0), &stations);
        assert_eq!(evaluation.metrics.rounded_inputs, vec![5, 5]);
        assert_abs_diff_eq!(evaluation.metrics.reliability, 0.64, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_loss_chain() {
        let scenario = Scenario::builder().demand(2500.0).carbon_factor(0.474).build();
        let evaluation = evaluate(&Engine::builder().build(), scenario, &chain());
        let metrics = &evaluation.metrics;
        assert_abs_diff_eq!(metrics.total_input, 3066.08, epsilon = 0.01);
        for (index, input) in metrics.inputs.iter().enumerate() {
            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let exponent = index as i32;
            assert_abs_diff_eq!(*input, metrics.total_input * 0.96_f64.powi(exponent));
        }
        assert_eq!(metrics.rounded_inputs, vec![3067, 2944, 2826, 2713, 2605]);
        assert_abs_diff_eq!(metrics.reliability, 0.97_f64.powi(5), epsilon = 1e-12);
    }

    #[test]
    fn test_energy_and_emission() {
        let stations = [station("A", &[0.0, 1000.0], &[0.1, 0.9])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(1000.0), &stations);
        let metrics = &evaluation.metrics;

        // 1000 units × 0.01 h, and the rest of the 100 h is idle:
        assert_abs_diff_eq!(metrics.process_times[0].get(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.idle_times[0].get(), 90.0, epsilon = 1e-9);
        let energy = 2.89 * 10.0 + 0.4335 * 90.0;
        assert_abs_diff_eq!(metrics.total_energy.get(), energy, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.carbon_emission.get(), energy * 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.time_max_limit.get(), 100.0);
        assert_abs_diff_eq!(metrics.total_process_time.get(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.total_idle_time.get(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_time_overrun() {
        let stations = [station("A", &[0.0, 20_000.0], &[0.1, 0.9])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(20_000.0), &stations);
        assert_eq!(evaluation.metrics.idle_times, vec![Hours::ZERO]);
        assert_eq!(evaluation.flags, EnumSet::only(DiagnosticKind::TimeOverrun));
    }

    #[test]
    fn test_invariant_violation_is_flagged() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.8])];
        let evaluation = evaluate(&Engine::builder().build(), scenario(10.0), &stations);
        assert!(!evaluation.is_reliable());
        assert_abs_diff_eq!(evaluation.metrics.reliability, 0.8);
    }

    #[test]
    fn test_probability_tolerance() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.895])];
        let engine = Engine::builder().probability_tolerance(1e-2).build();
        assert!(evaluate(&engine, scenario(10.0), &stations).is_reliable());
    }

    #[test]
    fn test_enumeration_truncated() {
        let engine = Engine::builder().enumeration_cap(100).build();
        let evaluation = evaluate(&engine, scenario(1000.0), &chain());
        assert_eq!(evaluation.metrics.reliability_bound, Bound::LowerBound);
        assert_eq!(evaluation.metrics.evaluated_states, 100);
        assert!(evaluation.diagnostics.contains(&Diagnostic::EnumerationTruncated {
            cap: 100,
            n_states: 243,
        }));

        let complete = evaluate(&Engine::builder().build(), scenario(1000.0), &chain());
        assert!(evaluation.metrics.reliability <= complete.metrics.reliability);
    }

    #[test]
    fn test_exact_method() {
        let exact = Engine::builder().method(Method::Exact).build();
        let enumerated = evaluate(&Engine::builder().build(), scenario(1000.0), &chain());
        let evaluation = evaluate(&exact, scenario(1000.0), &chain());
        assert_eq!(evaluation.metrics.reliability_bound, Bound::Exact);
        assert_abs_diff_eq!(
            evaluation.metrics.reliability,
            enumerated.metrics.reliability,
            epsilon = 1e-12,
        );

        // Never truncated, however small the cap is:
        let exact = Engine::builder().method(Method::Exact).enumeration_cap(1).build();
        let evaluation = evaluate(&exact, scenario(1000.0), &chain());
        assert!(evaluation.diagnostics.is_empty());
    }

    #[test]
    fn test_idempotence() {
        let engine = Engine::builder().build();
        let first = evaluate(&engine, scenario(1000.0), &chain());
        let second = evaluate(&engine, scenario(1000.0), &chain());
        assert_eq!(first, second);
    }

    #[test]
    fn test_memo() {
        let engine = Engine::builder().memo(Memo::default()).build();
        let first = evaluate(&engine, scenario(1000.0), &chain());
        let second = evaluate(&engine, scenario(1000.0), &chain());
        assert_eq!(first, second);
        assert_eq!(engine.memo.as_ref().unwrap().len(), 1);

        let _ = evaluate(&engine, scenario(1001.0), &chain());
        assert_eq!(engine.memo.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_memo_shared_between_threads() {
        let engine = Engine::builder().memo(Memo::default()).build();
        let expected = evaluate(&Engine::builder().build(), scenario(1000.0), &chain());
        std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| evaluate(&engine, scenario(1000.0), &chain())))
                .collect_vec();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
        assert_eq!(engine.memo.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_memo_capacity() {
        let engine = Engine::builder().memo(Memo::with_capacity(1)).build();
        let _ = evaluate(&engine, scenario(1000.0), &chain());
        let _ = evaluate(&engine, scenario(1001.0), &chain());
        assert_eq!(engine.memo.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_arguments() {
        let engine = Engine::builder().build();
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];

        let result = engine.evaluate().scenario(scenario(0.0)).stations(&stations).call();
        assert!(matches!(result, Err(InvalidArgument::Scenario { field: "demand", .. })));

        let result = engine.evaluate().scenario(scenario(-5.0)).stations(&stations).call();
        assert!(matches!(result, Err(InvalidArgument::Scenario { field: "demand", .. })));

        let mut broken = stations.clone();
        broken[0].process_time = Hours::from(-1.0);
        let result = engine.evaluate().scenario(scenario(10.0)).stations(&broken).call();
        assert!(matches!(result, Err(InvalidArgument::Station { field: "process time", .. })));

        let result = engine.evaluate().scenario(scenario(10.0)).stations(&[]).call();
        assert_eq!(result, Err(InvalidArgument::NoStations));
    }

    #[test]
    fn test_matching_authority_overrides_aggregates() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let authority = Authority::builder()
            .demand(10.0)
            .carbon_factor(0.5)
            .total_input(12.0)
            .reliability(0.5)
            .total_energy(42.0)
            .carbon_emission(21.0)
            .build();
        let evaluation = Engine::builder()
            .build()
            .evaluate()
            .scenario(scenario(10.0))
            .stations(&stations)
            .authority(&authority)
            .call()
            .unwrap();
        let metrics = &evaluation.metrics;
        assert_abs_diff_eq!(metrics.total_input, 12.0);
        assert_eq!(metrics.rounded_inputs, vec![12]);
        assert_abs_diff_eq!(metrics.reliability, 0.5);
        assert_eq!(metrics.total_energy, KilowattHours::from(42.0));
        assert_abs_diff_eq!(metrics.carbon_emission.get(), 21.0);

        // Per-station figures are still computed, from the authoritative input:
        assert_abs_diff_eq!(metrics.process_times[0].get(), 0.12, epsilon = 1e-12);
        assert!(evaluation.diagnostics.contains(&Diagnostic::ValidationMismatch {
            computed: 10.0,
            authoritative: 12.0,
        }));
    }

    #[test]
    fn test_partial_authority() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let authority =
            Authority::builder().demand(10.0).carbon_factor(0.5).reliability(0.75).build();
        let evaluation = Engine::builder()
            .build()
            .evaluate()
            .scenario(scenario(10.0))
            .stations(&stations)
            .authority(&authority)
            .call()
            .unwrap();
        assert_abs_diff_eq!(evaluation.metrics.total_input, 10.0);
        assert_abs_diff_eq!(evaluation.metrics.reliability, 0.75);
        assert!(evaluation.diagnostics.is_empty());
    }

    #[test]
    fn test_authority_out_of_range() {
        let engine = Engine::builder().build();
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let evaluate = |authority: &Authority| {
            engine
                .evaluate()
                .scenario(scenario(10.0))
                .stations(&stations)
                .authority(authority)
                .call()
        };

        let authority =
            Authority::builder().demand(10.0).carbon_factor(0.5).total_input(-5.0).build();
        assert!(matches!(
            evaluate(&authority),
            Err(InvalidArgument::Authority { field: "total input", .. })
        ));

        let authority =
            Authority::builder().demand(10.0).carbon_factor(0.5).reliability(1.7).build();
        assert!(matches!(
            evaluate(&authority),
            Err(InvalidArgument::Authority { field: "reliability", .. })
        ));
    }

    #[test]
    fn test_authority_of_another_scenario_is_ignored() {
        let stations = [station("A", &[0.0, 10.0], &[0.1, 0.9])];
        let authority = Authority::builder()
            .demand(11.0)
            .carbon_factor(0.5)
            .total_input(12.0)
            .reliability(0.5)
            .build();
        let engine = Engine::builder().build();
        let evaluation = engine
            .evaluate()
            .scenario(scenario(10.0))
            .stations(&stations)
            .authority(&authority)
            .call()
            .unwrap();
        assert_eq!(evaluation, evaluate(&engine, scenario(10.0), &stations));
    }

    #[test]
    fn test_per_station_success_rates() {
        let mut stations = vec![
            station("A", &[0.0, 250.0], &[0.1, 0.9]),
            station("B", &[0.0, 250.0], &[0.1, 0.9]),
        ];
        stations[0].success_rate = Some(OrderedFloat(0.5));
        stations[1].success_rate = Some(OrderedFloat(0.8));
        let evaluation = evaluate(&Engine::builder().build(), scenario(100.0), &stations);
        assert_abs_diff_eq!(evaluation.metrics.total_input, 250.0, epsilon = 1e-9);
        assert_eq!(evaluation.metrics.rounded_inputs, vec![250, 125]);
    }
}
