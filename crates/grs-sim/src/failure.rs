//! Failure state machine: advances component status timestep by timestep.
//!
//! Each component is an independent Markov chain over
//! {Operational, Failed} with asymmetric transition sources: failures
//! happen here, driven by the precomputed exponential-hazard probability,
//! while recoveries happen only inside a resilience strategy.

use grs_core::{ComponentStatus, GridModel};
use rand::Rng;

/// Advance every component one timestep.
///
/// A component that was operational draws a fresh uniform value and fails
/// when the draw is below its precomputed failure probability; failed
/// components keep their status. The outage-duration counter advances by
/// one for every timestep a component ends up failed, including the
/// failing step itself.
pub fn advance_timestep<R: Rng>(model: &mut GridModel, p_fail: &[f64], rng: &mut R) {
    for (component, &probability) in model.components_mut().iter_mut().zip(p_fail) {
        if component.status == ComponentStatus::Operational && rng.gen::<f64>() < probability {
            component.status = ComponentStatus::Failed;
        }
        if component.status.is_failed() {
            component.outage_duration += 1.0;
        }
    }
}

/// Run the failure state machine over a full timestep horizon.
///
/// The model enters at t = 0 in whatever state it holds (all operational
/// after a reset); transitions run for t = 1..n_timesteps. Returns the
/// per-timestep status trace, one row per timestep including the initial
/// one.
pub fn run_horizon<R: Rng>(
    model: &mut GridModel,
    delta_t: f64,
    n_timesteps: usize,
    rng: &mut R,
) -> Vec<Vec<ComponentStatus>> {
    let p_fail = model.failure_probabilities(delta_t);

    let mut trace = Vec::with_capacity(n_timesteps);
    trace.push(snapshot(model));
    for _ in 1..n_timesteps {
        advance_timestep(model, &p_fail, rng);
        trace.push(snapshot(model));
    }
    trace
}

fn snapshot(model: &GridModel) -> Vec<ComponentStatus> {
    model
        .components()
        .iter()
        .map(|component| component.status)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Random source whose every uniform draw is 0.0, forcing any positive
    /// failure probability to fire.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn zero_failure_rate_never_fails() {
        let mut model = GridModel::from_parameters(&[(0.0, 10.0)]);
        let mut rng = ZeroRng;
        let trace = run_horizon(&mut model, 1.0, 96, &mut rng);
        assert!(trace
            .iter()
            .all(|row| row[0] == ComponentStatus::Operational));
        assert_eq!(model.components()[0].outage_duration, 0.0);
    }

    #[test]
    fn forced_failure_at_first_transition() {
        let mut model = GridModel::from_parameters(&[(1.0, 10.0)]);
        let mut rng = ZeroRng;
        let trace = run_horizon(&mut model, 1.0, 4, &mut rng);
        assert_eq!(trace[0][0], ComponentStatus::Operational);
        assert_eq!(trace[1][0], ComponentStatus::Failed);
        assert_eq!(trace[3][0], ComponentStatus::Failed);
        // Failed at t = 1, 2, 3: duration counts each failed timestep.
        assert_eq!(model.components()[0].outage_duration, 3.0);
    }

    #[test]
    fn base_machine_never_recovers() {
        let mut model = GridModel::from_parameters(&[(0.5, 5.0), (0.5, 5.0), (0.5, 5.0)]);
        let mut rng = StdRng::seed_from_u64(99);
        let trace = run_horizon(&mut model, 1.0, 96, &mut rng);
        for window in trace.windows(2) {
            for i in 0..3 {
                if window[0][i] == ComponentStatus::Failed {
                    assert_eq!(window[1][i], ComponentStatus::Failed);
                }
            }
        }
    }

    #[test]
    fn trace_has_one_row_per_timestep() {
        let mut model = GridModel::from_parameters(&[(0.1, 1.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        let trace = run_horizon(&mut model, 1.0, 96, &mut rng);
        assert_eq!(trace.len(), 96);
    }
}
