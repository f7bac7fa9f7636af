//! Simulated annealing scheduler.
//!
//! Starting from an initial placement, repeatedly proposes module swaps
//! and accepts or rejects each with the Metropolis criterion while the
//! temperature cools geometrically. Half the proposals are guided by a
//! criticality queue rebuilt at every temperature level; the rest explore
//! uniformly at random. The best placement observed is snapshotted and
//! restored when the schedule ends.

use crate::cost;
use crate::error::PlaceError;
use crate::grid::Placement;
use crate::pq::CriticalityQueue;
use locus_netlist::{ModuleId, NetlistGraph};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cooling-schedule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealSchedule {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Temperature at which the run stops.
    pub min_temperature: f64,
    /// Geometric cooling multiplier, strictly inside (0, 1).
    pub cooling_rate: f64,
    /// Trial moves per temperature level; `None` uses the module count.
    pub moves_per_temperature: Option<usize>,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 0.1,
            cooling_rate: 0.95,
            moves_per_temperature: None,
        }
    }
}

impl AnnealSchedule {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), PlaceError> {
        if !self.cooling_rate.is_finite() || self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(PlaceError::InvalidSchedule {
                reason: format!("cooling rate {} not in (0, 1)", self.cooling_rate),
            });
        }
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(PlaceError::InvalidSchedule {
                reason: format!(
                    "initial temperature {} must be positive",
                    self.initial_temperature
                ),
            });
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(PlaceError::InvalidSchedule {
                reason: format!("minimum temperature {} must be positive", self.min_temperature),
            });
        }
        Ok(())
    }
}

/// Telemetry for one temperature level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelStats {
    /// Temperature during the level.
    pub temperature: f64,
    /// Running cost after the level's moves.
    pub current_cost: u64,
    /// Best cost observed so far.
    pub best_cost: u64,
    /// Moves accepted during the level.
    pub accepted: usize,
}

/// Summary of an annealing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealStats {
    /// Cost of the placement the run started from.
    pub initial_cost: u64,
    /// Cost of the restored best placement.
    pub best_cost: u64,
    /// Running cost when the schedule ended, before the best snapshot was
    /// restored.
    pub final_cost: u64,
    /// Total trial moves proposed.
    pub proposed: u64,
    /// Total trial moves accepted.
    pub accepted: u64,
    /// Per-level telemetry, one entry per temperature level.
    pub levels: Vec<LevelStats>,
}

/// Refines `placement` by simulated annealing.
///
/// The full cooling schedule always runs to completion: there is no early
/// exit, cancellation, or timeout. On return the placement holds the best
/// solution observed (its grid rebuilt from the snapshot coordinates),
/// which is not assumed optimal. With fewer than two modules there is
/// nothing to swap and the run returns immediately with trivial stats.
pub fn anneal(
    graph: &NetlistGraph,
    placement: &mut Placement,
    schedule: &AnnealSchedule,
    rng: &mut impl Rng,
) -> Result<AnnealStats, PlaceError> {
    schedule.validate()?;
    let module_count = graph.module_count();

    let initial_cost = cost::total_cost(graph, placement);
    let mut stats = AnnealStats {
        initial_cost,
        best_cost: initial_cost,
        final_cost: initial_cost,
        proposed: 0,
        accepted: 0,
        levels: Vec::new(),
    };
    if module_count < 2 {
        return Ok(stats);
    }

    let moves_per_level = schedule
        .moves_per_temperature
        .unwrap_or(module_count as usize);
    let mut queue = CriticalityQueue::with_capacity(module_count as usize);

    let mut current_cost = initial_cost;
    let mut best_cost = initial_cost;
    let mut best_coords = placement.snapshot();

    let mut temperature = schedule.initial_temperature;
    while temperature > schedule.min_temperature {
        // Accepted moves shift local costs, so the queue is rebuilt from
        // scratch once per level.
        rebuild_queue(graph, placement, &mut queue);

        let mut level_accepted = 0usize;
        for _ in 0..moves_per_level {
            let (m1, m2) = select_candidates(&mut queue, module_count, rng);
            let delta = cost::swap_delta(graph, placement, m1, m2);
            stats.proposed += 1;

            if accept(delta, temperature, rng) {
                placement.swap(m1, m2)?;
                current_cost = (current_cost as i64 + delta) as u64;
                level_accepted += 1;
                if current_cost < best_cost {
                    best_cost = current_cost;
                    best_coords.copy_from_slice(placement.coords());
                }
            }
        }

        stats.accepted += level_accepted as u64;
        stats.levels.push(LevelStats {
            temperature,
            current_cost,
            best_cost,
            accepted: level_accepted,
        });
        log::debug!(
            "T = {temperature:.2}, current = {current_cost}, best = {best_cost}, accepted = {level_accepted}/{moves_per_level}"
        );
        temperature *= schedule.cooling_rate;
    }

    placement.restore(&best_coords)?;
    stats.final_cost = current_cost;
    stats.best_cost = best_cost;
    Ok(stats)
}

/// Rebuilds the criticality queue from every module's current local cost.
///
/// An overflow can only happen if the queue is smaller than the module
/// count; guidance then degrades for the dropped modules and the run
/// continues.
fn rebuild_queue(graph: &NetlistGraph, placement: &Placement, queue: &mut CriticalityQueue) {
    queue.clear();
    for module in graph.modules() {
        let priority = cost::local_cost(graph, placement, module);
        if let Err(err) = queue.insert(module, priority) {
            log::warn!("skipping module {module} in criticality queue: {err}");
        }
    }
}

/// Picks a candidate pair for a trial swap.
///
/// With probability 1/2 the queue's current maximum is consumed (not
/// reinserted) and paired with a random distinct partner; otherwise, or
/// when the queue has drained, both modules are uniform random and
/// distinct. Requires at least two modules.
fn select_candidates(
    queue: &mut CriticalityQueue,
    module_count: u32,
    rng: &mut impl Rng,
) -> (ModuleId, ModuleId) {
    if rng.gen_bool(0.5) {
        if let Some(top) = queue.extract_max() {
            let m1 = top.module;
            let mut m2 = ModuleId::from_raw(rng.gen_range(0..module_count));
            while m2 == m1 {
                m2 = ModuleId::from_raw(rng.gen_range(0..module_count));
            }
            return (m1, m2);
        }
    }
    random_pair(module_count, rng)
}

/// Picks two distinct modules uniformly at random.
fn random_pair(module_count: u32, rng: &mut impl Rng) -> (ModuleId, ModuleId) {
    let first = rng.gen_range(0..module_count);
    let mut second = rng.gen_range(0..module_count);
    while second == first {
        second = rng.gen_range(0..module_count);
    }
    (ModuleId::from_raw(first), ModuleId::from_raw(second))
}

/// Metropolis criterion: always accept improvements, accept uphill moves
/// with probability `exp(-delta / T)` against a uniform draw in `[0, 1)`.
fn accept(delta: i64, temperature: f64, rng: &mut impl Rng) -> bool {
    if delta <= 0 {
        return true;
    }
    let probability = (-(delta as f64) / temperature).exp();
    rng.gen::<f64>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::random_initial;
    use locus_netlist::{AdjacencyArena, NetlistBuilder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(raw: u32) -> ModuleId {
        ModuleId::from_raw(raw)
    }

    /// A ring of `n` modules: i connected to (i + 1) mod n.
    fn ring_graph(n: u32) -> NetlistGraph {
        let mut builder =
            NetlistBuilder::new(n, AdjacencyArena::with_capacity(2 * n as usize));
        for i in 0..n {
            builder.add_hyperedge(&[m(i), m((i + 1) % n)]).unwrap();
        }
        builder.build().unwrap()
    }

    fn short_schedule() -> AnnealSchedule {
        AnnealSchedule {
            initial_temperature: 10.0,
            min_temperature: 0.5,
            cooling_rate: 0.8,
            moves_per_temperature: None,
        }
    }

    #[test]
    fn default_schedule_is_valid() {
        AnnealSchedule::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_cooling_rate() {
        for bad in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let schedule = AnnealSchedule {
                cooling_rate: bad,
                ..AnnealSchedule::default()
            };
            assert!(matches!(
                schedule.validate(),
                Err(PlaceError::InvalidSchedule { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_nonpositive_temperatures() {
        let zero_t0 = AnnealSchedule {
            initial_temperature: 0.0,
            ..AnnealSchedule::default()
        };
        assert!(zero_t0.validate().is_err());

        let negative_tmin = AnnealSchedule {
            min_temperature: -1.0,
            ..AnnealSchedule::default()
        };
        assert!(negative_tmin.validate().is_err());
    }

    #[test]
    fn best_cost_nonincreasing_across_levels() {
        let graph = ring_graph(12);
        let mut rng = StdRng::seed_from_u64(11);
        let mut placement = random_initial(4, 4, 12, &mut rng).unwrap();
        let stats = anneal(&graph, &mut placement, &short_schedule(), &mut rng).unwrap();

        assert!(!stats.levels.is_empty());
        let mut previous = stats.initial_cost;
        for level in &stats.levels {
            assert!(level.best_cost <= previous);
            previous = level.best_cost;
        }
        assert_eq!(stats.best_cost, stats.levels.last().unwrap().best_cost);
    }

    #[test]
    fn restored_placement_matches_best_cost() {
        let graph = ring_graph(10);
        let mut rng = StdRng::seed_from_u64(5);
        let mut placement = random_initial(5, 5, 10, &mut rng).unwrap();
        let stats = anneal(&graph, &mut placement, &short_schedule(), &mut rng).unwrap();
        assert_eq!(cost::total_cost(&graph, &placement), stats.best_cost);
    }

    #[test]
    fn best_cost_never_exceeds_initial() {
        let graph = ring_graph(16);
        let mut rng = StdRng::seed_from_u64(21);
        let mut placement = random_initial(5, 5, 16, &mut rng).unwrap();
        let stats = anneal(&graph, &mut placement, &short_schedule(), &mut rng).unwrap();
        assert!(stats.best_cost <= stats.initial_cost);
    }

    #[test]
    fn deterministic_for_a_fixed_seed() {
        let graph = ring_graph(8);
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut placement = random_initial(4, 4, 8, &mut rng).unwrap();
            let stats = anneal(&graph, &mut placement, &short_schedule(), &mut rng).unwrap();
            (placement.snapshot(), stats.best_cost)
        };
        let (coords_a, best_a) = run(77);
        let (coords_b, best_b) = run(77);
        assert_eq!(coords_a, coords_b);
        assert_eq!(best_a, best_b);
    }

    #[test]
    fn temperatures_decrease_geometrically() {
        let graph = ring_graph(6);
        let mut rng = StdRng::seed_from_u64(2);
        let mut placement = random_initial(3, 3, 6, &mut rng).unwrap();
        let stats = anneal(&graph, &mut placement, &short_schedule(), &mut rng).unwrap();
        for pair in stats.levels.windows(2) {
            assert!((pair[1].temperature - pair[0].temperature * 0.8).abs() < 1e-9);
        }
        assert!(stats.levels.last().unwrap().temperature > 0.5);
    }

    #[test]
    fn moves_per_temperature_override_respected() {
        let graph = ring_graph(6);
        let schedule = AnnealSchedule {
            moves_per_temperature: Some(3),
            ..short_schedule()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut placement = random_initial(3, 3, 6, &mut rng).unwrap();
        let stats = anneal(&graph, &mut placement, &schedule, &mut rng).unwrap();
        assert_eq!(stats.proposed, 3 * stats.levels.len() as u64);
    }

    #[test]
    fn single_module_returns_trivial_stats() {
        let builder = NetlistBuilder::new(1, AdjacencyArena::with_capacity(0));
        let graph = builder.build().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut placement = random_initial(2, 2, 1, &mut rng).unwrap();
        let before = placement.snapshot();
        let stats = anneal(&graph, &mut placement, &AnnealSchedule::default(), &mut rng).unwrap();
        assert_eq!(stats.proposed, 0);
        assert!(stats.levels.is_empty());
        assert_eq!(placement.snapshot(), before);
    }

    #[test]
    fn schedule_below_min_temperature_runs_zero_levels() {
        let graph = ring_graph(4);
        let schedule = AnnealSchedule {
            initial_temperature: 0.1,
            min_temperature: 1.0,
            ..AnnealSchedule::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut placement = random_initial(2, 2, 4, &mut rng).unwrap();
        let initial = cost::total_cost(&graph, &placement);
        let stats = anneal(&graph, &mut placement, &schedule, &mut rng).unwrap();
        assert!(stats.levels.is_empty());
        assert_eq!(stats.best_cost, initial);
    }

    #[test]
    fn accept_always_takes_improvements() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert!(accept(-3, 0.01, &mut rng));
            assert!(accept(0, 0.01, &mut rng));
        }
    }

    #[test]
    fn accept_rejects_uphill_at_frozen_temperature() {
        // exp(-100 / 1e-6) underflows to zero, below any uniform draw.
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert!(!accept(100, 1e-6, &mut rng));
        }
    }

    #[test]
    fn accept_takes_most_uphill_at_hot_temperature() {
        let mut rng = StdRng::seed_from_u64(0);
        let taken = (0..1000).filter(|_| accept(1, 1e9, &mut rng)).count();
        assert!(taken > 950);
    }

    #[test]
    fn random_pair_is_distinct() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let (a, b) = random_pair(2, &mut rng);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn select_candidates_falls_back_when_queue_empty() {
        let mut queue = CriticalityQueue::with_capacity(4);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let (a, b) = select_candidates(&mut queue, 4, &mut rng);
            assert_ne!(a, b);
            assert!(a.as_raw() < 4 && b.as_raw() < 4);
        }
    }

    #[test]
    fn stats_serde_roundtrip() {
        let stats = AnnealStats {
            initial_cost: 40,
            best_cost: 12,
            final_cost: 15,
            proposed: 100,
            accepted: 37,
            levels: vec![LevelStats {
                temperature: 10.0,
                current_cost: 15,
                best_cost: 12,
                accepted: 37,
            }],
        };
        let json = serde_json::to_string(&stats).unwrap();
        let restored: AnnealStats = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.best_cost, 12);
        assert_eq!(restored.levels.len(), 1);
    }
}
