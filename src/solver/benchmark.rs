use std::time::Instant;
use itertools::Itertools;
use rand::{distributions::Uniform, prelude::Distribution, seq::IteratorRandom, Rng};
use rand_xoshiro::{rand_core::SeedableRng, Xoroshiro128PlusPlus};
use tracing::info;
use crate::{formulation::{FormulationConfig, ModelType}, instance::{Edge, Instance, ROOT}};
use super::{base_solver::{BaseSolver, KmstOutcome}, errors::KmstError, ilp_solver::IlpSolver};





type PRNG = Xoroshiro128PlusPlus;

pub const BENCHMARK_SEED: u64 = 13374;

const OPTIMUM_TOLERANCE: f64 = 1e-6;



/// A connected random graph on `real_node_count` nodes plus an artificial root (node 0) joined
/// to every one of them at weight 0, so any connected subtree can be reached from the root.
pub fn random_instance(real_node_count: usize, extra_edge_count: usize, prng: &mut PRNG) -> Result<Instance, KmstError> {
    let weight_distribution: Uniform<u32> = Uniform::new_inclusive(1, 100);
    let n_nodes: usize = real_node_count + 1;
    let mut edges: Vec<Edge> = (1..n_nodes).map(|x| Edge::new(x - 1, ROOT, x, 0)).collect();
    let mut joined: Vec<(usize, usize)> = Vec::new();
    // Random spanning tree over the real nodes
    for node in 2..n_nodes {
        let parent: usize = prng.gen_range(1..node);
        joined.push((parent, node));
    }
    // Extra edges between real nodes that are not joined yet
    let candidates = (1..n_nodes).tuple_combinations::<(usize, usize)>().filter(|x| !joined.contains(x)).collect_vec();
    joined.extend(candidates.into_iter().choose_multiple(prng, extra_edge_count));
    for (v1, v2) in joined {
        edges.push(Edge::new(edges.len(), v1, v2, weight_distribution.sample(prng)));
    }
    Ok(Instance::new(n_nodes, edges)?)
}

pub fn start_benchmark(
    min_node_count: usize,
    max_node_count: usize,
    sample_count: u8,
    sample_repeat: u32,
    sample_ignore: u32
) -> Result<(), KmstError> {
    let mut prng = PRNG::seed_from_u64(BENCHMARK_SEED);
    for node_count in min_node_count..=max_node_count {
        println!("# nodes = {}, k = {}", node_count, node_count / 2);
        let mut times: Vec<Vec<f64>> = vec![Vec::with_capacity(sample_count as usize); ModelType::ALL.len()];
        for sample in 0..sample_count {
            println!("\tSample {}", sample + 1);
            let instance: Instance = random_instance(node_count, node_count, &mut prng)?;
            let mut optima: Vec<f64> = Vec::with_capacity(ModelType::ALL.len());
            for (model_i, model_type) in ModelType::ALL.into_iter().enumerate() {
                let mut solver: IlpSolver = IlpSolver::with_input(instance.clone(), FormulationConfig::new(model_type, node_count / 2));
                times[model_i].push(timeit(&mut solver, sample_repeat, sample_ignore)?);
                let optimum: f64 = match solver.get_solution() {
                    Some(KmstOutcome::Solved { objective, .. }) => *objective,
                    _ => return Err(KmstError::Disagreement(format!("{} found no tree for a connected instance.", model_type))),
                };
                println!("\t\t{} finished ({} s). Optimal value = {}.", model_type, times[model_i].last().copied().unwrap_or_default(), optimum);
                optima.push(optimum);
            }
            if let Some((min, max)) = optima.iter().copied().minmax().into_option() {
                if max - min > OPTIMUM_TOLERANCE {
                    return Err(KmstError::Disagreement(format!("Optima {:?} on sample {} with {} nodes.", optima, sample + 1, node_count)));
                }
            }
        }
        for (model_i, model_type) in ModelType::ALL.into_iter().enumerate() {
            let model_times: &[f64] = &times[model_i];
            info!(
                "{} on {} nodes: max {} s, avg {} s, min {} s",
                model_type,
                node_count,
                model_times.iter().copied().fold(f64::NAN, f64::max),
                model_times.iter().sum::<f64>() / model_times.len().max(1) as f64,
                model_times.iter().copied().fold(f64::NAN, f64::min)
            );
            println!("\t{}: {:?}", model_type, model_times);
        }
    }
    Ok(())
}

/// Mean wall-clock time of one `solve` call, after `ignore` warm-up calls.
pub fn timeit<S: BaseSolver>(solver: &mut S, repeat: u32, ignore: u32) -> Result<f64, KmstError> {
    for _ in 0..ignore {
        solver.solve()?;
    }
    let timed: u32 = repeat.saturating_sub(ignore).max(1);
    let mut cumulative_time: f64 = 0.0;
    for _ in 0..timed {
        let solver_begin_time: Instant = Instant::now();
        solver.solve()?;
        cumulative_time += solver_begin_time.elapsed().as_secs_f64();
    }
    Ok(cumulative_time / timed as f64)
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_instances_hang_off_an_artificial_root() {
        let mut prng = PRNG::seed_from_u64(7);
        let instance = random_instance(6, 3, &mut prng).unwrap();
        assert_eq!(instance.n_nodes(), 7);
        assert_eq!(instance.n_edges(), 6 + 5 + 3);
        assert!(instance.incident_edges(ROOT).iter().all(|&x| instance.edge(x).weight == 0));
        assert_eq!(instance.reachable_from_root().len(), 7);
        let real_edges: Vec<(usize, usize)> = instance.edges().iter().filter(|x| x.v1 != ROOT).map(|x| (x.v1, x.v2)).collect();
        assert_eq!(real_edges.iter().unique().count(), real_edges.len());
    }

    #[test]
    fn random_instances_are_reproducible() {
        let first = random_instance(8, 4, &mut PRNG::seed_from_u64(BENCHMARK_SEED)).unwrap();
        let second = random_instance(8, 4, &mut PRNG::seed_from_u64(BENCHMARK_SEED)).unwrap();
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn timeit_runs_every_round() {
        let instance = random_instance(4, 1, &mut PRNG::seed_from_u64(1)).unwrap();
        let mut solver: IlpSolver = IlpSolver::with_input(instance, FormulationConfig::new(ModelType::Scf, 2));
        let seconds = timeit(&mut solver, 3, 1).unwrap();
        assert!(seconds >= 0.0);
        assert!(solver.get_solution().is_some());
    }

    #[test]
    fn small_benchmark_agrees() {
        start_benchmark(4, 5, 1, 1, 0).unwrap();
    }
}
