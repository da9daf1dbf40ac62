//! Genetic operators: selection, crossover, mutation, and generation
//! assembly.
//!
//! Operators never alias: crossover and mutation deep-copy their parents
//! and overwrite exactly one subtree slot of the copy, so parents stay
//! untouched. Subtree points are addressed by path (child-index sequence)
//! and heights count the root as 1.

use crate::gp::config::GpConfig;
use crate::gp::generators;
use crate::gp::stats::{better, Statistics};
use crate::gp::tree::Node;
use rand::Rng;

/// Provenance of the children of one generation, keyed by the child's
/// index in the new population: the average fitness of its crossover
/// parents, or its single mutation parent's fitness.
#[derive(Debug, Clone, Default)]
pub struct ImprovementMetadata {
    /// `(child index, average parent fitness)` per crossover child.
    pub crossover_avg_parent_fitness: Vec<(usize, f64)>,
    /// `(child index, parent fitness)` per mutation child.
    pub mutation_parent_fitness: Vec<(usize, f64)>,
}

/// Tournament selection: draws `tournament_size` indices uniformly with
/// replacement and returns the one with the smallest fitness. Duplicate
/// picks are allowed; NaN fitness never wins.
pub fn tournament_selection<R: Rng>(
    rng: &mut R,
    tournament_size: usize,
    fitnesses: &[f64],
) -> usize {
    let mut best = rng.random_range(0..fitnesses.len());
    for _ in 1..tournament_size {
        let candidate = rng.random_range(0..fitnesses.len());
        if better(fitnesses[candidate], fitnesses[best]) {
            best = candidate;
        }
    }
    best
}

/// Picks a uniformly random node of the tree, returning its path and its
/// height (root = 1). The traversal is a depth-first preorder count, so the
/// mapping from drawn index to node is deterministic.
pub fn random_tree_point<R: Rng>(rng: &mut R, root: &Node, size: usize) -> (Vec<usize>, usize) {
    let mut remaining = rng.random_range(0..size);
    let mut path = Vec::new();
    descend(root, 1, &mut remaining, &mut path).expect("selected point within tree size")
}

fn descend(
    node: &Node,
    height: usize,
    remaining: &mut usize,
    path: &mut Vec<usize>,
) -> Option<(Vec<usize>, usize)> {
    if *remaining == 0 {
        return Some((path.clone(), height));
    }
    *remaining -= 1;
    for (i, child) in node.children().iter().enumerate() {
        path.push(i);
        if let Some(found) = descend(child, height + 1, remaining, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}

/// Height of the tallest path in `root`, counting the root as 1.
/// Short-circuits as soon as `cap` is reached.
pub fn max_node_height(root: &Node, cap: usize) -> usize {
    let mut stack = vec![(root, 1)];
    let mut tallest = 0;
    while let Some((node, height)) = stack.pop() {
        if height > tallest {
            tallest = height;
        }
        if height == cap {
            return cap;
        }
        for child in node.children() {
            stack.push((child, height + 1));
        }
    }
    tallest
}

/// Subtree crossover with a height limit.
///
/// Swaps one random subtree between deep copies of the parents. Each child
/// independently survives only if its resulting height stays within
/// `config.max_height`; otherwise that child is replaced by a copy of its
/// untouched parent.
pub fn crossover<R: Rng>(
    rng: &mut R,
    config: &GpConfig,
    parent_x: &Node,
    size_x: usize,
    parent_y: &Node,
    size_y: usize,
) -> (Node, Node) {
    let mut child_x = parent_x.clone();
    let mut child_y = parent_y.clone();

    let (point_x, height_x) = random_tree_point(rng, &child_x, size_x);
    let (point_y, height_y) = random_tree_point(rng, &child_y, size_y);

    // A subtree at height h can be at most max_height - h + 1 tall, so the
    // cap never truncates; it only stops the scan early.
    let cross_height_x = max_node_height(
        child_x.subtree(&point_x),
        config.max_height - height_x + 1,
    );
    let cross_height_y = max_node_height(
        child_y.subtree(&point_y),
        config.max_height - height_y + 1,
    );

    let subtree_x = child_x.subtree(&point_x).clone();
    let subtree_y = child_y.subtree(&point_y).clone();
    child_x.replace_subtree(&point_x, subtree_y);
    child_y.replace_subtree(&point_y, subtree_x);

    (
        if height_x + cross_height_y - 1 > config.max_height {
            parent_x.clone()
        } else {
            child_x
        },
        if height_y + cross_height_x - 1 > config.max_height {
            parent_y.clone()
        } else {
            child_y
        },
    )
}

/// Subtree mutation: overwrites one random node of a deep copy with a tree
/// grown to fit, so the result never exceeds `config.max_height`.
pub fn mutation<R: Rng>(rng: &mut R, config: &GpConfig, parent: &Node, size: usize) -> Node {
    let mut child = parent.clone();
    let (point, height) = random_tree_point(rng, &child, size);
    let replacement = generators::grow(
        rng,
        config.max_height - height + 1,
        &config.functions,
        &config.terminals,
    );
    child.replace_subtree(&point, replacement);
    child
}

/// Assembles the next generation from the parents.
///
/// With elitism, slot 0 is a copy of the best parent. Offspring are then
/// appended in pairs until the population size is reached: two crossover
/// children with probability `crossover_prob`, otherwise one mutation of
/// each selected parent. Pair appends can overshoot by one; the extra
/// child and its provenance entry are dropped.
pub fn new_generation<R: Rng>(
    rng: &mut R,
    config: &GpConfig,
    parents: &[Node],
    parent_fitnesses: &[f64],
    parent_sizes: &[usize],
    parent_stats: &Statistics,
) -> (Vec<Node>, ImprovementMetadata) {
    let mut next_index = 0;
    let mut population = Vec::with_capacity(parents.len() + 1);
    if config.elitism {
        population.push(parents[parent_stats.best].clone());
        next_index += 1;
    }

    let mut metadata = ImprovementMetadata::default();
    while population.len() < parents.len() {
        let p1 = tournament_selection(rng, config.tournament_size, parent_fitnesses);
        let p2 = tournament_selection(rng, config.tournament_size, parent_fitnesses);
        let p1_fitness = parent_fitnesses[p1];
        let p2_fitness = parent_fitnesses[p2];

        if rng.random_range(0.0..1.0) < config.crossover_prob {
            let (c1, c2) = crossover(
                rng,
                config,
                &parents[p1],
                parent_sizes[p1],
                &parents[p2],
                parent_sizes[p2],
            );
            population.push(c1);
            population.push(c2);

            let avg_parent_fitness = (p1_fitness + p2_fitness) / 2.0;
            metadata
                .crossover_avg_parent_fitness
                .push((next_index, avg_parent_fitness));
            next_index += 1;
            metadata
                .crossover_avg_parent_fitness
                .push((next_index, avg_parent_fitness));
            next_index += 1;
        } else {
            population.push(mutation(rng, config, &parents[p1], parent_sizes[p1]));
            population.push(mutation(rng, config, &parents[p2], parent_sizes[p2]));

            metadata.mutation_parent_fitness.push((next_index, p1_fitness));
            next_index += 1;
            metadata.mutation_parent_fitness.push((next_index, p2_fitness));
            next_index += 1;
        }
    }

    // Pairwise appends on top of the elite slot overshoot by exactly one.
    if population.len() > parents.len() {
        population.pop();
        let dropped = population.len();
        metadata
            .crossover_avg_parent_fitness
            .retain(|&(child, _)| child < dropped);
        metadata
            .mutation_parent_fitness
            .retain(|&(child, _)| child < dropped);
    }

    (population, metadata)
}
