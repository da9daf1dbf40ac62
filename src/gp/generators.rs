//! Tree generators: `grow`, `full`, and ramped half-and-half.
//!
//! Heights are counted from 1 at the root. Both generators stop expanding a
//! slot once its height reaches `max_height - 1`, filling the frontier with
//! terminals; `full` additionally forces every interior slot to be a
//! function.

use crate::gp::config::GpConfig;
use crate::gp::primitives::{FunctionSpec, Primitive, TerminalSpec};
use crate::gp::tree::Node;
use rand::Rng;

/// Draws a uniform function primitive.
pub fn random_function<R: Rng>(rng: &mut R, functions: &[FunctionSpec]) -> Primitive {
    let pick = rng.random_range(0..functions.len());
    functions[pick].instantiate(rng)
}

/// Draws a uniform terminal primitive.
pub fn random_terminal<R: Rng>(rng: &mut R, terminals: &[TerminalSpec]) -> Primitive {
    let pick = rng.random_range(0..terminals.len());
    terminals[pick].instantiate(rng)
}

/// Draws a uniform primitive over the union of functions and terminals.
pub fn random_primitive<R: Rng>(
    rng: &mut R,
    functions: &[FunctionSpec],
    terminals: &[TerminalSpec],
) -> Primitive {
    let pick = rng.random_range(0..functions.len() + terminals.len());
    if pick < functions.len() {
        functions[pick].instantiate(rng)
    } else {
        terminals[pick - functions.len()].instantiate(rng)
    }
}

/// Grow method: any primitive at each slot until the height limit forces
/// terminals.
pub fn grow<R: Rng>(
    rng: &mut R,
    max_height: usize,
    functions: &[FunctionSpec],
    terminals: &[TerminalSpec],
) -> Node {
    if max_height == 1 {
        return Node::leaf(random_terminal(rng, terminals));
    }
    let root = random_primitive(rng, functions, terminals);
    expand(rng, root, 1, max_height, functions, terminals, false)
}

/// Full method: a function at every slot until the height limit forces
/// terminals.
pub fn full<R: Rng>(
    rng: &mut R,
    max_height: usize,
    functions: &[FunctionSpec],
    terminals: &[TerminalSpec],
) -> Node {
    if max_height == 1 {
        return Node::leaf(random_terminal(rng, terminals));
    }
    let root = random_function(rng, functions);
    expand(rng, root, 1, max_height, functions, terminals, true)
}

/// Fills the children of a node at `height`, recursing depth-first.
fn expand<R: Rng>(
    rng: &mut R,
    op: Primitive,
    height: usize,
    max_height: usize,
    functions: &[FunctionSpec],
    terminals: &[TerminalSpec],
    force_functions: bool,
) -> Node {
    let mut children = Vec::with_capacity(op.arity());
    for _ in 0..op.arity() {
        if height >= max_height - 1 {
            children.push(Node::leaf(random_terminal(rng, terminals)));
        } else {
            let child_op = if force_functions {
                random_function(rng, functions)
            } else {
                random_primitive(rng, functions, terminals)
            };
            children.push(expand(
                rng,
                child_op,
                height + 1,
                max_height,
                functions,
                terminals,
                force_functions,
            ));
        }
    }
    Node::new(op, children)
}

/// Builds the initial population with the ramped half-and-half method:
/// for each height in `2..=max_height`, an equal number of grow and full
/// trees. The config's normalized population size makes the per-height
/// split exact.
pub fn ramped_half_and_half<R: Rng>(rng: &mut R, config: &GpConfig) -> Vec<Node> {
    let half_per_height = config.population_size / (config.max_height - 1) / 2;

    let mut nodes = Vec::with_capacity(config.population_size);
    for height in 2..=config.max_height {
        for _ in 0..half_per_height {
            nodes.push(grow(rng, height, &config.functions, &config.terminals));
            nodes.push(full(rng, height, &config.functions, &config.terminals));
        }
    }
    nodes
}
