//! Primitive library for expression trees.
//!
//! A [`Primitive`] is a closed set of operators: four arithmetic functions,
//! base-2 logarithm, and the two terminal kinds (captured constant and
//! variable reference). Primitives are instantiated through
//! [`FunctionSpec`] and [`TerminalSpec`] factories that all take an RNG,
//! even when deterministic, so generators never need to distinguish.

use crate::gp::tree::Node;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Protected division: yields `default` when the divisor is within epsilon
/// of zero.
pub fn safe_div(a: f64, b: f64, default: f64) -> f64 {
    if b.abs() <= f64::EPSILON {
        default
    } else {
        a / b
    }
}

/// An instantiated operator carried by a tree node.
///
/// Arity 0 marks a terminal. `Const` captures its value at instantiation
/// time; `Var(i)` references slot `i` of the evaluation input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Add,
    Sub,
    Mul,
    Div,
    Log2,
    Const(f64),
    Var(usize),
}

impl Primitive {
    /// Number of children a node carrying this primitive requires.
    pub fn arity(&self) -> usize {
        match self {
            Primitive::Add | Primitive::Sub | Primitive::Mul | Primitive::Div => 2,
            Primitive::Log2 => 1,
            Primitive::Const(_) | Primitive::Var(_) => 0,
        }
    }

    /// Evaluates this primitive over its children for one input vector.
    ///
    /// `log2` of a non-positive argument flows as NaN or negative infinity;
    /// fitness aggregation tolerates non-finite intermediates.
    pub fn eval(&self, input: &[f64], children: &[Node]) -> f64 {
        match *self {
            Primitive::Add => children[0].eval(input) + children[1].eval(input),
            Primitive::Sub => children[0].eval(input) - children[1].eval(input),
            Primitive::Mul => children[0].eval(input) * children[1].eval(input),
            Primitive::Div => safe_div(children[0].eval(input), children[1].eval(input), 0.0),
            Primitive::Log2 => children[0].eval(input).log2(),
            Primitive::Const(value) => value,
            Primitive::Var(slot) => input[slot],
        }
    }
}

/// Factory for function (non-terminal) primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionSpec {
    Sum,
    Sub,
    Mult,
    Div,
    Log,
}

impl FunctionSpec {
    /// Instantiates the function primitive. The RNG is unused but accepted
    /// so function and terminal factories share a calling convention.
    pub fn instantiate<R: Rng>(&self, _rng: &mut R) -> Primitive {
        match self {
            FunctionSpec::Sum => Primitive::Add,
            FunctionSpec::Sub => Primitive::Sub,
            FunctionSpec::Mult => Primitive::Mul,
            FunctionSpec::Div => Primitive::Div,
            FunctionSpec::Log => Primitive::Log2,
        }
    }

    /// The full function set used by the symbolic regression driver.
    pub fn all() -> Vec<FunctionSpec> {
        vec![
            FunctionSpec::Sum,
            FunctionSpec::Sub,
            FunctionSpec::Mult,
            FunctionSpec::Div,
            FunctionSpec::Log,
        ]
    }
}

/// Factory for terminal primitives.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TerminalSpec {
    /// Draws a constant uniformly from `[-1, 1)` at instantiation time.
    Const,
    /// A fixed literal constant.
    Literal(f64),
    /// Reference to input slot `i`, printed as `xi`.
    Var(usize),
}

impl TerminalSpec {
    /// Instantiates the terminal primitive.
    pub fn instantiate<R: Rng>(&self, rng: &mut R) -> Primitive {
        match *self {
            TerminalSpec::Const => Primitive::Const(rng.random_range(-1.0..1.0)),
            TerminalSpec::Literal(value) => Primitive::Const(value),
            TerminalSpec::Var(slot) => Primitive::Var(slot),
        }
    }

    /// The terminal set for a dataset with `num_variables` input slots:
    /// one random-constant factory plus one variable reference per slot.
    pub fn for_variables(num_variables: usize) -> Vec<TerminalSpec> {
        let mut terminals = Vec::with_capacity(num_variables + 1);
        terminals.push(TerminalSpec::Const);
        for slot in 0..num_variables {
            terminals.push(TerminalSpec::Var(slot));
        }
        terminals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn leaf(op: Primitive) -> Node {
        Node::new(op, vec![])
    }

    fn binary(op: Primitive, lhs: Primitive, rhs: Primitive) -> Node {
        Node::new(op, vec![leaf(lhs), leaf(rhs)])
    }

    #[test]
    fn test_arithmetic_reference_values() {
        // x0 = 3, x1 = 2
        let input = [3.0, 2.0];
        let x0 = Primitive::Var(0);
        let x1 = Primitive::Var(1);

        assert_eq!(binary(Primitive::Add, x0, x1).eval(&input), 5.0);
        assert_eq!(binary(Primitive::Sub, x0, x1).eval(&input), 1.0);
        assert_eq!(binary(Primitive::Mul, x0, x1).eval(&input), 6.0);
        assert_eq!(binary(Primitive::Div, x0, x1).eval(&input), 1.5);
    }

    #[test]
    fn test_protected_division_by_zero() {
        let input = [3.0];
        let tree = binary(Primitive::Div, Primitive::Var(0), Primitive::Const(0.0));
        assert_eq!(tree.eval(&input), 0.0);
    }

    #[test]
    fn test_log2_reference_value() {
        let input = [3.0];
        let tree = Node::new(Primitive::Log2, vec![leaf(Primitive::Var(0))]);
        assert!((tree.eval(&input) - 1.584_962_5).abs() < 1e-6);
    }

    #[test]
    fn test_log2_non_positive_flows_non_finite() {
        let tree = Node::new(Primitive::Log2, vec![leaf(Primitive::Const(-1.0))]);
        assert!(tree.eval(&[]).is_nan());
        let tree = Node::new(Primitive::Log2, vec![leaf(Primitive::Const(0.0))]);
        assert_eq!(tree.eval(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_const_term_captures_draw() {
        let mut rng = create_rng(99);
        let prim = TerminalSpec::Const.instantiate(&mut rng);
        let Primitive::Const(value) = prim else {
            panic!("expected a constant");
        };
        assert!((-1.0..1.0).contains(&value));
        // Evaluates to the captured value on any input.
        assert_eq!(leaf(prim).eval(&[1.0, 2.0]), value);
        assert_eq!(leaf(prim).eval(&[]), value);
    }

    #[test]
    fn test_const_term_prints_its_value() {
        let node = leaf(Primitive::Const(0.185689));
        assert_eq!(node.to_string(), "0.185689");
        assert_eq!(node.eval(&[]), 0.185689);
    }

    #[test]
    fn test_literal_term_ignores_rng() {
        let mut rng = create_rng(0);
        let prim = TerminalSpec::Literal(2.5).instantiate(&mut rng);
        assert_eq!(prim, Primitive::Const(2.5));
    }

    #[test]
    fn test_arity() {
        assert_eq!(Primitive::Add.arity(), 2);
        assert_eq!(Primitive::Log2.arity(), 1);
        assert_eq!(Primitive::Const(0.0).arity(), 0);
        assert_eq!(Primitive::Var(3).arity(), 0);
    }

    #[test]
    fn test_terminal_set_for_variables() {
        let terminals = TerminalSpec::for_variables(2);
        assert_eq!(
            terminals,
            vec![
                TerminalSpec::Const,
                TerminalSpec::Var(0),
                TerminalSpec::Var(1)
            ]
        );
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(6.0, 2.0, 0.0), 3.0);
        assert_eq!(safe_div(6.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_div(6.0, f64::EPSILON / 2.0, 7.0), 7.0);
    }
}
