//! Operation graph recorded while tracing a function.
use std::fmt;
use thiserror::Error;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Input { index: usize },
    Constant(i64),
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Neg(NodeId),
}

impl Operation {
    pub fn operands(&self) -> Vec<NodeId> {
        match *self {
            Operation::Input { .. } | Operation::Constant(_) => Vec::new(),
            Operation::Add(a, b) | Operation::Sub(a, b) | Operation::Mul(a, b) => {
                vec![a, b]
            }
            Operation::Neg(a) => vec![a],
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },
    #[error("integer overflow at %{node}")]
    Overflow { node: NodeId },
}

/// Nodes are stored in topological order: every operand precedes its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpGraph {
    nodes: Vec<Operation>,
    output: NodeId,
    input_count: usize,
}

impl OpGraph {
    pub(crate) fn new(nodes: Vec<Operation>, output: NodeId, input_count: usize) -> Self {
        debug_assert!(output < nodes.len());
        Self {
            nodes,
            output,
            input_count,
        }
    }

    pub fn nodes(&self) -> &[Operation] {
        &self.nodes
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Marks the nodes the output depends on.
    pub fn live_nodes(&self) -> Vec<bool> {
        let mut live = vec![false; self.nodes.len()];
        live[self.output] = true;
        for id in (0..self.nodes.len()).rev() {
            if live[id] {
                for operand in self.nodes[id].operands() {
                    live[operand] = true;
                }
            }
        }
        live
    }

    /// Marks the nodes depending on at least one of the flagged inputs.
    pub fn tainted_by(&self, inputs: &[bool]) -> Vec<bool> {
        let mut tainted = vec![false; self.nodes.len()];
        for (id, op) in self.nodes.iter().enumerate() {
            tainted[id] = match *op {
                Operation::Input { index } => inputs.get(index).copied().unwrap_or(false),
                Operation::Constant(_) => false,
                _ => op.operands().iter().any(|&operand| tainted[operand]),
            };
        }
        tainted
    }

    /// Plain evaluation, returning the value of every node.
    pub fn evaluate(&self, args: &[i64]) -> Result<Vec<i64>, EvaluationError> {
        if args.len() != self.input_count {
            return Err(EvaluationError::ArgumentCount {
                expected: self.input_count,
                got: args.len(),
            });
        }
        let mut values: Vec<i64> = Vec::with_capacity(self.nodes.len());
        for (node, op) in self.nodes.iter().enumerate() {
            let value = match *op {
                Operation::Input { index } => Some(args[index]),
                Operation::Constant(c) => Some(c),
                Operation::Add(a, b) => values[a].checked_add(values[b]),
                Operation::Sub(a, b) => values[a].checked_sub(values[b]),
                Operation::Mul(a, b) => values[a].checked_mul(values[b]),
                Operation::Neg(a) => values[a].checked_neg(),
            };
            values.push(value.ok_or(EvaluationError::Overflow { node })?);
        }
        Ok(values)
    }

    /// Plain evaluation of the output only.
    pub fn evaluate_output(&self, args: &[i64]) -> Result<i64, EvaluationError> {
        Ok(self.evaluate(args)?[self.output])
    }
}

impl fmt::Display for OpGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, op) in self.nodes.iter().enumerate() {
            match *op {
                Operation::Input { index } => writeln!(f, "%{id} = input({index})")?,
                Operation::Constant(c) => writeln!(f, "%{id} = {c}")?,
                Operation::Add(a, b) => writeln!(f, "%{id} = add(%{a}, %{b})")?,
                Operation::Sub(a, b) => writeln!(f, "%{id} = subtract(%{a}, %{b})")?,
                Operation::Mul(a, b) => writeln!(f, "%{id} = multiply(%{a}, %{b})")?,
                Operation::Neg(a) => writeln!(f, "%{id} = negative(%{a})")?,
            }
        }
        write!(f, "return %{}", self.output)
    }
}
