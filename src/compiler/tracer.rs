//! Operator-overloading tracer.
//!
//! A function written against generic arithmetic bounds can be called on
//! plain `i64` values or on [`Tracer`]s; the latter records each operation
//! into a shared [`OpGraph`] builder.
use super::graph::{NodeId, OpGraph, Operation};
use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

#[derive(Debug, Default)]
struct GraphBuilder {
    nodes: Vec<Operation>,
    /// Set when a tracer from another trace was combined with this one.
    poisoned: bool,
}

impl GraphBuilder {
    fn push(&mut self, op: Operation) -> NodeId {
        self.nodes.push(op);
        self.nodes.len() - 1
    }
}

/// Symbolic value standing in for a circuit parameter during tracing.
#[derive(Clone)]
pub struct Tracer {
    builder: Rc<RefCell<GraphBuilder>>,
    node: NodeId,
}

impl Tracer {
    pub fn node(&self) -> NodeId {
        self.node
    }

    fn push(&self, op: Operation) -> Tracer {
        let node = self.builder.borrow_mut().push(op);
        Tracer {
            builder: Rc::clone(&self.builder),
            node,
        }
    }

    fn constant(&self, value: i64) -> Tracer {
        self.push(Operation::Constant(value))
    }

    fn binary(&self, rhs: &Tracer, op: fn(NodeId, NodeId) -> Operation) -> Tracer {
        if !Rc::ptr_eq(&self.builder, &rhs.builder) {
            self.builder.borrow_mut().poisoned = true;
            rhs.builder.borrow_mut().poisoned = true;
            // placeholder so tracing can finish; the graph is discarded
            return self.constant(0);
        }
        self.push(op(self.node, rhs.node))
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracer(%{})", self.node)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:path) => {
        impl $trait<Tracer> for Tracer {
            type Output = Tracer;

            fn $method(self, rhs: Tracer) -> Tracer {
                self.binary(&rhs, $op)
            }
        }

        impl $trait<&Tracer> for &Tracer {
            type Output = Tracer;

            fn $method(self, rhs: &Tracer) -> Tracer {
                self.binary(rhs, $op)
            }
        }

        impl $trait<i64> for Tracer {
            type Output = Tracer;

            fn $method(self, rhs: i64) -> Tracer {
                let rhs = self.constant(rhs);
                self.binary(&rhs, $op)
            }
        }

        impl $trait<Tracer> for i64 {
            type Output = Tracer;

            fn $method(self, rhs: Tracer) -> Tracer {
                let lhs = rhs.constant(self);
                lhs.binary(&rhs, $op)
            }
        }
    };
}

impl_binary_op!(Add, add, Operation::Add);
impl_binary_op!(Sub, sub, Operation::Sub);
impl_binary_op!(Mul, mul, Operation::Mul);

impl Neg for Tracer {
    type Output = Tracer;

    fn neg(self) -> Tracer {
        self.push(Operation::Neg(self.node))
    }
}

/// A function that can be traced with `Args` parameters.
pub trait CircuitFunction<Args> {
    const ARITY: usize;

    fn call(&self, inputs: &[Tracer]) -> Tracer;
}

impl<F> CircuitFunction<(Tracer,)> for F
where
    F: Fn(Tracer) -> Tracer,
{
    const ARITY: usize = 1;

    fn call(&self, inputs: &[Tracer]) -> Tracer {
        self(inputs[0].clone())
    }
}

impl<F> CircuitFunction<(Tracer, Tracer)> for F
where
    F: Fn(Tracer, Tracer) -> Tracer,
{
    const ARITY: usize = 2;

    fn call(&self, inputs: &[Tracer]) -> Tracer {
        self(inputs[0].clone(), inputs[1].clone())
    }
}

impl<F> CircuitFunction<(Tracer, Tracer, Tracer)> for F
where
    F: Fn(Tracer, Tracer, Tracer) -> Tracer,
{
    const ARITY: usize = 3;

    fn call(&self, inputs: &[Tracer]) -> Tracer {
        self(inputs[0].clone(), inputs[1].clone(), inputs[2].clone())
    }
}

/// Traces `function` over `input_count` fresh inputs.
///
/// Returns `None` when the function's output does not belong to this trace
/// or when it mixed in a tracer from another trace.
pub fn trace<F, Args>(function: &F, input_count: usize) -> Option<OpGraph>
where
    F: CircuitFunction<Args>,
{
    let builder = Rc::new(RefCell::new(GraphBuilder::default()));
    let inputs: Vec<Tracer> = (0..input_count)
        .map(|index| {
            let node = builder.borrow_mut().push(Operation::Input { index });
            Tracer {
                builder: Rc::clone(&builder),
                node,
            }
        })
        .collect();

    let output = function.call(&inputs);
    if !Rc::ptr_eq(&output.builder, &builder) {
        return None;
    }
    let builder = builder.borrow();
    if builder.poisoned {
        return None;
    }
    Some(OpGraph::new(builder.nodes.clone(), output.node, input_count))
}
