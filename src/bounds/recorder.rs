//! Evaluation-tree recording.
//!
//! Plan caching keeps a recipe for rebuilding bounds when a cached plan is
//! reused with different constants. The translator reports each combinator
//! it applies, in order, to an [`IntervalEvalRecorder`]. Recording never
//! influences the produced bounds.

use std::fmt;

use super::errors::{BoundsError, BoundsResult};
use super::index::{IndexEntry, IndexedField};
use super::translate::IndexBoundsBuilder;
use crate::interval::{intersectize, unionize, OrderedIntervalList};
use crate::matcher::MatchExpression;

/// Observer of bounds construction.
pub trait IntervalEvalRecorder {
    /// Bounds that do not depend on any substitutable constant.
    fn add_const(&mut self, oil: &OrderedIntervalList);
    /// Bounds computed from `expr`; re-evaluated on replay.
    fn add_eval(&mut self, expr: &MatchExpression, oil: &OrderedIntervalList);
    fn add_union(&mut self);
    fn add_intersect(&mut self);
    fn add_complement(&mut self);
}

/// Recorder that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl IntervalEvalRecorder for NoopRecorder {
    fn add_const(&mut self, _oil: &OrderedIntervalList) {}
    fn add_eval(&mut self, _expr: &MatchExpression, _oil: &OrderedIntervalList) {}
    fn add_union(&mut self) {}
    fn add_intersect(&mut self) {}
    fn add_complement(&mut self) {}
}

/// Recipe for rebuilding one field's bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalTree {
    Const(OrderedIntervalList),
    Eval {
        expr: MatchExpression,
        oil: OrderedIntervalList,
    },
    Union(Box<EvalTree>, Box<EvalTree>),
    Intersect(Box<EvalTree>, Box<EvalTree>),
    Complement(Box<EvalTree>),
}

impl EvalTree {
    /// Rebuild the bounds, re-translating every `Eval` node.
    pub fn evaluate(
        &self,
        builder: &IndexBoundsBuilder,
        field: &IndexedField,
        index: &IndexEntry,
    ) -> BoundsResult<OrderedIntervalList> {
        match self {
            EvalTree::Const(oil) => Ok(oil.clone()),
            EvalTree::Eval { expr, .. } => Ok(builder.translate(expr, field, index)?.0),
            EvalTree::Union(lhs, rhs) => {
                let mut out = lhs.evaluate(builder, field, index)?;
                out.intervals
                    .extend(rhs.evaluate(builder, field, index)?.intervals);
                unionize(&mut out)?;
                Ok(out)
            }
            EvalTree::Intersect(lhs, rhs) => {
                let a = lhs.evaluate(builder, field, index)?;
                let mut b = rhs.evaluate(builder, field, index)?;
                intersectize(&a, &mut b)?;
                Ok(b)
            }
            EvalTree::Complement(child) => {
                let mut out = child.evaluate(builder, field, index)?;
                out.complement();
                Ok(out)
            }
        }
    }
}

impl fmt::Display for EvalTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalTree::Const(oil) => write!(f, "(const {})", oil),
            EvalTree::Eval { expr, .. } => write!(f, "(eval {})", expr),
            EvalTree::Union(a, b) => write!(f, "(or {} {})", a, b),
            EvalTree::Intersect(a, b) => write!(f, "(and {} {})", a, b),
            EvalTree::Complement(a) => write!(f, "(not {})", a),
        }
    }
}

/// Stack-based recorder producing an [`EvalTree`].
#[derive(Debug, Default)]
pub struct EvalTreeBuilder {
    stack: Vec<EvalTree>,
    misuse: Option<String>,
}

impl EvalTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn pop_two(&mut self, op: &str) -> Option<(EvalTree, EvalTree)> {
        if self.stack.len() < 2 {
            self.note_misuse(op);
            return None;
        }
        let rhs = self.stack.pop()?;
        let lhs = self.stack.pop()?;
        Some((lhs, rhs))
    }

    fn note_misuse(&mut self, op: &str) {
        if self.misuse.is_none() {
            self.misuse = Some(format!(
                "{} recorded with {} operand(s) on the stack",
                op,
                self.stack.len()
            ));
        }
    }

    /// The finished tree. Fails if a combinator was recorded without enough
    /// operands or if the recording did not reduce to a single tree.
    pub fn finish(mut self) -> BoundsResult<EvalTree> {
        if let Some(misuse) = self.misuse {
            return Err(BoundsError::invariant_violation(misuse));
        }
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(tree), true) => Ok(tree),
            (None, _) => Err(BoundsError::invariant_violation(
                "evaluation tree recorder is empty",
            )),
            (Some(_), false) => Err(BoundsError::invariant_violation(format!(
                "evaluation tree recorder holds {} unconnected trees",
                self.stack.len() + 1
            ))),
        }
    }
}

impl IntervalEvalRecorder for EvalTreeBuilder {
    fn add_const(&mut self, oil: &OrderedIntervalList) {
        self.stack.push(EvalTree::Const(oil.clone()));
    }

    fn add_eval(&mut self, expr: &MatchExpression, oil: &OrderedIntervalList) {
        self.stack.push(EvalTree::Eval {
            expr: expr.clone(),
            oil: oil.clone(),
        });
    }

    fn add_union(&mut self) {
        if let Some((lhs, rhs)) = self.pop_two("union") {
            self.stack.push(EvalTree::Union(Box::new(lhs), Box::new(rhs)));
        }
    }

    fn add_intersect(&mut self) {
        if let Some((lhs, rhs)) = self.pop_two("intersect") {
            self.stack
                .push(EvalTree::Intersect(Box::new(lhs), Box::new(rhs)));
        }
    }

    fn add_complement(&mut self) {
        match self.stack.pop() {
            Some(child) => self.stack.push(EvalTree::Complement(Box::new(child))),
            None => self.note_misuse("complement"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::key::Value;

    fn point(v: i32) -> OrderedIntervalList {
        OrderedIntervalList::with_intervals("a", vec![Interval::point(Value::Int32(v))])
    }

    #[test]
    fn test_builds_tree_in_order() {
        let mut b = EvalTreeBuilder::new();
        b.add_const(&point(1));
        b.add_const(&point(2));
        b.add_union();
        b.add_complement();
        let tree = b.finish().unwrap();
        assert_eq!(
            tree,
            EvalTree::Complement(Box::new(EvalTree::Union(
                Box::new(EvalTree::Const(point(1))),
                Box::new(EvalTree::Const(point(2)))
            )))
        );
        assert_eq!(tree.to_string(), "(not (or (const a: [1, 1]) (const a: [2, 2])))");
    }

    #[test]
    fn test_missing_operand_is_error() {
        let mut b = EvalTreeBuilder::new();
        b.add_const(&point(1));
        b.add_intersect();
        assert!(b.finish().is_err());
    }

    #[test]
    fn test_unconnected_trees_is_error() {
        let mut b = EvalTreeBuilder::new();
        b.add_const(&point(1));
        b.add_const(&point(2));
        assert_eq!(b.depth(), 2);
        assert!(b.finish().is_err());
    }

    #[test]
    fn test_empty_is_error() {
        assert!(EvalTreeBuilder::new().finish().is_err());
    }
}
