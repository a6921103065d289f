use std::collections::{HashMap, HashSet};

use crate::ir::{DependencyEdge, Step, StepId};

/// Resolves every `depends_on` reference into an edge.
///
/// A reference is matched against step ids first and step indexes second; a
/// value that matches neither is dropped. When a value is both some step's id
/// and another step's index, the id wins. Duplicate ids or indexes resolve to
/// the first step carrying them. Repeated `(source, target)` pairs collapse to
/// a single edge, kept in first-seen order.
pub fn resolve_dependencies(steps: &[Step]) -> Vec<DependencyEdge> {
    let mut by_id: HashMap<StepId, StepId> = HashMap::new();
    let mut by_index: HashMap<i64, StepId> = HashMap::new();
    for step in steps {
        by_id.entry(step.id).or_insert(step.id);
        by_index.entry(step.step_index).or_insert(step.id);
    }

    let mut seen: HashSet<DependencyEdge> = HashSet::new();
    let mut edges = Vec::new();
    for step in steps {
        for reference in &step.depends_on {
            let Some(&source) = by_id.get(reference).or_else(|| by_index.get(reference)) else {
                continue;
            };
            let edge = DependencyEdge::new(source, step.id);
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}
