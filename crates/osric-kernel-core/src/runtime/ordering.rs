// crates/osric-kernel-core/src/runtime/ordering.rs
// ============================================================================
// Module: Kernel Rule Ordering
// Description: Deterministic topological ordering of registered rules.
// Purpose: Resolve a stable execution order from prerequisite
// relationships, with ties broken by priority then registration order.
// Dependencies: std::collections
// ============================================================================

//! ## Overview
//! Rule ordering happens in two passes. At `start()`, [`topological_order`]
//! walks the *entire* registered rule graph once: this is where an unknown
//! prerequisite name or a dependency cycle is caught, before any command
//! ever runs. The result is a single deterministic global order. At
//! execute time, the engine does not re-run the topological sort; it
//! simply filters that global order down to the rules relevant to one
//! command (the union of the command's required rules and whichever
//! registered rules' `can_apply` returned true), which preserves a valid
//! topological order over the subset for free.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving the registered rule graph into an order.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// A rule listed a prerequisite that is not a registered rule name.
    #[error("rule '{rule}' lists unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite {
        /// The rule that listed the unknown prerequisite.
        rule: String,
        /// The prerequisite name that does not match any registered rule.
        prerequisite: String,
    },
    /// The prerequisite graph contains a cycle.
    #[error("rule prerequisite graph contains a cycle")]
    Cycle,
}

// ============================================================================
// SECTION: Rule Node
// ============================================================================

/// The minimal shape [`topological_order`] needs from a registered rule.
#[derive(Debug, Clone)]
pub(crate) struct RuleNode {
    /// The rule's registry name.
    pub(crate) name: String,
    /// The rule's scheduling priority; lower runs earlier among ties.
    pub(crate) priority: i32,
    /// Names of rules that must precede this one.
    pub(crate) prerequisites: Vec<String>,
}

// ============================================================================
// SECTION: Topological Order
// ============================================================================

/// Computes a deterministic topological order over every registered rule.
///
/// At every step, of all rules whose prerequisites have already been
/// scheduled, the one with the lowest `priority` runs next; ties within
/// that ready set are broken by ascending registration order (the order
/// `nodes` was given in). This picks one rule at a time rather than one
/// dependency "level" at a time, so a rule that only becomes ready after
/// an earlier pick still competes on priority against every other rule
/// that was already ready, not just the ones that became ready alongside it.
///
/// # Errors
///
/// Returns [`OrderingError::UnknownPrerequisite`] if any rule names a
/// prerequisite that is not itself a registered rule, and
/// [`OrderingError::Cycle`] if the prerequisite graph is not acyclic.
pub(crate) fn topological_order(nodes: &[RuleNode]) -> Result<Vec<String>, OrderingError> {
    let index_of: HashMap<&str, usize> =
        nodes.iter().enumerate().map(|(index, node)| (node.name.as_str(), index)).collect();

    for node in nodes {
        for prerequisite in &node.prerequisites {
            if !index_of.contains_key(prerequisite.as_str()) {
                return Err(OrderingError::UnknownPrerequisite {
                    rule: node.name.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    let mut in_degree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        in_degree[index] = node.prerequisites.len();
        for prerequisite in &node.prerequisites {
            let prerequisite_index = index_of[prerequisite.as_str()];
            dependents[prerequisite_index].push(index);
        }
    }

    // `ready` holds every node with no unscheduled prerequisite, keyed by
    // `(priority, index)` so its natural ascending order is exactly the
    // tie-break rule. Picking one node at a time and immediately folding
    // its freshly-ready dependents back into the same set (rather than
    // scheduling a whole in-degree-zero "level" before looking at the
    // next one) lets a newly-unblocked node compete on priority against
    // nodes that were already ready, even though it became ready later.
    let mut ready: BTreeSet<(i32, usize)> = (0 .. nodes.len())
        .filter(|&index| in_degree[index] == 0)
        .map(|index| (nodes[index].priority, index))
        .collect();
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = HashSet::with_capacity(nodes.len());

    while let Some(&(priority, index)) = ready.iter().next() {
        ready.remove(&(priority, index));
        order.push(nodes[index].name.clone());
        visited.insert(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert((nodes[dependent].priority, dependent));
            }
        }
    }

    if visited.len() != nodes.len() {
        return Err(OrderingError::Cycle);
    }

    Ok(order)
}

// ============================================================================
// SECTION: Candidate Filtering
// ============================================================================

/// Filters a precomputed global order down to `candidates`, preserving
/// relative order. The result is a valid topological order over the
/// subset because any edge between two candidates is also an edge in the
/// global order.
pub(crate) fn filter_to_candidates(
    global_order: &[String],
    candidates: &HashSet<String>,
) -> Vec<String> {
    global_order.iter().filter(|name| candidates.contains(name.as_str())).cloned().collect()
}
