// crates/osric-kernel-core/src/core/result.rs
// ============================================================================
// Module: Kernel Rule Outcomes
// Description: The tagged result a rule body returns from `execute`.
// Purpose: Carry success/failure data, effect declarations, and chain
// control flags without a boolean success field anywhere in the kernel.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A rule body never constructs [`RuleOutcome`] variants directly; it calls
//! [`create_success_result`] or [`create_failure_result`] to obtain a
//! builder, then finishes the builder to get the tagged value the engine
//! expects. Keeping the union tagged (never a bare boolean) means the
//! engine's chain-control logic in `runtime::engine` can match exhaustively
//! and the compiler catches a missing case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Rule Outcome
// ============================================================================

/// The outcome a rule body returns from `Rule::execute`.
///
/// # Invariants
/// - Constructed only through [`create_success_result`] /
///   [`create_failure_result`] and their builders.
/// - `Failure` implies the chain stops; `stop_chain` on a failure only
///   controls whether the stop is reported as a hard halt versus a
///   suppressed one the caller explicitly asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule applied successfully.
    Success(SuccessOutcome),
    /// The rule reported a failure.
    Failure(FailureOutcome),
}

impl RuleOutcome {
    /// Returns whether the chain should stop after this outcome.
    #[must_use]
    pub fn stops_chain(&self) -> bool {
        match self {
            Self::Success(success) => success.stop_chain,
            Self::Failure(_) => true,
        }
    }

    /// Returns whether this outcome is a critical failure.
    #[must_use]
    pub fn is_critical_failure(&self) -> bool {
        matches!(self, Self::Failure(failure) if failure.critical)
    }
}

/// Data carried by a successful rule outcome.
///
/// # Invariants
/// - `effects_declared` counts effects staged via `GameContext::effects`
///   during this rule's execution; it is informational, not authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessOutcome {
    /// A human-readable description of what the rule did.
    pub message: String,
    /// Arbitrary structured data merged into the command result.
    pub data: Map<String, Value>,
    /// Number of effects this rule staged.
    pub effects_declared: u32,
    /// Damage dealt by this rule, if applicable.
    pub damage: Option<i64>,
    /// Whether the chain should stop after this rule despite success.
    pub stop_chain: bool,
}

/// Data carried by a failed rule outcome.
///
/// # Invariants
/// - A failure always stops the chain; `critical` only changes how the
///   resulting error is reported, never whether execution continues.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureOutcome {
    /// A human-readable description of why the rule failed.
    pub message: String,
    /// Arbitrary structured data describing the failure.
    pub data: Map<String, Value>,
    /// Whether this failure is gameplay-catastrophic.
    pub critical: bool,
    /// Present for symmetry with `SuccessOutcome`; always `true` for a
    /// failure outcome.
    pub stop_chain: bool,
}

// ============================================================================
// SECTION: Success Builder
// ============================================================================

/// Builder for a [`SuccessOutcome`], obtained from [`create_success_result`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SuccessResultBuilder {
    /// The outcome under construction.
    outcome: SuccessOutcome,
}

impl SuccessResultBuilder {
    /// Sets the structured data payload, replacing any previous value.
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.outcome.data = data;
        self
    }

    /// Records how many effects this rule staged.
    pub fn effects_declared(mut self, count: u32) -> Self {
        self.outcome.effects_declared = count;
        self
    }

    /// Records damage dealt by this rule.
    pub fn damage(mut self, damage: i64) -> Self {
        self.outcome.damage = Some(damage);
        self
    }

    /// Marks this success as stopping the rule chain.
    pub fn stop_chain(mut self, stop_chain: bool) -> Self {
        self.outcome.stop_chain = stop_chain;
        self
    }

    /// Finishes the builder, producing a [`RuleOutcome::Success`].
    pub fn build(self) -> RuleOutcome {
        RuleOutcome::Success(self.outcome)
    }
}

/// Starts building a successful [`RuleOutcome`] with the given message.
#[must_use]
pub fn create_success_result(message: impl Into<String>) -> SuccessResultBuilder {
    SuccessResultBuilder {
        outcome: SuccessOutcome {
            message: message.into(),
            data: Map::new(),
            effects_declared: 0,
            damage: None,
            stop_chain: false,
        },
    }
}

// ============================================================================
// SECTION: Failure Builder
// ============================================================================

/// Builder for a [`FailureOutcome`], obtained from [`create_failure_result`].
#[derive(Debug, Clone)]
#[must_use]
pub struct FailureResultBuilder {
    /// The outcome under construction.
    outcome: FailureOutcome,
}

impl FailureResultBuilder {
    /// Sets the structured data payload, replacing any previous value.
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.outcome.data = data;
        self
    }

    /// Marks this failure as gameplay-catastrophic.
    pub fn critical(mut self, critical: bool) -> Self {
        self.outcome.critical = critical;
        self
    }

    /// Finishes the builder, producing a [`RuleOutcome::Failure`].
    pub fn build(self) -> RuleOutcome {
        RuleOutcome::Failure(self.outcome)
    }
}

/// Starts building a failed [`RuleOutcome`] with the given message.
///
/// The resulting failure always stops the chain; use [`FailureResultBuilder::critical`]
/// to mark it gameplay-catastrophic.
#[must_use]
pub fn create_failure_result(message: impl Into<String>) -> FailureResultBuilder {
    FailureResultBuilder {
        outcome: FailureOutcome {
            message: message.into(),
            data: Map::new(),
            critical: false,
            stop_chain: true,
        },
    }
}
