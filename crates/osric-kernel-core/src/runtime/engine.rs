// crates/osric-kernel-core/src/runtime/engine.rs
// ============================================================================
// Module: Kernel Rule Engine
// Description: Registration, deterministic ordering, and transactional
// execution of host-supplied rules.
// Purpose: Provide the single canonical path every command runs through.
// Dependencies: crate::{core, interfaces, runtime}, std::{cell, panic, sync}
// ============================================================================

//! ## Overview
//! The engine is the kernel's single canonical execution path. Rules and
//! commands are registered through [`EngineBuilder`] before the engine is
//! built; [`Engine::start`] validates the full registered rule graph once
//! (duplicate names, unknown prerequisites, cycles); [`Engine::execute`]
//! then runs every command through the same
//! `Validating → Ordering → Executing → (Committing | RollingBack)`
//! sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::command::Command;
use crate::core::effect::Effect;
use crate::core::effect::EffectEnvelope;
use crate::core::entity::Entity;
use crate::core::identifiers::EntityId;
use crate::core::result::RuleOutcome;
use crate::interfaces::Rule;
use crate::runtime::context::GameContext;
use crate::runtime::ordering::OrderingError;
use crate::runtime::ordering::RuleNode;
use crate::runtime::ordering::filter_to_candidates;
use crate::runtime::ordering::topological_order;

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Configuration for an [`Engine`].
///
/// # Invariants
/// - `seed` of `None` means the engine derives a seed from host time at
///   construction, which makes that engine's runs non-deterministic
///   across process restarts; callers that need reproducibility must
///   supply a seed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the engine's deterministic RNG. `None` derives one from
    /// host time, sampled once at construction.
    pub seed: Option<u64>,
    /// Whether the temporary workspace is cleared at the start of every
    /// command. Defaults to `true`.
    pub clear_temporary: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            clear_temporary: true,
        }
    }
}

impl EngineConfig {
    /// Resolves this configuration's seed, deriving one from host time if
    /// none was supplied.
    fn resolve_seed(self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |duration| u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned from engine construction and command execution.
///
/// Each variant corresponds to one of the kernel's public error codes.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - No variant embeds a Rust backtrace or panic payload; those are
///   logged at the engine boundary and never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Caller-supplied parameters failed validation, or the command type
    /// is not registered with the engine.
    #[error("validation failed: {message}")]
    ValidationFailed {
        /// Human-readable description of the validation failure.
        message: String,
        /// Optional structured details about the failure.
        details: Option<Value>,
    },
    /// A command referenced an entity that is not in the context's
    /// entity store.
    #[error("entity not found: {entity_id}")]
    EntityNotFound {
        /// The wire form of the missing entity identifier.
        entity_id: String,
    },
    /// The registered rule graph is misconfigured: a duplicate name, an
    /// unknown prerequisite, or a prerequisite cycle.
    #[error("rule configuration error: {message}")]
    RuleConfig {
        /// Human-readable description of the configuration error.
        message: String,
    },
    /// A rule reported a failure for this command.
    #[error("rule '{rule_name}' failed: {message}")]
    RuleFailure {
        /// The name of the rule that reported the failure.
        rule_name: String,
        /// The rule's failure message.
        message: String,
        /// The rule's failure data.
        data: Map<String, Value>,
        /// Whether the failure is gameplay-catastrophic.
        critical: bool,
    },
    /// A rule body panicked during execution.
    #[error("rule '{rule_name}' panicked during execution")]
    RuleException {
        /// The name of the rule that panicked.
        rule_name: String,
    },
    /// No rule applied to this command.
    #[error("no applicable rules for command type '{command_type}'")]
    NoApplicableRules {
        /// The command type that had no applicable rules.
        command_type: String,
    },
}

impl EngineError {
    /// Returns the stable error code for this variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed {
                ..
            } => "VALIDATION_FAILED",
            Self::EntityNotFound {
                ..
            } => "ENTITY_NOT_FOUND",
            Self::RuleConfig {
                ..
            } => "RULE_CONFIG",
            Self::RuleFailure {
                ..
            } => "RULE_FAILURE",
            Self::RuleException {
                ..
            } => "RULE_EXCEPTION",
            Self::NoApplicableRules {
                ..
            } => "NO_APPLICABLE_RULES",
        }
    }
}

impl From<OrderingError> for EngineError {
    fn from(error: OrderingError) -> Self {
        Self::RuleConfig {
            message: error.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Command Result
// ============================================================================

/// The structured data returned when a command completes successfully.
///
/// # Invariants
/// - `rule_order` reflects the exact sequence of rules the engine walked,
///   including rules skipped by `can_apply`.
/// - `effects` is the committed envelope's effects, in staging order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSuccess {
    /// Merged structured data from every successful rule, last writer
    /// wins by key.
    pub data: Map<String, Value>,
    /// The deterministic rule order resolved for this command.
    pub rule_order: Vec<String>,
    /// The effects committed for this command.
    pub effects: Vec<Effect>,
}

/// The result of [`Engine::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// The command completed successfully and its effects were committed.
    Ok(CommandSuccess),
    /// The command failed; no effects were committed.
    Err(EngineError),
}

// ============================================================================
// SECTION: Rule & Command Registration
// ============================================================================

/// One registered rule and its scheduling metadata.
struct RuleRegistration {
    /// The rule's registry name.
    name: String,
    /// The rule's scheduling priority.
    priority: i32,
    /// Names of rules that must precede this one.
    prerequisites: Vec<String>,
    /// The rule implementation.
    rule: Box<dyn Rule>,
}

/// A parameter validator for a registered command type.
type ParamValidator = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// One registered command type's binding to the rules it requires.
struct CommandBinding {
    /// Rule names that must always be included in this command's chain,
    /// regardless of `can_apply`.
    required_rules: Vec<String>,
    /// Optional validator run against caller-supplied parameters before
    /// any rule executes.
    validator: Option<ParamValidator>,
}

// ============================================================================
// SECTION: Engine Builder
// ============================================================================

/// Builder for an [`Engine`]. Collects rule and command registrations
/// before the rule graph is validated at [`Engine::start`].
#[must_use]
pub struct EngineBuilder {
    /// Rules registered so far, in registration order.
    rules: Vec<RuleRegistration>,
    /// Command type bindings registered so far.
    commands: HashMap<String, CommandBinding>,
    /// Engine configuration.
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new, empty builder with default configuration.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            commands: HashMap::new(),
            config: EngineConfig::default(),
        }
    }

    /// Sets the engine configuration, replacing the default.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a rule implementation.
    ///
    /// Duplicate rule names are not rejected here; they are caught as a
    /// fatal `RULE_CONFIG` error at [`Engine::start`].
    pub fn register_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(RuleRegistration {
            name: rule.name().to_string(),
            priority: rule.priority(),
            prerequisites: rule.prerequisites().to_vec(),
            rule: Box::new(rule),
        });
        self
    }

    /// Registers a command type, binding it to the rule names that must
    /// always run for it and an optional parameter validator.
    pub fn register_command(
        mut self,
        command_type: impl Into<String>,
        required_rules: Vec<String>,
        validator: Option<ParamValidator>,
    ) -> Self {
        self.commands.insert(
            command_type.into(),
            CommandBinding {
                required_rules,
                validator,
            },
        );
        self
    }

    /// Finishes the builder, producing an unstarted [`Engine`].
    pub fn build(self) -> Engine {
        let seed = self.config.resolve_seed();
        let state = Arc::new_cyclic(|weak| EngineState {
            config: self.config,
            rules: self.rules,
            commands: self.commands,
            context: RefCell::new(GameContext::new(seed, weak.clone())),
            global_order: RefCell::new(None),
            started: Cell::new(false),
        });
        Engine {
            state,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Engine State
// ============================================================================

/// The shared state behind an [`Engine`] and every [`EngineHandle`]
/// derived from it.
pub(crate) struct EngineState {
    /// Engine configuration.
    config: EngineConfig,
    /// Registered rules, in registration order.
    rules: Vec<RuleRegistration>,
    /// Registered command bindings, by command type.
    commands: HashMap<String, CommandBinding>,
    /// The engine's single game context.
    context: RefCell<GameContext>,
    /// The validated global rule order, populated by `start()`.
    global_order: RefCell<Option<Vec<String>>>,
    /// Whether `start()` has completed successfully.
    started: Cell<bool>,
}

impl EngineState {
    /// Validates the registered rule graph and computes the global order.
    fn start(&self) -> Result<(), EngineError> {
        if self.started.get() {
            return Ok(());
        }

        let mut seen_names = HashSet::with_capacity(self.rules.len());
        for registration in &self.rules {
            if !seen_names.insert(registration.name.as_str()) {
                return Err(EngineError::RuleConfig {
                    message: format!("duplicate rule name '{}'", registration.name),
                });
            }
        }

        let nodes: Vec<RuleNode> = self
            .rules
            .iter()
            .map(|registration| RuleNode {
                name: registration.name.clone(),
                priority: registration.priority,
                prerequisites: registration.prerequisites.clone(),
            })
            .collect();
        let order = topological_order(&nodes)?;

        *self.global_order.borrow_mut() = Some(order);
        self.started.set(true);
        Ok(())
    }

    /// Executes one command through the full validate/order/execute/commit
    /// sequence.
    fn execute(&self, command_type: &str, parameters: Value) -> CommandResult {
        if !self.started.get() {
            return CommandResult::Err(EngineError::RuleConfig {
                message: "engine not started; call start() before execute()".to_string(),
            });
        }

        let Ok(mut context) = self.context.try_borrow_mut() else {
            tracing::error!(command_type, "reentrant engine execution attempt rejected");
            return CommandResult::Err(EngineError::RuleException {
                rule_name: "<reentrant-call>".to_string(),
            });
        };

        // The temporary workspace is reset at the start of every command,
        // including ones that go on to fail validation, so the next
        // command always starts from a clean slate.
        if self.config.clear_temporary {
            context.clear_temporary();
        }

        let Some(binding) = self.commands.get(command_type) else {
            return CommandResult::Err(EngineError::ValidationFailed {
                message: format!("unregistered command type '{command_type}'"),
                details: None,
            });
        };

        if let Some(validator) = &binding.validator {
            if let Err(message) = validator(&parameters) {
                return CommandResult::Err(EngineError::ValidationFailed {
                    message,
                    details: Some(parameters),
                });
            }
        }

        let (actor_id, target_ids) = extract_actor_and_targets(&parameters);
        if let Some(missing) = first_missing_entity(&context, actor_id.as_ref(), &target_ids) {
            return CommandResult::Err(EngineError::EntityNotFound {
                entity_id: missing.as_str().to_string(),
            });
        }

        context.open_effect_buffer();

        let mut command = Command::new(command_type.to_string(), parameters);
        if let Some(actor_id) = actor_id {
            command = command.with_actor(actor_id);
        }
        command = command.with_targets(target_ids);

        let mut candidates: HashSet<String> = binding.required_rules.iter().cloned().collect();
        for registration in &self.rules {
            if registration.rule.can_apply(&context, &command) {
                candidates.insert(registration.name.clone());
            }
        }

        let global_order_guard = self.global_order.borrow();
        let global_order = global_order_guard.as_ref().map(Vec::as_slice).unwrap_or(&[]);
        let rule_order = filter_to_candidates(global_order, &candidates);
        drop(global_order_guard);

        if rule_order.is_empty() {
            context.discard_effect_buffer();
            return CommandResult::Err(EngineError::NoApplicableRules {
                command_type: command_type.to_string(),
            });
        }

        let mut merged_data = Map::new();

        for rule_name in &rule_order {
            let Some(registration) = self.rules.iter().find(|r| &r.name == rule_name) else {
                continue;
            };

            if !registration.rule.can_apply(&context, &command) {
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                registration.rule.execute(&mut context, &command)
            }));

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    tracing::error!(
                        rule = registration.name.as_str(),
                        panic = panic_message(&payload),
                        "rule body panicked"
                    );
                    context.discard_effect_buffer();
                    return CommandResult::Err(EngineError::RuleException {
                        rule_name: registration.name.clone(),
                    });
                }
            };

            match outcome {
                RuleOutcome::Success(success) => {
                    merged_data.extend(success.data);
                    if success.stop_chain {
                        break;
                    }
                }
                RuleOutcome::Failure(failure) => {
                    tracing::warn!(
                        rule = registration.name.as_str(),
                        critical = failure.critical,
                        "rule reported failure"
                    );
                    context.discard_effect_buffer();
                    return CommandResult::Err(EngineError::RuleFailure {
                        rule_name: registration.name.clone(),
                        message: failure.message,
                        data: failure.data,
                        critical: failure.critical,
                    });
                }
            }
        }

        let effects = context.commit_effect_buffer(command_type);
        CommandResult::Ok(CommandSuccess {
            data: merged_data,
            rule_order,
            effects,
        })
    }
}

/// Pulls the caller-conventional `actorId` / `targetIds` fields out of a
/// command's raw parameters, if present.
///
/// The kernel does not mandate a parameter schema beyond this convention:
/// a command type that needs no actor or targets simply omits these keys.
/// `actorId` is a plain string; `targetIds` is an array of strings. Any
/// other shape is treated as "absent" rather than a validation error — a
/// command's own validator is responsible for rejecting a malformed shape
/// if the command type requires one.
fn extract_actor_and_targets(parameters: &Value) -> (Option<EntityId>, Vec<EntityId>) {
    let actor_id = parameters.get("actorId").and_then(Value::as_str).map(EntityId::from_wire);
    let target_ids = parameters
        .get("targetIds")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).map(EntityId::from_wire).collect())
        .unwrap_or_default();
    (actor_id, target_ids)
}

/// Returns the first of `actor_id` and `target_ids` not present in
/// `context`'s entity store, if any.
fn first_missing_entity<'a>(
    context: &GameContext,
    actor_id: Option<&'a EntityId>,
    target_ids: &'a [EntityId],
) -> Option<&'a EntityId> {
    actor_id
        .into_iter()
        .chain(target_ids.iter())
        .find(|id| !context.has_entity(id))
}

/// Extracts a human-readable message from a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// The rule orchestration engine.
///
/// Construct one through [`EngineBuilder`] (`Engine::builder()`), call
/// [`Engine::start`] once, then dispatch commands through
/// [`Engine::execute`]. An `Engine` is single-threaded: it owns one
/// [`GameContext`] and serializes command execution by borrowing that
/// context mutably for the duration of one command at a time.
#[derive(Clone)]
pub struct Engine {
    /// The engine's shared state.
    state: Arc<EngineState>,
}

impl Engine {
    /// Returns a new [`EngineBuilder`].
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Creates an engine directly from a configuration, with no rules or
    /// commands registered.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        EngineBuilder::new().with_config(config).build()
    }

    /// Validates the registered rule graph and computes the deterministic
    /// global rule order. Idempotent: calling it again after a successful
    /// call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RuleConfig`] if any two rules share a name,
    /// a rule lists an unknown prerequisite, or the prerequisite graph
    /// contains a cycle.
    pub fn start(&self) -> Result<(), EngineError> {
        self.state.start()
    }

    /// Executes `command_type` with `parameters` against the engine's
    /// game context.
    pub fn execute(&self, command_type: &str, parameters: Value) -> CommandResult {
        self.state.execute(command_type, parameters)
    }

    /// Returns a handle to this engine suitable for storing in contexts
    /// or passing to rule bodies that need to look up engine state.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::from_state(Arc::clone(&self.state))
    }

    /// Returns a clone of the authoritative, append-only log of committed
    /// effect envelopes accumulated across every command this engine has
    /// run to completion.
    ///
    /// # Panics
    ///
    /// Panics if called while a command is currently executing on this
    /// engine (for example, from within a rule body's own thread of
    /// execution); ordinary hosts call this between `execute` calls.
    #[must_use]
    pub fn events(&self) -> Vec<EffectEnvelope> {
        self.state.context.borrow().events().to_vec()
    }

    /// Inserts or replaces an entity in the engine's game context ahead of
    /// command execution, for hosts that need to establish initial world
    /// state (for example, a pre-existing character) before the first
    /// command runs.
    ///
    /// # Panics
    ///
    /// Panics if called while a command is currently executing on this
    /// engine; ordinary hosts call this before `start` or between
    /// `execute` calls.
    pub fn seed_entity(&self, entity: Box<dyn Entity>) {
        self.state.context.borrow_mut().set_entity(entity);
    }

    /// Returns `true` if an entity with `id` is present in the engine's
    /// game context.
    ///
    /// # Panics
    ///
    /// Panics if called while a command is currently executing on this
    /// engine.
    #[must_use]
    pub fn has_entity(&self, id: &EntityId) -> bool {
        self.state.context.borrow().has_entity(id)
    }
}

// ============================================================================
// SECTION: Engine Handle
// ============================================================================

/// A handle to a running engine's shared state, obtained from
/// [`GameContext::rule_engine`] or [`Engine::handle`].
///
/// Exists so rule bodies and hosts holding only a context can still ask
/// "what engine am I running under" without the kernel creating an
/// ownership cycle between [`GameContext`] and [`Engine`]: the context
/// stores only a `Weak` reference and upgrades it into a handle on
/// demand.
#[derive(Clone)]
pub struct EngineHandle {
    /// The engine's shared state.
    state: Arc<EngineState>,
}

impl EngineHandle {
    /// Wraps shared engine state into a handle.
    pub(crate) fn from_state(state: Arc<EngineState>) -> Self {
        Self {
            state,
        }
    }

    /// Executes `command_type` with `parameters` against the engine this
    /// handle points to.
    ///
    /// Calling this from within a rule body that is itself executing on
    /// the same engine is a reentrant call; the context's mutable borrow
    /// is already held, so it resolves to
    /// [`EngineError::RuleException`] rather than deadlocking or
    /// panicking.
    pub fn execute(&self, command_type: &str, parameters: Value) -> CommandResult {
        self.state.execute(command_type, parameters)
    }
}
