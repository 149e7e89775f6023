// crates/osric-kernel-core/examples/minimal.rs
// ============================================================================
// Module: Kernel Minimal Example
// Description: Minimal end-to-end command run using one demonstration rule.
// Purpose: Demonstrate registration, start, and execute.
// Dependencies: osric-kernel-core
// ============================================================================

//! ## Overview
//! Registers a single rule against a `gain-experience` command and runs it
//! once. This example is not OSRIC rule content; it exists only to show
//! the registration and execution shape.

use osric_kernel_core::Command;
use osric_kernel_core::CommandResult;
use osric_kernel_core::Engine;
use osric_kernel_core::EngineConfig;
use osric_kernel_core::EntityId;
use osric_kernel_core::EntityKind;
use osric_kernel_core::GameContext;
use osric_kernel_core::Rule;
use osric_kernel_core::RuleOutcome;
use osric_kernel_core::create_success_result;
use serde_json::json;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Awards a flat amount of experience to the actor named in the command
/// parameters.
struct GainExperienceRule;

impl Rule for GainExperienceRule {
    fn name(&self) -> &str {
        "gain-experience"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn prerequisites(&self) -> &[String] {
        &[]
    }

    fn can_apply(&self, _context: &GameContext, _command: &Command) -> bool {
        true
    }

    fn execute(&self, context: &mut GameContext, command: &Command) -> RuleOutcome {
        let amount = command.parameters().get("amount").and_then(serde_json::Value::as_i64).unwrap_or(0);
        let target = EntityId::mint(EntityKind::Character, "Hero");
        context.effects("gain-experience").add("xp-awarded", target, json!({ "amount": amount }));
        create_success_result(format!("awarded {amount} experience")).build()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::builder()
        .with_config(EngineConfig {
            seed: Some(42),
            clear_temporary: true,
        })
        .register_rule(GainExperienceRule)
        .register_command("gain-experience", vec!["gain-experience".to_string()], None)
        .build();

    engine.start()?;

    match engine.execute("gain-experience", json!({ "amount": 250 })) {
        CommandResult::Ok(success) => {
            assert_eq!(success.rule_order, vec!["gain-experience".to_string()]);
            Ok(())
        }
        CommandResult::Err(error) => Err(Box::new(ExampleError(error.code()))),
    }
}
