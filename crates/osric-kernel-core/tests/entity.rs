// crates/osric-kernel-core/tests/entity.rs
// ============================================================================
// Module: Entity Contract Tests
// Description: Tests for the opaque entity trait's downcast behavior.
// ============================================================================

//! ## Overview
//! Validates that a concrete entity type stored behind `Box<dyn Entity>`
//! round-trips through the `Any` downcast the entity store relies on.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

use std::any::Any;

use osric_kernel_core::Entity;
use osric_kernel_core::EntityId;
use osric_kernel_core::EntityKind;

#[derive(Debug)]
struct Dummy {
    id: EntityId,
    hit_points: i32,
}

impl Entity for Dummy {
    fn id(&self) -> EntityId {
        self.id.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn downcast_round_trips() {
    let dummy: Box<dyn Entity> = Box::new(Dummy {
        id: EntityId::mint(EntityKind::Character, "Hero"),
        hit_points: 12,
    });

    let downcast = dummy.as_any().downcast_ref::<Dummy>();
    assert!(downcast.is_some());
    assert_eq!(downcast.map(|d| d.hit_points), Some(12));
}

#[test]
fn downcast_fails_for_wrong_type() {
    #[derive(Debug)]
    struct OtherDummy {
        id: EntityId,
    }

    impl Entity for OtherDummy {
        fn id(&self) -> EntityId {
            self.id.clone()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    let other: Box<dyn Entity> = Box::new(OtherDummy {
        id: EntityId::mint(EntityKind::Monster, "Orc"),
    });

    assert!(other.as_any().downcast_ref::<Dummy>().is_none());
}
