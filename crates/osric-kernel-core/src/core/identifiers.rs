// crates/osric-kernel-core/src/core/identifiers.rs
// ============================================================================
// Module: Kernel Identifiers
// Description: Branded entity identifiers for the kernel's entity store.
// Purpose: Provide opaque, strongly typed identifiers with a plain-string
// wire form, per the IdentityTags component.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identity tags are a small closed set of entity kinds. Each kind has a
//! brand (a string prefix), a constructor that attaches the brand to a raw
//! string, and a predicate that checks brand presence without allocating.
//! The kernel never compares identifiers by anything other than equality;
//! predicates exist only for runtime validation at boundaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Entity Kind
// ============================================================================

/// The closed set of entity kinds the kernel brands identifiers with.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
/// - The kernel does not interpret any kind beyond its brand string; rule
///   bodies decide what a `Character`, `Monster`, `Item`, or `Spell`
///   actually contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A player or non-player character.
    Character,
    /// A monster or creature entity.
    Monster,
    /// An item, piece of equipment, or treasure entity.
    Item,
    /// A spell or spell-like ability entity.
    Spell,
}

impl EntityKind {
    /// Returns the brand prefix used in the wire form of identifiers of
    /// this kind.
    #[must_use]
    pub const fn brand(self) -> &'static str {
        match self {
            Self::Character => "char",
            Self::Monster => "mon",
            Self::Item => "item",
            Self::Spell => "spell",
        }
    }

    /// Resolves a brand prefix back into an [`EntityKind`], if it matches
    /// one of the closed set of kinds.
    #[must_use]
    pub fn from_brand(brand: &str) -> Option<Self> {
        match brand {
            "char" => Some(Self::Character),
            "mon" => Some(Self::Monster),
            "item" => Some(Self::Item),
            "spell" => Some(Self::Spell),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.brand())
    }
}

// ============================================================================
// SECTION: Entity Identifier
// ============================================================================

/// Opaque, branded identifier for an entity held in a [`GameContext`].
///
/// The wire form is a plain string of the shape `"{brand}-{raw}"` (for
/// example `"char-Hero"`). The brand exists for compile-time and
/// runtime type safety in the host language; on the wire the identifier is
/// just a string.
///
/// [`GameContext`]: crate::runtime::GameContext
///
/// # Invariants
/// - Two identifiers are equal if and only if their wire strings are equal.
/// - `mint` never fails; `raw` is not validated beyond being a `String`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Mints a new identifier by attaching `kind`'s brand to `raw`.
    #[must_use]
    pub fn mint(kind: EntityKind, raw: impl Into<String>) -> Self {
        Self(format!("{}-{}", kind.brand(), raw.into()))
    }

    /// Wraps an already-branded wire string without re-minting it.
    ///
    /// Used when an identifier arrives from storage or from a caller that
    /// already produced the `"{brand}-{raw}"` form.
    #[must_use]
    pub fn from_wire(wire: impl Into<String>) -> Self {
        Self(wire.into())
    }

    /// Returns the identifier's wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the branded kind of this identifier, if its wire form
    /// begins with one of the closed set of brand prefixes.
    #[must_use]
    pub fn kind(&self) -> Option<EntityKind> {
        let (brand, rest) = self.0.split_once('-')?;
        let kind = EntityKind::from_brand(brand)?;
        (!rest.is_empty()).then_some(kind)
    }

    /// Tests brand membership without allocating.
    #[must_use]
    pub fn is_kind(&self, kind: EntityKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::from_wire(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::from_wire(value)
    }
}
