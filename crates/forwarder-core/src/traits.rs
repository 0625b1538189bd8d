//! Core traits shared by entities and infrastructure.

use crate::Audit;

/// Trait for entities with a unique identifier.
pub trait Entity {
    /// Identifier type (UUID for tenant tables, a code for reference tables).
    type Id;

    /// Returns the entity's identifier.
    fn id(&self) -> &Self::Id;

    /// Assigns a fresh identifier when the current one is unset.
    ///
    /// Returns `true` when an identifier was generated, i.e. the entity has
    /// never been persisted.
    fn ensure_id(&mut self) -> bool;
}

/// Entities carrying creation/modification metadata.
pub trait Auditable {
    /// Returns the audit metadata.
    fn audit(&self) -> &Audit;

    /// Returns the audit metadata for stamping.
    fn audit_mut(&mut self) -> &mut Audit;
}
