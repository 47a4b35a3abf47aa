//! Common error infrastructure for skill-core.
//!
//! This module provides shared types and traits used across all error types in skill-core.
//! Domain-specific errors (e.g., `DefinitionError`, `SkillError`) are defined in their
//! respective modules alongside the operations that produce them.
//!
//! # Design Principles
//!
//! - **Local failures**: Every error is scoped to one cast, session or projectile
//! - **Rich Context**: Errors include caster, position, and frame for debugging
//! - **Severity Classification**: Errors are categorized for recovery strategies

use glam::Vec2;

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The cast had no effect, but retrying later may succeed
/// - **Validation**: The skill data itself is wrong and must be fixed
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: A required collaborator is missing; nothing can be resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the cast may succeed on a later frame.
    ///
    /// Examples: no target in range, target died before the tick
    Recoverable,

    /// Validation error - invalid data, should not retry without changes.
    ///
    /// Examples: projectile skill without a prefab, zero tick interval
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the engine cannot resolve anything.
    ///
    /// Examples: spatial query provider not wired into the environment
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or missing wiring.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
///
/// Context is captured at the point of error creation and includes the cast
/// that failed so log lines can be correlated with a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorContext {
    /// Caster that triggered the error (if applicable).
    pub caster: Option<EntityId>,

    /// World position where the error occurred (if applicable).
    pub position: Option<Vec2>,

    /// Engine frame at the time of error.
    pub frame: u64,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given frame.
    #[must_use]
    pub const fn new(frame: u64) -> Self {
        Self {
            caster: None,
            position: None,
            frame,
            message: None,
        }
    }

    /// Attaches a caster to this context (builder pattern).
    #[must_use]
    pub const fn with_caster(mut self, caster: EntityId) -> Self {
        self.caster = Some(caster);
        self
    }

    /// Attaches a position to this context (builder pattern).
    #[must_use]
    pub const fn with_position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all skill-core errors.
///
/// This trait provides a uniform interface for error classification and context
/// retrieval across all error types in the crate.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
