// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each area has its own subdirectory with value objects, errors and the
// services that enforce its rules. Storage and transport live elsewhere and
// are reached through traits.
//
// ============================================================================

pub mod identity;
pub mod order;
