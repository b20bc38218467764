// ============================================================================
// Order Domain - Intake of print orders
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderItem, Document, OrderStatus)
// - Commands (SubmitOrder and envelope parsing)
// - Item normalization
// - Events and the notifier seam (OrderEvent, OrderNotifier)
// - Errors (OrderError)
// - Aggregate (Order, OrderDraft)
// - Intake orchestration (OrderIntake)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod normalizer;
pub mod events;
pub mod errors;
pub mod aggregate;
pub mod intake;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;
pub use intake::*;
