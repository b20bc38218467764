// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure for asynchronous, concurrent operations.
//
// Note: Domain logic (order intake, identity resolution) uses plain services,
//       NOT actors. Actors are reserved for infrastructure concerns only.
//
// ============================================================================

mod broadcaster;

pub use broadcaster::{BroadcasterHandle, NotificationBroadcaster};
