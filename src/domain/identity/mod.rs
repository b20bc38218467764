// ============================================================================
// Identity Domain - Account references and display identities
// ============================================================================
//
// Credential handling lives outside this service; the order pipeline only
// needs to turn a customer reference into a name to print on the order.
//
// ============================================================================

pub mod value_objects;
pub mod resolver;

pub use value_objects::*;
pub use resolver::*;
