// Application layer - use cases and orchestration.
// The service owns an injected ledger store; transports hand it raw messages
// and print whatever it replies.

pub mod error;
pub mod reporting;
pub mod router;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use router::*;
pub use service::*;
