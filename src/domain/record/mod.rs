//! Request record domain module
//!
//! One [`RequestRecord`] per successfully routed request; records are
//! immutable once appended and only destroyed by an explicit reset.

mod record;

pub use record::{RequestId, RequestRecord};
