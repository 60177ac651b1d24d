//! Hand-written keyword rules applied to every submission, independent of the
//! trained category model.

pub mod priority;
pub mod spam;

pub use priority::assign_priority;
pub use spam::is_spam;
