pub mod checksum;
pub mod date;
pub mod identity;

pub use checksum::{compute_check_digit, verify_digit};
pub use date::resolve;
pub use identity::{build_identity, failure_messages, verify_fields};
