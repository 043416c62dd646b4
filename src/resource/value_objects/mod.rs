//! Value objects for connector domain primitives.
//!
//! This module contains immutable value objects that encapsulate validation logic
//! for the few domain concepts with real invariants: account identifiers
//! (including conflict sentinels), vendor roles, and secret values.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use smartrecruiters_connector::resource::value_objects::{Role, Uid};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let uid = Uid::new("5a7c3c4ae4b0d4b1c6a2e1f0")?;
//!     println!("Account: {}", uid.as_str());
//!
//!     assert_eq!(Role::strongest(["employee", "STANDARD"]), Some(Role::Standard));
//!     Ok(())
//! }
//! ```
mod guarded_string;
mod role;
mod uid;

pub use guarded_string::GuardedString;
pub use role::Role;
pub use uid::{CONFLICT_MARKER, CONFLICT_SEPARATOR, Uid};
