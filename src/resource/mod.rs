//! Account model exchanged with the provisioning framework and the vendor.
//!
//! # Key Components
//!
//! * [`attributes`] - Framework attribute bags, object classes and connector objects
//! * [`record`] - Typed SmartRecruiters wire structures
//! * [`mapper`] - Conversion between the two representations
//! * [`value_objects`] - Validated domain primitives (Uid, Role, GuardedString)

pub mod attributes;
pub mod mapper;
pub mod record;
pub mod value_objects;

pub use attributes::{AttributeSet, AttributeValue, ConnectorObject, ObjectClass};
pub use record::{CreateUserRequest, Location, PatchOperation, UserPage, VendorRecord};
pub use value_objects::{GuardedString, Role, Uid};
