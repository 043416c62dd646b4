//! Schema declared to the provisioning framework.
//!
//! The connector supports a single object class, `__ACCOUNT__`. Location fields
//! and the `emailConflict` flag are not returned by default and must be asked
//! for explicitly.
//!
//! # Examples
//!
//! ```rust
//! use smartrecruiters_connector::schema::{account_object_class, Mutability};
//!
//! let account = account_object_class();
//! let password = account.attribute("__PASSWORD__").unwrap();
//! assert_eq!(password.mutability, Mutability::WriteOnly);
//! assert!(!account.returned_by_default().contains(&"city"));
//! ```

pub mod types;

pub use types::{AttributeInfo, AttributeType, Mutability, ObjectClassInfo};

use crate::resource::attributes::{self, LOCATION_FIELDS};

/// The `__ACCOUNT__` object class.
pub fn account_object_class() -> ObjectClassInfo {
    let mut attrs = vec![
        AttributeInfo::string(attributes::UID).with_mutability(Mutability::ReadOnly),
        AttributeInfo::string(attributes::NAME).required(),
        AttributeInfo::string(attributes::FIRST_NAME).required(),
        AttributeInfo::string(attributes::LAST_NAME).required(),
        AttributeInfo::string(attributes::UPDATED_ON),
        AttributeInfo::string(attributes::ROLE),
        AttributeInfo::string(attributes::ROLES).multi_valued(),
        AttributeInfo::string(attributes::EXTERNAL_DATA),
        AttributeInfo::string(attributes::SSO_IDENTIFIER),
    ];

    attrs.extend(
        LOCATION_FIELDS
            .iter()
            .map(|field| AttributeInfo::string(*field).not_returned_by_default()),
    );

    attrs.push(
        AttributeInfo::boolean(attributes::EMAIL_CONFLICT)
            .with_mutability(Mutability::ReadOnly)
            .not_returned_by_default(),
    );
    attrs.push(AttributeInfo {
        data_type: AttributeType::GuardedString,
        mutability: Mutability::WriteOnly,
        returned_by_default: false,
        ..AttributeInfo::string(attributes::PASSWORD)
    });
    attrs.push(AttributeInfo::boolean(attributes::ENABLE));

    ObjectClassInfo {
        name: attributes::ACCOUNT_NAME.to_string(),
        attributes: attrs,
    }
}
