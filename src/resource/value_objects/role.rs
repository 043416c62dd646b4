//! Role value object and the strongest-role reconciliation.
//!
//! SmartRecruiters accepts exactly one role per user. The provisioning side may
//! supply several candidate roles through the multi-valued `roles` attribute, so
//! the connector reduces them to the single strongest one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A SmartRecruiters user role.
///
/// Variants are declared weakest to strongest, so the derived ordering is the
/// vendor's privilege order: `Employee < Restricted < Standard < Extended < Administrator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Employee,
    /// Shown as "BASIC" in the vendor manual.
    Restricted,
    Standard,
    Extended,
    Administrator,
}

impl Role {
    /// All roles, weakest first.
    pub const ALL: [Role; 5] = [
        Role::Employee,
        Role::Restricted,
        Role::Standard,
        Role::Extended,
        Role::Administrator,
    ];

    /// The vendor wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Restricted => "RESTRICTED",
            Role::Standard => "STANDARD",
            Role::Extended => "EXTENDED",
            Role::Administrator => "ADMINISTRATOR",
        }
    }

    /// Case-insensitive lookup of a role name.
    pub fn from_name(name: &str) -> Option<Role> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Pick the strongest role among `candidates`.
    ///
    /// Walks the role table from weakest to strongest and, for each entry, scans
    /// every candidate. The last table entry that matched wins, so the result is
    /// independent of candidate order and duplicates. Unknown names are ignored;
    /// `None` means nothing matched.
    ///
    /// ```rust
    /// use smartrecruiters_connector::resource::Role;
    ///
    /// let strongest = Role::strongest(["EMPLOYEE", "standard", "badrole"]);
    /// assert_eq!(strongest, Some(Role::Standard));
    /// assert_eq!(Role::strongest(Vec::<String>::new()), None);
    /// ```
    pub fn strongest<I, S>(candidates: I) -> Option<Role>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates: Vec<S> = candidates.into_iter().collect();
        let mut best = None;
        for available in Self::ALL {
            for candidate in &candidates {
                if available.as_str().eq_ignore_ascii_case(candidate.as_ref()) {
                    best = Some(available);
                }
            }
        }
        best
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown SmartRecruiters role: {}", s))
    }
}
