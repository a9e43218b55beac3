use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseKeyError;

/// Organizational roles that tasks are routed to. Canonical strings are the
/// exact role names the directory stores, short code included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Head of O.U.")]
    HeadOfOrgUnit,
    #[serde(rename = "PD (Personnel Department)")]
    PersonnelDepartment,
    #[serde(rename = "Vice-Rector for Education (PRK)")]
    ViceRectorEducation,
    #[serde(rename = "Vice-Rector for Scientific Affairs (PRN)")]
    ViceRectorScience,
    #[serde(rename = "Rector (RKR)")]
    Rector,
    #[serde(rename = "Chancellor (KAN)")]
    Chancellor,
    #[serde(rename = "Quartermaster (KWE)")]
    Quartermaster,
    #[serde(rename = "MPD (Military Personnel Dept.)")]
    MilitaryPersonnelDepartment,
    #[serde(rename = "Employee")]
    Employee,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::HeadOfOrgUnit,
        Role::PersonnelDepartment,
        Role::ViceRectorEducation,
        Role::ViceRectorScience,
        Role::Rector,
        Role::Chancellor,
        Role::Quartermaster,
        Role::MilitaryPersonnelDepartment,
        Role::Employee,
    ];

    /// Canonical role name, as stored and exchanged with clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::HeadOfOrgUnit => "Head of O.U.",
            Role::PersonnelDepartment => "PD (Personnel Department)",
            Role::ViceRectorEducation => "Vice-Rector for Education (PRK)",
            Role::ViceRectorScience => "Vice-Rector for Scientific Affairs (PRN)",
            Role::Rector => "Rector (RKR)",
            Role::Chancellor => "Chancellor (KAN)",
            Role::Quartermaster => "Quartermaster (KWE)",
            Role::MilitaryPersonnelDepartment => "MPD (Military Personnel Dept.)",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseKeyError::new("role", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_canonical_strings() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn serde_form_matches_canonical_string() {
        let json = serde_json::to_string(&Role::ViceRectorScience).unwrap();
        assert_eq!(json, "\"Vice-Rector for Scientific Affairs (PRN)\"");
    }
}
