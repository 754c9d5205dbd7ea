//! Ledger/goal scopes.
//!
//! Each scope owns an isolated ledger and goal registry. The two scopes never
//! share storage keys, so patient and doctor balances cannot interfere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Owner of a ledger and goal registry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Patient,
    Doctor,
}

impl Scope {
    /// Storage key holding the serialized integer total for this scope.
    pub fn total_key(&self) -> &'static str {
        match self {
            Scope::Patient => "careledger_exp_v1",
            Scope::Doctor => "careledger_exp_doctor_v1",
        }
    }

    /// Storage key holding the serialized event array for this scope.
    pub fn events_key(&self) -> &'static str {
        match self {
            Scope::Patient => "careledger_exp_events_v1",
            Scope::Doctor => "careledger_exp_events_doctor_v1",
        }
    }

    /// Storage key holding the serialized goal collection for this scope.
    pub fn goals_key(&self) -> &'static str {
        match self {
            Scope::Patient => "patient_health_goals_v1",
            Scope::Doctor => "doctor_health_goals_v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Patient => "patient",
            Scope::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patient" => Ok(Scope::Patient),
            "doctor" => Ok(Scope::Doctor),
            other => Err(format!(
                "unknown scope '{other}' (expected 'patient' or 'doctor')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_use_disjoint_keys() {
        let patient = [
            Scope::Patient.total_key(),
            Scope::Patient.events_key(),
            Scope::Patient.goals_key(),
        ];
        let doctor = [
            Scope::Doctor.total_key(),
            Scope::Doctor.events_key(),
            Scope::Doctor.goals_key(),
        ];
        for key in patient {
            assert!(!doctor.contains(&key));
        }
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("patient".parse::<Scope>().unwrap(), Scope::Patient);
        assert_eq!("Doctor".parse::<Scope>().unwrap(), Scope::Doctor);
        assert!("nurse".parse::<Scope>().is_err());
    }
}
