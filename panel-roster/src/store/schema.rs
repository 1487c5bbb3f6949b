//! Declared column sets for each table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod profile_cols {
    pub const EMAIL: &str = "Panel Email ID";
    pub const GRADE: &str = "Panel Grade";
    pub const EVALUATION_ROUND: &str = "Panel Evaluation Round";
    pub const NAME: &str = "Panel Name";
    pub const CONTACT: &str = "Panel Contact Number";
    pub const TSR: &str = "TSR Code / Name";
    pub const ACCOUNT: &str = "Panel Account Name";
    pub const COMPETENCY: &str = "Competency Code";
    pub const GEO: &str = "Panel Work Geo";
    pub const SKILLS: &str = "Skills";
}

pub mod slot_cols {
    pub const EMAIL: &str = "Panel Email ID";
    pub const NAME: &str = "Panel Name";
    pub const COMPETENCY: &str = "Competency";
    pub const GEO: &str = "Panel Work Geo";
    pub const START_DATE: &str = "Slot Start Date";
    pub const END_DATE: &str = "Slot End Date";
    pub const START_TIME: &str = "Slot Start Time";
    pub const COUNT: &str = "Slot Count";
}

pub mod credential_cols {
    pub const EMAIL: &str = "Email";
    pub const PASSWORD: &str = "Password";
    pub const ROLE: &str = "Role";
}

pub const PROFILE_COLUMNS: &[&str] = &[
    profile_cols::EMAIL,
    profile_cols::GRADE,
    profile_cols::EVALUATION_ROUND,
    profile_cols::NAME,
    profile_cols::CONTACT,
    profile_cols::TSR,
    profile_cols::ACCOUNT,
    profile_cols::COMPETENCY,
    profile_cols::GEO,
    profile_cols::SKILLS,
];

pub const SLOT_COLUMNS: &[&str] = &[
    slot_cols::EMAIL,
    slot_cols::NAME,
    slot_cols::COMPETENCY,
    slot_cols::GEO,
    slot_cols::START_DATE,
    slot_cols::END_DATE,
    slot_cols::START_TIME,
    slot_cols::COUNT,
];

pub const CREDENTIAL_COLUMNS: &[&str] = &[
    credential_cols::EMAIL,
    credential_cols::PASSWORD,
    credential_cols::ROLE,
];

/// The tables this application persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Profiles,
    Slots,
    Credentials,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::Profiles, TableKind::Slots, TableKind::Credentials];

    /// Declared column set, in on-disk order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Profiles => PROFILE_COLUMNS,
            TableKind::Slots => SLOT_COLUMNS,
            TableKind::Credentials => CREDENTIAL_COLUMNS,
        }
    }

    /// Column holding the unique identifier
    pub fn key_column(&self) -> &'static str {
        match self {
            TableKind::Profiles => profile_cols::EMAIL,
            TableKind::Slots => slot_cols::EMAIL,
            TableKind::Credentials => credential_cols::EMAIL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Profiles => "profiles",
            TableKind::Slots => "slots",
            TableKind::Credentials => "credentials",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profiles" | "profile" => Ok(TableKind::Profiles),
            "slots" | "slot" => Ok(TableKind::Slots),
            "credentials" => Ok(TableKind::Credentials),
            other => Err(format!("unknown table: {other}")),
        }
    }
}
