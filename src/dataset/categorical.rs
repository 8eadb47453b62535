//! Categorical columns: raw spreadsheet text -> enum -> score.
//!
//! Matching ignores case, surrounding whitespace and Spanish accents, so
//! "Sí", "si" and " SI " are the same answer. Values outside the tables are
//! kept as `Unrecognized` and score 0.

use std::fmt;

/// Yes/no answers accepted by the compliance and blacklist columns
const YES_NO: &[(&str, bool)] = &[
    ("si", true),
    ("s", true),
    ("yes", true),
    ("y", true),
    ("true", true),
    ("1", true),
    ("no", false),
    ("n", false),
    ("false", false),
    ("0", false),
];

const FISCAL: &[(&str, FiscalStatus)] = &[
    ("al dia", FiscalStatus::Current),
    ("al corriente", FiscalStatus::Current),
    ("current", FiscalStatus::Current),
    ("no al dia", FiscalStatus::NotCurrent),
    ("atrasado", FiscalStatus::NotCurrent),
    ("moroso", FiscalStatus::NotCurrent),
    ("pendiente", FiscalStatus::NotCurrent),
    ("not current", FiscalStatus::NotCurrent),
];

/// Combining Diacritical Marks block, left behind by decomposed (NFD) text
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{300}'..='\u{36f}';

/// Lowercase, strip accents and collapse inner whitespace
pub fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| !COMBINING_MARKS.contains(c))
                .map(|c| match c {
                    'á' | 'à' | 'ä' | 'â' => 'a',
                    'é' | 'è' | 'ë' | 'ê' => 'e',
                    'í' | 'ì' | 'ï' | 'î' => 'i',
                    'ó' | 'ò' | 'ö' | 'ô' => 'o',
                    'ú' | 'ù' | 'ü' | 'û' => 'u',
                    'ñ' => 'n',
                    other => other,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let key = fold(raw);
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compliance {
    Compliant,
    NonCompliant,
    Unrecognized(String),
}

impl Compliance {
    pub fn parse(raw: &str) -> Self {
        match lookup(YES_NO, raw) {
            Some(true) => Compliance::Compliant,
            Some(false) => Compliance::NonCompliant,
            None => Compliance::Unrecognized(raw.to_string()),
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Compliance::Compliant => 1.0,
            Compliance::NonCompliant | Compliance::Unrecognized(_) => 0.0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Compliance::Unrecognized(_))
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compliance::Compliant => write!(f, "Sí"),
            Compliance::NonCompliant => write!(f, "No"),
            Compliance::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiscalStatus {
    Current,
    NotCurrent,
    Unrecognized(String),
}

impl FiscalStatus {
    pub fn parse(raw: &str) -> Self {
        let key = fold(raw);
        FISCAL
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| FiscalStatus::Unrecognized(raw.to_string()))
    }

    pub fn score(&self) -> f64 {
        match self {
            FiscalStatus::Current => 1.0,
            FiscalStatus::NotCurrent | FiscalStatus::Unrecognized(_) => 0.0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FiscalStatus::Unrecognized(_))
    }
}

impl fmt::Display for FiscalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiscalStatus::Current => write!(f, "Al día"),
            FiscalStatus::NotCurrent => write!(f, "No al día"),
            FiscalStatus::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

/// Blacklist membership. Being listed is the bad outcome, so `Listed` scores 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blacklist {
    Listed,
    Clear,
    Unrecognized(String),
}

impl Blacklist {
    pub fn parse(raw: &str) -> Self {
        match lookup(YES_NO, raw) {
            Some(true) => Blacklist::Listed,
            Some(false) => Blacklist::Clear,
            None => Blacklist::Unrecognized(raw.to_string()),
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Blacklist::Clear => 1.0,
            Blacklist::Listed | Blacklist::Unrecognized(_) => 0.0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Blacklist::Unrecognized(_))
    }
}

impl fmt::Display for Blacklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blacklist::Listed => write!(f, "Sí"),
            Blacklist::Clear => write!(f, "No"),
            Blacklist::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}
