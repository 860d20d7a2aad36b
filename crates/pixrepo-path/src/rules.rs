//! Immutable naming-rule sets and the baked-in platform tables
//!
//! A [`NamingRules`] value holds a per-code-point substitution table,
//! forbidden name/prefix/suffix sets, and a non-empty set of safe
//! characters. Rule sets are built once from the platform tables at
//! configuration time and combined into a composite policy; they are
//! never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier for one of the fixed platform rule tables.
///
/// Operators select a combination of tables via configuration; the
/// table contents are versioned with the service and never change at
/// request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleTable {
    /// Names Windows filesystems reject outright
    WindowsRequired,
    /// Names legal on Windows but known to cause trouble
    WindowsOptional,
    /// Names UNIX filesystems reject outright
    UnixRequired,
    /// Names legal on UNIX but known to cause trouble
    UnixOptional,
    /// Conservative local baseline, always applied
    LocalRequired,
    /// Conservative local extras
    LocalOptional,
}

impl RuleTable {
    /// All selectable tables.
    pub const ALL: [RuleTable; 6] = [
        Self::WindowsRequired,
        Self::WindowsOptional,
        Self::UnixRequired,
        Self::UnixOptional,
        Self::LocalRequired,
        Self::LocalOptional,
    ];

    /// The configuration identifier for this table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WindowsRequired => "windows-required",
            Self::WindowsOptional => "windows-optional",
            Self::UnixRequired => "unix-required",
            Self::UnixOptional => "unix-optional",
            Self::LocalRequired => "local-required",
            Self::LocalOptional => "local-optional",
        }
    }

    /// Build the immutable rule set for this table.
    pub fn rules(&self) -> NamingRules {
        match self {
            Self::WindowsRequired => windows_required(),
            Self::WindowsOptional => windows_optional(),
            Self::UnixRequired => unix_required(),
            Self::UnixOptional => unix_optional(),
            Self::LocalRequired => local_required(),
            Self::LocalOptional => local_optional(),
        }
    }
}

impl std::fmt::Display for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RuleTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| Error::IrreconcilableRules {
                reason: format!("unknown rule table {s:?}"),
            })
    }
}

/// An immutable, combinable set of component-naming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRules {
    /// Forbidden code point -> acceptable replacements (never empty)
    substitutions: BTreeMap<char, BTreeSet<char>>,
    /// Forbidden component-name prefixes
    unsafe_prefixes: BTreeSet<String>,
    /// Forbidden component-name suffixes
    unsafe_suffixes: BTreeSet<String>,
    /// Wholly forbidden component names, stored upper-cased
    unsafe_names: BTreeSet<String>,
    /// Characters guaranteed never themselves forbidden
    safe_characters: BTreeSet<char>,
    /// Designated safe character: the smallest of `safe_characters`
    safe_character: char,
}

impl NamingRules {
    /// Build a rule set, enforcing the construction invariants:
    /// at least one safe character, no safe character forbidden, and
    /// no forbidden code point with an empty replacement set.
    pub fn new(
        substitutions: BTreeMap<char, BTreeSet<char>>,
        unsafe_prefixes: BTreeSet<String>,
        unsafe_suffixes: BTreeSet<String>,
        unsafe_names: BTreeSet<String>,
        safe_characters: BTreeSet<char>,
    ) -> Result<Self> {
        let safe_character = *safe_characters.iter().next().ok_or_else(|| {
            Error::IrreconcilableRules {
                reason: "rule set has no safe character".to_string(),
            }
        })?;
        if let Some(ch) = safe_characters
            .iter()
            .find(|ch| substitutions.contains_key(ch))
        {
            return Err(Error::IrreconcilableRules {
                reason: format!("safe character {ch:?} is itself forbidden"),
            });
        }
        if let Some((ch, _)) = substitutions
            .iter()
            .find(|(_, replacements)| replacements.is_empty())
        {
            return Err(Error::IrreconcilableRules {
                reason: format!("forbidden code point {ch:?} has no replacement"),
            });
        }
        // Sanitizer idempotence requires that prepending or appending a
        // safe character can never introduce a new violation.
        for ch in &safe_characters {
            if unsafe_prefixes.iter().any(|p| p.starts_with(*ch)) {
                return Err(Error::IrreconcilableRules {
                    reason: format!("safe character {ch:?} begins a forbidden prefix"),
                });
            }
            if unsafe_suffixes.iter().any(|s| s.ends_with(*ch)) {
                return Err(Error::IrreconcilableRules {
                    reason: format!("safe character {ch:?} ends a forbidden suffix"),
                });
            }
        }
        let unsafe_names = unsafe_names
            .into_iter()
            .map(|name| name.to_uppercase())
            .collect();
        Ok(Self {
            substitutions,
            unsafe_prefixes,
            unsafe_suffixes,
            unsafe_names,
            safe_characters,
            safe_character,
        })
    }

    /// Combine rule sets into a composite policy.
    ///
    /// Safe-character sets are intersected; prefix, suffix, and name
    /// sets are unioned; the substitution tables are unioned, with
    /// replacement sets intersected for code points both tables remap.
    /// An empty safe intersection or an empty replacement intersection
    /// is an unrecoverable configuration error, reported eagerly.
    pub fn combine<'a>(rules: impl IntoIterator<Item = &'a NamingRules>) -> Result<NamingRules> {
        let mut rules = rules.into_iter();
        let first = rules.next().ok_or_else(|| Error::IrreconcilableRules {
            reason: "no rule sets selected".to_string(),
        })?;
        let mut combined = first.clone();
        for next in rules {
            combined = combined.merge(next)?;
        }
        Ok(combined)
    }

    fn merge(&self, other: &NamingRules) -> Result<NamingRules> {
        let mut substitutions = self.substitutions.clone();
        for (ch, replacements) in &other.substitutions {
            match substitutions.get_mut(ch) {
                Some(existing) => {
                    let shared: BTreeSet<char> =
                        existing.intersection(replacements).copied().collect();
                    if shared.is_empty() {
                        return Err(Error::IrreconcilableRules {
                            reason: format!(
                                "no shared replacement for forbidden code point {ch:?}"
                            ),
                        });
                    }
                    *existing = shared;
                }
                None => {
                    substitutions.insert(*ch, replacements.clone());
                }
            }
        }

        let safe_characters: BTreeSet<char> = self
            .safe_characters
            .intersection(&other.safe_characters)
            .copied()
            .collect();
        if safe_characters.is_empty() {
            return Err(Error::IrreconcilableRules {
                reason: "combined rule sets share no safe character".to_string(),
            });
        }

        let union = |a: &BTreeSet<String>, b: &BTreeSet<String>| {
            a.union(b).cloned().collect::<BTreeSet<String>>()
        };
        NamingRules::new(
            substitutions,
            union(&self.unsafe_prefixes, &other.unsafe_prefixes),
            union(&self.unsafe_suffixes, &other.unsafe_suffixes),
            union(&self.unsafe_names, &other.unsafe_names),
            safe_characters,
        )
    }

    /// The designated safe character, used for appends and prepends.
    pub fn safe_character(&self) -> char {
        self.safe_character
    }

    /// True if the code point is forbidden.
    pub fn is_forbidden(&self, ch: char) -> bool {
        self.substitutions.contains_key(&ch)
    }

    /// The deterministic replacement for a forbidden code point:
    /// the designated safe character when it is among the allowed
    /// replacements, else the smallest allowed replacement.
    pub fn replacement_for(&self, ch: char) -> Option<char> {
        let replacements = self.substitutions.get(&ch)?;
        if replacements.contains(&self.safe_character) {
            Some(self.safe_character)
        } else {
            replacements.iter().next().copied()
        }
    }

    /// True if the component equals a wholly forbidden name
    /// (case-insensitive).
    pub fn is_unsafe_name(&self, component: &str) -> bool {
        self.unsafe_names.contains(&component.to_uppercase())
    }

    /// Forbidden prefixes the component starts with.
    pub fn matching_prefixes<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a str> {
        self.unsafe_prefixes
            .iter()
            .filter(move |prefix| component.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    /// Forbidden suffixes the component ends with.
    pub fn matching_suffixes<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a str> {
        self.unsafe_suffixes
            .iter()
            .filter(move |suffix| component.ends_with(suffix.as_str()))
            .map(String::as_str)
    }

    /// Forbidden code points occurring in the component.
    pub fn matching_code_points<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = char> + 'a {
        component.chars().filter(|ch| self.is_forbidden(*ch))
    }
}

fn substitution(
    table: impl IntoIterator<Item = (char, &'static [char])>,
) -> BTreeMap<char, BTreeSet<char>> {
    table
        .into_iter()
        .map(|(ch, replacements)| (ch, replacements.iter().copied().collect()))
        .collect()
}

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Sole replacement set for code points that only map to `_`.
const SAFE_ONLY: &[char] = &['_'];

fn control_substitutions(range: std::ops::RangeInclusive<u32>) -> Vec<(char, &'static [char])> {
    range
        .filter_map(char::from_u32)
        .map(|ch| (ch, SAFE_ONLY))
        .collect()
}

fn windows_required() -> NamingRules {
    let mut table = control_substitutions(0x00..=0x1f);
    let printable: [(char, &'static [char]); 9] = [
        ('"', &['\'', '_']),
        ('*', &['_', 'x']),
        ('/', &['_']),
        (':', &['_', ';']),
        ('<', &['_']),
        ('>', &['_']),
        ('?', &['_']),
        ('\\', &['_']),
        ('|', &['_', '!']),
    ];
    table.extend(printable);
    NamingRules::new(
        substitution(table),
        BTreeSet::new(),
        names(&[".", " "]),
        names(&[
            ".", "..", "AUX", "CLOCK$", "CON", "NUL", "PRN", "COM1", "COM2", "COM3", "COM4",
            "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5",
            "LPT6", "LPT7", "LPT8", "LPT9",
        ]),
        ['_', '-'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("windows-required table is static: {e}"))
}

fn windows_optional() -> NamingRules {
    NamingRules::new(
        substitution([('\u{7f}', SAFE_ONLY)]),
        names(&[" "]),
        names(&[" "]),
        BTreeSet::new(),
        ['_', '-'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("windows-optional table is static: {e}"))
}

fn unix_required() -> NamingRules {
    NamingRules::new(
        substitution([('\0', SAFE_ONLY), ('/', SAFE_ONLY)]),
        BTreeSet::new(),
        BTreeSet::new(),
        names(&[".", ".."]),
        ['_'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("unix-required table is static: {e}"))
}

fn unix_optional() -> NamingRules {
    NamingRules::new(
        substitution(control_substitutions(0x01..=0x1f)),
        names(&[".", "-"]),
        names(&["~"]),
        BTreeSet::new(),
        ['_'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("unix-optional table is static: {e}"))
}

fn local_required() -> NamingRules {
    NamingRules::new(
        substitution(control_substitutions(0x00..=0x1f)),
        BTreeSet::new(),
        BTreeSet::new(),
        names(&[".", ".."]),
        ['_'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("local-required table is static: {e}"))
}

fn local_optional() -> NamingRules {
    NamingRules::new(
        BTreeMap::new(),
        names(&["$"]),
        names(&["~"]),
        BTreeSet::new(),
        ['_'].into_iter().collect(),
    )
    .unwrap_or_else(|e| unreachable!("local-optional table is static: {e}"))
}
