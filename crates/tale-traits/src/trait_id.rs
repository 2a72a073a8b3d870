//! Canonical trait identifiers
//!
//! Two closed families:
//! - **Base traits**: personality attributes (`courage`, `empathy`, ...)
//! - **Knowledge subjects**: `knowledge.<subject>` tokens (`knowledge.physics`, ...)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every knowledge subcategory token
pub const KNOWLEDGE_PREFIX: &str = "knowledge.";

/// Base personality trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseTrait {
    /// `courage`
    Courage,
    /// `intelligence`
    Intelligence,
    /// `creativity`
    Creativity,
    /// `empathy`
    Empathy,
    /// `strength`
    Strength,
    /// `humor`
    Humor,
    /// `adventure`
    Adventure,
    /// `patience`
    Patience,
    /// `curiosity`
    Curiosity,
    /// `leadership`
    Leadership,
    /// `teamwork`
    Teamwork,
}

impl BaseTrait {
    /// Every base trait, in canonical order
    pub const ALL: [BaseTrait; 11] = [
        Self::Courage,
        Self::Intelligence,
        Self::Creativity,
        Self::Empathy,
        Self::Strength,
        Self::Humor,
        Self::Adventure,
        Self::Patience,
        Self::Curiosity,
        Self::Leadership,
        Self::Teamwork,
    ];

    /// Canonical token
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Courage => "courage",
            Self::Intelligence => "intelligence",
            Self::Creativity => "creativity",
            Self::Empathy => "empathy",
            Self::Strength => "strength",
            Self::Humor => "humor",
            Self::Adventure => "adventure",
            Self::Patience => "patience",
            Self::Curiosity => "curiosity",
            Self::Leadership => "leadership",
            Self::Teamwork => "teamwork",
        }
    }

    /// Look up by canonical token (exact, already lower-cased)
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }
}

/// Knowledge subject, used as `knowledge.<subject>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnowledgeSubject {
    /// `knowledge.history`
    History,
    /// `knowledge.biology`
    Biology,
    /// `knowledge.physics`
    Physics,
    /// `knowledge.geography`
    Geography,
    /// `knowledge.astronomy`
    Astronomy,
    /// `knowledge.mathematics`
    Mathematics,
    /// `knowledge.chemistry`
    Chemistry,
}

impl KnowledgeSubject {
    /// Every subject, in canonical order
    pub const ALL: [KnowledgeSubject; 7] = [
        Self::History,
        Self::Biology,
        Self::Physics,
        Self::Geography,
        Self::Astronomy,
        Self::Mathematics,
        Self::Chemistry,
    ];

    /// Subject name without the `knowledge.` prefix
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Biology => "biology",
            Self::Physics => "physics",
            Self::Geography => "geography",
            Self::Astronomy => "astronomy",
            Self::Mathematics => "mathematics",
            Self::Chemistry => "chemistry",
        }
    }

    /// Full canonical token including the prefix
    #[inline]
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::History => "knowledge.history",
            Self::Biology => "knowledge.biology",
            Self::Physics => "knowledge.physics",
            Self::Geography => "knowledge.geography",
            Self::Astronomy => "knowledge.astronomy",
            Self::Mathematics => "knowledge.mathematics",
            Self::Chemistry => "knowledge.chemistry",
        }
    }

    /// Look up by bare subject name
    #[must_use]
    pub fn from_subject(subject: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == subject)
    }
}

/// Canonical trait identifier
///
/// Every value belongs to exactly one of the two families; there is no
/// free-form variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraitId {
    /// Personality trait
    Base(BaseTrait),
    /// `knowledge.<subject>`
    Knowledge(KnowledgeSubject),
}

impl TraitId {
    /// Canonical string token
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base(t) => t.as_str(),
            Self::Knowledge(s) => s.token(),
        }
    }

    /// Whether this is a knowledge subcategory
    #[inline]
    #[must_use]
    pub const fn is_knowledge(self) -> bool {
        matches!(self, Self::Knowledge(_))
    }

    /// All 18 canonical identifiers, base traits first
    pub fn all() -> impl Iterator<Item = TraitId> {
        BaseTrait::ALL
            .into_iter()
            .map(Self::Base)
            .chain(KnowledgeSubject::ALL.into_iter().map(Self::Knowledge))
    }

    /// Strict parse of an already-canonical token
    ///
    /// Does not trim, lower-case, or consult aliases; see
    /// [`crate::normalize_trait`] for lenient resolution.
    #[must_use]
    pub fn from_canonical(token: &str) -> Option<Self> {
        if let Some(subject) = token.strip_prefix(KNOWLEDGE_PREFIX) {
            return KnowledgeSubject::from_subject(subject).map(Self::Knowledge);
        }
        BaseTrait::from_token(token).map(Self::Base)
    }
}

impl From<BaseTrait> for TraitId {
    fn from(t: BaseTrait) -> Self {
        Self::Base(t)
    }
}

impl From<KnowledgeSubject> for TraitId {
    fn from(s: KnowledgeSubject) -> Self {
        Self::Knowledge(s)
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strict parsing of canonical tokens
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a canonical trait identifier: '{0}'")]
pub struct UnknownTraitId(pub String);

impl FromStr for TraitId {
    type Err = UnknownTraitId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s).ok_or_else(|| UnknownTraitId(s.to_string()))
    }
}

impl Serialize for TraitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TraitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
