use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonId(String);

impl TaxonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaxonId {
    type Err = HarvestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid =
            !normalized.is_empty() && normalized.chars().all(|ch| ch.is_ascii_digit());
        if !is_valid {
            return Err(HarvestError::InvalidTaxonId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthFilter {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl LengthFilter {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismInfo {
    pub taxid: String,
    pub scientific_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRecord {
    pub accession: String,
    pub length: u64,
    pub description: String,
}

/// Back-reference into the server-side history session created by a search.
/// An immutable value object; it needs no teardown and never outlives the
/// run that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalSession {
    pub web_env: String,
    pub query_key: String,
    pub total_count: u64,
}

impl RetrievalSession {
    pub fn is_usable(&self) -> bool {
        !self.web_env.trim().is_empty() && !self.query_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found {
        organism: OrganismInfo,
        session: RetrievalSession,
    },
    NoMatches {
        organism: OrganismInfo,
    },
}

impl SearchOutcome {
    pub fn organism(&self) -> &OrganismInfo {
        match self {
            SearchOutcome::Found { organism, .. } => organism,
            SearchOutcome::NoMatches { organism } => organism,
        }
    }

    pub fn session(&self) -> Option<&RetrievalSession> {
        match self {
            SearchOutcome::Found { session, .. } => Some(session),
            SearchOutcome::NoMatches { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_taxon_id_valid() {
        let taxid: TaxonId = " 9606 ".parse().unwrap();
        assert_eq!(taxid.as_str(), "9606");
    }

    #[test]
    fn parse_taxon_id_invalid() {
        let err = "96a06".parse::<TaxonId>().unwrap_err();
        assert_matches!(err, HarvestError::InvalidTaxonId(_));
        let err = "".parse::<TaxonId>().unwrap_err();
        assert_matches!(err, HarvestError::InvalidTaxonId(_));
    }

    #[test]
    fn session_usability() {
        let session = RetrievalSession {
            web_env: "MCID_01".to_string(),
            query_key: "1".to_string(),
            total_count: 42,
        };
        assert!(session.is_usable());

        let blank = RetrievalSession {
            web_env: String::new(),
            query_key: "1".to_string(),
            total_count: 42,
        };
        assert!(!blank.is_usable());
    }

    #[test]
    fn outcome_exposes_session_only_when_found() {
        let organism = OrganismInfo {
            taxid: "9606".to_string(),
            scientific_name: "Homo sapiens".to_string(),
        };
        let outcome = SearchOutcome::NoMatches {
            organism: organism.clone(),
        };
        assert!(outcome.session().is_none());
        assert_eq!(outcome.organism(), &organism);
    }
}
