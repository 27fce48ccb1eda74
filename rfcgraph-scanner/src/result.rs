use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier of an RFC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(u32);

impl DocumentId {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl From<u32> for DocumentId {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts `1034`, `rfc1034` and `RFC 1034`.
impl FromStr for DocumentId {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("rfc")
            .or_else(|| trimmed.strip_prefix("RFC"))
            .or_else(|| trimmed.strip_prefix("Rfc"))
            .unwrap_or(trimmed)
            .trim_start();

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScanError::InvalidId(s.to_string()));
        }

        digits
            .parse::<u32>()
            .map(DocumentId)
            .map_err(|_| ScanError::InvalidId(s.to_string()))
    }
}

/// The four directed relations an RFC header can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    UpdatedBy,
    Updates,
    ObsoletedBy,
    Obsoletes,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::UpdatedBy,
        RelationKind::Updates,
        RelationKind::ObsoletedBy,
        RelationKind::Obsoletes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::UpdatedBy => "updated_by",
            RelationKind::Updates => "updates",
            RelationKind::ObsoletedBy => "obsoleted_by",
            RelationKind::Obsoletes => "obsoletes",
        }
    }

    /// Label used in the RFC header block.
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::UpdatedBy => "Updated by:",
            RelationKind::Updates => "Updates:",
            RelationKind::ObsoletedBy => "Obsoleted by:",
            RelationKind::Obsoletes => "Obsoletes:",
        }
    }

    pub fn is_obsolescence(&self) -> bool {
        matches!(self, RelationKind::ObsoletedBy | RelationKind::Obsoletes)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One id list per relation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(default)]
    pub updated_by: Vec<DocumentId>,
    #[serde(default)]
    pub updates: Vec<DocumentId>,
    #[serde(default)]
    pub obsoleted_by: Vec<DocumentId>,
    #[serde(default)]
    pub obsoletes: Vec<DocumentId>,
}

impl Relations {
    pub fn get(&self, kind: RelationKind) -> &[DocumentId] {
        match kind {
            RelationKind::UpdatedBy => &self.updated_by,
            RelationKind::Updates => &self.updates,
            RelationKind::ObsoletedBy => &self.obsoleted_by,
            RelationKind::Obsoletes => &self.obsoletes,
        }
    }

    pub fn get_mut(&mut self, kind: RelationKind) -> &mut Vec<DocumentId> {
        match kind {
            RelationKind::UpdatedBy => &mut self.updated_by,
            RelationKind::Updates => &mut self.updates,
            RelationKind::ObsoletedBy => &mut self.obsoleted_by,
            RelationKind::Obsoletes => &mut self.obsoletes,
        }
    }

    /// Sort every list and drop duplicates.
    pub fn normalize(&mut self) {
        for kind in RelationKind::ALL {
            let ids = self.get_mut(kind);
            ids.sort_unstable();
            ids.dedup();
        }
    }

    pub fn is_empty(&self) -> bool {
        RelationKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }

    /// Every id in kind order, duplicates across kinds included.
    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, DocumentId)> + '_ {
        RelationKind::ALL
            .into_iter()
            .flat_map(move |kind| self.get(kind).iter().map(move |id| (kind, *id)))
    }
}

/// What a relation source knows about one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSet {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub relations: Relations,
}

impl RelationSet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            relations: Relations::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder used mostly by tests and JSON fixtures.
    pub fn with(mut self, kind: RelationKind, ids: impl IntoIterator<Item = u32>) -> Self {
        self.relations
            .get_mut(kind)
            .extend(ids.into_iter().map(DocumentId::new));
        self.relations.normalize();
        self
    }

    pub fn normalized(mut self) -> Self {
        self.relations.normalize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_parsing() {
        assert_eq!("1034".parse::<DocumentId>().unwrap(), DocumentId::new(1034));
        assert_eq!("rfc2535".parse::<DocumentId>().unwrap(), DocumentId::new(2535));
        assert_eq!("RFC 791".parse::<DocumentId>().unwrap(), DocumentId::new(791));
        assert_eq!(" 42 ".parse::<DocumentId>().unwrap(), DocumentId::new(42));
    }

    #[test]
    fn test_document_id_rejects_garbage() {
        assert!("".parse::<DocumentId>().is_err());
        assert!("rfc".parse::<DocumentId>().is_err());
        assert!("12a".parse::<DocumentId>().is_err());
        assert!("-5".parse::<DocumentId>().is_err());
        assert!("99999999999".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_document_id_orders_numerically() {
        assert!(DocumentId::new(973) < DocumentId::new(1101));
    }

    #[test]
    fn test_relations_normalize_sorts_and_dedups() {
        let set = RelationSet::new("x").with(RelationKind::Updates, [30, 10, 20, 10]);
        assert_eq!(
            set.relations.updates,
            vec![DocumentId::new(10), DocumentId::new(20), DocumentId::new(30)]
        );
    }

    #[test]
    fn test_relation_set_json_shape() {
        let json = r#"{"title": "Domain names", "updated_by": [1101, 1183], "obsoletes": [882]}"#;
        let set: RelationSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.title, "Domain names");
        assert_eq!(set.relations.updated_by.len(), 2);
        assert_eq!(set.relations.obsoletes, vec![DocumentId::new(882)]);
        assert!(set.relations.updates.is_empty());
        assert!(set.url.is_none());
    }

    #[test]
    fn test_relations_iter_follows_kind_order() {
        let set = RelationSet::new("x")
            .with(RelationKind::Obsoletes, [1])
            .with(RelationKind::UpdatedBy, [2]);
        let kinds: Vec<RelationKind> = set.relations.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![RelationKind::UpdatedBy, RelationKind::Obsoletes]);
    }
}
