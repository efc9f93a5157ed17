use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::parse::SnapshotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Party,
    Person,
    Date,
    Amount,
    Location,
    Term,
    Percentage,
    #[serde(other)]
    Unknown,
}

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        Self::Party,
        Self::Person,
        Self::Date,
        Self::Amount,
        Self::Location,
        Self::Term,
        Self::Percentage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Party => "party",
            Self::Person => "person",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Location => "location",
            Self::Term => "term",
            Self::Percentage => "percentage",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Party => "Party",
            Self::Person => "Person",
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Location => "Location",
            Self::Term => "Term",
            Self::Percentage => "Percentage",
            Self::Unknown => "Other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub normalized: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    #[serde(default)]
    pub label: String,
}

/// Advisory counts supplied by the extraction service. Never recomputed locally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStats {
    pub total_entities: usize,
    pub total_relationships: usize,
    pub entity_types: BTreeMap<String, usize>,
    pub relationship_types: BTreeMap<String, usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSnapshot {
    pub document_id: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub stats: GraphStats,
}

impl GraphSnapshot {
    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }
}

/// A validated snapshot. Every entry of `edges` has both endpoints in `nodes`,
/// and `links[i]` holds the node indices of `edges[i]`.
#[derive(Clone, Debug)]
pub struct EntityGraph {
    pub document_id: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub links: Vec<(usize, usize)>,
    pub index_by_id: HashMap<String, usize>,
    pub stats: GraphStats,
    pub dropped_edges: usize,
}

impl EntityGraph {
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, SnapshotError> {
        let GraphSnapshot {
            document_id,
            nodes,
            edges,
            stats,
        } = snapshot;

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(SnapshotError::DuplicateNodeId(node.id.clone()));
            }
        }

        let total_edges = edges.len();
        let mut kept = Vec::with_capacity(total_edges);
        let mut links = Vec::with_capacity(total_edges);
        for edge in edges {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&edge.source), index_by_id.get(&edge.target))
            else {
                continue;
            };
            links.push((source, target));
            kept.push(edge);
        }

        let dropped_edges = total_edges - kept.len();
        if dropped_edges > 0 {
            tracing::warn!(dropped_edges, "dropped relationships with unknown endpoints");
        }

        Ok(Self {
            document_id,
            nodes,
            edges: kept,
            links,
            index_by_id,
            stats,
            dropped_edges,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.links
            .iter()
            .filter(|&&(source, target)| source == index || target == index)
            .count()
    }

    pub fn relationships_of(&self, index: usize) -> impl Iterator<Item = (&Edge, &Node)> + '_ {
        self.edges
            .iter()
            .zip(self.links.iter())
            .filter_map(move |(edge, &(source, target))| {
                if source == index {
                    self.nodes.get(target).map(|other| (edge, other))
                } else if target == index {
                    self.nodes.get(source).map(|other| (edge, other))
                } else {
                    None
                }
            })
    }

    pub fn type_count(&self, entity_type: EntityType) -> usize {
        self.stats
            .entity_types
            .get(entity_type.key())
            .copied()
            .unwrap_or(0)
    }
}
