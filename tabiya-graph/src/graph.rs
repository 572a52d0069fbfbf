// Position graph data structures and game ingestion.
//
// Nodes live in an arena (`Vec<PositionNode>`) and are addressed by stable
// `NodeId` indices; edges reference indices instead of shared handles. The
// index maps each canonical key to the one node carrying that position, so
// different move orders reaching the same position merge into a single node
// (transposition). The two roots are named entry points outside the index
// and are never merged with each other.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Board, starting_key};
use crate::variations::Variations;
use crate::{CanonicalKey, GameRecord, GraphError};

/// Opaque ID for a graph node: a stable index into the node arena.
/// Unique within a single `PositionGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A board position. `score` and `evaluated` are reserved for future engine
/// analysis; this crate never populates them, but they round-trip through
/// persistence unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub key: CanonicalKey,
    pub score: f32,
    pub evaluated: bool,
}

/// One ply from the owning node to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEdge {
    /// The move in SAN, as received from the game record.
    pub label: String,
    pub target: NodeId,
}

/// A node in the position graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNode {
    pub position: Position,
    /// End time of the game that first created this node. Frozen at
    /// creation; later games passing through the node do not update it.
    pub last_played: DateTime<Utc>,
    /// Outgoing edges in insertion order.
    pub moves: Vec<MoveEdge>,
}

impl PositionNode {
    fn new(key: CanonicalKey, last_played: DateTime<Utc>) -> Self {
        Self {
            position: Position {
                key,
                score: 0.0,
                evaluated: false,
            },
            last_played,
            moves: Vec::new(),
        }
    }

    /// A node with no outgoing edges.
    pub fn is_leaf(&self) -> bool {
        self.moves.is_empty()
    }
}

/// The deduplicated tree of positions reachable from the opening, with one
/// root per color the user played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionGraph {
    depth: usize,
    nodes: Vec<PositionNode>,
    white_root: NodeId,
    black_root: NodeId,
    index: HashMap<CanonicalKey, NodeId>,
}

impl PositionGraph {
    /// Create an empty graph. `depth` records the move cap the graph was
    /// constructed with; enforcing the cap is the ingestion boundary's job.
    pub fn new(depth: usize) -> crate::Result<Self> {
        if depth <= 1 {
            return Err(GraphError::InvalidDepth(depth));
        }
        let start = starting_key();
        let roots = [
            PositionNode::new(start.clone(), DateTime::UNIX_EPOCH),
            PositionNode::new(start, DateTime::UNIX_EPOCH),
        ];
        Ok(Self {
            depth,
            nodes: roots.into(),
            white_root: NodeId(0),
            black_root: NodeId(1),
            index: HashMap::new(),
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn white_root(&self) -> NodeId {
        self.white_root
    }

    pub fn black_root(&self) -> NodeId {
        self.black_root
    }

    pub fn node(&self, id: NodeId) -> &PositionNode {
        &self.nodes[id.0]
    }

    /// Number of nodes, the two roots included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Merge one game's moves into the graph.
    ///
    /// Stops at the first move the rules engine rejects; everything created
    /// for earlier moves of the same call stays committed (no rollback).
    /// Re-walking an existing `(node, label)` edge is a no-op — each node
    /// carries at most one edge per label.
    pub fn add_game(&mut self, game: &GameRecord) -> crate::Result<()> {
        let mut board = Board::new();
        let mut current = if game.white {
            self.white_root
        } else {
            self.black_root
        };
        for (i, san) in game.moves.iter().enumerate() {
            let key = board.apply(san, i + 1)?;
            let next = match self.index.get(&key) {
                Some(&id) => id,
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(PositionNode::new(key.clone(), game.end_time));
                    self.index.insert(key, id);
                    id
                }
            };
            let from = &mut self.nodes[current.0];
            if !from.moves.iter().any(|m| m.label == *san) {
                from.moves.push(MoveEdge {
                    label: san.clone(),
                    target: next,
                });
            }
            current = next;
        }
        Ok(())
    }

    /// Lazily enumerate every stored variation: one move-label sequence per
    /// path from a root to a leaf, white root's subtree first. Each call
    /// starts an independent traversal over the shared, read-only graph.
    pub fn variations(&self) -> Variations<'_> {
        Variations::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(white: bool, moves: &[&str]) -> GameRecord {
        GameRecord {
            white,
            end_time: Utc.with_ymd_and_hms(2021, 10, 14, 18, 30, 0).unwrap(),
            moves: moves.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn construction_rejects_shallow_depth() {
        for depth in [0, 1] {
            match PositionGraph::new(depth) {
                Err(GraphError::InvalidDepth(d)) => assert_eq!(d, depth),
                other => panic!("expected InvalidDepth, got {other:?}"),
            }
        }
    }

    #[test]
    fn construction_seeds_two_empty_roots() {
        let g = PositionGraph::new(2).unwrap();
        assert_eq!(g.node_count(), 2);
        let start = crate::board::starting_key();
        for root in [g.white_root(), g.black_root()] {
            let node = g.node(root);
            assert_eq!(node.position.key, start);
            assert!(node.is_leaf());
        }
        assert_ne!(g.white_root(), g.black_root());
    }

    #[test]
    fn add_game_builds_shared_prefix() {
        let mut g = PositionGraph::new(2).unwrap();
        g.add_game(&record(true, &["e4", "e5", "Nf3", "Nc6"])).unwrap();
        g.add_game(&record(true, &["e4", "c5", "c3", "Nc6"])).unwrap();

        assert!(g.node(g.black_root()).is_leaf());
        let white = g.node(g.white_root());
        assert_eq!(white.moves.len(), 1);
        assert_eq!(white.moves[0].label, "e4");

        let after_e4 = g.node(white.moves[0].target);
        let labels: Vec<_> = after_e4.moves.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["e5", "c5"]);
    }

    #[test]
    fn transpositions_merge_to_the_same_node() {
        let mut g = PositionGraph::new(4).unwrap();
        g.add_game(&record(true, &["e4", "e5", "Nf3", "Nc6"])).unwrap();
        g.add_game(&record(true, &["Nf3", "Nc6", "e4", "e5"])).unwrap();

        // Follow both paths to their final node and compare identities.
        let walk = |labels: &[&str]| -> NodeId {
            let mut id = g.white_root();
            for label in labels {
                id = g
                    .node(id)
                    .moves
                    .iter()
                    .find(|m| m.label == *label)
                    .unwrap_or_else(|| panic!("missing edge {label}"))
                    .target;
            }
            id
        };
        let via_e4 = walk(&["e4", "e5", "Nf3", "Nc6"]);
        let via_nf3 = walk(&["Nf3", "Nc6", "e4", "e5"]);
        assert_eq!(via_e4, via_nf3);
    }

    #[test]
    fn merged_node_keeps_first_timestamp() {
        let first = Utc.with_ymd_and_hms(2021, 5, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2021, 9, 1, 12, 0, 0).unwrap();
        let mut g = PositionGraph::new(2).unwrap();
        g.add_game(&GameRecord {
            white: true,
            end_time: first,
            moves: vec!["e4".into()],
        })
        .unwrap();
        g.add_game(&GameRecord {
            white: true,
            end_time: later,
            moves: vec!["e4".into(), "e5".into()],
        })
        .unwrap();

        let after_e4 = g.node(g.node(g.white_root()).moves[0].target);
        assert_eq!(after_e4.last_played, first);
    }

    #[test]
    fn replaying_a_game_changes_nothing() {
        let mut g = PositionGraph::new(2).unwrap();
        g.add_game(&record(true, &["e4", "e5", "Nf3", "Nc6"])).unwrap();
        let snapshot = g.clone();
        g.add_game(&record(true, &["e4", "e5", "Nf3", "Nc6"])).unwrap();
        assert_eq!(g, snapshot);
    }

    #[test]
    fn illegal_move_keeps_earlier_plies_committed() {
        let mut expected = PositionGraph::new(2).unwrap();
        expected.add_game(&record(true, &["e4", "e5"])).unwrap();

        let mut g = PositionGraph::new(2).unwrap();
        let err = g
            .add_game(&record(true, &["e4", "e5", "Ke4", "Nc6"]))
            .unwrap_err();
        match err {
            GraphError::IllegalMove { san, ply, .. } => {
                assert_eq!(san, "Ke4");
                assert_eq!(ply, 3);
            }
            other => panic!("expected IllegalMove, got {other:?}"),
        }
        // Exactly the state a successful two-ply game would have produced.
        assert_eq!(g, expected);
    }

    #[test]
    fn black_games_grow_the_black_root() {
        let mut g = PositionGraph::new(2).unwrap();
        g.add_game(&record(false, &["d4", "Nf6"])).unwrap();
        assert!(g.node(g.white_root()).is_leaf());
        assert_eq!(g.node(g.black_root()).moves[0].label, "d4");
    }

    #[test]
    fn ply_strictly_increases_along_every_path() {
        let mut g = PositionGraph::new(4).unwrap();
        g.add_game(&record(true, &["e4", "e5", "Nf3", "Nc6"])).unwrap();
        g.add_game(&record(true, &["Nf3", "Nc6", "e4", "e5"])).unwrap();
        g.add_game(&record(false, &["d4", "d5", "c4", "e6"])).unwrap();

        // Depth-first walk carrying the ply number; every edge must lead
        // one ply deeper than its source was first seen at, and no node may
        // appear twice on the same path (no back-edges).
        fn walk(g: &PositionGraph, id: NodeId, path: &mut Vec<NodeId>) {
            assert!(!path.contains(&id), "cycle through {id:?}");
            path.push(id);
            for edge in &g.node(id).moves {
                walk(g, edge.target, path);
            }
            path.pop();
        }
        for root in [g.white_root(), g.black_root()] {
            walk(&g, root, &mut Vec::new());
        }
    }
}
