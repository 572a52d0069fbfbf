// Lazy enumeration of stored variations.
//
// An explicit-stack depth-first cursor rather than recursion, so very deep
// or wide repertoires cannot exhaust the native call stack. Each iterator
// instance is an independent, finite traversal: white root's children
// first, then black root's, siblings in edge-insertion order.

use crate::graph::{NodeId, PositionGraph};

/// One stack entry: a node and how many of its children have been entered.
#[derive(Debug)]
struct Frame {
    node: NodeId,
    next_child: usize,
    /// Whether entering this frame pushed a move label onto the path.
    /// False only for root frames.
    labeled: bool,
}

/// Iterator over every root-to-leaf move sequence in a [`PositionGraph`].
///
/// Obtained from [`PositionGraph::variations`]. Not restartable; drain it
/// to completion or drop it. Distinct instances over the same graph do not
/// interfere — traversal is read-only.
#[derive(Debug)]
pub struct Variations<'g> {
    graph: &'g PositionGraph,
    stack: Vec<Frame>,
    path: Vec<String>,
    /// Roots not yet traversed, in fixed order: white, then black.
    pending_roots: std::vec::IntoIter<NodeId>,
}

impl<'g> Variations<'g> {
    pub(crate) fn new(graph: &'g PositionGraph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            path: Vec::new(),
            pending_roots: vec![graph.white_root(), graph.black_root()].into_iter(),
        }
    }

    fn pop_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if frame.labeled {
                self.path.pop();
            }
        }
    }
}

impl Iterator for Variations<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                // Current root exhausted; start the next one.
                let root = self.pending_roots.next()?;
                self.stack.push(Frame {
                    node: root,
                    next_child: 0,
                    labeled: false,
                });
                continue;
            };
            let node = self.graph.node(frame.node);
            if node.is_leaf() && frame.labeled {
                let variation = self.path.clone();
                self.pop_frame();
                return Some(variation);
            }
            match node.moves.get(frame.next_child) {
                Some(edge) => {
                    frame.next_child += 1;
                    self.path.push(edge.label.clone());
                    self.stack.push(Frame {
                        node: edge.target,
                        next_child: 0,
                        labeled: true,
                    });
                }
                None => self.pop_frame(),
            }
        }
    }
}
