// Deterministic textual rendering of a position graph.
//
// Each node's children are drawn with `├───`/`└───` connectors depending on
// whether they are the last sibling. Root subtrees with zero children are
// omitted entirely. Iterative pre-order with an explicit stack.

use std::fmt::Write as _;

use crate::graph::{MoveEdge, NodeId, PositionGraph, PositionNode};

struct Item<'g> {
    edge: &'g MoveEdge,
    prefix: String,
    last: bool,
}

/// Render both root subtrees. When `include_dates` is set, leaf edges carry
/// the target's `last_played` date.
pub fn render(graph: &PositionGraph, include_dates: bool) -> String {
    let mut out = String::new();
    out.push_str("Position graph.\n");
    let _ = writeln!(out, "Depth: {}", graph.depth());
    for (heading, root) in [
        ("White positions:", graph.white_root()),
        ("Black positions:", graph.black_root()),
    ] {
        if graph.node(root).is_leaf() {
            continue;
        }
        out.push_str(heading);
        out.push('\n');
        render_subtree(graph, root, include_dates, &mut out);
    }
    out
}

fn render_subtree(graph: &PositionGraph, root: NodeId, include_dates: bool, out: &mut String) {
    let mut stack: Vec<Item<'_>> = Vec::new();
    push_children(graph.node(root), String::new(), &mut stack);
    while let Some(item) = stack.pop() {
        let target = graph.node(item.edge.target);
        let connector = if item.last { "└───" } else { "├───" };
        let _ = write!(out, "{}{} {}", item.prefix, connector, item.edge.label);
        if target.position.evaluated {
            let _ = write!(out, " -> {}", target.position.score);
        }
        if include_dates && target.is_leaf() {
            let _ = write!(out, " ({})", target.last_played.format("%d.%m.%Y"));
        }
        out.push('\n');
        let child_prefix = format!(
            "{}{}",
            item.prefix,
            if item.last { "      " } else { "│     " }
        );
        push_children(target, child_prefix, &mut stack);
    }
}

// Pushed in reverse so the pop order is edge-insertion order.
fn push_children<'g>(node: &'g PositionNode, prefix: String, stack: &mut Vec<Item<'g>>) {
    let last_index = node.moves.len().saturating_sub(1);
    for (i, edge) in node.moves.iter().enumerate().rev() {
        stack.push(Item {
            edge,
            prefix: prefix.clone(),
            last: i == last_index,
        });
    }
}
