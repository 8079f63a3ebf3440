//! Plain-text rendering of laid-out trees and frames
//!
//! Column = x% of the grid width, two text rows per depth (labels, then
//! edge glyphs). Input trees must already carry layout coordinates.

use std::fmt::Write as _;

use crate::recorder::AnimationStep;
use crate::tree::{traversal, NodeId, TreeNode};

/// Draw a laid-out tree into a text grid of the given width
///
/// The highlighted node, if any, is drawn as `[value]`.
pub fn render_ascii(root: Option<&TreeNode>, width: usize, highlight: Option<NodeId>) -> String {
    let Some(root) = root else {
        return "(empty)\n".to_string();
    };

    let nodes = traversal::with_depths(Some(root));
    let depth = nodes.iter().map(|(_, d)| *d).max().unwrap_or(0);
    let mut grid = vec![vec![' '; width.max(1)]; depth * 2 + 1];

    for (node, d) in &nodes {
        let label = if Some(node.id) == highlight {
            format!("[{}]", node.value)
        } else {
            node.value.to_string()
        };
        let center = column(node.x, width);
        put_centered(&mut grid[d * 2], center, &label);

        if d * 2 + 1 < grid.len() {
            let edges = &mut grid[d * 2 + 1];
            if let Some(left) = node.left.as_deref() {
                put(edges, (center + column(left.x, width)) / 2, '/');
            }
            if let Some(right) = node.right.as_deref() {
                put(edges, (center + column(right.x, width)) / 2, '\\');
            }
        }
    }

    let mut out = String::new();
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Grid width that keeps every label apart
pub fn auto_width(root: Option<&TreeNode>) -> usize {
    let nodes = traversal::inorder(root);
    let widest = nodes
        .iter()
        .map(|n| n.value.to_string().len() + 2)
        .max()
        .unwrap_or(1);
    (nodes.len() * (widest + 1)).max(24)
}

/// Render one frame: header line, tree, and the pre-rotation tree if present
pub fn render_frame(index: usize, step: &AnimationStep) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{:<3} {:<9} {}",
        index,
        step.action_type.as_str().to_uppercase(),
        step.description
    );

    let tree = step.tree.as_deref();
    out.push_str(&render_ascii(tree, auto_width(tree), step.highlight_node_id));

    if let Some(before) = step.comparison_tree.as_deref() {
        out.push_str("  -- before rotation --\n");
        out.push_str(&render_ascii(Some(before), auto_width(Some(before)), None));
    }
    out
}

fn column(x: f64, width: usize) -> usize {
    let last = width.saturating_sub(1) as f64;
    ((x / 100.0) * last).round().clamp(0.0, last) as usize
}

fn put(row: &mut [char], col: usize, glyph: char) {
    if let Some(cell) = row.get_mut(col) {
        *cell = glyph;
    }
}

fn put_centered(row: &mut [char], center: usize, label: &str) {
    let len = label.chars().count();
    let start = center
        .saturating_sub(len / 2)
        .min(row.len().saturating_sub(len));
    for (offset, ch) in label.chars().enumerate() {
        put(row, start + offset, ch);
    }
}
