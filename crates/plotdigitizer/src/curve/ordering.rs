//! Left-to-right ordering of curve vertices.
//!
//! Vertices are grouped by column. The first column is kept whole in
//! top-to-bottom order. Every later column is chained greedily, each pick
//! taking the vertex closest in `y` to the previously placed one, and then
//! reduced to its first and last vertex: intermediate vertices of one
//! column lie on a vertical run and add no information.

use crate::types::PixelPoint;

/// Order curve vertices by column with greedy `y` continuity.
pub fn order_curve_points(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.x);

    let mut out: Vec<PixelPoint> = Vec::with_capacity(sorted.len());
    for (i, group) in sorted.chunk_by(|a, b| a.x == b.x).enumerate() {
        if i == 0 {
            let mut first = group.to_vec();
            first.sort_by_key(|p| p.y);
            out.extend(first);
            continue;
        }

        let chain = greedy_chain(group, out[out.len() - 1].y);
        match chain.as_slice() {
            [] => {}
            [only] => out.push(*only),
            [head, .., tail] => {
                out.push(*head);
                out.push(*tail);
            }
        }
    }
    out
}

/// Repeatedly take the remaining point nearest in `y` to the last one
/// placed; ties go to the earliest remaining point.
fn greedy_chain(group: &[PixelPoint], start_y: i32) -> Vec<PixelPoint> {
    let mut remaining = group.to_vec();
    let mut chain = Vec::with_capacity(remaining.len());
    let mut last_y = start_y;
    while !remaining.is_empty() {
        let mut best = 0;
        for (k, p) in remaining.iter().enumerate().skip(1) {
            if (p.y - last_y).abs() < (remaining[best].y - last_y).abs() {
                best = k;
            }
        }
        let p = remaining.remove(best);
        last_y = p.y;
        chain.push(p);
    }
    chain
}
