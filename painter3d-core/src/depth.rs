/// Painter's-algorithm ordering
use crate::projection::DrawTriangle;

/// Sort farthest first so nearer triangles are drawn last.
///
/// The sort is stable: triangles with equal average depth keep their mesh order.
pub fn sort_back_to_front(triangles: &mut [DrawTriangle]) {
    triangles.sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));
}

/// True when no entry is nearer than the one after it.
pub fn is_back_to_front(triangles: &[DrawTriangle]) -> bool {
    triangles
        .windows(2)
        .all(|pair| pair[0].average_depth() >= pair[1].average_depth())
}
