//! Edge rendering and hit-testing.
//!
//! Edges leave a node from its source handle on the left and enter the other
//! node at its target handle on the right, so the curve bows outwards on both ends.

use super::utils::{cubic_point, distance_to_segment};
use egui::{Color32, Pos2, Stroke};

/// Control points for an edge from `source` (a left handle) to `target` (a right handle).
pub fn edge_curve(source: Pos2, target: Pos2) -> [Pos2; 4] {
    let offset = ((target.x - source.x).abs() * 0.5).max(50.0);
    [
        source,
        Pos2::new(source.x - offset, source.y),
        Pos2::new(target.x + offset, target.y),
        target,
    ]
}

pub fn draw_edge(painter: &egui::Painter, source: Pos2, target: Pos2, stroke: Stroke) {
    painter.add(egui::epaint::CubicBezierShape::from_points_stroke(
        edge_curve(source, target),
        false,
        Color32::TRANSPARENT,
        stroke,
    ));
}

/// Test if a point is within `threshold` of an edge.
pub fn hit_test_edge(pos: Pos2, source: Pos2, target: Pos2, threshold: f32) -> bool {
    let curve = edge_curve(source, target);
    let steps = 24;
    let mut prev = source;
    for i in 1..=steps {
        let current = cubic_point(curve, i as f32 / steps as f32);
        if distance_to_segment(pos, prev, current) < threshold {
            return true;
        }
        prev = current;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_follows_the_curve() {
        let source = Pos2::new(0.0, 0.0);
        let target = Pos2::new(-200.0, 0.0);
        assert!(hit_test_edge(Pos2::new(-100.0, 2.0), source, target, 5.0));
        assert!(!hit_test_edge(Pos2::new(-100.0, 60.0), source, target, 5.0));
    }

    #[test]
    fn curve_leaves_source_to_the_left() {
        let curve = edge_curve(Pos2::new(100.0, 0.0), Pos2::new(300.0, 0.0));
        assert!(curve[1].x < 100.0);
        assert!(curve[2].x > 300.0);
    }
}
