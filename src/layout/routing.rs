use crate::config::LayoutConfig;
use crate::ir::Direction;

const EPS: f32 = 1e-4;

/// Polyline for one vertex chain. The line leaves the source on its
/// outgoing side, crosses each virtual slot at its layer boundaries and
/// enters the target on its incoming side.
pub(super) fn route_chain(
    chain: &[usize],
    coords: &[(f32, f32)],
    config: &LayoutConfig,
) -> Vec<(f32, f32)> {
    if chain.len() < 2 {
        return Vec::new();
    }
    let (Some(&first), Some(&last)) = (chain.first(), chain.last()) else {
        return Vec::new();
    };
    let (Some(&source), Some(&target)) = (coords.get(first), coords.get(last)) else {
        return Vec::new();
    };
    let half = half_main_extent(config);

    let mut points = Vec::with_capacity(chain.len() * 2);
    points.push(exit_point(source, half, config.direction));
    for vertex in &chain[1..chain.len() - 1] {
        let Some(&center) = coords.get(*vertex) else {
            continue;
        };
        points.push(entry_point(center, half, config.direction));
        points.push(exit_point(center, half, config.direction));
    }
    points.push(entry_point(target, half, config.direction));
    compress_path(&points)
}

fn half_main_extent(config: &LayoutConfig) -> f32 {
    match config.direction {
        Direction::LeftRight => config.node_width / 2.0,
        Direction::TopDown => config.node_height / 2.0,
    }
}

fn exit_point(center: (f32, f32), half: f32, direction: Direction) -> (f32, f32) {
    match direction {
        Direction::LeftRight => (center.0 + half, center.1),
        Direction::TopDown => (center.0, center.1 + half),
    }
}

fn entry_point(center: (f32, f32), half: f32, direction: Direction) -> (f32, f32) {
    match direction {
        Direction::LeftRight => (center.0 - half, center.1),
        Direction::TopDown => (center.0, center.1 - half),
    }
}

/// Drops repeated points and interior points lying on a straight run.
pub(super) fn compress_path(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    out.push(points[0]);
    for idx in 1..points.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = points[idx];
        if (curr.0 - prev.0).abs() <= EPS && (curr.1 - prev.1).abs() <= EPS {
            continue;
        }
        let next = points[idx + 1];
        let dx1 = curr.0 - prev.0;
        let dy1 = curr.1 - prev.1;
        let dx2 = next.0 - curr.0;
        let dy2 = next.1 - curr.1;
        if (dx1 * dy2 - dy1 * dx2).abs() <= EPS && dx1 * dx2 + dy1 * dy2 >= 0.0 {
            continue;
        }
        out.push(curr);
    }
    let last = points[points.len() - 1];
    let tail = out[out.len() - 1];
    if (last.0 - tail.0).abs() > EPS || (last.1 - tail.1).abs() > EPS {
        out.push(last);
    }
    out
}

pub fn path_bend_count(points: &[(f32, f32)]) -> usize {
    if points.len() < 3 {
        return 0;
    }
    let mut bends = 0usize;
    for window in points.windows(3) {
        let (p0, p1, p2) = (window[0], window[1], window[2]);
        let dx1 = p1.0 - p0.0;
        let dy1 = p1.1 - p0.1;
        let dx2 = p2.0 - p1.0;
        let dy2 = p2.1 - p1.1;
        if (dx1.abs() <= EPS && dy1.abs() <= EPS) || (dx2.abs() <= EPS && dy2.abs() <= EPS) {
            continue;
        }
        if (dx1 * dy2 - dy1 * dx2).abs() > EPS {
            bends += 1;
        }
    }
    bends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_link_is_two_points() {
        let config = LayoutConfig::default();
        let coords = vec![(100.0, 36.0), (380.0, 36.0)];
        let points = route_chain(&[0, 1], &coords, &config);
        assert_eq!(points, vec![(200.0, 36.0), (280.0, 36.0)]);
    }

    #[test]
    fn straight_virtual_chain_collapses() {
        let config = LayoutConfig::default();
        let coords = vec![(100.0, 36.0), (380.0, 36.0), (660.0, 36.0)];
        let points = route_chain(&[0, 1, 2], &coords, &config);
        assert_eq!(points, vec![(200.0, 36.0), (560.0, 36.0)]);
    }

    #[test]
    fn offset_virtual_slot_bends_at_layer_boundaries() {
        let config = LayoutConfig::default();
        let coords = vec![(100.0, 36.0), (380.0, 148.0), (660.0, 36.0)];
        let points = route_chain(&[0, 1, 2], &coords, &config);
        assert_eq!(
            points,
            vec![(200.0, 36.0), (280.0, 148.0), (480.0, 148.0), (560.0, 36.0)]
        );
        assert_eq!(path_bend_count(&points), 2);
    }

    #[test]
    fn top_down_routes_vertically() {
        let config = LayoutConfig {
            direction: Direction::TopDown,
            ..LayoutConfig::default()
        };
        let coords = vec![(100.0, 36.0), (100.0, 188.0)];
        let points = route_chain(&[0, 1], &coords, &config);
        assert_eq!(points, vec![(100.0, 72.0), (100.0, 152.0)]);
    }

    #[test]
    fn compress_keeps_endpoints() {
        let points = vec![(0.0, 0.0), (0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 5.0)];
        assert_eq!(compress_path(&points), vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)]);
    }
}
