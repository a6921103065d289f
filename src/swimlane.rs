use serde::Serialize;

use crate::config::LayoutConfig;
use crate::ir::Step;
use crate::layout::LayoutNode;
use crate::theme::Theme;

/// Background band behind the steps of one parallel group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swimlane {
    pub group_label: String,
    pub min_y: f32,
    pub max_y: f32,
    pub color: String,
}

/// One band per distinct group, in order of first appearance across `nodes`.
///
/// `nodes` and `steps` are paired by position, which is how the layout engine
/// emits them. Colors cycle through the theme palette by that same order.
pub fn compute_swimlanes(
    nodes: &[LayoutNode],
    steps: &[Step],
    config: &LayoutConfig,
    theme: &Theme,
) -> Vec<Swimlane> {
    // Bands never shrink below their members' centers.
    let pad = (config.node_height / 2.0 + config.swimlane.margin).max(0.0);
    let mut lanes: Vec<Swimlane> = Vec::new();

    for (node, step) in nodes.iter().zip(steps) {
        let Some(group) = step.group() else {
            continue;
        };
        match lanes.iter_mut().find(|lane| lane.group_label == group) {
            Some(lane) => {
                lane.min_y = lane.min_y.min(node.y - pad);
                lane.max_y = lane.max_y.max(node.y + pad);
            }
            None => {
                let color = theme.swimlane_color(lanes.len());
                lanes.push(Swimlane {
                    group_label: group.to_string(),
                    min_y: node.y - pad,
                    max_y: node.y + pad,
                    color,
                });
            }
        }
    }
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(step_id: i64, y: f32) -> LayoutNode {
        LayoutNode { step_id, x: 0.0, y }
    }

    #[test]
    fn bands_enclose_members_with_margin() {
        let steps = vec![
            Step::new(1, 0).in_group("tests"),
            Step::new(2, 1),
            Step::new(3, 2).in_group("tests"),
        ];
        let nodes = vec![node(1, 50.0), node(2, 500.0), node(3, 250.0)];
        let config = LayoutConfig::default();
        let lanes = compute_swimlanes(&nodes, &steps, &config, &Theme::default());
        assert_eq!(lanes.len(), 1);
        let pad = config.node_height / 2.0 + config.swimlane.margin;
        assert_eq!(lanes[0].min_y, 50.0 - pad);
        assert_eq!(lanes[0].max_y, 250.0 + pad);
    }

    #[test]
    fn colors_follow_first_appearance() {
        let steps = vec![
            Step::new(1, 0).in_group("zeta"),
            Step::new(2, 1).in_group("alpha"),
            Step::new(3, 2).in_group("zeta"),
        ];
        let nodes = vec![node(1, 0.0), node(2, 100.0), node(3, 200.0)];
        let theme = Theme::default();
        let lanes = compute_swimlanes(&nodes, &steps, &LayoutConfig::default(), &theme);
        let labels: Vec<&str> = lanes.iter().map(|lane| lane.group_label.as_str()).collect();
        assert_eq!(labels, vec!["zeta", "alpha"]);
        assert_eq!(lanes[0].color, theme.swimlane_color(0));
        assert_eq!(lanes[1].color, theme.swimlane_color(1));
    }

    #[test]
    fn negative_margin_still_encloses_members() {
        let steps = vec![
            Step::new(1, 0).in_group("deploy"),
            Step::new(2, 1).in_group("deploy"),
        ];
        let nodes = vec![node(1, 50.0), node(2, 60.0)];
        let mut config = LayoutConfig::default();
        config.swimlane.margin = -100.0;
        let lanes = compute_swimlanes(&nodes, &steps, &config, &Theme::default());
        assert_eq!(lanes.len(), 1);
        assert!(lanes[0].min_y <= lanes[0].max_y);
        assert!(lanes[0].min_y <= 50.0 && 60.0 <= lanes[0].max_y);
    }

    #[test]
    fn no_groups_no_lanes() {
        let steps = vec![Step::new(1, 0)];
        let lanes = compute_swimlanes(
            &[node(1, 0.0)],
            &steps,
            &LayoutConfig::default(),
            &Theme::default(),
        );
        assert!(lanes.is_empty());
    }
}
