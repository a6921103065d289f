use std::collections::BTreeMap;

use crate::ir::{Step, StepId};
use crate::layout::LayoutNode;

/// `step_id -> is selected` for every node. A selection that matches no node
/// highlights nothing.
pub fn highlight_selection(
    nodes: &[LayoutNode],
    selected: Option<StepId>,
) -> BTreeMap<StepId, bool> {
    nodes
        .iter()
        .map(|node| (node.step_id, Some(node.step_id) == selected))
        .collect()
}

/// Routes a click on the node for `step_id` to `on_click` with the full step
/// record. Returns whether a step was found.
pub fn dispatch_click<F>(steps: &[Step], step_id: StepId, mut on_click: F) -> bool
where
    F: FnMut(&Step),
{
    match steps.iter().find(|step| step.id == step_id) {
        Some(step) => {
            on_click(step);
            true
        }
        None => false,
    }
}
