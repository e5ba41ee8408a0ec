use log::{debug, warn};

use crate::model::scene::{Resolution, SceneChoice};
use crate::model::story::{Node, StoryGraph};

/// Decide how a node is presented. Authored options always win; a hint only
/// matters when there are none.
pub fn resolve(node: &Node) -> Resolution {
    if node.has_options() {
        let choices = node
            .options
            .iter()
            .map(|opt| SceneChoice {
                label: opt.label.clone(),
                target: opt.next.clone(),
            })
            .collect();
        return Resolution::Authored {
            text: node.text.clone(),
            choices,
        };
    }

    match node.hint() {
        Some(hint) => Resolution::AwaitGeneration {
            text: node.text.clone(),
            hint: hint.to_string(),
        },
        None => Resolution::Terminal {
            text: node.text.clone(),
        },
    }
}

/// Wire generated choice labels onto the graph and assemble the presented
/// text for a hinted node.
///
/// Routing preference: non-empty `next_map` (label i -> next_map[i], extra
/// labels dropped) > `next` (every label) > loop back to this node. The
/// loopback arm is unreachable through a validated graph, which forbids a
/// hint without a route, but it stays as the defined fallback.
///
/// The player must always be able to proceed: if nothing survived routing,
/// the raw labels (if any) are routed back to this node, otherwise a single
/// "Continue" choice is synthesized.
pub fn graft_generated(
    node_id: &str,
    node: &Node,
    graph: &StoryGraph,
    scene: &str,
    labels: &[String],
) -> (String, Vec<SceneChoice>) {
    let targets: Vec<String> = match (&node.next_map, &node.next) {
        (Some(map), _) if !map.is_empty() => map.clone(),
        (_, Some(next)) => vec![next.clone(); labels.len().max(1)],
        _ => vec![node_id.to_string(); labels.len().max(1)],
    };

    let mut mapped = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        match targets.get(idx) {
            Some(target) if graph.contains(target) => mapped.push(SceneChoice {
                label: label.clone(),
                target: target.clone(),
            }),
            Some(target) => {
                warn!("dropping generated choice '{label}': unknown target '{target}'");
            }
            None => {
                debug!("dropping generated choice '{label}': no routing slot at index {idx}");
            }
        }
    }

    let mut text = node.text.clone();
    if !scene.is_empty() {
        text.push_str("\n\n");
        text.push_str(scene);
    }
    for note in diagnostic_notes(node, labels) {
        text.push('\n');
        text.push_str(note);
    }

    let choices = if !mapped.is_empty() {
        mapped
    } else if !labels.is_empty() {
        // Unroutable but readable: prefer the model's own labels, looped back
        // here, over a generic continuation.
        labels
            .iter()
            .take(2)
            .map(|label| SceneChoice {
                label: label.clone(),
                target: node_id.to_string(),
            })
            .collect()
    } else {
        vec![SceneChoice {
            label: "Continue".to_string(),
            target: node_id.to_string(),
        }]
    };

    (text, choices)
}

fn diagnostic_notes(node: &Node, labels: &[String]) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if labels.is_empty() {
        notes.push("[note] No choices could be read from the generated scene.");
    }
    if node.next_map.as_ref().is_some_and(|m| m.is_empty()) {
        notes.push("[note] This node declares an empty next_map.");
    }
    if node.next.is_none() && node.next_map.is_none() {
        notes.push("[note] No continuation target declared; choices loop back here.");
    }
    notes
}
