use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::engine::llm_client;
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::resolver;
use crate::model::scene::Resolution;
use crate::model::scene_decode::decode_scene;
use crate::model::story::{Node, StoryGraph, ENTRY_NODE};

/// Drives traversal of the story graph on its own thread. The only mutable
/// state is the current node id; the graph itself is immutable and shared
/// with generation workers.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    graph: Arc<StoryGraph>,
    current: String,
}

impl Engine {
    pub fn new(
        graph: Arc<StoryGraph>,
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
    ) -> Self {
        Self {
            rx,
            tx,
            graph,
            current: ENTRY_NODE.to_string(),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::Begin => {
                    info!("Starting at node '{}'", self.current);
                    self.present_current();
                }

                EngineCommand::Choose { target } => {
                    // Self-loops are legal; routed fallbacks rely on them.
                    if !self.graph.contains(&target) {
                        error!("ignoring choice to unknown node '{target}'");
                        continue;
                    }
                    info!("Transition: {} -> {}", self.current, target);
                    self.current = target;
                    self.present_current();
                }
            }
        }
    }

    fn present_current(&self) {
        let node_id = self.current.clone();
        let Some(node) = self.graph.get(&node_id) else {
            error!("current node '{node_id}' missing from graph");
            return;
        };

        match resolver::resolve(node) {
            Resolution::Authored { text, choices } => {
                let _ = self.tx.send(EngineResponse::SceneReady {
                    node_id,
                    text,
                    choices,
                });
            }

            Resolution::Terminal { text } => {
                let _ = self.tx.send(EngineResponse::SceneReady {
                    node_id,
                    text,
                    choices: Vec::new(),
                });
            }

            Resolution::AwaitGeneration { text, hint } => {
                // Indicator first, then the worker: channel order guarantees
                // the window never shows a result before "generating".
                let _ = self.tx.send(EngineResponse::Generating {
                    node_id: node_id.clone(),
                    text,
                });
                self.spawn_generation(node_id, node.clone(), hint);
            }
        }
    }

    /// Each request is an independent worker; navigating away and back starts
    /// a second one, and whichever answer lands last wins.
    fn spawn_generation(&self, node_id: String, node: Node, hint: String) {
        let graph = Arc::clone(&self.graph);
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            info!("Generation request for node '{node_id}'");
            match generate_scene(&node, &hint) {
                Ok((scene, labels)) => {
                    debug!("Parsed {} choice label(s): {labels:?}", labels.len());
                    let (text, choices) =
                        resolver::graft_generated(&node_id, &node, &graph, &scene, &labels);
                    let _ = tx.send(EngineResponse::SceneReady {
                        node_id,
                        text,
                        choices,
                    });
                }
                Err(e) => {
                    error!("Generation failed for node '{node_id}': {e:#}");
                    let _ = tx.send(EngineResponse::GenerationFailed {
                        node_id,
                        message: format!("{e:#}"),
                    });
                }
            }
        });
    }
}

// Runs on the worker thread: network call plus lenient decoding. What to do
// with the result is the resolver's business, not the worker's.
fn generate_scene(node: &Node, hint: &str) -> Result<(String, Vec<String>)> {
    let prompt = PromptBuilder::build(&node.text, hint);
    let raw = llm_client::request_scene(&prompt).context("scene generation request failed")?;
    debug!("Model returned {} chars", raw.len());
    Ok(decode_scene(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn spawn_engine(story: &str) -> (Sender<EngineCommand>, Receiver<EngineResponse>) {
        let graph = Arc::new(StoryGraph::parse(story).unwrap());
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut engine = Engine::new(graph, cmd_rx, resp_tx);
            engine.run();
        });
        (cmd_tx, resp_rx)
    }

    fn recv(rx: &Receiver<EngineResponse>) -> EngineResponse {
        rx.recv_timeout(Duration::from_secs(2)).expect("engine response")
    }

    const STORY: &str = r#"{
        "start": {
            "text": "A fork in the road.",
            "options": [
                { "label": "Go left", "next": "left" },
                { "label": "Go right", "next": "right" }
            ]
        },
        "left": { "text": "A dead end." },
        "right": {
            "text": "A narrow track.",
            "options": [ { "label": "Turn back", "next": "start" } ]
        }
    }"#;

    #[test]
    fn begin_presents_the_entry_node() {
        let (cmd_tx, resp_rx) = spawn_engine(STORY);
        cmd_tx.send(EngineCommand::Begin).unwrap();

        let EngineResponse::SceneReady { node_id, text, choices } = recv(&resp_rx) else {
            panic!("expected a ready scene");
        };
        assert_eq!(node_id, "start");
        assert_eq!(text, "A fork in the road.");
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[1].label, "Go right");
    }

    #[test]
    fn choosing_swaps_the_current_node() {
        let (cmd_tx, resp_rx) = spawn_engine(STORY);
        cmd_tx.send(EngineCommand::Begin).unwrap();
        recv(&resp_rx);

        cmd_tx
            .send(EngineCommand::Choose { target: "left".to_string() })
            .unwrap();

        let EngineResponse::SceneReady { node_id, choices, .. } = recv(&resp_rx) else {
            panic!("expected a ready scene");
        };
        assert_eq!(node_id, "left");
        assert!(choices.is_empty());
    }

    #[test]
    fn unknown_choice_targets_are_ignored() {
        let (cmd_tx, resp_rx) = spawn_engine(STORY);
        cmd_tx.send(EngineCommand::Begin).unwrap();
        recv(&resp_rx);

        cmd_tx
            .send(EngineCommand::Choose { target: "nowhere".to_string() })
            .unwrap();
        cmd_tx
            .send(EngineCommand::Choose { target: "right".to_string() })
            .unwrap();

        // The bad target produced no response; the next one did.
        let EngineResponse::SceneReady { node_id, .. } = recv(&resp_rx) else {
            panic!("expected a ready scene");
        };
        assert_eq!(node_id, "right");
    }

    #[test]
    fn self_loops_are_legal() {
        let (cmd_tx, resp_rx) = spawn_engine(STORY);
        cmd_tx.send(EngineCommand::Begin).unwrap();
        recv(&resp_rx);

        cmd_tx
            .send(EngineCommand::Choose { target: "start".to_string() })
            .unwrap();

        let EngineResponse::SceneReady { node_id, .. } = recv(&resp_rx) else {
            panic!("expected a ready scene");
        };
        assert_eq!(node_id, "start");
    }
}
