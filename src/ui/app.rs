use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::scene::SceneChoice;
use crate::model::story::StoryGraph;

/* =========================
   UI State
   ========================= */

/// Everything shown in the window. Mutated only on the UI thread, only from
/// engine responses and button clicks.
#[derive(Default)]
pub struct UiState {
    pub node_id: String,
    pub text: String,
    pub choices: Vec<SceneChoice>,
    pub generating: bool,
    pub error: Option<String>,
}

/* =========================
   App
   ========================= */

pub struct StoryApp {
    pub ui: UiState,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl StoryApp {
    pub fn new(graph: Arc<StoryGraph>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(graph, cmd_rx, resp_tx);
            engine.run();
        });

        let _ = cmd_tx.send(EngineCommand::Begin);

        Self {
            ui: UiState::default(),
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

/* =========================
   eframe App
   ========================= */

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::Generating { node_id, text } => {
                    self.ui.node_id = node_id;
                    self.ui.text = text;
                    self.ui.choices.clear();
                    self.ui.generating = true;
                }

                EngineResponse::SceneReady {
                    node_id,
                    text,
                    choices,
                } => {
                    self.ui.node_id = node_id;
                    self.ui.text = text;
                    self.ui.choices = choices;
                    self.ui.generating = false;
                }

                EngineResponse::GenerationFailed { node_id, message } => {
                    // Text and choices stay exactly as they were; only the
                    // error window is added.
                    self.ui.generating = false;
                    self.ui.error = Some(format!("Node '{node_id}': {message}"));
                }
            }
        }

        super::story_panel::draw_story_panel(ctx, self);

        // A pending generation completes without any user input; keep
        // polling the channel until it lands.
        if self.ui.generating {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
