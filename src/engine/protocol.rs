use crate::model::scene::SceneChoice;

pub enum EngineCommand {
    Begin,
    Choose { target: String },
}

pub enum EngineResponse {
    /// Sent before the generation worker is spawned so the indicator always
    /// precedes the result in the channel.
    Generating { node_id: String, text: String },

    SceneReady {
        node_id: String,
        text: String,
        choices: Vec<SceneChoice>,
    },

    GenerationFailed { node_id: String, message: String },
}
