/// A choice as presented to the player. Covers both authored options and
/// choices grafted from a generated scene; generated ones are rebuilt on
/// every visit and have no identity beyond a single presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneChoice {
    pub label: String,
    pub target: String,
}

/// What resolving a node produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Authored options presented verbatim, order preserved. The window only
    /// wires the first two to buttons; the rest stay in the data.
    Authored {
        text: String,
        choices: Vec<SceneChoice>,
    },

    /// No options and no hint: text with zero choices.
    Terminal { text: String },

    /// No options but a hint: the engine must dispatch a generation request
    /// on a background worker before choices exist.
    AwaitGeneration { text: String, hint: String },
}
