use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Node id every traversal starts from.
pub const ENTRY_NODE: &str = "start";

/// The validated story graph: node id -> node.
/// Built once at startup and READ-ONLY afterwards; generation workers share
/// it behind an Arc.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryGraph {
    nodes: HashMap<String, Node>,
}

/// An authored unit of narrative content plus its routing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub text: String,

    /// Authored choices. Non-empty means this node never triggers generation.
    pub options: Vec<Choice>,

    /// Steering hint for the generated continuation. Only meaningful when
    /// `options` is empty; an empty string counts as no hint.
    pub next_hint: Option<String>,

    /// Single default continuation target for generated choices.
    pub next: Option<String>,

    /// Per-index routing targets for generated choices. `Some(vec![])` is
    /// kept distinct from `None` so the empty case can be surfaced to the
    /// player as a diagnostic note.
    pub next_map: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub next: String,
}

impl Node {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn hint(&self) -> Option<&str> {
        self.next_hint.as_deref().filter(|h| !h.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("story file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read story file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("story file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("top-level story JSON must be an object mapping id -> node")]
    NotAnObject,

    #[error("node '{0}' is not an object")]
    NodeNotAnObject(String),

    #[error("node '{0}' must have a non-empty string 'text'")]
    BadText(String),

    #[error("node '{0}' 'options' must be a list if present")]
    OptionsNotAList(String),

    #[error("node '{node}' option {index} must be an object with string 'label' and 'next'")]
    MalformedOption { node: String, index: usize },

    #[error("node '{node}' option points to unknown node '{target}'")]
    UnknownOptionTarget { node: String, target: String },

    #[error("node '{0}' 'next_hint' must be a string")]
    BadHint(String),

    #[error("node '{0}' 'next' must be a string")]
    BadNext(String),

    #[error("node '{node}' 'next' points to unknown node '{target}'")]
    UnknownNextTarget { node: String, target: String },

    #[error("node '{0}' 'next_map' must be a list of strings")]
    BadNextMap(String),

    #[error("node '{node}' next_map points to unknown node '{target}'")]
    UnknownNextMapTarget { node: String, target: String },

    #[error("node '{0}' has next_hint but no 'next_map' or 'next' to route choices")]
    UnroutableHint(String),
}

impl StoryGraph {
    /// Read and validate the story file. Any violation is fatal to startup;
    /// there is no partial-operation mode for a broken graph.
    pub fn load(path: &Path) -> Result<Self, StoryError> {
        if !path.exists() {
            return Err(StoryError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| StoryError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Decode raw JSON into typed nodes, then check every routing reference.
    /// Downstream code never sees an untyped map.
    pub fn parse(raw: &str) -> Result<Self, StoryError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(entries) = value else {
            return Err(StoryError::NotAnObject);
        };

        let mut nodes = HashMap::new();
        for (id, entry) in &entries {
            nodes.insert(id.clone(), decode_node(id, entry)?);
        }

        let graph = Self { nodes };
        graph.check_targets()?;
        graph.check_hint_routing()?;
        Ok(graph)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    fn check_targets(&self) -> Result<(), StoryError> {
        for (id, node) in &self.nodes {
            for opt in &node.options {
                if !self.contains(&opt.next) {
                    return Err(StoryError::UnknownOptionTarget {
                        node: id.clone(),
                        target: opt.next.clone(),
                    });
                }
            }

            if let Some(next) = &node.next {
                if !self.contains(next) {
                    return Err(StoryError::UnknownNextTarget {
                        node: id.clone(),
                        target: next.clone(),
                    });
                }
            }

            if let Some(map) = &node.next_map {
                for target in map {
                    if !self.contains(target) {
                        return Err(StoryError::UnknownNextMapTarget {
                            node: id.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // A hint with nowhere to send the player would leave generated choices
    // unroutable, so it is rejected up front.
    fn check_hint_routing(&self) -> Result<(), StoryError> {
        for (id, node) in &self.nodes {
            let map_empty = node.next_map.as_ref().map_or(true, |m| m.is_empty());
            if !node.has_options() && node.hint().is_some() && map_empty && node.next.is_none() {
                return Err(StoryError::UnroutableHint(id.clone()));
            }
        }
        Ok(())
    }
}

fn decode_node(id: &str, entry: &Value) -> Result<Node, StoryError> {
    let Value::Object(fields) = entry else {
        return Err(StoryError::NodeNotAnObject(id.to_string()));
    };

    let text = fields
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| StoryError::BadText(id.to_string()))?
        .to_string();

    let options = match fields.get("options") {
        None => Vec::new(),
        Some(Value::Array(items)) => decode_options(id, items)?,
        Some(_) => return Err(StoryError::OptionsNotAList(id.to_string())),
    };

    let next_hint = match fields.get("next_hint") {
        None => None,
        Some(Value::String(hint)) => Some(hint.clone()),
        Some(_) => return Err(StoryError::BadHint(id.to_string())),
    };

    let next = match fields.get("next") {
        None => None,
        Some(Value::String(target)) => Some(target.clone()),
        Some(_) => return Err(StoryError::BadNext(id.to_string())),
    };

    let next_map = match fields.get("next_map") {
        None => None,
        Some(Value::Array(items)) => {
            let mut targets = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(target) = item else {
                    return Err(StoryError::BadNextMap(id.to_string()));
                };
                targets.push(target.clone());
            }
            Some(targets)
        }
        Some(_) => return Err(StoryError::BadNextMap(id.to_string())),
    };

    Ok(Node {
        text,
        options,
        next_hint,
        next,
        next_map,
    })
}

fn decode_options(id: &str, items: &[Value]) -> Result<Vec<Choice>, StoryError> {
    let mut options = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let malformed = || StoryError::MalformedOption {
            node: id.to_string(),
            index,
        };

        let Value::Object(fields) = item else {
            return Err(malformed());
        };
        let label = fields.get("label").and_then(Value::as_str).ok_or_else(malformed)?;
        let next = fields.get("next").and_then(Value::as_str).ok_or_else(malformed)?;

        options.push(Choice {
            label: label.to_string(),
            next: next.to_string(),
        });
    }
    Ok(options)
}

/// Story file lives next to the executable, like a save file would; fall back
/// to the working directory for `cargo run`.
pub fn default_story_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("story.json")))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from("story.json"))
}
