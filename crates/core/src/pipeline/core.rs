// Pipeline core - pure logic framework

use super::keys::TypedKey;
use crate::error::{ProcessingError, Result};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Pipeline data map for passing data between nodes
#[derive(Clone)]
pub struct PipeMap {
    data: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl PipeMap {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert a value with a typed key (compile-time type checking)
    pub fn insert_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>, value: T) {
        self.data.insert(key.name().to_string(), Arc::new(value));
    }

    /// Builder-style insert
    pub fn with<T: Any + Send + Sync>(mut self, key: TypedKey<T>, value: T) -> Self {
        self.insert_typed(key, value);
        self
    }

    /// Get a value with a typed key (compile-time type checking)
    pub fn get_typed<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Option<&T> {
        self.data
            .get(key.name())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Get a value a node cannot run without
    pub fn require<T: Any + Send + Sync>(&self, node: &str, key: TypedKey<T>) -> Result<&T> {
        self.get_typed(key).ok_or_else(|| {
            ProcessingError::MissingInput {
                node: node.to_string(),
                required: key.name().to_string(),
            }
            .into()
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl Default for PipeMap {
    fn default() -> Self {
        Self::new()
    }
}

// Values are type-erased, so only the keys are shown.
impl fmt::Debug for PipeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("PipeMap").field("keys", &keys).finish()
    }
}

/// Pipeline node trait
#[async_trait]
pub trait PipeNode: Send + Sync {
    fn name(&self) -> String;

    /// Keys read by this node; a trailing `?` marks an optional input
    fn input(&self) -> Vec<String>;

    fn output(&self) -> Vec<String>;

    async fn process(&self, data: PipeMap) -> Result<PipeMap>;

    fn validate_input(&self, data: &PipeMap) -> std::result::Result<(), ProcessingError> {
        for input in self.input() {
            if input.ends_with('?') {
                continue;
            }
            if !data.contains_key(&input) {
                return Err(ProcessingError::MissingInput {
                    node: self.name(),
                    required: input,
                });
            }
        }
        Ok(())
    }

    fn validate_output(&self, data: &PipeMap) -> std::result::Result<(), ProcessingError> {
        // All outputs are required
        for output in self.output() {
            if !data.contains_key(&output) {
                return Err(ProcessingError::MissingOutput {
                    node: self.name(),
                    required: output,
                });
            }
        }
        Ok(())
    }
}

/// Pipeline - orchestrates execution of nodes
pub struct Pipeline {
    name: String,
    nodes: Vec<Box<dyn PipeNode>>,
    external_inputs: Vec<String>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            external_inputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node names in execution order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name()).collect()
    }

    /// Set external inputs that will be provided via initial PipeMap
    pub fn with_external_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Append a node, checking its required inputs are produced upstream
    pub fn add_node(mut self, node: Box<dyn PipeNode>) -> std::result::Result<Self, ProcessingError> {
        let mut available: Vec<String> = self.external_inputs.clone();
        for existing in &self.nodes {
            available.extend(existing.output());
        }

        let missing: Vec<String> = node
            .input()
            .into_iter()
            .filter(|input| !input.ends_with('?'))
            .filter(|input| !available.contains(input))
            .collect();

        if !missing.is_empty() {
            return Err(ProcessingError::config(format!(
                "Node '{}' requires inputs {:?} that are not available.\n\
                 Available sources (previous node outputs + external inputs): {:?}",
                node.name(),
                missing,
                available
            )));
        }

        debug!(
            "Adding node '{}' to pipeline '{}'. Inputs: {:?}",
            node.name(),
            self.name,
            node.input()
        );
        self.nodes.push(node);
        Ok(self)
    }

    pub async fn execute(&self, mut data: PipeMap) -> Result<PipeMap> {
        debug!(
            "Executing pipeline '{}' with {} nodes",
            self.name,
            self.nodes.len()
        );

        for (index, node) in self.nodes.iter().enumerate() {
            debug!("Processing node {}: '{}'", index + 1, node.name());
            node.validate_input(&data)?;
            data = node.process(data).await?;
            node.validate_output(&data)?;
        }

        debug!("Pipeline '{}' executed successfully", self.name);
        Ok(data)
    }
}
