//! Dotted-name node tree shared by the bundled engines

use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::mdc::ThreadLocalMdc;
use super::traits::{DiagnosticContext, EngineLogger};
use crate::level::EngineLevel;

/// Where finished records go once the hierarchy has resolved them
pub(super) trait Sink: Send + Sync {
    fn emit(
        &self,
        logger: &str,
        level: EngineLevel,
        text: &str,
        error: Option<&(dyn Error + 'static)>,
        context: &dyn DiagnosticContext,
    );
}

struct Node {
    name: String,
    level: RwLock<Option<EngineLevel>>,
}

impl Node {
    fn new(name: &str, level: Option<EngineLevel>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            level: RwLock::new(level),
        })
    }
}

/// Name of the hierarchy root; every other name descends from it
const ROOT: &str = "";

/// Nearest ancestor name, `None` at the root
fn parent_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    Some(name.rfind('.').map_or(ROOT, |split| &name[..split]))
}

/// Node table plus sink; one per engine instance.
///
/// The root node always carries a level (default `Debug`), which makes
/// effective-level resolution total.
pub(super) struct Hierarchy {
    nodes: Mutex<HashMap<String, Arc<Node>>>,
    sink: Box<dyn Sink>,
    mdc: Arc<ThreadLocalMdc>,
}

impl Hierarchy {
    pub(super) fn new(sink: Box<dyn Sink>) -> Arc<Self> {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT.to_string(), Node::new(ROOT, Some(EngineLevel::Debug)));
        Arc::new(Self {
            nodes: Mutex::new(nodes),
            sink,
            mdc: Arc::new(ThreadLocalMdc::new()),
        })
    }

    /// Engine logger handle for `name`, creating the node and any
    /// missing ancestors
    pub(super) fn handle(hierarchy: &Arc<Self>, name: &str) -> Arc<dyn EngineLogger> {
        Arc::new(Handle {
            hierarchy: hierarchy.clone(),
            node: hierarchy.node(name),
        })
    }

    pub(super) fn mdc(&self) -> Arc<dyn DiagnosticContext> {
        self.mdc.clone()
    }

    fn node(&self, name: &str) -> Arc<Node> {
        let mut nodes = self.nodes.lock();
        if let Some(node) = nodes.get(name) {
            return node.clone();
        }
        // materialize missing ancestors so parent walks see the full chain
        let mut ancestor = parent_name(name);
        while let Some(ancestor_name) = ancestor {
            if nodes.contains_key(ancestor_name) {
                break;
            }
            nodes.insert(ancestor_name.to_string(), Node::new(ancestor_name, None));
            ancestor = parent_name(ancestor_name);
        }
        let node = Node::new(name, None);
        nodes.insert(name.to_string(), node.clone());
        node
    }

    fn effective_level(&self, name: &str) -> EngineLevel {
        let nodes = self.nodes.lock();
        let mut current = Some(name);
        while let Some(node_name) = current {
            if let Some(node) = nodes.get(node_name) {
                if let Some(level) = *node.level.read() {
                    return level;
                }
            }
            current = parent_name(node_name);
        }
        // unreachable in practice: the root node always carries a level
        EngineLevel::Debug
    }
}

struct Handle {
    hierarchy: Arc<Hierarchy>,
    node: Arc<Node>,
}

impl EngineLogger for Handle {
    fn name(&self) -> &str {
        &self.node.name
    }

    fn parent(&self) -> Option<Arc<dyn EngineLogger>> {
        parent_name(&self.node.name).map(|name| Hierarchy::handle(&self.hierarchy, name))
    }

    fn set_level(&self, level: EngineLevel) {
        *self.node.level.write() = Some(level);
    }

    fn effective_level(&self) -> EngineLevel {
        self.hierarchy.effective_level(&self.node.name)
    }

    fn enabled_for(&self, level: EngineLevel) -> bool {
        level >= self.effective_level()
    }

    fn log(&self, level: EngineLevel, text: &str, error: Option<&(dyn Error + 'static)>) {
        self.hierarchy
            .sink
            .emit(&self.node.name, level, text, error, &*self.hierarchy.mdc);
    }
}
