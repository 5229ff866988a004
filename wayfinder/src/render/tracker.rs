//! Layer diffing between consecutive render plans.

use std::collections::BTreeMap;

use super::plan::{Layer, LayerId, RenderPlan};

/// Layers to add or update, and layers to remove.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerChanges {
    pub upsert: Vec<Layer>,
    pub remove: Vec<LayerId>,
}

impl LayerChanges {
    pub fn is_empty(&self) -> bool {
        self.upsert.is_empty() && self.remove.is_empty()
    }
}

/// Remembers what is currently drawn so each new plan turns into a minimal
/// set of changes.
#[derive(Debug, Default)]
pub struct LayerTracker {
    drawn: BTreeMap<LayerId, Layer>,
}

impl LayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `plan` with what is drawn and record it as drawn.
    ///
    /// Removals are listed before any upsert is applied, so switching from
    /// live to test layers never leaves both visible for the same role.
    pub fn diff(&mut self, plan: &RenderPlan) -> LayerChanges {
        let next: BTreeMap<LayerId, Layer> = plan
            .layers
            .iter()
            .map(|layer| (layer.id, layer.clone()))
            .collect();

        let remove = self
            .drawn
            .keys()
            .filter(|id| !next.contains_key(id))
            .copied()
            .collect();

        let upsert = next
            .values()
            .filter(|layer| self.drawn.get(&layer.id) != Some(layer))
            .cloned()
            .collect();

        self.drawn = next;
        LayerChanges { upsert, remove }
    }

    /// Ids currently drawn.
    pub fn drawn(&self) -> impl Iterator<Item = &LayerId> {
        self.drawn.keys()
    }

    pub fn reset(&mut self) {
        self.drawn.clear();
    }
}
