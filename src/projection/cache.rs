use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;
use crate::projection::{ReferenceSystem, Transformer};
use crate::types::GeoPoint;

/// Cache of transformers keyed by (source, target) authority identifiers
///
/// Creating a PROJ transform is expensive compared to applying it, so each
/// pair is built once and reused for the lifetime of the cache.
#[derive(Default)]
pub struct TransformCache {
    transforms: DashMap<(String, String), Arc<Transformer>>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transformer for a pair, creating it on first use
    pub fn get(&self, source: &ReferenceSystem, target: &ReferenceSystem) -> Result<Arc<Transformer>> {
        let key = (source.auth_id().to_string(), target.auth_id().to_string());

        if let Some(entry) = self.transforms.get(&key) {
            return Ok(Arc::clone(entry.value()));
        }

        let transformer = Arc::new(Transformer::new(source, target)?);
        debug!(%source, %target, identity = transformer.is_identity(), "Created coordinate transform");
        self.transforms.insert(key, Arc::clone(&transformer));

        Ok(transformer)
    }

    /// Transforms a single point between two systems
    pub fn transform(
        &self,
        point: GeoPoint,
        source: &ReferenceSystem,
        target: &ReferenceSystem,
    ) -> Result<GeoPoint> {
        self.get(source, target)?.transform(point)
    }

    /// Number of cached transformers
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn clear(&self) {
        self.transforms.clear();
    }
}
