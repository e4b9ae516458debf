use crate::error::{Error, Result};
use crate::projection::ReferenceSystem;
use crate::types::GeoPoint;
use proj::Proj;

/// Transforms points between two reference systems
///
/// Identical source and target systems never touch PROJ.
pub struct Transformer {
    proj: Option<Proj>,
    source: ReferenceSystem,
    target: ReferenceSystem,
}

impl Transformer {
    /// Creates a new transformer from source to target reference system
    pub fn new(source: &ReferenceSystem, target: &ReferenceSystem) -> Result<Self> {
        let proj = if source == target {
            None
        } else {
            let proj = Proj::new_known_crs(source.auth_id(), target.auth_id(), None)
                .map_err(|e| Error::Projection(format!(
                    "Failed to create transform {} -> {}: {}",
                    source, target, e
                )))?;
            Some(proj)
        };

        Ok(Self {
            proj,
            source: source.clone(),
            target: target.clone(),
        })
    }

    /// Transforms a point from source to target system
    pub fn transform(&self, point: GeoPoint) -> Result<GeoPoint> {
        let Some(proj) = &self.proj else {
            return Ok(point);
        };

        let (x, y) = proj.convert((point.x, point.y))
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        if !x.is_finite() || !y.is_finite() {
            return Err(Error::Projection(format!(
                "{} has no finite image in {}", point, self.target
            )));
        }

        Ok(GeoPoint::new(x, y))
    }

    pub fn is_identity(&self) -> bool {
        self.proj.is_none()
    }

    pub fn source(&self) -> &ReferenceSystem {
        &self.source
    }

    pub fn target(&self) -> &ReferenceSystem {
        &self.target
    }
}
