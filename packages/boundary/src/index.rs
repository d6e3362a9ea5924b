//! Per-level envelope index used for viewport culling.

use std::sync::Arc;

use business_map_boundary_models::{BoundaryFeature, BoundaryLevel};
use business_map_viewport_models::BoundingBox;
use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::raw_envelope;

/// A feature envelope stored in the R-tree, tagged with the feature's
/// position in its collection so results can be put back in input order.
struct EnvelopeEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for EnvelopeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(bbox: &BoundingBox) -> AABB<[f64; 2]> {
    let bbox = bbox.normalized();
    AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north])
}

/// Features of `features` whose geometry bounding box intersects
/// `viewport`, in input order.
///
/// Features with missing or unparseable geometry are skipped; they never
/// abort the computation. A viewport with swapped corners is read as the
/// box those corners span.
#[must_use]
pub fn compute_visible<'a>(
    features: &'a [BoundaryFeature],
    viewport: &BoundingBox,
) -> Vec<&'a BoundaryFeature> {
    let viewport = viewport.normalized();
    features
        .iter()
        .filter(|f| {
            f.geometry
                .as_ref()
                .and_then(raw_envelope)
                .is_some_and(|env| env.intersects(&viewport))
        })
        .collect()
}

/// An immutable boundary collection with precomputed envelopes.
///
/// Built once per level after loading. Geometry is parsed exactly once,
/// here; malformed features are counted and left out of the tree.
pub struct BoundaryIndex {
    level: BoundaryLevel,
    features: Arc<[BoundaryFeature]>,
    envelopes: Vec<Option<BoundingBox>>,
    tree: RTree<EnvelopeEntry>,
}

impl BoundaryIndex {
    /// Builds the index for one level's collection.
    #[must_use]
    pub fn build(level: BoundaryLevel, features: Arc<[BoundaryFeature]>) -> Self {
        let envelopes: Vec<Option<BoundingBox>> = features
            .iter()
            .map(|f| {
                let env = f.geometry.as_ref().and_then(raw_envelope);
                if env.is_none() {
                    log::debug!("Boundary {level} {} has no usable geometry", f.id);
                }
                env
            })
            .collect();

        let entries: Vec<EnvelopeEntry> = envelopes
            .iter()
            .enumerate()
            .filter_map(|(position, env)| {
                env.as_ref().map(|env| EnvelopeEntry {
                    position,
                    envelope: to_aabb(env),
                })
            })
            .collect();

        let malformed = features.len() - entries.len();
        if malformed > 0 {
            log::warn!("{malformed} {level} boundaries have malformed geometry and will never render");
        }
        log::info!("Indexed {} {level} boundaries", entries.len());

        Self {
            level,
            features,
            envelopes,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Level this index covers.
    #[must_use]
    pub const fn level(&self) -> BoundaryLevel {
        self.level
    }

    /// The full collection, including malformed features.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Same result as [`compute_visible`] over this collection, answered
    /// from the R-tree.
    #[must_use]
    pub fn visible(&self, viewport: &BoundingBox) -> Vec<&BoundaryFeature> {
        self.visible_positions(viewport)
            .into_iter()
            .map(|i| &self.features[i])
            .collect()
    }

    /// Positions in [`Self::features`] of the features intersecting
    /// `viewport`, ascending.
    #[must_use]
    pub fn visible_positions(&self, viewport: &BoundingBox) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&to_aabb(viewport))
            .map(|e| e.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Looks up a feature by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// First feature whose display name equals `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&BoundaryFeature> {
        self.features
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
    }

    /// Envelope of the feature with the given ID.
    #[must_use]
    pub fn bounds_of(&self, id: &str) -> Option<BoundingBox> {
        let position = self.features.iter().position(|f| f.id == id)?;
        self.envelopes[position]
    }

    /// Number of features with a usable envelope.
    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.tree.size()
    }
}
