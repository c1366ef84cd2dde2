//! Caller-owned container for the features shown on one map

use crate::{Extent, HasExtent};

/// Vector layer source: the features currently drawn on a map
#[derive(Debug, Clone)]
pub struct VectorSource<F> {
    features: Vec<F>,
}

impl<F> Default for VectorSource<F> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
        }
    }
}

impl<F> VectorSource<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a feature
    pub fn add_feature(&mut self, feature: F) {
        self.features.push(feature);
    }

    pub fn add_features(&mut self, features: impl IntoIterator<Item = F>) {
        self.features.extend(features);
    }

    /// Remove every feature
    pub fn clear(&mut self) {
        self.features.clear();
    }

    #[inline]
    pub fn features(&self) -> &[F] {
        &self.features
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<F: HasExtent> HasExtent for VectorSource<F> {
    /// Union of all feature extents; the empty sentinel when there are none
    fn extent(&self) -> Extent {
        self.features
            .iter()
            .fold(Extent::empty(), |mut extent, feature| {
                extent.extend(&feature.extent());
                extent
            })
    }
}
