//! Application state management for hazmap.
//!
//! This module defines the shared state that is passed to all handlers: the
//! configuration, the injected dataset source, and the single interactive
//! map view behind a lock. Locks are never held across await points; fetch
//! results are applied through [`AppState::apply_dataset`], which enforces
//! cancel-and-replace.

use std::mem;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::config::Config;
use crate::dataset::FeatureCollection;
use crate::error::Result;
use crate::layer::LayerSet;
use crate::render::ChoroplethRenderer;
use crate::scale::get_colormap;
use crate::source::{DataSource, FetchCoordinator};

/// The single interactive map view: renderer state plus the key of the
/// dataset it is showing.
pub struct MapView {
    /// The choropleth renderer holding dataset and active layer
    pub renderer: ChoroplethRenderer,
    /// Key of the currently-loaded dataset, if any
    pub dataset_key: Option<String>,
}

impl MapView {
    /// Number of features in the current dataset (all layers).
    pub fn feature_count(&self) -> usize {
        self.renderer.dataset().map_or(0, |d| d.len())
    }

    /// Approximate in-memory size of the current dataset.
    pub fn data_memory_bytes(&self) -> usize {
        self.renderer.dataset().map_or(0, |dataset| {
            let base = dataset.len() * mem::size_of::<crate::dataset::Feature>();
            let ids: usize = dataset.features.iter().map(|f| f.id.len()).sum();
            base + ids
        })
    }
}

/// The main application state shared across all handlers
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Injected dataset source
    pub source: Box<dyn DataSource>,
    /// The interactive view
    pub view: RwLock<MapView>,
    /// Fetch generations for cancel-and-replace
    pub fetches: FetchCoordinator,
}

impl AppState {
    /// Create a new AppState with an empty view configured from `config`.
    pub fn new(config: Config, source: Box<dyn DataSource>) -> Result<Self> {
        let colormap = get_colormap(&config.map.colormap)?;
        let layers = LayerSet::new(config.map.layers.clone(), config.map.default_layer);
        let renderer = ChoroplethRenderer::new(layers, colormap);

        Ok(Self {
            config,
            source,
            view: RwLock::new(MapView {
                renderer,
                dataset_key: None,
            }),
            fetches: FetchCoordinator::default(),
        })
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config, source: Box<dyn DataSource>) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(config, source)?))
    }

    /// Apply a completed fetch to the view.
    ///
    /// Returns `false` (leaving the view untouched) when a newer fetch has
    /// been issued since `ticket` was taken: the stale response is dropped
    /// rather than overwriting the newer selection.
    pub fn apply_dataset(&self, ticket: u64, key: &str, collection: FeatureCollection) -> bool {
        let mut view = self.view.write();
        if !self.fetches.is_current(ticket) {
            info!(key = key, "Dropping superseded dataset fetch");
            return false;
        }
        view.renderer.set_dataset(Some(Arc::new(collection)));
        view.dataset_key = Some(key.to_string());
        true
    }

    /// Clear the view entirely (the explicit `set_dataset(None)` path).
    pub fn clear_dataset(&self) {
        let mut view = self.view.write();
        view.renderer.set_dataset(None);
        view.dataset_key = None;
    }
}
