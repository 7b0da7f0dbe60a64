//! # hazmap
//!
//! A fast, in-memory choropleth map server for hazard GeoJSON datasets.
//!
//! This library provides the core functionality for loading per-region
//! hazard datasets, deriving data-driven color scales, and rendering
//! interactive choropleth maps with consistent legends.
//!
//! ## Key Features
//!
//! - **Data-driven color scales**: a diverging red-yellow-green palette over
//!   a domain derived from the visible layer's values, inverted so high
//!   hazard reads as red
//! - **Layer switching**: one dataset holds several administrative
//!   granularities; the view filters to one at a time
//! - **Consistent legends**: map and legend are driven by the same derived
//!   scale and can never diverge
//! - **Graceful degradation**: fetch failures and unknown layers degrade to
//!   an empty or unchanged view, never a crash
//!
//! ## Architecture
//!
//! - **Data Layer**: GeoJSON feature collections loaded into memory through
//!   an injected dataset source
//! - **Rendering Core**: pure derivation of render state (filtered features
//!   plus color scale) from a dataset and an active layer
//! - **API Layer**: the interactive view exposed through a RESTful HTTP API

pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod layer;
pub mod logging;
pub mod render;
pub mod scale;
pub mod source;
pub mod state;

pub use config::Config;
pub use dataset::{Feature, FeatureCollection, LayerId};
pub use error::{HazmapError, Result};
pub use layer::{filter_layer, LayerSet};
pub use logging::{create_http_trace_layer, generate_request_id, init_tracing, log_error};
pub use render::{
    derive_render_state, render_legend, ChoroplethRenderer, ImageSurface, Legend, LegendSpec,
    RenderState, RenderSurface,
};
pub use scale::{get_colormap, ColorScale, Colormap};
pub use source::{DataSource, FetchCoordinator, FileDataSource};
pub use state::{AppState, MapView};
