//! Co-authorship network core: article collection, graph building, styling and rendering.
//!
//! The main entry point is [`pipeline::CoauthorPipeline`], which runs the
//! Collect → Build → Style → Render pipeline against a
//! [`collect::LiteratureSource`].

pub mod collect;
pub mod config;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod style;
pub mod types;
