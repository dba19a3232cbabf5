//! Example artifact regeneration for documentation.
//!
//! Documentation embeds renderable examples as image links whose alt text
//! carries the renderer command line:
//!
//! ```text
//! ![dcc_tiler_cli --single --scale 4 3 1](img/Example_3_1.svg)
//! ```
//!
//! This crate scans a document for those links and re-runs the renderer once
//! per link, writing the captured output over the linked image so generated
//! artifacts never drift from the documentation that displays them.
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `scan`: the link template and per-line extraction ([`ScanPattern`])
//! - `render`: argument-vector renderer invocation with programmatic output
//!   capture ([`Renderer`])
//! - `pipeline`: whole-document drive collecting a [`RunReport`]
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//!
//! use regen_examples::{Pipeline, Renderer, RendererCommand, ScanPattern};
//!
//! let renderer = Renderer::new(RendererCommand::default(), "img");
//! let pipeline = Pipeline::new(ScanPattern::default(), renderer);
//! let report = pipeline.run_file(Path::new("README.md"))?;
//! assert!(report.is_success());
//! ```

mod consts;
mod pipeline;
mod render;
mod scan;

pub use pipeline::{Pipeline, RenderFailure, RunReport};
pub use render::{RenderError, RenderOutcome, Renderer, RendererCommand};
pub use scan::{EmbeddedCommand, ScanPattern};
