//! Internal constants for example regeneration.

/// Default tool name appearing in embedded command links.
pub const DEFAULT_TOOL_NAME: &str = "dcc_tiler_cli";

/// Flag selecting the renderer's single-artifact mode. Appears literally in
/// the link template and is passed to every invocation.
pub const SINGLE_FLAG: &str = "--single";
