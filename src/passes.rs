//! # Pass Compiler Module
//!
//! Traduce un `OptionModel` nella lista ordinata di pass da passare al
//! transform engine.
//!
//! ## Ordine di emissione (fisso):
//! 1. **Structural cleanup**: commenti, metadata, namespace editor, attributi/testo/container vuoti, elementi nascosti
//! 2. **Content removal**: title, desc, defs inutili
//! 3. **Style/attributes**: stili, colori, attributi default, stroke/fill, enable-background, sort
//! 4. **Structural rewrite**: path data, transform, merge paths, shape → path
//! 5. **Breaking**: viewBox e dimensioni, sempre per ultimi
//!
//! La compilazione è pura e totale: stesso input, stessa lista.

use crate::options::{OptionModel, Switch};
use serde::{Serialize, Serializer};
use std::fmt;

/// Opaque pass identifier shared with the transform engine (svgo plugin name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(&'static str);

impl PassId {
    pub const REMOVE_COMMENTS: PassId = PassId("removeComments");
    pub const REMOVE_METADATA: PassId = PassId("removeMetadata");
    pub const REMOVE_EDITORS_NS_DATA: PassId = PassId("removeEditorsNSData");
    pub const REMOVE_EMPTY_ATTRS: PassId = PassId("removeEmptyAttrs");
    pub const REMOVE_EMPTY_TEXT: PassId = PassId("removeEmptyText");
    pub const REMOVE_EMPTY_CONTAINERS: PassId = PassId("removeEmptyContainers");
    pub const REMOVE_HIDDEN_ELEMS: PassId = PassId("removeHiddenElems");
    pub const REMOVE_TITLE: PassId = PassId("removeTitle");
    pub const REMOVE_DESC: PassId = PassId("removeDesc");
    pub const REMOVE_USELESS_DEFS: PassId = PassId("removeUselessDefs");
    pub const MINIFY_STYLES: PassId = PassId("minifyStyles");
    pub const CONVERT_COLORS: PassId = PassId("convertColors");
    pub const REMOVE_UNKNOWNS_AND_DEFAULTS: PassId = PassId("removeUnknownsAndDefaults");
    pub const REMOVE_USELESS_STROKE_AND_FILL: PassId = PassId("removeUselessStrokeAndFill");
    pub const CLEANUP_ENABLE_BACKGROUND: PassId = PassId("cleanupEnableBackground");
    pub const SORT_ATTRS: PassId = PassId("sortAttrs");
    pub const CONVERT_PATH_DATA: PassId = PassId("convertPathData");
    pub const CONVERT_TRANSFORM: PassId = PassId("convertTransform");
    pub const MERGE_PATHS: PassId = PassId("mergePaths");
    pub const CONVERT_SHAPE_TO_PATH: PassId = PassId("convertShapeToPath");
    pub const REMOVE_VIEW_BOX: PassId = PassId("removeViewBox");
    pub const REMOVE_DIMENSIONS: PassId = PassId("removeDimensions");

    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// Passes that may change geometry or how the document scales
    pub fn is_lossy(self) -> bool {
        matches!(
            self,
            PassId::CONVERT_PATH_DATA
                | PassId::MERGE_PATHS
                | PassId::CONVERT_SHAPE_TO_PATH
                | PassId::REMOVE_VIEW_BOX
                | PassId::REMOVE_DIMENSIONS
        )
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for PassId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Ordered pass identifiers, derived fresh on every run
pub type PassList = Vec<PassId>;

/// Conservative passes that never touch geometry, used by the safe tier
pub const SAFE_PASSES: [PassId; 7] = [
    PassId::REMOVE_COMMENTS,
    PassId::REMOVE_METADATA,
    PassId::REMOVE_EDITORS_NS_DATA,
    PassId::REMOVE_EMPTY_ATTRS,
    PassId::REMOVE_EMPTY_TEXT,
    PassId::MINIFY_STYLES,
    PassId::CONVERT_COLORS,
];

/// Compile the option model into the pass list for the full tier
pub fn compile(options: &OptionModel) -> PassList {
    options.enabled_switches().map(Switch::pass).collect()
}

/// Human-readable pass list for logs
pub fn describe(passes: &[PassId]) -> String {
    if passes.is_empty() {
        return "(none)".to_string();
    }

    passes
        .iter()
        .map(|pass| pass.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
