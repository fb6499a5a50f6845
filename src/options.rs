//! # Option Model Module
//!
//! Questo modulo definisce il modello dichiarativo delle opzioni di ottimizzazione.
//!
//! ## Responsabilità:
//! - Definisce gli switch booleani (uno per ogni pass del transform engine)
//! - Definisce i preset `basic`, `aggressive` e `custom`
//! - Applica i preset in blocco e gestisce il toggle dei singoli switch
//! - Fornisce label e descrizioni human-readable per CLI e output
//!
//! ## Regole dei preset:
//! - `basic` / `aggressive` sovrascrivono tutti gli switch con la loro tabella fissa
//! - `custom` non tocca nessuno switch: valgono i valori scelti dall'utente
//! - Modificare uno switch mentre un preset è attivo forza `preset = custom`
//! - `removeDimensions` è l'unica eccezione: non è mai toccato dai preset e
//!   il suo toggle non cambia il preset corrente
//!
//! ## Esempio:
//! ```rust,ignore
//! let options = OptionModel::default()
//!     .apply_preset(Preset::Aggressive)
//!     .toggle_switch(Switch::RemoveDimensions, true);
//! assert_eq!(options.preset, Preset::Aggressive);
//! ```

use crate::error::OptimizeError;
use crate::passes::PassId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named bulk assignment of switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Safe optimizations that preserve functionality
    #[default]
    Basic,
    /// Maximum compression with potential visual changes
    Aggressive,
    /// Switches are under direct user control
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Basic, Preset::Aggressive, Preset::Custom];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Aggressive => "aggressive",
            Preset::Custom => "custom",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Preset::Basic => "Basic",
            Preset::Aggressive => "Aggressive",
            Preset::Custom => "Custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Basic => "Safe optimizations that preserve functionality",
            Preset::Aggressive => "Maximum compression with potential visual changes",
            Preset::Custom => "Fine-tune optimization settings",
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Preset::Basic => "Using safe optimizations",
            Preset::Aggressive => "Using maximum compression",
            Preset::Custom => "Using custom settings",
        }
    }

    /// Value this preset assigns to a switch, `None` when the preset leaves it alone
    pub fn value_for(self, switch: Switch) -> Option<bool> {
        if !switch.is_preset_controlled() {
            return None;
        }

        match self {
            Preset::Basic => Some(!matches!(
                switch,
                Switch::RemoveTitle
                    | Switch::RemoveDesc
                    | Switch::ConvertPathData
                    | Switch::RemoveViewBox
                    | Switch::MergePaths
                    | Switch::ConvertShapeToPath
                    | Switch::SortAttrs
            )),
            Preset::Aggressive => Some(true),
            Preset::Custom => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                OptimizeError::Configuration(format!(
                    "unknown preset '{}' (expected basic, aggressive or custom)",
                    s
                ))
            })
    }
}

/// Coarse grouping of switches, in pass emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassGroup {
    StructuralCleanup,
    ContentRemoval,
    StyleAndAttributes,
    StructuralRewrite,
    Breaking,
}

/// One boolean optimization switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    RemoveComments,
    RemoveMetadata,
    RemoveEditorsNsData,
    RemoveEmptyAttrs,
    RemoveEmptyText,
    RemoveEmptyContainers,
    RemoveHiddenElems,
    RemoveTitle,
    RemoveDesc,
    RemoveUselessDefs,
    MinifyStyles,
    ConvertColors,
    RemoveUnknownsAndDefaults,
    RemoveUselessStrokeAndFill,
    CleanupEnableBackground,
    SortAttrs,
    ConvertPathData,
    ConvertTransform,
    MergePaths,
    ConvertShapeToPath,
    RemoveViewBox,
    RemoveDimensions,
}

impl Switch {
    /// Every switch, in pass emission order
    pub const ALL: [Switch; 22] = [
        // structural cleanup
        Switch::RemoveComments,
        Switch::RemoveMetadata,
        Switch::RemoveEditorsNsData,
        Switch::RemoveEmptyAttrs,
        Switch::RemoveEmptyText,
        Switch::RemoveEmptyContainers,
        Switch::RemoveHiddenElems,
        // content removal
        Switch::RemoveTitle,
        Switch::RemoveDesc,
        Switch::RemoveUselessDefs,
        // style and attributes
        Switch::MinifyStyles,
        Switch::ConvertColors,
        Switch::RemoveUnknownsAndDefaults,
        Switch::RemoveUselessStrokeAndFill,
        Switch::CleanupEnableBackground,
        Switch::SortAttrs,
        // structural rewrite
        Switch::ConvertPathData,
        Switch::ConvertTransform,
        Switch::MergePaths,
        Switch::ConvertShapeToPath,
        // breaking
        Switch::RemoveViewBox,
        Switch::RemoveDimensions,
    ];

    /// The pass this switch turns on
    pub fn pass(self) -> PassId {
        match self {
            Switch::RemoveComments => PassId::REMOVE_COMMENTS,
            Switch::RemoveMetadata => PassId::REMOVE_METADATA,
            Switch::RemoveEditorsNsData => PassId::REMOVE_EDITORS_NS_DATA,
            Switch::RemoveEmptyAttrs => PassId::REMOVE_EMPTY_ATTRS,
            Switch::RemoveEmptyText => PassId::REMOVE_EMPTY_TEXT,
            Switch::RemoveEmptyContainers => PassId::REMOVE_EMPTY_CONTAINERS,
            Switch::RemoveHiddenElems => PassId::REMOVE_HIDDEN_ELEMS,
            Switch::RemoveTitle => PassId::REMOVE_TITLE,
            Switch::RemoveDesc => PassId::REMOVE_DESC,
            Switch::RemoveUselessDefs => PassId::REMOVE_USELESS_DEFS,
            Switch::MinifyStyles => PassId::MINIFY_STYLES,
            Switch::ConvertColors => PassId::CONVERT_COLORS,
            Switch::RemoveUnknownsAndDefaults => PassId::REMOVE_UNKNOWNS_AND_DEFAULTS,
            Switch::RemoveUselessStrokeAndFill => PassId::REMOVE_USELESS_STROKE_AND_FILL,
            Switch::CleanupEnableBackground => PassId::CLEANUP_ENABLE_BACKGROUND,
            Switch::SortAttrs => PassId::SORT_ATTRS,
            Switch::ConvertPathData => PassId::CONVERT_PATH_DATA,
            Switch::ConvertTransform => PassId::CONVERT_TRANSFORM,
            Switch::MergePaths => PassId::MERGE_PATHS,
            Switch::ConvertShapeToPath => PassId::CONVERT_SHAPE_TO_PATH,
            Switch::RemoveViewBox => PassId::REMOVE_VIEW_BOX,
            Switch::RemoveDimensions => PassId::REMOVE_DIMENSIONS,
        }
    }

    /// camelCase name, shared with the svgo plugin and the JSON config key
    pub fn name(self) -> &'static str {
        self.pass().as_str()
    }

    pub fn label(self) -> &'static str {
        match self {
            Switch::RemoveComments => "Remove comments",
            Switch::RemoveMetadata => "Remove metadata",
            Switch::RemoveEditorsNsData => "Remove editor namespace data",
            Switch::RemoveEmptyAttrs => "Remove empty attributes",
            Switch::RemoveEmptyText => "Remove empty text",
            Switch::RemoveEmptyContainers => "Remove empty containers",
            Switch::RemoveHiddenElems => "Remove hidden elements",
            Switch::RemoveTitle => "Remove title elements",
            Switch::RemoveDesc => "Remove description elements",
            Switch::RemoveUselessDefs => "Remove useless defs",
            Switch::MinifyStyles => "Minify styles",
            Switch::ConvertColors => "Convert colors",
            Switch::RemoveUnknownsAndDefaults => "Remove unknown and default attrs",
            Switch::RemoveUselessStrokeAndFill => "Remove useless stroke and fill",
            Switch::CleanupEnableBackground => "Cleanup enable-background",
            Switch::SortAttrs => "Sort attributes",
            Switch::ConvertPathData => "Convert path data",
            Switch::ConvertTransform => "Convert transforms",
            Switch::MergePaths => "Merge paths",
            Switch::ConvertShapeToPath => "Convert shapes to paths",
            Switch::RemoveViewBox => "Remove viewBox",
            Switch::RemoveDimensions => "Remove dimensions",
        }
    }

    pub fn group(self) -> PassGroup {
        match self {
            Switch::RemoveComments
            | Switch::RemoveMetadata
            | Switch::RemoveEditorsNsData
            | Switch::RemoveEmptyAttrs
            | Switch::RemoveEmptyText
            | Switch::RemoveEmptyContainers
            | Switch::RemoveHiddenElems => PassGroup::StructuralCleanup,
            Switch::RemoveTitle | Switch::RemoveDesc | Switch::RemoveUselessDefs => {
                PassGroup::ContentRemoval
            }
            Switch::MinifyStyles
            | Switch::ConvertColors
            | Switch::RemoveUnknownsAndDefaults
            | Switch::RemoveUselessStrokeAndFill
            | Switch::CleanupEnableBackground
            | Switch::SortAttrs => PassGroup::StyleAndAttributes,
            Switch::ConvertPathData
            | Switch::ConvertTransform
            | Switch::MergePaths
            | Switch::ConvertShapeToPath => PassGroup::StructuralRewrite,
            Switch::RemoveViewBox | Switch::RemoveDimensions => PassGroup::Breaking,
        }
    }

    /// Whether selecting a named preset overwrites this switch
    pub fn is_preset_controlled(self) -> bool {
        self != Switch::RemoveDimensions
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts both `removeViewBox` and `remove-view-box`
impl FromStr for Switch {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();

        Switch::ALL
            .into_iter()
            .find(|switch| switch.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| OptimizeError::Configuration(format!("unknown switch '{}'", s)))
    }
}

/// Declarative optimization options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionModel {
    pub preset: Preset,
    pub remove_comments: bool,
    pub remove_metadata: bool,
    pub remove_title: bool,
    pub remove_desc: bool,
    pub remove_useless_defs: bool,
    #[serde(rename = "removeEditorsNSData")]
    pub remove_editors_ns_data: bool,
    pub remove_empty_attrs: bool,
    pub remove_hidden_elems: bool,
    pub remove_empty_text: bool,
    pub remove_empty_containers: bool,
    pub minify_styles: bool,
    pub convert_colors: bool,
    pub convert_path_data: bool,
    pub convert_transform: bool,
    pub remove_unknowns_and_defaults: bool,
    pub remove_useless_stroke_and_fill: bool,
    pub remove_view_box: bool,
    pub cleanup_enable_background: bool,
    pub merge_paths: bool,
    pub convert_shape_to_path: bool,
    pub sort_attrs: bool,
    pub remove_dimensions: bool,
}

impl Default for OptionModel {
    fn default() -> Self {
        let all_off = Self {
            preset: Preset::Custom,
            remove_comments: false,
            remove_metadata: false,
            remove_title: false,
            remove_desc: false,
            remove_useless_defs: false,
            remove_editors_ns_data: false,
            remove_empty_attrs: false,
            remove_hidden_elems: false,
            remove_empty_text: false,
            remove_empty_containers: false,
            minify_styles: false,
            convert_colors: false,
            convert_path_data: false,
            convert_transform: false,
            remove_unknowns_and_defaults: false,
            remove_useless_stroke_and_fill: false,
            remove_view_box: false,
            cleanup_enable_background: false,
            merge_paths: false,
            convert_shape_to_path: false,
            sort_attrs: false,
            remove_dimensions: false,
        };
        all_off.apply_preset(Preset::Basic)
    }
}

impl OptionModel {
    /// Current value of a switch
    pub fn get(&self, switch: Switch) -> bool {
        match switch {
            Switch::RemoveComments => self.remove_comments,
            Switch::RemoveMetadata => self.remove_metadata,
            Switch::RemoveEditorsNsData => self.remove_editors_ns_data,
            Switch::RemoveEmptyAttrs => self.remove_empty_attrs,
            Switch::RemoveEmptyText => self.remove_empty_text,
            Switch::RemoveEmptyContainers => self.remove_empty_containers,
            Switch::RemoveHiddenElems => self.remove_hidden_elems,
            Switch::RemoveTitle => self.remove_title,
            Switch::RemoveDesc => self.remove_desc,
            Switch::RemoveUselessDefs => self.remove_useless_defs,
            Switch::MinifyStyles => self.minify_styles,
            Switch::ConvertColors => self.convert_colors,
            Switch::RemoveUnknownsAndDefaults => self.remove_unknowns_and_defaults,
            Switch::RemoveUselessStrokeAndFill => self.remove_useless_stroke_and_fill,
            Switch::CleanupEnableBackground => self.cleanup_enable_background,
            Switch::SortAttrs => self.sort_attrs,
            Switch::ConvertPathData => self.convert_path_data,
            Switch::ConvertTransform => self.convert_transform,
            Switch::MergePaths => self.merge_paths,
            Switch::ConvertShapeToPath => self.convert_shape_to_path,
            Switch::RemoveViewBox => self.remove_view_box,
            Switch::RemoveDimensions => self.remove_dimensions,
        }
    }

    /// Bulk-assign a preset's table; `removeDimensions` is left untouched
    pub fn apply_preset(&self, preset: Preset) -> OptionModel {
        let mut next = self.clone();
        next.preset = preset;

        for switch in Switch::ALL {
            if let Some(value) = preset.value_for(switch) {
                *next.slot(switch) = value;
            }
        }

        next
    }

    /// Set one switch; anything but `removeDimensions` drops the model into `custom`
    pub fn toggle_switch(&self, switch: Switch, value: bool) -> OptionModel {
        let mut next = self.clone();
        *next.slot(switch) = value;

        if switch.is_preset_controlled() {
            next.preset = Preset::Custom;
        }

        next
    }

    /// Re-apply a named preset so every preset-controlled switch matches its table.
    ///
    /// Models built from partial JSON or handed in wholesale may carry
    /// `basic`/`aggressive` with switches from another table; `custom` is kept as given.
    pub fn normalized(self) -> OptionModel {
        match self.preset {
            Preset::Basic | Preset::Aggressive => self.apply_preset(self.preset),
            Preset::Custom => self,
        }
    }

    /// Enabled switches in pass emission order
    pub fn enabled_switches(&self) -> impl Iterator<Item = Switch> + '_ {
        Switch::ALL.into_iter().filter(move |switch| self.get(*switch))
    }

    fn slot(&mut self, switch: Switch) -> &mut bool {
        match switch {
            Switch::RemoveComments => &mut self.remove_comments,
            Switch::RemoveMetadata => &mut self.remove_metadata,
            Switch::RemoveEditorsNsData => &mut self.remove_editors_ns_data,
            Switch::RemoveEmptyAttrs => &mut self.remove_empty_attrs,
            Switch::RemoveEmptyText => &mut self.remove_empty_text,
            Switch::RemoveEmptyContainers => &mut self.remove_empty_containers,
            Switch::RemoveHiddenElems => &mut self.remove_hidden_elems,
            Switch::RemoveTitle => &mut self.remove_title,
            Switch::RemoveDesc => &mut self.remove_desc,
            Switch::RemoveUselessDefs => &mut self.remove_useless_defs,
            Switch::MinifyStyles => &mut self.minify_styles,
            Switch::ConvertColors => &mut self.convert_colors,
            Switch::RemoveUnknownsAndDefaults => &mut self.remove_unknowns_and_defaults,
            Switch::RemoveUselessStrokeAndFill => &mut self.remove_useless_stroke_and_fill,
            Switch::CleanupEnableBackground => &mut self.cleanup_enable_background,
            Switch::SortAttrs => &mut self.sort_attrs,
            Switch::ConvertPathData => &mut self.convert_path_data,
            Switch::ConvertTransform => &mut self.convert_transform,
            Switch::MergePaths => &mut self.merge_paths,
            Switch::ConvertShapeToPath => &mut self.convert_shape_to_path,
            Switch::RemoveViewBox => &mut self.remove_view_box,
            Switch::RemoveDimensions => &mut self.remove_dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_basic_without_dimension_removal() {
        let options = OptionModel::default();
        assert_eq!(options.preset, Preset::Basic);
        assert!(options.remove_comments);
        assert!(options.convert_transform);
        assert!(!options.remove_title);
        assert!(!options.sort_attrs);
        assert!(!options.remove_dimensions);
    }

    #[test]
    fn test_basic_table() {
        let options = OptionModel::default().apply_preset(Preset::Aggressive).apply_preset(Preset::Basic);
        let disabled = [
            Switch::RemoveTitle,
            Switch::RemoveDesc,
            Switch::ConvertPathData,
            Switch::RemoveViewBox,
            Switch::MergePaths,
            Switch::ConvertShapeToPath,
            Switch::SortAttrs,
            Switch::RemoveDimensions,
        ];

        for switch in Switch::ALL {
            assert_eq!(options.get(switch), !disabled.contains(&switch), "{}", switch);
        }
    }

    #[test]
    fn test_aggressive_enables_everything_but_dimensions() {
        let options = OptionModel::default().apply_preset(Preset::Aggressive);
        assert_eq!(options.preset, Preset::Aggressive);
        for switch in Switch::ALL.into_iter().filter(|s| s.is_preset_controlled()) {
            assert!(options.get(switch), "{} should be on", switch);
        }
        assert!(!options.remove_dimensions);
    }

    #[test]
    fn test_presets_never_touch_remove_dimensions() {
        for initial in [false, true] {
            let start = OptionModel::default().toggle_switch(Switch::RemoveDimensions, initial);
            let after = start.apply_preset(Preset::Basic).apply_preset(Preset::Aggressive);
            assert_eq!(after.remove_dimensions, initial);
        }
    }

    #[test]
    fn test_custom_preset_keeps_switches() {
        let tweaked = OptionModel::default().toggle_switch(Switch::SortAttrs, true);
        let custom = tweaked.apply_preset(Preset::Custom);
        assert_eq!(custom.preset, Preset::Custom);
        assert!(custom.sort_attrs);
        assert_eq!(custom, tweaked);
    }

    #[test]
    fn test_toggle_forces_custom_except_dimensions() {
        let options = OptionModel::default().toggle_switch(Switch::RemoveComments, false);
        assert_eq!(options.preset, Preset::Custom);
        assert!(!options.remove_comments);

        let options = options.toggle_switch(Switch::RemoveDimensions, true);
        assert_eq!(options.preset, Preset::Custom);
        assert!(options.remove_dimensions);

        let aggressive = OptionModel::default()
            .apply_preset(Preset::Aggressive)
            .toggle_switch(Switch::RemoveDimensions, true);
        assert_eq!(aggressive.preset, Preset::Aggressive);
    }

    #[test]
    fn test_switch_parsing() {
        assert_eq!("removeViewBox".parse::<Switch>().unwrap(), Switch::RemoveViewBox);
        assert_eq!("remove-view-box".parse::<Switch>().unwrap(), Switch::RemoveViewBox);
        assert_eq!("removeEditorsNSData".parse::<Switch>().unwrap(), Switch::RemoveEditorsNsData);
        assert!(matches!(
            "removeEverything".parse::<Switch>(),
            Err(OptimizeError::Configuration(_))
        ));
        assert_eq!("Aggressive".parse::<Preset>().unwrap(), Preset::Aggressive);
        assert!("extreme".parse::<Preset>().is_err());
    }

    #[test]
    fn test_json_uses_plugin_names() {
        let json = serde_json::to_value(OptionModel::default()).unwrap();
        assert_eq!(json["preset"], "basic");
        assert_eq!(json["removeEditorsNSData"], true);
        assert_eq!(json["removeDimensions"], false);

        let parsed: OptionModel =
            serde_json::from_str(r#"{"preset":"custom","removeTitle":true}"#).unwrap();
        assert_eq!(parsed.preset, Preset::Custom);
        assert!(parsed.remove_title);
        // missing keys fall back to the default model
        assert!(parsed.remove_comments);
    }

    #[test]
    fn test_normalized_realigns_named_presets() {
        let parsed: OptionModel = serde_json::from_str(r#"{"preset":"aggressive"}"#).unwrap();
        assert!(!parsed.remove_title);

        let normalized = parsed.normalized();
        assert_eq!(normalized, OptionModel::default().apply_preset(Preset::Aggressive));

        let parsed: OptionModel =
            serde_json::from_str(r#"{"preset":"basic","removeTitle":true,"removeDimensions":true}"#).unwrap();
        let normalized = parsed.normalized();
        assert!(!normalized.remove_title);
        assert!(normalized.remove_dimensions);

        let custom = OptionModel::default().toggle_switch(Switch::SortAttrs, true);
        assert_eq!(custom.clone().normalized(), custom);
    }

    #[test]
    fn test_switch_order_follows_groups() {
        let groups: Vec<PassGroup> = Switch::ALL.iter().map(|s| s.group()).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
    }
}
