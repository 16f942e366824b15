//! Figured bass style settings
//!
//! Score-wide settings that drive display text and layout. Every field has a
//! default, so partial YAML/JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::models::elements::{DigitStyle, StackAlignment};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiguredBassStyle {
    /// Family or display name of the figured bass font
    pub font_name: String,
    /// Glyph size in points
    pub font_size: f64,
    /// Line distance as a multiple of the font line height
    pub line_height: f64,
    pub digit_style: DigitStyle,
    pub alignment: StackAlignment,
}

impl Default for FiguredBassStyle {
    fn default() -> Self {
        Self {
            font_name: "Unicode Figured Bass".to_string(),
            font_size: 8.0,
            line_height: 1.0,
            digit_style: DigitStyle::Modern,
            alignment: StackAlignment::Top,
        }
    }
}

impl FiguredBassStyle {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
