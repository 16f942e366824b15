//! Figured bass font config parser
//!
//! Reads the YAML font configuration and produces a validated
//! `FontRegistry`. All problems in the file are collected before failing.
//!
//! ```yaml
//! fonts:
//!   - family: "Unicode Figured Bass"
//!     display_name: "Unicode"
//!     default_pitch: 8
//!     default_line_height: 1.0
//!     modifiers: { flat: "♭", sharp: "U+266F" }
//!     parentheses: { round_open: "(" }
//!     digits:
//!       modern:
//!         "6": { plain: "6", slashed: "0xE0A6" }
//! ```

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{FiguredBassFont, FontRegistry};
use crate::error::FontConfigError;
use crate::models::elements::{DigitStyle, DigitVariant, Modifier, Parenthesis};

#[derive(Debug, Deserialize)]
struct FontConfigFile {
    fonts: Vec<RawFont>,
}

#[derive(Debug, Deserialize)]
struct RawFont {
    family: String,
    #[serde(default)]
    display_name: Option<String>,
    default_pitch: f64,
    #[serde(default = "default_line_height")]
    default_line_height: f64,
    #[serde(default)]
    modifiers: BTreeMap<String, String>,
    #[serde(default)]
    parentheses: BTreeMap<String, String>,
    #[serde(default)]
    digits: BTreeMap<String, serde_yaml::Mapping>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDigit {
    plain: Option<String>,
    crossed: Option<String>,
    backslashed: Option<String>,
    slashed: Option<String>,
}

impl RawDigit {
    fn glyph(&self, variant: DigitVariant) -> Option<&str> {
        match variant {
            DigitVariant::Plain => self.plain.as_deref(),
            DigitVariant::Crossed => self.crossed.as_deref(),
            DigitVariant::Backslashed => self.backslashed.as_deref(),
            DigitVariant::Slashed => self.slashed.as_deref(),
        }
    }
}

fn default_line_height() -> f64 {
    1.0
}

impl FontRegistry {
    /// Parse a YAML font configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FontConfigError> {
        let file: FontConfigFile = serde_yaml::from_str(yaml)?;
        let mut errors = Vec::new();
        let fonts: Vec<FiguredBassFont> = file
            .fonts
            .into_iter()
            .map(|raw| convert_font(raw, &mut errors))
            .collect();
        if !errors.is_empty() {
            return Err(FontConfigError::Invalid(errors));
        }
        let registry = FontRegistry::new(fonts)?;
        log::info!("loaded figured bass fonts: {:?}", registry.font_names());
        Ok(registry)
    }

    /// Read and parse a YAML font configuration file
    pub fn load(path: &Path) -> Result<Self, FontConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

fn convert_font(raw: RawFont, errors: &mut Vec<String>) -> FiguredBassFont {
    let family = raw.family.trim().to_string();
    if family.is_empty() {
        errors.push("font with empty family".to_string());
    }
    if !(raw.default_pitch > 0.0) {
        errors.push(format!("font '{}': default_pitch must be positive", family));
    }
    if !(raw.default_line_height > 0.0) {
        errors.push(format!("font '{}': default_line_height must be positive", family));
    }

    let display_name = raw.display_name.unwrap_or_else(|| family.clone());
    let mut font = FiguredBassFont::new(&family, &display_name, raw.default_pitch, raw.default_line_height);

    for (name, glyph) in &raw.modifiers {
        let modifier = match Modifier::from_config_name(name) {
            Some(m) if m != Modifier::None => m,
            _ => {
                errors.push(format!("font '{}': unknown modifier '{}'", family, name));
                continue;
            }
        };
        match parse_glyph(glyph) {
            Some(c) => font = font.with_modifier(modifier, c),
            None => errors.push(format!("font '{}': bad glyph '{}' for {}", family, glyph, name)),
        }
    }

    for (name, glyph) in &raw.parentheses {
        let parenthesis = match Parenthesis::from_config_name(name) {
            Some(p) if !p.is_none() => p,
            _ => {
                errors.push(format!("font '{}': unknown parenthesis '{}'", family, name));
                continue;
            }
        };
        match parse_glyph(glyph) {
            Some(c) => font = font.with_parenthesis(parenthesis, c),
            None => errors.push(format!("font '{}': bad glyph '{}' for {}", family, glyph, name)),
        }
    }

    for (style_name, table) in raw.digits {
        let style = match style_name.as_str() {
            "modern" => DigitStyle::Modern,
            "historic" => DigitStyle::Historic,
            other => {
                errors.push(format!("font '{}': unknown digit style '{}'", family, other));
                continue;
            }
        };
        for (key, value) in table {
            let Some(digit) = parse_digit_key(&key) else {
                errors.push(format!("font '{}': bad digit key {:?}", family, key));
                continue;
            };
            let raw_digit: RawDigit = match serde_yaml::from_value(value) {
                Ok(d) => d,
                Err(e) => {
                    errors.push(format!("font '{}': digit {}: {}", family, digit, e));
                    continue;
                }
            };
            for variant in DigitVariant::ALL {
                let Some(glyph) = raw_digit.glyph(variant) else {
                    continue;
                };
                match parse_glyph(glyph) {
                    Some(c) => font = font.with_digit(style, digit, variant, c),
                    None => errors.push(format!(
                        "font '{}': bad glyph '{}' for digit {} {}",
                        family,
                        glyph,
                        digit,
                        variant.config_name()
                    )),
                }
            }
        }
    }

    font
}

/// A glyph is one character, or a code point written `U+XXXX` / `0xXXXX`
pub fn parse_glyph(s: &str) -> Option<char> {
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"));
    if let Some(hex) = hex {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Digit keys may be written as numbers or strings
fn parse_digit_key(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (n <= 9).then_some(n as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
fonts:
  - family: "Test Bass"
    default_pitch: 10
    modifiers:
      flat: "b"
      sharp: "U+266F"
    parentheses:
      round_open: "("
      round_closed: ")"
    digits:
      modern:
        6: { plain: "6", slashed: "0xE0A6" }
        "7": { plain: "7" }
      historic:
        6: { plain: "U+0036" }
"#;

    #[test]
    fn test_parse_sample() {
        let registry = FontRegistry::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(registry.font_names(), vec!["Test Bass"]);
        let font = registry.font("Test Bass").unwrap();
        assert_eq!(font.default_pitch, 10.0);
        assert_eq!(font.default_line_height, 1.0);
        assert_eq!(font.modifier_glyph(Modifier::Sharp), Some('\u{266F}'));
        assert_eq!(font.modifier_glyph(Modifier::Natural), None);
        assert_eq!(font.digit_glyph(DigitStyle::Modern, 6, DigitVariant::Slashed), Some('\u{E0A6}'));
        assert_eq!(font.digit_glyph(DigitStyle::Modern, 7, DigitVariant::Plain), Some('7'));
        assert_eq!(font.digit_glyph(DigitStyle::Historic, 6, DigitVariant::Plain), Some('6'));
    }

    #[test]
    fn test_errors_are_collected() {
        let yaml = r#"
fonts:
  - family: "Broken"
    default_pitch: 0
    modifiers:
      quarter_sharp: "x"
      flat: "too long"
    digits:
      modern:
        12: { plain: "1" }
"#;
        match FontRegistry::from_yaml_str(yaml) {
            Err(FontConfigError::Invalid(errors)) => {
                assert_eq!(errors.len(), 4, "{:?}", errors);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let registry = FontRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = FontRegistry::load(Path::new("/nonexistent/fonts.yaml"));
        assert!(matches!(result, Err(FontConfigError::Io(_))));
    }

    #[test]
    fn test_parse_glyph() {
        assert_eq!(parse_glyph("♭"), Some('\u{266D}'));
        assert_eq!(parse_glyph("U+1D12B"), Some('\u{1D12B}'));
        assert_eq!(parse_glyph("0xD800"), None);
        assert_eq!(parse_glyph(""), None);
        assert_eq!(parse_glyph("ab"), None);
    }
}
