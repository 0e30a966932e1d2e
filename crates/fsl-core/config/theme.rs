//! Default semantic color palette
//!
//! Hosts color semantic tokens through a rule table keyed by token type name.
//! [`ColorRules::default`] is the palette FSL installs on first run; comparing
//! the host's current table with it through [`ColorRules::is_default`] decides
//! whether the table needs rewriting.

use crate::tokenizer::TokenCategory;
use crate::utils::{CoreError, Result};
use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rule name for preprocessor directives
///
/// Directives are emitted as keywords by the tokenizer, but hosts that
/// understand a separate directive type color them with this rule.
pub const DIRECTIVE_RULE: &str = "directive";

/// An sRGB color written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// 24-bit ANSI escape selecting this color as foreground
    #[must_use]
    pub fn ansi_foreground(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.is_ascii())
            .ok_or_else(|| CoreError::invalid_color(s))?;
        let hex = u32::from_str_radix(digits, 16).map_err(|_| CoreError::invalid_color(s))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Rgb {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Styling of one token type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorRule {
    pub foreground: Rgb,
}

/// Semantic token color customizations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorRules {
    /// Whether the host applies semantic colors at all
    pub enabled: bool,
    /// Rules keyed by token type name
    pub rules: BTreeMap<String, ColorRule>,
}

impl Default for ColorRules {
    fn default() -> Self {
        let palette = [
            (DIRECTIVE_RULE, 0x0080_8080),
            ("type", 0x0000_00ff),
            ("function", 0x0088_0000),
            ("macro", 0x006f_008a),
            ("semantic", 0x006f_008a),
            ("keyword", 0x00c1_00db),
            ("bracket0", 0x0098_6f0d),
            ("bracket1", 0x0000_7575),
            ("bracket2", 0x0000_78d4),
            ("bracket3", 0x002d_0097),
            ("bracket4", 0x00cc_0073),
        ];

        Self {
            enabled: true,
            rules: palette
                .into_iter()
                .map(|(name, hex)| {
                    (
                        name.to_string(),
                        ColorRule {
                            foreground: Rgb::from_hex(hex),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl ColorRules {
    /// Foreground of a rule by token type name
    #[must_use]
    pub fn foreground(&self, name: &str) -> Option<Rgb> {
        self.rules.get(name).map(|rule| rule.foreground)
    }

    /// Foreground applied to a tokenizer category
    ///
    /// Returns `None` when semantic coloring is disabled or the category has
    /// no rule.
    #[must_use]
    pub fn for_category(&self, category: TokenCategory) -> Option<Rgb> {
        if !self.enabled {
            return None;
        }
        self.foreground(category.as_str())
    }

    /// Set the foreground of a rule
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] for names that are neither a
    /// legend category nor the directive rule.
    pub fn set_foreground(&mut self, name: &str, color: Rgb) -> Result<()> {
        if name != DIRECTIVE_RULE && TokenCategory::from_name(name).is_none() {
            return Err(CoreError::unknown_category(name));
        }
        self.rules
            .insert(name.to_string(), ColorRule { foreground: color });
        Ok(())
    }

    /// Check whether this table equals the default palette
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
