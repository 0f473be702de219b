//! Fill colors for diagram blocks.
//!
//! Colors are written in xcolor syntax. Most blocks refer to a named
//! [`PaletteColor`], whose definition is emitted once in the document
//! preamble as a TikZ macro (`\def\ConvColor{...}`); a block can also carry
//! a literal [`TikzColor`].

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// The named palette shared by all diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteColor {
    Conv,
    ConvRelu,
    Pool,
    Unpool,
    Fc,
    FcRelu,
    Softmax,
    Sum,
}

impl PaletteColor {
    /// All palette entries, in the order they are defined in the preamble.
    pub const ALL: [Self; 8] = [
        Self::Conv,
        Self::ConvRelu,
        Self::Pool,
        Self::Unpool,
        Self::Fc,
        Self::FcRelu,
        Self::Softmax,
        Self::Sum,
    ];

    /// Returns the TikZ macro name, without the leading backslash
    pub fn macro_name(self) -> &'static str {
        match self {
            Self::Conv => "ConvColor",
            Self::ConvRelu => "ConvReluColor",
            Self::Pool => "PoolColor",
            Self::Unpool => "UnpoolColor",
            Self::Fc => "FcColor",
            Self::FcRelu => "FcReluColor",
            Self::Softmax => "SoftmaxColor",
            Self::Sum => "SumColor",
        }
    }

    /// Returns the default xcolor definition for this entry
    pub fn default_definition(self) -> &'static str {
        match self {
            Self::Conv => "rgb:yellow,5;red,2.5;white,5",
            Self::ConvRelu => "rgb:yellow,5;red,5;white,5",
            Self::Pool => "rgb:red,1;black,0.3",
            Self::Unpool => "rgb:blue,2;green,1;black,0.3",
            Self::Fc => "rgb:blue,5;red,2.5;white,5",
            Self::FcRelu => "rgb:blue,5;red,5;white,4",
            Self::Softmax => "rgb:magenta,5;black,7",
            Self::Sum => "rgb:blue,5;green,15",
        }
    }
}

impl FromStr for PaletteColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conv" => Ok(Self::Conv),
            "conv_relu" => Ok(Self::ConvRelu),
            "pool" => Ok(Self::Pool),
            "unpool" => Ok(Self::Unpool),
            "fc" => Ok(Self::Fc),
            "fc_relu" => Ok(Self::FcRelu),
            "softmax" => Ok(Self::Softmax),
            "sum" => Ok(Self::Sum),
            _ => Err(format!("unknown palette color `{s}`")),
        }
    }
}

/// A literal xcolor specification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum TikzColor {
    /// A weighted mix in a color model, e.g. `rgb:white,1;black,3`
    Mix {
        model: String,
        parts: Vec<(String, f32)>,
    },
    /// Any other xcolor expression, e.g. `red!50` or `blue`
    Expr(String),
}

impl TikzColor {
    /// Creates an `rgb:` mix from `(color, weight)` pairs
    pub fn rgb_mix<'a>(parts: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        Self::Mix {
            model: "rgb".to_string(),
            parts: parts
                .into_iter()
                .map(|(name, weight)| (name.to_string(), weight))
                .collect(),
        }
    }
}

impl fmt::Display for TikzColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mix { model, parts } => {
                write!(f, "{model}:")?;
                for (i, (name, weight)) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{name},{weight}")?;
                }
                Ok(())
            }
            Self::Expr(expr) => f.write_str(expr),
        }
    }
}

impl FromStr for TikzColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty color".to_string());
        }

        let Some((model, body)) = s.split_once(':') else {
            if is_plain_expression(s) {
                return Ok(Self::Expr(s.to_string()));
            }
            return Err(format!("invalid color expression `{s}`"));
        };

        let parts = body
            .split(';')
            .map(|part| {
                let (name, weight) = part
                    .split_once(',')
                    .ok_or_else(|| format!("invalid color mix `{s}`: `{part}` has no weight"))?;
                let weight = weight
                    .trim()
                    .parse::<f32>()
                    .map_err(|err| format!("invalid color mix `{s}`: {err}"))?;
                Ok((name.trim().to_string(), weight))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self::Mix {
            model: model.trim().to_string(),
            parts,
        })
    }
}

fn is_plain_expression(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '!' | '.' | '-' | '_'))
}

impl TryFrom<String> for TikzColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The fill of a block: a palette entry or a literal color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Fill {
    Palette(PaletteColor),
    Color(TikzColor),
}

impl From<PaletteColor> for Fill {
    fn from(color: PaletteColor) -> Self {
        Self::Palette(color)
    }
}

impl From<TikzColor> for Fill {
    fn from(color: TikzColor) -> Self {
        Self::Color(color)
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(color) => write!(f, "\\{}", color.macro_name()),
            Self::Color(color) => write!(f, "{{{color}}}"),
        }
    }
}

impl FromStr for Fill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<PaletteColor>() {
            Ok(color) => Ok(Self::Palette(color)),
            Err(_) => s.parse().map(Self::Color),
        }
    }
}

impl TryFrom<String> for Fill {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_fill_renders_macro() {
        assert_eq!(Fill::from(PaletteColor::Conv).to_string(), "\\ConvColor");
        assert_eq!(Fill::from(PaletteColor::Sum).to_string(), "\\SumColor");
    }

    #[test]
    fn test_mix_parse_and_display() {
        let color: TikzColor = "rgb:white,1;black,3".parse().unwrap();
        assert_eq!(
            color,
            TikzColor::rgb_mix([("white", 1.0), ("black", 3.0)])
        );
        assert_eq!(color.to_string(), "rgb:white,1;black,3");
        assert_eq!(Fill::from(color).to_string(), "{rgb:white,1;black,3}");
    }

    #[test]
    fn test_default_definitions_parse() {
        for color in PaletteColor::ALL {
            let parsed: TikzColor = color.default_definition().parse().unwrap();
            assert_eq!(parsed.to_string(), color.default_definition());
        }
    }

    #[test]
    fn test_expression_colors() {
        assert_eq!(
            "red!50".parse::<TikzColor>().unwrap(),
            TikzColor::Expr("red!50".to_string())
        );
        assert!("red;green".parse::<TikzColor>().is_err());
        assert!("".parse::<TikzColor>().is_err());
    }

    #[test]
    fn test_mix_without_weight_is_rejected() {
        let err = "rgb:red".parse::<TikzColor>().unwrap_err();
        assert!(err.contains("no weight"), "unexpected error: {err}");
        assert!("rgb:red,lots".parse::<TikzColor>().is_err());
    }

    #[test]
    fn test_fill_prefers_palette_names() {
        assert_eq!(
            "pool".parse::<Fill>().unwrap(),
            Fill::Palette(PaletteColor::Pool)
        );
        assert_eq!(
            "blue".parse::<Fill>().unwrap(),
            Fill::Color(TikzColor::Expr("blue".to_string()))
        );
    }
}
