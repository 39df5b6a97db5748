//! Easing curve selection for value animations

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Easing curve applied to animation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingKind {
    #[default]
    Linear,
    EaseOut,
    EaseIn,
    EaseInOut,
    Bounce,
    Elastic,
    BackIn,
    BackOut,
}

impl EasingKind {
    pub const ALL: [EasingKind; 8] = [
        EasingKind::Linear,
        EasingKind::EaseOut,
        EasingKind::EaseIn,
        EasingKind::EaseInOut,
        EasingKind::Bounce,
        EasingKind::Elastic,
        EasingKind::BackIn,
        EasingKind::BackOut,
    ];

    /// Canonical name used when serializing
    pub fn name(self) -> &'static str {
        match self {
            EasingKind::Linear => "linear",
            EasingKind::EaseOut => "ease-out",
            EasingKind::EaseIn => "ease-in",
            EasingKind::EaseInOut => "ease-in-out",
            EasingKind::Bounce => "bounce",
            EasingKind::Elastic => "elastic",
            EasingKind::BackIn => "back-in",
            EasingKind::BackOut => "back-out",
        }
    }

    /// Resolve a name, including the short symbolic aliases (`>`, `<`, `<>`, `-`).
    /// Unknown names fall back to linear.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "linear" | "-" => EasingKind::Linear,
            ">" | "easeOut" | "ease-out" => EasingKind::EaseOut,
            "<" | "easeIn" | "ease-in" => EasingKind::EaseIn,
            "<>" | "easeInOut" | "ease-in-out" => EasingKind::EaseInOut,
            "bounce" => EasingKind::Bounce,
            "elastic" => EasingKind::Elastic,
            "backIn" | "back-in" => EasingKind::BackIn,
            "backOut" | "back-out" => EasingKind::BackOut,
            other => {
                log::debug!("Unknown easing '{}', using linear", other);
                EasingKind::Linear
            }
        }
    }
}

impl fmt::Display for EasingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for EasingKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EasingKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_aliases() {
        assert_eq!(EasingKind::from_name(">"), EasingKind::EaseOut);
        assert_eq!(EasingKind::from_name("<"), EasingKind::EaseIn);
        assert_eq!(EasingKind::from_name("<>"), EasingKind::EaseInOut);
        assert_eq!(EasingKind::from_name("-"), EasingKind::Linear);
        assert_eq!(EasingKind::from_name("backOut"), EasingKind::BackOut);
    }

    #[test]
    fn test_unknown_is_linear() {
        assert_eq!(EasingKind::from_name("wobble"), EasingKind::Linear);
        let parsed: EasingKind = serde_json::from_str("\"nope\"").unwrap();
        assert_eq!(parsed, EasingKind::Linear);
    }

    #[test]
    fn test_names_roundtrip() {
        for kind in EasingKind::ALL {
            assert_eq!(EasingKind::from_name(kind.name()), kind);
        }
    }
}
