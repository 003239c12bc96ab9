use comfy_table::Color;
use derive_more::Display;

/// Semantic category of an operating mode reported by the planning service.
///
/// The mode itself is an open set on the wire, so anything unrecognised lands in [`Self::Idle`].
#[derive(Debug, Hash, Display, enumset::EnumSetType)]
pub enum ModeCategory {
    Heating,
    Cooling,
    Eco,
    Boost,

    /// Idle, or a mode we do not know about.
    Idle,
}

impl ModeCategory {
    #[must_use]
    pub fn classify(mode: &str) -> Self {
        let mode = mode.trim();
        if mode.eq_ignore_ascii_case("heating") {
            Self::Heating
        } else if mode.eq_ignore_ascii_case("cooling") {
            Self::Cooling
        } else if mode.eq_ignore_ascii_case("eco") {
            Self::Eco
        } else if mode.eq_ignore_ascii_case("boost") {
            Self::Boost
        } else {
            Self::Idle
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Heating => Color::DarkYellow,
            Self::Cooling => Color::Cyan,
            Self::Eco => Color::Green,
            Self::Boost => Color::Red,
            Self::Idle => Color::DarkGrey,
        }
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(ModeCategory::classify("HEATING"), ModeCategory::classify("heating"));
        assert_eq!(ModeCategory::classify("Heating"), ModeCategory::Heating);
        assert_eq!(ModeCategory::classify(" eco "), ModeCategory::Eco);
        assert_eq!(ModeCategory::classify("BOOST"), ModeCategory::Boost);
        assert_eq!(ModeCategory::classify("cooling"), ModeCategory::Cooling);
    }

    #[test]
    fn test_classify_unknown_falls_back_to_idle() {
        assert_eq!(ModeCategory::classify("unknown-mode-x"), ModeCategory::Idle);
        assert_eq!(ModeCategory::classify(""), ModeCategory::Idle);
        assert_eq!(ModeCategory::classify("idle"), ModeCategory::Idle);
    }

    #[test]
    fn test_palette_is_distinct() {
        let colors: Vec<_> = EnumSet::<ModeCategory>::all().iter().map(ModeCategory::color).collect();
        for (i, lhs) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|rhs| rhs != lhs));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ModeCategory::Heating.to_string(), "Heating");
        assert_eq!(ModeCategory::Idle.to_string(), "Idle");
    }
}
