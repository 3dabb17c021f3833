//! Logo, ad copy and call-to-action settings as the generation backend
//! expects them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::formats::Orientation;

/// Font files the generation backend knows about.
pub const FONT_CHOICES: &[&str] = &[
    "arial.ttf",
    "helvetica.ttf",
    "verdana.ttf",
    "georgia.ttf",
    "times.ttf",
    "cour.ttf",
    "Inter-Regular.ttf",
    "Roboto-Regular.ttf",
    "OpenSans-Regular.ttf",
    "Lato-Regular.ttf",
    "Montserrat-Regular.ttf",
    "Poppins-Regular.ttf",
    "Nunito-Regular.ttf",
];

/// Anchor of an overlay element inside its zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    TopLeft,
    TopCenter,
    TopRight,
    LeftMiddle,
    CenterMiddle,
    RightMiddle,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Placement {
    pub const ALL: [Placement; 9] = [
        Placement::TopLeft,
        Placement::TopCenter,
        Placement::TopRight,
        Placement::LeftMiddle,
        Placement::CenterMiddle,
        Placement::RightMiddle,
        Placement::BottomLeft,
        Placement::BottomCenter,
        Placement::BottomRight,
    ];
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Placement::TopLeft => "Top left",
            Placement::TopCenter => "Top center",
            Placement::TopRight => "Top right",
            Placement::LeftMiddle => "Left middle",
            Placement::CenterMiddle => "Center",
            Placement::RightMiddle => "Right middle",
            Placement::BottomLeft => "Bottom left",
            Placement::BottomCenter => "Bottom center",
            Placement::BottomRight => "Bottom right",
        };
        write!(f, "{}", s)
    }
}

/// Which formats an element goes on, and where it sits per orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayRule {
    pub enabled: bool,
    pub applies_to_all: bool,
    pub selected_formats: Vec<String>,
    pub position_by_orientation: BTreeMap<Orientation, Placement>,
}

impl OverlayRule {
    fn with_defaults(landscape: Placement, portrait: Placement, square: Placement) -> Self {
        Self {
            enabled: false,
            applies_to_all: true,
            selected_formats: Vec::new(),
            position_by_orientation: BTreeMap::from([
                (Orientation::Landscape, landscape),
                (Orientation::Portrait, portrait),
                (Orientation::Square, square),
            ]),
        }
    }

    pub fn applies_to(&self, format_id: &str) -> bool {
        self.enabled
            && (self.applies_to_all || self.selected_formats.iter().any(|f| f == format_id))
    }

    pub fn toggle_format(&mut self, format_id: &str, on: bool) {
        self.selected_formats.retain(|f| f != format_id);
        if on {
            self.selected_formats.push(format_id.to_owned());
        }
    }

    /// Formats this rule is limited to, or empty when it applies to all.
    pub fn format_list(&self) -> Vec<String> {
        if self.applies_to_all {
            Vec::new()
        } else {
            self.selected_formats.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogoOverlay {
    pub rule: OverlayRule,
    /// File name and raw bytes of the logo image.
    pub image: Option<(String, Arc<[u8]>)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CopyOverlay {
    pub rule: OverlayRule,
    pub text: String,
    pub font: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CtaOverlay {
    pub rule: OverlayRule,
    pub text: String,
    pub font: String,
    pub text_color: String,
    pub background_color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    pub logo: LogoOverlay,
    pub copy: CopyOverlay,
    pub cta: CtaOverlay,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        use Placement::*;
        Self {
            logo: LogoOverlay {
                rule: OverlayRule::with_defaults(TopLeft, TopCenter, TopLeft),
                image: None,
            },
            copy: CopyOverlay {
                rule: OverlayRule::with_defaults(BottomLeft, BottomCenter, BottomCenter),
                text: String::new(),
                font: "arial.ttf".into(),
                color: "#000000".into(),
            },
            cta: CtaOverlay {
                rule: OverlayRule::with_defaults(BottomRight, BottomCenter, BottomRight),
                text: String::new(),
                font: "arial.ttf".into(),
                text_color: "#FFFFFF".into(),
                background_color: "#000000".into(),
            },
        }
    }
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_serializes_as_backend_key() {
        assert_eq!(
            serde_json::to_string(&Placement::BottomCenter).unwrap(),
            "\"bottom_center\""
        );
        assert_eq!(
            serde_json::to_string(&Placement::LeftMiddle).unwrap(),
            "\"left_middle\""
        );
    }

    #[test]
    fn rule_scopes_to_selected_formats() {
        let mut rule = OverlayConfig::default().logo.rule;
        assert!(!rule.applies_to("fb-feed-1200x628"));

        rule.enabled = true;
        assert!(rule.applies_to("fb-feed-1200x628"));

        rule.applies_to_all = false;
        rule.toggle_format("ig-story-1080x1920", true);
        rule.toggle_format("ig-story-1080x1920", true);
        assert_eq!(rule.format_list(), vec!["ig-story-1080x1920".to_string()]);
        assert!(!rule.applies_to("fb-feed-1200x628"));

        rule.toggle_format("ig-story-1080x1920", false);
        assert!(rule.format_list().is_empty());
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#FFF"));
        assert!(is_hex_color("#1a2B3c"));
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
    }
}
