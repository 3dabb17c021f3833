use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Landscape,
        Orientation::Portrait,
        Orientation::Square,
    ];
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
            Orientation::Square => "Square",
        };
        write!(f, "{}", s)
    }
}

/// One target output size.
#[derive(Clone, Debug, PartialEq)]
pub struct AdFormat {
    pub id: &'static str,
    pub label: &'static str,
    pub platform: &'static str,
    pub width: u32,
    pub height: u32,
}

impl AdFormat {
    pub fn orientation(&self) -> Orientation {
        use std::cmp::Ordering;
        match self.width.cmp(&self.height) {
            Ordering::Greater => Orientation::Landscape,
            Ordering::Less => Orientation::Portrait,
            Ordering::Equal => Orientation::Square,
        }
    }
}

const fn ad(
    id: &'static str,
    label: &'static str,
    platform: &'static str,
    width: u32,
    height: u32,
) -> AdFormat {
    AdFormat {
        id,
        label,
        platform,
        width,
        height,
    }
}

pub const CATALOG: &[AdFormat] = &[
    // Social feeds
    ad("fb-feed-1200x628", "Feed", "Facebook", 1200, 628),
    ad("fb-square-1080x1080", "Square post", "Facebook", 1080, 1080),
    ad("ig-square-1080x1080", "Square post", "Instagram", 1080, 1080),
    ad("ig-portrait-1080x1350", "Portrait post", "Instagram", 1080, 1350),
    ad("li-feed-1200x627", "Feed", "LinkedIn", 1200, 627),
    ad("x-post-1600x900", "Post", "X", 1600, 900),
    ad("pin-standard-1000x1500", "Standard pin", "Pinterest", 1000, 1500),
    // Stories
    ad("ig-story-1080x1920", "Story", "Instagram", 1080, 1920),
    ad("fb-story-1080x1920", "Story", "Facebook", 1080, 1920),
    ad("tt-video-1080x1920", "In-feed", "TikTok", 1080, 1920),
    // Display banners
    ad("gdn-rectangle-300x250", "Medium rectangle", "Display", 300, 250),
    ad("gdn-large-rectangle-336x280", "Large rectangle", "Display", 336, 280),
    ad("gdn-leaderboard-728x90", "Leaderboard", "Display", 728, 90),
    ad("gdn-skyscraper-160x600", "Wide skyscraper", "Display", 160, 600),
    ad("gdn-half-page-300x600", "Half page", "Display", 300, 600),
    ad("gdn-mobile-320x50", "Mobile banner", "Display", 320, 50),
    ad("gdn-billboard-970x250", "Billboard", "Display", 970, 250),
];

pub fn find(id: &str) -> Option<&'static AdFormat> {
    CATALOG.iter().find(|f| f.id == id)
}

/// Distinct platforms in catalog order.
pub fn platforms() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for f in CATALOG {
        if !out.contains(&f.platform) {
            out.push(f.platform);
        }
    }
    out
}
