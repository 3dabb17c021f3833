//! Cross-step wizard state.
//!
//! The hero controller only ever sees this through [`HeroSink`], which
//! exposes the two writes it owns and nothing else.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::geometry::NaturalBox;
use crate::overlay::OverlayConfig;

/// Identifies one loaded source image. A fresh id is handed out every time
/// the source is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

#[derive(Clone, Debug)]
pub struct SourceImage {
    pub id: SourceId,
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
}

/// The hero box together with the source it was drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HeroCommit {
    source: SourceId,
    bbox: NaturalBox,
}

/// Write access to the hero fields of the session.
pub trait HeroSink {
    /// Store `bbox` for `source`. Returns false, writing nothing, when
    /// `source` is not the image currently loaded.
    fn commit_hero(&mut self, source: SourceId, bbox: NaturalBox) -> bool;
    fn clear_hero(&mut self);
}

#[derive(Default)]
pub struct WizardSession {
    formats: BTreeSet<String>,
    source: Option<SourceImage>,
    hero: Option<HeroCommit>,
    pub overlays: OverlayConfig,
    next_id: u64,
}

impl WizardSession {
    pub fn selected_formats(&self) -> &BTreeSet<String> {
        &self.formats
    }

    pub fn is_format_selected(&self, id: &str) -> bool {
        self.formats.contains(id)
    }

    pub fn set_format_selected(&mut self, id: &str, selected: bool) {
        if selected {
            self.formats.insert(id.to_owned());
        } else {
            self.formats.remove(id);
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Replace the source image. Any hero box drawn on the old one is gone.
    pub fn set_source(
        &mut self,
        name: String,
        bytes: Arc<[u8]>,
        mime: &'static str,
        width: u32,
        height: u32,
    ) -> SourceId {
        self.next_id += 1;
        let id = SourceId(self.next_id);
        self.source = Some(SourceImage {
            id,
            name,
            bytes,
            mime,
            width,
            height,
        });
        self.hero = None;
        id
    }

    pub fn clear_source(&mut self) {
        self.source = None;
        self.hero = None;
    }

    /// The committed hero box, only if it belongs to the current source.
    pub fn hero_bbox(&self) -> Option<NaturalBox> {
        let source = self.source.as_ref()?;
        self.hero
            .filter(|commit| commit.source == source.id)
            .map(|commit| commit.bbox)
    }

    pub fn ready_for_hero(&self) -> bool {
        !self.formats.is_empty()
    }

    pub fn ready_for_overlays(&self) -> bool {
        self.ready_for_hero() && self.source.is_some()
    }
}

impl HeroSink for WizardSession {
    fn commit_hero(&mut self, source: SourceId, bbox: NaturalBox) -> bool {
        if self.source.as_ref().map(|s| s.id) != Some(source) {
            tracing::warn!("ignoring hero box for a source that is no longer loaded");
            return false;
        }
        tracing::info!(
            "hero box committed: x={} y={} w={} h={}",
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height
        );
        self.hero = Some(HeroCommit { source, bbox });
        true
    }

    fn clear_hero(&mut self) {
        self.hero = None;
    }
}
