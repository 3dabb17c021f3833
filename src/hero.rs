use crate::error::HeroError;
use crate::geometry::{self, ImageGeometry, NaturalBox};
use crate::marquee::{Marquee, Phase, PointerInput};
use crate::session::{HeroSink, SourceId};

/// Glue between the displayed source image, its marquee and the session.
#[derive(Default)]
pub struct HeroSelection {
    source: Option<SourceId>,
    marquee: Option<Marquee>,
    geometry: Option<ImageGeometry>,
    /// Last usable layout. Marquee coordinates are expressed in this one.
    layout: Option<ImageGeometry>,
    committed: Option<NaturalBox>,
}

impl HeroSelection {
    /// Called whenever the image has been laid out. Geometry follows the
    /// latest layout and an unconfirmed box is rescaled along with it; the
    /// marquee is created only once per image.
    pub fn on_image_loaded(&mut self, geometry: ImageGeometry) {
        self.geometry = Some(geometry);
        if geometry.is_available() {
            if let (Some(marquee), Some(prev)) = (&mut self.marquee, self.layout) {
                if prev.displayed_width != geometry.displayed_width
                    || prev.displayed_height != geometry.displayed_height
                {
                    marquee.rescale(
                        geometry.displayed_width / prev.displayed_width,
                        geometry.displayed_height / prev.displayed_height,
                    );
                }
            }
            self.layout = Some(geometry);
        }
        if self.marquee.is_none() {
            tracing::debug!(
                "selection session for {}x{} image",
                geometry.natural_width,
                geometry.natural_height
            );
            self.marquee = Some(Marquee::default());
        }
    }

    pub fn handle_input(&mut self, input: PointerInput) -> bool {
        match &mut self.marquee {
            Some(marquee) => marquee.handle(input),
            None => false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.marquee.map(|m| *m.phase()).unwrap_or_default()
    }

    /// Phase to paint. A confirmed box is redrawn from the committed natural
    /// box, so it stays on the same pixels when the layout changes.
    pub fn display_phase(&self) -> Phase {
        let phase = self.phase();
        match (phase, self.committed, self.geometry) {
            (Phase::Confirmed { .. }, Some(committed), Some(geometry)) => {
                match geometry::to_displayed(committed, &geometry) {
                    Ok(live) => Phase::Confirmed { live },
                    Err(_) => phase,
                }
            }
            _ => phase,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.marquee.is_some_and(|m| m.is_locked())
    }

    pub fn committed(&self) -> Option<NaturalBox> {
        self.committed
    }

    pub fn can_confirm(&self) -> bool {
        self.marquee.is_some_and(|m| m.pending_box().is_ok())
            && self.geometry.is_some_and(|g| g.is_available())
    }

    /// Map the drawn box into natural pixels and commit it. Refusals leave
    /// both the marquee and the session untouched. A box drawn on an image
    /// the session no longer holds counts as no selection.
    pub fn confirm(&mut self, sink: &mut impl HeroSink) -> Result<NaturalBox, HeroError> {
        let marquee = self.marquee.as_mut().ok_or(HeroError::NoSelection)?;
        let source = self.source.ok_or(HeroError::NoSelection)?;
        let live = marquee.pending_box()?;
        let geometry = self.geometry.ok_or(HeroError::GeometryUnavailable)?;

        let natural = geometry::to_natural(live, &geometry)?
            .clamped_to(geometry.natural_width, geometry.natural_height);
        if natural.width == 0 || natural.height == 0 {
            return Err(HeroError::NoSelection);
        }

        if !sink.commit_hero(source, natural) {
            return Err(HeroError::NoSelection);
        }
        marquee.confirm()?;
        self.committed = Some(natural);
        Ok(natural)
    }

    /// Unlock drawing. The session keeps the old box until the next confirm
    /// overwrites it.
    pub fn reselect(&mut self) {
        self.committed = None;
        if let Some(marquee) = &mut self.marquee {
            marquee.reselect();
        }
    }

    /// Forget everything about the previous image. `source` is the newly
    /// loaded image, or `None` if loading failed.
    pub fn replace_image(&mut self, source: Option<SourceId>, sink: &mut impl HeroSink) {
        self.source = source;
        self.marquee = None;
        self.geometry = None;
        self.layout = None;
        self.committed = None;
        sink.clear_hero();
    }
}
