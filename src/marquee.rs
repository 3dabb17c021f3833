use eframe::egui;

use crate::error::HeroError;
use crate::geometry::DisplayedBox;

/// Pointer-like input in displayed space. Mouse and touch both end up here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(egui::Pos2),
    Move(egui::Pos2),
    Up,
}

/// Lifecycle of a single rectangular selection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Drawing {
        anchor: egui::Pos2,
        live: DisplayedBox,
    },
    /// Released but not yet confirmed.
    Drawn { live: DisplayedBox },
    /// Committed. Pointer input is ignored until reselect.
    Confirmed { live: DisplayedBox },
}

impl Phase {
    pub fn live_box(&self) -> Option<DisplayedBox> {
        match *self {
            Phase::Idle => None,
            Phase::Drawing { live, .. } | Phase::Drawn { live } | Phase::Confirmed { live } => {
                Some(live)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Drawing { .. } => "drawing",
            Phase::Drawn { .. } => "drawn",
            Phase::Confirmed { .. } => "confirmed",
        }
    }
}

/// The marquee state machine for one loaded image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Marquee {
    phase: Phase,
}

impl Marquee {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Confirmed { .. })
    }

    /// Apply one input. Returns whether the state changed, i.e. whether the
    /// canvas needs a redraw.
    pub fn handle(&mut self, input: PointerInput) -> bool {
        let next = match (self.phase, input) {
            (Phase::Confirmed { .. }, _) => return false,
            // A new drag always starts fresh, discarding any unconfirmed box.
            (_, PointerInput::Down(p)) => Phase::Drawing {
                anchor: p,
                live: DisplayedBox::spanning(p, p),
            },
            (Phase::Drawing { anchor, .. }, PointerInput::Move(p)) => Phase::Drawing {
                anchor,
                live: DisplayedBox::spanning(anchor, p),
            },
            (Phase::Drawing { live, .. }, PointerInput::Up) => Phase::Drawn { live },
            _ => return false,
        };

        if next.name() != self.phase.name() {
            tracing::debug!("marquee {} -> {}", self.phase.name(), next.name());
        }
        let changed = next != self.phase;
        self.phase = next;
        changed
    }

    /// The box that confirming would commit, if confirming is allowed.
    pub fn pending_box(&self) -> Result<DisplayedBox, HeroError> {
        match self.phase {
            Phase::Drawn { live } if live.has_area() => Ok(live),
            _ => Err(HeroError::NoSelection),
        }
    }

    pub fn confirm(&mut self) -> Result<DisplayedBox, HeroError> {
        let live = self.pending_box()?;
        self.phase = Phase::Confirmed { live };
        Ok(live)
    }

    /// Follow a relayout of the image by `fx` x `fy`, so the box keeps
    /// covering the same part of the picture.
    pub fn rescale(&mut self, fx: f32, fy: f32) {
        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Drawing { anchor, live } => Phase::Drawing {
                anchor: egui::pos2(anchor.x * fx, anchor.y * fy),
                live: live.scaled(fx, fy),
            },
            Phase::Drawn { live } => Phase::Drawn {
                live: live.scaled(fx, fy),
            },
            Phase::Confirmed { live } => Phase::Confirmed {
                live: live.scaled(fx, fy),
            },
        };
    }

    /// Drop the box and unlock drawing.
    pub fn reselect(&mut self) {
        self.phase = Phase::Idle;
    }
}
