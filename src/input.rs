//! Folds mouse drags and touch events into one stream of [`PointerInput`].
//!
//! Positions are translated into displayed space (relative to the image
//! rect's top-left) and clamped to the image, so a drag that leaves the
//! picture keeps its box on the picture.

use eframe::egui;

use crate::marquee::PointerInput;

#[derive(Default)]
pub struct InputCollector {
    /// The touch currently driving the marquee. Other fingers are ignored.
    primary_touch: Option<egui::TouchId>,
}

impl InputCollector {
    /// Inputs for this frame. Touch wins: egui also synthesizes pointer
    /// events from the first touch, so the drag path is skipped whenever a
    /// touch is involved.
    pub fn collect(
        &mut self,
        events: &[egui::Event],
        response: &egui::Response,
        image_rect: egui::Rect,
    ) -> Vec<PointerInput> {
        let saw_touch = events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));
        if saw_touch || self.primary_touch.is_some() {
            return self.touch_inputs(events, image_rect);
        }

        from_drag(
            response.drag_started(),
            response.dragged(),
            response.drag_stopped(),
            response.interact_pointer_pos(),
            image_rect,
        )
        .into_iter()
        .collect()
    }

    pub fn touch_inputs(
        &mut self,
        events: &[egui::Event],
        image_rect: egui::Rect,
    ) -> Vec<PointerInput> {
        let mut out = Vec::new();
        for event in events {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            match (self.primary_touch, phase) {
                (None, egui::TouchPhase::Start) if image_rect.contains(*pos) => {
                    self.primary_touch = Some(*id);
                    out.push(PointerInput::Down(to_displayed(*pos, image_rect)));
                }
                (Some(primary), egui::TouchPhase::Move) if primary == *id => {
                    out.push(PointerInput::Move(to_displayed(*pos, image_rect)));
                }
                (Some(primary), egui::TouchPhase::End | egui::TouchPhase::Cancel)
                    if primary == *id =>
                {
                    self.primary_touch = None;
                    out.push(PointerInput::Up);
                }
                _ => {}
            }
        }
        out
    }
}

/// Translate egui's drag lifecycle flags into a single input.
pub fn from_drag(
    started: bool,
    dragging: bool,
    stopped: bool,
    pos: Option<egui::Pos2>,
    image_rect: egui::Rect,
) -> Option<PointerInput> {
    if stopped {
        return Some(PointerInput::Up);
    }
    let pos = to_displayed(pos?, image_rect);
    if started {
        Some(PointerInput::Down(pos))
    } else if dragging {
        Some(PointerInput::Move(pos))
    } else {
        None
    }
}

fn to_displayed(pos: egui::Pos2, image_rect: egui::Rect) -> egui::Pos2 {
    let clamped = pos.clamp(image_rect.min, image_rect.max);
    egui::pos2(clamped.x - image_rect.min.x, clamped.y - image_rect.min.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(20.0, 20.0), egui::vec2(600.0, 400.0))
    }

    fn touch(id: u64, phase: egui::TouchPhase, x: f32, y: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: egui::TouchId(id),
            phase,
            pos: egui::pos2(x, y),
            force: None,
        }
    }

    #[test]
    fn drag_flags_map_to_inputs_in_image_space() {
        let r = rect();
        assert_eq!(
            from_drag(true, true, false, Some(egui::pos2(70.0, 70.0)), r),
            Some(PointerInput::Down(egui::pos2(50.0, 50.0)))
        );
        assert_eq!(
            from_drag(false, true, false, Some(egui::pos2(270.0, 170.0)), r),
            Some(PointerInput::Move(egui::pos2(250.0, 150.0)))
        );
        assert_eq!(from_drag(false, false, true, None, r), Some(PointerInput::Up));
        assert_eq!(from_drag(false, false, false, Some(egui::pos2(1.0, 1.0)), r), None);
    }

    #[test]
    fn positions_past_the_image_are_clamped() {
        assert_eq!(
            from_drag(false, true, false, Some(egui::pos2(900.0, -5.0)), rect()),
            Some(PointerInput::Move(egui::pos2(600.0, 0.0)))
        );
    }

    #[test]
    fn only_the_primary_touch_is_read() {
        let mut c = InputCollector::default();
        let events = [
            touch(1, egui::TouchPhase::Start, 70.0, 70.0),
            touch(2, egui::TouchPhase::Start, 300.0, 300.0),
            touch(2, egui::TouchPhase::Move, 310.0, 310.0),
            touch(1, egui::TouchPhase::Move, 120.0, 90.0),
            touch(2, egui::TouchPhase::End, 310.0, 310.0),
            touch(1, egui::TouchPhase::End, 120.0, 90.0),
        ];
        assert_eq!(
            c.touch_inputs(&events, rect()),
            vec![
                PointerInput::Down(egui::pos2(50.0, 50.0)),
                PointerInput::Move(egui::pos2(100.0, 70.0)),
                PointerInput::Up,
            ]
        );
    }

    #[test]
    fn touch_starting_off_image_is_ignored() {
        let mut c = InputCollector::default();
        let events = [
            touch(1, egui::TouchPhase::Start, 5.0, 5.0),
            touch(1, egui::TouchPhase::Move, 100.0, 100.0),
        ];
        assert!(c.touch_inputs(&events, rect()).is_empty());
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn mirrored_pointer_events_do_not_double_a_touch() {
        let ctx = egui::Context::default();
        let mut collector = InputCollector::default();
        let mut received = Vec::new();
        let mut image_rect = egui::Rect::NOTHING;

        let start = egui::pos2(100.0, 100.0);
        let end = egui::pos2(180.0, 150.0);
        let frames = vec![
            vec![
                touch(1, egui::TouchPhase::Start, start.x, start.y),
                egui::Event::PointerMoved(start),
                button(start, true),
            ],
            vec![
                touch(1, egui::TouchPhase::Move, end.x, end.y),
                egui::Event::PointerMoved(end),
            ],
            vec![
                touch(1, egui::TouchPhase::End, end.x, end.y),
                button(end, false),
                egui::Event::PointerGone,
            ],
        ];

        for events in frames {
            let raw = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(800.0, 600.0),
                )),
                events,
                ..Default::default()
            };
            let _ = ctx.run(raw, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(400.0, 300.0), egui::Sense::drag());
                    let events = ui.input(|i| i.events.clone());
                    received.extend(collector.collect(&events, &response, rect));
                    image_rect = rect;
                });
            });
        }

        let origin = image_rect.min.to_vec2();
        assert_eq!(
            received,
            vec![
                PointerInput::Down(start - origin),
                PointerInput::Move(end - origin),
                PointerInput::Up,
            ]
        );
        assert!(collector.primary_touch.is_none());
    }

    #[test]
    fn cancelled_touch_releases_the_marquee() {
        let mut c = InputCollector::default();
        c.touch_inputs(&[touch(3, egui::TouchPhase::Start, 30.0, 30.0)], rect());
        assert_eq!(
            c.touch_inputs(&[touch(3, egui::TouchPhase::Cancel, 30.0, 30.0)], rect()),
            vec![PointerInput::Up]
        );
        assert!(c.primary_touch.is_none());
    }
}
