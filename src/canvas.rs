use eframe::egui;

use crate::marquee::Phase;

const BACKGROUND: egui::Color32 = egui::Color32::from_gray(27);
const DRAWING_STROKE: egui::Color32 = egui::Color32::from_rgb(255, 214, 10);
const DRAWN_STROKE: egui::Color32 = egui::Color32::WHITE;
const CONFIRMED_STROKE: egui::Color32 = egui::Color32::from_rgb(50, 205, 50);

/// Everything painted for the hero canvas in one frame: clear, base image at
/// its displayed size, then the marquee if there is one.
///
/// Pure function of its inputs, so repainting any number of times is safe.
pub fn marquee_shapes(
    texture: egui::TextureId,
    image_rect: egui::Rect,
    phase: &Phase,
) -> Vec<egui::Shape> {
    let mut shapes = vec![
        egui::Shape::rect_filled(image_rect, 0.0, BACKGROUND),
        egui::Shape::image(
            texture,
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        ),
    ];

    let Some(live) = phase.live_box() else {
        return shapes;
    };
    let marquee = live.to_screen(image_rect.min).intersect(image_rect);

    // Dim everything outside the hero region
    let overlay_color = egui::Color32::from_black_alpha(150);
    for dim in [
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, marquee.min.y)),
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, marquee.max.y), image_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, marquee.min.y),
            egui::pos2(marquee.min.x, marquee.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(marquee.max.x, marquee.min.y),
            egui::pos2(image_rect.max.x, marquee.max.y),
        ),
    ] {
        if dim.is_positive() {
            shapes.push(egui::Shape::rect_filled(dim, 0.0, overlay_color));
        }
    }

    let (color, width) = match phase {
        Phase::Drawing { .. } => (DRAWING_STROKE, 1.0),
        Phase::Drawn { .. } => (DRAWN_STROKE, 1.5),
        _ => (CONFIRMED_STROKE, 2.0),
    };
    shapes.push(egui::Shape::rect_stroke(
        marquee,
        0.0,
        egui::Stroke::new(width, color),
    ));

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marquee::{Marquee, PointerInput};

    fn image_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(20.0, 20.0), egui::vec2(600.0, 400.0))
    }

    #[test]
    fn idle_draws_only_background_and_image() {
        let shapes = marquee_shapes(egui::TextureId::Managed(1), image_rect(), &Phase::Idle);
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut m = Marquee::default();
        m.handle(PointerInput::Down(egui::pos2(50.0, 50.0)));
        m.handle(PointerInput::Move(egui::pos2(250.0, 150.0)));
        let before = m;

        let first = marquee_shapes(egui::TextureId::Managed(1), image_rect(), m.phase());
        let second = marquee_shapes(egui::TextureId::Managed(1), image_rect(), m.phase());

        assert_eq!(first, second);
        assert_eq!(m, before);
    }

    #[test]
    fn drawn_box_is_a_plain_outline() {
        let mut m = Marquee::default();
        m.handle(PointerInput::Down(egui::pos2(50.0, 50.0)));
        m.handle(PointerInput::Move(egui::pos2(250.0, 150.0)));
        m.handle(PointerInput::Up);

        let shapes = marquee_shapes(egui::TextureId::Managed(1), image_rect(), m.phase());
        assert!(shapes.iter().all(|s| !matches!(s, egui::Shape::Circle(_))));
        // background, image, four dims, outline
        assert_eq!(shapes.len(), 7);
    }

    #[test]
    fn stroke_follows_live_box_in_screen_space() {
        let mut m = Marquee::default();
        m.handle(PointerInput::Down(egui::pos2(50.0, 50.0)));
        m.handle(PointerInput::Move(egui::pos2(250.0, 150.0)));

        let shapes = marquee_shapes(egui::TextureId::Managed(1), image_rect(), m.phase());
        let stroked = shapes.iter().find_map(|s| match s {
            egui::Shape::Rect(r) if r.stroke.width > 0.0 => Some(r.rect),
            _ => None,
        });
        assert_eq!(
            stroked,
            Some(egui::Rect::from_min_max(egui::pos2(70.0, 70.0), egui::pos2(270.0, 170.0)))
        );
    }
}
