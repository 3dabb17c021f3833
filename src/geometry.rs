//! Mapping between displayed space (egui points over the rendered image)
//! and natural space (pixels of the full-resolution bitmap).
//!
//! The two spaces get separate box types so a box can never be stored or
//! compared without knowing which space it lives in.

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::error::HeroError;

/// A rectangle in displayed space, relative to the top-left of the image rect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayedBox {
    /// Box spanned by two corners, normalized so that it is anchored at the
    /// min corner with non-negative size whichever way the drag went.
    pub fn spanning(a: egui::Pos2, b: egui::Pos2) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn scaled(&self, fx: f32, fy: f32) -> Self {
        Self {
            x: self.x * fx,
            y: self.y * fy,
            width: self.width * fx,
            height: self.height * fy,
        }
    }

    /// Screen rect of this box for an image drawn with its top-left at `origin`.
    pub fn to_screen(&self, origin: egui::Pos2) -> egui::Rect {
        egui::Rect::from_min_size(
            origin + egui::vec2(self.x, self.y),
            egui::vec2(self.width, self.height),
        )
    }
}

/// A rectangle in natural space, in whole bitmap pixels.
///
/// Serializes as `{x, y, width, height}`, the shape the generation backend
/// expects for `userInputHeroBbox`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl NaturalBox {
    /// Intersect with a `width` x `height` bitmap.
    pub fn clamped_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// Sizes of the currently loaded image. Derived every frame, never stored
/// beyond the current selection session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageGeometry {
    pub natural_width: u32,
    pub natural_height: u32,
    pub displayed_width: f32,
    pub displayed_height: f32,
}

impl ImageGeometry {
    pub fn new(
        natural_width: u32,
        natural_height: u32,
        displayed_width: f32,
        displayed_height: f32,
    ) -> Self {
        Self {
            natural_width,
            natural_height,
            displayed_width,
            displayed_height,
        }
    }

    /// Geometry of a `natural`-sized bitmap painted into `image_rect`.
    pub fn from_display(natural: [usize; 2], image_rect: egui::Rect) -> Self {
        Self::new(
            natural[0] as u32,
            natural[1] as u32,
            image_rect.width(),
            image_rect.height(),
        )
    }

    /// True once the image has a usable layout size.
    pub fn is_available(&self) -> bool {
        usable(self.displayed_width)
            && usable(self.displayed_height)
            && self.natural_width > 0
            && self.natural_height > 0
    }

    fn scale_to_natural(&self) -> Result<(f64, f64), HeroError> {
        if !self.is_available() {
            return Err(HeroError::GeometryUnavailable);
        }
        Ok((
            self.natural_width as f64 / self.displayed_width as f64,
            self.natural_height as f64 / self.displayed_height as f64,
        ))
    }
}

fn usable(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Rescale a displayed-space box into natural pixels. Rounding to the
/// nearest pixel happens only here, on the final output.
pub fn to_natural(rect: DisplayedBox, geometry: &ImageGeometry) -> Result<NaturalBox, HeroError> {
    let (sx, sy) = geometry.scale_to_natural()?;
    let px = |v: f32, scale: f64| (v.max(0.0) as f64 * scale).round() as u32;
    Ok(NaturalBox {
        x: px(rect.x, sx),
        y: px(rect.y, sy),
        width: px(rect.width, sx),
        height: px(rect.height, sy),
    })
}

/// Inverse of [`to_natural`]. Displayed space is fractional, so nothing is
/// rounded.
pub fn to_displayed(
    rect: NaturalBox,
    geometry: &ImageGeometry,
) -> Result<DisplayedBox, HeroError> {
    let (sx, sy) = geometry.scale_to_natural()?;
    Ok(DisplayedBox {
        x: (rect.x as f64 / sx) as f32,
        y: (rect.y as f64 / sy) as f32,
        width: (rect.width as f64 / sx) as f32,
        height: (rect.height as f64 / sy) as f32,
    })
}

/// Largest size with the bitmap's aspect ratio that fits into `available`.
pub fn fit_size(natural: egui::Vec2, available: egui::Vec2) -> egui::Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 || available.x <= 0.0 || available.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (available.x / natural.x).min(available.y / natural.y);
    natural * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(nw: u32, nh: u32, dw: f32, dh: f32) -> ImageGeometry {
        ImageGeometry::new(nw, nh, dw, dh)
    }

    #[test]
    fn spanning_normalizes_all_four_directions() {
        let anchor = egui::pos2(100.0, 100.0);
        for end in [
            egui::pos2(160.0, 130.0),
            egui::pos2(40.0, 130.0),
            egui::pos2(160.0, 70.0),
            egui::pos2(40.0, 70.0),
        ] {
            let b = DisplayedBox::spanning(anchor, end);
            assert_eq!(b.x, anchor.x.min(end.x));
            assert_eq!(b.y, anchor.y.min(end.y));
            assert_eq!(b.width, 60.0);
            assert_eq!(b.height, 30.0);
        }
    }

    #[test]
    fn scales_quarter_size_display_to_natural() {
        let g = geometry(2000, 1000, 500.0, 250.0);
        let b = DisplayedBox {
            x: 100.0,
            y: 50.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(
            to_natural(b, &g),
            Ok(NaturalBox {
                x: 400,
                y: 200,
                width: 800,
                height: 400
            })
        );
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        // 3x upscale: 10.5 * 3 = 31.5 rounds away from zero.
        let g = geometry(300, 300, 100.0, 100.0);
        let b = DisplayedBox {
            x: 10.5,
            y: 0.1,
            width: 33.33,
            height: 0.2,
        };
        assert_eq!(
            to_natural(b, &g),
            Ok(NaturalBox {
                x: 32,
                y: 0,
                width: 100,
                height: 1
            })
        );
    }

    #[test]
    fn zero_layout_size_is_unavailable() {
        let b = DisplayedBox {
            x: 1.0,
            y: 1.0,
            width: 5.0,
            height: 5.0,
        };
        for g in [
            geometry(100, 100, 0.0, 50.0),
            geometry(100, 100, 50.0, 0.0),
            geometry(100, 100, f32::NAN, 50.0),
            geometry(0, 100, 50.0, 50.0),
        ] {
            assert_eq!(to_natural(b, &g), Err(HeroError::GeometryUnavailable));
            assert!(to_displayed(NaturalBox::default(), &g).is_err());
        }
    }

    #[test]
    fn to_displayed_inverts_to_natural() {
        let g = geometry(3000, 2000, 600.0, 400.0);
        let natural = NaturalBox {
            x: 250,
            y: 250,
            width: 1000,
            height: 500,
        };
        let displayed = to_displayed(natural, &g).unwrap();
        assert_eq!(
            displayed,
            DisplayedBox {
                x: 50.0,
                y: 50.0,
                width: 200.0,
                height: 100.0
            }
        );
        assert_eq!(to_natural(displayed, &g), Ok(natural));
    }

    #[test]
    fn clamp_keeps_box_inside_bitmap() {
        let b = NaturalBox {
            x: 90,
            y: 120,
            width: 50,
            height: 10,
        };
        assert_eq!(
            b.clamped_to(100, 100),
            NaturalBox {
                x: 90,
                y: 100,
                width: 10,
                height: 0
            }
        );
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let size = fit_size(egui::vec2(3000.0, 2000.0), egui::vec2(600.0, 600.0));
        assert_eq!(size, egui::vec2(600.0, 400.0));
        assert_eq!(
            fit_size(egui::vec2(3000.0, 2000.0), egui::vec2(0.0, 600.0)),
            egui::Vec2::ZERO
        );
    }
}
