use std::collections::BTreeSet;
use std::sync::Arc;

use eframe::egui;
use image::DynamicImage;

use crate::canvas;
use crate::config::Config;
use crate::decode::{DecodeSource, DecodedImage, ImageLoader};
use crate::formats::{self, Orientation};
use crate::geometry::{self, ImageGeometry};
use crate::hero::HeroSelection;
use crate::input::InputCollector;
use crate::marquee::Phase;
use crate::overlay::{self, OverlayRule, Placement};
use crate::request;
use crate::session::WizardSession;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Step {
    #[default]
    Formats,
    Hero,
    Overlays,
    Review,
}

impl Step {
    const ALL: [Step; 4] = [Step::Formats, Step::Hero, Step::Overlays, Step::Review];

    fn next(self) -> Option<Step> {
        match self {
            Step::Formats => Some(Step::Hero),
            Step::Hero => Some(Step::Overlays),
            Step::Overlays => Some(Step::Review),
            Step::Review => None,
        }
    }

    fn prev(self) -> Option<Step> {
        match self {
            Step::Formats => None,
            Step::Hero => Some(Step::Formats),
            Step::Overlays => Some(Step::Hero),
            Step::Review => Some(Step::Overlays),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Step::Formats => "1. Formats",
            Step::Hero => "2. Hero region",
            Step::Overlays => "3. Overlays",
            Step::Review => "4. Review",
        };
        write!(f, "{}", s)
    }
}

enum Status {
    Info(String),
    Error(String),
}

pub struct HeroCropperApp {
    session: WizardSession,
    hero: HeroSelection,
    loader: ImageLoader,
    input: InputCollector,
    texture: Option<egui::TextureHandle>,
    step: Step,
    status: Option<Status>,
}

impl HeroCropperApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config) -> Self {
        let mut loader = ImageLoader::new(Some(cc.egui_ctx.clone()));
        if let Some(path) = &config.image {
            loader.request(DecodeSource::Path(path.clone()));
        }
        Self {
            session: WizardSession::default(),
            hero: HeroSelection::default(),
            loader,
            input: InputCollector::default(),
            texture: None,
            step: Step::default(),
            status: None,
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context, image: &DynamicImage) {
        let size = [image.width() as _, image.height() as _];
        let image_buffer = image.to_rgba8();
        let pixels = image_buffer.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        self.texture = Some(ctx.load_texture("source", color_image, egui::TextureOptions::LINEAR));
    }

    fn receive_decoded(&mut self, ctx: &egui::Context) {
        match self.loader.poll() {
            Some(Ok(decoded)) => self.accept_image(ctx, decoded),
            Some(Err(e)) => {
                tracing::warn!("{}", e);
                self.session.clear_source();
                self.hero.replace_image(None, &mut self.session);
                self.texture = None;
                self.status = Some(Status::Error(e.to_string()));
            }
            None => {}
        }
    }

    fn accept_image(&mut self, ctx: &egui::Context, decoded: DecodedImage) {
        let DecodedImage {
            name,
            bytes,
            mime,
            image,
        } = decoded;
        let id = self
            .session
            .set_source(name.clone(), bytes, mime, image.width(), image.height());
        self.hero.replace_image(Some(id), &mut self.session);
        self.load_texture(ctx, &image);
        self.status = Some(Status::Info(format!(
            "Loaded {} ({}x{})",
            name,
            image.width(),
            image.height()
        )));
        if self.session.ready_for_hero() {
            self.step = Step::Hero;
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped_files.first() else {
            return;
        };
        if let Some(path) = &file.path {
            self.loader.request(DecodeSource::Path(path.clone()));
        } else if let Some(bytes) = &file.bytes {
            self.loader.request(DecodeSource::Bytes {
                name: file.name.clone(),
                bytes: bytes.clone(),
            });
        }
    }

    fn open_image_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp", "webp"])
            .pick_file()
        {
            self.loader.request(DecodeSource::Path(path));
        }
    }

    fn can_enter(&self, step: Step) -> bool {
        match step {
            Step::Formats => true,
            Step::Hero => self.session.ready_for_hero(),
            Step::Overlays | Step::Review => self.session.ready_for_overlays(),
        }
    }

    fn nav_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for step in Step::ALL {
                let enabled = self.can_enter(step);
                let label = egui::SelectableLabel::new(self.step == step, step.to_string());
                if ui.add_enabled(enabled, label).clicked() {
                    self.step = step;
                }
            }
        });
    }

    fn footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(prev) = self.step.prev() {
                if ui.button("Back").clicked() {
                    self.step = prev;
                }
            }
            if let Some(next) = self.step.next() {
                if ui
                    .add_enabled(self.can_enter(next), egui::Button::new("Next"))
                    .clicked()
                {
                    self.step = next;
                }
            }
            match &self.status {
                Some(Status::Info(msg)) => {
                    ui.label(msg);
                }
                Some(Status::Error(msg)) => {
                    ui.colored_label(egui::Color32::from_rgb(230, 80, 80), msg);
                }
                None => {}
            }
        });
    }

    fn formats_step(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select all").clicked() {
                for f in formats::CATALOG {
                    self.session.set_format_selected(f.id, true);
                }
            }
            if ui.button("Clear").clicked() {
                for f in formats::CATALOG {
                    self.session.set_format_selected(f.id, false);
                }
            }
            ui.label(format!(
                "{} selected",
                self.session.selected_formats().len()
            ));
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for platform in formats::platforms() {
                ui.heading(platform);
                for f in formats::CATALOG.iter().filter(|f| f.platform == platform) {
                    let mut on = self.session.is_format_selected(f.id);
                    let text = format!("{} ({}x{}, {})", f.label, f.width, f.height, f.orientation());
                    if ui.checkbox(&mut on, text).changed() {
                        self.session.set_format_selected(f.id, on);
                    }
                }
                ui.add_space(6.0);
            }
        });
    }

    fn hero_step(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Image").clicked() {
                self.open_image_dialog();
            }
            if self.loader.is_pending() {
                ui.add(egui::Spinner::new());
            }

            if self.texture.is_some() {
                ui.separator();
                if ui
                    .add_enabled(self.hero.can_confirm(), egui::Button::new("Confirm hero region"))
                    .clicked()
                {
                    self.status = Some(match self.hero.confirm(&mut self.session) {
                        Ok(b) => Status::Info(format!(
                            "Hero region {}x{} at ({}, {})",
                            b.width, b.height, b.x, b.y
                        )),
                        Err(e) => Status::Error(e.to_string()),
                    });
                }
                if ui
                    .add_enabled(self.hero.phase() != Phase::Idle, egui::Button::new("Reselect"))
                    .clicked()
                {
                    self.hero.reselect();
                    self.status = None;
                }

                let hint = match self.hero.phase() {
                    Phase::Idle => "Drag over the image to mark the hero region",
                    Phase::Drawing { .. } => "Release to finish the box",
                    Phase::Drawn { .. } => "Confirm, or drag again to redraw",
                    Phase::Confirmed { .. } => "Locked. Reselect to draw again",
                };
                ui.weak(hint);
                if let Some(b) = self.hero.committed() {
                    ui.label(format!("{}x{} px", b.width, b.height));
                }
            }
        });
        ui.separator();

        self.hero_canvas(ui);
    }

    fn hero_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = &self.texture else {
            ui.centered_and_justified(|ui| {
                ui.label("Open an image or drop one here");
            });
            return;
        };

        const PADDING: f32 = 20.0;
        let available_size = ui.available_size();
        let max_size = available_size - egui::vec2(PADDING * 2.0, PADDING * 2.0);
        let image_size = texture.size_vec2();

        // Fit within available space while maintaining aspect ratio
        let display_size = geometry::fit_size(image_size, max_size);
        let total_display_size = display_size + egui::vec2(PADDING * 2.0, PADDING * 2.0);

        // Manual centering
        let x_offset = (available_size.x - total_display_size.x) / 2.0;
        let y_offset = (available_size.y - total_display_size.y) / 2.0;
        let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));

        let target_rect = egui::Rect::from_min_size(start_pos, total_display_size);
        let response = ui.allocate_rect(target_rect, egui::Sense::drag());
        let image_rect =
            egui::Rect::from_min_size(target_rect.min + egui::vec2(PADDING, PADDING), display_size);

        self.hero
            .on_image_loaded(ImageGeometry::from_display(texture.size(), image_rect));

        let events = ui.input(|i| i.events.clone());
        let mut changed = false;
        for input in self.input.collect(&events, &response, image_rect) {
            changed |= self.hero.handle_input(input);
        }
        if changed {
            ui.ctx().request_repaint();
        }

        let phase = self.hero.display_phase();
        if response.hovered() && !self.hero.is_locked() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }
        ui.painter_at(target_rect)
            .extend(canvas::marquee_shapes(texture.id(), image_rect, &phase));
    }

    fn overlays_step(&mut self, ui: &mut egui::Ui) {
        let selected = self.session.selected_formats().clone();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Logo");
            let logo = &mut self.session.overlays.logo;
            ui.checkbox(&mut logo.rule.enabled, "Include logo");
            if logo.rule.enabled {
                ui.horizontal(|ui| {
                    if ui.button("Choose logo…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Image", &["png", "jpg", "jpeg", "webp"])
                            .pick_file()
                        {
                            match read_logo(&path) {
                                Ok(loaded) => logo.image = Some(loaded),
                                Err(e) => self.status = Some(Status::Error(format!("{:#}", e))),
                            }
                        }
                    }
                    match &logo.image {
                        Some((name, _)) => ui.label(name),
                        None => ui.weak("No logo chosen"),
                    };
                });
                rule_editor(ui, &mut logo.rule, "logo", &selected);
            }
            ui.separator();

            ui.heading("Ad copy");
            let copy = &mut self.session.overlays.copy;
            ui.checkbox(&mut copy.rule.enabled, "Include ad copy");
            if copy.rule.enabled {
                ui.add(
                    egui::TextEdit::multiline(&mut copy.text)
                        .hint_text("Spring Collection")
                        .desired_rows(2),
                );
                font_picker(ui, "copy_font", &mut copy.font);
                color_edit(ui, "Text color", &mut copy.color);
                rule_editor(ui, &mut copy.rule, "copy", &selected);
            }
            ui.separator();

            ui.heading("Call to action");
            let cta = &mut self.session.overlays.cta;
            ui.checkbox(&mut cta.rule.enabled, "Include button");
            if cta.rule.enabled {
                ui.horizontal(|ui| {
                    ui.label("Label");
                    ui.text_edit_singleline(&mut cta.text);
                });
                font_picker(ui, "cta_font", &mut cta.font);
                color_edit(ui, "Text color", &mut cta.text_color);
                color_edit(ui, "Button color", &mut cta.background_color);
                rule_editor(ui, &mut cta.rule, "cta", &selected);
            }
        });
    }

    fn review_step(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("review").num_columns(2).show(ui, |ui| {
            ui.label("Formats");
            ui.label(
                self.session
                    .selected_formats()
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            ui.end_row();

            ui.label("Source");
            match self.session.source() {
                Some(s) => ui.label(format!("{} ({}x{})", s.name, s.width, s.height)),
                None => ui.weak("none"),
            };
            ui.end_row();

            ui.label("Hero region");
            match self.session.hero_bbox() {
                Some(b) => ui.label(format!("{}x{} at ({}, {})", b.width, b.height, b.x, b.y)),
                None => ui.weak("not set, the service will pick one automatically"),
            };
            ui.end_row();
        });
        ui.separator();

        let overlays = &self.session.overlays;
        egui::Grid::new("review_overlays")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Format");
                ui.strong("Logo");
                ui.strong("Copy");
                ui.strong("CTA");
                ui.end_row();

                let mark = |on: bool| if on { "✔" } else { "" };
                for id in self.session.selected_formats() {
                    ui.label(id.as_str());
                    ui.label(mark(overlays.logo.rule.applies_to(id)));
                    ui.label(mark(overlays.copy.rule.applies_to(id)));
                    ui.label(mark(overlays.cta.rule.applies_to(id)));
                    ui.end_row();
                }
            });
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Export request…").clicked() {
                self.status = Some(self.export_request());
            }
            if ui.button("Save results…").clicked() {
                if let Some(status) = save_results_dialog() {
                    self.status = Some(status);
                }
            }
        });
    }

    fn export_request(&self) -> Status {
        let request = match request::build_request(&self.session) {
            Ok(r) => r,
            Err(e) => return Status::Error(e.to_string()),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("generate-request.json")
            .save_file()
        else {
            return Status::Info("Export cancelled".into());
        };
        match request::export_request(&request, &path) {
            Ok(()) => Status::Info(format!("Wrote {}", path.display())),
            Err(e) => {
                tracing::error!("{:#}", e);
                Status::Error(format!("{:#}", e))
            }
        }
    }
}

fn read_logo(path: &std::path::Path) -> anyhow::Result<(String, Arc<[u8]>)> {
    use anyhow::Context;

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    image::guess_format(&bytes).context("Logo is not a supported image")?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "logo".to_string());
    Ok((name, Arc::from(bytes)))
}

fn save_results_dialog() -> Option<Status> {
    let response = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .pick_file()?;
    let dir = rfd::FileDialog::new().pick_folder()?;
    Some(match request::save_results(&response, &dir) {
        Ok(written) => Status::Info(format!("Saved {} images to {}", written.len(), dir.display())),
        Err(e) => {
            tracing::error!("{:#}", e);
            Status::Error(format!("{:#}", e))
        }
    })
}

fn rule_editor(ui: &mut egui::Ui, rule: &mut OverlayRule, salt: &str, selected: &BTreeSet<String>) {
    ui.checkbox(&mut rule.applies_to_all, "Apply to all formats");
    if !rule.applies_to_all {
        ui.indent((salt, "formats"), |ui| {
            for id in selected {
                let mut on = rule.selected_formats.contains(id);
                if ui.checkbox(&mut on, id.as_str()).changed() {
                    rule.toggle_format(id, on);
                }
            }
        });
    }

    egui::Grid::new((salt, "placement")).num_columns(2).show(ui, |ui| {
        for orientation in Orientation::ALL {
            ui.label(orientation.to_string());
            let current = rule
                .position_by_orientation
                .entry(orientation)
                .or_insert(Placement::TopLeft);
            egui::ComboBox::from_id_salt((salt, orientation))
                .selected_text(current.to_string())
                .show_ui(ui, |ui| {
                    for placement in Placement::ALL {
                        ui.selectable_value(current, placement, placement.to_string());
                    }
                });
            ui.end_row();
        }
    });
}

fn font_picker(ui: &mut egui::Ui, salt: &str, font: &mut String) {
    ui.horizontal(|ui| {
        ui.label("Font");
        egui::ComboBox::from_id_salt(salt)
            .selected_text(font.as_str())
            .show_ui(ui, |ui| {
                for choice in overlay::FONT_CHOICES {
                    ui.selectable_value(font, choice.to_string(), *choice);
                }
            });
    });
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(color).desired_width(80.0));
        if !overlay::is_hex_color(color) {
            ui.colored_label(egui::Color32::from_rgb(230, 80, 80), "use #rrggbb");
        }
    });
}

impl eframe::App for HeroCropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            self.handle_dropped_files(ctx);
        }
        self.receive_decoded(ctx);

        egui::TopBottomPanel::top("steps").show(ctx, |ui| self.nav_bar(ui));
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.footer(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.step {
            Step::Formats => self.formats_step(ui),
            Step::Hero => self.hero_step(ui),
            Step::Overlays => self.overlays_step(ui),
            Step::Review => self.review_step(ui),
        });
    }
}
