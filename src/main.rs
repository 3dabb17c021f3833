#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod app;
mod canvas;
mod config;
mod decode;
mod error;
mod formats;
mod geometry;
mod hero;
mod input;
mod logger;
mod marquee;
mod overlay;
mod request;
mod session;

use clap::Parser;
use eframe::egui;

use crate::app::HeroCropperApp;
use crate::config::Config;

fn main() -> eframe::Result {
    let config = Config::parse();
    logger::init(config.log.as_deref());
    tracing::info!("starting hero-cropper");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Hero Cropper",
        options,
        Box::new(move |cc| Ok(Box::new(HeroCropperApp::new(cc, &config)))),
    )
}
