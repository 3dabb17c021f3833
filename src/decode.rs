//! Background decoding of source images.
//!
//! Each request gets a job token. A newer request supersedes older ones:
//! their results still arrive, but are dropped on receipt.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use eframe::egui;
use image::DynamicImage;

use crate::error::HeroError;

pub struct DecodedImage {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub mime: &'static str,
    pub image: DynamicImage,
}

pub enum DecodeSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

struct DecodeResult {
    token: u64,
    result: Result<DecodedImage, HeroError>,
}

pub struct ImageLoader {
    sender: mpsc::Sender<DecodeResult>,
    receiver: mpsc::Receiver<DecodeResult>,
    token: u64,
    pending: bool,
    repaint: Option<egui::Context>,
}

impl ImageLoader {
    /// `repaint` is poked when a result is ready so the UI picks it up.
    pub fn new(repaint: Option<egui::Context>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            token: 0,
            pending: false,
            repaint,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn request(&mut self, source: DecodeSource) {
        self.token += 1;
        self.pending = true;
        let token = self.token;
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        std::thread::spawn(move || {
            let result = match source {
                DecodeSource::Path(path) => read_and_decode(&path),
                DecodeSource::Bytes { name, bytes } => decode(name, bytes),
            };
            // The receiver only goes away with the app.
            let _ = sender.send(DecodeResult { token, result });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// The result of the latest request, once it is ready.
    pub fn poll(&mut self) -> Option<Result<DecodedImage, HeroError>> {
        let mut latest = None;
        while let Ok(msg) = self.receiver.try_recv() {
            if msg.token == self.token {
                latest = Some(msg.result);
            } else {
                tracing::debug!("dropping superseded decode #{}", msg.token);
            }
        }
        if latest.is_some() {
            self.pending = false;
        }
        latest
    }
}

fn read_and_decode(path: &std::path::Path) -> Result<DecodedImage, HeroError> {
    let bytes = std::fs::read(path)
        .map_err(|e| HeroError::ImageDecodeFailure(format!("{}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    decode(name, Arc::from(bytes))
}

pub fn decode(name: String, bytes: Arc<[u8]>) -> Result<DecodedImage, HeroError> {
    let format =
        image::guess_format(&bytes).map_err(|e| HeroError::ImageDecodeFailure(e.to_string()))?;
    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| HeroError::ImageDecodeFailure(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(HeroError::ImageDecodeFailure("image is empty".into()));
    }
    tracing::info!("decoded {} ({}x{})", name, image.width(), image.height());
    Ok(DecodedImage {
        name,
        bytes,
        mime: format.to_mime_type(),
        image,
    })
}
