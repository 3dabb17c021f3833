//! Payload for the external ad generation service.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::formats::{self, Orientation};
use crate::geometry::NaturalBox;
use crate::overlay::{OverlayRule, Placement};
use crate::session::WizardSession;

#[derive(Clone, Debug, PartialEq)]
pub enum RequestError {
    MissingSource,
    NoFormats,
    UnknownFormat(String),
    InvalidDataUrl(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::MissingSource => write!(f, "No source image loaded"),
            RequestError::NoFormats => write!(f, "No output formats selected"),
            RequestError::UnknownFormat(id) => write!(f, "Unknown output format: {}", id),
            RequestError::InvalidDataUrl(msg) => write!(f, "Invalid data URL: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormatItem {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub source_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_input_hero_bbox: Option<NaturalBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_logo: Option<String>,
    pub include_logo: bool,
    pub logo_applies_to_all: bool,
    pub logo_selected_formats: Vec<String>,
    pub logo_position_by_orientation: BTreeMap<Orientation, Placement>,

    pub include_copy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_copy: Option<String>,
    pub copy_font_family: String,
    pub copy_applies_to_all: bool,
    pub copy_selected_formats: Vec<String>,
    pub copy_position_by_orientation: BTreeMap<Orientation, Placement>,
    pub copy_brand_color: String,

    pub include_cta: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    pub cta_applies_to_all: bool,
    pub cta_selected_formats: Vec<String>,
    pub cta_position_by_orientation: BTreeMap<Orientation, Placement>,
    pub cta_font: String,
    pub cta_text_color: String,
    pub cta_bg_color: String,

    pub formats: Vec<FormatItem>,
}

/// Generated images keyed by format id, each a PNG data URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub results: BTreeMap<String, String>,
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Bytes carried by a `data:` URL. A bare base64 string is accepted too.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, RequestError> {
    let encoded = match url.split_once(',') {
        Some((header, body)) if header.ends_with(";base64") => body,
        Some((header, _)) => {
            return Err(RequestError::InvalidDataUrl(format!(
                "unsupported header {:?}",
                header
            )));
        }
        None => url,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| RequestError::InvalidDataUrl(e.to_string()))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Assemble the payload from the session. The hero box is forwarded
/// verbatim, and only when it belongs to the current source image.
pub fn build_request(session: &WizardSession) -> Result<GenerateRequest, RequestError> {
    let source = session.source().ok_or(RequestError::MissingSource)?;
    if session.selected_formats().is_empty() {
        return Err(RequestError::NoFormats);
    }
    let formats = session
        .selected_formats()
        .iter()
        .map(|id| {
            formats::find(id)
                .map(|f| FormatItem {
                    id: f.id.to_owned(),
                    width: f.width,
                    height: f.height,
                })
                .ok_or_else(|| RequestError::UnknownFormat(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let overlays = &session.overlays;
    let logo = &overlays.logo;
    let copy = &overlays.copy;
    let cta = &overlays.cta;
    let positions = |rule: &OverlayRule| rule.position_by_orientation.clone();

    let brand_logo = logo
        .image
        .as_ref()
        .map(|(_, bytes)| {
            let mime = image::guess_format(bytes)
                .map(|f| f.to_mime_type())
                .unwrap_or("image/png");
            to_data_url(mime, bytes)
        });
    let ad_copy = non_empty(&copy.text);
    let cta_text = non_empty(&cta.text);

    Ok(GenerateRequest {
        source_image: to_data_url(source.mime, &source.bytes),
        user_input_hero_bbox: session.hero_bbox(),

        include_logo: logo.rule.enabled && brand_logo.is_some(),
        brand_logo,
        logo_applies_to_all: logo.rule.applies_to_all,
        logo_selected_formats: logo.rule.format_list(),
        logo_position_by_orientation: positions(&logo.rule),

        include_copy: copy.rule.enabled && ad_copy.is_some(),
        ad_copy,
        copy_font_family: copy.font.clone(),
        copy_applies_to_all: copy.rule.applies_to_all,
        copy_selected_formats: copy.rule.format_list(),
        copy_position_by_orientation: positions(&copy.rule),
        copy_brand_color: copy.color.clone(),

        include_cta: cta.rule.enabled && cta_text.is_some(),
        cta_text,
        cta_applies_to_all: cta.rule.applies_to_all,
        cta_selected_formats: cta.rule.format_list(),
        cta_position_by_orientation: positions(&cta.rule),
        cta_font: cta.font.clone(),
        cta_text_color: cta.text_color.clone(),
        cta_bg_color: cta.background_color.clone(),

        formats,
    })
}

pub fn export_request(request: &GenerateRequest, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(request).context("Failed to serialize request")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("exported generation request to {}", path.display());
    Ok(())
}

/// Decode every result image of a saved response into `dir`, one PNG per
/// format id. Returns the written paths.
pub fn save_results(response_path: &Path, dir: &Path) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let text = std::fs::read_to_string(response_path)
        .with_context(|| format!("Failed to read {}", response_path.display()))?;
    let response: GenerateResponse =
        serde_json::from_str(&text).context("Not a generation response")?;

    let mut written = Vec::with_capacity(response.results.len());
    for (id, url) in &response.results {
        let bytes = decode_data_url(url).with_context(|| format!("Result {}", id))?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("Result {} is not an image", id))?;
        let path = dir.join(format!("{}.png", id));
        img.save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        written.push(path);
    }
    tracing::info!("saved {} generated images to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HeroSink;
    use std::sync::Arc;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn session_with_source() -> WizardSession {
        let mut s = WizardSession::default();
        s.set_format_selected("fb-feed-1200x628", true);
        s.set_source("photo.png".into(), Arc::from(png_bytes()), "image/png", 4, 2);
        s
    }

    #[test]
    fn requires_source_and_formats() {
        let mut s = WizardSession::default();
        assert_eq!(build_request(&s), Err(RequestError::MissingSource));
        s.set_source("a.png".into(), Arc::from(png_bytes()), "image/png", 4, 2);
        assert_eq!(build_request(&s), Err(RequestError::NoFormats));
    }

    #[test]
    fn hero_box_is_forwarded_verbatim() {
        let mut s = session_with_source();
        let id = s.source().unwrap().id;
        let bbox = NaturalBox {
            x: 250,
            y: 250,
            width: 1000,
            height: 500,
        };
        s.commit_hero(id, bbox);

        let json = serde_json::to_value(build_request(&s).unwrap()).unwrap();
        assert_eq!(
            json["userInputHeroBbox"],
            serde_json::json!({"x": 250, "y": 250, "width": 1000, "height": 500})
        );
        assert_eq!(
            json["formats"],
            serde_json::json!([{"id": "fb-feed-1200x628", "width": 1200, "height": 628}])
        );
        assert!(
            json["sourceImage"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[test]
    fn missing_hero_box_is_omitted() {
        let json = serde_json::to_value(build_request(&session_with_source()).unwrap()).unwrap();
        assert!(json.get("userInputHeroBbox").is_none());
        assert_eq!(json["logoPositionByOrientation"]["portrait"], "top_center");
    }

    #[test]
    fn overlays_without_content_are_not_included() {
        let mut s = session_with_source();
        s.overlays.copy.rule.enabled = true;
        s.overlays.copy.text = "   ".into();
        s.overlays.cta.rule.enabled = true;
        s.overlays.cta.text = "SHOP".into();

        let req = build_request(&s).unwrap();
        assert!(!req.include_copy);
        assert_eq!(req.ad_copy, None);
        assert!(req.include_cta);
        assert_eq!(req.cta_text.as_deref(), Some("SHOP"));
        assert!(!req.include_logo);
    }

    #[test]
    fn data_url_round_trip() {
        let url = to_data_url("image/png", b"hello");
        assert_eq!(url, "data:image/png;base64,aGVsbG8=");
        assert_eq!(decode_data_url(&url).unwrap(), b"hello");
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }

    #[test]
    fn export_and_save_results() {
        let dir = tempfile::tempdir().unwrap();
        let req = build_request(&session_with_source()).unwrap();
        let req_path = dir.path().join("request.json");
        export_request(&req, &req_path).unwrap();
        let back: GenerateRequest =
            serde_json::from_str(&std::fs::read_to_string(&req_path).unwrap()).unwrap();
        assert_eq!(back, req);

        let response = GenerateResponse {
            results: BTreeMap::from([(
                "fb-feed-1200x628".to_string(),
                to_data_url("image/png", &png_bytes()),
            )]),
        };
        let resp_path = dir.path().join("response.json");
        std::fs::write(&resp_path, serde_json::to_string(&response).unwrap()).unwrap();

        let written = save_results(&resp_path, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("fb-feed-1200x628.png")]);
        assert_eq!(image::open(&written[0]).unwrap().width(), 4);
    }
}
