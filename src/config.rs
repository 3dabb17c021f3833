use std::path::PathBuf;

use clap::Parser;

/// Hero Cropper: prepare one photo for many ad formats.
#[derive(Parser, Debug, Clone)]
#[command(name = "hero-cropper", version, about)]
pub struct Config {
    /// Source image to open on startup.
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Log filter, e.g. "info" or "hero_cropper=debug".
    /// Overrides the HERO_CROPPER_LOG environment variable.
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Initial window width.
    #[arg(long, default_value_t = 1024.0)]
    pub width: f32,

    /// Initial window height.
    #[arg(long, default_value_t = 768.0)]
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::parse_from(["hero-cropper"]);
        assert_eq!(c.image, None);
        assert_eq!((c.width, c.height), (1024.0, 768.0));
    }

    #[test]
    fn preload_and_log_override() {
        let c = Config::parse_from(["hero-cropper", "-i", "photo.jpg", "--log", "debug"]);
        assert_eq!(c.image, Some(PathBuf::from("photo.jpg")));
        assert_eq!(c.log.as_deref(), Some("debug"));
    }
}
