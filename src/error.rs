/// Conditions that block a hero selection transition.
///
/// None of these are fatal: the caller refuses the action, leaves its state
/// untouched and lets the user retry.
#[derive(Clone, Debug, PartialEq)]
pub enum HeroError {
    /// The displayed image has no layout size yet (or a zero one).
    GeometryUnavailable,
    /// Nothing was drawn, or the drawn box has zero area.
    NoSelection,
    /// The chosen file could not be turned into a previewable bitmap.
    ImageDecodeFailure(String),
}

impl std::fmt::Display for HeroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeroError::GeometryUnavailable => {
                write!(f, "The image has not been laid out yet, try again")
            }
            HeroError::NoSelection => write!(f, "Draw a hero region before confirming"),
            HeroError::ImageDecodeFailure(msg) => write!(f, "Could not read image: {}", msg),
        }
    }
}

impl std::error::Error for HeroError {}
