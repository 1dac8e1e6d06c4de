//! Errors raised while building nodes against a scene

use thiserror::Error;

use crate::scene::FontName;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Neither the requested font nor the fallback family could be loaded
    #[error("font '{requested}' is unavailable and fallback '{fallback}' failed to load")]
    FontUnavailable {
        requested: FontName,
        fallback: FontName,
    },

    /// The scene host rejected an operation
    #[error("scene error: {message}")]
    Scene { message: String },
}

impl BuildError {
    /// Create a font unavailable error
    pub fn font_unavailable(requested: FontName, fallback: FontName) -> Self {
        Self::FontUnavailable {
            requested,
            fallback,
        }
    }

    /// Create a scene error
    pub fn scene(message: impl Into<String>) -> Self {
        Self::Scene {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_unavailable_display() {
        let err = BuildError::font_unavailable(
            FontName::new("Inter", "Bold"),
            FontName::new("Roboto", "Regular"),
        );
        let message = err.to_string();
        assert!(message.contains("Inter Bold"));
        assert!(message.contains("Roboto Regular"));
    }

    #[test]
    fn test_scene_error_display() {
        assert_eq!(BuildError::scene("gone").to_string(), "scene error: gone");
    }
}
