//! Settable property names for scenes and movies.
//!
//! Each container kind has a fixed set of properties. Callers may refer to
//! them either through the typed enums or by name; names are matched
//! case-insensitively and `_` is accepted in place of `-`, so
//! `"Background_Color"` and `"background-color"` are the same property.

use std::fmt;

use crate::error::CoreError;

/// A closed set of property names accepted by one container kind.
pub trait PropertySet: Copy + fmt::Debug + 'static {
    /// Every property in the set, in declaration order.
    const ALL: &'static [Self];

    /// Canonical wire name (lowercase, hyphenated).
    fn name(self) -> &'static str;

    /// Resolve a caller-supplied name to a property.
    ///
    /// Fails with [`CoreError::InvalidProperty`] carrying the normalized
    /// name when it is not part of the set.
    fn parse(name: &str) -> Result<Self, CoreError> {
        let normalized = normalize_name(name);
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == normalized)
            .ok_or(CoreError::InvalidProperty(normalized))
    }
}

/// Lowercase `name` and replace underscores with hyphens.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Properties settable on a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneProperty {
    Comment,
    BackgroundColor,
    Duration,
    Cache,
}

impl PropertySet for SceneProperty {
    const ALL: &'static [Self] = &[
        Self::Comment,
        Self::BackgroundColor,
        Self::Duration,
        Self::Cache,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::BackgroundColor => "background-color",
            Self::Duration => "duration",
            Self::Cache => "cache",
        }
    }
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

/// Properties settable on a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieProperty {
    Comment,
    Project,
    Width,
    Height,
    Resolution,
    Quality,
    Fps,
    Cache,
}

impl PropertySet for MovieProperty {
    const ALL: &'static [Self] = &[
        Self::Comment,
        Self::Project,
        Self::Width,
        Self::Height,
        Self::Resolution,
        Self::Quality,
        Self::Fps,
        Self::Cache,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Project => "project",
            Self::Width => "width",
            Self::Height => "height",
            Self::Resolution => "resolution",
            Self::Quality => "quality",
            Self::Fps => "fps",
            Self::Cache => "cache",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn normalize_lowercases_and_hyphenates() {
        assert_eq!(normalize_name("Background_Color"), "background-color");
        assert_eq!(normalize_name("FPS"), "fps");
        assert_eq!(normalize_name("already-fine"), "already-fine");
    }

    #[test]
    fn parse_accepts_every_spelling() {
        for name in ["background-color", "Background_Color", "BACKGROUND-COLOR", "background_color"] {
            assert_eq!(SceneProperty::parse(name).unwrap(), SceneProperty::BackgroundColor);
        }
    }

    #[test]
    fn parse_round_trips_canonical_names() {
        for p in MovieProperty::ALL {
            assert_eq!(MovieProperty::parse(p.name()).unwrap(), *p);
        }
        for p in SceneProperty::ALL {
            assert_eq!(SceneProperty::parse(p.name()).unwrap(), *p);
        }
    }

    #[test]
    fn parse_rejects_with_normalized_name() {
        let err = SceneProperty::parse("Frame_Rate").unwrap_err();
        assert_matches!(err, CoreError::InvalidProperty(ref name) if name == "frame-rate");
        assert_eq!(err.to_string(), "Property frame-rate does not exist");
    }

    #[test]
    fn scene_and_movie_sets_differ() {
        assert!(SceneProperty::parse("width").is_err());
        assert!(MovieProperty::parse("background-color").is_err());
        assert!(MovieProperty::parse("project").is_ok());
        assert!(SceneProperty::parse("project").is_err());
    }
}
