//! Movie documents.
//!
//! A [`Movie`] is the top-level document submitted for rendering. Besides
//! the movie properties and elements it carries the ordered list of scenes
//! and the API key used to authenticate against the rendering service. The
//! key is never part of the exported document.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::container::{kind_of, PropertyContainer};
use crate::error::CoreError;
use crate::property::MovieProperty;
use crate::scene::Scene;

/// Key under which attached scenes are stored.
pub const SCENES_KEY: &str = "scenes";

/// A renderable movie document plus its service credential.
#[derive(Clone, Default, PartialEq)]
pub struct Movie {
    document: PropertyContainer<MovieProperty>,
    api_key: Option<String>,
}

impl fmt::Debug for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Movie")
            .field("document", &self.document)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Movie {
    /// Create an empty movie without an API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a movie from its JSON document.
    ///
    /// Accepts the movie properties, `elements` and `scenes`. Each scene
    /// entry must be an object and is validated like
    /// [`Scene::from_document`]; offending entries fail with
    /// [`CoreError::InvalidScene`].
    pub fn from_document(document: Value) -> Result<Self, CoreError> {
        let document = PropertyContainer::<MovieProperty>::load(document, |movie, key, value| {
            if key != SCENES_KEY {
                return Ok(Some(value));
            }
            let scenes = match value {
                Value::Array(scenes) => scenes,
                other => {
                    return Err(CoreError::InvalidScene(format!(
                        "`scenes` must be an array, got {}",
                        kind_of(&other)
                    )))
                }
            };
            movie.insert_raw(SCENES_KEY, Value::Array(Vec::new()));
            for (index, scene) in scenes.into_iter().enumerate() {
                if !scene.is_object() {
                    return Err(CoreError::InvalidScene(format!(
                        "scene {index} must be an object, got {}",
                        kind_of(&scene)
                    )));
                }
                let scene = Scene::from_document(scene)
                    .map_err(|e| CoreError::InvalidScene(format!("scene {index}: {e}")))?;
                movie.push_to(SCENES_KEY, Value::Object(scene.into_object()));
            }
            Ok(None)
        })?;

        Ok(Self {
            document,
            api_key: None,
        })
    }

    /// Store the API key used by network operations. The format is not
    /// checked.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// The API key, failing with [`CoreError::InvalidApiKey`] when none (or
    /// an empty one) has been set.
    pub fn require_api_key(&self) -> Result<&str, CoreError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CoreError::InvalidApiKey),
        }
    }

    /// The project id of the render job, if known.
    ///
    /// String and numeric ids are both accepted.
    pub fn project(&self) -> Option<String> {
        match self.document.get(MovieProperty::Project)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// The project id, failing with [`CoreError::MissingProject`] when it
    /// is not known yet.
    pub fn require_project(&self) -> Result<String, CoreError> {
        self.project().ok_or(CoreError::MissingProject)
    }

    /// Record the project id assigned by the service.
    pub fn set_project(&mut self, project: impl Into<String>) {
        self.document
            .set_property(MovieProperty::Project, project.into());
    }

    /// Set a movie property by name. See [`PropertyContainer::set`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        self.document.set(name, value)
    }

    /// Set a movie property through its typed name.
    pub fn set_property(&mut self, property: MovieProperty, value: impl Into<Value>) {
        self.document.set_property(property, value);
    }

    /// Current value of a movie property.
    pub fn get(&self, property: MovieProperty) -> Option<&Value> {
        self.document.get(property)
    }

    /// Append a movie-level element. See [`PropertyContainer::add_element`].
    pub fn add_element(&mut self, element: Value) -> bool {
        self.document.add_element(element)
    }

    /// Movie-level elements, in insertion order.
    pub fn elements(&self) -> &[Value] {
        self.document.elements()
    }

    /// Append a snapshot of `scene`.
    ///
    /// Later changes to `scene` are not reflected in the movie.
    pub fn add_scene(&mut self, scene: &Scene) {
        self.document
            .push_to(SCENES_KEY, Value::Object(scene.export_object().clone()));
    }

    /// Append a scene given as a raw JSON document.
    ///
    /// Fails with [`CoreError::InvalidScene`] when `scene` is not a valid
    /// scene object (for example `null`).
    pub fn add_scene_document(&mut self, scene: Value) -> Result<(), CoreError> {
        if !scene.is_object() {
            return Err(CoreError::InvalidScene(format!(
                "expected a scene object, got {}",
                kind_of(&scene)
            )));
        }
        let scene =
            Scene::from_document(scene).map_err(|e| CoreError::InvalidScene(e.to_string()))?;
        self.add_scene(&scene);
        Ok(())
    }

    /// Attached scenes, in insertion order.
    pub fn scenes(&self) -> &[Value] {
        self.document.list(SCENES_KEY)
    }

    /// Pretty-printed JSON of the movie document.
    pub fn export_json(&self) -> String {
        self.document.export_json()
    }

    /// The plain movie document as sent to the service.
    pub fn export_object(&self) -> &Map<String, Value> {
        self.document.export_object()
    }
}

impl Serialize for Movie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn add_scene_creates_then_appends() {
        let mut movie = Movie::new();
        assert!(movie.scenes().is_empty());
        assert!(!movie.export_object().contains_key(SCENES_KEY));

        let mut first = Scene::new();
        first.set("comment", "first").unwrap();
        let mut second = Scene::new();
        second.set("comment", "second").unwrap();

        movie.add_scene(&first);
        assert_eq!(movie.scenes().len(), 1);
        movie.add_scene(&second);

        let comments: Vec<_> = movie.scenes().iter().map(|s| s["comment"].clone()).collect();
        assert_eq!(comments, [json!("first"), json!("second")]);
    }

    #[test]
    fn added_scene_is_a_snapshot() {
        let mut movie = Movie::new();
        let mut scene = Scene::new();
        scene.set("duration", 4).unwrap();
        movie.add_scene(&scene);

        scene.set("duration", 10).unwrap();
        assert_eq!(movie.scenes()[0]["duration"], 4);
    }

    #[test]
    fn add_scene_document_rejects_null() {
        let mut movie = Movie::new();
        let err = movie.add_scene_document(Value::Null).unwrap_err();
        assert_matches!(err, CoreError::InvalidScene(_));
        assert!(movie.scenes().is_empty());
    }

    #[test]
    fn add_scene_document_validates_scene() {
        let mut movie = Movie::new();
        let err = movie
            .add_scene_document(json!({"fps": 30}))
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidScene(ref msg) if msg.contains("fps"));

        movie
            .add_scene_document(json!({"background-color": "#fff"}))
            .unwrap();
        assert_eq!(movie.scenes().len(), 1);
    }

    #[test]
    fn api_key_is_required() {
        let mut movie = Movie::new();
        assert_matches!(movie.require_api_key(), Err(CoreError::InvalidApiKey));
        movie.set_api_key("");
        assert_matches!(movie.require_api_key(), Err(CoreError::InvalidApiKey));
        movie.set_api_key("secret");
        assert_eq!(movie.require_api_key().unwrap(), "secret");
    }

    #[test]
    fn api_key_is_not_exported_or_printed() {
        let mut movie = Movie::new();
        movie.set_api_key("secret");
        movie.set("width", 100).unwrap();
        assert!(!movie.export_json().contains("secret"));
        assert!(!format!("{movie:?}").contains("secret"));
    }

    #[test]
    fn project_accepts_strings_and_numbers() {
        let mut movie = Movie::new();
        assert_matches!(movie.require_project(), Err(CoreError::MissingProject));

        movie.set("project", 1234).unwrap();
        assert_eq!(movie.project().as_deref(), Some("1234"));

        movie.set_project("abc");
        assert_eq!(movie.require_project().unwrap(), "abc");
    }

    #[test]
    fn from_document_loads_scenes() {
        let movie = Movie::from_document(json!({
            "width": 1920,
            "scenes": [
                {"comment": "one", "elements": [{"type": "text"}]},
                {"comment": "two"}
            ]
        }))
        .unwrap();
        assert_eq!(movie.get(MovieProperty::Width).unwrap(), 1920);
        assert_eq!(movie.scenes().len(), 2);
        assert_eq!(movie.scenes()[1]["comment"], "two");
    }

    #[test]
    fn from_document_keeps_empty_lists() {
        let doc = json!({"width": 640, "elements": [], "scenes": []});
        let movie = Movie::from_document(doc).unwrap();
        assert!(movie.scenes().is_empty());
        assert_eq!(
            serde_json::to_string(&movie).unwrap(),
            r#"{"width":640,"elements":[],"scenes":[]}"#
        );
    }

    #[test]
    fn from_document_rejects_bad_scenes() {
        let err = Movie::from_document(json!({"scenes": [null]})).unwrap_err();
        assert_matches!(err, CoreError::InvalidScene(ref msg) if msg.contains("scene 0"));

        let err = Movie::from_document(json!({"scenes": {}})).unwrap_err();
        assert_matches!(err, CoreError::InvalidScene(_));
    }
}
