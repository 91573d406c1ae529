//! Scene documents.

use serde_json::{Map, Number, Value};

use crate::container::{kind_of, PropertyContainer};
use crate::error::CoreError;
use crate::property::SceneProperty;

/// Key under which the transition sub-object is stored.
pub const TRANSITION_KEY: &str = "transition";

/// A timed segment of a movie: scene properties, elements and an optional
/// transition.
pub type Scene = PropertyContainer<SceneProperty>;

impl PropertyContainer<SceneProperty> {
    /// Configure the transition into this scene.
    ///
    /// Only the provided fields are written; `None` leaves a previously
    /// recorded value in place. When every argument is `None` nothing
    /// happens and no `transition` key is created.
    ///
    /// `duration` is stored as given: `Some(Number::from(5))` exports `5`,
    /// `Number::from_f64(1.5)` exports `1.5`.
    pub fn set_transition(
        &mut self,
        style: Option<&str>,
        duration: Option<Number>,
        kind: Option<&str>,
    ) {
        if style.is_none() && duration.is_none() && kind.is_none() {
            return;
        }

        self.update_object(TRANSITION_KEY, |transition| {
            if let Some(style) = style {
                transition.insert("style".into(), Value::from(style));
            }
            if let Some(duration) = duration {
                transition.insert("duration".into(), Value::Number(duration));
            }
            if let Some(kind) = kind {
                transition.insert("type".into(), Value::from(kind));
            }
        });
    }

    /// The transition sub-object, if one has been configured.
    pub fn transition(&self) -> Option<&Map<String, Value>> {
        self.export_object()
            .get(TRANSITION_KEY)
            .and_then(Value::as_object)
    }

    /// Rebuild a scene from its JSON document.
    ///
    /// Accepts the scene properties, `elements` and `transition`. Any other
    /// key fails with [`CoreError::InvalidProperty`].
    pub fn from_document(document: Value) -> Result<Self, CoreError> {
        Self::load(document, |scene, key, value| {
            if key != TRANSITION_KEY {
                return Ok(Some(value));
            }
            match value {
                Value::Object(_) => {
                    scene.insert_raw(TRANSITION_KEY, value);
                    Ok(None)
                }
                other => Err(CoreError::InvalidDocument(format!(
                    "`transition` must be an object, got {}",
                    kind_of(&other)
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn empty_transition_is_noop() {
        let mut scene = Scene::new();
        scene.set_transition(None, None, None);
        assert!(scene.transition().is_none());
        assert!(!scene.export_object().contains_key(TRANSITION_KEY));
    }

    #[test]
    fn duration_only_transition() {
        let mut scene = Scene::new();
        scene.set_transition(None, Some(Number::from(5)), None);
        assert_eq!(
            serde_json::to_string(&scene).unwrap(),
            r#"{"transition":{"duration":5}}"#
        );
        assert_eq!(
            serde_json::to_value(&scene).unwrap(),
            json!({"transition": {"duration": 5}})
        );
    }

    #[test]
    fn transition_duration_matches_scene_duration() {
        let mut scene = Scene::new();
        scene.set("duration", 5).unwrap();
        scene.set_transition(None, Some(Number::from(5)), None);
        assert_eq!(scene.transition().unwrap()["duration"], scene.export_object()["duration"]);
    }

    #[test]
    fn transition_fields_merge() {
        let mut scene = Scene::new();
        scene.set_transition(Some("fade"), Number::from_f64(1.5), None);
        scene.set_transition(None, None, Some("in"));
        scene.set_transition(Some("wipe"), None, None);

        let transition = scene.transition().unwrap();
        assert_eq!(transition["style"], "wipe");
        assert_eq!(transition["duration"], 1.5);
        assert_eq!(transition["type"], "in");
    }

    #[test]
    fn nan_duration_counts_as_omitted() {
        let mut scene = Scene::new();
        scene.set_transition(None, Number::from_f64(f64::NAN), None);
        assert!(scene.transition().is_none());
    }

    #[test]
    fn transition_keeps_its_first_position() {
        let mut scene = Scene::new();
        scene.set("comment", "a").unwrap();
        scene.set_transition(Some("fade"), None, None);
        scene.set("duration", 3).unwrap();
        scene.set_transition(None, Some(Number::from(2)), None);

        let keys: Vec<_> = scene.export_object().keys().cloned().collect();
        assert_eq!(keys, ["comment", "transition", "duration"]);
    }

    #[test]
    fn from_document_restores_scene() {
        let doc = json!({
            "comment": "opening",
            "background_color": "#000000",
            "transition": {"style": "fade"},
            "elements": [{"type": "text", "text": "hi"}]
        });
        let scene = Scene::from_document(doc).unwrap();
        assert_eq!(scene.get(SceneProperty::BackgroundColor).unwrap(), "#000000");
        assert_eq!(scene.transition().unwrap()["style"], "fade");
        assert_eq!(scene.elements().len(), 1);
    }

    #[test]
    fn from_document_rejects_unknown_keys() {
        let err = Scene::from_document(json!({"width": 10})).unwrap_err();
        assert_matches!(err, CoreError::InvalidProperty(ref name) if name == "width");
    }

    #[test]
    fn from_document_rejects_scalar_transition() {
        let err = Scene::from_document(json!({"transition": "fade"})).unwrap_err();
        assert_matches!(err, CoreError::InvalidDocument(_));
    }
}
