use std::collections::HashMap;
use std::sync::OnceLock;

use log::{debug, warn};

use crate::error::RegistryError;

use super::catalog;
use super::ExerciseForm;

/// Exercise forms keyed by their lowercased canonical name.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: HashMap<String, ExerciseForm>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding squat, deadlift and lunge.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for form in catalog::builtin_forms() {
            registry.replace(form);
        }
        registry
    }

    /// Adds a form; an existing form under the same key is never overwritten.
    pub fn register(&mut self, form: ExerciseForm) -> Result<(), RegistryError> {
        let key = key(&form.name);
        if self.forms.contains_key(&key) {
            return Err(RegistryError::DuplicateExercise { name: form.name });
        }
        debug!(
            target: "form_engine::forms",
            "registered exercise '{}' ({} checkpoints)",
            key,
            form.checkpoints.len()
        );
        self.forms.insert(key, form);
        Ok(())
    }

    /// Adds or overwrites a form, returning the previous definition.
    pub fn replace(&mut self, form: ExerciseForm) -> Option<ExerciseForm> {
        self.forms.insert(key(&form.name), form)
    }

    /// Case-insensitive lookup. A miss is an error, never a fallback form.
    pub fn lookup(&self, name: &str) -> Result<&ExerciseForm, RegistryError> {
        self.forms.get(&key(name)).ok_or_else(|| {
            warn!(target: "form_engine::forms", "unknown exercise '{}'", name);
            RegistryError::ExerciseNotFound { name: name.to_string() }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forms.contains_key(&key(name))
    }

    /// Registered keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.forms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

static BUILTIN: OnceLock<FormRegistry> = OnceLock::new();

/// Process-wide read-only catalog of the built-in forms.
pub fn builtin_registry() -> &'static FormRegistry {
    BUILTIN.get_or_init(FormRegistry::with_builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{BodyPart, CheckOutcome, FormCheckpoint};
    use crate::landmarks::LandmarkFrame;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = FormRegistry::with_builtin();
        assert_eq!(registry.lookup("SQUAT").unwrap().name, "squat");
        assert_eq!(registry.lookup(" Deadlift ").unwrap().display_name, "Deadlift");
        assert!(registry.contains("Lunge"));
    }

    #[test]
    fn unknown_exercise_is_an_error() {
        let registry = FormRegistry::with_builtin();
        assert_eq!(
            registry.lookup("trampoline").unwrap_err(),
            RegistryError::ExerciseNotFound {
                name: "trampoline".to_string()
            }
        );
    }

    #[test]
    fn register_extends_without_overwriting() {
        let mut registry = FormRegistry::with_builtin();
        let plank = ExerciseForm::new("Plank", "Plank").with_checkpoint(FormCheckpoint::new(
            BodyPart::Core,
            "Hips sagging",
            "Squeeze your glutes",
            |_: &LandmarkFrame, _: f32| CheckOutcome::pass(),
        ));
        registry.register(plank).unwrap();
        assert_eq!(registry.names(), vec!["deadlift", "lunge", "plank", "squat"]);

        let err = registry.register(ExerciseForm::new("squat", "Other Squat")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateExercise { .. }));
        assert_eq!(registry.lookup("squat").unwrap().display_name, "Squat");

        let previous = registry.replace(ExerciseForm::new("squat", "Box Squat"));
        assert_eq!(previous.map(|f| f.display_name), Some("Squat".to_string()));
        assert_eq!(registry.lookup("squat").unwrap().display_name, "Box Squat");
    }

    #[test]
    fn builtin_catalog_is_shared() {
        let a = builtin_registry();
        let b = builtin_registry();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.len(), 3);
        assert!(FormRegistry::new().is_empty());
    }
}
