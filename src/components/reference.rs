use bevy_ecs::prelude::Component;

/// Human-readable label of a managed entity, for diagnostics only.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reference(pub String);

impl Reference {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
