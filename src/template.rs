use std::{collections::HashMap, fmt::Debug, sync::Arc};

use thiserror::Error;

use crate::circuits::{gates::GateImpl, PinSide};

/// Pure mapping from input pin values to output pin values.
/// `outputs` arrives zeroed and sized to the template's output count.
pub type ActivationFn = fn(&[bool], &mut [bool]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Basic,
    Math,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialMode {
    Color,
    Image,
}

/// How the gate face is drawn. Only carried here, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub mode: MaterialMode,
    pub fill: Arc<str>,
}

impl Material {
    pub fn image(asset: impl Into<Arc<str>>) -> Self {
        Self {
            mode: MaterialMode::Image,
            fill: asset.into(),
        }
    }

    pub fn color(color: impl Into<Arc<str>>) -> Self {
        Self {
            mode: MaterialMode::Color,
            fill: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Registry key, also written into saved gate records.
    pub name: Arc<str>,
    pub display_name: Arc<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinCounts {
    pub inputs: usize,
    pub outputs: usize,
}

impl PinCounts {
    pub fn count(&self, side: PinSide) -> usize {
        match side {
            PinSide::Input => self.inputs,
            PinSide::Output => self.outputs,
        }
    }
}

/// Immutable gate blueprint. Gates hold an `Arc` to one of these.
#[derive(Clone)]
pub struct Template {
    pub metadata: Metadata,
    pub material: Material,
    pub activation: ActivationFn,
    pub pins: PinCounts,
    pub category: Category,
}

impl Template {
    pub fn of<G: GateImpl>() -> Self {
        Self {
            metadata: Metadata {
                name: G::id().into(),
                display_name: G::display_name().into(),
            },
            material: G::material(),
            activation: G::activate,
            pins: PinCounts {
                inputs: G::inputs(),
                outputs: G::outputs(),
            },
            category: G::category(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("metadata", &self.metadata)
            .field("material", &self.material)
            .field("pins", &self.pins)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template {0:?}")]
    Unknown(String),
}

/// Name-keyed template lookup, passed explicitly to whoever needs it.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<Arc<str>, Arc<Template>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for template in crate::circuits::gates::builtin_templates() {
            registry.register(template);
        }
        registry
    }

    /// Returns the template previously registered under the same name.
    pub fn register(&mut self, template: Template) -> Option<Arc<Template>> {
        self.templates
            .insert(template.metadata.name.clone(), Arc::new(template))
    }

    pub fn get(&self, name: &str) -> Result<Arc<Template>, TemplateError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::Unknown(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|k| &**k)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
