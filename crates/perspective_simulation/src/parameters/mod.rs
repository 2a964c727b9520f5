//! Shader parameter collections (named Vec4 slots)
//!
//! Аналог material parameter collection: world-level registry
//! (`ParameterCollections`) с instance'ами по имени asset'а. Персонаж держит
//! `ParameterBinding` — ссылку на instance, которая resolve'ится один раз
//! при spawn (или при загрузке нового registry), а не каждый tick.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::camera::view_projection::PV_ROW_NAMES;
use crate::logger;

/// Collection для line-of-sight shader
pub const LOS_COLLECTION: &str = "MPC_LOS";

/// Куда export пишет vector-параметры
pub trait ShaderParameterSink {
    /// `false` если slot с таким именем не объявлен
    fn set_vector(&mut self, name: &str, value: Vec4) -> bool;
}

/// Instance одной collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterCollection {
    vectors: HashMap<String, Vec4>,
    /// Счётчик успешных записей (shader-side upload смотрит на него)
    revision: u64,
}

impl ParameterCollection {
    /// Collection с объявленными slots (все = Vec4::ZERO)
    pub fn with_slots<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            vectors: names.into_iter().map(|n| (n.to_string(), Vec4::ZERO)).collect(),
            revision: 0,
        }
    }

    /// PVRow0..PVRow3
    pub fn line_of_sight() -> Self {
        Self::with_slots(PV_ROW_NAMES)
    }

    pub fn vector(&self, name: &str) -> Option<Vec4> {
        self.vectors.get(name).copied()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn slot_count(&self) -> usize {
        self.vectors.len()
    }
}

impl ShaderParameterSink for ParameterCollection {
    fn set_vector(&mut self, name: &str, value: Vec4) -> bool {
        match self.vectors.get_mut(name) {
            Some(slot) => {
                *slot = value;
                self.revision += 1;
                true
            }
            None => false,
        }
    }
}

/// World registry: asset name → instance
#[derive(Resource, Debug, Clone, Default)]
pub struct ParameterCollections {
    instances: HashMap<String, ParameterCollection>,
}

impl ParameterCollections {
    pub fn with_line_of_sight() -> Self {
        let mut registry = Self::default();
        registry.register(LOS_COLLECTION, ParameterCollection::line_of_sight());
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, collection: ParameterCollection) {
        self.instances.insert(name.into(), collection);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterCollection> {
        self.instances.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParameterCollection> {
        self.instances.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }
}

/// Ссылка персонажа на parameter collection instance
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub collection: String,
    /// true после успешного resolve; export без resolve пропускается
    pub resolved: bool,
}

impl ParameterBinding {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            resolved: false,
        }
    }
}

/// Resolve bindings в точках инициализации: новый binding или новый registry
///
/// Между этими точками повторных попыток нет.
pub fn resolve_parameter_bindings(
    registry: Option<Res<ParameterCollections>>,
    mut bindings: Query<(Entity, &mut ParameterBinding)>,
) {
    let registry_added = registry.as_ref().is_some_and(|r| r.is_added());

    for (entity, mut binding) in bindings.iter_mut() {
        if registry_added || binding.is_added() {
            resolve_binding(entity, &mut binding, registry.as_deref());
        }
    }
}

fn resolve_binding(entity: Entity, binding: &mut ParameterBinding, registry: Option<&ParameterCollections>) {
    let resolved = registry.is_some_and(|r| r.contains(&binding.collection));
    if resolved {
        logger::log(&format!(
            "{:?}: parameter collection '{}' resolved",
            entity, binding.collection
        ));
    } else {
        logger::log_warning(&format!(
            "{:?}: parameter collection '{}' not found, view-projection export disabled",
            entity, binding.collection
        ));
    }
    binding.resolved = resolved;
}
