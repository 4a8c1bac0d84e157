//! Material id -> constitutive model lookup.

use indexmap::IndexMap;

use crate::error::{MpmError, MpmResult};
use crate::materials::{ConstitutiveModel, MaterialId};

/// Explicit registry handed to the integrator. Resolving an id performs no
/// physics; it only selects the model.
#[derive(Default)]
pub struct MaterialRegistry {
    models: IndexMap<MaterialId, Box<dyn ConstitutiveModel>>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: MaterialId, model: impl ConstitutiveModel + 'static) -> Self {
        self.register(id, model);
        self
    }

    /// Register `model` under `id`, returning the model it replaced.
    pub fn register(
        &mut self,
        id: MaterialId,
        model: impl ConstitutiveModel + 'static,
    ) -> Option<Box<dyn ConstitutiveModel>> {
        self.models.insert(id, Box::new(model))
    }

    pub fn get(&self, id: MaterialId) -> MpmResult<&dyn ConstitutiveModel> {
        self.models
            .get(&id)
            .map(|model| &**model)
            .ok_or(MpmError::MaterialNotFound(id))
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        self.models.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.models.keys().copied()
    }
}

impl std::fmt::Debug for MaterialRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.models.iter().map(|(id, model)| (id, model.name())))
            .finish()
    }
}
