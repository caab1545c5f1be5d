use std::collections::HashMap;

use uuid::Uuid;

use super::{matches_filter, normalize_filter, GridError, RowState};
use crate::models::vehicle::{Vehicle, VehicleForm};

pub type VehicleGridError = GridError<Uuid>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    Make,
    Model,
    Price,
    Electric,
}

impl VehicleField {
    fn set(self, form: &mut VehicleForm, value: &str) {
        let slot = match self {
            VehicleField::Make => &mut form.make,
            VehicleField::Model => &mut form.model,
            VehicleField::Price => &mut form.price,
            VehicleField::Electric => &mut form.electric,
        };
        *slot = value.to_string();
    }
}

impl From<&Vehicle> for VehicleForm {
    fn from(vehicle: &Vehicle) -> Self {
        VehicleForm {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            price: vehicle.price.to_string(),
            electric: vehicle.electric.to_string(),
        }
    }
}

/// Browser-memory variant of the grid. Nothing here touches the network and
/// every row is lost when the grid is dropped.
#[derive(Default)]
pub struct VehicleGrid {
    rows: Vec<Vehicle>,
    states: HashMap<Uuid, RowState<VehicleForm>>,
    make_filter: Option<String>,
}

impl VehicleGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Vehicle] {
        &self.rows
    }

    pub fn visible_rows(&self) -> Vec<&Vehicle> {
        let filter = self.make_filter.as_deref();
        self.rows
            .iter()
            .filter(|row| matches_filter(&row.make, filter))
            .collect()
    }

    pub fn set_make_filter(&mut self, text: &str) {
        self.make_filter = normalize_filter(text);
    }

    pub fn row_state(&self, id: Uuid) -> RowState<VehicleForm> {
        self.states.get(&id).cloned().unwrap_or(RowState::Viewing)
    }

    pub fn editing_row(&self) -> Option<Uuid> {
        self.states
            .iter()
            .find(|(_, state)| !state.is_viewing())
            .map(|(id, _)| *id)
    }

    pub fn add(&mut self, form: &VehicleForm) -> Result<&Vehicle, VehicleGridError> {
        let vehicle = form.parse()?;
        self.rows.push(vehicle);
        let last = self.rows.len() - 1;
        Ok(&self.rows[last])
    }

    pub fn begin_edit(&mut self, id: Uuid) -> Result<(), VehicleGridError> {
        let draft = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .map(VehicleForm::from)
            .ok_or(GridError::RowNotFound(id))?;

        // One row at a time: switching rows throws away the other draft.
        self.states.clear();
        self.states.insert(id, RowState::Editing { draft });
        Ok(())
    }

    pub fn set_draft_field(
        &mut self,
        id: Uuid,
        field: VehicleField,
        value: &str,
    ) -> Result<(), VehicleGridError> {
        match self.states.get_mut(&id) {
            Some(RowState::Editing { draft }) => {
                field.set(draft, value);
                Ok(())
            }
            _ => Err(GridError::NotEditing(id)),
        }
    }

    /// Applies the draft in place, keeping the row's id. An invalid draft
    /// leaves the row in edit mode.
    pub fn save(&mut self, id: Uuid) -> Result<&Vehicle, VehicleGridError> {
        let draft = match self.states.get(&id) {
            Some(RowState::Editing { draft }) => draft,
            _ => return Err(GridError::NotEditing(id)),
        };
        let parsed = draft.parse()?;

        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(GridError::RowNotFound(id))?;
        self.rows[index] = Vehicle { id, ..parsed };
        self.states.remove(&id);
        Ok(&self.rows[index])
    }

    pub fn cancel(&mut self, id: Uuid) -> Result<(), VehicleGridError> {
        match self.states.remove(&id) {
            Some(RowState::Editing { .. }) => Ok(()),
            _ => Err(GridError::NotEditing(id)),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Vehicle, VehicleGridError> {
        if self.states.get(&id).is_some_and(|state| !state.is_viewing()) {
            return Err(GridError::Editing(id));
        }
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(GridError::RowNotFound(id))?;
        Ok(self.rows.remove(index))
    }
}
