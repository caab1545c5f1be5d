use std::collections::HashMap;

use chrono::{DateTime, Local, TimeZone, Utc};

use super::{matches_filter, normalize_filter, GridError, RowState};
use crate::client::EmployeeApi;
use crate::models::employee::{Employee, EmployeeInput};

pub type EmployeeGridError = GridError<i32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Name,
    Email,
    Department,
}

impl EmployeeField {
    fn set(self, input: &mut EmployeeInput, value: &str) {
        let slot = match self {
            EmployeeField::Name => &mut input.name,
            EmployeeField::Email => &mut input.email,
            EmployeeField::Department => &mut input.department,
        };
        *slot = value.to_string();
    }
}

/// Mirror of `GET /employees`. Every mutation goes to the server first and
/// the whole list is fetched again afterwards; rows are never patched locally.
pub struct EmployeeGrid<A: EmployeeApi> {
    api: A,
    rows: Vec<Employee>,
    // Rows absent from the map are viewing.
    states: HashMap<i32, RowState<EmployeeInput>>,
    name_filter: Option<String>,
    new_employee: EmployeeInput,
}

impl<A: EmployeeApi> EmployeeGrid<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            rows: Vec::new(),
            states: HashMap::new(),
            name_filter: None,
            new_employee: EmployeeInput::new("", "", ""),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn rows(&self) -> &[Employee] {
        &self.rows
    }

    pub fn visible_rows(&self) -> Vec<&Employee> {
        let filter = self.name_filter.as_deref();
        self.rows
            .iter()
            .filter(|row| matches_filter(&row.name, filter))
            .collect()
    }

    pub fn set_name_filter(&mut self, text: &str) {
        self.name_filter = normalize_filter(text);
    }

    pub fn name_filter(&self) -> Option<&str> {
        self.name_filter.as_deref()
    }

    pub fn row_state(&self, id: i32) -> RowState<EmployeeInput> {
        self.states.get(&id).cloned().unwrap_or(RowState::Viewing)
    }

    /// The row currently in edit mode, if any.
    pub fn editing_row(&self) -> Option<i32> {
        self.states
            .iter()
            .find(|(_, state)| !state.is_viewing())
            .map(|(id, _)| *id)
    }

    pub fn new_employee_form(&self) -> &EmployeeInput {
        &self.new_employee
    }

    pub fn set_new_employee_field(&mut self, field: EmployeeField, value: &str) {
        field.set(&mut self.new_employee, value);
    }

    /// `&mut self` rules out overlapping calls, so a row still marked
    /// `Saving` on entry belongs to a save whose future was dropped before
    /// the server answered. It goes back to editing with its draft.
    fn recover_abandoned_saves(&mut self) {
        for state in self.states.values_mut() {
            let draft = match state {
                RowState::Saving { draft } => draft.clone(),
                _ => continue,
            };
            *state = RowState::Editing { draft };
        }
    }

    pub async fn refresh(&mut self) -> Result<(), EmployeeGridError> {
        self.recover_abandoned_saves();
        self.rows = self.api.list().await?;
        let rows = &self.rows;
        self.states.retain(|id, _| rows.iter().any(|row| row.id == *id));
        Ok(())
    }

    /// Validates the add form locally, then creates the row. The form is
    /// cleared only once the server has accepted it.
    pub async fn add(&mut self) -> Result<Employee, EmployeeGridError> {
        let input = self.new_employee.trimmed();
        check_required(&input)?;

        let created = self.api.create(&input).await?;
        self.new_employee = EmployeeInput::new("", "", "");
        self.refresh().await?;
        Ok(created)
    }

    /// Enters edit mode on `id`. An edit in progress on another row is
    /// cancelled first.
    pub fn begin_edit(&mut self, id: i32) -> Result<(), EmployeeGridError> {
        self.recover_abandoned_saves();
        let row = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .ok_or(GridError::RowNotFound(id))?;
        let draft = EmployeeInput::new(&row.name, &row.email, &row.department);

        if let Some(other) = self.editing_row() {
            if other == id {
                return Ok(());
            }
            self.states.remove(&other);
        }

        self.states.insert(id, RowState::Editing { draft });
        Ok(())
    }

    pub fn set_draft_field(
        &mut self,
        id: i32,
        field: EmployeeField,
        value: &str,
    ) -> Result<(), EmployeeGridError> {
        self.recover_abandoned_saves();
        match self.states.get_mut(&id) {
            Some(RowState::Editing { draft }) => {
                field.set(draft, value);
                Ok(())
            }
            _ => Err(GridError::NotEditing(id)),
        }
    }

    /// Sends the draft with `PUT`. On failure the row stays in edit mode
    /// with the draft intact, as it does when the returned future is
    /// dropped before the server answers.
    pub async fn save(&mut self, id: i32) -> Result<Employee, EmployeeGridError> {
        self.recover_abandoned_saves();
        let draft = match self.states.remove(&id) {
            Some(RowState::Editing { draft }) => draft,
            _ => return Err(GridError::NotEditing(id)),
        };

        let input = draft.trimmed();
        if let Err(err) = check_required(&input) {
            self.states.insert(id, RowState::Editing { draft });
            return Err(err);
        }

        self.states.insert(
            id,
            RowState::Saving {
                draft: draft.clone(),
            },
        );
        match self.api.update(id, &input).await {
            Ok(updated) => {
                self.states.remove(&id);
                self.refresh().await?;
                Ok(updated)
            }
            Err(err) => {
                log::warn!("Error updating employee {}: {}", id, err);
                self.states.insert(id, RowState::Editing { draft });
                Err(err.into())
            }
        }
    }

    /// Leaves edit mode without saving and reloads the list.
    pub async fn cancel(&mut self, id: i32) -> Result<(), EmployeeGridError> {
        self.recover_abandoned_saves();
        match self.states.get(&id) {
            Some(RowState::Editing { .. }) => {
                self.states.remove(&id);
            }
            _ => return Err(GridError::NotEditing(id)),
        }
        self.refresh().await
    }

    /// Only allowed while the row is viewing.
    pub async fn delete(&mut self, id: i32) -> Result<(), EmployeeGridError> {
        self.recover_abandoned_saves();
        if self.states.get(&id).is_some_and(|state| !state.is_viewing()) {
            return Err(GridError::Editing(id));
        }
        if !self.rows.iter().any(|row| row.id == id) {
            return Err(GridError::RowNotFound(id));
        }

        self.api.delete(id).await?;
        self.refresh().await
    }
}

fn check_required(input: &EmployeeInput) -> Result<(), EmployeeGridError> {
    let missing: Vec<&'static str> = [
        ("name", &input.name),
        ("email", &input.email),
        ("department", &input.department),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GridError::Validation(missing))
    }
}

/// Display form of `created_at` in the viewer's local time zone.
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    format_created_at_in(created_at, &Local)
}

/// `3/5/2024, 2:07:09 PM` style rendering in `tz`.
pub fn format_created_at_in<Tz>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    created_at
        .with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::FixedOffset;
    use reqwest::StatusCode;

    use super::*;
    use crate::client::{ApiError, DeleteAck};
    use crate::store::{EmployeeStore, MemoryEmployeeStore};

    /// Talks straight to a memory store and counts calls.
    #[derive(Default)]
    struct FakeApi {
        store: MemoryEmployeeStore,
        calls: AtomicUsize,
        fail_updates: AtomicBool,
        hang_updates: AtomicBool,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl EmployeeApi for FakeApi {
        async fn list(&self) -> Result<Vec<Employee>, ApiError> {
            self.hit();
            Ok(self.store.list().await.unwrap())
        }

        async fn create(&self, input: &EmployeeInput) -> Result<Employee, ApiError> {
            self.hit();
            Ok(self.store.create(input).await.unwrap())
        }

        async fn update(&self, id: i32, input: &EmployeeInput) -> Result<Employee, ApiError> {
            self.hit();
            if self.hang_updates.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "Internal Server Error".to_string(),
                });
            }
            self.store
                .update(id, input)
                .await
                .unwrap()
                .ok_or(ApiError::Status {
                    status: StatusCode::NOT_FOUND,
                    body: "Employee not found".to_string(),
                })
        }

        async fn delete(&self, id: i32) -> Result<DeleteAck, ApiError> {
            self.hit();
            self.store.delete(id).await.unwrap();
            Ok(DeleteAck {
                message: "Employee deleted successfully".to_string(),
            })
        }
    }

    async fn seeded(names: &[&str]) -> EmployeeGrid<FakeApi> {
        let api = FakeApi::default();
        for name in names {
            let email = format!("{}@x.com", name.to_lowercase());
            api.store
                .create(&EmployeeInput::new(name, &email, "Eng"))
                .await
                .unwrap();
        }
        let mut grid = EmployeeGrid::new(api);
        grid.refresh().await.unwrap();
        grid
    }

    fn visible_names<A: EmployeeApi>(grid: &EmployeeGrid<A>) -> Vec<String> {
        grid.visible_rows().iter().map(|row| row.name.clone()).collect()
    }

    #[tokio::test]
    async fn name_filter_matches_substring_ignoring_case() {
        let mut grid = seeded(&["Alice", "Bob"]).await;
        let calls = grid.api().calls();

        grid.set_name_filter("ali");
        assert_eq!(visible_names(&grid), vec!["Alice"]);

        grid.set_name_filter("");
        assert_eq!(visible_names(&grid), vec!["Alice", "Bob"]);
        assert_eq!(grid.api().calls(), calls);
    }

    #[tokio::test]
    async fn add_with_blank_field_makes_no_call() {
        let mut grid = seeded(&[]).await;
        let calls = grid.api().calls();

        grid.set_new_employee_field(EmployeeField::Name, "Jane Doe");
        grid.set_new_employee_field(EmployeeField::Email, "   ");
        let err = grid.add().await.unwrap_err();

        assert!(matches!(err, GridError::Validation(ref fields) if fields == &vec!["email", "department"]));
        assert_eq!(grid.api().calls(), calls);
        assert_eq!(grid.new_employee_form().name, "Jane Doe");
    }

    #[tokio::test]
    async fn add_posts_clears_form_and_refetches() {
        let mut grid = seeded(&[]).await;
        grid.set_new_employee_field(EmployeeField::Name, "Jane Doe");
        grid.set_new_employee_field(EmployeeField::Email, "jane@x.com");
        grid.set_new_employee_field(EmployeeField::Department, "Eng");

        let created = grid.add().await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(grid.rows(), &[created]);
        assert_eq!(grid.new_employee_form(), &EmployeeInput::new("", "", ""));
    }

    #[tokio::test]
    async fn edit_then_save_round_trip() {
        let mut grid = seeded(&["Alice"]).await;
        let original = grid.rows()[0].clone();

        grid.begin_edit(original.id).unwrap();
        grid.set_draft_field(original.id, EmployeeField::Department, "Sales")
            .unwrap();
        let saved = grid.save(original.id).await.unwrap();

        assert_eq!(saved.department, "Sales");
        assert_eq!(saved.created_at, original.created_at);
        assert_eq!(grid.row_state(original.id), RowState::Viewing);
        assert_eq!(grid.rows()[0].department, "Sales");
    }

    #[tokio::test]
    async fn failed_save_keeps_draft() {
        let mut grid = seeded(&["Alice"]).await;
        grid.api().fail_updates.store(true, Ordering::SeqCst);

        grid.begin_edit(1).unwrap();
        grid.set_draft_field(1, EmployeeField::Name, "Alicia").unwrap();
        let err = grid.save(1).await.unwrap_err();

        assert!(matches!(err, GridError::Api(ApiError::Status { .. })));
        assert!(grid.row_state(1).is_editing());
        assert_eq!(grid.row_state(1).draft().unwrap().name, "Alicia");
        assert_eq!(grid.rows()[0].name, "Alice");
    }

    #[tokio::test]
    async fn save_rejects_blank_draft() {
        let mut grid = seeded(&["Alice"]).await;
        let calls = grid.api().calls();

        grid.begin_edit(1).unwrap();
        grid.set_draft_field(1, EmployeeField::Email, "").unwrap();
        let err = grid.save(1).await.unwrap_err();

        assert!(matches!(err, GridError::Validation(_)));
        assert!(grid.row_state(1).is_editing());
        assert_eq!(grid.api().calls(), calls);
    }

    #[tokio::test]
    async fn only_one_row_edits_at_a_time() {
        let mut grid = seeded(&["Alice", "Bob"]).await;

        grid.begin_edit(1).unwrap();
        grid.set_draft_field(1, EmployeeField::Name, "Changed").unwrap();
        grid.begin_edit(2).unwrap();

        assert_eq!(grid.editing_row(), Some(2));
        assert_eq!(grid.row_state(1), RowState::Viewing);
        assert!(matches!(
            grid.set_draft_field(1, EmployeeField::Name, "x"),
            Err(GridError::NotEditing(1))
        ));
    }

    #[tokio::test]
    async fn cancel_discards_draft() {
        let mut grid = seeded(&["Alice"]).await;

        grid.begin_edit(1).unwrap();
        grid.set_draft_field(1, EmployeeField::Name, "Zed").unwrap();
        grid.cancel(1).await.unwrap();

        assert_eq!(grid.row_state(1), RowState::Viewing);
        assert_eq!(grid.rows()[0].name, "Alice");
        assert!(matches!(grid.cancel(1).await, Err(GridError::NotEditing(1))));
    }

    #[tokio::test]
    async fn delete_requires_viewing_row() {
        let mut grid = seeded(&["Alice", "Bob"]).await;

        grid.begin_edit(1).unwrap();
        assert!(matches!(grid.delete(1).await, Err(GridError::Editing(1))));

        grid.delete(2).await.unwrap();
        assert_eq!(visible_names(&grid), vec!["Alice"]);
        assert!(grid.row_state(1).is_editing());
    }

    #[tokio::test]
    async fn refresh_drops_state_of_vanished_rows() {
        let mut grid = seeded(&["Alice"]).await;
        grid.begin_edit(1).unwrap();

        grid.api().store.delete(1).await.unwrap();
        grid.refresh().await.unwrap();

        assert_eq!(grid.editing_row(), None);
        assert!(grid.rows().is_empty());
    }

    #[tokio::test]
    async fn dropped_save_leaves_row_editable() {
        let mut grid = seeded(&["Alice", "Bob"]).await;
        grid.api().hang_updates.store(true, Ordering::SeqCst);

        grid.begin_edit(1).unwrap();
        grid.set_draft_field(1, EmployeeField::Name, "Alicia").unwrap();
        let timed_out = tokio::time::timeout(Duration::from_millis(20), grid.save(1)).await;
        assert!(timed_out.is_err());

        grid.refresh().await.unwrap();
        assert!(grid.row_state(1).is_editing());
        assert_eq!(grid.row_state(1).draft().unwrap().name, "Alicia");

        grid.api().hang_updates.store(false, Ordering::SeqCst);
        grid.save(1).await.unwrap();
        assert_eq!(grid.rows()[0].name, "Alicia");

        grid.begin_edit(2).unwrap();
        assert_eq!(grid.editing_row(), Some(2));
    }

    #[tokio::test]
    async fn dropped_save_does_not_block_other_actions() {
        let mut grid = seeded(&["Alice", "Bob"]).await;
        grid.api().hang_updates.store(true, Ordering::SeqCst);

        grid.begin_edit(1).unwrap();
        let timed_out = tokio::time::timeout(Duration::from_millis(20), grid.save(1)).await;
        assert!(timed_out.is_err());

        grid.cancel(1).await.unwrap();
        grid.delete(1).await.unwrap();
        grid.begin_edit(2).unwrap();

        assert_eq!(visible_names(&grid), vec!["Bob"]);
        assert_eq!(grid.editing_row(), Some(2));
    }

    #[test]
    fn formats_timestamp_for_display() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T14:07:09Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(format_created_at_in(&ts, &Utc), "3/5/2024, 2:07:09 PM");

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_created_at_in(&ts, &tokyo), "3/5/2024, 11:07:09 PM");

        let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(format_created_at_in(&ts, &honolulu), "3/5/2024, 4:07:09 AM");

        let late = DateTime::parse_from_rfc3339("2024-12-31T20:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_created_at_in(&late, &tokyo), "1/1/2025, 5:30:00 AM");
    }
}
