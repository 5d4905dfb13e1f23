use tracing::{info, warn};

use crate::api::Backend;
use crate::error::{ClientError, ValidationError};
use crate::model::{is_protected, ProfileDefinition, ProfileSet, ProfileSetSummary};

const LOAD_FAILED: &str = "Failed to load profile sets";
const SAVE_FAILED: &str = "Failed to save profile set";
const CREATE_FAILED: &str = "Failed to create profile set";
const DELETE_FAILED: &str = "Failed to delete profile set";

/// Proof that deletion of a specific set was asked for and allowed.
/// Obtained from [`ProfileSetEditor::request_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteToken {
    id: String,
}

impl DeleteToken {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Profile-set management: list, select, edit rows, save, create,
/// duplicate and delete.
///
/// Row edits only touch the in-memory set until [`save`](Self::save).
/// Failures leave a page-level message and never undo local edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSetEditor {
    summaries: Vec<ProfileSetSummary>,
    selected_id: Option<String>,
    current: Option<ProfileSet>,
    error: Option<String>,
}

impl ProfileSetEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> &[ProfileSetSummary] {
        &self.summaries
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn current(&self) -> Option<&ProfileSet> {
        self.current.as_ref()
    }

    /// Name and description edits.
    pub fn current_mut(&mut self) -> Option<&mut ProfileSet> {
        self.current.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Keep the outcome, recording its message as the page error on failure.
    fn record<T>(&mut self, outcome: Result<T, ClientError>, fallback: &str) -> Result<T, ClientError> {
        match &outcome {
            Ok(_) => self.error = None,
            Err(e) => {
                warn!("{}: {}", fallback, e);
                self.error = Some(e.user_message(fallback));
            }
        }
        outcome
    }

    async fn refresh_list<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        self.summaries = backend.list_profile_sets().await?;
        Ok(())
    }

    /// Selection only moves once the set has arrived.
    async fn fetch<B: Backend>(&mut self, backend: &B, id: &str) -> Result<(), ClientError> {
        let set = backend.get_profile_set(id).await?;
        info!("Loaded profile set '{}' with {} profiles", set.id, set.profiles.len());
        self.selected_id = Some(id.to_string());
        self.current = Some(set);
        Ok(())
    }

    /// Fetch the list; select the first set when nothing is selected yet.
    pub async fn load<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let outcome = async {
            self.refresh_list(backend).await?;
            if self.selected_id.is_none() {
                if let Some(first) = self.summaries.first().map(|s| s.id.clone()) {
                    self.fetch(backend, &first).await?;
                }
            }
            Ok::<_, ClientError>(())
        }
        .await;
        self.record(outcome, LOAD_FAILED)
    }

    pub async fn select<B: Backend>(&mut self, backend: &B, id: &str) -> Result<(), ClientError> {
        let outcome = self.fetch(backend, id).await;
        self.record(outcome, LOAD_FAILED)
    }

    pub async fn save<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let outcome = async {
            let set = self.current.as_ref().ok_or(ValidationError::NoSelection)?;
            let saved = backend.save_profile_set(set).await?;
            info!("Saved profile set '{}'", saved.id);
            self.current = Some(saved);
            self.refresh_list(backend).await
        }
        .await;
        self.record(outcome, SAVE_FAILED)
    }

    /// Create an empty set from a display name and select it.
    pub async fn create<B: Backend>(&mut self, backend: &B, name: &str) -> Result<(), ClientError> {
        let outcome = async {
            if name.trim().is_empty() {
                return Err(ClientError::from(ValidationError::EmptyName));
            }
            let created = backend.create_profile_set(&ProfileSet::new_named(name)).await?;
            self.refresh_list(backend).await?;
            self.fetch(backend, &created.id).await
        }
        .await;
        self.record(outcome, CREATE_FAILED)
    }

    /// Store a copy of the current set and select the copy.
    pub async fn duplicate<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let outcome = async {
            let copy = self.current.as_ref().ok_or(ValidationError::NoSelection)?.duplicate();
            let created = backend.create_profile_set(&copy).await?;
            self.refresh_list(backend).await?;
            self.fetch(backend, &created.id).await
        }
        .await;
        self.record(outcome, CREATE_FAILED)
    }

    /// First step of deletion. The built-in set is refused here, before any
    /// request is made.
    pub fn request_delete(&mut self) -> Result<DeleteToken, ValidationError> {
        let outcome = match self.selected_id.as_deref() {
            None => Err(ValidationError::NoSelection),
            Some(id) if is_protected(id) => Err(ValidationError::ProtectedProfileSet(id.to_string())),
            Some(id) => Ok(DeleteToken { id: id.to_string() }),
        };
        if let Err(e) = &outcome {
            self.error = Some(e.to_string());
        }
        outcome
    }

    /// Second step of deletion. The token must still name the selected set.
    /// Afterwards the first remaining set is selected, if any.
    pub async fn confirm_delete<B: Backend>(&mut self, backend: &B, token: DeleteToken) -> Result<(), ClientError> {
        let outcome = async {
            if self.selected_id.as_deref() != Some(token.id.as_str()) {
                return Err(ClientError::from(ValidationError::StaleDeleteToken));
            }
            if is_protected(&token.id) {
                return Err(ClientError::from(ValidationError::ProtectedProfileSet(token.id.clone())));
            }
            backend.delete_profile_set(&token.id).await?;
            info!("Deleted profile set '{}'", token.id);
            self.selected_id = None;
            self.current = None;
            self.refresh_list(backend).await?;
            if let Some(first) = self.summaries.first().map(|s| s.id.clone()) {
                self.fetch(backend, &first).await?;
            }
            Ok::<_, ClientError>(())
        }
        .await;
        self.record(outcome, DELETE_FAILED)
    }

    /// Append a blank row to the current set. Returns its index.
    pub fn add_profile(&mut self) -> Result<usize, ValidationError> {
        let set = self.current.as_mut().ok_or(ValidationError::NoSelection)?;
        Ok(set.add_profile())
    }

    pub fn remove_profile(&mut self, index: usize) -> Result<ProfileDefinition, ValidationError> {
        let set = self.current.as_mut().ok_or(ValidationError::NoSelection)?;
        set.remove_profile(index).ok_or(ValidationError::NoSuchRow(index))
    }

    pub fn update_profile(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut ProfileDefinition),
    ) -> Result<(), ValidationError> {
        let set = self.current.as_mut().ok_or(ValidationError::NoSelection)?;
        let profile = set.profile_mut(index).ok_or(ValidationError::NoSuchRow(index))?;
        edit(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Band, WaveLevel};

    fn editor_with(set: ProfileSet) -> ProfileSetEditor {
        ProfileSetEditor {
            summaries: vec![set.summary()],
            selected_id: Some(set.id.clone()),
            current: Some(set),
            error: None,
        }
    }

    #[test]
    fn test_protected_set_cannot_be_deleted() {
        let mut editor = editor_with(ProfileSet::new_named("Meditasyon"));
        assert_eq!(
            editor.request_delete(),
            Err(ValidationError::ProtectedProfileSet("meditasyon".to_string()))
        );
        assert_eq!(editor.error(), Some("Cannot delete default profile set 'meditasyon'"));
    }

    #[test]
    fn test_delete_needs_selection() {
        let mut editor = ProfileSetEditor::new();
        assert_eq!(editor.request_delete(), Err(ValidationError::NoSelection));
    }

    #[test]
    fn test_delete_token_names_selection() {
        let mut editor = editor_with(ProfileSet::new_named("Deep Focus"));
        assert_eq!(editor.request_delete().unwrap().id(), "deep_focus");
    }

    #[test]
    fn test_row_edits_stay_local() {
        let mut editor = editor_with(ProfileSet::new_named("My Set"));
        let index = editor.add_profile().unwrap();
        editor
            .update_profile(index, |p| {
                p.display_name = "Calm".to_string();
                p.set_level(Band::Theta, WaveLevel::High);
            })
            .unwrap();

        let current = editor.current().unwrap();
        assert_eq!(current.profiles[0].display_name, "Calm");
        assert_eq!(current.profiles[0].theta_level, WaveLevel::High);

        assert_eq!(editor.update_profile(3, |_| {}), Err(ValidationError::NoSuchRow(3)));
        assert!(editor.remove_profile(0).is_ok());
        assert!(editor.current().unwrap().profiles.is_empty());
    }

    #[test]
    fn test_row_edits_need_a_set() {
        let mut editor = ProfileSetEditor::new();
        assert_eq!(editor.add_profile(), Err(ValidationError::NoSelection));
    }
}
