//! Editing session for one user's permission grants.
//!
//! Loads both permission collections for a target, applies flag toggles
//! in memory, and saves both collections back in one step. The two sides
//! save independently; a partial failure is reported per side so the
//! whole session can be retried without losing edits.

use std::sync::Arc;

use chargen_client::AdminApi;
use chargen_core::permissions::{
    self, CharacterField, CharacterPermission, ModelKind, ModelPermissionSet,
};
use chargen_core::types::UserId;

use crate::error::ConsoleResult;

/// Whose grants the editor session operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget {
    /// A specific registered user.
    User(UserId),
    /// The default profile applied to unauthenticated sessions.
    DefaultProfile,
}

impl PermissionTarget {
    fn user_id(self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::DefaultProfile => None,
        }
    }
}

/// Result of a save attempt across both collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Both collections were stored.
    Saved,
    /// At least one collection failed to store; edits remain in memory.
    Failed {
        models_saved: bool,
        characters_saved: bool,
    },
}

/// In-memory editing session over a target's permission collections.
pub struct PermissionEditor {
    api: Arc<AdminApi>,
    target: PermissionTarget,
    models: ModelPermissionSet,
    characters: Vec<CharacterPermission>,
}

impl PermissionEditor {
    /// Load both collections for `target`. Both loads must succeed for
    /// the editor to open; the two requests run concurrently.
    pub async fn load(api: Arc<AdminApi>, target: PermissionTarget) -> ConsoleResult<Self> {
        let (models, characters) = tokio::join!(
            api.model_permissions(target.user_id()),
            api.character_permissions(target.user_id()),
        );

        Ok(Self {
            api,
            target,
            models: models?,
            characters: characters?,
        })
    }

    pub fn target(&self) -> PermissionTarget {
        self.target
    }

    pub fn models(&self) -> &ModelPermissionSet {
        &self.models
    }

    pub fn characters(&self) -> &[CharacterPermission] {
        &self.characters
    }

    /// Flip one model grant; `false` when no such model is listed.
    pub fn toggle_model(&mut self, kind: ModelKind, name: &str) -> bool {
        self.models.toggle(kind, name)
    }

    /// Set every grant in one model collection at once.
    pub fn select_all_models(&mut self, kind: ModelKind, enabled: bool) {
        self.models.set_all(kind, enabled);
    }

    /// Whether every grant in one model collection is enabled.
    pub fn all_models_enabled(&self, kind: ModelKind) -> bool {
        self.models.all_enabled(kind)
    }

    /// Flip one character flag; `false` when no such character is listed.
    pub fn toggle_character(&mut self, name: &str, field: CharacterField) -> bool {
        permissions::toggle_character(&mut self.characters, name, field)
    }

    /// Store both collections back for the target.
    ///
    /// The two saves run concurrently and fail independently. Edits stay
    /// in memory either way, so a failed side can simply be saved again.
    pub async fn save(&self) -> SaveOutcome {
        let user = self.target.user_id();
        let (models, characters) = tokio::join!(
            self.api.save_model_permissions(user, &self.models),
            self.api.save_character_permissions(user, &self.characters),
        );

        let models_saved = match models {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(edited = ?self.target, error = %e, "Failed to save model permissions");
                false
            }
        };
        let characters_saved = match characters {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(edited = ?self.target, error = %e, "Failed to save character permissions");
                false
            }
        };

        if models_saved && characters_saved {
            SaveOutcome::Saved
        } else {
            SaveOutcome::Failed {
                models_saved,
                characters_saved,
            }
        }
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn models_body() -> serde_json::Value {
        json!({
            "checkpoints": [
                {"name": "base-v1.safetensors", "enabled": true},
                {"name": "base-v2.safetensors", "enabled": false}
            ],
            "loras": [
                {"name": "detail.safetensors", "enabled": true}
            ]
        })
    }

    fn characters_body() -> serde_json::Value {
        json!([
            {"name": "aurora", "can_generate": true, "can_browse": true},
            {"name": "kestrel", "can_generate": false, "can_browse": true}
        ])
    }

    async fn mount_user_load(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/admin/api/user/7/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models_body()))
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/user/7/characters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(characters_body()))
            .mount(mock_server)
            .await;
    }

    async fn editor_for(mock_server: &MockServer, target: PermissionTarget) -> PermissionEditor {
        let api = Arc::new(AdminApi::new(mock_server.uri()));
        PermissionEditor::load(api, target).await.unwrap()
    }

    // --- Loading ---

    #[tokio::test]
    async fn load_fetches_both_collections() {
        let mock_server = MockServer::start().await;
        mount_user_load(&mock_server).await;

        let editor = editor_for(&mock_server, PermissionTarget::User(7)).await;
        assert_eq!(editor.models().checkpoints.len(), 2);
        assert_eq!(editor.models().loras.len(), 1);
        assert_eq!(editor.characters().len(), 2);
        assert!(!editor.characters()[1].can_generate);
    }

    #[tokio::test]
    async fn load_default_profile_uses_default_endpoints() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/default-models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models_body()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/default-characters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(characters_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let editor = editor_for(&mock_server, PermissionTarget::DefaultProfile).await;
        assert_eq!(editor.target(), PermissionTarget::DefaultProfile);
    }

    #[tokio::test]
    async fn load_fails_when_either_collection_is_missing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/user/7/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/user/7/characters"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
            .mount(&mock_server)
            .await;

        let api = Arc::new(AdminApi::new(mock_server.uri()));
        assert!(PermissionEditor::load(api, PermissionTarget::User(7))
            .await
            .is_err());
    }

    // --- Editing ---

    #[tokio::test]
    async fn toggle_flips_flags_in_memory() {
        let mock_server = MockServer::start().await;
        mount_user_load(&mock_server).await;
        let mut editor = editor_for(&mock_server, PermissionTarget::User(7)).await;

        assert!(editor.toggle_model(ModelKind::Checkpoint, "base-v2.safetensors"));
        assert!(editor.models().checkpoints[1].enabled);

        assert!(editor.toggle_character("kestrel", CharacterField::Generate));
        assert!(editor.characters()[1].can_generate);

        assert!(!editor.toggle_model(ModelKind::Lora, "missing.safetensors"));
        assert!(!editor.toggle_character("nobody", CharacterField::Browse));
    }

    #[tokio::test]
    async fn select_all_covers_whole_collection() {
        let mock_server = MockServer::start().await;
        mount_user_load(&mock_server).await;
        let mut editor = editor_for(&mock_server, PermissionTarget::User(7)).await;

        assert!(!editor.all_models_enabled(ModelKind::Checkpoint));
        editor.select_all_models(ModelKind::Checkpoint, true);
        assert!(editor.all_models_enabled(ModelKind::Checkpoint));
    }

    // --- Saving ---

    #[tokio::test]
    async fn save_posts_edited_collections() {
        let mock_server = MockServer::start().await;
        mount_user_load(&mock_server).await;
        let mut editor = editor_for(&mock_server, PermissionTarget::User(7)).await;
        editor.toggle_model(ModelKind::Checkpoint, "base-v2.safetensors");

        Mock::given(method("POST"))
            .and(path("/admin/api/user/7/models"))
            .and(body_json(json!({
                "checkpoints": [
                    {"name": "base-v1.safetensors", "enabled": true},
                    {"name": "base-v2.safetensors", "enabled": true}
                ],
                "loras": [
                    {"name": "detail.safetensors", "enabled": true}
                ]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/api/user/7/characters"))
            .and(body_json(characters_body()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(editor.save().await, SaveOutcome::Saved);
    }

    #[tokio::test]
    async fn partial_save_failure_reports_each_side() {
        let mock_server = MockServer::start().await;
        mount_user_load(&mock_server).await;
        let editor = editor_for(&mock_server, PermissionTarget::User(7)).await;

        Mock::given(method("POST"))
            .and(path("/admin/api/user/7/models"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db locked"))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/api/user/7/characters"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        assert_eq!(
            editor.save().await,
            SaveOutcome::Failed {
                models_saved: false,
                characters_saved: true,
            }
        );
    }
}
