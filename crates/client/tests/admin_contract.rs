//! Contract tests for the admin permission client.
//!
//! Verifies target routing (user-scoped vs default profile), the
//! collection shapes on load and save, and error mapping.

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chargen_client::error::ApiError;
use chargen_client::AdminApi;
use chargen_core::permissions::{CharacterPermission, ModelPermission, ModelPermissionSet};

#[tokio::test]
async fn model_permissions_load_from_user_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/user/7/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkpoints": [{"name": "base-v1.safetensors", "enabled": true}],
            "loras": [{"name": "detail.safetensors", "enabled": false}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = AdminApi::new(mock_server.uri());
    let models = api.model_permissions(Some(7)).await.unwrap();

    assert_eq!(models.checkpoints.len(), 1);
    assert!(models.checkpoints[0].enabled);
    assert!(!models.loras[0].enabled);
}

/// A missing target addresses the default profile rather than any user.
#[tokio::test]
async fn model_permissions_without_target_use_default_profile_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/default-models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkpoints": [],
            "loras": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = AdminApi::new(mock_server.uri());
    let models = api.model_permissions(None).await.unwrap();
    assert!(models.checkpoints.is_empty());
}

#[tokio::test]
async fn save_model_permissions_posts_both_collections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/api/user/7/models"))
        .and(body_json(json!({
            "checkpoints": [{"name": "base-v1.safetensors", "enabled": false}],
            "loras": [{"name": "detail.safetensors", "enabled": true}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let models = ModelPermissionSet {
        checkpoints: vec![ModelPermission {
            name: "base-v1.safetensors".to_string(),
            enabled: false,
        }],
        loras: vec![ModelPermission {
            name: "detail.safetensors".to_string(),
            enabled: true,
        }],
    };

    let api = AdminApi::new(mock_server.uri());
    api.save_model_permissions(Some(7), &models).await.unwrap();
}

#[tokio::test]
async fn character_permissions_load_and_parse_flags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/user/7/characters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "aurora", "can_generate": true, "can_browse": false},
            {"name": "meridian", "can_generate": false, "can_browse": true}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = AdminApi::new(mock_server.uri());
    let characters = api.character_permissions(Some(7)).await.unwrap();

    assert_eq!(characters.len(), 2);
    assert!(characters[0].can_generate);
    assert!(!characters[0].can_browse);
    assert!(characters[1].can_browse);
}

#[tokio::test]
async fn save_character_permissions_posts_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/api/default-characters"))
        .and(body_json(json!([
            {"name": "aurora", "can_generate": true, "can_browse": true}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let characters = vec![CharacterPermission {
        name: "aurora".to_string(),
        can_generate: true,
        can_browse: true,
    }];

    let api = AdminApi::new(mock_server.uri());
    api.save_character_permissions(None, &characters)
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_user_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/user/999/models"))
        .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
        .mount(&mock_server)
        .await;

    let api = AdminApi::new(mock_server.uri());
    let err = api.model_permissions(Some(999)).await.unwrap_err();
    assert_matches!(err, ApiError::Api { status: 404, .. });
}
