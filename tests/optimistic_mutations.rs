//! Integration tests for optimistic favorite and rating mutations.
//!
//! Each test wires the real mutator to the in-memory backend and checks what
//! the view observes before, during and after the request.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use techvault_client::adapters::api::{Endpoint, MockTechVaultApi};
use techvault_client::adapters::InMemoryKeyValueStore;
use techvault_client::application::{
    ClientContext, MutationOutcome, NoticeKind, OptimisticCell, SubmitRating, ToggleFavorite,
};
use techvault_client::config::AppConfig;
use techvault_client::domain::foundation::{ResourceId, StarRating, UserId};
use techvault_client::domain::resource::{InteractionState, Resource};
use techvault_client::domain::session::{Credential, UserSummary};
use techvault_client::ports::ApiError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn resource(user_rating: Option<u8>) -> Resource {
    serde_json::from_value(json!({
        "id": ResourceId::new().to_string(),
        "uploader_id": UserId::new().to_string(),
        "title": "Tokio in production",
        "description": null,
        "file_path": "https://cdn.example.com/tokio.pdf",
        "resource_type": "blueprint",
        "average_rating": "4.00",
        "ratings_count": 10,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "is_favorite": false,
        "user_rating": user_rating
    }))
    .unwrap()
}

fn stars(n: u8) -> StarRating {
    StarRating::new(n).unwrap()
}

fn user(telegram_id: i64, first_name: &str) -> UserSummary {
    UserSummary {
        id: UserId::new(),
        telegram_id,
        username: None,
        first_name: Some(first_name.to_string()),
        last_name: None,
        team_id: None,
        skill_level_id: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

async fn signed_in_context(api: MockTechVaultApi) -> ClientContext {
    let context = ClientContext::with_parts(
        AppConfig::default(),
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(api),
    );
    context.restore().await;
    context
        .session()
        .authenticate(Credential::new("T").unwrap(), user(11, "Ken"))
        .await
        .unwrap();
    context
}

fn cell_for(resource: &Resource) -> OptimisticCell<InteractionState> {
    OptimisticCell::new(InteractionState::from_resource(resource))
}

// =============================================================================
// Favorite toggle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn favorite_prediction_precedes_request_and_rolls_back_on_failure() {
    let item = resource(None);
    let api = MockTechVaultApi::new()
        .with_resource(item.clone())
        .with_delay(Endpoint::ToggleFavorite, Duration::from_millis(300))
        .failing_once(Endpoint::ToggleFavorite, ApiError::Network("offline".into()));
    let context = signed_in_context(api.clone()).await;
    let cell = cell_for(&item);

    let in_flight = context.mutator().start(&cell, ToggleFavorite::new(item.id));
    assert!(cell.get().is_favorite);
    assert!(api.calls().is_empty(), "prediction must be visible before the request");

    let outcome = in_flight.finish().await;

    assert!(matches!(outcome, MutationOutcome::RolledBack { .. }));
    assert!(!cell.get().is_favorite);
    // Retry succeeds and keeps the server's value.
    let retry = context.mutator().apply(&cell, ToggleFavorite::new(item.id)).await;
    assert_eq!(retry, MutationOutcome::Confirmed);
    assert!(cell.get().is_favorite);
    assert_eq!(api.stored_resource(item.id).map(|r| r.is_favorite), Some(true));
}

#[tokio::test]
async fn older_failure_does_not_roll_back_newer_prediction() {
    let item = resource(None);
    let api = MockTechVaultApi::new()
        .with_resource(item.clone())
        .failing_once(Endpoint::ToggleFavorite, ApiError::from_status(500, None));
    let context = signed_in_context(api.clone()).await;
    let cell = cell_for(&item);
    let mutator = context.mutator();

    let first = mutator.start(&cell, ToggleFavorite::new(item.id));
    let second = mutator.start(&cell, ToggleFavorite::new(item.id));
    assert!(!cell.get().is_favorite);

    let first_outcome = first.finish().await;
    assert_eq!(
        first_outcome,
        MutationOutcome::Superseded {
            error: Some(ApiError::from_status(500, None))
        }
    );
    // The newer prediction is untouched by the older rollback.
    assert!(!cell.get().is_favorite);
    assert_eq!(context.notices().active().len(), 1);

    assert_eq!(second.finish().await, MutationOutcome::Confirmed);
    let server = api.stored_resource(item.id).map(|r| r.is_favorite);
    assert_eq!(Some(cell.get().is_favorite), server);
}

#[tokio::test(start_paused = true)]
async fn detached_view_is_never_written_after_unmount() {
    let item = resource(None);
    let api = MockTechVaultApi::new()
        .with_resource(item.clone())
        .with_delay(Endpoint::ToggleFavorite, Duration::from_secs(1));
    let context = signed_in_context(api).await;
    let cell = cell_for(&item);

    let in_flight = context.mutator().start(&cell, ToggleFavorite::new(item.id));
    cell.detach();

    assert_eq!(in_flight.finish().await, MutationOutcome::Detached);
    assert!(context.notices().active().is_empty());

    // Nothing starts on a detached cell.
    let before = cell.get();
    let outcome = context.mutator().apply(&cell, ToggleFavorite::new(item.id)).await;
    assert_eq!(outcome, MutationOutcome::Detached);
    assert_eq!(cell.get(), before);
}

// =============================================================================
// Rating
// =============================================================================

#[tokio::test]
async fn newer_rating_failure_restores_the_older_prediction() {
    let item = resource(None);
    let api = MockTechVaultApi::new().with_resource(item.clone());
    let context = signed_in_context(api.clone()).await;
    let cell = cell_for(&item);
    let mutator = context.mutator();

    let first = mutator.start(&cell, SubmitRating::new(item.id, stars(4)));
    let second = mutator.start(&cell, SubmitRating::new(item.id, stars(5)));
    assert_eq!(cell.get().user_rating, Some(stars(5)));

    assert_eq!(
        first.finish().await,
        MutationOutcome::Superseded { error: None }
    );
    assert_eq!(cell.get().user_rating, Some(stars(5)));

    api.set_failing(Endpoint::RateResource, ApiError::Network("offline".into()));
    let outcome = second.finish().await;

    assert!(matches!(outcome, MutationOutcome::RolledBack { .. }));
    // The newer mutation's snapshot already held the older prediction.
    assert_eq!(cell.get().user_rating, Some(stars(4)));
    assert_eq!(cell.get().displayed_stars(), 4);
}

#[tokio::test]
async fn rating_aggregates_come_from_the_server() {
    let item = resource(None);
    let api = MockTechVaultApi::new().with_resource(item.clone());
    let context = signed_in_context(api.clone()).await;
    let cell = cell_for(&item);

    let in_flight = context.mutator().start(&cell, SubmitRating::new(item.id, stars(5)));
    let predicted = cell.get();
    assert_eq!(predicted.user_rating, Some(stars(5)));
    assert_eq!(predicted.average_rating.value(), 4.0);
    assert_eq!(predicted.ratings_count, 10);

    assert_eq!(in_flight.finish().await, MutationOutcome::Confirmed);

    let server = api.stored_resource(item.id).unwrap();
    let settled = cell.get();
    assert_eq!(settled.average_rating, server.average_rating);
    assert_eq!(settled.ratings_count, 11);
    assert_eq!(settled.user_rating, Some(stars(5)));
}

#[tokio::test(start_paused = true)]
async fn offline_star_click_reverts_and_posts_notice() {
    let item = resource(Some(2));
    let api = MockTechVaultApi::new()
        .with_resource(item.clone())
        .with_delay(Endpoint::RateResource, Duration::from_millis(50))
        .failing(
            Endpoint::RateResource,
            ApiError::Network("network unreachable".into()),
        );
    let context = signed_in_context(api).await;
    let cell = cell_for(&item);
    assert_eq!(cell.get().displayed_stars(), 2);

    let in_flight = context.mutator().start(&cell, SubmitRating::new(item.id, stars(3)));
    assert_eq!(cell.get().displayed_stars(), 3);

    let outcome = in_flight.finish().await;

    assert!(matches!(outcome, MutationOutcome::RolledBack { .. }));
    assert_eq!(cell.get().displayed_stars(), 2);
    assert_eq!(cell.get(), InteractionState::from_resource(&item));
    let notices = context.notices().active();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Mutation);
    assert_eq!(notices[0].message, "Could not save rating: You appear to be offline");
    assert!(context.session().is_authenticated());
}

#[tokio::test]
async fn mutations_on_different_resources_are_independent() {
    let liked = resource(None);
    let broken = resource(None);
    let api = MockTechVaultApi::new()
        .with_resource(liked.clone())
        .with_resource(broken.clone());
    let context = signed_in_context(api.clone()).await;
    let liked_cell = cell_for(&liked);
    let broken_cell = cell_for(&broken);
    api.set_failing(Endpoint::RateResource, ApiError::from_status(503, None));

    let mutator = context.mutator();
    let (favorite, rating) = tokio::join!(
        mutator.apply(&liked_cell, ToggleFavorite::new(liked.id)),
        mutator.apply(&broken_cell, SubmitRating::new(broken.id, stars(1))),
    );

    assert_eq!(favorite, MutationOutcome::Confirmed);
    assert!(liked_cell.get().is_favorite);
    assert!(matches!(rating, MutationOutcome::RolledBack { .. }));
    assert_eq!(broken_cell.get().user_rating, None);
}

#[tokio::test]
async fn rejected_credential_rolls_back_and_signs_out() {
    let item = resource(None);
    let api = MockTechVaultApi::new().with_resource(item.clone()).failing(
        Endpoint::ToggleFavorite,
        ApiError::Unauthorized {
            detail: Some("Token expired".into()),
        },
    );
    let context = signed_in_context(api).await;
    let cell = cell_for(&item);

    let outcome = context.mutator().apply(&cell, ToggleFavorite::new(item.id)).await;

    assert!(matches!(outcome, MutationOutcome::RolledBack { .. }));
    assert!(!cell.get().is_favorite);
    assert!(!context.session().is_authenticated());
    assert_eq!(context.notices().active()[0].kind, NoticeKind::Session);
}

#[tokio::test(start_paused = true)]
async fn rejection_of_old_credential_keeps_session_started_mid_flight() {
    let item = resource(None);
    let api = MockTechVaultApi::new()
        .with_resource(item.clone())
        .with_delay(Endpoint::ToggleFavorite, Duration::from_millis(500))
        .failing(
            Endpoint::ToggleFavorite,
            ApiError::Unauthorized {
                detail: Some("Token expired".into()),
            },
        );
    let context = signed_in_context(api).await;
    let cell = cell_for(&item);

    let in_flight = context.mutator().start(&cell, ToggleFavorite::new(item.id));
    let session = context.session().clone();
    let (outcome, ()) = tokio::join!(in_flight.finish(), async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.clear().await.unwrap();
        session
            .authenticate(Credential::new("NEW").unwrap(), user(12, "Bob"))
            .await
            .unwrap();
    });

    assert!(matches!(outcome, MutationOutcome::RolledBack { .. }));
    assert!(!cell.get().is_favorite);
    assert!(context.session().is_authenticated());
    assert_eq!(
        context.sending_credential(),
        Some(Credential::new("NEW").unwrap())
    );
    let notices = context.notices().active();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Mutation);
}
