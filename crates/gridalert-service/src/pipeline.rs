//! Per-event notification orchestration.

use std::sync::Arc;

use tracing::{debug, error, info};

use gridalert_core::result::AppResult;
use gridalert_core::traits::formatter::MessageFormatter;
use gridalert_core::traits::repository::AssetRepository;
use gridalert_core::types::event::{EventLifecycle, EventStatus, GridEvent};
use gridalert_delivery::DeliveryDispatcher;

use crate::recipient::RecipientResolver;

/// Runs one notification cycle per event lifecycle transition.
///
/// Entry points never return errors to the caller: a failed cycle is
/// logged and dropped, so event ingestion is unaffected by notification
/// outages.
pub struct NotificationPipeline {
    assets: Arc<dyn AssetRepository>,
    resolver: RecipientResolver,
    dispatcher: Arc<DeliveryDispatcher>,
    formatter: Arc<dyn MessageFormatter>,
}

impl std::fmt::Debug for NotificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPipeline").finish_non_exhaustive()
    }
}

impl NotificationPipeline {
    /// Create a new pipeline.
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        resolver: RecipientResolver,
        dispatcher: Arc<DeliveryDispatcher>,
        formatter: Arc<dyn MessageFormatter>,
    ) -> Self {
        Self {
            assets,
            resolver,
            dispatcher,
            formatter,
        }
    }

    /// Notify for a newly opened event.
    pub async fn on_event_opened(&self, event: &GridEvent) {
        self.run(event, EventLifecycle::Opened).await;
    }

    /// Notify for a status transition.
    ///
    /// Only the open-to-closed edge produces a restoration alert; every
    /// other transition is ignored.
    pub async fn on_event_updated(&self, before: EventStatus, event: &GridEvent) {
        if before == EventStatus::Open && event.status == EventStatus::Closed {
            self.run(event, EventLifecycle::Closed).await;
        } else {
            debug!(
                event = %event.id,
                before = ?before,
                after = ?event.status,
                "Ignoring status transition"
            );
        }
    }

    async fn run(&self, event: &GridEvent, lifecycle: EventLifecycle) {
        if let Err(e) = self.execute(event, lifecycle).await {
            error!(event = %event.id, error = %e, "Notification cycle failed");
        }
    }

    async fn execute(&self, event: &GridEvent, lifecycle: EventLifecycle) -> AppResult<()> {
        let Some(asset) = self.assets.get_asset(&event.bay_id).await? else {
            info!(event = %event.id, bay = %event.bay_id, "Bay not found; skipping notification");
            return Ok(());
        };

        let tokens = self.resolver.resolve(event, &asset).await?;
        if tokens.is_empty() {
            info!(event = %event.id, "No eligible recipients");
            return Ok(());
        }

        let message = self.formatter.format(event, &asset, lifecycle);
        let report = self.dispatcher.deliver(&message, tokens).await;
        info!(
            event = %event.id,
            lifecycle = ?lifecycle,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "Notification cycle complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use gridalert_cache::{PreferenceCache, SystemClock};
    use gridalert_core::config::preferences::DefaultPreferencesConfig;
    use gridalert_core::traits::repository::{
        OrgRepository, PreferenceStore, TokenStore, UserRepository,
    };
    use gridalert_core::traits::transport::PushTransport;
    use gridalert_core::types::Asset;
    use gridalert_core::types::event::EventCategory;
    use gridalert_core::types::hierarchy::{Circle, Division, Subdivision, Substation};
    use gridalert_core::types::id::{
        AssetId, CircleId, DivisionId, EventId, SubdivisionId, SubstationId, UserId,
    };
    use gridalert_core::types::message::{AndroidOptions, MessagePriority, PushMessage};
    use gridalert_core::types::outcome::SendOutcome;
    use gridalert_core::types::preference::NotificationPreferences;
    use gridalert_core::types::role::{HierarchyLevel, UserRole};
    use gridalert_core::types::token::DeviceToken;
    use gridalert_core::types::user::{AssignedLevels, User};
    use gridalert_delivery::TokenInvalidator;

    use crate::hierarchy::OrgHierarchyResolver;

    use super::*;

    struct FakeAssetRepository {
        assets: HashMap<String, Asset>,
    }

    #[async_trait]
    impl AssetRepository for FakeAssetRepository {
        async fn get_asset(&self, id: &AssetId) -> AppResult<Option<Asset>> {
            Ok(self.assets.get(id.as_str()).cloned())
        }
    }

    struct FakeOrgRepository {
        substations: HashMap<String, Substation>,
        subdivisions: HashMap<String, Subdivision>,
    }

    #[async_trait]
    impl OrgRepository for FakeOrgRepository {
        async fn get_substation(&self, id: &SubstationId) -> AppResult<Option<Substation>> {
            Ok(self.substations.get(id.as_str()).cloned())
        }

        async fn get_subdivision(&self, id: &SubdivisionId) -> AppResult<Option<Subdivision>> {
            Ok(self.subdivisions.get(id.as_str()).cloned())
        }

        async fn get_division(&self, _id: &DivisionId) -> AppResult<Option<Division>> {
            Ok(None)
        }

        async fn get_circle(&self, _id: &CircleId) -> AppResult<Option<Circle>> {
            Ok(None)
        }
    }

    struct FakeUserRepository {
        users: Vec<User>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn users_by_role_and_level(
            &self,
            role: UserRole,
            level: HierarchyLevel,
            level_id: &str,
        ) -> AppResult<Vec<User>> {
            Ok(self
                .users
                .iter()
                .filter(|u| u.role == role && u.assigned_levels.level_id(level) == Some(level_id))
                .cloned()
                .collect())
        }

        async fn users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
            Ok(self
                .users
                .iter()
                .filter(|u| u.role == role)
                .cloned()
                .collect())
        }
    }

    struct NullPreferenceStore;

    #[async_trait]
    impl PreferenceStore for NullPreferenceStore {
        async fn get_preferences(
            &self,
            _user_id: &UserId,
        ) -> AppResult<Option<NotificationPreferences>> {
            Ok(None)
        }

        async fn set_preferences(
            &self,
            _user_id: &UserId,
            _preferences: &NotificationPreferences,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn all_preferences(&self) -> AppResult<Vec<(UserId, NotificationPreferences)>> {
            Ok(Vec::new())
        }
    }

    struct FakeTokenStore {
        tokens: Vec<DeviceToken>,
    }

    #[async_trait]
    impl TokenStore for FakeTokenStore {
        async fn active_tokens(&self) -> AppResult<Vec<DeviceToken>> {
            Ok(self.tokens.clone())
        }

        async fn mark_inactive(&self, _token: &str, _at: DateTime<Utc>) -> AppResult<()> {
            Ok(())
        }
    }

    /// Records which lifecycle stages were formatted and which tokens were
    /// handed to the transport.
    #[derive(Default)]
    struct RecordingTransport {
        sent_to: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl PushTransport for RecordingTransport {
        async fn send_batch(
            &self,
            _message: &PushMessage,
            tokens: &[String],
        ) -> AppResult<Vec<(String, SendOutcome)>> {
            self.sent_to.lock().unwrap().push(tokens.to_vec());
            Ok(tokens
                .iter()
                .map(|t| (t.clone(), SendOutcome::Delivered))
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingFormatter {
        lifecycles: Mutex<Vec<EventLifecycle>>,
    }

    impl MessageFormatter for RecordingFormatter {
        fn format(
            &self,
            _event: &GridEvent,
            _asset: &Asset,
            lifecycle: EventLifecycle,
        ) -> PushMessage {
            self.lifecycles.lock().unwrap().push(lifecycle);
            PushMessage {
                title: "t".into(),
                body: "b".into(),
                data: Default::default(),
                android: AndroidOptions {
                    priority: MessagePriority::High,
                    channel_id: "power_outages".into(),
                    color: "#FF0000".into(),
                    sound: "emergency_alert".into(),
                },
            }
        }
    }

    struct Fixture {
        pipeline: NotificationPipeline,
        transport: Arc<RecordingTransport>,
        formatter: Arc<RecordingFormatter>,
    }

    fn fixture() -> Fixture {
        let mut substations = HashMap::new();
        substations.insert(
            "S1".to_string(),
            Substation {
                id: SubstationId::new("S1"),
                name: "Meerut".into(),
                subdivision_id: Some(SubdivisionId::new("SD1")),
            },
        );
        let mut subdivisions = HashMap::new();
        subdivisions.insert(
            "SD1".to_string(),
            Subdivision {
                id: SubdivisionId::new("SD1"),
                division_id: None,
            },
        );

        let mut assets = HashMap::new();
        assets.insert(
            "B1".to_string(),
            Asset {
                id: AssetId::new("B1"),
                name: "Feeder 3".into(),
                bay_type: "Line".into(),
                voltage_level: "220kV".into(),
            },
        );

        let users = vec![User {
            id: UserId::new("sub1"),
            role: UserRole::SubdivisionManager,
            assigned_levels: AssignedLevels {
                subdivision_id: Some(SubdivisionId::new("SD1")),
                ..Default::default()
            },
        }];

        let token_store = Arc::new(FakeTokenStore {
            tokens: vec![DeviceToken {
                user_id: UserId::new("sub1"),
                token: "tok-sub".into(),
                active: true,
                deactivated_at: None,
            }],
        });

        let cache = Arc::new(PreferenceCache::new(
            Arc::new(NullPreferenceStore),
            Arc::clone(&token_store) as Arc<dyn TokenStore>,
            DefaultPreferencesConfig::default().to_preferences(),
            Duration::from_secs(300),
            Arc::new(SystemClock),
        ));
        let resolver = RecipientResolver::new(
            OrgHierarchyResolver::new(Arc::new(FakeOrgRepository {
                substations,
                subdivisions,
            })),
            Arc::new(FakeUserRepository { users }),
            Arc::new(NullPreferenceStore),
            Arc::clone(&cache),
        );

        let transport = Arc::new(RecordingTransport::default());
        let invalidator = Arc::new(TokenInvalidator::new(cache, token_store));
        let dispatcher = Arc::new(DeliveryDispatcher::new(
            Arc::clone(&transport) as Arc<dyn PushTransport>,
            invalidator,
            500,
        ));
        let formatter = Arc::new(RecordingFormatter::default());

        Fixture {
            pipeline: NotificationPipeline::new(
                Arc::new(FakeAssetRepository { assets }),
                resolver,
                dispatcher,
                Arc::clone(&formatter) as Arc<dyn MessageFormatter>,
            ),
            transport,
            formatter,
        }
    }

    fn event(status: EventStatus) -> GridEvent {
        GridEvent {
            id: EventId::new("E1"),
            event_type: EventCategory::Tripping,
            status,
            substation_id: SubstationId::new("S1"),
            substation_name: Some("Meerut".into()),
            bay_id: AssetId::new("B1"),
            start_time: None,
            end_time: None,
            flags_cause: None,
            reason_for_non_feeder: None,
            phase_faults: Vec::new(),
            distance_km: None,
            has_auto_reclose: None,
            shutdown_type: None,
            shutdown_person_name: None,
            shutdown_person_designation: None,
        }
    }

    #[tokio::test]
    async fn opened_event_reaches_the_transport() {
        let fx = fixture();
        fx.pipeline.on_event_opened(&event(EventStatus::Open)).await;

        let sent = fx.transport.sent_to.lock().unwrap().clone();
        assert_eq!(sent, vec![vec!["tok-sub".to_string()]]);
        assert_eq!(
            *fx.formatter.lifecycles.lock().unwrap(),
            vec![EventLifecycle::Opened]
        );
    }

    #[tokio::test]
    async fn open_to_closed_transition_sends_restoration() {
        let fx = fixture();
        fx.pipeline
            .on_event_updated(EventStatus::Open, &event(EventStatus::Closed))
            .await;

        assert_eq!(
            *fx.formatter.lifecycles.lock().unwrap(),
            vec![EventLifecycle::Closed]
        );
    }

    #[tokio::test]
    async fn other_transitions_are_ignored() {
        let fx = fixture();
        fx.pipeline
            .on_event_updated(EventStatus::Closed, &event(EventStatus::Closed))
            .await;
        fx.pipeline
            .on_event_updated(EventStatus::Open, &event(EventStatus::Open))
            .await;
        fx.pipeline
            .on_event_updated(EventStatus::Closed, &event(EventStatus::Open))
            .await;

        assert!(fx.transport.sent_to.lock().unwrap().is_empty());
        assert!(fx.formatter.lifecycles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_bay_skips_the_cycle() {
        let fx = fixture();
        let mut e = event(EventStatus::Open);
        e.bay_id = AssetId::new("missing");
        fx.pipeline.on_event_opened(&e).await;
        assert!(fx.transport.sent_to.lock().unwrap().is_empty());
    }
}
