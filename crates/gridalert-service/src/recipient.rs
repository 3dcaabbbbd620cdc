//! Recipient resolution: hierarchy, candidates, preferences, tokens.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{BoxFuture, try_join_all};
use tracing::{debug, info, warn};

use gridalert_cache::PreferenceCache;
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::{PreferenceStore, UserRepository};
use gridalert_core::types::asset::Asset;
use gridalert_core::types::event::GridEvent;
use gridalert_core::types::id::UserId;
use gridalert_core::types::role::UserRole;
use gridalert_core::types::user::User;

use crate::eligibility::{self, EligibilityContext};
use crate::hierarchy::OrgHierarchyResolver;

/// Resolves the ordered, de-duplicated device-token list for one event.
///
/// Candidate order is hierarchy level ascending (subdivision managers
/// first) with admins last; a token reachable through several overlapping
/// roles is emitted once, at its first-seen position.
pub struct RecipientResolver {
    hierarchy: OrgHierarchyResolver,
    users: Arc<dyn UserRepository>,
    preference_store: Arc<dyn PreferenceStore>,
    cache: Arc<PreferenceCache>,
}

impl std::fmt::Debug for RecipientResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientResolver").finish_non_exhaustive()
    }
}

impl RecipientResolver {
    /// Create a new resolver.
    pub fn new(
        hierarchy: OrgHierarchyResolver,
        users: Arc<dyn UserRepository>,
        preference_store: Arc<dyn PreferenceStore>,
        cache: Arc<PreferenceCache>,
    ) -> Self {
        Self {
            hierarchy,
            users,
            preference_store,
            cache,
        }
    }

    /// Resolve the recipient tokens for one event.
    ///
    /// An unresolvable hierarchy yields an empty list rather than an error;
    /// a failed cache refresh degrades to serving the previous snapshot.
    pub async fn resolve(&self, event: &GridEvent, asset: &Asset) -> AppResult<Vec<String>> {
        let Some(chain) = self.hierarchy.resolve(&event.substation_id).await? else {
            info!(substation = %event.substation_id, "No resolvable hierarchy; no recipients");
            return Ok(Vec::new());
        };

        if self.cache.is_stale() {
            if let Err(e) = self.cache.refresh().await {
                warn!(error = %e, "Proceeding with stale preference snapshot");
            }
        }

        let candidates = self.candidates(&chain).await?;
        debug!(count = candidates.len(), "Collected candidate users");

        let context = EligibilityContext {
            category: event.event_type,
            voltage_kv: asset.voltage_kv(),
            bay_type: asset.bay_type_lower(),
            substation_id: event.substation_id.as_str(),
        };

        let mut seen_users: HashSet<UserId> = HashSet::new();
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut tokens = Vec::new();
        for user in candidates {
            if !seen_users.insert(user.id.clone()) {
                continue;
            }
            let prefs = self.preferences_for(&user.id).await;
            if !eligibility::is_eligible(&prefs, &context) {
                continue;
            }
            let Some(token) = self.cache.token(&user.id) else {
                debug!(user = %user.id, "Eligible user has no active device token");
                continue;
            };
            if seen_tokens.insert(token.clone()) {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    /// Query candidate users at each resolved hierarchy level plus the
    /// global admin role, concurrently, preserving level-ascending order.
    async fn candidates(
        &self,
        chain: &gridalert_core::types::hierarchy::ResolvedHierarchy,
    ) -> AppResult<Vec<User>> {
        let mut queries: Vec<BoxFuture<'_, AppResult<Vec<User>>>> = Vec::new();
        for (role, level) in UserRole::MANAGERS {
            if let Some(level_id) = chain.level_id(level) {
                let users = Arc::clone(&self.users);
                let level_id = level_id.to_string();
                queries.push(Box::pin(async move {
                    users.users_by_role_and_level(role, level, &level_id).await
                }));
            }
        }
        {
            let users = Arc::clone(&self.users);
            queries.push(Box::pin(
                async move { users.users_by_role(UserRole::Admin).await },
            ));
        }

        let per_level = try_join_all(queries).await?;
        Ok(per_level.into_iter().flatten().collect())
    }

    /// Fetch preferences from the cache, persisting the materialized
    /// default exactly once per first-seen user.
    async fn preferences_for(
        &self,
        user_id: &UserId,
    ) -> gridalert_core::types::preference::NotificationPreferences {
        let (prefs, created) = self.cache.get_or_create(user_id);
        if created {
            if let Err(e) = self.preference_store.set_preferences(user_id, &prefs).await {
                // The cache keeps serving the default; the row is written on
                // the next cold start instead.
                warn!(user = %user_id, error = %e, "Failed to persist default preferences");
            }
        }
        prefs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use gridalert_cache::SystemClock;
    use gridalert_core::config::preferences::DefaultPreferencesConfig;
    use gridalert_core::traits::repository::{OrgRepository, TokenStore};
    use gridalert_core::types::event::{EventCategory, EventStatus};
    use gridalert_core::types::hierarchy::{Circle, Division, Subdivision, Substation};
    use gridalert_core::types::id::{
        AssetId, CircleId, DivisionId, EventId, SubdivisionId, SubstationId, ZoneId,
    };
    use gridalert_core::types::preference::NotificationPreferences;
    use gridalert_core::types::role::HierarchyLevel;
    use gridalert_core::types::token::DeviceToken;
    use gridalert_core::types::user::AssignedLevels;

    use super::*;

    #[derive(Default)]
    struct FakeOrgRepository {
        substations: HashMap<String, Substation>,
        subdivisions: HashMap<String, Subdivision>,
        divisions: HashMap<String, Division>,
        circles: HashMap<String, Circle>,
    }

    #[async_trait]
    impl OrgRepository for FakeOrgRepository {
        async fn get_substation(&self, id: &SubstationId) -> AppResult<Option<Substation>> {
            Ok(self.substations.get(id.as_str()).cloned())
        }

        async fn get_subdivision(&self, id: &SubdivisionId) -> AppResult<Option<Subdivision>> {
            Ok(self.subdivisions.get(id.as_str()).cloned())
        }

        async fn get_division(&self, id: &DivisionId) -> AppResult<Option<Division>> {
            Ok(self.divisions.get(id.as_str()).cloned())
        }

        async fn get_circle(&self, id: &CircleId) -> AppResult<Option<Circle>> {
            Ok(self.circles.get(id.as_str()).cloned())
        }
    }

    #[derive(Default)]
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

    #[derive(Default)]
    struct FakePreferenceStore {
        records: Mutex<HashMap<String, NotificationPreferences>>,
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PreferenceStore for FakePreferenceStore {
        async fn get_preferences(
            &self,
            user_id: &UserId,
        ) -> AppResult<Option<NotificationPreferences>> {
            Ok(self.records.lock().unwrap().get(user_id.as_str()).cloned())
        }

        async fn set_preferences(
            &self,
            user_id: &UserId,
            preferences: &NotificationPreferences,
        ) -> AppResult<()> {
            self.writes.lock().unwrap().push(user_id.to_string());
            self.records
                .lock()
                .unwrap()
                .insert(user_id.to_string(), preferences.clone());
            Ok(())
        }

        async fn all_preferences(&self) -> AppResult<Vec<(UserId, NotificationPreferences)>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .map(|(id, p)| (UserId::new(id.clone()), p.clone()))
                .collect())
        }
    }

    #[derive(Default)]
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

    fn full_registry() -> FakeOrgRepository {
        let mut org = FakeOrgRepository::default();
        org.substations.insert(
            "S1".into(),
            Substation {
                id: SubstationId::new("S1"),
                name: "Meerut".into(),
                subdivision_id: Some(SubdivisionId::new("SD1")),
            },
        );
        org.subdivisions.insert(
            "SD1".into(),
            Subdivision {
                id: SubdivisionId::new("SD1"),
                division_id: Some(DivisionId::new("D1")),
            },
        );
        org.divisions.insert(
            "D1".into(),
            Division {
                id: DivisionId::new("D1"),
                circle_id: Some(CircleId::new("C1")),
            },
        );
        org.circles.insert(
            "C1".into(),
            Circle {
                id: CircleId::new("C1"),
                zone_id: Some(ZoneId::new("Z1")),
            },
        );
        org
    }

    fn manager(id: &str, role: UserRole, assigned: AssignedLevels) -> User {
        User {
            id: UserId::new(id),
            role,
            assigned_levels: assigned,
        }
    }

    fn subdivision_assignment(id: &str) -> AssignedLevels {
        AssignedLevels {
            subdivision_id: Some(SubdivisionId::new(id)),
            ..Default::default()
        }
    }

    fn event() -> GridEvent {
        GridEvent {
            id: EventId::new("E1"),
            event_type: EventCategory::Tripping,
            status: EventStatus::Open,
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

    fn asset() -> Asset {
        Asset {
            id: AssetId::new("B1"),
            name: "Feeder 3".into(),
            bay_type: "Line".into(),
            voltage_level: "220kV".into(),
        }
    }

    struct Fixture {
        resolver: RecipientResolver,
        preference_store: Arc<FakePreferenceStore>,
    }

    fn fixture(
        org: FakeOrgRepository,
        users: Vec<User>,
        tokens: Vec<(&str, &str)>,
    ) -> Fixture {
        let preference_store = Arc::new(FakePreferenceStore::default());
        let token_store = Arc::new(FakeTokenStore {
            tokens: tokens
                .into_iter()
                .map(|(user, token)| DeviceToken {
                    user_id: UserId::new(user),
                    token: token.to_string(),
                    active: true,
                    deactivated_at: None,
                })
                .collect(),
        });
        let cache = Arc::new(PreferenceCache::new(
            Arc::clone(&preference_store) as Arc<dyn PreferenceStore>,
            token_store,
            DefaultPreferencesConfig::default().to_preferences(),
            Duration::from_secs(300),
            Arc::new(SystemClock),
        ));
        let resolver = RecipientResolver::new(
            OrgHierarchyResolver::new(Arc::new(org)),
            Arc::new(FakeUserRepository { users }),
            Arc::clone(&preference_store) as Arc<dyn PreferenceStore>,
            cache,
        );
        Fixture {
            resolver,
            preference_store,
        }
    }

    #[tokio::test]
    async fn orders_by_level_then_admin_and_dedups_overlap() {
        let admin_and_manager_token = "tok-mixed";
        let fx = fixture(
            full_registry(),
            vec![
                manager("admin1", UserRole::Admin, AssignedLevels::default()),
                // Also a subdivision manager for the resolved subdivision.
                manager(
                    "admin1",
                    UserRole::SubdivisionManager,
                    subdivision_assignment("SD1"),
                ),
                manager(
                    "sub1",
                    UserRole::SubdivisionManager,
                    subdivision_assignment("SD1"),
                ),
                manager(
                    "div1",
                    UserRole::DivisionManager,
                    AssignedLevels {
                        division_id: Some(DivisionId::new("D1")),
                        ..Default::default()
                    },
                ),
            ],
            vec![
                ("admin1", admin_and_manager_token),
                ("sub1", "tok-sub"),
                ("div1", "tok-div"),
            ],
        );

        let tokens = fx.resolver.resolve(&event(), &asset()).await.unwrap();
        // admin1 is first seen as subdivision manager; the token appears
        // exactly once, at that position.
        assert_eq!(tokens, vec![admin_and_manager_token, "tok-sub", "tok-div"]);
    }

    #[tokio::test]
    async fn truncated_hierarchy_excludes_upper_level_managers() {
        let mut org = full_registry();
        org.subdivisions.get_mut("SD1").unwrap().division_id = None;
        let fx = fixture(
            org,
            vec![
                manager(
                    "sub1",
                    UserRole::SubdivisionManager,
                    subdivision_assignment("SD1"),
                ),
                // Division manager of an unrelated division must not appear.
                manager(
                    "div1",
                    UserRole::DivisionManager,
                    AssignedLevels {
                        division_id: Some(DivisionId::new("D1")),
                        ..Default::default()
                    },
                ),
                manager(
                    "zone1",
                    UserRole::ZoneManager,
                    AssignedLevels {
                        zone_id: Some(ZoneId::new("Z1")),
                        ..Default::default()
                    },
                ),
            ],
            vec![
                ("sub1", "tok-sub"),
                ("div1", "tok-div"),
                ("zone1", "tok-zone"),
            ],
        );

        let tokens = fx.resolver.resolve(&event(), &asset()).await.unwrap();
        assert_eq!(tokens, vec!["tok-sub"]);
    }

    #[tokio::test]
    async fn unresolvable_hierarchy_yields_empty_list() {
        let fx = fixture(
            FakeOrgRepository::default(),
            vec![manager("admin1", UserRole::Admin, AssignedLevels::default())],
            vec![("admin1", "tok-admin")],
        );
        let tokens = fx.resolver.resolve(&event(), &asset()).await.unwrap();
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn default_preferences_persisted_exactly_once() {
        let fx = fixture(
            full_registry(),
            vec![manager(
                "sub1",
                UserRole::SubdivisionManager,
                subdivision_assignment("SD1"),
            )],
            vec![("sub1", "tok-sub")],
        );

        fx.resolver.resolve(&event(), &asset()).await.unwrap();
        fx.resolver.resolve(&event(), &asset()).await.unwrap();

        let writes = fx.preference_store.writes.lock().unwrap().clone();
        assert_eq!(writes, vec!["sub1"]);
    }

    #[tokio::test]
    async fn ineligible_preferences_exclude_user() {
        let fx = fixture(
            full_registry(),
            vec![manager(
                "sub1",
                UserRole::SubdivisionManager,
                subdivision_assignment("SD1"),
            )],
            vec![("sub1", "tok-sub")],
        );
        // Persisted preferences subscribe to transformers only.
        let mut prefs = DefaultPreferencesConfig::default().to_preferences();
        prefs.subscribed_bay_types = vec!["Transformer".into()];
        fx.preference_store
            .records
            .lock()
            .unwrap()
            .insert("sub1".into(), prefs);

        let tokens = fx.resolver.resolve(&event(), &asset()).await.unwrap();
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn users_without_tokens_are_skipped() {
        let fx = fixture(
            full_registry(),
            vec![
                manager(
                    "sub1",
                    UserRole::SubdivisionManager,
                    subdivision_assignment("SD1"),
                ),
                manager(
                    "sub2",
                    UserRole::SubdivisionManager,
                    subdivision_assignment("SD1"),
                ),
            ],
            vec![("sub2", "tok-sub2")],
        );
        let tokens = fx.resolver.resolve(&event(), &asset()).await.unwrap();
        assert_eq!(tokens, vec!["tok-sub2"]);
    }
}
