//! Application state: in-memory stores, scoring/points policy, and selection
//! logic.
//!
//! This module owns:
//!   - the assessment store (config bank entries plus built-in seeds)
//!   - the user store (guest or registered, mutually exclusive kinds)
//!   - result records per user (supersede-then-insert under one write lock)
//!   - the append-only points ledger per user, with dedupe rules per action
//!   - content pages for the reading endpoints
//!
//! All stores live behind `Arc<RwLock<...>>` on a single `AppState` built
//! once at startup; there are no mutable globals.

use std::{collections::HashMap, sync::Arc};
use chrono::Utc;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_app_config_from_env, PointsCfg};
use crate::domain::{
    Assessment, BankSource, ContentPage, PointsAction, PointsEntry, Question, QuestionOption,
    ResultRecord, User, UserKind,
};
use crate::scoring::ScoringConfig;
use crate::seeds::{seed_assessment, seed_content, SEED_ASSESSMENT_ID};

#[derive(Clone)]
pub struct AppState {
    pub assessments: Arc<RwLock<HashMap<String, Assessment>>>,
    pub users: Arc<RwLock<HashMap<String, User>>>,
    /// Result history per user id; at most one record per assessment is active.
    pub results: Arc<RwLock<HashMap<String, Vec<ResultRecord>>>>,
    /// Append-only points ledger per user id.
    pub ledgers: Arc<RwLock<HashMap<String, Vec<PointsEntry>>>>,
    pub content: Arc<RwLock<HashMap<String, ContentPage>>>,
    pub scoring: ScoringConfig,
    pub points: PointsCfg,
}

impl AppState {
    /// Build state from env: load config, seed assessments/content, build
    /// indices, capture scoring and points policy.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_app_config_from_env();
        let scoring = cfg_opt
            .as_ref()
            .map(|c| ScoringConfig { closeness_threshold: c.scoring.closeness_threshold })
            .unwrap_or_default();
        let points = cfg_opt.as_ref().map(|c| c.points.clone()).unwrap_or_default();

        let mut assessment_map = HashMap::<String, Assessment>::new();
        let mut content_map = HashMap::<String, ContentPage>::new();

        // Insert config-based assessments (if any), validating each question
        // up front rather than at persistence time.
        if let Some(cfg) = &cfg_opt {
            for ac in &cfg.assessments {
                let id = ac.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                let mut questions = Vec::with_capacity(ac.questions.len());
                for (idx, qc) in ac.questions.iter().enumerate() {
                    if qc.prompt.trim().is_empty() {
                        error!(target: "assessment", %id, idx, "Skipping bank question: empty prompt.");
                        continue;
                    }
                    let letters = qc.dimension.letters();
                    let names = qc.dimension.trait_names();
                    questions.push(Question {
                        id: qc.id.clone().unwrap_or_else(|| format!("{}-q{}", id, idx + 1)),
                        dimension: qc.dimension,
                        prompt: qc.prompt.clone(),
                        options: vec![
                            QuestionOption {
                                letter: letters[0],
                                label: qc.first_label.clone().unwrap_or_else(|| names[0].into()),
                            },
                            QuestionOption {
                                letter: letters[1],
                                label: qc.second_label.clone().unwrap_or_else(|| names[1].into()),
                            },
                        ],
                    });
                }
                if questions.is_empty() {
                    error!(target: "assessment", %id, "Skipping bank assessment: no usable questions.");
                    continue;
                }
                assessment_map.insert(id.clone(), Assessment {
                    id,
                    title: ac.title.clone(),
                    source: BankSource::LocalBank,
                    questions,
                });
            }

            for cc in &cfg.content {
                let id = cc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                content_map.insert(id.clone(), ContentPage {
                    id,
                    title: cc.title.clone(),
                    body: cc.body.clone(),
                    source: BankSource::LocalBank,
                    type_code: cc.type_code.clone(),
                });
            }
        }

        // Always insert built-in seeds, but don't overwrite existing ids.
        let seed = seed_assessment();
        assessment_map.entry(seed.id.clone()).or_insert(seed);
        for page in seed_content() {
            content_map.entry(page.id.clone()).or_insert(page);
        }

        // Inventory summary by source.
        let (bank, seeded) = assessment_map.values().fold((0usize, 0usize), |(b, s), a| {
            match a.source {
                BankSource::LocalBank => (b + 1, s),
                BankSource::Seed => (b, s + 1),
            }
        });
        info!(target: "assessment", local_bank = bank, seed = seeded, pages = content_map.len(),
              closeness_threshold = scoring.closeness_threshold, "Startup inventory");

        Self {
            assessments: Arc::new(RwLock::new(assessment_map)),
            users: Arc::new(RwLock::new(HashMap::new())),
            results: Arc::new(RwLock::new(HashMap::new())),
            ledgers: Arc::new(RwLock::new(HashMap::new())),
            content: Arc::new(RwLock::new(content_map)),
            scoring,
            points,
        }
    }

    /// Read-only access to an assessment by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_assessment(&self, id: &str) -> Option<Assessment> {
        self.assessments.read().await.get(id).cloned()
    }

    /// Selection policy: the requested assessment if given (None when the id
    /// is unknown), otherwise the built-in default, re-inserted if it has
    /// somehow gone missing.
    #[instrument(level = "info", skip(self))]
    pub async fn choose_assessment(
        &self,
        requested: Option<&str>,
    ) -> Option<(Assessment, &'static str)> {
        if let Some(id) = requested {
            return self.get_assessment(id).await.map(|a| (a, "requested"));
        }
        if let Some(a) = self.get_assessment(SEED_ASSESSMENT_ID).await {
            return Some((a, "default_seed"));
        }
        let seed = seed_assessment();
        self.assessments.write().await.insert(seed.id.clone(), seed.clone());
        warn!(target: "assessment", id = %seed.id, "Re-inserted missing seed assessment");
        Some((seed, "hard_fallback"))
    }

    /// Create and store a guest user with a throwaway display name.
    #[instrument(level = "info", skip(self))]
    pub async fn create_guest(&self) -> User {
        let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
        let user = User {
            id: Uuid::new_v4().to_string(),
            kind: UserKind::Guest,
            name: format!("guest-{suffix}"),
            created_at: Utc::now(),
        };
        self.users.write().await.insert(user.id.clone(), user.clone());
        info!(target: "persona_backend", id = %user.id, "Guest user created");
        user
    }

    /// Create and store a registered user.
    #[instrument(level = "info", skip(self, name))]
    pub async fn create_registered(&self, name: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            kind: UserKind::Registered,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.users.write().await.insert(user.id.clone(), user.clone());
        info!(target: "persona_backend", id = %user.id, "User registered");
        user
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_user(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    /// Persist a result record. Prior active results of the same user and
    /// assessment are marked inactive first; both steps happen under one
    /// write lock so readers never observe two active records.
    #[instrument(level = "info", skip(self, record), fields(user = %record.user_id, id = %record.id))]
    pub async fn record_result(&self, record: ResultRecord) {
        let mut results = self.results.write().await;
        let history = results.entry(record.user_id.clone()).or_default();
        for prior in history.iter_mut() {
            if prior.active && prior.assessment_id == record.assessment_id {
                prior.active = false;
            }
        }
        history.push(record);
    }

    /// The most recent active result for a user, if any.
    #[instrument(level = "debug", skip(self), fields(%user_id))]
    pub async fn latest_active_result(&self, user_id: &str) -> Option<ResultRecord> {
        self.results
            .read()
            .await
            .get(user_id)
            .and_then(|h| h.iter().rev().find(|r| r.active).cloned())
    }

    /// Append a points entry unless the action's dedupe rule suppresses it:
    /// registration once ever, daily login once per UTC day, content read
    /// once per page, test completion always.
    #[instrument(level = "info", skip(self), fields(%user_id, ?action, points))]
    pub async fn award_points(
        &self,
        user_id: &str,
        action: PointsAction,
        points: u32,
        reference: Option<String>,
    ) -> Option<PointsEntry> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers.entry(user_id.to_string()).or_default();

        let duplicate = ledger.iter().any(|e| match action {
            PointsAction::Registration => e.action == PointsAction::Registration,
            PointsAction::DailyLogin => e.action == PointsAction::DailyLogin && e.day == today,
            PointsAction::ContentRead => {
                e.action == PointsAction::ContentRead && e.reference == reference
            }
            PointsAction::TestCompletion => false,
        });
        if duplicate {
            info!(target: "persona_backend", %user_id, ?action, "Points suppressed by dedupe rule");
            return None;
        }

        let entry = PointsEntry { action, points, day: today, reference, awarded_at: now };
        ledger.push(entry.clone());
        Some(entry)
    }

    /// Balance plus full ledger for a user (empty for unknown users).
    #[instrument(level = "debug", skip(self), fields(%user_id))]
    pub async fn points_summary(&self, user_id: &str) -> (u32, Vec<PointsEntry>) {
        let ledgers = self.ledgers.read().await;
        match ledgers.get(user_id) {
            Some(ledger) => (ledger.iter().map(|e| e.points).sum(), ledger.clone()),
            None => (0, Vec::new()),
        }
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_content(&self, id: &str) -> Option<ContentPage> {
        self.content.read().await.get(id).cloned()
    }

    /// All content pages, ordered by id for stable listings.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_content(&self) -> Vec<ContentPage> {
        let mut pages: Vec<ContentPage> = self.content.read().await.values().cloned().collect();
        pages.sort_by(|a, b| a.id.cmp(&b.id));
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TraitScores;

    fn record(user_id: &str, assessment_id: &str, primary: &str) -> ResultRecord {
        ResultRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            assessment_id: assessment_id.into(),
            scores: TraitScores::default(),
            primary_type: primary.into(),
            alternative_types: vec![],
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn new_result_supersedes_prior_active_one() {
        let state = AppState::new();
        let user = state.create_guest().await;

        state.record_result(record(&user.id, "a100", "INTJ")).await;
        state.record_result(record(&user.id, "a100", "ENFP")).await;

        let latest = state.latest_active_result(&user.id).await.expect("result");
        assert_eq!(latest.primary_type, "ENFP");

        let results = state.results.read().await;
        let history = results.get(&user.id).expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|r| r.active).count(), 1);
    }

    #[tokio::test]
    async fn results_supersede_per_assessment_not_globally() {
        let state = AppState::new();
        let user = state.create_guest().await;

        state.record_result(record(&user.id, "a100", "INTJ")).await;
        state.record_result(record(&user.id, "a200", "ISTP")).await;

        let results = state.results.read().await;
        let history = results.get(&user.id).expect("history");
        assert_eq!(history.iter().filter(|r| r.active).count(), 2);
    }

    #[tokio::test]
    async fn daily_login_points_once_per_day() {
        let state = AppState::new();
        let user = state.create_guest().await;

        let first = state.award_points(&user.id, PointsAction::DailyLogin, 5, None).await;
        assert!(first.is_some());
        let second = state.award_points(&user.id, PointsAction::DailyLogin, 5, None).await;
        assert!(second.is_none());

        let (total, entries) = state.points_summary(&user.id).await;
        assert_eq!(total, 5);
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn content_read_points_once_per_page() {
        let state = AppState::new();
        let user = state.create_guest().await;

        assert!(state
            .award_points(&user.id, PointsAction::ContentRead, 10, Some("p101".into()))
            .await
            .is_some());
        assert!(state
            .award_points(&user.id, PointsAction::ContentRead, 10, Some("p101".into()))
            .await
            .is_none());
        assert!(state
            .award_points(&user.id, PointsAction::ContentRead, 10, Some("p102".into()))
            .await
            .is_some());

        let (total, _) = state.points_summary(&user.id).await;
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn registration_points_only_once() {
        let state = AppState::new();
        let user = state.create_registered("ada").await;

        assert!(state
            .award_points(&user.id, PointsAction::Registration, 50, None)
            .await
            .is_some());
        assert!(state
            .award_points(&user.id, PointsAction::Registration, 50, None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_completion_points_repeat() {
        let state = AppState::new();
        let user = state.create_guest().await;

        assert!(state
            .award_points(&user.id, PointsAction::TestCompletion, 25, None)
            .await
            .is_some());
        assert!(state
            .award_points(&user.id, PointsAction::TestCompletion, 25, None)
            .await
            .is_some());

        let (total, _) = state.points_summary(&user.id).await;
        assert_eq!(total, 50);
    }

    #[tokio::test]
    async fn seed_assessment_is_the_default_choice() {
        let state = AppState::new();
        let (a, origin) = state.choose_assessment(None).await.expect("assessment");
        assert_eq!(a.id, SEED_ASSESSMENT_ID);
        assert_eq!(origin, "default_seed");
        let counts = a.dimension_counts();
        assert_eq!((counts.ei, counts.sn, counts.tf, counts.jp), (5, 5, 5, 5));
    }

    #[tokio::test]
    async fn unknown_assessment_request_is_none() {
        let state = AppState::new();
        assert!(state.choose_assessment(Some("nope")).await.is_none());
    }
}
