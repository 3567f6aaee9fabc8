//! Scripted in-memory service for controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::api::{PredictRequest, PredictionService, UpdateAck};
use crate::error::{PredictorError, Result};
use crate::models::{FreshnessRecord, Match, Outcome, PredictionResult, Standing, TeamStats};

struct Scripted<T> {
    reply: Result<T>,
    hold: Option<Arc<Notify>>,
}

/// Replies are handed out in the order they were pushed. A held reply waits
/// until its gate is released with `notify_one`.
#[derive(Default)]
pub(crate) struct FakeService {
    matches: Mutex<Option<Result<Vec<Match>>>>,
    standings: Mutex<Option<Result<Vec<Standing>>>>,
    predictions: Mutex<VecDeque<Scripted<PredictionResult>>>,
    updates: Mutex<VecDeque<Scripted<UpdateAck>>>,
    freshness: Mutex<VecDeque<Scripted<FreshnessRecord>>>,
    requests: Mutex<Vec<PredictRequest>>,
    predict_calls: AtomicUsize,
    update_calls: AtomicUsize,
    freshness_calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_matches(&self, reply: Result<Vec<Match>>) {
        *self.matches.lock().unwrap() = Some(reply);
    }

    pub fn set_standings(&self, reply: Result<Vec<Standing>>) {
        *self.standings.lock().unwrap() = Some(reply);
    }

    pub fn push_prediction(&self, reply: Result<PredictionResult>) {
        push(&self.predictions, reply, None);
    }

    pub fn push_prediction_held(&self, reply: Result<PredictionResult>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        push(&self.predictions, reply, Some(Arc::clone(&gate)));
        gate
    }

    pub fn push_update(&self, reply: Result<UpdateAck>) {
        push(&self.updates, reply, None);
    }

    pub fn push_update_held(&self, reply: Result<UpdateAck>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        push(&self.updates, reply, Some(Arc::clone(&gate)));
        gate
    }

    pub fn push_freshness(&self, reply: Result<FreshnessRecord>) {
        push(&self.freshness, reply, None);
    }

    pub fn push_freshness_held(&self, reply: Result<FreshnessRecord>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        push(&self.freshness, reply, Some(Arc::clone(&gate)));
        gate
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn freshness_calls(&self) -> usize {
        self.freshness_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PredictRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn push<T>(queue: &Mutex<VecDeque<Scripted<T>>>, reply: Result<T>, hold: Option<Arc<Notify>>) {
    queue.lock().unwrap().push_back(Scripted { reply, hold });
}

async fn next<T>(queue: &Mutex<VecDeque<Scripted<T>>>, endpoint: &str) -> Result<T> {
    let scripted = queue.lock().unwrap().pop_front();

    match scripted {
        Some(Scripted { reply, hold }) => {
            if let Some(gate) = hold {
                gate.notified().await;
            }
            reply
        }
        None => Err(PredictorError::Network(format!("no scripted reply for {}", endpoint))),
    }
}

#[async_trait]
impl PredictionService for FakeService {
    async fn upcoming_matches(&self) -> Result<Vec<Match>> {
        self.matches.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn standings(&self) -> Result<Vec<Standing>> {
        self.standings.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        next(&self.predictions, "/predict").await
    }

    async fn update_data(&self) -> Result<UpdateAck> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.updates, "/update-data").await
    }

    async fn last_updated(&self) -> Result<FreshnessRecord> {
        self.freshness_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.freshness, "/last-updated").await
    }
}

pub(crate) fn sample_match(home: &str, away: &str) -> Match {
    Match {
        home_team: home.to_string(),
        away_team: away.to_string(),
        date: Utc.with_ymd_and_hms(2025, 1, 18, 15, 0, 0).unwrap(),
        matchday: 22,
    }
}

pub(crate) fn sample_result(winner: Outcome, confidence: f64) -> PredictionResult {
    let stats = TeamStats {
        elo: 1600.0,
        goals_scored_avg: 1.5,
        goals_conceded_avg: 1.1,
        wins: 5,
        points_earned: 17,
    };
    PredictionResult::new(winner, confidence, stats, stats)
}

/// Let spawned tasks on the current-thread runtime run until they block
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
