use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::analysis::TierTable;
use crate::api::PredictionService;
use crate::controllers::{FreshnessMonitor, PredictionController, PredictionLab, Trigger, UpdatePipeline};
use crate::error::Result;
use crate::matching::{LogoResolver, Roster};
use crate::models::Standing;

pub const TABLE_FAILED_MESSAGE: &str = "Something went wrong...";

/// League table as loaded at mount
#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Loaded(Vec<Standing>),
    Failed(String),
}

/// Injected pieces the dashboard hands to its controllers
pub struct DashboardSettings {
    pub request_timeout: Duration,
    pub tiers: TierTable,
    pub logos: LogoResolver,
    pub roster: Roster,
}

/// Everything shown on the page: match cards, league table, lab and the
/// update/freshness pane. Each part owns its own controller.
pub struct Dashboard {
    matches: Vec<Arc<PredictionController>>,
    table: TableState,
    lab: Arc<PredictionLab>,
    updater: Arc<UpdatePipeline>,
    logos: LogoResolver,
    tiers: TierTable,
}

impl Dashboard {
    /// Load matches, standings and freshness concurrently and build one
    /// controller per listed match, in server order
    pub async fn mount(service: Arc<dyn PredictionService>, settings: DashboardSettings) -> Result<Self> {
        let timeout = settings.request_timeout;
        let freshness = Arc::new(FreshnessMonitor::new(Arc::clone(&service), timeout));

        let (matches, standings, _) = tokio::join!(
            bounded(timeout, service.upcoming_matches()),
            bounded(timeout, service.standings()),
            freshness.refresh(),
        );

        let matches = match matches {
            Ok(matches) => matches,
            Err(e) => {
                error!("Error fetching upcoming matches: {}", e);
                Vec::new()
            }
        };

        let table = match standings {
            Ok(standings) => TableState::Loaded(standings),
            Err(e) => {
                error!("Error preparing the standings: {}", e);
                TableState::Failed(TABLE_FAILED_MESSAGE.to_string())
            }
        };

        info!("Dashboard mounted with {} matches", matches.len());

        let controllers: Vec<_> = matches
            .into_iter()
            .map(|fixture| Arc::new(PredictionController::new(fixture, Arc::clone(&service), timeout)))
            .collect();

        let lab = PredictionLab::new(settings.roster, Arc::clone(&service), timeout)?;
        let updater = UpdatePipeline::new(service, freshness, timeout);

        Ok(Self {
            matches: controllers,
            table,
            lab: Arc::new(lab),
            updater: Arc::new(updater),
            logos: settings.logos,
            tiers: settings.tiers,
        })
    }

    pub fn matches(&self) -> &[Arc<PredictionController>] {
        &self.matches
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn lab(&self) -> &Arc<PredictionLab> {
        &self.lab
    }

    pub fn updater(&self) -> &Arc<UpdatePipeline> {
        &self.updater
    }

    pub fn freshness(&self) -> &Arc<FreshnessMonitor> {
        self.updater.freshness()
    }

    pub fn logos(&self) -> &LogoResolver {
        &self.logos
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Press "Predict" on every card at once. Returns how many requests went out.
    pub async fn predict_all(&self) -> usize {
        let mut tasks = JoinSet::new();
        for controller in &self.matches {
            let controller = Arc::clone(controller);
            tasks.spawn(async move { controller.predict().await });
        }

        let mut issued = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Trigger::Issued) => issued += 1,
                Ok(Trigger::Ignored) => {}
                Err(e) => error!("Prediction task panicked: {}", e),
            }
        }
        issued
    }

    /// Tear down every controller. Late replies are discarded.
    pub fn dispose(&self) {
        for controller in &self.matches {
            controller.dispose();
        }
        self.lab.dispose();
        self.updater.dispose();
    }
}

async fn bounded<T, F>(timeout: Duration, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result,
        Err(elapsed) => Err(elapsed.into()),
    }
}
