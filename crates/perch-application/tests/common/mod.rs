#![allow(dead_code)]

use async_trait::async_trait;
use perch_core::error::{PerchError, Result};
use perch_core::preference::{ParameterMap, PreferenceRecord, PreferenceTransport, Vec2};
use perch_core::surface::{
    LoadOptions, PlacementOutcome, RenderSurface, SurfaceProvider, WindowPlacement,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory transport recording every save.
#[derive(Default)]
pub struct MemoryTransport {
    pub records: Mutex<Vec<PreferenceRecord>>,
    pub saves: Mutex<Vec<PreferenceRecord>>,
    pub offline: AtomicBool,
}

impl MemoryTransport {
    pub fn with_records(records: Vec<PreferenceRecord>) -> Arc<Self> {
        let transport = Self::default();
        *transport.records.lock().unwrap() = records;
        Arc::new(transport)
    }

    pub fn saves(&self) -> Vec<PreferenceRecord> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreferenceTransport for MemoryTransport {
    async fn fetch_all(&self) -> Result<Vec<PreferenceRecord>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PerchError::transport("connection refused"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn store(&self, record: &PreferenceRecord) -> Result<bool> {
        self.saves.lock().unwrap().push(record.clone());
        Ok(true)
    }
}

/// What a mock surface has been told to do.
#[derive(Debug, Default, Clone)]
pub struct SurfaceLog {
    pub identity: String,
    pub anchor: Option<Vec2>,
    pub position: Vec2,
    pub scale: Vec2,
    pub parameter_writes: Vec<ParameterMap>,
    pub known_poses: HashSet<String>,
    pub active_poses: HashSet<String>,
    pub pose_plays: Vec<String>,
}

pub struct MockSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RenderSurface for MockSurface {
    fn set_anchor(&mut self, anchor: Vec2) {
        self.log.lock().unwrap().anchor = Some(anchor);
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.log.lock().unwrap().scale = scale;
    }

    fn set_position(&mut self, position: Vec2) {
        self.log.lock().unwrap().position = position;
    }

    fn position(&self) -> Vec2 {
        self.log.lock().unwrap().position
    }

    fn scale(&self) -> Vec2 {
        self.log.lock().unwrap().scale
    }

    fn apply_parameters(&mut self, parameters: &ParameterMap) {
        self.log
            .lock()
            .unwrap()
            .parameter_writes
            .push(parameters.clone());
    }

    fn play_named_pose(&mut self, name: &str) -> bool {
        let mut log = self.log.lock().unwrap();
        if !log.known_poses.contains(name) {
            return false;
        }
        log.active_poses.insert(name.to_string());
        log.pose_plays.push(name.to_string());
        true
    }

    fn clear_pose(&mut self, name: &str) {
        self.log.lock().unwrap().active_poses.remove(name);
    }

    fn is_pose_active(&self, name: &str) -> bool {
        self.log.lock().unwrap().active_poses.contains(name)
    }
}

/// Hands out mock surfaces and keeps a log handle for each.
#[derive(Default)]
pub struct MockProvider {
    pub fail: AtomicBool,
    pub poses: Vec<String>,
    /// Simulated asset loading time per identity.
    pub delays: HashMap<String, Duration>,
    pub surfaces: Mutex<Vec<Arc<Mutex<SurfaceLog>>>>,
}

impl MockProvider {
    pub fn with_poses(poses: &[&str]) -> Self {
        Self {
            poses: poses.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Log of the most recently acquired surface.
    pub fn last(&self) -> SurfaceLog {
        self.surfaces
            .lock()
            .unwrap()
            .last()
            .expect("no surface acquired")
            .lock()
            .unwrap()
            .clone()
    }

    pub fn log(&self, index: usize) -> Arc<Mutex<SurfaceLog>> {
        self.surfaces.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl SurfaceProvider for MockProvider {
    async fn acquire(
        &self,
        identity: &str,
        _options: &LoadOptions,
    ) -> Result<Box<dyn RenderSurface>> {
        if let Some(delay) = self.delays.get(identity) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PerchError::internal("model asset missing"));
        }
        let log = Arc::new(Mutex::new(SurfaceLog {
            identity: identity.to_string(),
            scale: Vec2::splat(1.0),
            known_poses: self.poses.iter().cloned().collect(),
            ..Default::default()
        }));
        self.surfaces.lock().unwrap().push(log.clone());
        Ok(Box::new(MockSurface { log }))
    }
}

/// Window placement returning a fixed outcome and recording targets.
pub struct MockPlacement {
    pub outcome: Result<PlacementOutcome>,
    pub targets: Mutex<Vec<(f64, f64)>>,
}

impl MockPlacement {
    pub fn new(outcome: Result<PlacementOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            targets: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl WindowPlacement for MockPlacement {
    async fn move_window_to_display(&self, screen_x: f64, screen_y: f64) -> Result<PlacementOutcome> {
        self.targets.lock().unwrap().push((screen_x, screen_y));
        self.outcome.clone()
    }
}
