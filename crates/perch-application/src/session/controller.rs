//! The current-model session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use perch_core::config::PerchConfig;
use perch_core::error::{PerchError, Result};
use perch_core::preference::{
    DisplayAnchor, ParameterMap, PreferenceRecord, PreferenceStore, Vec2, resolve_with_strategy,
    validate_geometry,
};
use perch_core::surface::{
    LoadOptions, PlacementOutcome, RenderSurface, SurfaceProvider, WindowPlacement,
};
use perch_core::viewport::{Viewport, default_layout};

use super::debounce::SaveDebouncer;
use super::generation::Generation;
use super::state::SessionState;
use crate::ui_sync::UiStateSynchronizer;

type SharedSurface = Arc<Mutex<Box<dyn RenderSurface>>>;
type SharedParameters = Arc<Mutex<Option<ParameterMap>>>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything owned by one loaded model. Dropping it cancels its timers and
/// any save that has not fired yet.
struct ActiveSession {
    state: SessionState,
    surface: SharedSurface,
    parameters: SharedParameters,
    display: Option<DisplayAnchor>,
    saves: SaveDebouncer,
    generation: Generation,
}

impl ActiveSession {
    /// Full snapshot of the live state, keyed on the session's save key.
    fn snapshot(&self) -> PreferenceRecord {
        let (position, scale) = {
            let surface = lock(&self.surface);
            (surface.position(), surface.scale())
        };
        let mut record = PreferenceRecord::new(self.state.last_applied_path.clone(), position, scale);
        if let Some(parameters) = lock(&self.parameters).clone() {
            record = record.with_parameters(parameters);
        }
        if let Some(display) = self.display {
            record = record.with_display(display);
        }
        record
    }

    fn schedule_save(&self) {
        self.saves.schedule(self.snapshot());
    }
}

/// Owns the single current-model session.
///
/// `load_model` resolves and applies saved preferences for a model; the
/// mutation methods apply a change to the live surface and persist the full
/// snapshot after a quiet period. Loading another model replaces the session
/// and stops everything the previous one scheduled.
pub struct SessionController {
    store: PreferenceStore,
    surfaces: Arc<dyn SurfaceProvider>,
    placement: Option<Arc<dyn WindowPlacement>>,
    overlays: Option<Arc<UiStateSynchronizer>>,
    config: PerchConfig,
    latest: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
}

impl SessionController {
    pub fn new(
        store: PreferenceStore,
        surfaces: Arc<dyn SurfaceProvider>,
        config: PerchConfig,
    ) -> Self {
        Self {
            store,
            surfaces,
            placement: None,
            overlays: None,
            config,
            latest: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    /// Enables moving the window to a record's remembered display.
    pub fn with_placement(mut self, placement: Arc<dyn WindowPlacement>) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Enables re-asserting the synchronizer's persistent overlays on the
    /// loaded surface.
    pub fn with_overlays(mut self, overlays: Arc<UiStateSynchronizer>) -> Self {
        self.overlays = Some(overlays);
        self
    }

    pub fn config(&self) -> &PerchConfig {
        &self.config
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        lock(&self.active)
    }

    /// State of the current session, if a model is loaded.
    pub fn session_state(&self) -> Option<SessionState> {
        self.active().as_ref().map(|session| session.state.clone())
    }

    /// Whether a debounced save is waiting for its quiet period to end.
    pub fn has_pending_save(&self) -> bool {
        self.active()
            .as_ref()
            .is_some_and(|session| session.saves.has_pending())
    }

    /// Runs `f` against the current surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn RenderSurface) -> R) -> Result<R> {
        let active = self.active();
        let session = active.as_ref().ok_or(PerchError::NoActiveSession)?;
        let mut surface = lock(&session.surface);
        Ok(f(&mut **surface))
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Loads `identity` and applies its saved preferences.
    ///
    /// The previous session is torn down before anything else happens. Only
    /// surface acquisition can fail the call; a store outage or a resolution
    /// miss simply leaves the engine's defaults in place. A load overtaken by
    /// a newer call while awaiting I/O returns `SessionUnavailable` and does
    /// not install itself.
    pub async fn load_model(&self, identity: &str, options: LoadOptions) -> Result<SessionState> {
        let generation_id = {
            let mut active = self.active();
            let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(previous) = active.take() {
                tracing::debug!(
                    "[Session] Replacing generation {} ('{}')",
                    previous.generation.id(),
                    previous.state.current_model_identity
                );
            }
            id
        };
        tracing::info!("[Session] Loading '{}' (generation {})", identity, generation_id);

        let mut surface = self
            .surfaces
            .acquire(identity, &options)
            .await
            .map_err(|e| {
                tracing::error!("[Session] Failed to acquire surface for '{}': {}", identity, e);
                PerchError::session_unavailable(identity, e.to_string())
            })?;

        let records = self.store.load().await;
        let resolved = resolve_with_strategy(identity, &records);

        let mut state = SessionState::new(generation_id, identity);
        let mut parameters = None;
        let mut display = None;
        match resolved {
            Some((strategy, record)) => {
                tracing::info!(
                    "[Session] Matched '{}' to saved '{}' ({})",
                    identity,
                    record.model_path,
                    strategy.as_str()
                );
                surface.set_position(record.position);
                surface.set_scale(record.scale);
                if let Some(saved) = record.parameters.as_ref().filter(|p| !p.is_empty()) {
                    surface.apply_parameters(saved);
                }
                parameters = record.parameters.clone();
                display = record.display;
                state.current_record_applied = true;
                state.matched_record_path = Some(record.model_path.clone());
            }
            None => {
                tracing::info!("[Session] No saved preferences for '{}'", identity);
            }
        }

        let surface: SharedSurface = Arc::new(Mutex::new(surface));
        let parameters: SharedParameters = Arc::new(Mutex::new(parameters));
        {
            let mut active = self.active();
            if self.latest.load(Ordering::SeqCst) != generation_id {
                tracing::debug!(
                    "[Session] Dropping load of '{}': superseded by a newer load",
                    identity
                );
                return Err(PerchError::session_unavailable(
                    identity,
                    "superseded by a newer load",
                ));
            }

            let generation = Generation::new(generation_id);
            self.spawn_session_timers(&generation, &surface, &parameters);
            if let Some(overlays) = &self.overlays {
                overlays.reassert_overlays(&mut **lock(&surface));
            }

            let saves = SaveDebouncer::new(
                self.store.clone(),
                self.config.save_debounce(),
                generation.child_token(),
            );
            *active = Some(ActiveSession {
                state: state.clone(),
                surface,
                parameters,
                display,
                saves,
                generation,
            });
        }

        if let Some(anchor) = display {
            self.move_to_display(generation_id, anchor).await;
        }

        Ok(state)
    }

    fn spawn_session_timers(
        &self,
        generation: &Generation,
        surface: &SharedSurface,
        parameters: &SharedParameters,
    ) {
        let has_parameters = lock(parameters).as_ref().is_some_and(|p| !p.is_empty());
        if has_parameters {
            let reapply = reapply_parameters(surface.clone(), parameters.clone());
            generation.spawn_delayed(self.config.reapply_delay(), reapply);

            if let Some(period) = self.config.parameter_reassert_interval() {
                let reassert = reapply_parameters(surface.clone(), parameters.clone());
                generation.spawn_ticker(period, reassert);
            }
        }

        if let (Some(overlays), Some(period)) =
            (&self.overlays, self.config.overlay_reassert_interval())
        {
            let overlays = overlays.clone();
            let surface = surface.clone();
            generation.spawn_ticker(period, move || {
                overlays.reassert_overlays(&mut **lock(&surface));
            });
        }
    }

    async fn move_to_display(&self, generation_id: u64, anchor: DisplayAnchor) {
        let Some(placement) = &self.placement else {
            return;
        };
        if self.latest.load(Ordering::SeqCst) != generation_id {
            return;
        }

        let x = anchor.screen_x + self.config.display_offset;
        let y = anchor.screen_y + self.config.display_offset;
        match placement.move_window_to_display(x, y).await {
            Ok(PlacementOutcome::Moved) => {
                tracing::info!("[Session] Moved window to saved display at ({}, {})", x, y);
            }
            Ok(PlacementOutcome::SameDisplay) => {
                tracing::debug!("[Session] Window already on saved display");
            }
            Ok(PlacementOutcome::Failed(reason)) => {
                tracing::warn!("[Session] Could not move window to saved display: {}", reason);
            }
            Err(e) => {
                tracing::warn!("[Session] Window placement error: {}", e);
            }
        }
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Moves and rescales the model, then schedules a debounced save.
    pub fn set_geometry(&self, position: Vec2, scale: Vec2) -> Result<()> {
        validate_geometry(position, scale)?;

        let active = self.active();
        let session = active.as_ref().ok_or(PerchError::NoActiveSession)?;
        {
            let mut surface = lock(&session.surface);
            surface.set_position(position);
            surface.set_scale(scale);
        }
        session.schedule_save();
        Ok(())
    }

    /// Sets the named parameters (others keep their values), then schedules
    /// a debounced save.
    pub fn set_parameters(&self, parameters: ParameterMap) -> Result<()> {
        if let Some((name, _)) = parameters.iter().find(|(_, value)| !value.is_finite()) {
            return Err(PerchError::validation(
                format!("parameters.{}", name),
                "must be finite",
            ));
        }

        let active = self.active();
        let session = active.as_ref().ok_or(PerchError::NoActiveSession)?;
        lock(&session.surface).apply_parameters(&parameters);
        lock(&session.parameters)
            .get_or_insert_with(ParameterMap::new)
            .extend(parameters);
        session.schedule_save();
        Ok(())
    }

    /// Remembers the display the window sits on, then schedules a debounced
    /// save.
    pub fn set_display_anchor(&self, anchor: DisplayAnchor) -> Result<()> {
        if !anchor.is_finite() {
            return Err(PerchError::validation("display", "must be finite"));
        }

        let mut active = self.active();
        let session = active.as_mut().ok_or(PerchError::NoActiveSession)?;
        session.display = Some(anchor);
        session.schedule_save();
        Ok(())
    }

    /// Puts the model back at the default layout for `viewport` and saves
    /// immediately, discarding any pending debounced save.
    ///
    /// Returns the store's save result.
    pub async fn reset_position(&self, viewport: &Viewport) -> Result<bool> {
        let layout = default_layout(viewport, self.config.mobile_width_threshold);
        tracing::debug!(
            "[Session] Resetting to {:?} layout",
            viewport.device_class(self.config.mobile_width_threshold)
        );

        let (record, saves) = {
            let active = self.active();
            let session = active.as_ref().ok_or(PerchError::NoActiveSession)?;
            {
                let mut surface = lock(&session.surface);
                surface.set_anchor(layout.anchor);
                surface.set_scale(layout.scale);
                surface.set_position(layout.position);
            }
            session.saves.cancel();
            (session.snapshot(), session.saves.clone())
        };

        Ok(saves.save_now(&record).await)
    }

    /// Writes any pending save and tears the session down.
    ///
    /// Returns `false` when no model was loaded.
    pub async fn unload(&self) -> bool {
        let Some(session) = self.active().take() else {
            return false;
        };
        if let Some(saved) = session.saves.flush().await {
            tracing::debug!("[Session] Flushed pending save on unload (success: {})", saved);
        }
        tracing::info!(
            "[Session] Unloaded '{}' (generation {})",
            session.state.current_model_identity,
            session.generation.id()
        );
        true
    }
}

fn reapply_parameters(
    surface: SharedSurface,
    parameters: SharedParameters,
) -> impl FnMut() + Send + 'static {
    move || {
        if let Some(parameters) = lock(&parameters).as_ref() {
            lock(&surface).apply_parameters(parameters);
        }
    }
}
