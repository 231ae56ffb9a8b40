use async_trait::async_trait;
use perch_application::SessionController;
use perch_core::config::PerchConfig;
use perch_core::error::Result;
use perch_core::preference::{ParameterMap, PreferenceStore, Vec2};
use perch_core::surface::{LoadOptions, RenderSurface, SurfaceProvider};
use perch_core::viewport::Viewport;
use perch_infrastructure::FilePreferenceTransport;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Surface whose geometry is shared with the test.
struct SharedSurface(Arc<Mutex<(Vec2, Vec2)>>);

impl RenderSurface for SharedSurface {
    fn set_anchor(&mut self, _anchor: Vec2) {}
    fn set_scale(&mut self, scale: Vec2) {
        self.0.lock().unwrap().1 = scale;
    }
    fn set_position(&mut self, position: Vec2) {
        self.0.lock().unwrap().0 = position;
    }
    fn position(&self) -> Vec2 {
        self.0.lock().unwrap().0
    }
    fn scale(&self) -> Vec2 {
        self.0.lock().unwrap().1
    }
    fn apply_parameters(&mut self, _parameters: &ParameterMap) {}
    fn play_named_pose(&mut self, _name: &str) -> bool {
        false
    }
    fn clear_pose(&mut self, _name: &str) {}
    fn is_pose_active(&self, _name: &str) -> bool {
        false
    }
}

struct Provider(Arc<Mutex<(Vec2, Vec2)>>);

#[async_trait]
impl SurfaceProvider for Provider {
    async fn acquire(&self, _identity: &str, _options: &LoadOptions) -> Result<Box<dyn RenderSurface>> {
        Ok(Box::new(SharedSurface(self.0.clone())))
    }
}

fn session(path: std::path::PathBuf) -> (SessionController, Arc<Mutex<(Vec2, Vec2)>>) {
    let geometry = Arc::new(Mutex::new((Vec2::new(0.0, 0.0), Vec2::splat(1.0))));
    let store = PreferenceStore::new(Arc::new(FilePreferenceTransport::new(path)));
    let controller = SessionController::new(
        store,
        Arc::new(Provider(geometry.clone())),
        PerchConfig::default(),
    );
    (controller, geometry)
}

#[tokio::test]
async fn test_geometry_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");
    let identity = "/models/Hiyori/Hiyori.model3.json";
    let options = LoadOptions::new(Viewport::new(1280.0, 720.0));

    // First run: nothing saved yet.
    let (controller, _) = session(path.clone());
    let state = controller.load_model(identity, options).await.unwrap();
    assert!(!state.current_record_applied);
    controller
        .set_geometry(Vec2::new(640.5, 300.25), Vec2::splat(0.18))
        .unwrap();
    assert!(controller.unload().await);

    // Second run picks the record up again.
    let (controller, geometry) = session(path);
    let state = controller.load_model(identity, options).await.unwrap();
    assert!(state.current_record_applied);
    assert_eq!(
        *geometry.lock().unwrap(),
        (Vec2::new(640.5, 300.25), Vec2::splat(0.18))
    );
}
