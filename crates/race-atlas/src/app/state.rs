//! Application state management
//!
//! This module manages the startup load of the calendar resources, the
//! selection controller and the map camera.

use crate::app::map_view::{CountryLayer, MapState};
use crate::app::settings::Settings;
use race_atlas_lib::{DataSources, Dataset, SelectionController, load_dataset};
use tokio::sync::oneshot;

/// Outcome of the background load, as sent back to the UI thread
type LoadResult = Result<Dataset, String>;

/// Startup lifecycle. There is no partial state: either everything loaded or nothing.
pub enum LoadState {
    /// Resources are being read on the async runtime
    Loading {
        receiver: oneshot::Receiver<LoadResult>,
        started_at: instant::Instant,
    },

    /// Dataset joined and map geometry prepared
    Ready(Box<Loaded>),

    /// Startup failed; the message is shown instead of the UI
    Failed(String),
}

/// Everything derived once from the loaded resources
pub struct Loaded {
    pub dataset: Dataset,

    /// Triangulated, projected country outlines
    pub countries: CountryLayer,

    /// Bounds of the year controls
    pub year_range: (i32, i32),
}

/// Main application state
pub struct AppState {
    /// Startup load lifecycle
    pub load: LoadState,

    /// Selected year and active race
    pub selection: SelectionController,

    /// Projection and pan/zoom of the map
    pub map: MapState,

    /// Whether to show the help window
    pub show_help: bool,
}

impl AppState {
    /// Create the state and start loading the resources named in `settings`
    pub fn new(settings: &Settings, ctx: &egui::Context) -> Self {
        Self {
            load: start_loading(settings.sources(), ctx.clone()),
            selection: SelectionController::new(settings.year),
            map: MapState::default(),
            show_help: false,
        }
    }

    /// Pick up the result of the background load, if it arrived
    pub fn poll_load(&mut self) {
        let LoadState::Loading {
            receiver,
            started_at,
        } = &mut self.load
        else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err("the loader stopped without reporting a result".to_string())
            }
        };
        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;

        self.load = match result {
            Ok(dataset) => {
                tracing::info!("Startup load finished in {:.1} ms", elapsed_ms);
                let loaded = self.prepare(dataset);
                LoadState::Ready(Box::new(loaded))
            }
            Err(e) => {
                tracing::error!("Startup load failed after {:.1} ms: {}", elapsed_ms, e);
                LoadState::Failed(e)
            }
        };
    }

    fn prepare(&self, dataset: Dataset) -> Loaded {
        profiling::scope!("AppState::prepare");

        let countries = CountryLayer::new(dataset.countries(), &self.map.projection);
        let year = self.selection.selected_year();
        let year_range = match dataset.year_range() {
            Some((min, max)) => (min.min(year), max.max(year)),
            None => (year, year),
        };

        Loaded {
            dataset,
            countries,
            year_range,
        }
    }
}

/// Spawn the resource load on the tokio runtime owned by the entry point
fn start_loading(sources: DataSources, ctx: egui::Context) -> LoadState {
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("No async runtime available for loading: {}", e);
            return LoadState::Failed(format!("no async runtime available: {e}"));
        }
    };

    tracing::info!(
        "Loading {}, {} and {}",
        sources.world.display(),
        sources.races.display(),
        sources.circuits.display()
    );

    let (sender, receiver) = oneshot::channel();
    handle.spawn(async move {
        let result = load_dataset(&sources).await.map_err(|e| e.to_string());
        // The receiver is gone only if the app already closed
        let _ = sender.send(result);
        ctx.request_repaint();
    });

    LoadState::Loading {
        receiver,
        started_at: instant::Instant::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_loader_fails_startup() {
        let (sender, receiver) = oneshot::channel::<LoadResult>();
        drop(sender);

        let mut state = AppState {
            load: LoadState::Loading {
                receiver,
                started_at: instant::Instant::now(),
            },
            selection: SelectionController::new(2024),
            map: MapState::default(),
            show_help: false,
        };
        state.poll_load();
        assert!(matches!(state.load, LoadState::Failed(_)));
    }

    #[test]
    fn test_loaded_dataset_becomes_ready() {
        let (sender, receiver) = oneshot::channel::<LoadResult>();
        let mut state = AppState {
            load: LoadState::Loading {
                receiver,
                started_at: instant::Instant::now(),
            },
            selection: SelectionController::new(2030),
            map: MapState::default(),
            show_help: false,
        };

        state.poll_load();
        assert!(matches!(state.load, LoadState::Loading { .. }));

        sender.send(Ok(Dataset::default())).unwrap();
        state.poll_load();
        match &state.load {
            LoadState::Ready(loaded) => {
                // Without races the controls only offer the configured year
                assert_eq!(loaded.year_range, (2030, 2030));
                assert!(loaded.countries.is_empty());
            }
            _ => panic!("expected the state to be ready"),
        }
    }

    #[test]
    fn test_load_error_is_kept_for_display() {
        let (sender, receiver) = oneshot::channel::<LoadResult>();
        let mut state = AppState {
            load: LoadState::Loading {
                receiver,
                started_at: instant::Instant::now(),
            },
            selection: SelectionController::new(2024),
            map: MapState::default(),
            show_help: false,
        };

        sender
            .send(Err("failed to read races from races.csv".to_string()))
            .unwrap();
        state.poll_load();
        match &state.load {
            LoadState::Failed(message) => assert!(message.contains("races.csv")),
            _ => panic!("expected the load to fail"),
        }
    }
}
