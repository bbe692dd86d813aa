//! Chart rendering adapters.
//!
//! The drawing itself is done by an external library (Chart.js in a page,
//! plotters for static SVG). This module owns the seam: a renderer turns a
//! `ChartSpec` into a live handle bound to one surface, and the
//! `SurfaceRegistry` guarantees at most one live handle per surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::ChartSpec;
use crate::error::AppError;

pub mod chartjs;
pub mod color;
pub mod svg;

pub use chartjs::{ChartJsChart, ChartJsRenderer, write_dashboard_html};
pub use svg::{SvgChart, SvgRenderer};

/// A constructed chart instance that must be released before its surface is
/// reused.
pub trait RenderHandle: Send {
    fn dispose(self) -> Result<(), AppError>;
}

/// Builds a chart instance for `chart.surface`.
pub trait ChartRenderer: Sync {
    type Handle: RenderHandle;

    fn render(&self, chart: &ChartSpec) -> Result<Self::Handle, AppError>;
}

type Slot<H> = Arc<Mutex<Option<H>>>;

/// Surface id -> live render handle.
///
/// Each surface has its own lock, so different surfaces render concurrently
/// while replacement on one surface is serialized.
pub struct SurfaceRegistry<H> {
    slots: Mutex<HashMap<String, Slot<H>>>,
}

impl<H> Default for SurfaceRegistry<H> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<H: RenderHandle> SurfaceRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, surface: &str) -> Result<Slot<H>, AppError> {
        let mut slots = self.slots.lock().map_err(|_| poisoned())?;
        Ok(slots.entry(surface.to_string()).or_default().clone())
    }

    /// Dispose whatever is bound to `chart.surface`, then render `chart` into
    /// it. Both steps happen under the surface lock.
    ///
    /// If rendering fails the surface is left empty.
    pub fn replace<R>(&self, renderer: &R, chart: &ChartSpec) -> Result<(), AppError>
    where
        R: ChartRenderer<Handle = H> + ?Sized,
    {
        let slot = self.slot(&chart.surface)?;
        let mut live = slot.lock().map_err(|_| poisoned())?;

        if let Some(prior) = live.take() {
            prior.dispose()?;
        }
        *live = Some(renderer.render(chart)?);
        Ok(())
    }

    /// Dispose the handle bound to `surface`. Returns whether one was live.
    pub fn dispose(&self, surface: &str) -> Result<bool, AppError> {
        let slot = {
            let slots = self.slots.lock().map_err(|_| poisoned())?;
            match slots.get(surface) {
                Some(slot) => slot.clone(),
                None => return Ok(false),
            }
        };
        let mut live = slot.lock().map_err(|_| poisoned())?;
        match live.take() {
            Some(handle) => {
                handle.dispose()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_live(&self, surface: &str) -> bool {
        let Ok(slots) = self.slots.lock() else {
            return false;
        };
        slots
            .get(surface)
            .and_then(|slot| slot.lock().ok().map(|live| live.is_some()))
            .unwrap_or(false)
    }

    /// Surfaces that currently hold a live handle, sorted.
    pub fn live_surfaces(&self) -> Vec<String> {
        let Ok(slots) = self.slots.lock() else {
            return Vec::new();
        };
        let mut out: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.lock().map(|live| live.is_some()).unwrap_or(false))
            .map(|(surface, _)| surface.clone())
            .collect();
        out.sort();
        out
    }

    /// Clone of the handle bound to `surface`, if any.
    pub fn get(&self, surface: &str) -> Option<H>
    where
        H: Clone,
    {
        let slot = self.slots.lock().ok()?.get(surface)?.clone();
        let live = slot.lock().ok()?;
        live.clone()
    }
}

fn poisoned() -> AppError {
    AppError::new(4, "Surface registry lock poisoned.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartData, ChartKind, ChartOptions, PieData};

    #[derive(Clone)]
    struct Recorded {
        id: usize,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RenderHandle for Recorded {
        fn dispose(self) -> Result<(), AppError> {
            self.log.lock().unwrap().push(format!("dispose {}", self.id));
            Ok(())
        }
    }

    struct Recorder {
        next: Mutex<usize>,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Recorder {
        fn new(fail: bool) -> Self {
            Self {
                next: Mutex::new(0),
                log: Arc::new(Mutex::new(Vec::new())),
                fail,
            }
        }
    }

    impl ChartRenderer for Recorder {
        type Handle = Recorded;

        fn render(&self, chart: &ChartSpec) -> Result<Recorded, AppError> {
            if self.fail {
                return Err(AppError::new(4, "boom"));
            }
            let mut next = self.next.lock().unwrap();
            *next += 1;
            self.log
                .lock()
                .unwrap()
                .push(format!("render {} on {}", *next, chart.surface));
            Ok(Recorded {
                id: *next,
                log: self.log.clone(),
            })
        }
    }

    fn chart(surface: &str) -> ChartSpec {
        ChartSpec {
            surface: surface.to_string(),
            kind: ChartKind::Pie,
            data: ChartData::Pie(PieData::default()),
            options: ChartOptions::titled("t"),
        }
    }

    #[test]
    fn replace_disposes_prior_before_rendering() {
        let renderer = Recorder::new(false);
        let registry = SurfaceRegistry::new();

        registry.replace(&renderer, &chart("graficoTorta")).unwrap();
        registry.replace(&renderer, &chart("graficoTorta")).unwrap();

        let log = renderer.log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec!["render 1 on graficoTorta", "dispose 1", "render 2 on graficoTorta"]
        );
        assert_eq!(registry.get("graficoTorta").map(|h| h.id), Some(2));
    }

    #[test]
    fn surfaces_are_independent() {
        let renderer = Recorder::new(false);
        let registry = SurfaceRegistry::new();

        registry.replace(&renderer, &chart("a")).unwrap();
        registry.replace(&renderer, &chart("b")).unwrap();

        assert_eq!(registry.live_surfaces(), vec!["a", "b"]);
        assert!(registry.dispose("a").unwrap());
        assert!(!registry.dispose("a").unwrap());
        assert!(!registry.is_live("a"));
        assert!(registry.is_live("b"));
    }

    #[test]
    fn failed_render_leaves_surface_empty() {
        let ok = Recorder::new(false);
        let failing = Recorder {
            log: ok.log.clone(),
            ..Recorder::new(true)
        };
        let registry = SurfaceRegistry::new();

        registry.replace(&ok, &chart("a")).unwrap();
        assert!(registry.replace(&failing, &chart("a")).is_err());

        assert!(!registry.is_live("a"));
        assert_eq!(ok.log.lock().unwrap().last().unwrap(), "dispose 1");
    }
}
