//! Renderer-facing geometry and the readiness signal.
//!
//! Gate height depends on renderer metrics, so it can only be computed once
//! a renderer exists. Work that needs one before that point is queued on the
//! [`RendererSignal`] and runs the next time a renderer is published.

use std::{
    mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::{circuits::Gate, vector::Vec2f};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("renderer is not initialized")]
    RendererUnavailable,

    #[error("renderer reported invalid gate metrics {0:?}")]
    InvalidMetrics(GateMetrics),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateMetrics {
    pub pin_spacing: f32,
    pub pin_radius: f32,
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self {
            pin_spacing: 0.5,
            pin_radius: 0.25,
        }
    }
}

impl GateMetrics {
    fn is_valid(&self) -> bool {
        self.pin_spacing.is_finite()
            && self.pin_radius.is_finite()
            && self.pin_spacing >= 0.0
            && self.pin_radius > 0.0
    }
}

pub trait Renderer: Send + Sync {
    fn gate_metrics(&self) -> Result<GateMetrics, GeometryError>;
}

/// Renderer with fixed metrics, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessRenderer(pub GateMetrics);

impl Renderer for HeadlessRenderer {
    fn gate_metrics(&self) -> Result<GateMetrics, GeometryError> {
        Ok(self.0)
    }
}

/// Height of a gate: one pin slot per pin on its busiest side.
pub fn calculate_gate_height(
    renderer: Option<&dyn Renderer>,
    gate: &Gate,
) -> Result<f32, GeometryError> {
    let renderer = renderer.ok_or(GeometryError::RendererUnavailable)?;
    let metrics = renderer.gate_metrics()?;
    if !metrics.is_valid() {
        return Err(GeometryError::InvalidMetrics(metrics));
    }

    let pins = &gate.template().pins;
    let slots = pins.inputs.max(pins.outputs).max(1) as f32;
    Ok(slots * (metrics.pin_spacing + 2.0 * metrics.pin_radius))
}

/// Recomputes the gate height and makes the gate square at that size.
pub fn fix_gate_height(renderer: Option<&dyn Renderer>, gate: &Gate) -> Result<f32, GeometryError> {
    let height = calculate_gate_height(renderer, gate)?;
    gate.update_transform(|t| t.scale = Vec2f::single_value(height));
    Ok(height)
}

/// Shared cancel flag. Cancelling any clone cancels all of them, and
/// removes every task queued under it from the signals it was queued on.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<TokenState>);

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    queues: Mutex<Vec<Weak<Mutex<SignalState>>>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Release);

        let queues = mem::take(&mut *self.0.queues.lock());
        for queue in queues.iter().filter_map(Weak::upgrade) {
            queue.lock().prune();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Acquire)
    }

    fn watch(&self, queue: &Arc<Mutex<SignalState>>) {
        let mut queues = self.0.queues.lock();
        queues.retain(|q| q.strong_count() > 0);
        if !queues.iter().any(|q| q.as_ptr() == Arc::as_ptr(queue)) {
            queues.push(Arc::downgrade(queue));
        }
    }

    fn ptr_eq(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

type ReadyTask = Box<dyn FnOnce(&dyn Renderer) + Send>;

struct PendingTask {
    token: CancellationToken,
    task: ReadyTask,
}

#[derive(Default)]
struct SignalState {
    current: Option<Arc<dyn Renderer>>,
    pending: Vec<PendingTask>,
}

impl SignalState {
    fn prune(&mut self) {
        self.pending.retain(|p| !p.token.is_cancelled());
    }
}

/// Holds the latest renderer (if any) and a queue of one-shot tasks
/// waiting for one.
///
/// Tasks never run inside [`RendererSignal::once_ready`]; they run from
/// [`RendererSignal::publish`] or [`RendererSignal::flush`], in the order
/// they were queued, and only while their token is not cancelled.
/// Cancelling a token drops its queued tasks right away.
#[derive(Default)]
pub struct RendererSignal {
    state: Arc<Mutex<SignalState>>,
}

impl RendererSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(renderer: Arc<dyn Renderer>) -> Self {
        let signal = Self::new();
        signal.state.lock().current = Some(renderer);
        signal
    }

    pub fn current(&self) -> Option<Arc<dyn Renderer>> {
        self.state.lock().current.clone()
    }

    /// Replaces the held renderer. Publishing `Some` runs the queued tasks;
    /// returns how many ran.
    pub fn publish(&self, renderer: Option<Arc<dyn Renderer>>) -> usize {
        self.state.lock().current = renderer;
        self.flush()
    }

    /// Runs queued tasks if a renderer is held.
    pub fn flush(&self) -> usize {
        let (renderer, pending) = {
            let mut state = self.state.lock();
            state.prune();
            let Some(renderer) = state.current.clone() else {
                return 0;
            };
            (renderer, mem::take(&mut state.pending))
        };

        // lock is released here so tasks may queue new work
        let mut ran = 0;
        for PendingTask { token, task } in pending {
            if token.is_cancelled() {
                continue;
            }
            task(&*renderer);
            ran += 1;
        }

        if ran > 0 {
            debug!(ran, "renderer-ready tasks ran");
        }
        ran
    }

    pub fn once_ready(
        &self,
        token: CancellationToken,
        task: impl FnOnce(&dyn Renderer) + Send + 'static,
    ) {
        if token.is_cancelled() {
            return;
        }

        let first_for_token = {
            let mut state = self.state.lock();
            state.prune();
            let first = !state.pending.iter().any(|p| p.token.ptr_eq(&token));
            state.pending.push(PendingTask {
                token: token.clone(),
                task: Box::new(task),
            });
            first
        };

        if first_for_token {
            token.watch(&self.state);
        }
        // cancelled while being queued
        if token.is_cancelled() {
            self.state.lock().prune();
        }
    }

    /// Queued tasks whose token is still live.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::{circuits::GateProps, template::TemplateRegistry};

    struct BrokenRenderer;

    impl Renderer for BrokenRenderer {
        fn gate_metrics(&self) -> Result<GateMetrics, GeometryError> {
            Ok(GateMetrics {
                pin_spacing: f32::NAN,
                pin_radius: 1.0,
            })
        }
    }

    fn gate(name: &str) -> Gate {
        let registry = TemplateRegistry::with_builtins();
        Gate::new(registry.get(name).unwrap(), name.into(), GateProps::new())
    }

    #[test]
    fn height_uses_busiest_side() {
        let renderer = HeadlessRenderer(GateMetrics {
            pin_spacing: 1.0,
            pin_radius: 0.5,
        });

        assert_eq!(calculate_gate_height(Some(&renderer), &gate("and")), Ok(4.0));
        assert_eq!(calculate_gate_height(Some(&renderer), &gate("full adder")), Ok(6.0));
        assert_eq!(calculate_gate_height(Some(&renderer), &gate("not")), Ok(2.0));
    }

    #[test]
    fn height_fails_without_renderer() {
        let gate = gate("and");
        assert_eq!(
            fix_gate_height(None, &gate),
            Err(GeometryError::RendererUnavailable)
        );
        assert_eq!(gate.transform().scale, Vec2f::single_value(1.0));

        assert!(matches!(
            calculate_gate_height(Some(&BrokenRenderer), &gate),
            Err(GeometryError::InvalidMetrics(_))
        ));
    }

    #[test]
    fn fix_sets_square_scale() {
        let gate = gate("half adder");
        let height = fix_gate_height(Some(&HeadlessRenderer::default()), &gate).unwrap();
        assert_eq!(gate.transform().scale, Vec2f::single_value(height));
    }

    #[test]
    fn tasks_wait_for_publish() {
        let signal = RendererSignal::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        signal.once_ready(CancellationToken::new(), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(signal.pending(), 1);
        assert_eq!(signal.flush(), 0);
        assert_eq!(signal.publish(None), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(signal.publish(Some(Arc::new(HeadlessRenderer::default()))), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // one-shot
        assert_eq!(signal.publish(Some(Arc::new(HeadlessRenderer::default()))), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ready_signal_still_defers() {
        let signal = RendererSignal::with_renderer(Arc::new(HeadlessRenderer::default()));
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        signal.once_ready(CancellationToken::new(), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(signal.flush(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_tasks_are_skipped() {
        let signal = RendererSignal::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();

        for _ in 0..3 {
            let c = counter.clone();
            signal.once_ready(token.clone(), move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        token.cancel();
        assert_eq!(signal.pending(), 0);

        signal.once_ready(token, |_| unreachable!());
        assert_eq!(signal.publish(Some(Arc::new(HeadlessRenderer::default()))), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_empties_queue_without_renderer() {
        let signal = RendererSignal::new();
        let token = CancellationToken::new();
        let other = CancellationToken::new();

        for _ in 0..1000 {
            signal.once_ready(token.clone(), |_| {});
        }
        signal.once_ready(other.clone(), |_| {});
        assert_eq!(signal.state.lock().pending.len(), 1001);

        token.cancel();
        assert_eq!(signal.state.lock().pending.len(), 1);
        assert!(signal.state.lock().pending[0].token.ptr_eq(&other));
        assert!(token.0.queues.lock().is_empty());
    }

    #[test]
    fn dropped_simulation_releases_its_tasks() {
        use crate::simulation::{Simulation, SimulationEnv, SimulationMode};

        let signal = RendererSignal::new();
        for _ in 0..50 {
            let simulation = Simulation::new(SimulationMode::Project, "tmp", SimulationEnv::Global);
            signal.once_ready(simulation.cancellation_token().clone(), |_| {});
            signal.once_ready(simulation.cancellation_token().clone(), |_| {});
        }

        assert_eq!(signal.state.lock().pending.len(), 0);
    }

    #[test]
    fn token_outliving_signal_cancels_cleanly() {
        let token = CancellationToken::new();
        {
            let signal = RendererSignal::new();
            signal.once_ready(token.clone(), |_| {});
        }
        token.cancel();
        assert!(token.is_cancelled());
    }
}
