//! Ambient rain.
//!
//! ```text
//!            start()                     stop()
//!   Idle ─────────────────▶ Running ─────────────────▶ Idle
//!    ▲  (container, batch,    │  every tick: evict oldest until
//!    │   repeating tick)      │  live + batch <= max, append batch
//!    └────────────────────────┘
//! ```
//!
//! Each drop schedules its own removal for when its fall ends. That timer
//! may fire after the drop was evicted or after `stop()` removed the whole
//! container; removal is idempotent so both cases are no-ops.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::RainConfig;
use crate::host::{ensure_container, ElementId, Host, Placement, Task, TimerHandle};
use crate::style::{px, secs, DropVisual};

/// Id of the rain container.
pub const RAIN_CONTAINER_ID: &str = "rain-container";
/// Class of the rain container.
pub const RAIN_CONTAINER_CLASS: &str = "rain-container";
/// Class of one drop.
pub const RAIN_DROP_CLASS: &str = "rain-drop";

/// Generator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RainState {
    /// Nothing on screen, no timer armed.
    #[default]
    Idle,
    /// Container present, generation tick armed.
    Running,
}

/// One falling drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    /// Its element.
    pub element: ElementId,
    /// Its randomized look.
    pub visual: DropVisual,
}

/// Keeps a target population of falling drops on screen.
#[derive(Debug)]
pub struct RainGenerator {
    config: RainConfig,
    state: RainState,
    container: Option<ElementId>,
    tick: Option<TimerHandle>,
    autostart: Option<TimerHandle>,
    drops: VecDeque<RainDrop>,
}

impl RainGenerator {
    /// Creates an idle generator.
    #[must_use]
    pub fn new(config: RainConfig) -> Self {
        Self {
            config,
            state: RainState::Idle,
            container: None,
            tick: None,
            autostart: None,
            drops: VecDeque::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RainState {
        self.state
    }

    /// Whether rain is falling.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, RainState::Running)
    }

    /// Drops currently tracked as live.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    /// Whether no drop is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Live drops, oldest first.
    pub fn drops(&self) -> impl Iterator<Item = &RainDrop> {
        self.drops.iter()
    }

    /// The container while running.
    #[must_use]
    pub const fn container(&self) -> Option<ElementId> {
        self.container
    }

    /// Whether a delayed start is pending.
    #[must_use]
    pub const fn is_autostart_pending(&self) -> bool {
        self.autostart.is_some()
    }

    /// Idle → Running. Returns `false` when already running or when no
    /// container could be created.
    pub fn start<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R) -> bool {
        if let Some(pending) = self.autostart.take() {
            host.cancel(pending);
        }
        if self.is_running() {
            return false;
        }
        let Some(container) = ensure_container(host, RAIN_CONTAINER_ID, RAIN_CONTAINER_CLASS) else {
            return false;
        };

        self.container = Some(container);
        self.state = RainState::Running;
        self.generate(host, rng);
        self.tick = Some(host.schedule_repeating(self.config.tick_ms, Task::RainTick));
        tracing::info!(max_drops = self.config.max_drops, "rain started");
        true
    }

    /// Running → Idle: cancels the tick and removes every drop with the
    /// container. Also cancels a pending delayed start. Returns `false`
    /// when it was already idle.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if let Some(pending) = self.autostart.take() {
            host.cancel(pending);
        }
        if !self.is_running() {
            return false;
        }
        if let Some(tick) = self.tick.take() {
            host.cancel(tick);
        }
        self.drops.clear();
        if let Some(container) = self.container.take() {
            host.remove(container);
        }
        self.state = RainState::Idle;
        tracing::info!("rain stopped");
        true
    }

    /// Arms a one-shot start after `autostart_delay_ms`, or starts at once
    /// when the delay is zero.
    pub fn schedule_start<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R) {
        if self.is_running() || self.autostart.is_some() {
            return;
        }
        if self.config.autostart_delay_ms == 0 {
            self.start(host, rng);
        } else {
            self.autostart = Some(host.schedule(self.config.autostart_delay_ms, Task::RainAutostart));
        }
    }

    /// The delayed start fired.
    pub fn on_autostart<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R) {
        self.autostart = None;
        self.start(host, rng);
    }

    /// Generation tick.
    pub fn on_tick<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R) {
        if self.is_running() {
            self.generate(host, rng);
        }
    }

    /// A drop finished falling.
    pub fn on_drop_expire<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) {
        host.remove(element);
        self.drops.retain(|d| d.element != element);
    }

    fn generate<H: Host + ?Sized, R: Rng>(&mut self, host: &mut H, rng: &mut R) {
        let Some(container) = self.container else {
            return;
        };
        if !host.is_attached(container) {
            tracing::debug!("rain container removed by the page");
            self.stop(host);
            return;
        }
        self.drops.retain(|d| host.is_attached(d.element));

        let max = self.config.max_drops;
        let (lo, hi) = (self.config.batch_min, self.config.batch_max);
        let batch = rng.gen_range(lo.min(hi)..=lo.max(hi)).min(max);
        while self.drops.len() + batch > max {
            match self.drops.pop_front() {
                Some(oldest) => {
                    host.remove(oldest.element);
                }
                None => break,
            }
        }

        for _ in 0..batch {
            let visual = DropVisual::sample(rng);
            if let Some(element) = spawn_drop(host, container, &visual) {
                self.drops.push_back(RainDrop { element, visual });
            }
        }
        tracing::trace!(batch, live = self.drops.len(), "rain batch");
    }
}

fn spawn_drop<H: Host + ?Sized>(host: &mut H, container: ElementId, visual: &DropVisual) -> Option<ElementId> {
    let drop = host.create_element(Placement::Child(container), "div")?;
    host.add_class(drop, RAIN_DROP_CLASS);
    host.set_style(drop, "left", &format!("{:.2}vw", visual.left_vw));
    host.set_style(drop, "height", &px(visual.length_px));
    host.set_style(drop, "opacity", &format!("{:.3}", visual.opacity));
    host.set_style(drop, "animation-duration", &secs(visual.fall_secs));
    host.set_style(drop, "animation-delay", &secs(visual.delay_secs));
    host.schedule(visual.lifetime_ms(), Task::DropExpire(drop));
    Some(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{SimHost, Surface};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn drive(host: &mut SimHost, rain: &mut RainGenerator, rng: &mut ChaCha8Rng, ms: u32) {
        host.advance(ms, |host, task| match task {
            Task::RainTick => rain.on_tick(host, rng),
            Task::RainAutostart => rain.on_autostart(host, rng),
            Task::DropExpire(el) => rain.on_drop_expire(host, el),
            _ => {}
        });
    }

    #[test]
    fn test_start_creates_batch_and_tick() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut rain = RainGenerator::new(RainConfig::default());

        assert!(rain.start(&mut host, &mut rng));
        assert!(rain.is_running());
        assert!((5..=14).contains(&rain.len()));
        assert_eq!(host.repeating_timers(), 1);

        assert!(!rain.start(&mut host, &mut rng));
        assert_eq!(host.repeating_timers(), 1);
    }

    #[test]
    fn test_population_capped_after_every_tick() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut rain = RainGenerator::new(RainConfig::default());
        rain.start(&mut host, &mut rng);

        for _ in 0..100 {
            drive(&mut host, &mut rain, &mut rng, 200);
            assert!(rain.len() <= 80, "live drops {}", rain.len());
            let container = rain.container().unwrap();
            assert!(host.children(container).len() <= 80);
        }
    }

    #[test]
    fn test_stop_removes_everything_and_is_idempotent() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut rain = RainGenerator::new(RainConfig::default());
        rain.start(&mut host, &mut rng);
        drive(&mut host, &mut rain, &mut rng, 1_000);
        let container = rain.container().unwrap();

        assert!(rain.stop(&mut host));
        assert!(!rain.stop(&mut host));
        assert_eq!(rain.state(), RainState::Idle);
        assert!(!host.is_attached(container));
        assert_eq!(host.repeating_timers(), 0);

        // Leftover drop timers fire harmlessly.
        drive(&mut host, &mut rain, &mut rng, 10_000);
        assert_eq!(host.pending_timers(), 0);
        assert!(rain.is_empty());
    }

    #[test]
    fn test_stop_then_start_has_one_container_and_one_tick() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut rain = RainGenerator::new(RainConfig::default());
        rain.start(&mut host, &mut rng);
        drive(&mut host, &mut rain, &mut rng, 600);

        rain.stop(&mut host);
        rain.start(&mut host, &mut rng);

        assert!(rain.is_running());
        assert_eq!(host.query_all(None, crate::host::Selector::Id(RAIN_CONTAINER_ID)).len(), 1);
        assert_eq!(host.timers_where(|t| matches!(t, Task::RainTick)), 1);
    }

    #[test]
    fn test_delayed_start_cancelled_by_stop() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut rain = RainGenerator::new(RainConfig::default());

        rain.schedule_start(&mut host, &mut rng);
        assert!(rain.is_autostart_pending());
        rain.stop(&mut host);
        drive(&mut host, &mut rain, &mut rng, 2_000);
        assert!(!rain.is_running());

        rain.schedule_start(&mut host, &mut rng);
        drive(&mut host, &mut rain, &mut rng, 1_000);
        assert!(rain.is_running());
    }

    #[test]
    fn test_inverted_batch_range_still_generates() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut rain = RainGenerator::new(RainConfig {
            batch_min: 9,
            batch_max: 3,
            ..RainConfig::default()
        });

        assert!(rain.start(&mut host, &mut rng));
        assert!((3..=9).contains(&rain.len()));
        drive(&mut host, &mut rain, &mut rng, 1_000);
        assert!(rain.len() <= 80);
    }

    #[test]
    fn test_page_removing_container_stops_rain() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut rain = RainGenerator::new(RainConfig::default());
        rain.start(&mut host, &mut rng);
        let container = rain.container().unwrap();

        host.remove(container);
        drive(&mut host, &mut rain, &mut rng, 200);
        assert_eq!(rain.state(), RainState::Idle);
        assert!(rain.is_empty());
        assert_eq!(host.repeating_timers(), 0);

        assert!(rain.start(&mut host, &mut rng));
        assert!(host.is_attached(rain.container().unwrap()));
    }

    #[test]
    fn test_drops_expire_on_their_own() {
        let mut host = SimHost::new("/");
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut rain = RainGenerator::new(RainConfig::default());
        rain.start(&mut host, &mut rng);
        let first: Vec<ElementId> = rain.drops().map(|d| d.element).collect();

        // Longest possible fall plus delay is just under 5 s.
        drive(&mut host, &mut rain, &mut rng, 5_000);
        assert!(first.iter().all(|&el| !host.is_attached(el)));
    }
}
