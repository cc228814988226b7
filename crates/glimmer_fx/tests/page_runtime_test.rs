//! Integration tests: a whole page driven through `PageRuntime` with
//! simulated time.

use glimmer_fx::effects::rain::{RAIN_CONTAINER_ID, RAIN_DROP_CLASS};
use glimmer_fx::effects::trail::TRAIL_DOT_CLASS;
use glimmer_fx::host::{ElementId, EventTarget, Placement, Selector, Surface};
use glimmer_fx::page::flash::{FLASH_CLASS, FLASH_CLOSE_CLASS};
use glimmer_fx::page::form::{FEEDBACK_CLASS, INVALID_CLASS};
use glimmer_fx::page::search::{CARD_CLASS, SEARCH_INPUT_ID};
use glimmer_fx::{EffectsConfig, Event, EventOutcome, PageRuntime, SimHost, Task};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn config() -> EffectsConfig {
    EffectsConfig {
        seed: Some(42),
        ..EffectsConfig::default()
    }
}

fn loaded(path: &str) -> (SimHost, PageRuntime) {
    let mut host = SimHost::new(path);
    let mut runtime = PageRuntime::new(config(), &host);
    runtime.on_page_load(&mut host);
    (host, runtime)
}

fn run(host: &mut SimHost, runtime: &mut PageRuntime, ms: u32) {
    host.advance(ms, |host, task| runtime.fire(host, task));
}

fn count(host: &mut SimHost, class: &str) -> usize {
    host.query_all(None, Selector::Class(class)).len()
}

// =============================================================================
// Trail
// =============================================================================

#[test]
fn test_trail_never_exceeds_cap() {
    let (mut host, mut runtime) = loaded("/posts");
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for _ in 0..3_000 {
        let x = rng.gen_range(0.0..1920.0);
        let y = rng.gen_range(0.0..1080.0);
        runtime.handle_event(&mut host, Event::PointerMove { x, y });
        run(&mut host, &mut runtime, rng.gen_range(1..20));
        assert!(runtime.pointer().trail().len() <= 15);
    }
}

#[test]
fn test_trail_empties_when_pointer_rests() {
    let (mut host, mut runtime) = loaded("/posts");
    for step in 0..200 {
        let pos = f64::from(step) * 3.0;
        runtime.handle_event(&mut host, Event::PointerMove { x: pos, y: pos });
        run(&mut host, &mut runtime, 10);
    }
    assert!(count(&mut host, TRAIL_DOT_CLASS) > 0);

    run(&mut host, &mut runtime, 2_000);
    assert!(runtime.pointer().trail().is_empty());
    assert_eq!(count(&mut host, TRAIL_DOT_CLASS), 0);
}

#[test]
fn test_pointer_leave_clears_at_once() {
    let (mut host, mut runtime) = loaded("/posts");
    for step in 0..20 {
        runtime.handle_event(&mut host, Event::PointerMove { x: f64::from(step), y: 0.0 });
        run(&mut host, &mut runtime, 10);
    }
    runtime.handle_event(&mut host, Event::PointerLeave);
    assert!(runtime.pointer().trail().is_empty());

    // Markers evicted earlier finish their fade.
    run(&mut host, &mut runtime, 200);
    assert_eq!(count(&mut host, TRAIL_DOT_CLASS), 0);
}

#[test]
fn test_click_ripple_expires() {
    let (mut host, mut runtime) = loaded("/posts");
    let outcome = runtime.handle_event(
        &mut host,
        Event::Click {
            target: EventTarget::Document,
            x: 100.0,
            y: 50.0,
        },
    );
    assert_eq!(outcome, EventOutcome::Continue);
    assert_eq!(runtime.pointer().ripple().live().len(), 1);

    run(&mut host, &mut runtime, 800);
    assert!(runtime.pointer().ripple().live().is_empty());
}

// =============================================================================
// Rain
// =============================================================================

#[test]
fn test_rain_population_capped_after_every_tick() {
    let (mut host, mut runtime) = loaded("/about");
    assert!(runtime.start_rain(&mut host));

    for _ in 0..100 {
        run(&mut host, &mut runtime, 200);
        assert!(runtime.rain().len() <= 80);
        assert!(count(&mut host, RAIN_DROP_CLASS) <= 80);
    }
}

#[test]
fn test_stop_then_start_has_one_container_and_tick() {
    let (mut host, mut runtime) = loaded("/about");
    runtime.start_rain(&mut host);
    run(&mut host, &mut runtime, 1_000);
    assert!(runtime.stop_rain(&mut host));
    assert!(runtime.start_rain(&mut host));
    assert!(!runtime.start_rain(&mut host));

    assert!(runtime.rain().is_running());
    assert_eq!(host.query_all(None, Selector::Id(RAIN_CONTAINER_ID)).len(), 1);
    assert_eq!(host.timers_where(|t| matches!(t, Task::RainTick)), 1);
}

#[test]
fn test_everything_detaches_under_toggling() {
    let (mut host, mut runtime) = loaded("/");
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for _ in 0..200 {
        match rng.gen_range(0..4) {
            0 => {
                runtime.start_rain(&mut host);
            }
            1 => {
                runtime.stop_rain(&mut host);
            }
            _ => {
                let x = rng.gen_range(0.0..800.0);
                runtime.handle_event(&mut host, Event::PointerMove { x, y: x });
            }
        }
        run(&mut host, &mut runtime, rng.gen_range(1..300));
    }

    runtime.stop_rain(&mut host);
    run(&mut host, &mut runtime, 10_000);
    assert_eq!(count(&mut host, RAIN_DROP_CLASS), 0);
    assert_eq!(count(&mut host, TRAIL_DOT_CLASS), 0);
    // Only the trail sweep stays armed.
    assert_eq!(host.pending_timers(), 1);
}

// =============================================================================
// Page utilities
// =============================================================================

struct Blog {
    host: SimHost,
    input: ElementId,
    cards: Vec<ElementId>,
}

fn blog() -> Blog {
    let mut host = SimHost::new("/posts");
    let input = host.append(Placement::Body, "input", "", "").unwrap();
    host.set_attribute(input, "id", SEARCH_INPUT_ID);
    let posts = [
        ("Async Rust", "Futures and executors", "Ada"),
        ("Lifetimes", "Borrowing explained", "Grace"),
        ("Macros", "Declarative and procedural", "Linus"),
    ];
    let cards = posts
        .iter()
        .map(|&(title, content, author)| {
            let card = host.append(Placement::Body, "article", CARD_CLASS, "").unwrap();
            host.append(Placement::Child(card), "h3", "post-title", title).unwrap();
            host.append(Placement::Child(card), "p", "post-content", content).unwrap();
            host.append(Placement::Child(card), "span", "post-author", author).unwrap();
            card
        })
        .collect();
    Blog { host, input, cards }
}

fn search(blog: &mut Blog, runtime: &mut PageRuntime, query: &str) -> Vec<bool> {
    runtime.handle_event(
        &mut blog.host,
        Event::Input {
            target: blog.input,
            value: query.to_owned(),
        },
    );
    run(&mut blog.host, runtime, 400);
    blog.cards
        .iter()
        .map(|&card| blog.host.style(card, "display").as_deref() == Some("block"))
        .collect()
}

#[test]
fn test_search_shows_hides_and_restores() {
    let mut blog = blog();
    let mut runtime = PageRuntime::new(config(), &blog.host);
    runtime.on_page_load(&mut blog.host);
    assert!(runtime.search().is_active());

    assert_eq!(search(&mut blog, &mut runtime, "zzz"), [false, false, false]);
    assert_eq!(search(&mut blog, &mut runtime, "  GRACE "), [false, true, false]);
    assert_eq!(search(&mut blog, &mut runtime, ""), [true, true, true]);
    assert_eq!(blog.host.style(blog.cards[0], "opacity").as_deref(), Some("1"));
}

#[test]
fn test_form_blocks_and_annotates_only_empty_field() {
    let mut host = SimHost::new("/contact");
    let form = host.append(Placement::Body, "form", "", "").unwrap();
    let name = host.append(Placement::Child(form), "input", "", "").unwrap();
    let message = host.append(Placement::Child(form), "textarea", "", "").unwrap();
    host.set_attribute(name, "required", "");
    host.set_attribute(message, "required", "");
    host.set_value(name, "Ada");

    let mut runtime = PageRuntime::new(config(), &host);
    runtime.on_page_load(&mut host);

    let outcome = runtime.handle_event(&mut host, Event::Submit { target: form });
    assert_eq!(outcome, EventOutcome::PreventDefault);
    assert!(host.has_class(message, INVALID_CLASS));
    assert!(!host.has_class(name, INVALID_CLASS));
    assert_eq!(count(&mut host, FEEDBACK_CLASS), 1);
    assert_eq!(runtime.toasts().live().len(), 1);

    host.set_value(message, "Hello");
    let outcome = runtime.handle_event(&mut host, Event::Submit { target: form });
    assert_eq!(outcome, EventOutcome::Continue);
    assert_eq!(count(&mut host, FEEDBACK_CLASS), 0);

    run(&mut host, &mut runtime, 3_000);
    assert!(runtime.toasts().live().is_empty());
}

#[test]
fn test_flash_close_click_dismisses_early() {
    let mut host = SimHost::new("/posts");
    let message = host.append(Placement::Body, "div", FLASH_CLASS, "Saved").unwrap();
    let close = host.append(Placement::Child(message), "button", FLASH_CLOSE_CLASS, "x").unwrap();
    let mut runtime = PageRuntime::new(config(), &host);
    runtime.on_page_load(&mut host);
    let timer = runtime.flash().auto_dismiss_timer(message).unwrap();

    runtime.handle_event(
        &mut host,
        Event::Click {
            target: EventTarget::Element(close),
            x: 0.0,
            y: 0.0,
        },
    );
    assert!(!host.is_scheduled(timer));
    run(&mut host, &mut runtime, 500);
    assert!(!host.is_attached(message));
    assert!(runtime.flash().is_empty());
}

#[test]
fn test_bare_page_is_silent() {
    let (mut host, mut runtime) = loaded("/nothing-here");
    assert!(!runtime.search().is_active());
    assert!(runtime.flash().is_empty());
    let outcome = runtime.handle_event(
        &mut host,
        Event::Input {
            target: ElementId(999),
            value: "x".to_owned(),
        },
    );
    assert_eq!(outcome, EventOutcome::Continue);
}
