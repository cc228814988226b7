//! Effect stylesheet, injected once into the document head.

use crate::host::{Placement, Selector, Surface};

/// Id of the injected `<style>` element.
pub const STYLESHEET_ID: &str = "mouse-effects-styles";

/// Container layout and keyframes for the trail, ripple and rain effects.
pub const EFFECT_CSS: &str = r"
.mouse-trail-container,
.click-effects-container {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    pointer-events: none;
    z-index: 9999;
}

.trail-dot {
    position: absolute;
    border-radius: 50%;
    pointer-events: none;
    animation: trailFadeOut 0.6s ease-out forwards;
    transform-origin: center;
    transition: opacity 0.15s ease, transform 0.15s ease;
}

@keyframes trailFadeOut {
    0% { opacity: 1; transform: scale(1); }
    70% { opacity: 0.7; transform: scale(0.9); }
    100% { opacity: 0; transform: scale(0.3); }
}

.click-effect {
    position: absolute;
    width: 20px;
    height: 20px;
    border: 2px solid;
    border-radius: 50%;
    animation: clickRipple 0.8s ease-out forwards;
    pointer-events: none;
}

@keyframes clickRipple {
    0% { transform: scale(0.8); opacity: 1; }
    50% { opacity: 0.7; }
    100% { transform: scale(2.5); opacity: 0; }
}

.rain-container {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    pointer-events: none;
    z-index: 9998;
    overflow: hidden;
}

.rain-drop {
    position: absolute;
    width: 2px;
    background: linear-gradient(to bottom, transparent, rgba(255, 255, 255, 0.6));
    animation: rainFall linear forwards;
    border-radius: 50%;
}

@keyframes rainFall {
    to { transform: translateY(100vh); }
}

.toast-stack {
    position: fixed;
    right: 1rem;
    bottom: 1rem;
    z-index: 10000;
}
";

/// Injects [`EFFECT_CSS`] unless a stylesheet with [`STYLESHEET_ID`]
/// already exists. Returns `true` when it was injected by this call.
pub fn inject<H: Surface + ?Sized>(host: &mut H) -> bool {
    if host.query_first(None, Selector::Id(STYLESHEET_ID)).is_some() {
        return false;
    }
    let Some(style) = host.create_element(Placement::Head, "style") else {
        return false;
    };
    host.set_attribute(style, "id", STYLESHEET_ID);
    host.set_text(style, EFFECT_CSS);
    tracing::debug!("effect stylesheet injected");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimHost;

    #[test]
    fn test_inject_once() {
        let mut host = SimHost::new("/");
        assert!(inject(&mut host));
        assert!(!inject(&mut host));
        assert_eq!(host.children(host.head()).len(), 1);
    }
}
