//! Browser implementations of the platform capabilities

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{Clock, FrameHandle, FrameScheduler};

/// `performance.now()`, falling back to `Date.now()`
#[derive(Debug, Clone, Default)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

/// `requestAnimationFrame` driven frames.
///
/// Every request invokes `on_frame` with the frame timestamp.
pub struct AnimationFrames {
    on_frame: Rc<dyn Fn(f64)>,
}

impl AnimationFrames {
    pub fn new(on_frame: impl Fn(f64) + 'static) -> Self {
        Self {
            on_frame: Rc::new(on_frame),
        }
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let Some(window) = web_sys::window() else {
            log::warn!("No window, frame request dropped");
            return FrameHandle(0);
        };

        let on_frame = self.on_frame.clone();
        // Freed by wasm-bindgen after its single call
        let callback = Closure::once_into_js(move |time: f64| on_frame(time));

        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => FrameHandle(id as u32),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0 as i32);
        }
    }
}
