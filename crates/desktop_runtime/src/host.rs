//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! The reducer never touches the browser. Timers, window-level pointer listeners and focus moves
//! all happen here, driven by [`RuntimeEffect`] values.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc, time::Duration};

use leptos::{
    ev,
    leptos_dom::helpers::{TimeoutHandle, WindowListenerHandle},
    logging, set_timeout_with_handle, window_event_listener, Callable,
};

use crate::{
    model::{PointerPosition, TimerToken, Viewport, WindowId},
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::{DesktopRuntimeContext, HostCommandEvent},
};

#[derive(Clone, Default)]
/// Browser resources held on behalf of the reducer.
pub struct DesktopHostContext {
    timers: Rc<RefCell<BTreeMap<TimerToken, TimeoutHandle>>>,
    pointer_listeners: Rc<RefCell<Vec<WindowListenerHandle>>>,
}

impl DesktopHostContext {
    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::ScheduleTimer { token, delay_ms } => {
                self.schedule_timer(runtime, token, delay_ms)
            }
            RuntimeEffect::CancelTimer(token) => self.cancel_timer(token),
            RuntimeEffect::InstallPointerSession => self.install_pointer_session(runtime),
            RuntimeEffect::ReleasePointerSession => self.release_pointer_session(),
            RuntimeEffect::RunHostCommand { window, command } => match runtime.on_host_command {
                Some(handler) => handler.call(HostCommandEvent {
                    runtime,
                    window,
                    command,
                }),
                None => logging::log!("unhandled host command `{}`", command.as_str()),
            },
            RuntimeEffect::FocusWindowInput(window_id) => focus_window_input(window_id),
        }
    }

    fn schedule_timer(&self, runtime: DesktopRuntimeContext, token: TimerToken, delay_ms: u32) {
        let timers = self.timers.clone();
        let fire = move || {
            timers.borrow_mut().remove(&token);
            runtime.dispatch_action(DesktopAction::TimerFired { token });
        };
        match set_timeout_with_handle(fire, Duration::from_millis(u64::from(delay_ms))) {
            Ok(handle) => {
                self.timers.borrow_mut().insert(token, handle);
            }
            Err(err) => logging::warn!("schedule timer {token:?} failed: {err:?}"),
        }
    }

    fn cancel_timer(&self, token: TimerToken) {
        if let Some(handle) = self.timers.borrow_mut().remove(&token) {
            handle.clear();
        }
    }

    /// Forwards window-level pointer move/up/cancel to the reducer until released.
    fn install_pointer_session(&self, runtime: DesktopRuntimeContext) {
        self.release_pointer_session();

        let on_move = window_event_listener(ev::pointermove, move |ev| {
            runtime.dispatch_action(DesktopAction::PointerMove {
                pointer: PointerPosition {
                    x: ev.client_x(),
                    y: ev.client_y(),
                },
            });
        });
        let on_up = window_event_listener(ev::pointerup, move |_| {
            runtime.dispatch_action(DesktopAction::PointerUp);
        });
        let on_cancel = window_event_listener(ev::pointercancel, move |_| {
            runtime.dispatch_action(DesktopAction::PointerUp);
        });
        self.pointer_listeners
            .borrow_mut()
            .extend([on_move, on_up, on_cancel]);
    }

    fn release_pointer_session(&self) {
        for listener in self.pointer_listeners.borrow_mut().drain(..) {
            listener.remove();
        }
    }
}

/// Current browser viewport, taskbar included.
pub fn current_viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
                value
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
            };
            let fallback = Viewport::default();
            return Viewport {
                width: dimension(window.inner_width()).unwrap_or(fallback.width),
                height: dimension(window.inner_height()).unwrap_or(fallback.height),
            };
        }
    }

    Viewport::default()
}

/// Seed for window placement when the configuration does not fix one.
pub fn placement_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    let seed = js_sys::Date::now() as u64;
    #[cfg(not(target_arch = "wasm32"))]
    let seed = 0;
    seed
}

fn focus_window_input(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let content = format!(
            "[{}=\"{}\"] .{}",
            crate::components::WINDOW_ID_ATTRIBUTE,
            window_id.0,
            crate::chrome::class::CONTENT,
        );
        let selector = format!("{content} input, {content} textarea");
        let Ok(Some(element)) = document.query_selector(&selector) else {
            return;
        };
        let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let _ = element.focus();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = window_id;
}
