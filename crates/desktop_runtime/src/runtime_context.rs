//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived window manager signal, the runtime effect queue, and the host
//! resources the effects act on. UI composition stays in [`crate::components`].

use leptos::*;

use crate::{
    components::ContentRegistry,
    config::WmConfig,
    effect_executor,
    host::{self, DesktopHostContext},
    menus::HostCommand,
    model::WindowId,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_manager::WindowManager,
};

#[derive(Clone)]
/// A menu command the window manager does not run itself.
pub struct HostCommandEvent {
    pub runtime: DesktopRuntimeContext,
    /// Window the menu acted on, if it belonged to one.
    pub window: Option<WindowId>,
    pub command: HostCommand,
}

pub type HostCommandHandler = Callback<HostCommandEvent>;

#[derive(Clone, Copy)]
/// Leptos context for reading window manager state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Timers and pointer listeners owned on behalf of the reducer.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive window manager state.
    pub wm: RwSignal<WindowManager>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Window content builders, keyed by content handle.
    pub content: StoredValue<ContentRegistry>,
    pub on_host_command: Option<HostCommandHandler>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Window manager configuration; defaults apply when omitted.
    #[prop(optional)]
    config: Option<WmConfig>,
    /// Builders for the content of windows opened through this provider.
    #[prop(optional)]
    content: ContentRegistry,
    /// Handler for host commands coming out of menus.
    #[prop(optional, into)]
    on_host_command: Option<HostCommandHandler>,
    children: Children,
) -> impl IntoView {
    let mut config = config.unwrap_or_default();
    if let Err(err) = config.validate() {
        logging::warn!("{err}; falling back to default window manager config");
        config = WmConfig::default();
    }
    if config.placement_seed.is_none() {
        config.placement_seed = Some(host::placement_seed());
    }

    let wm = create_rw_signal(WindowManager::new(config, host::current_viewport()));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut next = wm.get_untracked();
        match reduce_desktop(&mut next, action) {
            Ok(new_effects) => {
                wm.set(next);
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host: store_value(DesktopHostContext::default()),
        wm,
        effects,
        content: store_value(content),
        on_host_command,
        dispatch,
    };

    provide_context(runtime);
    effect_executor::install(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
