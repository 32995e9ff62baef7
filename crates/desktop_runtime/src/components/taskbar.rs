use std::time::Duration;

use super::*;
use crate::{
    menus::MenuKind,
    model::TaskButtonHandle,
    taskbar::{ClockReading, TRAY_ICONS},
};

#[component]
pub(super) fn Taskbar(start_menu: StoredValue<Vec<MenuEntry>>) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let height = move || runtime.wm.with(|wm| wm.config().taskbar_height);
    let start_open = move || {
        runtime
            .wm
            .with(|wm| wm.menus().open_of_kind(MenuKind::Start).is_some())
    };
    let handles = move || {
        runtime.wm.with(|wm| {
            wm.taskbar()
                .buttons()
                .iter()
                .map(|button| button.handle)
                .collect::<Vec<_>>()
        })
    };

    let clock_now = create_rw_signal(ClockReading::now());
    let clock_interval = runtime
        .wm
        .with_untracked(|wm| wm.config().clock_update_interval_ms);
    if let Ok(interval) = set_interval_with_handle(
        move || clock_now.set(ClockReading::now()),
        Duration::from_millis(u64::from(clock_interval)),
    ) {
        on_cleanup(move || interval.clear());
    }

    view! {
        <div class="taskbar" style=move || format!("height:{}px;", height())>
            <button
                class=move || if start_open() { "start-button pressed" } else { "start-button" }
                on:click=move |_| {
                    runtime.dispatch_action(DesktopAction::ToggleStartMenu {
                        items: start_menu.get_value(),
                    });
                }
            >
                <img src="icons/windows-0.png" alt="" />
                <span>"Start"</span>
            </button>
            <div class="task-buttons">
                <For each=handles key=|handle| handle.0 let:handle>
                    <TaskButtonView handle=handle />
                </For>
            </div>
            <div class="system-tray">
                {TRAY_ICONS
                    .into_iter()
                    .map(|icon| {
                        view! {
                            <img
                                class="system-tray-icon"
                                src=icon.src
                                alt=icon.alt
                                title=icon.title
                            />
                        }
                    })
                    .collect_view()}
                <span class="system-tray-time">{move || clock_now.get().label()}</span>
            </div>
        </div>
    }
}

#[component]
fn TaskButtonView(handle: TaskButtonHandle) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let button = create_memo(move |_| {
        runtime
            .wm
            .with(|wm| wm.taskbar().button(handle).cloned())
    });

    let class_name = move || {
        let mut class_name = String::from("task-button");
        if let Some(button) = button.get() {
            if button.active {
                class_name.push_str(" active");
            }
            if button.minimized {
                class_name.push_str(" minimized");
            }
        }
        class_name
    };

    view! {
        <button
            class=class_name
            title=move || button.get().map(|b| b.label).unwrap_or_default()
            on:click=move |_| runtime.dispatch_action(DesktopAction::TaskButtonClick { handle })
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                runtime.dispatch_action(DesktopAction::TaskButtonContextMenu {
                    handle,
                    pointer: pointer_from_mouse_event(&ev),
                });
            }
        >
            <img src=move || button.get().map(|b| b.icon).unwrap_or_default() alt="" />
            <span>{move || button.get().map(|b| b.label).unwrap_or_default()}</span>
        </button>
    }
}
