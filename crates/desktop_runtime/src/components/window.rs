use super::*;
use crate::{
    chrome::{class, ChromePart, ChromeTarget, MaximizeGlyph},
    model::{PointerButton, WindowRect},
};

#[cfg(target_arch = "wasm32")]
fn current_target_rect(ev: &web_sys::MouseEvent) -> Option<WindowRect> {
    use wasm_bindgen::JsCast;

    let element = ev.current_target()?.dyn_into::<web_sys::Element>().ok()?;
    let rect = element.get_bounding_client_rect();
    Some(WindowRect::new(
        rect.left() as i32,
        rect.top() as i32,
        rect.width() as i32,
        rect.height() as i32,
    ))
}

#[cfg(not(target_arch = "wasm32"))]
fn current_target_rect(_: &web_sys::MouseEvent) -> Option<WindowRect> {
    None
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let record = create_memo(move |_| runtime.wm.with(|wm| wm.window(window_id).cloned()));
    let chrome = create_memo(move |_| {
        runtime
            .wm
            .with(|wm| wm.chrome().get(window_id).cloned())
    });

    let press = move |part: ChromePart| {
        move |ev: web_sys::PointerEvent| {
            ev.stop_propagation();
            let button = PointerButton::from_dom(ev.button());
            if button == PointerButton::Primary && !part.blocks_drag() && part != ChromePart::Frame
            {
                ev.prevent_default();
            }
            runtime.dispatch_action(DesktopAction::ChromePointerDown {
                target: ChromeTarget::new(window_id, part),
                pointer: PointerPosition {
                    x: ev.client_x(),
                    y: ev.client_y(),
                },
                button,
            });
        }
    };
    let control = move |part: ChromePart| {
        move |_: web_sys::MouseEvent| {
            runtime.dispatch_action(DesktopAction::ChromeClick {
                target: ChromeTarget::new(window_id, part),
            });
        }
    };
    let title_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::ChromeDoubleClick {
            target: ChromeTarget::new(window_id, ChromePart::TitleBar),
        });
    };
    let open_menu_bar = move |index: usize| {
        move |ev: web_sys::MouseEvent| {
            let item_rect = current_target_rect(&ev).unwrap_or_else(|| {
                let origin = record
                    .get_untracked()
                    .map(|w| w.bounds)
                    .unwrap_or(WindowRect::new(0, 0, 0, 0));
                WindowRect::new(origin.x + 4 + index as i32 * 48, origin.y + 40, 48, 18)
            });
            runtime.dispatch_action(DesktopAction::OpenMenuBar {
                window_id,
                index,
                item_rect,
            });
        }
    };

    let frame_class = move || {
        let active = chrome.get().is_some_and(|c| c.active);
        if active {
            format!("{} {}", class::WINDOW, class::ACTIVE)
        } else {
            class::WINDOW.to_string()
        }
    };
    let frame_style = move || {
        let Some(win) = record.get() else {
            return "display:none;".to_string();
        };
        let hidden = chrome.get().map(|c| c.hidden).unwrap_or(false);
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};{}",
            win.bounds.x,
            win.bounds.y,
            win.bounds.w,
            win.bounds.h,
            win.z_order,
            if hidden { "display:none;" } else { "" }
        )
    };
    let glyph = move || {
        chrome
            .get()
            .map(|c| c.maximize_glyph)
            .unwrap_or(MaximizeGlyph::Maximize)
    };

    let initial = chrome.get_untracked();
    let icon = initial.as_ref().map(|c| c.icon.clone()).unwrap_or_default();
    let resize_handles = initial
        .as_ref()
        .map(|c| c.resize_handles().to_vec())
        .unwrap_or_default();
    let menu_labels: Option<Vec<String>> = initial.and_then(|c| {
        c.menu_bar
            .map(|bar| bar.into_iter().map(|entry| entry.label).collect())
    });
    let content = record
        .get_untracked()
        .map(|win| runtime.content.with_value(|registry| registry.render(win.content, window_id)));

    view! {
        <div
            class=frame_class
            style=frame_style
            data-window-id=window_id.0.to_string()
            on:pointerdown=press(ChromePart::Frame)
            on:contextmenu=move |ev: web_sys::MouseEvent| stop_mouse_event(&ev)
        >
            <div
                class=ChromePart::TitleBar.class_name()
                on:pointerdown=press(ChromePart::TitleBar)
                on:dblclick=title_double_click
            >
                <img class=ChromePart::Icon.class_name() src=icon alt="" />
                <span class=ChromePart::Title.class_name()>
                    {move || chrome.get().map(|c| c.title).unwrap_or_default()}
                </span>
                <div class=class::CONTROLS>
                    <button
                        class=ChromePart::MinimizeControl.class_name()
                        aria-label="Minimize"
                        on:pointerdown=press(ChromePart::MinimizeControl)
                        on:click=control(ChromePart::MinimizeControl)
                    >
                        <img src="icons/minimize.svg" alt="" />
                    </button>
                    <button
                        class=ChromePart::MaximizeControl.class_name()
                        aria-label=move || glyph().label()
                        on:pointerdown=press(ChromePart::MaximizeControl)
                        on:click=control(ChromePart::MaximizeControl)
                    >
                        <img src=move || glyph().icon_src() alt="" />
                    </button>
                    <button
                        class=ChromePart::CloseControl.class_name()
                        aria-label="Close"
                        on:pointerdown=press(ChromePart::CloseControl)
                        on:click=control(ChromePart::CloseControl)
                    >
                        <img src="icons/close.svg" alt="" />
                    </button>
                </div>
            </div>
            {menu_labels.map(|labels| {
                view! {
                    <div
                        class=ChromePart::MenuBar.class_name()
                        on:pointerdown=press(ChromePart::MenuBar)
                    >
                        {labels
                            .into_iter()
                            .enumerate()
                            .map(|(index, label)| {
                                view! {
                                    <span
                                        class=ChromePart::MenuBarItem(index).class_name()
                                        on:pointerdown=press(ChromePart::MenuBarItem(index))
                                        on:click=open_menu_bar(index)
                                    >
                                        {label}
                                    </span>
                                }
                            })
                            .collect_view()}
                    </div>
                }
            })}
            <div class=ChromePart::Content.class_name()>{content}</div>
            {resize_handles
                .into_iter()
                .map(|part| {
                    view! {
                        <div
                            class=part.class_name()
                            aria-hidden="true"
                            on:pointerdown=press(part)
                        />
                    }
                })
                .collect_view()}
        </div>
    }
}
