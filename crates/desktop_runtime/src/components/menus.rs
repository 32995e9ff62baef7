use super::*;
use crate::menus::{MenuKind, TransientMenu};

/// Menus stack above every window regardless of window z-order.
const MENU_LAYER_Z_INDEX: u32 = 1_000_000;

#[component]
pub(super) fn MenuLayer() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let menu_ids = move || {
        runtime.wm.with(|wm| {
            wm.menus()
                .menus()
                .iter()
                .map(|menu| menu.id)
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="menu-layer">
            <For each=menu_ids key=|id| id.0 let:menu_id>
                <MenuPopup menu_id=menu_id />
            </For>
        </div>
    }
}

fn menu_class(kind: MenuKind) -> &'static str {
    match kind {
        MenuKind::Context => "menu context-menu",
        MenuKind::Start => "menu start-menu",
        MenuKind::MenuBar => "menu menubar-dropdown",
        MenuKind::Submenu => "menu submenu",
    }
}

fn menu_style(menu: &TransientMenu, depth: u32) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        menu.position.x,
        menu.position.y,
        menu.size.width,
        menu.size.height,
        MENU_LAYER_Z_INDEX + depth
    )
}

#[component]
fn MenuPopup(menu_id: MenuId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let Some(menu) = runtime.wm.with_untracked(|wm| wm.menus().get(menu_id).cloned()) else {
        return ().into_view();
    };
    let depth = runtime.wm.with_untracked(|wm| {
        let mut depth = 0;
        let mut parent = menu.parent;
        while let Some(id) = parent {
            depth += 1;
            parent = wm.menus().get(id).and_then(|m| m.parent);
        }
        depth
    });

    let rows = menu
        .items
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            MenuEntry::Separator => {
                view! { <div class="menu-separator" role="separator"></div> }.into_view()
            }
            MenuEntry::Item(item) => {
                let class_name = if item.has_submenu() {
                    "menu-item has-submenu"
                } else {
                    "menu-item"
                };
                view! {
                    <div
                        class=class_name
                        role="menuitem"
                        on:click=move |_| {
                            runtime.dispatch_action(DesktopAction::MenuItemActivated {
                                menu_id,
                                index,
                            });
                        }
                        on:mouseenter=move |_| {
                            runtime.dispatch_action(DesktopAction::MenuHoverEnter {
                                menu_id,
                                index,
                            });
                        }
                        on:mouseleave=move |_| {
                            runtime.dispatch_action(DesktopAction::MenuHoverLeave {
                                menu_id,
                                index,
                            });
                        }
                    >
                        {item
                            .icon
                            .clone()
                            .map(|icon| view! { <img class="menu-icon" src=icon alt="" /> })}
                        <span class="menu-label">{item.label.clone()}</span>
                    </div>
                }
                .into_view()
            }
        })
        .collect_view();

    view! {
        <div
            class=menu_class(menu.kind)
            role="menu"
            style=menu_style(&menu, depth)
            data-menu-id=menu_id.0.to_string()
            on:contextmenu=move |ev: web_sys::MouseEvent| stop_mouse_event(&ev)
        >
            {rows}
        </div>
    }
    .into_view()
}
