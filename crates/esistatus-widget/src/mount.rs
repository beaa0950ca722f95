//! wasm-bindgen entry points wiring the refresher to the page.

use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use esistatus_core::refresh::StatusRefresher;

use crate::dom::DomPanel;
use crate::fetch::HttpFragmentSource;
use crate::settings::WidgetSettings;

type Refresher = StatusRefresher<DomPanel, Interval>;

/// Mount the one-shot index panel: a single refresh at load, tooltips
/// attached, no repeating schedule.
#[wasm_bindgen]
pub fn mount_status_index(settings: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let settings = parse_settings(settings)?;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };

    // A page without the index region has nothing to mount.
    let Some(panel) = DomPanel::mount(&document, ".esi-status-index") else {
        return Ok(());
    };
    let panel = panel.with_loading(".esistatus-loading");

    let refresher: Rc<Refresher> = Rc::new(StatusRefresher::new(panel));
    let source = HttpFragmentSource::new(settings.url.esistatus);

    spawn_local(async move {
        refresher.refresh(&source).await;
    });

    Ok(())
}

/// Mount the dashboard widget: immediate refresh plus a repeating
/// schedule, revealed on first content, focus-gated when configured.
#[wasm_bindgen]
pub fn mount_dashboard_widget(settings: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let settings = parse_settings(settings)?;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };

    let Some(panel) = DomPanel::mount(&document, "#esi-status-dashboard-panel") else {
        return Ok(());
    };
    let panel = panel.with_reveal();

    let refresher: Rc<Refresher> = Rc::new(StatusRefresher::new(panel));
    let source = Rc::new(HttpFragmentSource::new(settings.dashboard_widget.ajax_url));
    let interval_ms = settings.poll_interval_ms();

    activate(&refresher, &source, interval_ms);

    if settings.focus_gated {
        install_focus_gating(&refresher, &source, interval_ms)?;
    }

    Ok(())
}

fn parse_settings(settings: JsValue) -> Result<WidgetSettings, JsValue> {
    serde_wasm_bindgen::from_value(settings)
        .map_err(|err| JsValue::from_str(&format!("Invalid esistatusSettings: {err}")))
}

/// Activate the refresher: the interval handle lives inside it, so a
/// repeated activation (e.g. repeated focus events) replaces rather than
/// stacks schedules.
fn activate(refresher: &Rc<Refresher>, source: &Rc<HttpFragmentSource>, interval_ms: u32) {
    let refresher = Rc::clone(refresher);
    let source = Rc::clone(source);

    spawn_local(async move {
        let tick_refresher = Rc::clone(&refresher);
        let tick_source = Rc::clone(&source);

        refresher
            .activate(source.as_ref(), move || {
                Interval::new(interval_ms, move || {
                    let refresher = Rc::clone(&tick_refresher);
                    let source = Rc::clone(&tick_source);

                    spawn_local(async move {
                        refresher.refresh(source.as_ref()).await;
                    });
                })
            })
            .await;
    });
}

/// Poll only while the tab has focus.
fn install_focus_gating(
    refresher: &Rc<Refresher>,
    source: &Rc<HttpFragmentSource>,
    interval_ms: u32,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let on_focus = {
        let refresher = Rc::clone(refresher);
        let source = Rc::clone(source);

        Closure::<dyn FnMut()>::new(move || {
            activate(&refresher, &source, interval_ms);
        })
    };
    window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())?;
    on_focus.forget();

    let on_blur = {
        let refresher = Rc::clone(refresher);

        Closure::<dyn FnMut()>::new(move || {
            refresher.deactivate();
        })
    };
    window.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())?;
    on_blur.forget();

    Ok(())
}
