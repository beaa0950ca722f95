use axum::http::header;
use axum::response::IntoResponse;

/// Stylesheet for the status page.
const STYLES_CSS: &str = r#"/* ESI status page */

.esi-status-summary p {
    color: var(--bs-secondary-color);
}

.esi-status-group .card-title {
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
}

.esi-status-group .progress {
    margin-bottom: 0.5rem;
}

.esi-status-widget-groups li {
    margin-bottom: 0.25rem;
}

.esi-status-troubled {
    margin: 0;
    padding-left: 1rem;
    text-align: left;
}
"#;

/// Loader for the wasm widget bundle.
///
/// The bundle itself (wasm-bindgen output) is served from the configured
/// `widget_dist_dir` under `/assets/widget/`.
const WIDGET_JS: &str = r#"import init, { mount_status_index, mount_dashboard_widget } from '/assets/widget/esistatus_widget.js';

const boot = async () => {
    await init();

    const settings = window.esistatusSettings;

    mount_status_index(settings);
    mount_dashboard_widget(settings);
};

boot().catch((error) => {
    console.error('Failed to start ESI status widget', error);
});
"#;

pub async fn styles_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    )
}

pub async fn widget_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        WIDGET_JS,
    )
}
