use axum::{extract::State, response::Html};

use super::AppState;

/// Base HTML template.
fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
    <link rel="stylesheet" href="/assets/styles.css">
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js" defer></script>
</head>
<body>
    <main class="container py-4">
        <h1 class="mb-4">{title}</h1>
        {content}
    </main>
    <script type="module" src="/assets/esistatus.js"></script>
</body>
</html>"#,
        title = title,
        content = content,
    )
}

/// Index page: loading placeholder, the status target region, and a
/// collapsed dashboard panel. The widget script fills both.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let widget = &state.config.widget;

    let settings = serde_json::json!({
        "url": { "esistatus": "/-/ajax/esi-status" },
        "dashboardWidget": { "ajaxUrl": "/-/ajax/dashboard-widget" },
        "pollIntervalSecs": widget.poll_interval_secs,
        "focusGated": widget.focus_gated,
    });

    let content = format!(
        r#"<div class="card mb-4">
            <div class="card-body">
                <p class="esistatus-loading text-center my-4">
                    <span class="spinner-border spinner-border-sm" role="status"></span>
                    Loading ESI status &hellip;
                </p>
                <div class="esi-status-index"></div>
            </div>
        </div>
        <div class="card">
            <div class="card-header">Dashboard widget</div>
            <div id="esi-status-dashboard-panel" class="collapse card-body"></div>
        </div>
        <script>window.esistatusSettings = {settings};</script>"#,
        settings = settings,
    );

    Html(base_template("ESI Status", &content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StatusStore;
    use esistatus_core::EsiStatusConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_index_embeds_settings_and_targets() {
        let state = AppState {
            store: StatusStore::new(),
            config: Arc::new(EsiStatusConfig::default()),
        };

        let html = index(State(state)).await.0;

        assert!(html.contains("window.esistatusSettings"));
        assert!(html.contains(r#""pollIntervalSecs":30"#));
        assert!(html.contains("esi-status-index"));
        assert!(html.contains("esistatus-loading"));
        assert!(html.contains("esi-status-dashboard-panel"));
    }
}
