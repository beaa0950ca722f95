use axum::{extract::State, response::Html};

use esistatus_core::meta::{RouteHealth, StatusSnapshot, TagGroup};
use esistatus_core::refresh::TOOLTIP_MARKER;

use super::AppState;

/// Fragment for the index page.
///
/// Empty until the first snapshot is published; the widget treats an empty
/// body as "nothing to show yet" and leaves the page untouched.
pub async fn ajax_esi_status(State(state): State<AppState>) -> Html<String> {
    Html(esi_status_fragment(state.store.snapshot().await.as_ref()))
}

/// Fragment for the dashboard widget.
pub async fn ajax_dashboard_widget(State(state): State<AppState>) -> Html<String> {
    Html(dashboard_widget_fragment(
        state.store.snapshot().await.as_ref(),
    ))
}

/// Render the full status fragment: summary line plus one card per tag group.
pub fn esi_status_fragment(snapshot: Option<&StatusSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return String::new();
    };

    let cards: String = snapshot.tag_groups().iter().map(group_card).collect();

    format!(
        r#"<div class="esi-status-summary mb-3">
    <p class="mb-0">{total} endpoints &middot; compatibility date {date} &middot; checked {checked} UTC</p>
</div>
<div class="row esi-status-groups">
{cards}</div>"#,
        total = snapshot.total_endpoints(),
        date = snapshot.compatibility_date,
        checked = snapshot.fetched_at.format("%Y-%m-%d %H:%M"),
        cards = cards,
    )
}

/// Render the condensed fragment for the collapsible dashboard panel.
pub fn dashboard_widget_fragment(snapshot: Option<&StatusSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return String::new();
    };

    let rows: String = snapshot.tag_groups().iter().map(widget_row).collect();

    format!(
        r#"<div class="esi-status-widget">
    <p class="small text-muted mb-2">{total} endpoints &middot; {date}</p>
    <ul class="list-unstyled esi-status-widget-groups mb-0">
{rows}    </ul>
</div>"#,
        total = snapshot.total_endpoints(),
        date = snapshot.compatibility_date,
        rows = rows,
    )
}

fn group_card(group: &TagGroup<'_>) -> String {
    let pct = group.green_percent();

    format!(
        r#"    <div class="col-sm-6 col-lg-4 mb-3">
        <div class="card esi-status-group h-100">
            <div class="card-body">
                <h6 class="card-title">{tag}
                    <span class="badge text-bg-{badge} float-end"{tooltip}>{pct:.1}%</span>
                </h6>
                <div class="progress" style="height: 0.5rem;">
                    <div class="progress-bar bg-{badge}" style="width: {pct:.1}%;"></div>
                </div>
                <small class="text-muted">{green} green &middot; {yellow} yellow &middot; {red} red</small>
            </div>
        </div>
    </div>
"#,
        tag = escape_html(group.tag),
        badge = group.overall().css_class(),
        pct = pct,
        tooltip = tooltip_attrs(group),
        green = group.count(RouteHealth::Green),
        yellow = group.count(RouteHealth::Yellow),
        red = group.count(RouteHealth::Red),
    )
}

fn widget_row(group: &TagGroup<'_>) -> String {
    format!(
        "        <li><span class=\"badge text-bg-{badge}\"{tooltip}>{green}/{total}</span> {tag}</li>\n",
        badge = group.overall().css_class(),
        tooltip = tooltip_attrs(group),
        green = group.count(RouteHealth::Green),
        total = group.routes.len(),
        tag = escape_html(group.tag),
    )
}

/// Tooltip attributes listing the group's non-green routes; empty when the
/// whole group is healthy.
fn tooltip_attrs(group: &TagGroup<'_>) -> String {
    let troubled = group.troubled();

    if troubled.is_empty() {
        return String::new();
    }

    let items: String = troubled
        .iter()
        .map(|route| {
            format!(
                "<li><code>{} {}</code> {}</li>",
                escape_html(&route.method.to_uppercase()),
                escape_html(&route.path),
                route.status,
            )
        })
        .collect();

    let title = format!("<ul class='esi-status-troubled'>{}</ul>", items);

    format!(
        " data-bs-tooltip=\"{}\" data-bs-toggle=\"tooltip\" data-bs-html=\"true\" title=\"{}\"",
        TOOLTIP_MARKER,
        escape_html(&title),
    )
}

/// Minimal HTML escaping for text and attribute values.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use esistatus_core::meta::EsiRoute;

    fn route(method: &str, path: &str, status: RouteHealth, tags: &[&str]) -> EsiRoute {
        EsiRoute {
            method: method.to_string(),
            path: path.to_string(),
            status,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot::new(
            NaiveDate::from_ymd_opt(2025, 11, 6).unwrap(),
            vec![
                route("get", "/alliances", RouteHealth::Green, &["Alliance"]),
                route(
                    "get",
                    "/characters/{character_id}/",
                    RouteHealth::Yellow,
                    &["Character"],
                ),
            ],
        )
    }

    #[test]
    fn test_no_snapshot_renders_empty() {
        assert_eq!(esi_status_fragment(None), "");
        assert_eq!(dashboard_widget_fragment(None), "");
    }

    #[test]
    fn test_fragment_contains_groups_and_summary() {
        let html = esi_status_fragment(Some(&snapshot()));

        assert!(html.contains("2 endpoints"));
        assert!(html.contains("2025-11-06"));
        assert!(html.contains("Alliance"));
        assert!(html.contains("Character"));
    }

    #[test]
    fn test_troubled_group_gets_tooltip_anchor() {
        let html = esi_status_fragment(Some(&snapshot()));

        // Only the Character group has a non-green route
        assert_eq!(html.matches("data-bs-tooltip=\"aa-esi-status\"").count(), 1);
        assert!(html.contains("data-bs-html=\"true\""));
    }

    #[test]
    fn test_tooltip_title_is_escaped() {
        let html = esi_status_fragment(Some(&snapshot()));

        assert!(html.contains("&lt;ul class='esi-status-troubled'&gt;"));
        assert!(html.contains("GET /characters/{character_id}/"));
    }

    #[test]
    fn test_healthy_group_has_no_tooltip() {
        let all_green = StatusSnapshot::new(
            NaiveDate::from_ymd_opt(2025, 11, 6).unwrap(),
            vec![route("get", "/alliances", RouteHealth::Green, &["Alliance"])],
        );

        let html = esi_status_fragment(Some(&all_green));
        assert!(!html.contains("data-bs-tooltip"));
        assert!(html.contains("100.0%"));
    }

    #[test]
    fn test_widget_fragment_is_condensed() {
        let html = dashboard_widget_fragment(Some(&snapshot()));

        assert!(html.contains("esi-status-widget-groups"));
        assert!(html.contains("1/1"));
        assert!(!html.contains("progress-bar"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;"
        );
    }
}
