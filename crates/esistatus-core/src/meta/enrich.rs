use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::status::EsiRoute;

static PATH_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/}]+\}").expect("path parameter pattern is valid"));

/// Fill each route's tags from the matching OpenAPI path operation.
///
/// Matching cascade per route: exact path, then candidates sharing the same
/// parameter-normalized template, then a full regex scan over all templates.
/// Routes without a match keep an empty tag list.
pub fn enrich_routes_with_tags(
    mut routes: Vec<EsiRoute>,
    openapi: &serde_json::Value,
) -> Vec<EsiRoute> {
    let Some(paths) = openapi.get("paths").and_then(|p| p.as_object()) else {
        tracing::debug!("OpenAPI spec has no paths object, nothing to enrich");
        return routes;
    };

    // Normalized template -> candidate templates, for cheap candidate lookup
    let mut normalized_map: HashMap<String, Vec<&String>> = HashMap::new();
    for template in paths.keys() {
        normalized_map
            .entry(normalize_template(template))
            .or_default()
            .push(template);
    }

    let mut enriched = 0usize;

    for route in &mut routes {
        let Some(template) = find_matching_template(&route.path, paths, &normalized_map) else {
            continue;
        };

        route.tags = extract_tags(&paths[template], &route.method);

        if !route.tags.is_empty() {
            enriched += 1;
        }
    }

    tracing::debug!(enriched, total = routes.len(), "Enriched routes with OpenAPI tags");

    routes
}

/// Replace path parameters with `{}` so templates differing only in
/// parameter names compare equal.
fn normalize_template(template: &str) -> String {
    PATH_PARAM_RE.replace_all(template, "{}").into_owned()
}

/// Build an anchored regex matching concrete paths against a template.
fn template_regex(template: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    let mut last = 0;

    for m in PATH_PARAM_RE.find_iter(template) {
        pattern.push_str(&regex_lite::escape(&template[last..m.start()]));
        pattern.push_str("[^/]+");
        last = m.end();
    }

    pattern.push_str(&regex_lite::escape(&template[last..]));
    pattern.push('$');

    Regex::new(&pattern).ok()
}

fn find_matching_template<'a>(
    route_path: &str,
    paths: &'a serde_json::Map<String, serde_json::Value>,
    normalized_map: &HashMap<String, Vec<&'a String>>,
) -> Option<&'a String> {
    if let Some((template, _)) = paths.get_key_value(route_path) {
        return Some(template);
    }

    let normalized = normalize_template(route_path);

    if let Some(candidates) = normalized_map.get(&normalized) {
        if let [only] = candidates.as_slice() {
            return Some(only);
        }

        for candidate in candidates {
            if template_regex(candidate).is_some_and(|re| re.is_match(route_path)) {
                return Some(candidate);
            }
        }
    }

    paths
        .keys()
        .find(|template| template_regex(template).is_some_and(|re| re.is_match(route_path)))
}

/// Tags of the operation matching the route's method, falling back to any
/// operation on the path item that carries tags.
fn extract_tags(path_item: &serde_json::Value, method: &str) -> Vec<String> {
    let Some(item) = path_item.as_object() else {
        return Vec::new();
    };

    if let Some(tags) = item
        .get(&method.to_lowercase())
        .and_then(|op| op.get("tags"))
        .and_then(tags_from_value)
    {
        return tags;
    }

    item.values()
        .filter_map(|op| op.get("tags"))
        .find_map(tags_from_value)
        .unwrap_or_default()
}

fn tags_from_value(value: &serde_json::Value) -> Option<Vec<String>> {
    let tags: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(|t| t.as_str().map(str::to_string))
        .collect();

    Some(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::RouteHealth;
    use serde_json::json;

    fn route(method: &str, path: &str) -> EsiRoute {
        EsiRoute {
            method: method.to_string(),
            path: path.to_string(),
            status: RouteHealth::Green,
            tags: Vec::new(),
        }
    }

    fn openapi() -> serde_json::Value {
        json!({
            "paths": {
                "/alliances": {
                    "get": {"tags": ["Alliance"]}
                },
                "/characters/{character_id}/assets": {
                    "get": {"tags": ["Assets"]},
                    "parameters": [{"name": "character_id"}]
                },
                "/universe/names": {
                    "post": {"tags": ["Universe"]}
                }
            }
        })
    }

    #[test]
    fn test_exact_match() {
        let routes = enrich_routes_with_tags(vec![route("get", "/alliances")], &openapi());
        assert_eq!(routes[0].tags, vec!["Alliance"]);
    }

    #[test]
    fn test_normalized_template_match() {
        // Same template shape, different parameter name
        let routes = enrich_routes_with_tags(
            vec![route("get", "/characters/{char_id}/assets")],
            &openapi(),
        );
        assert_eq!(routes[0].tags, vec!["Assets"]);
    }

    #[test]
    fn test_concrete_path_matches_template() {
        let routes =
            enrich_routes_with_tags(vec![route("get", "/characters/90000001/assets")], &openapi());
        assert_eq!(routes[0].tags, vec!["Assets"]);
    }

    #[test]
    fn test_method_fallback_to_other_operation() {
        // No "delete" operation on the path item; falls back to the tagged one
        let routes = enrich_routes_with_tags(vec![route("delete", "/universe/names")], &openapi());
        assert_eq!(routes[0].tags, vec!["Universe"]);
    }

    #[test]
    fn test_unmatched_route_keeps_empty_tags() {
        let routes = enrich_routes_with_tags(vec![route("get", "/no/such/route")], &openapi());
        assert!(routes[0].tags.is_empty());
    }

    #[test]
    fn test_missing_paths_object() {
        let routes = enrich_routes_with_tags(vec![route("get", "/alliances")], &json!({}));
        assert!(routes[0].tags.is_empty());
    }

    #[test]
    fn test_template_regex_escapes_literals() {
        let re = template_regex("/meta/openapi.json").unwrap();
        assert!(re.is_match("/meta/openapi.json"));
        assert!(!re.is_match("/meta/openapiXjson"));
    }
}
