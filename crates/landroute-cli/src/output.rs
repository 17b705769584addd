//! Output formatting for command results.
//!
//! Every formatter returns a `String` so command handlers only decide where to
//! print, and tests can check the rendering directly.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use landroute_lib::{CountryDataset, Route, RouteEnvelope};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Outcome of resolving one raw identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub input: String,
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Response body for a shortest-route query.
#[derive(Debug, Clone, Serialize)]
pub struct ShortestRouteBody<'a> {
    pub route: &'a Route,
}

/// Response body for an all-routes query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllRoutesBody<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub max_depth: usize,
    pub max_routes: usize,
    pub routes: &'a [Route],
}

/// Render identifier resolutions.
pub fn format_resolutions(resolutions: &[Resolution]) -> String {
    let mut out = String::new();
    for resolution in resolutions {
        match &resolution.code {
            Some(code) => {
                let _ = writeln!(out, "{} -> {}", resolution.input, code);
            }
            None if resolution.suggestions.is_empty() => {
                let _ = writeln!(out, "{} -> unresolved", resolution.input);
            }
            None => {
                let _ = writeln!(
                    out,
                    "{} -> unresolved (did you mean: {})",
                    resolution.input,
                    resolution.suggestions.join(", ")
                );
            }
        }
    }
    out
}

/// Render a shortest route, labelling each code with its common name.
pub fn format_route_text(route: &Route, dataset: &CountryDataset) -> String {
    let origin = route.first().map(String::as_str).unwrap_or("<none>");
    let destination = route.last().map(String::as_str).unwrap_or("<none>");
    let crossings = route.len().saturating_sub(1);

    let mut out = format!(
        "Route from {} to {} ({} {}):\n",
        origin,
        destination,
        crossings,
        if crossings == 1 { "border" } else { "borders" }
    );
    for code in route {
        let _ = writeln!(out, "- {} ({})", display_name(dataset, code), code);
    }
    out
}

/// Render every enumerated route on its own numbered line.
pub fn format_routes_text(
    origin: &str,
    destination: &str,
    envelope: RouteEnvelope,
    routes: &[Route],
) -> String {
    let mut out = format!(
        "{} {} from {} to {} (max depth {}, max routes {})",
        routes.len(),
        if routes.len() == 1 { "route" } else { "routes" },
        origin,
        destination,
        envelope.max_depth,
        envelope.max_routes
    );
    if routes.is_empty() {
        out.push('\n');
        return out;
    }

    out.push_str(":\n");
    let width = routes.len().to_string().len();
    for (index, route) in routes.iter().enumerate() {
        let _ = writeln!(out, "{:>width$}. {}", index + 1, route.join(" -> "));
    }
    out
}

fn display_name<'a>(dataset: &'a CountryDataset, code: &'a str) -> &'a str {
    dataset
        .get(code)
        .and_then(|country| country.names.first())
        .map(String::as_str)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(codes: &[&str]) -> Route {
        codes.iter().map(|code| code.to_string()).collect()
    }

    #[test]
    fn resolutions_show_suggestions_for_misses() {
        let rendered = format_resolutions(&[
            Resolution {
                input: "cz".to_string(),
                code: Some("CZE".to_string()),
                suggestions: Vec::new(),
            },
            Resolution {
                input: "Qwerty".to_string(),
                code: None,
                suggestions: vec!["PRT".to_string(), "SRB".to_string()],
            },
            Resolution {
                input: "XYZ".to_string(),
                code: None,
                suggestions: Vec::new(),
            },
        ]);
        assert_eq!(
            rendered,
            "cz -> CZE\nQwerty -> unresolved (did you mean: PRT, SRB)\nXYZ -> unresolved\n"
        );
    }

    #[test]
    fn route_text_uses_common_names() {
        let dataset = CountryDataset::from_json_str(
            r#"[{"name": {"common": "Czechia"}, "cca3": "CZE"},
                {"name": {"common": "Austria"}, "cca3": "AUT"}]"#,
        )
        .unwrap();
        let rendered = format_route_text(&route(&["CZE", "AUT", "ITA"]), &dataset);
        assert_eq!(
            rendered,
            "Route from CZE to ITA (2 borders):\n- Czechia (CZE)\n- Austria (AUT)\n- ITA (ITA)\n"
        );
    }

    #[test]
    fn routes_text_numbers_each_route() {
        let routes = vec![route(&["PRT", "ESP"])];
        let rendered = format_routes_text("PRT", "ESP", RouteEnvelope::new(3, 10), &routes);
        assert_eq!(
            rendered,
            "1 route from PRT to ESP (max depth 3, max routes 10):\n1. PRT -> ESP\n"
        );

        let empty = format_routes_text("USA", "AUS", RouteEnvelope::default(), &[]);
        assert_eq!(empty, "0 routes from USA to AUS (max depth 10, max routes 50)\n");
    }

    #[test]
    fn all_routes_body_uses_camel_case() {
        let routes = vec![route(&["PRT", "ESP"])];
        let body = AllRoutesBody {
            origin: "PRT",
            destination: "ESP",
            max_depth: 3,
            max_routes: 10,
            routes: &routes,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "origin": "PRT",
                "destination": "ESP",
                "maxDepth": 3,
                "maxRoutes": 10,
                "routes": [["PRT", "ESP"]]
            })
        );
    }
}
