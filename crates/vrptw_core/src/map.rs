use serde::Serialize;

use crate::{aggregator::Solution, location::Location, params::format_minutes};

pub const ROUTE_COLORS: [&str; 18] = [
    "#d63e2a", "#38aadd", "#72b026", "#d252b9", "#f69730", "#a23336", "#ff8e7f", "#ffcb92",
    "#0067a3", "#728224", "#436978", "#5b396b", "#ff91ea", "#8adaff", "#bbf970", "#575757",
    "#303030", "#a3a3a3",
];

const DEPOT_COLOR: &str = "#d63e2a";
const STOP_COLOR: &str = "#38aadd";

pub fn route_color(route_index: usize) -> &'static str {
    ROUTE_COLORS[route_index % ROUTE_COLORS.len()]
}

#[derive(Serialize)]
struct MapPoint {
    lat: f64,
    lon: f64,
    label: String,
}

impl MapPoint {
    fn new(location: &Location, label: String) -> Self {
        MapPoint {
            lat: location.latitude,
            lon: location.longitude,
            label,
        }
    }
}

#[derive(Serialize)]
struct MapRoute {
    color: &'static str,
    path: Vec<[f64; 2]>,
    stops: Vec<MapPoint>,
}

#[derive(Serialize)]
struct MapData {
    center: [f64; 2],
    depot: MapPoint,
    depot_color: &'static str,
    routes: Vec<MapRoute>,
    stops: Vec<MapPoint>,
}

fn center(locations: &[Location]) -> [f64; 2] {
    let count = locations.len().max(1) as f64;
    let (lat, lon) = locations.iter().fold((0.0, 0.0), |(lat, lon), location| {
        (lat + location.latitude, lon + location.longitude)
    });

    [lat / count, lon / count]
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Keeps a JSON document from closing the surrounding script tag.
fn script_json(data: &MapData) -> String {
    serde_json::to_string(data)
        .unwrap_or_else(|_| String::from("null"))
        .replace("</", "<\\/")
}

fn depot_point(depot: &Location) -> MapPoint {
    MapPoint::new(
        depot,
        format!(
            "<b>Depot:</b> {}<br>{}",
            escape_html(&depot.name),
            escape_html(&depot.address)
        ),
    )
}

fn render_page(title: &str, data: &MapData, legend: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body, #map {{ height: 100%; margin: 0; }}
.legend {{ position: fixed; top: 10px; right: 10px; z-index: 1000; background: white; padding: 10px; border: 2px solid grey; border-radius: 5px; font: 14px sans-serif; }}
.swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; }}
</style>
</head>
<body>
<div id="map"></div>
{legend}
<script>
const data = {data};
const map = L.map("map").setView(data.center, 12);
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
L.circleMarker([data.depot.lat, data.depot.lon], {{
  radius: 10, color: data.depot_color, fillColor: data.depot_color, fillOpacity: 1
}}).bindPopup(data.depot.label).addTo(map);
for (const route of data.routes) {{
  L.polyline(route.path, {{ color: route.color, weight: 3, opacity: 0.8 }}).addTo(map);
  for (const stop of route.stops) {{
    L.circleMarker([stop.lat, stop.lon], {{
      radius: 6, color: route.color, fillColor: route.color, fillOpacity: 0.7
    }}).bindPopup(stop.label).addTo(map);
  }}
}}
for (const stop of data.stops) {{
  L.circleMarker([stop.lat, stop.lon], {{
    radius: 6, color: "{STOP_COLOR}", fillColor: "{STOP_COLOR}", fillOpacity: 0.7
  }}).bindPopup(stop.label).addTo(map);
}}
</script>
</body>
</html>
"#,
        title = escape_html(title),
        data = script_json(data),
    )
}

/// Leaflet map of the routes of a feasible solution.
///
/// `None` for infeasible records and for records visiting unknown locations.
pub fn render_solution_map(solution: &Solution) -> Option<String> {
    if !solution.feasible {
        return None;
    }
    let depot = solution.locations.first()?;

    let waypoint = |location: &Location| [location.latitude, location.longitude];

    let mut routes = Vec::with_capacity(solution.routes.len());
    for (route_index, route) in solution.routes.iter().enumerate() {
        // A record read back from disk may reference unknown locations
        let visited = route
            .visits
            .iter()
            .map(|&visit| solution.locations.get(visit))
            .collect::<Option<Vec<&Location>>>()?;

        let mut path = vec![waypoint(depot)];
        path.extend(visited.iter().map(|&location| waypoint(location)));
        path.push(waypoint(depot));

        let stops = visited
            .iter()
            .enumerate()
            .map(|(stop_index, &location)| {
                MapPoint::new(
                    location,
                    format!(
                        "<b>Route {} - Stop {}</b><br>{}<br>{}",
                        route_index + 1,
                        stop_index + 1,
                        escape_html(&location.name),
                        escape_html(&location.address)
                    ),
                )
            })
            .collect();

        routes.push(MapRoute {
            color: route_color(route_index),
            path,
            stops,
        });
    }

    let data = MapData {
        center: center(&solution.locations),
        depot: depot_point(depot),
        depot_color: DEPOT_COLOR,
        routes,
        stops: vec![],
    };

    let mut legend = format!(
        r#"<div class="legend"><b>Routes: {}</b><br>Total distance: {:.1} miles<br>Total duration: {}<br>Customers served: {}<br>"#,
        solution.num_routes,
        solution.total_distance,
        format_minutes(solution.total_duration),
        solution.customers_served(),
    );
    for (route_index, route) in solution.routes.iter().enumerate() {
        legend.push_str(&format!(
            r#"<span class="swatch" style="background: {}"></span>Route {}: {} stops, {:.1} mi, {}<br>"#,
            route_color(route_index),
            route_index + 1,
            route.visits.len(),
            route.distance,
            format_minutes(route.duration),
        ));
    }
    legend.push_str("</div>");

    Some(render_page("Route solution", &data, &legend))
}

/// Preview of uploaded locations, the depot highlighted.
pub fn render_locations_map(locations: &[Location]) -> String {
    let Some((depot, customers)) = locations.split_first() else {
        return render_page(
            "Locations",
            &MapData {
                center: [0.0, 0.0],
                depot: MapPoint {
                    lat: 0.0,
                    lon: 0.0,
                    label: String::new(),
                },
                depot_color: DEPOT_COLOR,
                routes: vec![],
                stops: vec![],
            },
            r#"<div class="legend">No locations</div>"#,
        );
    };

    let data = MapData {
        center: center(locations),
        depot: depot_point(depot),
        depot_color: DEPOT_COLOR,
        routes: vec![],
        stops: customers
            .iter()
            .map(|location| {
                MapPoint::new(
                    location,
                    format!(
                        "<b>{}</b><br>{}",
                        escape_html(&location.name),
                        escape_html(&location.address)
                    ),
                )
            })
            .collect(),
    };

    let legend = format!(
        r#"<div class="legend"><b>Locations: {}</b><br>Depot: {}<br>Customers: {}</div>"#,
        locations.len(),
        escape_html(&depot.name),
        customers.len(),
    );

    render_page("Locations", &data, &legend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapter::RawSolution, aggregator::aggregate, test_utils::rochester_locations,
    };
    use vrptw_matrix::travel_matrices::TravelMatrices;

    fn solution(raw: RawSolution) -> Solution {
        let locations = rochester_locations(5);
        let matrices = TravelMatrices::haversine(&locations, 30.0).unwrap();
        aggregate(&raw, &locations, &matrices, 30)
    }

    #[test]
    fn test_colors_cycle() {
        assert_eq!(route_color(0), "#d63e2a");
        assert_eq!(route_color(18), route_color(0));
        assert_eq!(route_color(19), "#38aadd");
    }

    #[test]
    fn test_solution_map_legend() {
        let solution = solution(RawSolution {
            feasible: true,
            cost: Some(10.0),
            routes: vec![vec![1, 2], vec![3, 4]],
        });

        let html = render_solution_map(&solution).unwrap();

        assert!(html.contains("Routes: 2"));
        assert!(html.contains("Customers served: 4"));
        assert!(html.contains(&format!("{:.1} miles", solution.total_distance)));
        assert!(html.contains(&format_minutes(solution.total_duration)));
        assert!(html.contains("#38aadd"));
        assert!(html.contains("L.polyline"));
    }

    #[test]
    fn test_unknown_visit_gives_no_map() {
        let mut solution = solution(RawSolution {
            feasible: true,
            cost: Some(10.0),
            routes: vec![vec![1, 2]],
        });
        solution.routes[0].visits.push(42);

        let reloaded = Solution::from_json(&solution.to_json().unwrap()).unwrap();

        assert!(render_solution_map(&reloaded).is_none());
    }

    #[test]
    fn test_no_map_for_infeasible() {
        assert!(render_solution_map(&solution(RawSolution::infeasible())).is_none());
    }

    #[test]
    fn test_names_cannot_break_out_of_script() {
        let mut locations = rochester_locations(2);
        locations[1].name = String::from("</script><script>alert(1)</script>");

        let html = render_locations_map(&locations);

        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("Customers: 1"));
    }

    #[test]
    fn test_empty_locations_preview() {
        assert!(render_locations_map(&[]).contains("No locations"));
    }
}
