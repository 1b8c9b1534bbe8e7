use comfy_table::{Table, presets::UTF8_FULL};
use vrptw_core::{aggregator::Solution, location::Location, params::format_minutes};

pub fn solution_table(solution: &Solution) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Route", "Stops", "Distance (mi)", "Duration", "Visits"]);

    for (index, route) in solution.routes.iter().enumerate() {
        table.add_row(vec![
            format!("{}", index + 1),
            route.visits.len().to_string(),
            format!("{:.1}", route.distance),
            format_minutes(route.duration),
            route.locations.join(" -> "),
        ]);
    }

    table.add_row(vec![
        String::from("Total"),
        solution.customers_served().to_string(),
        format!("{:.1}", solution.total_distance),
        format_minutes(solution.total_duration),
        String::new(),
    ]);

    table
}

pub fn locations_table(locations: &[Location]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Role", "Name", "Address", "Latitude", "Longitude"]);

    for (index, location) in locations.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            String::from(if index == 0 { "depot" } else { "customer" }),
            location.name.clone(),
            location.address.clone(),
            format!("{:.5}", location.latitude),
            format!("{:.5}", location.longitude),
        ]);
    }

    table
}
