use std::collections::BTreeMap;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        ComfortRisk,
        CurrentAction,
        DailyPlan,
        DemandResponseEvent,
        Device,
        Forecast,
        Slot,
        demand_response::Severity,
    },
    fetch::Fetched,
    statistics::{FleetSummary, ForecastSummary},
};

const NO_DATA: &str = "–";

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn optional_cell(value: Option<f64>, format: impl FnOnce(f64) -> String) -> Cell {
    match value {
        Some(value) => Cell::new(format(value)).set_alignment(CellAlignment::Right),
        None => Cell::new(NO_DATA).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    }
}

fn temperature_cell(value: Option<f64>) -> Cell {
    optional_cell(value, |value| format!("{value:.1} °C"))
}

fn price_cell(value: Option<f64>) -> Cell {
    optional_cell(value, |value| format!("{value:.2} €/MWh"))
}

fn wind_cell(value: Option<f64>) -> Cell {
    optional_cell(value, |value| format!("{value:.0}%"))
}

fn action_cells(action: Option<&Fetched<CurrentAction>>) -> [Cell; 4] {
    let Some(fetched) = action else {
        return [NO_DATA; 4].map(|text| Cell::new(text).add_attribute(Attribute::Dim));
    };
    let action = fetched.get();
    let mut mode = Cell::new(&action.mode).fg(action.category().color());
    if !fetched.is_live() {
        // Last-known or unknown: shown, but not as fresh data.
        mode = mode.add_attribute(Attribute::Dim);
    }
    [
        mode,
        temperature_cell(action.target_temperature),
        temperature_cell(action.current_temperature),
        Cell::new(action.next_change.as_deref().unwrap_or(NO_DATA)),
    ]
}

#[must_use]
pub fn build_devices_table(
    devices: &[Device],
    actions: &BTreeMap<String, Fetched<CurrentAction>>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID", "Name", "Type", "Power", "COP", "Comfort", "VPP", "Mode", "Target", "Current", "Next",
    ]);
    for device in devices {
        let [mode, target, current, next_change] = action_cells(actions.get(&device.device_id));
        table.add_row(vec![
            Cell::new(&device.device_id).add_attribute(Attribute::Bold),
            Cell::new(&device.name),
            Cell::new(device.heat_pump_type.label()),
            Cell::new(format!("{:.1} kW", device.rated_power)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", device.cop_rating)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{:.0}–{:.0} °C",
                device.comfort_min_temp, device.comfort_max_temp
            )),
            if device.vpp_enabled {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").add_attribute(Attribute::Dim)
            },
            mode,
            target,
            current,
            next_change,
        ]);
    }
    table
}

#[must_use]
pub fn build_device_table(device: &Device) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Property", "Value"]);
    table.add_rows(vec![
        vec![Cell::new("ID"), Cell::new(&device.device_id).add_attribute(Attribute::Bold)],
        vec![Cell::new("Name"), Cell::new(&device.name)],
        vec![
            Cell::new("Location"),
            Cell::new(format!("{:.4}°N {:.4}°E", device.latitude, device.longitude)),
        ],
        vec![Cell::new("Insulation"), Cell::new(format!("{:?}", device.insulation_level))],
        vec![
            Cell::new("Floor area"),
            Cell::new(format!("{:.0} m² ({:.0} m³)", device.floor_area, device.volume)),
        ],
        vec![Cell::new("Heat pump"), Cell::new(device.heat_pump_type.label())],
        vec![
            Cell::new("Rated power"),
            Cell::new(format!("{:.1} kW, COP {:.1}", device.rated_power, device.cop_rating)),
        ],
        vec![
            Cell::new("Comfort band"),
            Cell::new(format!(
                "{:.1}–{:.1} °C",
                device.comfort_min_temp, device.comfort_max_temp
            )),
        ],
        vec![
            Cell::new("Grid participation"),
            if device.vpp_enabled {
                Cell::new("enabled").fg(Color::Green)
            } else {
                Cell::new("disabled").add_attribute(Attribute::Dim)
            },
        ],
        vec![Cell::new("Registered"), Cell::new(device.created_at.format("%Y-%m-%d %H:%M"))],
    ]);
    table
}

#[must_use]
pub fn build_current_action_table(action: &CurrentAction) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Mode", "Target", "Current", "Next change", "Reason"]);
    let mut mode = Cell::new(&action.mode).fg(action.category().color());
    if action.is_unknown() {
        mode = mode.add_attribute(Attribute::Dim);
    }
    table.add_row(vec![
        mode,
        temperature_cell(action.target_temperature),
        temperature_cell(action.current_temperature),
        Cell::new(action.next_change.as_deref().unwrap_or(NO_DATA)),
        Cell::new(&action.reason),
    ]);
    table
}

#[must_use]
pub fn build_plan_table(plan: &DailyPlan, slots: &[Slot]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Mode", "Target", "Price", "Carbon", "Reason"]);
    for slot in slots {
        let row = match slot {
            Slot::Planned(action) => vec![
                Cell::new(slot.label()),
                Cell::new(&action.mode).fg(slot.category().color()),
                temperature_cell(slot.target_temperature()),
                price_cell(action.price),
                optional_cell(action.carbon, |carbon| format!("{carbon:.0} g/kWh")),
                Cell::new(&action.reason),
            ],
            Slot::Gap(_) => vec![
                Cell::new(slot.label()).add_attribute(Attribute::Dim),
                Cell::new(slot.category()).fg(slot.category().color()).add_attribute(Attribute::Dim),
                temperature_cell(None),
                price_cell(None),
                optional_cell(None, |_| String::new()),
                Cell::new("not planned").add_attribute(Attribute::Dim),
            ],
        };
        table.add_row(row);
    }
    if plan.estimated_cost.is_some() || plan.estimated_carbon.is_some() {
        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            optional_cell(plan.estimated_cost, |cost| format!("€{cost:.2}")),
            optional_cell(plan.estimated_carbon, |carbon| format!("{carbon:.0} g")),
            Cell::new(""),
        ]);
    }
    table
}

#[must_use]
pub fn build_forecast_table(forecast: &Forecast, summary: &ForecastSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Price", "Wind", "Status"]);
    for (index, sample) in forecast.iter().enumerate() {
        let status = summary.status(forecast, index);
        let in_window =
            summary.heating_window.as_ref().is_some_and(|window| window.contains(&index));
        let mut labels = Vec::new();
        if status.lowest {
            labels.push("lowest");
        }
        if status.peak {
            labels.push("peak");
        }
        if status.green {
            labels.push("green");
        }
        if in_window {
            labels.push("heat");
        }
        table.add_row(vec![
            Cell::new(sample.timestamp.format("%Y-%m-%d %H:%M")),
            price_cell(Some(sample.price)).fg(if status.lowest {
                Color::Green
            } else if status.peak {
                Color::Red
            } else {
                Color::Reset
            }),
            wind_cell(Some(sample.wind)).fg(if status.green { Color::Green } else { Color::Reset }),
            Cell::new(labels.join(", ")),
        ]);
    }
    table
}

#[must_use]
pub fn build_forecast_summary_table(forecast: &Forecast, summary: &ForecastSummary) -> Table {
    let hour_of = |index: usize| {
        forecast.get(index).map_or_else(
            || NO_DATA.to_string(),
            |sample| sample.timestamp.format("%H:%M").to_string(),
        )
    };
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Current price"), price_cell(summary.current_price)]);
    table.add_row(vec![Cell::new("Average price"), price_cell(summary.average_price)]);
    match summary.price_extremes {
        Some(extremes) => {
            table.add_row(vec![
                Cell::new(format!("Lowest price at {}", hour_of(extremes.min_index))),
                price_cell(Some(extremes.min)).fg(Color::Green),
            ]);
            table.add_row(vec![
                Cell::new(format!("Peak price at {}", hour_of(extremes.max_index))),
                price_cell(Some(extremes.max)).fg(Color::Red),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Lowest price"), price_cell(None)]);
            table.add_row(vec![Cell::new("Peak price"), price_cell(None)]);
        }
    }
    table.add_row(vec![Cell::new("Average wind"), wind_cell(summary.average_wind)]);
    table.add_row(vec![
        Cell::new(summary.wind_extremes.map_or_else(
            || "Highest wind".to_string(),
            |extremes| format!("Highest wind at {}", hour_of(extremes.max_index)),
        )),
        wind_cell(summary.wind_extremes.map(|extremes| extremes.max)),
    ]);
    table.add_row(vec![
        Cell::new("Best heating window"),
        Cell::new(summary.heating_window.as_ref().map_or_else(
            || NO_DATA.to_string(),
            |window| {
                let end = window.end.saturating_sub(1).max(window.start);
                format!("{}–{}", hour_of(window.start), hour_of(end))
            },
        )),
    ]);
    table.add_row(vec![
        Cell::new("Estimated savings"),
        optional_cell(summary.estimated_savings(), |savings| format!("{savings:.2} €/MWh"))
            .fg(Color::Green),
    ]);
    table
}

#[must_use]
pub fn build_fleet_table(fleet: &FleetSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Devices", "Participating", "Capacity"]);
    table.add_row(vec![
        Cell::new(fleet.n_devices).set_alignment(CellAlignment::Right),
        Cell::new(fleet.n_participating).set_alignment(CellAlignment::Right).fg(
            if fleet.n_participating == 0 { Color::Red } else { Color::Green },
        ),
        Cell::new(format!("{:.1} kW", fleet.participating_capacity))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

#[must_use]
pub fn build_event_table(event: &DemandResponseEvent) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Event", "Severity", "Duration", "Participants", "Reduction"]);
    table.add_row(vec![
        Cell::new(&event.event_id).add_attribute(Attribute::Bold),
        Cell::new(format!("{:?}", event.severity)).fg(match event.severity {
            Severity::Normal => Color::Reset,
            Severity::High => Color::DarkYellow,
            Severity::Critical => Color::Red,
        }),
        Cell::new(format!("{} min", event.duration_minutes)).set_alignment(CellAlignment::Right),
        Cell::new(event.participants).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.1} kW", event.estimated_reduction))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

#[must_use]
pub fn build_comfort_risk_table(risk: &ComfortRisk) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Risk", "Hours", "Recommendations"]);
    let level_color = match risk.risk_level.to_ascii_lowercase().as_str() {
        "low" => Color::Green,
        "medium" => Color::DarkYellow,
        "high" => Color::Red,
        _ => Color::DarkGrey,
    };
    table.add_row(vec![
        Cell::new(&risk.risk_level).fg(level_color),
        Cell::new(if risk.risk_hours.is_empty() {
            NO_DATA.to_string()
        } else {
            risk.risk_hours.iter().map(|hour| format!("{hour:02}:00")).collect::<Vec<_>>().join(", ")
        }),
        Cell::new(risk.recommendations.join("\n")),
    ]);
    table
}
