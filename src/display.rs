use carpool_plan::time::day_name;
use carpool_plan::{DayPlan, Direction, DrivingPlan, Member, Party};
use colored::Colorize;
use std::collections::BTreeMap;
use tabled::Tabled;
use tabled::settings::{Alignment, Style};

#[derive(Tabled)]
struct PartyRow {
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Passengers")]
    passengers: String,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "#")]
    number: u8,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Drivers")]
    drivers: String,
    #[tabled(rename = "Parties")]
    parties: usize,
    #[tabled(rename = "Passengers")]
    passengers: usize,
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Schoolbound")]
    schoolbound: String,
    #[tabled(rename = "Homebound")]
    homebound: String,
}

fn flags(party: &Party) -> String {
    let mut flags = vec![];
    if party.is_designated_driver {
        flags.push("designated".green().to_string());
    }
    if party.is_lonely_driver {
        flags.push("lonely".yellow().to_string());
    }
    if party.drives_despite_custom_prefs {
        flags.push("despite prefs".red().to_string());
    }
    flags.join(" ")
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(Alignment::left());
    table.to_string()
}

pub fn day_table(day: &DayPlan, members: &BTreeMap<&str, &Member>) -> String {
    let rows = day
        .parties
        .iter()
        .map(|p| PartyRow {
            direction: p.direction.to_string(),
            time: p.time.to_string(),
            driver: p.driver.bold().to_string(),
            passengers: p.passengers.join(", "),
            seats: members
                .get(&*p.driver)
                .map(|m| format!("{}/{}", p.passengers.len() + 1, m.seats))
                .unwrap_or_default(),
            flags: flags(p),
        })
        .collect::<Vec<_>>();
    render(rows)
}

pub fn overview_table(plan: &DrivingPlan) -> String {
    let rows = plan
        .day_plans
        .iter()
        .map(|(number, day)| {
            let mut drivers = day.parties.iter().map(|p| &*p.driver).collect::<Vec<_>>();
            drivers.sort();
            drivers.dedup();
            DayRow {
                number: *number,
                day: day_name((*number - 1) as usize),
                drivers: drivers.join(", "),
                parties: day.parties.len(),
                passengers: day.parties.iter().map(|p| p.passengers.len()).sum(),
            }
        })
        .collect::<Vec<_>>();
    render(rows)
}

fn seat_label(day: &DayPlan, initials: &str, direction: Direction) -> String {
    match day.party_of(initials, direction) {
        Some(party) if &*party.driver == initials => format!("drives {}", party.time).green().to_string(),
        Some(party) => format!("with {} {}", party.driver, party.time),
        None => "-".dimmed().to_string(),
    }
}

pub fn member_table(plan: &DrivingPlan, initials: &str) -> String {
    let rows = plan
        .day_plans
        .iter()
        .map(|(number, day)| MemberRow {
            day: day_name((*number - 1) as usize),
            schoolbound: seat_label(day, initials, Direction::Schoolbound),
            homebound: seat_label(day, initials, Direction::Homebound),
        })
        .collect::<Vec<_>>();
    render(rows)
}
