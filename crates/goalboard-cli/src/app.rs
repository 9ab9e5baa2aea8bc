//! Command tree and subcommand handlers

use crate::render;
use anyhow::{anyhow, bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use goalboard_model::{unit_menu, Field, HexColor, RowIndex, Units};
use goalboard_session::{Event, Notice, Session, SessionDriver, VisitorStore};
use goalboard_store::{GoalClient, Transport};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Flag name for each form field
pub const FIELD_FLAGS: [(&str, Field); 7] = [
    ("description", Field::Description),
    ("initial", Field::InitialValue),
    ("current", Field::CurrentValue),
    ("end", Field::EndValue),
    ("category", Field::Category),
    ("units", Field::Units),
    ("color", Field::BgColor),
];

fn field_args() -> Vec<Arg> {
    let units = units_help();
    FIELD_FLAGS
        .iter()
        .map(|(flag, field)| {
            let help = match field {
                Field::Description => "Goal label".to_string(),
                Field::InitialValue => "Baseline value".to_string(),
                Field::CurrentValue => "Latest measurement".to_string(),
                Field::EndValue => "Target value".to_string(),
                Field::Category => "Column the goal is listed under".to_string(),
                Field::Units => units.clone(),
                Field::BgColor => "Bar color as #rrggbb".to_string(),
            };
            Arg::new(*flag).long(*flag).value_name(field.name()).help(help)
        })
        .collect()
}

/// `Units (%; Time: Days; Distance: mi)`, one section per menu family
fn units_help() -> String {
    let sections: Vec<String> = unit_menu()
        .into_iter()
        .map(|(family, units)| {
            let names = units.iter().map(Units::as_str).collect::<Vec<_>>().join(", ");
            match family {
                Some(family) => format!("{}: {names}", family.label()),
                None => names,
            }
        })
        .collect();
    format!("Units ({})", sections.join("; "))
}

/// Full command tree
#[must_use]
pub fn command() -> Command {
    Command::new("goalboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track goals kept in a spreadsheet")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .global(true)
                .help("Store endpoint URL (overrides config and environment)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("list").about("Show the goal board").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a goal")
                .args(field_args())
                .mut_arg("color", |a| a.default_value("#ffffff")),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a stored goal")
                .arg(row_arg())
                .args(field_args()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a stored goal")
                .arg(row_arg()),
        )
        .subcommand(
            Command::new("palette")
                .about("Show the colors derived from a goal color")
                .arg(
                    Arg::new("color")
                        .required(true)
                        .value_parser(value_parser!(HexColor))
                        .help("Color as #rrggbb"),
                ),
        )
        .subcommand(Command::new("visitor").about("Show the anonymous visitor id"))
}

fn row_arg() -> Arg {
    Arg::new("row")
        .long("row")
        .required(true)
        .help("Row index of the goal")
}

/// Whether a subcommand talks to the store
#[must_use]
pub fn needs_store(name: &str) -> bool {
    matches!(name, "list" | "add" | "edit" | "delete")
}

/// Run a subcommand that needs no store
///
/// # Errors
/// Fails on unknown subcommands or when the visitor file is unusable
pub fn run_local(
    name: &str,
    args: &ArgMatches,
    visitor_file: PathBuf,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match name {
        "palette" => {
            let color = args
                .get_one::<HexColor>("color")
                .copied()
                .ok_or_else(|| anyhow!("missing color"))?;
            write!(out, "{}", render::palette_text(color))?;
        }
        "visitor" => {
            let id = VisitorStore::new(visitor_file).get_or_create()?;
            writeln!(out, "{id}")?;
        }
        other => bail!("unknown command: {other}"),
    }
    Ok(())
}

/// Run a subcommand against the store
///
/// Writes go through [`SessionDriver`], so every successful mutation is
/// followed by a refetch and the refreshed board is printed.
///
/// # Errors
/// Fails when a read fails, when the session raises a notice, or when the
/// requested row is not on the board
pub async fn run_remote<T: Transport>(
    name: &str,
    args: &ArgMatches,
    client: GoalClient<T>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match name {
        "list" => {
            // a failed read is an error here, not a silently kept list
            let goals = client.fetch_all().await.context("reading goals")?;
            let mut session = Session::new();
            session.apply(Event::FetchCompleted(Ok(goals)));
            print_board(&session, args.get_flag("json"), out)
        }
        "add" => {
            let mut driver = SessionDriver::new(client);
            for event in field_events(args, Event::SetAddField) {
                driver.handle(event).await;
            }
            let session = driver.handle(Event::SubmitAdd).await;
            finish(session, out)
        }
        "edit" => {
            let row = persisted_row(args, Notice::MissingFields)?;
            let mut driver = open_row(client, &row).await?;
            for event in field_events(args, Event::SetEditField) {
                driver.handle(event).await;
            }
            let session = driver.handle(Event::SubmitEdit).await;
            finish(session, out)
        }
        "delete" => {
            let row = persisted_row(args, Notice::CannotDelete)?;
            let mut driver = open_row(client, &row).await?;
            let session = driver.handle(Event::Delete).await;
            finish(session, out)
        }
        other => bail!("unknown command: {other}"),
    }
}

fn field_events<F>(args: &ArgMatches, event: F) -> Vec<Event>
where
    F: Fn(Field, String) -> Event,
{
    FIELD_FLAGS
        .iter()
        .filter_map(|(flag, field)| {
            args.get_one::<String>(flag)
                .map(|value| event(*field, value.clone()))
        })
        .collect()
}

fn persisted_row(args: &ArgMatches, on_missing: Notice) -> anyhow::Result<RowIndex> {
    let raw = args.get_one::<String>("row").map_or("", String::as_str);
    RowIndex::text(raw).ok_or_else(|| anyhow!("{on_missing}"))
}

async fn open_row<T: Transport>(
    client: GoalClient<T>,
    row: &RowIndex,
) -> anyhow::Result<SessionDriver<T>> {
    let goals = client.fetch_all().await.context("reading goals")?;
    let goal = goals
        .iter()
        .find(|g| g.row_index.as_ref() == Some(row))
        .cloned()
        .ok_or_else(|| anyhow!("no goal at row {row}"))?;
    debug!(%row, description = %goal.description, "editing goal");

    let mut driver = SessionDriver::new(client);
    driver.handle(Event::FetchCompleted(Ok(goals))).await;
    driver.handle(Event::OpenEdit(goal)).await;
    Ok(driver)
}

fn finish(session: &Session, out: &mut dyn Write) -> anyhow::Result<()> {
    if let Some(notice) = session.notice() {
        bail!("{notice}");
    }
    print_board(session, false, out)
}

fn print_board(session: &Session, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let dashboard = session.dashboard();
    if json {
        writeln!(out, "{}", render::dashboard_json(&dashboard)?)?;
    } else {
        write!(out, "{}", render::dashboard_text(&dashboard))?;
    }
    Ok(())
}
