//! plan-runner: headless driver for the shift-roster workload planner.
//!
//! Usage:
//!   plan-runner --config planner.json --auto-distribute --out ./exports
//!   plan-runner --format json --out ./exports
//!   plan-runner --shift B --agent B030 --out ./exports
//!   plan-runner --ipc-mode < commands.jsonl
//!
//! `--shift` and `--agent` select the rows of the agent detail export.
//!
//! IPC requests, one JSON object per line:
//!   {"type":"get_state"}
//!   {"type":"command","command":{"cmd":"recompute_all"}}
//!   {"type":"update_form","shift_a_count":"25","average_handle_time":"","daily_target":"700"}
//!   {"type":"set_command_raw","slot_index":8,"value":"-3"}
//!   {"type":"quit"}
//!
//! `update_form` and `set_command_raw` carry input as typed. Invalid fields
//! take the configuration defaults (headcount 0, handle time 10, target 700)
//! and an invalid slot value becomes 0.

use anyhow::{bail, Result};
use staffing_core::{
    command::PlannerCommand,
    config::{parse_command_value, PlannerConfig, RawConfigInput},
    report::MatrixFilter,
    session::PlanningSession,
    shift::ShiftId,
    snapshot::PlanSnapshot,
    types::SlotIndex,
};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: PlannerCommand },
    UpdateForm(RawConfigInput),
    SetCommandRaw { slot_index: SlotIndex, value: serde_json::Value },
    Quit,
}

impl IpcRequest {
    /// The planner command this request stands for; `None` for reads and quit.
    fn into_command(self) -> Option<PlannerCommand> {
        match self {
            Self::GetState | Self::Quit => None,
            Self::Command { command } => Some(command),
            Self::UpdateForm(form) => Some(PlannerCommand::UpdateConfiguration(form.coerce())),
            Self::SetCommandRaw { slot_index, value } => {
                let raw = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some(PlannerCommand::SetCommand { slot_index, value: parse_command_value(&raw) })
            }
        }
    }
}

#[derive(serde::Serialize)]
struct IpcResponse<'a> {
    events: Vec<String>,
    state:  &'a PlanSnapshot,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let auto = args.iter().any(|a| a == "--auto-distribute");
    let config_path = arg_value(&args, "--config");
    let out_dir = PathBuf::from(arg_value(&args, "--out").unwrap_or("."));
    let format = match arg_value(&args, "--format").unwrap_or("csv") {
        "json" => ExportFormat::Json,
        _ => ExportFormat::Csv,
    };
    let filter = MatrixFilter {
        agent: arg_value(&args, "--agent").map(str::to_string),
        shift: arg_value(&args, "--shift").map(parse_shift).transpose()?,
    };

    let config = match config_path {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let mut session = PlanningSession::new(config)?;

    if ipc_mode {
        return run_ipc_loop(&mut session);
    }

    println!("Workload planner: plan-runner");
    println!("  session:  {}", session.session_id);
    println!("  config:   {}", config_path.unwrap_or("(reference)"));
    println!("  out:      {}", out_dir.display());
    println!();

    if auto {
        session.apply(PlannerCommand::AutoDistribute)?;
    }
    session.apply(PlannerCommand::RecomputeAll)?;

    let snapshot = session.snapshot();
    print_summary(&snapshot);
    export(&snapshot, &out_dir, format, &filter)?;
    Ok(())
}

fn run_ipc_loop(session: &mut PlanningSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(request, IpcRequest::Quit) {
            break;
        }
        let events = match request.into_command().map(|c| session.apply(c)) {
            None => Vec::new(),
            Some(Ok(events)) => events.iter().map(|e| e.summary()).collect(),
            Some(Err(e)) => {
                log::warn!("command rejected: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let state = session.snapshot();
        let response = IpcResponse { events, state: &state };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(snapshot: &PlanSnapshot) {
    let slots = &snapshot.slots;
    println!("=== SLOT SUMMARY ===");
    println!("  {:<12} {:>6} {:>8} {:>8} {:>6}  status", "slot", "agents", "command", "capacity", "diff");
    for row in &slots.rows {
        println!(
            "  {:<12} {:>6} {:>8} {:>8} {:>+6}  {}",
            row.label, row.agents_present, row.command, row.capacity, row.difference,
            row.status.label()
        );
    }
    println!(
        "  {:<12} {:>6} {:>8} {:>8} {:>+6}  {:?} ({}% coverage)",
        "TOTAL", slots.total_agents, slots.total_command, slots.total_capacity,
        slots.total_difference, slots.load, slots.coverage_percent
    );

    let agents = &snapshot.agents;
    println!();
    println!("=== AGENT SUMMARY ===");
    println!("  agents:           {}", agents.rows.len());
    println!("  avg calls:        {}", agents.average_calls);
    println!("  avg hours:        {:.1}", agents.average_hours);
    println!("  avg productivity: {:.1} calls/h", agents.average_productivity);
    println!("  achievement:      {}%", agents.overall_achievement_percent);
    println!("  allocated total:  {}", snapshot.matrix.grand_total);
}

fn export(
    snapshot: &PlanSnapshot,
    out_dir:  &Path,
    format:   ExportFormat,
    filter:   &MatrixFilter,
) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    let date = snapshot.configuration.plan_date.format("%Y-%m-%d");
    match format {
        ExportFormat::Json => {
            let path = out_dir.join(format!("call_center_planning_{date}.json"));
            fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
            println!("\nExported {}", path.display());
        }
        ExportFormat::Csv => {
            let planning = out_dir.join(format!("call_center_planning_{date}.csv"));
            write_slot_csv(snapshot, File::create(&planning)?)?;
            let details = out_dir.join(format!("agent_details_{date}.csv"));
            write_matrix_csv(snapshot, filter, File::create(&details)?)?;
            println!("\nExported {} and {}", planning.display(), details.display());
        }
    }
    Ok(())
}

fn write_slot_csv<W: Write>(snapshot: &PlanSnapshot, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Time Slot", "Agents Present", "Command", "Capacity", "Difference", "Status"])?;
    for row in &snapshot.slots.rows {
        writer.write_record([
            row.label.clone(),
            row.agents_present.to_string(),
            row.command.to_string(),
            row.capacity.to_string(),
            row.difference.to_string(),
            row.status.label().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_matrix_csv<W: Write>(snapshot: &PlanSnapshot, filter: &MatrixFilter, out: W) -> Result<()> {
    let matrix = &snapshot.matrix;
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["Agent ID".to_string(), "Shift".to_string()];
    header.extend(matrix.slot_labels.iter().cloned());
    header.push("Total".into());
    writer.write_record(&header)?;

    for row in matrix.filtered(filter) {
        let mut record = vec![row.agent_id.clone(), format!("Shift {}", row.shift)];
        record.extend(row.cells.iter().map(|c| c.display()));
        record.push(row.total.to_string());
        writer.write_record(&record)?;
    }

    let mut totals = vec!["TOTAL".to_string(), String::new()];
    totals.extend(matrix.column_totals.iter().map(|t| t.to_string()));
    totals.push(matrix.grand_total.to_string());
    writer.write_record(&totals)?;
    writer.flush()?;
    Ok(())
}

fn parse_shift(raw: &str) -> Result<ShiftId> {
    let mut chars = raw.trim().chars();
    match (chars.next().and_then(ShiftId::from_letter), chars.next()) {
        (Some(id), None) => Ok(id),
        _ => bail!("Unknown shift '{raw}', expected A, B or C"),
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> IpcRequest {
        serde_json::from_str(json).expect("valid request")
    }

    #[test]
    fn update_form_applies_configuration_defaults() {
        let command = request(
            r#"{"type":"update_form","shift_a_count":"12.7","shift_b_count":"-4",
                "average_handle_time":"","daily_target":"0"}"#,
        )
        .into_command();
        let Some(PlannerCommand::UpdateConfiguration(update)) = command else {
            panic!("expected a configuration update, got {command:?}");
        };
        assert_eq!(update.shift_a_count, 12);
        assert_eq!(update.shift_b_count, 0);
        assert_eq!(update.shift_c_count, 0);
        assert_eq!(update.average_handle_time, 10.0);
        assert_eq!(update.daily_target, 0);
    }

    #[test]
    fn raw_slot_value_is_coerced() {
        for (value, expected) in [(r#""-3""#, 0), ("-3", 0), (r#""40 calls""#, 40), ("12.7", 12), ("null", 0)] {
            let json = format!(r#"{{"type":"set_command_raw","slot_index":8,"value":{value}}}"#);
            assert_eq!(
                request(&json).into_command(),
                Some(PlannerCommand::SetCommand { slot_index: 8, value: expected }),
                "raw value {value}"
            );
        }
    }

    #[test]
    fn reads_carry_no_command() {
        assert_eq!(request(r#"{"type":"get_state"}"#).into_command(), None);
        assert_eq!(request(r#"{"type":"quit"}"#).into_command(), None);
    }

    #[test]
    fn raw_requests_drive_a_session() {
        let mut session = PlanningSession::with_id("ipc".into(), PlannerConfig::default()).unwrap();
        let form = request(r#"{"type":"update_form","shift_a_count":"2","shift_b_count":"x","shift_c_count":"1"}"#);
        session.apply(form.into_command().unwrap()).unwrap();
        assert_eq!(session.roster().len(), 3);
        assert_eq!(session.capacity_config().daily_call_target, 700);
    }

    #[test]
    fn shift_filter_parses_single_letters() {
        assert_eq!(parse_shift("b").unwrap(), ShiftId::B);
        assert_eq!(parse_shift(" C ").unwrap(), ShiftId::C);
        assert!(parse_shift("D").is_err());
        assert!(parse_shift("AB").is_err());
        assert!(parse_shift("").is_err());
    }
}
