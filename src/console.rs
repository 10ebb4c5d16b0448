//! Line-oriented operator console over an [`EmergencyContext`].
//!
//! Each input line is one command, parsed with clap. Arguments containing spaces can be
//! wrapped in single or double quotes:
//!
//! ```text
//! er> create --patient "Ada Lovelace" --condition "Chest pain" --severity critical --priority 1
//! er> assign ER-7KQ2M9XAB DR002
//! er> active
//! ```

use anyhow::bail;
use clap::{Parser, Subcommand};
use er_core::{
    CaseId, CaseStatus, EmergencyCase, EmergencyContext, NewCase, Notification, NotificationId,
    StaffRecord,
};
use std::io::{BufRead, Write};

#[derive(Parser)]
#[command(name = "er", no_binary_name = true)]
#[command(about = "Emergency case console")]
struct ConsoleLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report a new emergency case
    Create {
        /// Patient name
        #[arg(long)]
        patient: Option<String>,
        /// Presenting condition
        #[arg(long)]
        condition: Option<String>,
        /// Severity level (critical, high, medium, low)
        #[arg(long)]
        severity: Option<String>,
        /// Numeric priority, lower is more urgent
        #[arg(long)]
        priority: Option<u32>,
        /// Use this case id instead of generating one
        #[arg(long)]
        case_id: Option<String>,
        /// Full case data as camelCase JSON (other flags are applied on top)
        #[arg(long)]
        json: Option<String>,
    },
    /// Update the status of a case
    Status {
        /// Case id
        case_id: String,
        /// New status (active, responded, resolved)
        status: String,
        /// Name of a staff member to attach
        #[arg(long)]
        staff_name: Option<String>,
        /// Role of the attached staff member
        #[arg(long, requires = "staff_name")]
        staff_role: Option<String>,
    },
    /// Assign a roster doctor to a case
    Assign {
        /// Case id
        case_id: String,
        /// Doctor id
        doctor_id: String,
    },
    /// Switch the doctor on duty
    Switch {
        /// Doctor id
        doctor_id: String,
    },
    /// Show one case in full
    Show {
        /// Case id
        case_id: String,
    },
    /// List all cases, newest first
    List,
    /// List unresolved cases, most urgent first
    Active,
    /// List notifications, newest first
    Notifications,
    /// Clear one notification
    Clear {
        /// Notification id
        id: String,
    },
    /// List the doctor roster
    Doctors,
    /// Case and doctor statistics
    Summary,
    /// Dump all cases as JSON
    Export,
    /// Leave the console
    Quit,
}

/// Whether the console should keep reading after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line into arguments, honouring single and double quotes.
pub fn split_line(line: &str) -> anyhow::Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

fn case_line(case: &EmergencyCase) -> String {
    let priority = case
        .priority
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".into());
    let doctor = case
        .assigned_doctor
        .as_ref()
        .map(|d| format!(" ({})", d.name))
        .unwrap_or_default();
    format!(
        "{} [{}] p{} {} {}: {}{}",
        case.case_id,
        case.status,
        priority,
        if case.severity_level.is_empty() {
            "-"
        } else {
            case.severity_level.as_str()
        },
        case.patient_name,
        case.condition,
        doctor
    )
}

fn notification_line(n: &Notification) -> String {
    format!(
        "{} {} {} {}",
        n.id,
        n.timestamp.to_rfc3339(),
        n.kind,
        n.message
    )
}

/// Run one command line against the context, writing results to `out`.
///
/// Core errors are written to `out` and do not end the session; only I/O failures on
/// `out` are returned as errors.
pub fn execute(
    ctx: &mut EmergencyContext,
    line: &str,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let args = match split_line(line) {
        Ok(args) if args.is_empty() => return Ok(Flow::Continue),
        Ok(args) => args,
        Err(e) => {
            writeln!(out, "error: {e}")?;
            return Ok(Flow::Continue);
        }
    };

    let parsed = match ConsoleLine::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            write!(out, "{}", e.render())?;
            return Ok(Flow::Continue);
        }
    };

    match run_command(ctx, parsed.command, out) {
        Ok(flow) => Ok(flow),
        Err(e) => match e.downcast::<std::io::Error>() {
            Ok(io) => Err(io.into()),
            Err(other) => {
                writeln!(out, "error: {other}")?;
                Ok(Flow::Continue)
            }
        },
    }
}

fn run_command(
    ctx: &mut EmergencyContext,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    match command {
        Commands::Create {
            patient,
            condition,
            severity,
            priority,
            case_id,
            json,
        } => {
            let flags_given = patient.is_some()
                || condition.is_some()
                || severity.is_some()
                || priority.is_some()
                || case_id.is_some();

            let data = match json {
                Some(json) => Some(serde_json::from_str::<NewCase>(&json)?),
                None if flags_given => Some(NewCase::default()),
                None => None,
            };

            let data = match data {
                Some(mut data) => {
                    if let Some(id) = case_id {
                        data.case_id = Some(CaseId::parse(&id)?);
                    }
                    data.patient_name = patient.or(data.patient_name);
                    data.condition = condition.or(data.condition);
                    data.severity_level = severity.or(data.severity_level);
                    data.priority = priority.or(data.priority);
                    Some(data)
                }
                None => None,
            };

            let case = ctx.create_emergency(data)?;
            writeln!(out, "created {}", case_line(&case))?;
        }
        Commands::Status {
            case_id,
            status,
            staff_name,
            staff_role,
        } => {
            let status: CaseStatus = status.parse()?;
            let staff = staff_name
                .map(|name| StaffRecord::new(name, staff_role.unwrap_or_default()))
                .transpose()?;
            let case = ctx.update_status(&case_id, status, staff)?;
            writeln!(out, "updated {}", case_line(&case))?;
        }
        Commands::Assign { case_id, doctor_id } => {
            let case = ctx.assign_doctor_by_id(&case_id, &doctor_id)?;
            writeln!(out, "assigned {}", case_line(&case))?;
        }
        Commands::Switch { doctor_id } => {
            let doctor = ctx.switch_doctor(&doctor_id)?;
            writeln!(out, "on duty: {} {}", doctor.id, doctor.name)?;
        }
        Commands::Show { case_id } => match ctx.get_emergency_by_id(&case_id) {
            Some(case) => writeln!(out, "{}", serde_json::to_string_pretty(case)?)?,
            None => writeln!(out, "no case {case_id}")?,
        },
        Commands::List => {
            for case in ctx.cases() {
                writeln!(out, "{}", case_line(case))?;
            }
        }
        Commands::Active => {
            for case in ctx.active_cases() {
                writeln!(out, "{}", case_line(case))?;
            }
        }
        Commands::Notifications => {
            for n in ctx.notifications() {
                writeln!(out, "{}", notification_line(n))?;
            }
        }
        Commands::Clear { id } => {
            let id: NotificationId = id.parse()?;
            if ctx.clear_notification(id) {
                writeln!(out, "cleared {id}")?;
            } else {
                writeln!(out, "no notification {id}")?;
            }
        }
        Commands::Doctors => {
            let current = ctx.current_doctor().id.clone();
            for doctor in ctx.doctors() {
                let marker = if doctor.id == current { "*" } else { " " };
                writeln!(
                    out,
                    "{marker} {} {} - {} ({})",
                    doctor.id, doctor.name, doctor.role, doctor.department
                )?;
            }
        }
        Commands::Summary => {
            let summary = ctx.case_summary();
            writeln!(
                out,
                "total {} | active {} | responded {} | resolved {}",
                summary.total, summary.active, summary.responded, summary.resolved
            )?;
            for (severity, count) in &summary.by_severity {
                writeln!(out, "  {severity}: {count}")?;
            }
            for stats in ctx.doctor_statistics() {
                writeln!(
                    out,
                    "  {} {}: {} assigned, {} resolved",
                    stats.doctor_id, stats.name, stats.assigned_cases, stats.resolved_cases
                )?;
            }
        }
        Commands::Export => {
            writeln!(out, "{}", ctx.export_cases_json()?)?;
        }
        Commands::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Read commands from `input` until `quit` or end of input.
pub fn run(
    ctx: &mut EmergencyContext,
    input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    write!(out, "er> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if execute(ctx, &line, &mut out)? == Flow::Quit {
            break;
        }
        write!(out, "er> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use er_core::CoreConfig;

    fn context() -> EmergencyContext {
        EmergencyContext::new(&CoreConfig::default()).unwrap()
    }

    fn exec(ctx: &mut EmergencyContext, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = execute(ctx, line, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(
            split_line(r#"create --patient "Ada Lovelace" --condition 'chest pain'"#).unwrap(),
            vec!["create", "--patient", "Ada Lovelace", "--condition", "chest pain"]
        );
        assert_eq!(split_line("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_line(r#"show """#).unwrap(), vec!["show", ""]);
        assert!(split_line(r#"show "ER-1"#).is_err());
    }

    #[test]
    fn test_create_assign_and_list() {
        let mut ctx = context();
        let (_, out) = exec(
            &mut ctx,
            r#"create --patient "Ada" --condition "Chest pain" --severity critical --priority 1 --case-id ER-CONSOLE01"#,
        );
        assert!(out.starts_with("created ER-CONSOLE01 [active] p1 critical Ada: Chest pain"));

        let (_, out) = exec(&mut ctx, "assign ER-CONSOLE01 DR002");
        assert!(out.contains("[responded]"));
        assert!(out.contains("Dr. Sarah Smith"));

        let (_, out) = exec(&mut ctx, "notifications");
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().next().unwrap().contains("doctor_assigned"));

        let (_, out) = exec(&mut ctx, "active");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_create_without_data_reports_error() {
        let mut ctx = context();
        let (flow, out) = exec(&mut ctx, "create");
        assert_eq!(flow, Flow::Continue);
        assert!(out.starts_with("error: no case data supplied"));
        assert!(ctx.cases().is_empty());
    }

    #[test]
    fn test_create_from_json() {
        let mut ctx = context();
        let (_, out) = exec(
            &mut ctx,
            r#"create --json '{"patientName":"Bo","condition":"Fracture","vitalSigns":{"heartRate":99}}'"#,
        );
        assert!(out.contains("Bo: Fracture"), "got {out}");
        assert_eq!(
            ctx.cases()[0].vital_signs.as_ref().unwrap().heart_rate,
            Some(99)
        );
    }

    #[test]
    fn test_status_with_staff_and_unknown_case() {
        let mut ctx = context();
        exec(&mut ctx, "create --patient A --condition x --case-id ER-STATUS001");

        let (_, out) = exec(
            &mut ctx,
            r#"status ER-STATUS001 responded --staff-name "Nurse Joy" --staff-role Triage"#,
        );
        assert!(out.starts_with("updated ER-STATUS001 [responded]"));
        assert_eq!(ctx.cases()[0].assigned_staff[0].role, "Triage");

        let (_, out) = exec(&mut ctx, "status ER-DOESNOTEXIST resolved");
        assert!(out.contains("not found"));
        assert_eq!(ctx.notifications().len(), 2);

        let (_, out) = exec(&mut ctx, "status ER-STATUS001 pending");
        assert!(out.contains("display label"));
    }

    #[test]
    fn test_switch_and_doctors() {
        let mut ctx = context();
        let (_, out) = exec(&mut ctx, "switch DR003");
        assert_eq!(out.trim(), "on duty: DR003 Dr. Michael Chen");

        let (_, out) = exec(&mut ctx, "doctors");
        assert!(out.lines().any(|l| l.starts_with("* DR003")));

        let (_, out) = exec(&mut ctx, "switch DR404");
        assert!(out.contains("unknown doctor"));
        assert_eq!(ctx.current_doctor().id, "DR003");
    }

    #[test]
    fn test_clear_notification() {
        let mut ctx = context();
        exec(&mut ctx, "create --patient A --condition x");
        let id = ctx.notifications()[0].id;

        let (_, out) = exec(&mut ctx, &format!("clear {id}"));
        assert_eq!(out.trim(), format!("cleared {id}"));
        assert!(ctx.notifications().is_empty());

        let (_, out) = exec(&mut ctx, "clear not-a-number");
        assert!(out.starts_with("error:"));
    }

    #[test]
    fn test_quit_and_unknown_command() {
        let mut ctx = context();
        assert_eq!(exec(&mut ctx, "quit").0, Flow::Quit);

        let (flow, out) = exec(&mut ctx, "frobnicate");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("frobnicate"));
    }

    #[test]
    fn test_run_reads_until_quit() {
        let mut ctx = context();
        let input = "create --patient A --condition x\nquit\ncreate --patient B --condition y\n";
        let mut out = Vec::new();
        run(&mut ctx, input.as_bytes(), &mut out).unwrap();

        assert_eq!(ctx.cases().len(), 1);
        assert!(String::from_utf8(out).unwrap().contains("created"));
    }
}
