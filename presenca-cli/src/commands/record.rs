use clap::{Args, Subcommand};
use presenca_core::date;
use presenca_core::models::split_names;
use presenca_core::{AttendanceRecord, ClassName, EntityId, NewRecord, RecordFilter, SyncGateway};

use super::{confirm, OutputFormat};
use crate::config::Config;
use crate::context::{Context, Refresh};

#[derive(Args)]
pub struct RecordCommand {
    #[command(subcommand)]
    pub command: RecordSubcommand,
}

/// Attendance values shared by create and update.
#[derive(Args, Clone, Default)]
pub struct AttendanceArgs {
    /// Teacher name
    #[arg(long, short)]
    pub teacher: Option<String>,

    /// Session date (DD/MM/YYYY)
    #[arg(long, short)]
    pub date: Option<String>,

    /// Number of students present
    #[arg(long, short, conflicts_with = "present_names")]
    pub present: Option<u32>,

    /// Comma-separated names of the students present (roll call)
    #[arg(long)]
    pub present_names: Option<String>,

    /// Roster size for the session
    #[arg(long)]
    pub total: Option<u32>,

    /// Comma-separated visitor names
    #[arg(long, short)]
    pub visitors: Option<String>,
}

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// List attendance records, most recent first
    List {
        /// Only sessions on this date (DD/MM/YYYY)
        #[arg(long, short)]
        date: Option<String>,

        /// Only sessions of this class
        #[arg(long)]
        class: Option<ClassName>,

        /// Text matched against class, teacher and date
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a record
    Show {
        id: EntityId,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record a session
    Create {
        /// Class the session belongs to
        #[arg(long)]
        class: ClassName,

        #[command(flatten)]
        values: AttendanceArgs,
    },

    /// Edit a record; omitted values are kept
    Update {
        id: EntityId,

        /// Move the record to another class
        #[arg(long)]
        class: Option<ClassName>,

        #[command(flatten)]
        values: AttendanceArgs,
    },

    /// Delete a record
    Delete {
        id: EntityId,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecordSubcommand {
    fn refresh(&self) -> Refresh {
        match self {
            RecordSubcommand::List { .. } | RecordSubcommand::Show { .. } => Refresh::Auto,
            _ => Refresh::IfEmpty,
        }
    }
}

impl RecordCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let mut ctx = Context::open(config, self.command.refresh()).await?;
            let result = self.execute(&mut ctx.gateway).await;
            ctx.close().await;
            result
        })
    }

    async fn execute(&self, gateway: &mut SyncGateway) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecordSubcommand::List {
                date,
                class,
                search,
                format,
            } => {
                let mut filter = RecordFilter::new();
                if let Some(date) = date {
                    filter = filter.with_date(date.as_str());
                }
                if let Some(class) = class {
                    filter = filter.with_class(class.as_str());
                }
                if let Some(search) = search {
                    filter = filter.with_search(search.as_str());
                }

                let records = gateway.records_for_display(&filter);
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&records)?);
                    }
                    OutputFormat::Text => print_table(&records),
                }
            }

            RecordSubcommand::Show { id, format } => {
                let record = gateway
                    .record(id)
                    .ok_or_else(|| format!("Record not found: {}", id))?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(record)?);
                    }
                    OutputFormat::Text => print_record(record),
                }
            }

            RecordSubcommand::Create { class, values } => {
                let roster = gateway.list_roster(class.as_str());
                let teacher = values
                    .teacher
                    .clone()
                    .or_else(|| gateway.teacher_for(class.as_str()).map(str::to_string))
                    .unwrap_or_default();
                let session_date = values.date.clone().unwrap_or_else(today);

                let mut entry = match &values.present_names {
                    Some(names) => roll_call(*class, &teacher, &session_date, &roster, names),
                    None => NewRecord::new(class.as_str(), teacher.as_str(), session_date.as_str())
                        .with_present(values.present.unwrap_or(0))
                        .with_total(roster.len() as u32),
                };
                if let Some(total) = values.total {
                    entry = entry.with_total(total);
                }
                if let Some(visitors) = &values.visitors {
                    entry = entry.with_visitors(visitors);
                }

                let record = gateway.create_record(entry).await?;
                println!("Created record:");
                print_record(&record);
            }

            RecordSubcommand::Update { id, class, values } => {
                let existing = gateway
                    .record(id)
                    .cloned()
                    .ok_or_else(|| format!("Record not found: {}", id))?;
                let entry = apply_changes(gateway, &existing, *class, values);

                let record = gateway.update_record(id, entry).await?;
                println!("Updated record:");
                print_record(&record);
            }

            RecordSubcommand::Delete { id, force } => {
                let record = gateway
                    .record(id)
                    .cloned()
                    .ok_or_else(|| format!("Record not found: {}", id))?;

                if !force
                    && !confirm(&format!(
                        "Delete record of {} on {}?",
                        record.class_name,
                        record.display_date()
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                gateway.delete_record(id).await?;
                println!("Deleted record: {}", id);
            }
        }

        Ok(())
    }
}

fn today() -> String {
    date::format_display(chrono::Local::now().date_naive())
}

/// Builds a roll-call entry, warning about names that are not on the roster.
fn roll_call(
    class: ClassName,
    teacher: &str,
    session_date: &str,
    roster: &[String],
    names: &str,
) -> NewRecord {
    let present = split_names(names);
    for name in present.iter().filter(|n| !roster.contains(*n)) {
        eprintln!("Warning: '{}' is not enrolled in {}, ignored", name, class);
    }
    NewRecord::from_roll_call(class.as_str(), teacher, session_date, roster, &present)
}

/// Starts from an existing record and overlays the given values.
fn apply_changes(
    gateway: &SyncGateway,
    existing: &AttendanceRecord,
    class: Option<ClassName>,
    values: &AttendanceArgs,
) -> NewRecord {
    let class_name = class
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| existing.class_name.clone());
    let teacher = values
        .teacher
        .clone()
        .unwrap_or_else(|| existing.teacher_name.clone());
    let session_date = values
        .date
        .clone()
        .unwrap_or_else(|| existing.display_date());

    let mut entry = NewRecord::new(class_name.as_str(), teacher.as_str(), session_date.as_str())
        .with_present(existing.present_count)
        .with_total(existing.total_count)
        .with_visitors(&existing.visitor_names);
    entry.present_names = existing.present_names.clone();

    if let Some(count) = values.present {
        entry.present_count = count;
        entry.present_names = None;
    }
    if let Some(names) = &values.present_names {
        let roster = gateway.list_roster(&class_name);
        let present = split_names(names);
        let kept: Vec<String> = present.into_iter().filter(|n| roster.contains(n)).collect();
        entry = entry
            .with_present(kept.len() as u32)
            .with_present_names(kept);
    }
    if let Some(total) = values.total {
        entry = entry.with_total(total);
    }
    if let Some(visitors) = &values.visitors {
        entry = entry.with_visitors(visitors);
    }
    entry
}

fn print_table(records: &[AttendanceRecord]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    println!(
        "{:<14} {:<10} {:<16} {:<20} {:>9}  Visitantes",
        "ID", "Data", "Turma", "Professor(a)", "Presença"
    );
    println!("{}", "-".repeat(84));
    for record in records {
        let visitors = record.visitors();
        println!(
            "{:<14} {:<10} {:<16} {:<20} {:>9}  {}",
            record.id.to_string(),
            record.display_date(),
            record.class_name,
            record.teacher_name,
            format!("{}/{}", record.present_count, record.total_count),
            if visitors.is_empty() {
                "-".to_string()
            } else {
                visitors.join(", ")
            }
        );
    }
    println!();
    println!("{} record(s)", records.len());
}

fn print_record(record: &AttendanceRecord) {
    println!("{}", record);
    println!("Ausentes: {}", record.absent());
}
