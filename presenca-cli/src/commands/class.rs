use clap::{Args, Subcommand};
use presenca_core::ClassName;
use serde::Serialize;

use super::{confirm, to_index, OutputFormat};
use crate::config::Config;
use crate::context::{Context, Refresh};

const UNASSIGNED: &str = "Não atribuído";

#[derive(Args)]
pub struct ClassCommand {
    #[command(subcommand)]
    pub command: ClassSubcommand,
}

#[derive(Subcommand)]
pub enum ClassSubcommand {
    /// List classes with their student count and teacher
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the roster of a class
    Show {
        /// Class name (accents and case are ignored)
        class: ClassName,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Enrol a student
    Add {
        class: ClassName,

        /// Student name
        name: String,
    },

    /// Rename the student at a roster position
    Rename {
        class: ClassName,

        /// Position as shown by `class show` (starting at 1)
        position: usize,

        /// New name
        name: String,
    },

    /// Remove the student at a roster position
    Remove {
        class: ClassName,

        /// Position as shown by `class show` (starting at 1)
        position: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ClassSubcommand {
    fn refresh(&self) -> Refresh {
        match self {
            ClassSubcommand::List { .. } | ClassSubcommand::Show { .. } => Refresh::Auto,
            _ => Refresh::IfEmpty,
        }
    }
}

#[derive(Serialize)]
struct ClassRow {
    name: ClassName,
    students: usize,
    teacher: Option<String>,
}

impl ClassCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let mut ctx = Context::open(config, self.command.refresh()).await?;
            let result = self.execute(&mut ctx).await;
            ctx.close().await;
            result
        })
    }

    async fn execute(&self, ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
        let gateway = &mut ctx.gateway;

        match &self.command {
            ClassSubcommand::List { format } => {
                let rows: Vec<ClassRow> = gateway
                    .classes()
                    .into_iter()
                    .map(|class| ClassRow {
                        name: class,
                        students: gateway.students(class.as_str()).len(),
                        teacher: gateway.teacher_for(class.as_str()).map(str::to_string),
                    })
                    .collect();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Text => {
                        if rows.is_empty() {
                            println!("No classes available. Try 'presenca sync'.");
                            return Ok(());
                        }
                        println!("{:<16} {:>6}  Professor(a)", "Turma", "Alunos");
                        println!("{}", "-".repeat(44));
                        for row in rows {
                            println!(
                                "{:<16} {:>6}  {}",
                                row.name.as_str(),
                                row.students,
                                row.teacher.as_deref().unwrap_or(UNASSIGNED)
                            );
                        }
                    }
                }
            }

            ClassSubcommand::Show { class, format } => {
                let students = gateway.students(class.as_str());
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(students)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", class);
                        println!("{}", "=".repeat(30));
                        println!(
                            "Prof. {}",
                            gateway.teacher_for(class.as_str()).unwrap_or(UNASSIGNED)
                        );
                        println!();
                        if students.is_empty() {
                            println!("No students enrolled.");
                        }
                        for (i, student) in students.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, student.name);
                        }
                    }
                }
            }

            ClassSubcommand::Add { class, name } => {
                let student = gateway.add_student(class.as_str(), name).await?;
                println!("Enrolled {} in {} (id {})", student.name, class, student.id);
            }

            ClassSubcommand::Rename {
                class,
                position,
                name,
            } => {
                let index = to_index(*position)?;
                let student = gateway.update_student(class.as_str(), index, name).await?;
                println!("Renamed student in {} to {}", class, student.name);
            }

            ClassSubcommand::Remove {
                class,
                position,
                force,
            } => {
                let index = to_index(*position)?;
                let name = gateway
                    .roster()
                    .student_at(class.as_str(), index)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| format!("No student at position {} in {}", position, class))?;

                if !force && !confirm(&format!("Remove '{}' from {}?", name, class))? {
                    println!("Removal cancelled.");
                    return Ok(());
                }

                let removed = gateway.remove_student(class.as_str(), index).await?;
                println!("Removed {} from {}", removed.name, class);
            }
        }

        Ok(())
    }
}
