use clap::Args;
use presenca_core::{ClassName, ClassSummary, RecordFilter, Summary};
use serde::Serialize;

use super::OutputFormat;
use crate::config::Config;
use crate::context::{Context, Refresh};

/// Attendance totals, overall and per class
#[derive(Args)]
pub struct ReportCommand {
    /// Only sessions on this date (DD/MM/YYYY)
    #[arg(long, short)]
    date: Option<String>,

    /// Only sessions of this class
    #[arg(long)]
    class: Option<ClassName>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    overall: Summary,
    classes: Vec<ClassSummary>,
}

impl ReportCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let ctx = Context::open(config, Refresh::Auto).await?;

            let mut filter = RecordFilter::new();
            if let Some(date) = &self.date {
                filter = filter.with_date(date.as_str());
            }
            if let Some(class) = &self.class {
                filter = filter.with_class(class.as_str());
            }

            let mut classes = ctx.gateway.class_summaries(&filter);
            if let Some(class) = self.class {
                classes.retain(|c| c.class_name == class);
            }
            let report = Report {
                date: self.date.clone(),
                overall: ctx.gateway.summary(&filter),
                classes,
            };
            ctx.close().await;

            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => print_report(&report),
            }
            Ok(())
        })
    }
}

fn print_report(report: &Report) {
    match &report.date {
        Some(date) => println!("Relatório de {}", date),
        None => println!("Relatório geral"),
    }
    println!("{}", "=".repeat(30));
    println!("{}", report.overall);

    if report.classes.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<16} {:>9} {:>8} {:>10} {:>6}",
        "Turma", "Presentes", "Ausentes", "Visitantes", "Total"
    );
    println!("{}", "-".repeat(53));
    for class in &report.classes {
        let s = &class.summary;
        println!(
            "{:<16} {:>9} {:>8} {:>10} {:>6}",
            class.class_name.as_str(),
            s.present_total,
            s.absent_total,
            s.visitor_total,
            s.grand_total
        );
    }
}
