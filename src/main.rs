use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use gradebook_core::{
    build_matrix, calculate_gpa, calculate_overall_gpa, calculate_simple_gpa, export_gradebook,
    input, percentage_to_letter_grade, telemetry, GradingConfig,
};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "GPA calculation and gradebook export", long_about = None)]
struct Cli {
    #[command(flatten)]
    grading: GradingConfig,

    /// Emit logs as JSON lines
    #[arg(long, env = "GRADEBOOK_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a percentage to a letter grade and GPA
    Convert {
        #[arg(long, allow_hyphen_values = true)]
        percentage: f64,
    },
    /// Compute one course's GPA from a CSV of graded items
    CourseGpa {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Average course GPAs; use `-` for a course without a GPA
    Overall {
        #[arg(long = "gpa", required = true, num_args = 1.., allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Build the gradebook matrix and write it as CSV
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Reference time for due dates (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Print the gradebook matrix as JSON
    Matrix {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json, Level::WARN);

    let scale = cli.grading.scale().context("invalid grading configuration")?;

    match cli.command {
        Commands::Convert { percentage } => {
            let letter = percentage_to_letter_grade(percentage);
            println!(
                "{percentage}% -> {} ({:.2} on a {} scale)",
                letter,
                scale.percentage_to_gpa(percentage),
                scale.max()
            );
        }
        Commands::CourseGpa { csv } => {
            let items = input::load_graded_items(&csv)?;
            match calculate_gpa(&items, &scale) {
                Some(result) => {
                    println!(
                        "{:.2}% {} GPA {:.2} across {} items (total weight {})",
                        result.percentage,
                        result.letter_grade,
                        result.gpa,
                        result.graded_count,
                        result.total_weight
                    );
                    if let Some(simple) = calculate_simple_gpa(&items, &scale) {
                        println!("Unweighted GPA {simple:.2}");
                    }
                }
                None => println!("No graded items."),
            }
        }
        Commands::Overall { values } => {
            let values = input::parse_gpa_values(&values)?;
            match calculate_overall_gpa(&values) {
                Some(gpa) => println!("Overall GPA {gpa:.2}"),
                None => println!("Overall GPA N/A"),
            }
        }
        Commands::Export {
            input: input_path,
            out_dir,
            now,
        } => {
            let now = now.unwrap_or_else(Utc::now);
            let gradebook = input::load_gradebook_input(&input_path)?;
            let matrix = build_matrix(&gradebook, now, &scale).with_context(|| {
                format!("failed to build gradebook from {}", input_path.display())
            })?;

            let exported = export_gradebook(&matrix, now.date_naive())
                .context("gradebook matrix is inconsistent")?;
            let Some(bundle) = exported else {
                println!("No students to export for {}.", matrix.course_code);
                return Ok(());
            };

            let out = out_dir.join(&bundle.filename);
            std::fs::write(&out, &bundle.content)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), cells = bundle.stats.total_cells, "export written");
            println!(
                "Wrote {} ({} students, {} assignments, {} cells).",
                out.display(),
                bundle.stats.student_count,
                bundle.stats.assignment_count,
                bundle.stats.total_cells
            );
        }
        Commands::Matrix {
            input: input_path,
            now,
        } => {
            let now = now.unwrap_or_else(Utc::now);
            let gradebook = input::load_gradebook_input(&input_path)?;
            let matrix = build_matrix(&gradebook, now, &scale).with_context(|| {
                format!("failed to build gradebook from {}", input_path.display())
            })?;
            println!("{}", serde_json::to_string_pretty(&matrix)?);
        }
    }

    Ok(())
}
