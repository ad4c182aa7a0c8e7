//! flowcoach CLI - inspect and exercise the adaptive coaching state.

use anyhow::Result;
use clap::{Parser, Subcommand};
use flowcoach_coach::AdaptiveCoach;
use flowcoach_core::FlowIntensity;
use flowcoach_storage::JsonProfileStore;
use serde_json::json;
use tracing::Level;

#[derive(Parser)]
#[command(name = "flowcoach")]
#[command(about = "Adaptive workflow coaching", long_about = None)]
struct Cli {
    /// Data directory holding the profile and progress documents
    #[arg(long, default_value = ".flowcoach")]
    data_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the learned profile
    Profile,
    /// Show progress counters and streak
    Stats,
    /// Show personalized suggestions
    Suggest,
    /// Record a completed step
    Step {
        /// Workflow the step belongs to
        workflow: String,
        /// Short description of the step
        description: String,
    },
    /// Record a completed workflow
    Complete {
        /// Workflow type
        workflow: String,
        /// Steps the workflow took
        #[arg(long, default_value = "1")]
        steps: u32,
        /// Duration in minutes
        #[arg(long, default_value = "0")]
        minutes: f64,
        /// Mark the completion as failed
        #[arg(long)]
        failed: bool,
        /// Free-text context for trigger-word learning
        #[arg(long)]
        context: Option<String>,
    },
    /// Set flow mode and intensity
    Flow {
        /// Intensity: whisper, gentle, or active
        intensity: String,
        /// Turn flow mode off
        #[arg(long)]
        off: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let store = JsonProfileStore::new(&cli.data_dir).await?;
    let mut coach = AdaptiveCoach::open(store).await;

    match cli.command {
        Commands::Profile => {
            let profile = coach.profile();
            println!("Profile: {}", profile.id);
            println!("  Created: {}", profile.created_at);
            println!("  Last active: {}", profile.last_active);
            println!("  Workflow patterns ({})", profile.workflow_patterns.len());
            for pattern in &profile.workflow_patterns {
                let rate = pattern
                    .completion_rate
                    .map(|r| format!("{:.0}%", r * 100.0))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "    {} | {} completions | rate {} | avg {:.1} min",
                    pattern.workflow_type, pattern.total_completions, rate, pattern.average_minutes,
                );
            }
            println!("  Achievements ({})", profile.achievements.len());
            for achievement in &profile.achievements {
                println!("    {} - {}", achievement.title, achievement.description);
            }
        }
        Commands::Stats => {
            let stats = coach.progress();
            println!("Progress");
            println!("  Steps: {}", stats.total_steps);
            println!("  Workflows completed: {}", stats.workflows_completed);
            println!(
                "  Avg steps/workflow: {:.1}",
                stats.average_steps_per_workflow
            );
            println!("  Streak: {} day(s)", stats.streak_days);
            println!(
                "  Hint acceptance: {:.0}%",
                coach.profile().behavior.hint_acceptance_rate * 100.0
            );
        }
        Commands::Suggest => {
            let suggestions = coach.personalized_suggestions();
            if suggestions.is_empty() {
                println!("No suggestions yet - keep working and check back.");
            }
            for suggestion in suggestions {
                println!("- {}", suggestion);
            }
        }
        Commands::Step {
            workflow,
            description,
        } => {
            coach.record_workflow_usage(&workflow, None);
            let outcome = coach
                .record_tool_usage(&description, Some(&json!({"completed_step": true})));
            for milestone in outcome.milestones {
                println!("{}", milestone.message());
            }
            coach.end_session().await?;
            println!("Recorded step for '{}'", workflow);
        }
        Commands::Complete {
            workflow,
            steps,
            minutes,
            failed,
            context,
        } => {
            coach.record_workflow_usage(&workflow, context.as_deref());
            let outcome =
                coach.record_workflow_completion(&workflow, steps, minutes, !failed);
            for milestone in outcome.milestones {
                println!("{}", milestone.message());
            }
            for achievement in outcome.achievements {
                println!("Achievement unlocked: {}", achievement.title);
            }
            coach.end_session().await?;
            println!("Recorded completion for '{}'", workflow);
        }
        Commands::Flow { intensity, off } => {
            let intensity = parse_intensity(&intensity)
                .ok_or_else(|| anyhow::anyhow!("Unknown intensity: {}", intensity))?;
            coach.update_flow_state(!off, intensity);
            coach.end_session().await?;
            println!(
                "Flow mode {} at {:?} intensity",
                if off { "off" } else { "on" },
                intensity
            );
        }
    }

    Ok(())
}

fn parse_intensity(s: &str) -> Option<FlowIntensity> {
    match s.to_lowercase().as_str() {
        "whisper" => Some(FlowIntensity::Whisper),
        "gentle" => Some(FlowIntensity::Gentle),
        "active" => Some(FlowIntensity::Active),
        _ => None,
    }
}
