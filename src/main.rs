//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use pickem::{
    cli::{Commands, GetCmd, Pickem, SetCmd},
    commands::{
        award::handle_award,
        gate::handle_gate,
        picks::handle_user_picks,
        rankings::{handle_all_time_rankings, handle_weekly_rankings},
        set::{handle_set_pick, handle_set_user, handle_set_week, WeekParams},
        CommandContext,
    },
    Result,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pickem=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = Pickem::parse();
    let mut ctx = CommandContext::new(&app.global)?;

    match app.command {
        Commands::Get { cmd } => match cmd {
            GetCmd::Gate { week, at } => handle_gate(&mut ctx, week, at).await?,

            GetCmd::WeeklyRankings {
                week,
                json,
                with_fixtures,
            } => handle_weekly_rankings(&mut ctx, week, json, with_fixtures).await?,

            GetCmd::Picks { week, user, json } => handle_user_picks(&ctx, week, user, json)?,

            GetCmd::AllTimeRankings { limit, json } => handle_all_time_rankings(&ctx, limit, json)?,
        },

        Commands::Set { cmd } => match cmd {
            SetCmd::User { id, name } => handle_set_user(&mut ctx, id, name)?,

            SetCmd::Week {
                id,
                from,
                to,
                matches,
                deadline,
                force_open,
            } => handle_set_week(
                &mut ctx,
                WeekParams {
                    id,
                    from,
                    to,
                    matches,
                    deadline,
                    force_open,
                },
            )?,

            SetCmd::Pick {
                week,
                user,
                match_id,
                pick,
            } => handle_set_pick(&mut ctx, week, user, match_id, pick).await?,
        },

        // `--all` and `--user` are mutually exclusive, so no user means all
        Commands::Award { user, all: _, json } => handle_award(&mut ctx, user, json).await?,
    }

    Ok(())
}
