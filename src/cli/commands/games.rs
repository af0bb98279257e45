use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Subcommand;

use crate::cli::utils::{output_rows, output_success, parse_bgg_pair};
use crate::cli::OutputFormat;
use crate::database::Database;
use crate::services::{CatalogService, GameInput};
use crate::types::TagType;

#[derive(Subcommand)]
pub enum GameCommands {
    #[command(about = "Add a game, or refresh the one with the same BGG id")]
    Add {
        #[arg(help = "BoardGameGeek id")]
        bgg_id: i64,
        #[arg(help = "Name")]
        name: String,
        #[arg(long, help = "Image path, relative to IMAGE_STORAGE_ROOT or absolute")]
        image: Option<String>,
        #[arg(long, help = "Shelf or storage location")]
        location: Option<String>,
        #[arg(long = "publisher", value_parser = parse_bgg_pair, help = "ID=NAME, repeatable")]
        publishers: Vec<(i64, String)>,
        #[arg(long = "category", value_parser = parse_bgg_pair, help = "ID=NAME, repeatable")]
        categories: Vec<(i64, String)>,
        #[arg(long = "mechanic", value_parser = parse_bgg_pair, help = "ID=NAME, repeatable")]
        mechanics: Vec<(i64, String)>,
    },

    #[command(about = "List games not refreshed since a date")]
    Stale {
        #[arg(help = "Cutoff date, YYYY-MM-DD")]
        before: NaiveDate,
    },
}

pub async fn handle(cmd: GameCommands, db: &Database, output_format: OutputFormat) -> anyhow::Result<()> {
    let catalog = CatalogService::new(db.clone());

    match cmd {
        GameCommands::Add { bgg_id, name, image, location, publishers, categories, mechanics } => {
            let tags = categories
                .into_iter()
                .map(|(id, name)| (id, name, TagType::Category))
                .chain(mechanics.into_iter().map(|(id, name)| (id, name, TagType::Mechanic)))
                .collect();

            let game = catalog
                .add_game(GameInput { bgg_id, name, image_path: image, location, publishers, tags })
                .await
                .context("saving game")?;

            output_success(
                output_format,
                &format!("Saved {} (BGG {})", game.name, game.bgg_id),
                Some(serde_json::to_value(&game)?),
            )
        }
        GameCommands::Stale { before } => {
            let cutoff = Utc.from_utc_datetime(&before.and_time(NaiveTime::default()));
            let games = catalog.stale_games(cutoff).await?;
            output_rows(output_format, &games, "Every game is up to date", |game| {
                format!("{:>8}  {:<40} {}", game.bgg_id, game.name, game.last_updated.format("%Y-%m-%d"))
            })
        }
    }
}
