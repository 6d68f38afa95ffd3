use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use tagmap::config::AppConfig;
use tagmap::core::categories::split_cats;
use tagmap::core::views::{
    build_tmap, global_cat_counts, links_page, suggest_categories, GlobalCatsOptions,
    LinksPageOptions, TmapOptions,
};
use tagmap::database::Database;

/// Category suggestions, leaderboards and link views over a tagmap database.
#[derive(Parser, Debug)]
#[command(name = "tagmap", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Category suggestions for a typed snippet
    Suggest {
        snippet: String,
        /// Categories already chosen, comma-joined
        #[arg(long)]
        omit: Option<String>,
        /// Return the longer suggestion list
        #[arg(long)]
        more: bool,
    },
    /// Most used categories across all links
    TopCats {
        /// Only links submitted within day|week|month|year
        #[arg(short, long)]
        period: Option<String>,
        /// Only subcategories of these comma-joined categories
        #[arg(short, long, default_value = "")]
        cats: String,
        #[arg(long)]
        more: bool,
    },
    /// A user's treasure map
    Tmap {
        owner: String,
        /// submitted|copied|tagged
        #[arg(short, long)]
        section: Option<String>,
        #[arg(short, long, default_value = "")]
        cats: String,
        #[arg(short, long)]
        period: Option<String>,
        /// Id of the user viewing the map
        #[arg(long)]
        as_user: Option<String>,
        #[arg(long)]
        nsfw: bool,
        /// Newest first instead of most liked first
        #[arg(long)]
        newest: bool,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// Trending links
    Links {
        #[arg(short, long, default_value = "")]
        cats: String,
        #[arg(short, long)]
        period: Option<String>,
        #[arg(long)]
        as_user: Option<String>,
        #[arg(long)]
        nsfw: bool,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    let _log_guard = tagmap::core::logging::init(&config.log_dir(), &config.logging.filter);
    log::info!("{} v{} starting", tagmap::NAME, tagmap::VERSION);

    let db = Database::new(&config.data_dir())
        .await
        .with_context(|| format!("failed to open database in {}", config.data_dir().display()))?;
    log::info!("Using database at {}", db.path().display());

    match cli.command {
        Commands::Suggest {
            snippet,
            omit,
            more,
        } => {
            let omit: Option<Vec<String>> =
                omit.map(|raw| split_cats(&raw).map(|cat| cat.trim().to_string()).collect());
            print_json(&suggest_categories(&db, &snippet, omit.as_deref(), more).await?)
        }
        Commands::TopCats { period, cats, more } => {
            let opts = GlobalCatsOptions { cats, period, more };
            print_json(&global_cat_counts(&db, &opts).await?)
        }
        Commands::Tmap {
            owner,
            section,
            cats,
            period,
            as_user,
            nsfw,
            newest,
            page,
        } => {
            let opts = TmapOptions {
                owner_login_name: owner,
                raw_cats: cats,
                period,
                signed_in_user: as_user,
                include_nsfw: nsfw,
                sort_by_newest: newest,
                section,
                page,
            };
            print_json(&build_tmap(&db, &opts).await?)
        }
        Commands::Links {
            cats,
            period,
            as_user,
            nsfw,
            page,
        } => {
            let opts = LinksPageOptions {
                cats,
                period,
                signed_in_user: as_user,
                nsfw,
                page,
            };
            print_json(&links_page(&db, &opts).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
