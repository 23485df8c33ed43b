use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::error::Error;
use std::sync::Arc;

use newsdesk::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    initialize_db_pool,
    models::{reaction::ReactionKind, user::NewUser},
    observability::init_logging,
    principal::Principal,
    recommendation::{ArticleFilter, CategoryScope},
    run_migrations,
    services::{articles, reports, users},
    tasks::notifier,
    DbPool,
};

/// CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Create a user (as the system admin)
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        admin: bool,
    },
    /// Print a user's ranked article listing
    Feed {
        #[arg(long)]
        user: i32,
        #[arg(long)]
        search: Option<String>,
        /// Only articles published today (UTC)
        #[arg(long)]
        today: bool,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        category: Option<i32>,
        /// like or dislike
        #[arg(long)]
        sort_by: Option<ReactionKind>,
    },
    /// File a report against an article
    Report {
        #[arg(long)]
        user: i32,
        #[arg(long)]
        article: i32,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Run a single notifier pass
    Notify,
    /// Run the notifier until interrupted
    Run,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = AppConfig::from_env()?;
    let db_pool = initialize_db_pool(&config.db_path)?;

    let mut conn = db_pool.get()?;
    let applied = run_migrations(&mut conn)?;
    tracing::info!(applied, "Database migrations complete");

    let clock = SystemClock;
    match args.command {
        Command::Migrate => {}
        Command::CreateUser { email, admin } => {
            let new_user = NewUser {
                email,
                is_admin: admin,
            };
            let user = users::create_user(&mut conn, &Principal::system(), &new_user)?;
            println!("Created user {} ({}, {})", user.id, user.email, user.role);
        }
        Command::Feed {
            user,
            search,
            today,
            from,
            to,
            category,
            sort_by,
        } => {
            let filter = ArticleFilter {
                search,
                today,
                from,
                to,
                category: CategoryScope::from(category),
                sort_by,
            };
            let principal = Principal::from(&users::get_user(&mut conn, user)?);
            let listing = articles::get_articles(&mut conn, &clock, &principal, &filter)?;
            for article in listing {
                println!("{}\t{}", article.id, article.title);
            }
        }
        Command::Report {
            user,
            article,
            reason,
        } => {
            let principal = Principal::from(&users::get_user(&mut conn, user)?);
            let changed = reports::report_article(
                &mut conn,
                &clock,
                &principal,
                article,
                &reason,
                config.report_threshold,
            )?;
            println!("Recorded {changed} report(s)");
        }
        Command::Notify => {
            let created = notifier::run_once(&mut conn, &clock)?;
            println!("Created {created} notifications");
        }
        Command::Run => {
            drop(conn);
            run_notifier(db_pool, Arc::new(clock), config)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn run_notifier(db_pool: DbPool, clock: Arc<dyn Clock>, config: AppConfig) -> std::io::Result<()> {
    tracing::info!(
        interval_secs = config.notify_interval.as_secs(),
        report_threshold = config.report_threshold,
        "Starting notifier"
    );
    tokio::select! {
        _ = notifier::start(db_pool, clock, config.notify_interval) => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutting down");
        }
    }
    Ok(())
}
