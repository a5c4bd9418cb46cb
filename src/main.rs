use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use folio_admin::config::ClientConfig;
use folio_admin::list::pager;
use folio_admin::list::ListController;
use folio_admin::models::Record;
use folio_admin::models::auth::LoginCredentials;
use folio_admin::models::query::{self, FilterQuery, QueryValue};
use folio_admin::services::auth;
use folio_admin::services::collection::Collection;
use folio_admin::services::resource::{FieldToggle, Resource};
use folio_admin::AdminState;
use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "folio-admin", version, about = "Portfolio CMS admin client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOLIO_ADMIN_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// List one page of a collection
    List {
        collection: Collection,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        /// Extra filters as key=value
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// List a collection and refetch page 1 for each search term typed on stdin
    Browse {
        collection: Collection,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete an item by id
    Delete { collection: Collection, id: String },
    /// Apply a toggle: toggle, feature, verify, publish, spam or status=<value>
    Toggle {
        collection: Collection,
        id: String,
        action: String,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "folio_admin=info".into()))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("FOLIO_API_URL must be set")?;
    let state = AdminState::from_config(config)?;

    match cli.command {
        Command::Login { email, password } => {
            let admin = auth::login(&state.api, &LoginCredentials { email, password }).await?;
            println!("Signed in as {} <{}>", admin.username, admin.email);
        }
        Command::Logout => {
            auth::logout(&state.api);
            println!("Signed out");
        }
        Command::Whoami => match state.session.current_user() {
            Some(admin) => println!("{} <{}> ({:?})", admin.username, admin.email, admin.role),
            None => println!("Not signed in"),
        },
        Command::List {
            collection,
            page,
            limit,
            search,
            filters,
        } => {
            let mut query = FilterQuery::new()
                .with(query::LIMIT, limit.unwrap_or(state.config.default_page_limit))
                .with_opt(query::SEARCH, search);
            for (key, value) in &filters {
                query.set(key, QueryValue::parse(value));
            }
            query.set_page(page);

            let mut list = ListController::new(collection.records(&state.api), query);
            list.reload().await?;
            print_page(&list)?;
        }
        Command::Browse { collection, limit } => {
            let query = FilterQuery::new()
                .with(query::LIMIT, limit.unwrap_or(state.config.default_page_limit));
            let mut list = ListController::new(collection.records(&state.api), query);
            list.reload().await?;
            print_page(&list)?;

            let (input, mut terms) = state.search_input();
            tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if !input.push(line) {
                        break;
                    }
                }
            });

            while let Some(result) = list.next_search(&mut terms).await {
                match result {
                    Ok(()) => print_page(&list)?,
                    Err(e) if e.is_session_expired() => return Err(e.into()),
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
        }
        Command::Delete { collection, id } => {
            collection.records(&state.api).delete(&id).await?;
            println!("Deleted {id} from {collection}");
        }
        Command::Toggle {
            collection,
            id,
            action,
        } => {
            let Some(toggle) = FieldToggle::parse(&action) else {
                bail!("unknown action `{action}`");
            };
            if !collection.supports(&toggle) {
                bail!("{collection} does not support `{action}`");
            }
            let fields = collection.records(&state.api).toggle(&id, &toggle).await?;
            println!("{}", serde_json::Value::Object(fields));
        }
    }

    Ok(())
}

fn print_page(list: &ListController<Resource<Record>>) -> anyhow::Result<()> {
    for item in list.items() {
        println!("{}", serde_json::to_string(item)?);
    }
    if let Some(meta) = list.meta() {
        match list.result_range() {
            Some((from, to)) => eprintln!("Showing {from} to {to} of {}", meta.total),
            None => eprintln!("No results"),
        }
        eprintln!("Pages: {}", pager::render(&list.page_sequence(), meta.current));
    }
    Ok(())
}
