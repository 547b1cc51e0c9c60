//! Console host for the booking client.
//!
//! Renders every state snapshot to stdout and turns stdin commands into
//! bus pushes, the way a browser host would forward DOM events.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use boxoffice_lib::booking::{HttpBookingClient, TicketAmountInput};
use boxoffice_lib::config::AppConfig;
use boxoffice_lib::db::Database;
use boxoffice_lib::identity::{IdentityProvider, StoredIdentity};
use boxoffice_lib::navigation::MemoryHistory;
use boxoffice_lib::pages::counter::{CounterPage, CounterView};
use boxoffice_lib::pages::movies::{
    load_catalog, sample_catalog, BookMovieTicketsPage, Movie, MoviesView,
};
use boxoffice_lib::pages::Render;
use boxoffice_lib::runtime::StateDriver;
use boxoffice_lib::storage::{KeyValueStore, MemoryStore};
use boxoffice_lib::AppError;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageSelection {
    Movies,
    Counter,
}

impl PageSelection {
    fn from_flag(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "movies" => Ok(Self::Movies),
            "counter" => Ok(Self::Counter),
            _ => Err(format!(
                "unsupported --page value '{value}'. Use movies or counter"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    page: PageSelection,
    url: Option<String>,
    catalog: Option<PathBuf>,
    api: Option<String>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        page: PageSelection::Movies,
        url: None,
        catalog: None,
        api: None,
        help: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            parsed.help = true;
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let mut value = || match inline.clone() {
            Some(value) => Ok(value),
            None => args.next().ok_or_else(|| format!("{flag} requires a value")),
        };

        match flag.as_str() {
            "--page" => parsed.page = PageSelection::from_flag(&value()?)?,
            "--url" => parsed.url = Some(value()?),
            "--catalog" => parsed.catalog = Some(PathBuf::from(value()?)),
            "--api" => parsed.api = Some(value()?),
            _ => return Err(format!("unknown argument '{arg}'. Use --help for usage")),
        }
    }

    Ok(parsed)
}

fn print_help() {
    println!(
        "boxoffice\n\n\
         Usage: boxoffice [--page movies|counter] [--url PATH] [--catalog FILE] [--api URL]\n\n\
         Commands (movies page):\n  \
           tickets <movie-id> <amount>  type into a movie's ticket field\n  \
           book                         press \"Book now\"\n  \
           back | forward               walk the history\n  \
           reload                       reload the movie catalog\n  \
           user                         print your user id\n  \
           show                         re-render the current state\n  \
           quit\n\n\
         Commands (counter page):\n  \
           click | show | quit\n\n\
         Environment: BOXOFFICE_API_URL, BOXOFFICE_DATA_DIR, BOXOFFICE_CATALOG,\n\
         BOXOFFICE_INITIAL_URL, BOXOFFICE_REQUEST_TIMEOUT_MS, RUST_LOG"
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tickets { movie_id: String, text: String },
    Book,
    Back,
    Forward,
    Reload,
    User,
    Click,
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word {
        "tickets" => {
            let rest = rest.trim_start();
            let (movie_id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if movie_id.is_empty() {
                return Err("usage: tickets <movie-id> <amount>".to_string());
            }
            // The amount is passed through untouched; validation happens downstream.
            Ok(Command::Tickets {
                movie_id: movie_id.to_string(),
                text: text.trim_start().to_string(),
            })
        }
        "book" => Ok(Command::Book),
        "back" => Ok(Command::Back),
        "forward" => Ok(Command::Forward),
        "reload" => Ok(Command::Reload),
        "user" => Ok(Command::User),
        "click" => Ok(Command::Click),
        "show" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn load_movies(path: Option<&Path>) -> Result<im::Vector<Movie>, AppError> {
    match path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(sample_catalog()),
    }
}

/// The SQLite store, or a session-only store when the database is unusable.
fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    let opened = config
        .db_path()
        .map_err(AppError::from)
        .and_then(|path| Database::open(path).map_err(AppError::from));
    match opened {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::warn!("falling back to in-memory storage, identity will not persist: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("boxoffice failed: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let args = parse_args(std::env::args().skip(1)).map_err(AppError::Other)?;
    if args.help {
        print_help();
        return Ok(());
    }

    boxoffice_lib::init_tracing();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = args.url {
        config.initial_url = url;
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(api) = args.api {
        config.api_base_url = api;
    }

    match args.page {
        PageSelection::Movies => run_movies(config).await,
        PageSelection::Counter => run_counter().await,
    }
}

async fn run_movies(config: AppConfig) -> Result<(), AppError> {
    let identity = Arc::new(StoredIdentity::new(open_store(&config)));
    let client = Arc::new(HttpBookingClient::new(
        &config.api_base_url,
        config.request_timeout,
    )?);
    let history = Arc::new(MemoryHistory::new(config.initial_url.clone()));
    let movies = load_movies(config.catalog_path.as_deref())?;

    tracing::info!(
        "booking page starting at {} against {}",
        config.initial_url,
        client.base_url()
    );

    let page = BookMovieTicketsPage::new(identity.clone(), client, history.clone());

    let mut failures = page.submission_failures();
    tokio::spawn(async move {
        while let Some(failure) = failures.next().await {
            tracing::warn!("{failure}");
        }
    });

    let view = MoviesView::new()?;
    let initial = BookMovieTicketsPage::initial_state(movies, config.initial_url.clone(), im::HashMap::new());
    let driver = StateDriver::start(page.application_state(initial), move |state| {
        println!("{}", view.render(state));
    })
    .await?;
    let view = MoviesView::new()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            Command::Tickets { movie_id, text } => {
                let input = TicketAmountInput::new(movie_id, text);
                if let Err(e) = page.enter_amount(&driver.latest(), input) {
                    eprintln!("{e}");
                }
            }
            Command::Book => page.booking_clicked().push(()),
            Command::Back => match history.back() {
                Some(_) => page.pop_state().push(()),
                None => eprintln!("already at the oldest history entry"),
            },
            Command::Forward => match history.forward() {
                Some(_) => page.pop_state().push(()),
                None => eprintln!("already at the newest history entry"),
            },
            Command::Reload => match load_movies(config.catalog_path.as_deref()) {
                Ok(movies) => page.catalog_reloaded().push(movies),
                Err(e) => tracing::warn!("catalog reload failed: {e}"),
            },
            Command::User => println!("{}", identity.get_or_create()),
            Command::Show => println!("{}", view.render(&driver.latest())),
            Command::Click => eprintln!("there is no counter on this page"),
            Command::Quit => break,
        }

        if !driver.is_running() {
            tracing::warn!("state stream ended");
            break;
        }
    }

    driver.stop();
    Ok(())
}

async fn run_counter() -> Result<(), AppError> {
    let page = CounterPage::new();
    let driver = StateDriver::start(
        page.application_state(CounterPage::initial_state()),
        |state| println!("{}", CounterView.render(state)),
    )
    .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Click) => page.clicked().push(()),
            Ok(Command::Show) => println!("{}", CounterView.render(&driver.latest())),
            Ok(Command::Quit) => break,
            Ok(other) => eprintln!("{other:?} is not available on the counter page"),
            Err(message) => eprintln!("{message}"),
        }
    }

    driver.stop();
    Ok(())
}
