//! A terminal front end for the product screens, backed by the in-memory
//! document store.

use std::sync::Arc;

use clap::Parser;
use db::{DaoConfig, DEFAULT_COLLECTION};
use docstore::DocumentClient;
use docstore_mock_impl::MemoryStore;
use health::HealthReporter;
use listing::TextRow;
use miette::{Context, IntoDiagnostic};
use screens::{MainScreen, Notifier, ProductScreen, Screen};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{
  layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const HELP: &str = "\
commands:
  open                 go to the product screen
  back                 return to the main screen
  name <text>          set the name field
  secret <text>        set the secret field
  id <text>            set the id field
  create | read | update | delete
  list                 show the loaded products
  tap <row>            tap a row of the product list
  status               show component health
  help | quit";

/// Manage products in a document collection from the terminal.
#[derive(Parser, Debug)]
#[command(name = "product-console", version)]
struct Args {
  /// The collection products are stored in.
  #[arg(long, default_value = DEFAULT_COLLECTION)]
  collection: String,

  /// The log filter used when `RUST_LOG` is unset.
  #[arg(long, default_value = "info")]
  log_level: String,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  fn notify(&self, message: &str) { println!(">> {message}"); }
}

fn init_tracing(default_filter: &str) -> miette::Result<()> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_filter))
    .into_diagnostic()
    .context("invalid log filter")?;

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true),
    )
    .with(filter)
    .try_init()
    .into_diagnostic()
    .context("failed to install tracing subscriber")
}

struct Console {
  store:    Arc<MemoryStore>,
  config:   DaoConfig,
  notifier: Arc<dyn Notifier>,
  main:     MainScreen,
  products: Option<ProductScreen>,
}

impl Console {
  fn screen(&self) -> Screen {
    match self.products {
      Some(_) => Screen::Products,
      None => Screen::Main,
    }
  }

  fn open_products(&mut self) {
    if self.products.is_some() {
      return;
    }
    if self.main.open_products() == Screen::Products {
      // each screen gets its own client, as the previous one was terminated
      let client = DocumentClient::new(self.store.reconnect());
      self.products = Some(ProductScreen::open(
        client,
        self.config.clone(),
        self.notifier.clone(),
      ));
    }
  }

  async fn close_products(&mut self) -> miette::Result<()> {
    if let Some(screen) = self.products.take() {
      screen
        .close()
        .await
        .into_diagnostic()
        .context("failed to release store session")?;
    }
    Ok(())
  }

  async fn print_status(&self) {
    let mut reporters: Vec<&dyn HealthReporter> = vec![self.store.as_ref()];
    if let Some(screen) = &self.products {
      reporters.push(screen.session());
    }
    for (name, status) in health::check_all(&reporters).await {
      println!("{name}: {status}");
    }
  }

  /// Runs one command. Returns `false` when the console should exit.
  async fn run(&mut self, command: &str, arg: &str) -> miette::Result<bool> {
    match command {
      "quit" | "exit" => return Ok(false),
      "help" => println!("{HELP}"),
      "open" => self.open_products(),
      "back" => self.close_products().await?,
      "status" => self.print_status().await,
      _ => self.run_on_products(command, arg).await,
    }
    Ok(true)
  }

  async fn run_on_products(&mut self, command: &str, arg: &str) {
    let Some(screen) = self.products.as_mut() else {
      println!("unknown command on the main screen; try `open` or `help`");
      return;
    };

    match command {
      "name" => screen.name.set(arg),
      "secret" => screen.secret.set(arg),
      "id" => screen.id.set(arg),
      "create" => {
        screen.create();
        screen.settle().await;
      }
      "read" => {
        screen.read_all();
        screen.settle().await;
      }
      "update" => {
        screen.update();
        screen.settle().await;
      }
      "delete" => {
        screen.delete();
        screen.settle().await;
      }
      "list" => {
        let adapter = screen.adapter();
        for index in 0..adapter.row_count() {
          let mut row = TextRow::default();
          if adapter.bind(&mut row, index).is_ok() {
            println!("[{index}] {} ({})", row.primary(), row.secondary());
          }
        }
      }
      "tap" => {
        let Ok(index) = arg.parse::<usize>() else {
          println!("`tap` expects a row number");
          return;
        };
        let mut row = TextRow::default();
        match screen.adapter().bind(&mut row, index) {
          Ok(()) => {
            row.tap();
          }
          Err(e) => println!("{e}"),
        }
      }
      other => println!("unknown command `{other}`; try `help`"),
    }
  }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
  let args = Args::parse();
  init_tracing(&args.log_level)?;

  let mut console = Console {
    store:    MemoryStore::new(),
    config:   DaoConfig::with_collection(args.collection),
    notifier: Arc::new(ConsoleNotifier),
    main:     MainScreen,
    products: None,
  };

  println!("{HELP}");
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  loop {
    let prompt = match console.screen() {
      Screen::Main => "main",
      Screen::Products => "products",
    };
    println!("[{prompt}]");

    let Some(line) = lines
      .next_line()
      .await
      .into_diagnostic()
      .context("failed to read from stdin")?
    else {
      break;
    };

    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let (command, arg) = line
      .split_once(char::is_whitespace)
      .map_or((line, ""), |(c, a)| (c, a.trim()));

    if !console.run(command, arg).await? {
      break;
    }
  }

  console.close_products().await
}
