use clap::Parser;
use dotenvy::dotenv;
use rust_chatroom::AppContext;
use rust_chatroom::config;
use rust_chatroom::storage::LocalStorage;
use rust_chatroom::ui::ChatApp;
use tokio::runtime::Handle;

#[derive(Parser)]
#[command(
    name = "rust_chatroom",
    version,
    about = "Chatroom client with mock OTP login and simulated AI replies"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Override the local storage database path
    #[arg(long, value_name = "FILE")]
    storage: Option<String>,
    /// Clear persisted local storage before starting
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(path) = cli.storage {
        app_config.storage_path = path;
    }

    let storage = match open_storage(&app_config.storage_path) {
        Ok(storage) => storage,
        Err(err) => {
            log::error!("Local storage unavailable: {err}");
            std::process::exit(1);
        }
    };
    if cli.reset {
        match storage.clear() {
            Ok(()) => log::info!("Cleared local storage at {}", app_config.storage_path),
            Err(err) => log::warn!("Failed to clear local storage: {err}"),
        }
    }

    let context = AppContext::create(app_config, storage, Handle::current());

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Gemini Chat",
        options,
        Box::new(move |cc| {
            log::info!("Client started");
            Ok(Box::new(ChatApp::new(cc, context)))
        }),
    )
}

/// Falls back to volatile storage when the database file cannot be opened.
fn open_storage(path: &str) -> rusqlite::Result<LocalStorage> {
    match LocalStorage::with_path(path) {
        Ok(storage) => Ok(storage),
        Err(err) => {
            log::error!("Failed to open local storage {path}: {err}; using in-memory storage");
            LocalStorage::in_memory()
        }
    }
}
