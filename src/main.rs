use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

mod config;
mod display;
mod error;
mod events;
mod mappings;
mod services;
mod stopwatch;
mod utils;

use config::Config;
use display::{spawn_stdin_reader, TerminalSurface};
use services::{create_input_hook, create_keyboard_listener, HotkeyRegistry, StopwatchApp, WatchedChords};
use stopwatch::{Clock, CollectionManager, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "stopwatches")]
#[command(about = "Несколько секундомеров, управляемых глобальными горячими клавишами")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "stopwatches.toml")]
    config: String,

    /// Режим сухого запуска (без чтения клавиатуры)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(Config::load(&args.config)?);

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск Stopwatches v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - клавиатура не читается, используйте команду press");
    } else {
        utils::permissions::check_permissions()?;
    }

    // Хук и слушатель делят одну таблицу отслеживаемых комбинаций
    let watched = WatchedChords::default();
    let input_hook = create_input_hook(watched.clone(), args.dry_run);
    let registry = Arc::new(HotkeyRegistry::new(input_hook));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let manager = CollectionManager::with_stopwatches(
        registry,
        clock,
        config.hotkeys.clone(),
        config.initial_stopwatches(),
    )?;

    let (hotkey_tx, hotkey_rx) = mpsc::unbounded_channel();
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    let keyboard_listener = create_keyboard_listener(config.clone(), watched, hotkey_tx, args.dry_run)?;
    let keyboard_handle = tokio::spawn(async move {
        if let Err(e) = keyboard_listener.run().await {
            error!("Ошибка в KeyboardListener: {}", e);
        }
    });

    // Поток stdin не присоединяем: он завершится вместе с процессом
    let _stdin_reader = spawn_stdin_reader(line_tx);

    info!("Все компоненты инициализированы");

    let mut app = StopwatchApp::new(manager, TerminalSurface::stdout(), config.tick_interval());
    app.run(hotkey_rx, line_rx, async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    })
    .await?;

    info!("Завершение работы...");

    keyboard_handle.abort();
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    if tokio::time::timeout(shutdown_timeout, keyboard_handle).await.is_err() {
        warn!("Таймаут при завершении KeyboardListener");
    }

    info!("Stopwatches завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят таблицей секундомеров, логи идут в stderr
    let registry = tracing_subscriber::registry().with(filter);
    if format == "pretty" {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
