mod clipboard;
mod config;
mod format;
mod models;
mod normalizer;
mod session;
mod transport;
mod ui;
mod worker;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::transport::{TransportError, ValidationClient};
use crate::ui::{Action, App, Effect, handle_key_event, render};
use crate::worker::RequestWorker;

/// 事件轮询间隔，同时也是检查后台结果的频率
const TICK: Duration = Duration::from_millis(100);

/// 获取数据目录路径 (~/.local/share/newscheck/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "cannot determine user data directory"))?
        .join("newscheck");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// 日志写到文件，避免破坏 TUI；打不开文件就不记录
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("NEWSCHECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = get_data_dir().and_then(|dir| {
        let path = dir.join("newscheck.log");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok((path, file))
    });

    match log_file {
        Ok((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
        }
        Err(_) => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = Config::load().context("failed to load configuration")?;
    tracing::info!(
        endpoint = %config.endpoint,
        timeout_secs = config.timeout.as_secs(),
        truthy = ?config.verdicts.iter().collect::<Vec<_>>(),
        "configuration loaded"
    );

    // 请求在 tokio 运行时中执行，UI 循环保持同步
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let client = ValidationClient::new(&config).context("failed to build HTTP client")?;
    let mut worker = RequestWorker::new(runtime.handle().clone(), client, config.verdicts.clone());

    let mut app = App::new(Box::new(SystemClipboard::default()));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    // 支持的终端才能区分 Ctrl+Enter 与 Enter
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app, &mut worker);

    // 恢复终端
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut RequestWorker,
) -> Result<()> {
    loop {
        while let Some(completion) = worker.try_recv() {
            app.apply_completion(completion);
        }

        terminal.draw(|f| render(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let effect = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
            Event::Paste(text) => app.dispatch(Action::PasteText(text)),
            _ => Effect::None,
        };

        match effect {
            Effect::None => {}
            Effect::Quit => break,
            Effect::Send(submission) => {
                let ticket = submission.ticket;
                if let Err(err) = worker.submit(submission) {
                    app.session
                        .complete(ticket, Err(TransportError::Client(err.to_string())));
                }
            }
            Effect::Cancel(ticket) => worker.cancel(ticket),
        }
    }
    Ok(())
}
