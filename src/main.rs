mod cli;
mod config;
mod error;
mod logging;
mod models;
mod search;
mod storage;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;

use crate::cli::Cli;
use crate::config::Settings;
use crate::search::OmdbClient;
use crate::storage::FileStore;
use crate::ui::{App, render};

/// 等待按键的间隔，期间检查后台搜索结果
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    logging::init(&settings.log_file)?;

    // 数据文件路径 (~/.local/share/shoppies/storage.json)
    let store = FileStore::new(&settings.data_file);
    let client = OmdbClient::new(&settings.endpoint, &settings.api_key);
    info!(data_file = %store.path().display(), endpoint = %settings.endpoint, "starting");

    // 创建应用状态
    let mut app = App::new(Arc::new(client), Box::new(store));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(count = app.nominations.len(), "exiting");
    println!(
        "{} nomination(s) saved to {}",
        app.nominations.len(),
        settings.data_file.display()
    );

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    // 只有状态变化或窗口尺寸变化时才重绘
    let mut dirty = true;
    loop {
        dirty |= app.poll_searches();
        if dirty {
            terminal.draw(|f| render(f, app))?;
            dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if ui::handle_key_event(app, key) {
                    break;
                }
                dirty = true;
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
    Ok(())
}
