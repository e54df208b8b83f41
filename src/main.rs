use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::error::Error;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use pokedex_tui::cli::{Cli, Config};
use pokedex_tui::logging;
use pokedex_tui::state::PipelineToken;
use pokedex_tui::ui::{draw_ui, App, ChannelView, Command, View, ViewUpdate};
use pokedex_tui::{Controller, Outcome, PokeApi, RecentsStore};

type Updates = (PipelineToken, ViewUpdate);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Cli::parse().into_config();
    if let Err(e) = logging::init(&config.log_path, config.log_level) {
        eprintln!("logging disabled: {}", e);
    }

    let recents = RecentsStore::new(&config.recents_path);
    if config.clear_recents {
        recents.clear()?;
        eprintln!("Cleared {}", recents.path().display());
        return Ok(());
    }

    let controller = Arc::new(
        Controller::new(PokeApi::new(&config.api_base), recents).with_fade(config.fade),
    );

    if config.print {
        return print_once(&controller, &config).await;
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, controller, &config);

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    result.map_err(Into::into)
}

/// Headless mode: one lookup, printed as text.
async fn print_once(
    controller: &Controller<PokeApi>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let initial_list = controller.initial_list();
    let Some(identifier) = config
        .initial
        .clone()
        .or_else(|| initial_list.first().cloned())
    else {
        return Ok(());
    };

    let mut app = App::new();
    app.render_recents(&initial_list);
    let outcome = controller.lookup(&identifier, &mut app).await;
    println!("{}", app.summary());
    match outcome {
        Outcome::Failed { message } => Err(message.into()),
        _ => Ok(()),
    }
}

fn spawn_lookup(
    controller: &Arc<Controller<PokeApi>>,
    tx: &UnboundedSender<Updates>,
    identifier: String,
) {
    let token = controller.start();
    let controller = controller.clone();
    let mut view = ChannelView::new(token, tx.clone());
    tokio::spawn(async move {
        controller.run(token, &identifier, &mut view).await;
    });
}

fn drain_updates(
    app: &mut App,
    rx: &mut UnboundedReceiver<Updates>,
    controller: &Controller<PokeApi>,
) {
    while let Ok((token, update)) = rx.try_recv() {
        app.apply(token, update, controller.generation());
    }
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    controller: Arc<Controller<PokeApi>>,
    config: &Config,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Updates>();

    let initial_list = controller.initial_list();
    let mut app = App::new();
    app.render_recents(&initial_list);
    if let Some(first) = config
        .initial
        .clone()
        .or_else(|| initial_list.first().cloned())
    {
        spawn_lookup(&controller, &tx, first);
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        drain_updates(&mut app, &mut rx, &controller);
        draw_ui(terminal, &app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key.code) {
                    Some(Command::Quit) => break,
                    Some(Command::Lookup(name)) => spawn_lookup(&controller, &tx, name),
                    Some(Command::ClearRecents) => {
                        if let Err(e) = controller.recents().clear() {
                            log::error!("could not clear recents: {}", e);
                        }
                        app.render_recents(&controller.initial_list());
                    }
                    None => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}
