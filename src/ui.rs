use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::{EvolutionStage, Pokemon, Species};
use crate::sprite::SpriteThumb;
use crate::state::{Generation, PipelineToken, ViewState};
use crate::utils::{format_dex_id, format_name, text_to_lines};

pub const NOT_FOUND_NAME: &str = "Não Encontrado";
pub const NOT_FOUND_ID: &str = "#???";
pub const EVOLUTION_UNAVAILABLE: &str = "Evolução indisponível";
pub const NO_EVOLUTIONS: &str = "Não possui evoluções";
pub const NO_DESCRIPTION: &str = "Descrição não disponível.";

/// The display surface the lookup pipeline paints on.
pub trait View {
    fn show_loading(&mut self, loading: bool);
    fn render_card(&mut self, pokemon: &Pokemon, image: Option<SpriteThumb>);
    /// Reset every field to its placeholder, including species and evolution.
    fn render_error(&mut self, message: &str);
    fn render_recents(&mut self, names: &[String]);
    fn render_evolution(&mut self, stages: &[EvolutionStage]);
    fn render_species(&mut self, species: Option<&Species>);
    /// Mark the recents entry called `name` active, or clear the mark.
    fn select_recent(&mut self, name: Option<&str>);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardPanel {
    pub name: String,
    pub id_label: String,
    pub type_label: String,
    pub types: Vec<String>,
    pub info: String,
    pub cry_url: Option<String>,
    pub image: Option<SpriteThumb>,
    pub is_error: bool,
}

/// Displayed stat values, in card order: HP, ATK, DEF, SPD.
#[derive(Debug, Clone, PartialEq)]
pub struct StatPanel {
    pub values: [(&'static str, String); 4],
}

impl StatPanel {
    const KEYS: [(&'static str, &'static str); 4] = [
        ("hp", "HP"),
        ("attack", "ATK"),
        ("defense", "DEF"),
        ("speed", "SPD"),
    ];

    fn placeholder(text: &str) -> Self {
        Self {
            values: Self::KEYS.map(|(_, label)| (label, text.to_string())),
        }
    }

    fn from_pokemon(p: &Pokemon) -> Self {
        Self {
            values: Self::KEYS.map(|(key, label)| (label, p.stat_display(key))),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl Default for StatPanel {
    fn default() -> Self {
        Self::placeholder("0")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionPanel {
    Unavailable,
    NoEvolutions,
    Stages(Vec<EvolutionStage>),
}

impl EvolutionPanel {
    fn from_stages(stages: &[EvolutionStage]) -> Self {
        match stages.len() {
            0 => EvolutionPanel::Unavailable,
            1 => EvolutionPanel::NoEvolutions,
            _ => EvolutionPanel::Stages(stages.to_vec()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            EvolutionPanel::Unavailable => vec![EVOLUTION_UNAVAILABLE.to_string()],
            EvolutionPanel::NoEvolutions => vec![NO_EVOLUTIONS.to_string()],
            EvolutionPanel::Stages(stages) => stages
                .iter()
                .map(|s| format!("{} {}", format_name(&s.name), format_dex_id(s.id)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPanel {
    pub region: String,
    pub status: String,
    pub description: String,
}

impl Default for SpeciesPanel {
    fn default() -> Self {
        Self {
            region: "N/A".to_string(),
            status: String::new(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Lookup(String),
    ClearRecents,
}

pub struct App {
    pub card: CardPanel,
    pub stats: StatPanel,
    pub abilities: [String; 2],
    pub evolution: EvolutionPanel,
    pub species: SpeciesPanel,
    pub recents: Vec<String>,
    /// Entry matching the card on display.
    pub active_recent: Option<usize>,
    /// Keyboard cursor in the recents list.
    pub cursor: usize,
    pub loading: bool,
    pub status: ViewState,
    pub search_mode: bool,
    pub search_query: String,
    pub show_help: bool,
    pub show_sprites: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            card: CardPanel::default(),
            stats: StatPanel::default(),
            abilities: ["---".to_string(), "---".to_string()],
            evolution: EvolutionPanel::Unavailable,
            species: SpeciesPanel::default(),
            recents: Vec::new(),
            active_recent: None,
            cursor: 0,
            loading: false,
            status: ViewState::Idle,
            search_mode: false,
            search_query: String::new(),
            show_help: false,
            show_sprites: true,
        }
    }

    pub fn next(&mut self) {
        if !self.recents.is_empty() {
            self.cursor = (self.cursor + 1) % self.recents.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.recents.is_empty() {
            if self.cursor == 0 {
                self.cursor = self.recents.len() - 1;
            } else {
                self.cursor -= 1;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<Command> {
        if self.search_mode {
            match key {
                KeyCode::Enter => {
                    self.search_mode = false;
                    let term = self.search_query.trim().to_lowercase();
                    self.search_query.clear();
                    if !term.is_empty() {
                        return Some(Command::Lookup(term));
                    }
                }
                KeyCode::Esc => {
                    self.search_mode = false;
                    self.search_query.clear();
                }
                KeyCode::Backspace => {
                    self.search_query.pop();
                }
                KeyCode::Char(c) => self.search_query.push(c),
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') => return Some(Command::Quit),
            KeyCode::F(1) | KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Char('/') => {
                self.search_mode = true;
                self.search_query.clear();
            }
            KeyCode::Char('s') => self.show_sprites = !self.show_sprites,
            KeyCode::Char('x') => return Some(Command::ClearRecents),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Enter => {
                if let Some(name) = self.recents.get(self.cursor) {
                    return Some(Command::Lookup(name.clone()));
                }
            }
            _ => {}
        }
        None
    }

    /// Apply an update sent by a pipeline, unless a newer pipeline has started.
    pub fn apply(&mut self, token: PipelineToken, update: ViewUpdate, generation: &Generation) {
        if !generation.is_current(token) {
            log::debug!("dropping update from stale pipeline {:?}", token);
            return;
        }
        match update {
            ViewUpdate::Loading(on) => self.show_loading(on),
            ViewUpdate::Card(p, image) => self.render_card(&p, image),
            ViewUpdate::Error(message) => self.render_error(&message),
            ViewUpdate::Recents(names) => self.render_recents(&names),
            ViewUpdate::Evolution(stages) => self.render_evolution(&stages),
            ViewUpdate::Species(species) => self.render_species(species.as_deref()),
            ViewUpdate::Select(name) => self.select_recent(name.as_deref()),
        }
    }

    /// Plain-text rendition of the panels.
    pub fn summary(&self) -> String {
        let mut s = format!("{} ({})\n", self.card.name, self.card.id_label);
        s.push_str(&format!("Tipo: {}\n", self.card.type_label));
        if !self.card.info.is_empty() {
            s.push_str(&format!("{}\n", self.card.info));
        }
        let stats: Vec<String> = self
            .stats
            .values
            .iter()
            .map(|(label, v)| format!("{} {}", label, v))
            .collect();
        s.push_str(&format!("Status: {}\n", stats.join("  ")));
        s.push_str(&format!("Habilidades: {}\n", self.abilities.join(", ")));
        s.push_str(&format!("Evoluções: {}\n", self.evolution.lines().join(" -> ")));
        s.push_str(&format!("Região: {}", self.species.region));
        if !self.species.status.is_empty() {
            s.push_str(&format!(" ({})", self.species.status));
        }
        s.push('\n');
        for line in text_to_lines(&self.species.description, 72) {
            s.push_str(&line);
            s.push('\n');
        }
        if let Some(url) = &self.card.cry_url {
            s.push_str(&format!("Cry: {}\n", url));
        }
        s.push_str(&format!("Recentes: {}", self.recents.join(", ")));
        s
    }
}

impl View for App {
    fn show_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.status = ViewState::Loading;
            // Cleared so the outgoing name does not flash during the fade.
            self.card.name.clear();
            self.card.id_label.clear();
        }
    }

    fn render_card(&mut self, p: &Pokemon, image: Option<SpriteThumb>) {
        self.card = CardPanel {
            name: p.name.clone(),
            id_label: format_dex_id(p.id),
            type_label: p.primary_type().unwrap_or_default().to_string(),
            types: p.types.clone(),
            info: format!(
                "Altura: {}  Peso: {}  Base EXP: {}",
                p.height, p.weight, p.base_experience
            ),
            cry_url: p.cry_url.clone(),
            image,
            is_error: false,
        };
        self.stats = StatPanel::from_pokemon(p);
        self.abilities = [p.ability_display(0), p.ability_display(1)];
        self.status = ViewState::Loaded {
            name: p.name.clone(),
            id: p.id,
        };
    }

    fn render_error(&mut self, message: &str) {
        self.card = CardPanel {
            name: NOT_FOUND_NAME.to_string(),
            id_label: NOT_FOUND_ID.to_string(),
            type_label: "error".to_string(),
            is_error: true,
            ..CardPanel::default()
        };
        self.stats = StatPanel::placeholder("-");
        self.abilities = ["---".to_string(), "---".to_string()];
        self.render_species(None);
        self.render_evolution(&[]);
        self.active_recent = None;
        self.status = ViewState::Error(message.to_string());
    }

    fn render_recents(&mut self, names: &[String]) {
        self.recents = names.to_vec();
        self.active_recent = None;
        if self.cursor >= self.recents.len() {
            self.cursor = 0;
        }
    }

    fn render_evolution(&mut self, stages: &[EvolutionStage]) {
        self.evolution = EvolutionPanel::from_stages(stages);
    }

    fn render_species(&mut self, species: Option<&Species>) {
        self.species = match species {
            None => SpeciesPanel::default(),
            Some(s) => SpeciesPanel {
                region: s.generation.region().to_string(),
                status: s.status_label().unwrap_or_default().to_string(),
                description: s
                    .description()
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            },
        };
    }

    fn select_recent(&mut self, name: Option<&str>) {
        self.active_recent = name.and_then(|n| self.recents.iter().position(|r| r == n));
        if let Some(i) = self.active_recent {
            self.cursor = i;
        }
    }
}

/// A pipeline-to-UI message.
#[derive(Debug, Clone)]
pub enum ViewUpdate {
    Loading(bool),
    Card(Box<Pokemon>, Option<SpriteThumb>),
    Error(String),
    Recents(Vec<String>),
    Evolution(Vec<EvolutionStage>),
    Species(Option<Box<Species>>),
    Select(Option<String>),
}

/// A [`View`] that forwards every call to the UI loop over a channel.
pub struct ChannelView {
    token: PipelineToken,
    tx: UnboundedSender<(PipelineToken, ViewUpdate)>,
}

impl ChannelView {
    pub fn new(token: PipelineToken, tx: UnboundedSender<(PipelineToken, ViewUpdate)>) -> Self {
        Self { token, tx }
    }

    fn send(&self, update: ViewUpdate) {
        if self.tx.send((self.token, update)).is_err() {
            log::debug!("ui loop gone; dropping update");
        }
    }
}

impl View for ChannelView {
    fn show_loading(&mut self, loading: bool) {
        self.send(ViewUpdate::Loading(loading));
    }

    fn render_card(&mut self, pokemon: &Pokemon, image: Option<SpriteThumb>) {
        self.send(ViewUpdate::Card(Box::new(pokemon.clone()), image));
    }

    fn render_error(&mut self, message: &str) {
        self.send(ViewUpdate::Error(message.to_string()));
    }

    fn render_recents(&mut self, names: &[String]) {
        self.send(ViewUpdate::Recents(names.to_vec()));
    }

    fn render_evolution(&mut self, stages: &[EvolutionStage]) {
        self.send(ViewUpdate::Evolution(stages.to_vec()));
    }

    fn render_species(&mut self, species: Option<&Species>) {
        self.send(ViewUpdate::Species(species.cloned().map(Box::new)));
    }

    fn select_recent(&mut self, name: Option<&str>) {
        self.send(ViewUpdate::Select(name.map(String::from)));
    }
}

fn type_color(t: &str) -> (u8, u8, u8) {
    match t.to_lowercase().as_str() {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

fn type_badge(t: &str) -> Span<'static> {
    let (r, g, b) = type_color(t);
    // pick a readable foreground for the badge colour
    let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
    let fg = if lum > 160.0 { Color::Black } else { Color::White };
    Span::styled(
        format!(" {} ", format_name(t)),
        Style::default().fg(fg).bg(Color::Rgb(r, g, b)),
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn card_style(app: &App) -> Style {
    if app.loading {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

fn draw_recents<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .recents
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if app.active_recent == Some(i) {
                ListItem::new(Spans::from(Span::styled(
                    format!("▶ {}", format_name(name)),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )))
            } else {
                ListItem::new(Spans::from(Span::raw(format!("  {}", format_name(name)))))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Recentes"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    if !app.recents.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_search<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let text = if app.search_mode {
        format!("/{}", app.search_query)
    } else {
        "Press '/' to search by name or number.".to_string()
    };
    let para = Paragraph::new(vec![Spans::from(Span::raw(text))])
        .block(Block::default().borders(Borders::ALL).title("Busca"));
    f.render_widget(para, area);
}

fn draw_sprite<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Imagem");
    let para = match (&app.card.image, app.show_sprites) {
        (_, false) => Paragraph::new("(sprites off)"),
        (None, true) => Paragraph::new(""),
        (Some(thumb), true) => {
            let w = area.width.saturating_sub(2).clamp(1, 64) as u32;
            let h = area.height.saturating_sub(2).clamp(1, 64) as u32;
            let lines: Vec<Spans> = thumb
                .rows(w, h)
                .into_iter()
                .map(|row| {
                    Spans::from(
                        row.into_iter()
                            .map(|(r, g, b)| {
                                Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b)))
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            Paragraph::new(lines)
        }
    };
    f.render_widget(para.block(block).style(card_style(app)), area);
}

fn draw_info<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let card = &app.card;
    let title = if app.loading { "Carregando..." } else { "Pokémon" };
    let mut lines: Vec<Spans> = Vec::new();
    let header_style = if card.is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    lines.push(Spans::from(Span::styled(
        format!("{} {}", format_name(&card.name), card.id_label),
        header_style,
    )));

    let mut type_spans = vec![Span::raw("Tipo: ")];
    if card.types.is_empty() {
        type_spans.push(Span::raw(card.type_label.clone()));
    }
    for (i, t) in card.types.iter().enumerate() {
        if i > 0 {
            type_spans.push(Span::raw(" "));
        }
        type_spans.push(type_badge(t));
    }
    lines.push(Spans::from(type_spans));
    if !card.info.is_empty() {
        lines.push(Spans::from(Span::raw(card.info.clone())));
    }
    lines.push(Spans::from(Span::raw(format!(
        "Habilidades: {} / {}",
        app.abilities[0], app.abilities[1]
    ))));
    if let Some(url) = &card.cry_url {
        lines.push(Spans::from(Span::styled(
            format!("♪ {}", url),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let ViewState::Error(message) = &app.status {
        lines.push(Spans::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(card_style(app))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_stats<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let inner_w = area.width.saturating_sub(2) as usize;
    let name_w = 4usize;
    let val_w = 4usize;
    let bar_max_w = inner_w.saturating_sub(name_w + val_w + 2);
    let scale_max = 255.0f32;

    let lines: Vec<Spans> = app
        .stats
        .values
        .iter()
        .map(|(label, value)| {
            let bar_len = value
                .parse::<u32>()
                .map(|v| (((v as f32) / scale_max).min(1.0) * bar_max_w as f32).round() as usize)
                .unwrap_or(0);
            Spans::from(Span::raw(format!(
                "{:<name_w$} {:>val_w$} {}",
                label,
                value,
                "█".repeat(bar_len),
                name_w = name_w,
                val_w = val_w
            )))
        })
        .collect();

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(card_style(app));
    f.render_widget(para, area);
}

fn draw_species<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let sp = &app.species;
    let mut lines = vec![Spans::from(vec![
        Span::styled("Região: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(sp.region.clone()),
    ])];
    if !sp.status.is_empty() {
        lines.push(Spans::from(Span::styled(
            sp.status.clone(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Spans::from(Span::raw("")));
    let width = area.width.saturating_sub(2).max(10) as usize;
    for line in text_to_lines(&sp.description, width) {
        lines.push(Spans::from(Span::raw(line)));
    }
    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Espécie"))
        .style(card_style(app))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_evolution<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let text = match &app.evolution {
        EvolutionPanel::Stages(_) => {
            Spans::from(Span::raw(app.evolution.lines().join("  →  ")))
        }
        _ => Spans::from(Span::styled(
            app.evolution.lines().join(""),
            Style::default().fg(Color::DarkGray),
        )),
    };
    let para = Paragraph::new(vec![text])
        .block(Block::default().borders(Borders::ALL).title("Evoluções"))
        .style(card_style(app))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_help<B: Backend>(f: &mut Frame<B>) {
    let popup = centered_rect(60, 50, f.size());
    let help_lines: Vec<Spans> = [
        "q        Quit",
        "/        Search by name or number",
        "Enter    Submit search / open highlighted recent",
        "Esc      Cancel search",
        "Up/Down  Move through recents",
        "x        Clear recents",
        "s        Toggle images",
        "h / F1   Toggle this help",
    ]
    .iter()
    .map(|l| Spans::from(Span::raw(*l)))
    .collect();
    let mut lines = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
    ];
    lines.extend(help_lines);
    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(para, popup);
}

pub fn draw_frame<B: Backend>(f: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(f.size());

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(chunks[0]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(detail[0]);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(detail[1]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(chunks[1]);

    draw_sprite(f, app, top[0]);
    draw_info(f, app, top[1]);
    draw_stats(f, app, middle[0]);
    draw_species(f, app, middle[1]);
    draw_evolution(f, app, detail[2]);
    draw_recents(f, app, side[0]);
    draw_search(f, app, side[1]);

    if app.show_help {
        draw_help(f);
    }
}

pub fn draw_ui<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> io::Result<()> {
    terminal.draw(|f| draw_frame(f, app)).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlavorText, Generation as Gen, Stat};
    use ratatui::backend::TestBackend;

    fn pikachu() -> Pokemon {
        Pokemon {
            name: "pikachu".to_string(),
            id: 25,
            types: vec!["electric".to_string()],
            abilities: vec!["static".to_string(), "lightning-rod".to_string()],
            stats: vec![
                Stat { name: "hp".to_string(), base: 35 },
                Stat { name: "attack".to_string(), base: 55 },
                Stat { name: "defense".to_string(), base: 40 },
                Stat { name: "speed".to_string(), base: 90 },
            ],
            ..Default::default()
        }
    }

    fn mewtwo_species() -> Species {
        Species {
            name: "mewtwo".to_string(),
            generation: Gen::I,
            is_legendary: true,
            is_mythical: false,
            flavor_texts: vec![FlavorText {
                text: "Criado por\nengenharia genética.".to_string(),
                language: "pt".to_string(),
            }],
            evolution_chain_url: None,
        }
    }

    fn stages(names: &[(&str, u32)]) -> Vec<EvolutionStage> {
        names
            .iter()
            .map(|(n, id)| EvolutionStage { name: n.to_string(), id: *id })
            .collect()
    }

    #[test]
    fn test_render_card_fills_fields() {
        let mut app = App::new();
        app.render_card(&pikachu(), None);
        assert_eq!(app.card.name, "pikachu");
        assert_eq!(app.card.id_label, "#025");
        assert_eq!(app.card.type_label, "electric");
        assert_eq!(app.stats.get("HP"), Some("35"));
        assert_eq!(app.stats.get("SPD"), Some("90"));
        assert_eq!(app.abilities, ["static", "lightning-rod"]);
        assert_eq!(
            app.status,
            ViewState::Loaded { name: "pikachu".to_string(), id: 25 }
        );
    }

    #[test]
    fn test_missing_stats_and_abilities_use_defaults() {
        let mut app = App::new();
        let mut p = pikachu();
        p.stats.clear();
        p.abilities.truncate(1);
        app.render_card(&p, None);
        assert_eq!(app.stats.get("ATK"), Some("0"));
        assert_eq!(app.abilities[1], "---");
    }

    #[test]
    fn test_render_error_leaves_no_stale_text() {
        let mut app = App::new();
        app.render_recents(&["pikachu".to_string()]);
        app.render_card(&pikachu(), None);
        app.render_species(Some(&mewtwo_species()));
        app.render_evolution(&stages(&[("pichu", 172), ("pikachu", 25), ("raichu", 26)]));
        app.select_recent(Some("pikachu"));

        app.render_error("Pokémon não encontrado");

        assert_eq!(app.card.name, NOT_FOUND_NAME);
        assert_eq!(app.card.id_label, NOT_FOUND_ID);
        assert!(app.card.image.is_none());
        assert!(app.stats.values.iter().all(|(_, v)| v == "-"));
        assert_eq!(app.abilities, ["---", "---"]);
        assert_eq!(app.species, SpeciesPanel::default());
        assert_eq!(app.evolution.lines(), vec![EVOLUTION_UNAVAILABLE]);
        assert_eq!(app.active_recent, None);
        assert_eq!(app.status, ViewState::Error("Pokémon não encontrado".to_string()));
    }

    #[test]
    fn test_evolution_panel_messages() {
        let mut app = App::new();
        app.render_evolution(&[]);
        assert_eq!(app.evolution.lines(), vec![EVOLUTION_UNAVAILABLE]);
        app.render_evolution(&stages(&[("tauros", 128)]));
        assert_eq!(app.evolution.lines(), vec![NO_EVOLUTIONS]);
        app.render_evolution(&stages(&[("bulbasaur", 1), ("ivysaur", 2)]));
        assert_eq!(app.evolution.lines(), vec!["Bulbasaur #001", "Ivysaur #002"]);
    }

    #[test]
    fn test_render_species_panel() {
        let mut app = App::new();
        app.render_species(Some(&mewtwo_species()));
        assert_eq!(app.species.region, "Kanto");
        assert_eq!(app.species.status, "Lendário");
        assert_eq!(app.species.description, "Criado por engenharia genética.");
        app.render_species(None);
        assert_eq!(app.species.region, "N/A");
        assert_eq!(app.species.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_select_recent_marks_or_clears() {
        let mut app = App::new();
        app.render_recents(&["pikachu".to_string(), "mew".to_string()]);
        app.select_recent(Some("mew"));
        assert_eq!(app.active_recent, Some(1));
        assert_eq!(app.cursor, 1);
        app.select_recent(Some("ditto"));
        assert_eq!(app.active_recent, None);
    }

    #[test]
    fn test_loading_clears_name() {
        let mut app = App::new();
        app.render_card(&pikachu(), None);
        app.show_loading(true);
        assert!(app.loading);
        assert!(app.card.name.is_empty());
        assert_eq!(app.status, ViewState::Loading);
        app.show_loading(false);
        assert!(!app.loading);
    }

    #[test]
    fn test_search_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(KeyCode::Char('/')), None);
        for c in " PikaChu ".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert_eq!(
            app.handle_key(KeyCode::Enter),
            Some(Command::Lookup("pikachu".to_string()))
        );
        assert!(!app.search_mode);
        assert!(app.search_query.is_empty());

        app.handle_key(KeyCode::Char('/'));
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.handle_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_recents_navigation_and_enter() {
        let mut app = App::new();
        app.render_recents(&["a".to_string(), "b".to_string(), "c".to_string()]);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.cursor, 2);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.cursor, 0);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.handle_key(KeyCode::Enter), Some(Command::Lookup("b".to_string())));
        assert_eq!(app.handle_key(KeyCode::Char('x')), Some(Command::ClearRecents));
        assert_eq!(app.handle_key(KeyCode::Char('q')), Some(Command::Quit));
    }

    #[test]
    fn test_apply_drops_stale_updates() {
        let generation = Generation::new();
        let old = generation.next();
        let new = generation.next();
        let mut app = App::new();
        app.apply(old, ViewUpdate::Error("late".to_string()), &generation);
        assert_eq!(app.status, ViewState::Idle);
        app.apply(new, ViewUpdate::Card(Box::new(pikachu()), None), &generation);
        assert_eq!(app.card.name, "pikachu");
    }

    #[test]
    fn test_channel_view_forwards_updates() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let token = PipelineToken(7);
        let mut view = ChannelView::new(token, tx);
        view.show_loading(true);
        view.select_recent(Some("mew"));
        let (t, first) = rx.try_recv().unwrap();
        assert_eq!(t, token);
        assert!(matches!(first, ViewUpdate::Loading(true)));
        let (_, second) = rx.try_recv().unwrap();
        assert!(matches!(second, ViewUpdate::Select(Some(ref n)) if n == "mew"));
    }

    #[test]
    fn test_draw_error_state() {
        let mut app = App::new();
        app.render_error("Pokémon não encontrado");
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        draw_ui(&mut terminal, &app).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol.as_str())
            .collect();
        assert!(screen.contains("#???"));
        assert!(screen.contains("N/A"));
    }
}
