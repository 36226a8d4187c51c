//! Ratatui-based terminal UI.
//!
//! The TUI provides a filter panel covering every search-form field
//! (continent, country, city, partner, UCL entity, education field, mobility
//! and funding checkboxes), a paginated partner table, and a detail view
//! listing the partnerships of the selected partner. Each partnership opens
//! into its outgoing, incoming and staff mobility details.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};
use tracing::warn;

use crate::app::pipeline::{self, SearchOutput};
use crate::config::Settings;
use crate::data::ApiClient;
use crate::domain::{Partner, Partnership, ValueLabel};
use crate::error::AppError;
use crate::options::{CheckboxItem, MOBILITY_TYPES, SearchOptions, mobility_checkboxes};
use crate::query::{RawQuery, SearchForm, SearchModel};

const CONFIG_NEEDED: &str = "Filters need the configuration endpoint.";

/// Start the TUI with filters restored from `query`.
pub fn run(settings: &Settings, query: RawQuery) -> Result<(), AppError> {
    let client = ApiClient::from_settings(settings)?;
    let mut app = App::new(client, settings.page_size, &query);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::remote(format!("Failed to initialize terminal: {e}")))?;

    app.search();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::remote(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::remote(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Filters,
    Results,
}

/// Rows of the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Continent,
    Country,
    City,
    Partner,
    UclEntity,
    EducationField,
    Mobility(usize),
    Funding(usize),
}

impl Filter {
    fn is_checkbox(self) -> bool {
        matches!(self, Filter::Mobility(_) | Filter::Funding(_))
    }
}

struct Detail {
    partner: Partner,
    partnerships: SearchOutput<Partnership>,
    table: TableState,
    /// Show the selected partnership instead of the list.
    open: bool,
}

impl Detail {
    fn new(partner: Partner, partnerships: SearchOutput<Partnership>) -> Self {
        let table = TableState::default().with_selected((!partnerships.results.results.is_empty()).then_some(0));
        Self {
            partner,
            partnerships,
            table,
            open: false,
        }
    }

    fn selected(&self) -> Option<&Partnership> {
        self.partnerships.results.results.get(self.table.selected()?)
    }
}

struct App {
    client: ApiClient,
    page_size: u32,
    /// `None` when the configuration endpoint could not be read.
    form: Option<SearchForm>,
    /// Filters used when no configuration is available.
    fallback_model: SearchModel,
    focus: Focus,
    selected_filter: usize,
    page: u64,
    results: Option<SearchOutput<Partner>>,
    table: TableState,
    detail: Option<Detail>,
    status: String,
}

impl App {
    fn new(client: ApiClient, page_size: u32, query: &RawQuery) -> Self {
        let model = SearchModel::from_query(query);
        let page = start_page(&model, page_size);

        let (form, status) = match client.fetch_configuration() {
            Ok(config) => (
                Some(SearchForm::new(model.clone(), SearchOptions::from_config(&config))),
                "Configuration loaded.".to_string(),
            ),
            Err(err) => {
                warn!(%err, "configuration unavailable");
                (None, format!("Configuration unavailable: {err}"))
            }
        };

        Self {
            client,
            page_size,
            form,
            fallback_model: model,
            focus: Focus::Filters,
            selected_filter: 0,
            page,
            results: None,
            table: TableState::default(),
            detail: None,
            status,
        }
    }

    fn model(&self) -> &SearchModel {
        self.form.as_ref().map_or(&self.fallback_model, |f| &f.model)
    }

    /// Filter rows in display order. Funding rows come from the configuration.
    fn filters(&self) -> Vec<Filter> {
        let mut rows = vec![
            Filter::Continent,
            Filter::Country,
            Filter::City,
            Filter::Partner,
            Filter::UclEntity,
            Filter::EducationField,
        ];
        rows.extend((0..MOBILITY_TYPES.len()).map(Filter::Mobility));
        if let Some(form) = &self.form {
            rows.extend((0..form.options().fundings.len()).map(Filter::Funding));
        }
        rows
    }

    fn current_filter(&self) -> Filter {
        self.filters()
            .get(self.selected_filter)
            .copied()
            .unwrap_or(Filter::Continent)
    }

    /// Checkbox state behind a mobility or funding row.
    fn checkbox(&self, filter: Filter) -> Option<CheckboxItem> {
        let model = self.model();
        match filter {
            Filter::Mobility(i) => mobility_checkboxes(&model.mobility_type).into_iter().nth(i),
            Filter::Funding(i) => self
                .form
                .as_ref()?
                .options()
                .funding_checkboxes(&model.funding)
                .into_iter()
                .nth(i),
            _ => None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::remote(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::remote(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::remote(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(detail) = &mut self.detail {
            match code {
                KeyCode::Char('q') => return true,
                KeyCode::Esc | KeyCode::Backspace => {
                    if detail.open {
                        detail.open = false;
                    } else {
                        self.detail = None;
                    }
                }
                KeyCode::Enter => detail.open = detail.selected().is_some(),
                KeyCode::Up if !detail.open => {
                    let current = detail.table.selected().unwrap_or(0);
                    detail.table.select(Some(current.saturating_sub(1)));
                }
                KeyCode::Down if !detail.open => {
                    let len = detail.partnerships.results.results.len();
                    if len > 0 {
                        let current = detail.table.selected().unwrap_or(0);
                        detail.table.select(Some((current + 1).min(len - 1)));
                    }
                }
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Filters => Focus::Results,
                    Focus::Results => Focus::Filters,
                };
            }
            KeyCode::Char('n') => self.change_page(1),
            KeyCode::Char('p') => self.change_page(-1),
            KeyCode::Char('x') => {
                if let Some(form) = &mut self.form {
                    form.reset();
                }
                self.fallback_model.reset();
                self.page = 1;
                self.search();
            }
            _ => match self.focus {
                Focus::Filters => self.handle_filter_key(code),
                Focus::Results => self.handle_results_key(code),
            },
        }
        false
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_filter = self.selected_filter.saturating_sub(1),
            KeyCode::Down => {
                self.selected_filter = (self.selected_filter + 1).min(self.filters().len().saturating_sub(1));
            }
            KeyCode::Left => self.adjust_filter(-1),
            KeyCode::Right => self.adjust_filter(1),
            KeyCode::Char(' ') => {
                let filter = self.current_filter();
                if filter.is_checkbox() {
                    self.toggle(filter);
                }
            }
            KeyCode::Enter => {
                self.page = 1;
                self.search();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        let len = self.results.as_ref().map_or(0, |r| r.results.results.len());
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        match code {
            KeyCode::Up => self.table.select(Some(current.saturating_sub(1))),
            KeyCode::Down => self.table.select(Some((current + 1).min(len - 1))),
            KeyCode::Enter => self.open_detail(current),
            _ => {}
        }
    }

    fn toggle(&mut self, filter: Filter) {
        let Some(item) = self.checkbox(filter) else {
            return;
        };
        let Some(form) = &mut self.form else {
            self.status = CONFIG_NEEDED.to_string();
            return;
        };
        match filter {
            Filter::Mobility(_) => form.toggle_mobility_type(&item.value),
            Filter::Funding(_) => form.toggle_funding(&item.value),
            _ => {}
        }
    }

    fn adjust_filter(&mut self, delta: i32) {
        let filter = self.current_filter();
        if filter.is_checkbox() {
            self.toggle(filter);
            return;
        }
        let Some(form) = &mut self.form else {
            self.status = CONFIG_NEEDED.to_string();
            return;
        };
        match filter {
            Filter::Continent => {
                let next = cycle(&form.options().continents, &form.model.continent, delta);
                form.select_continent(next.as_ref());
            }
            Filter::Country => {
                let next = cycle(&form.countries, &form.model.country, delta);
                form.select_country(next.as_ref());
            }
            Filter::City => {
                let cities: Vec<ValueLabel> = form.cities.iter().map(|c| ValueLabel::new(c.clone(), c.clone())).collect();
                let next = cycle(&cities, &form.model.city, delta);
                form.select_city(next.as_ref().map(|c| c.id.as_str()));
            }
            Filter::Partner => {
                let next = cycle(&form.options().partners, &form.model.partner, delta);
                form.select_partner(next.as_ref());
            }
            Filter::UclEntity => {
                let next = cycle(&form.options().ucl_entities, &form.model.ucl_entity, delta);
                form.select_ucl_entity(next.as_ref());
            }
            Filter::EducationField => {
                let next = cycle(&form.options().education_fields, &form.model.education_field, delta);
                form.select_education_field(next.as_ref());
            }
            Filter::Mobility(_) | Filter::Funding(_) => {}
        }
    }

    fn change_page(&mut self, delta: i64) {
        let Some(results) = &self.results else {
            return;
        };
        let info = results.page;
        let can_move = if delta > 0 { info.has_next() } else { info.has_previous() };
        if !can_move {
            return;
        }
        self.page = self.page.saturating_add_signed(delta).max(1);
        self.search();
    }

    fn search(&mut self) {
        let query = pipeline::partners_page(self.model().to_query(), self.page, self.page_size);
        match pipeline::search_partners(&self.client, &query, self.page_size) {
            Ok(out) => {
                self.status = crate::report::format_page_info(&out.page).trim_end().to_string();
                self.table.select((!out.results.results.is_empty()).then_some(0));
                self.results = Some(out);
            }
            Err(err) => {
                self.status = format!("Search failed: {err}");
            }
        }
    }

    fn open_detail(&mut self, index: usize) {
        let Some(partner) = self
            .results
            .as_ref()
            .and_then(|r| r.results.results.get(index))
            .cloned()
        else {
            return;
        };

        let mut query = self.model().to_query();
        query.insert("partner", partner.uuid.as_str());
        let query = pipeline::partnerships_page(query, 1, self.page_size);
        match pipeline::search_partnerships(&self.client, &query, self.page_size) {
            Ok(partnerships) => self.detail = Some(Detail::new(partner, partnerships)),
            Err(err) => self.status = format!("Partnership search failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_filters(frame, body[0]);
        if let Some(detail) = self.detail.as_mut() {
            draw_detail(frame, body[1], detail);
        } else {
            self.draw_results(frame, body[1]);
        }

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("partners", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(self.client.base_url(), Style::default().fg(Color::Gray)),
            Span::raw(" | ?"),
            Span::raw(self.model().to_query().to_query_string()),
        ]);
        frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
    }

    fn filter_text(&self, filter: Filter) -> String {
        let model = self.model();
        let fields = self.form.as_ref().map(|f| &f.fields);
        let label = |shown: Option<&String>, raw: &String| -> String {
            or_any(shown.filter(|s| !s.is_empty()).unwrap_or(raw)).to_string()
        };
        match filter {
            Filter::Continent => format!("Continent: {}", or_any(&model.continent)),
            Filter::Country => format!("Country: {}", label(fields.map(|f| &f.country), &model.country)),
            Filter::City => format!("City: {}", or_any(&model.city)),
            Filter::Partner => format!("Partner: {}", label(fields.map(|f| &f.partner), &model.partner)),
            Filter::UclEntity => format!("UCL entity: {}", label(fields.map(|f| &f.ucl_entity), &model.ucl_entity)),
            Filter::EducationField => format!(
                "Field: {}",
                label(fields.map(|f| &f.education_field), &model.education_field)
            ),
            Filter::Mobility(_) | Filter::Funding(_) => match self.checkbox(filter) {
                Some(item) => format!("[{}] {}", if item.checked { "x" } else { " " }, item.label),
                None => String::new(),
            },
        }
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .filters()
            .into_iter()
            .map(|filter| ListItem::new(self.filter_text(filter)))
            .collect();

        let border = focus_style(self.focus == Focus::Filters);
        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL).border_style(border))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_filter));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let border = focus_style(self.focus == Focus::Results);
        let block = Block::default().title("Partners").borders(Borders::ALL).border_style(border);

        let Some(results) = &self.results else {
            let msg = Paragraph::new("No results yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let rows: Vec<Row> = results
            .results
            .results
            .iter()
            .map(|p| {
                Row::new(vec![
                    p.name.clone(),
                    p.city.clone().unwrap_or_default(),
                    p.country.clone().unwrap_or_default(),
                    p.partner_type.clone().unwrap_or_default(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(25),
                Constraint::Length(6),
                Constraint::Min(10),
            ],
        )
        .header(
            Row::new(vec!["Partner", "City", "Ctry", "Type"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");

        frame.render_stateful_widget(table, area, &mut self.table);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match &self.detail {
            Some(detail) if detail.open => "Esc back  q quit",
            Some(_) => "↑/↓ select  Enter open  Esc back  q quit",
            None => "Tab focus  ↑/↓ select  ←/→ change  Space toggle  Enter search/open  n/p page  x reset  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
    }
}

fn draw_detail(frame: &mut ratatui::Frame<'_>, area: Rect, detail: &mut Detail) {
    if detail.open
        && let Some(partnership) = detail.selected()
    {
        let text = lines(&crate::report::format_partnership_detail(partnership));
        frame.render_widget(
            Paragraph::new(text).block(Block::default().title("Partnership").borders(Borders::ALL)),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(lines(&crate::report::format_partner_detail(&detail.partner)))
            .block(Block::default().title("Partner").borders(Borders::ALL)),
        chunks[0],
    );

    let rows: Vec<Row> = detail
        .partnerships
        .results
        .results
        .iter()
        .map(|p| {
            Row::new(vec![
                p.ucl_university.clone().unwrap_or_default(),
                p.education_field.clone().unwrap_or_default(),
                p.mobility_type(),
            ])
        })
        .collect();
    let title = format!(
        "Partnerships ({})",
        crate::report::format_page_info(&detail.partnerships.page).trim_end()
    );
    let table = Table::new(
        rows,
        [Constraint::Percentage(35), Constraint::Percentage(30), Constraint::Min(20)],
    )
    .header(Row::new(vec!["UCL entity", "Education field", "Mobility"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White))
    .highlight_symbol("» ");
    frame.render_stateful_widget(table, chunks[1], &mut detail.table);
}

fn lines(text: &str) -> Text<'static> {
    Text::from(text.lines().map(|l| Line::from(l.to_string())).collect::<Vec<_>>())
}

/// Page to open first when the URL carries an offset.
fn start_page(model: &SearchModel, size: u32) -> u64 {
    if size == 0 {
        return 1;
    }
    u64::from(model.offset / size) + 1
}

/// Step through `items` from the one whose id is `current`, with a leading
/// "any" position (`None`).
fn cycle(items: &[ValueLabel], current: &str, delta: i32) -> Option<ValueLabel> {
    let positions = items.len() as i64 + 1;
    let at = items
        .iter()
        .position(|item| item.id == current)
        .map_or(0, |i| i as i64 + 1);
    let next = (at + i64::from(delta)).rem_euclid(positions);
    if next == 0 {
        None
    } else {
        items.get((next - 1) as usize).cloned()
    }
}

fn or_any(value: &str) -> &str {
    if value.is_empty() { "any" } else { value }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}
