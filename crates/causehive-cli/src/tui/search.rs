//! TUI search view.
//!
//! A search box with a suggestion dropdown above the cause list. Typing
//! feeds [`SearchBox`]; `tick()` turns settled input into fetch requests for
//! the suggestion worker, and submitted searches filter the list below.

use causehive_core::config::ClientConfig;
use causehive_core::store::KvStore;
use causehive_core::{Cause, FilterInput, SortKey, filter_causes, filters_summary, sort_causes};
use causehive_search::search_box::{Dropdown, FetchRequest, SearchAction, SearchBox, SearchKey};
use causehive_search::suggest::SuggestionKind;
use causehive_search::{SearchHistory, SessionAnalytics, SuggestError, Suggestion};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::time::Instant;

const DROPDOWN_MAX_ROWS: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Quit,
}

pub struct SearchView<S: KvStore> {
    search: SearchBox<S, SessionAnalytics>,
    causes: Vec<Cause>,
    visible: Vec<Cause>,
    sort: SortKey,
    applied: FilterInput,
    dropdown_state: ListState,
    box_area: Rect,
}

impl<S: KvStore> SearchView<S> {
    pub fn new(config: &ClientConfig, store: S, causes: Vec<Cause>) -> Self {
        let history = SearchHistory::new(store, config.user_id.as_deref());
        let search = SearchBox::new(&config.search, history, SessionAnalytics::new());
        let mut view = Self {
            search,
            causes,
            visible: Vec::new(),
            sort: SortKey::default(),
            applied: FilterInput::default(),
            dropdown_state: ListState::default(),
            box_area: Rect::default(),
        };
        view.refresh();
        view
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<ViewAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(ViewAction::Quit),
            KeyCode::Char('u') if ctrl => {
                self.search.clear();
                None
            }
            KeyCode::Char('k') if ctrl => {
                self.search.clear_history();
                None
            }
            KeyCode::Char(c) => {
                self.search.push_char(c, now);
                None
            }
            KeyCode::Backspace => {
                self.search.backspace(now);
                None
            }
            KeyCode::Tab => {
                self.sort = self.sort.next();
                self.refresh();
                None
            }
            KeyCode::Esc if !self.search.is_open() => Some(ViewAction::Quit),
            KeyCode::Esc => self.send(SearchKey::Escape),
            KeyCode::Down => {
                if !self.search.is_open() {
                    self.search.focus();
                }
                self.send(SearchKey::Down)
            }
            KeyCode::Up => self.send(SearchKey::Up),
            KeyCode::Enter => self.send(SearchKey::Enter),
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let inside = self.box_area.contains(Position::new(mouse.column, mouse.row));
            self.search.pointer_down(inside);
            if inside {
                self.search.focus();
            }
        }
    }

    /// Fetch to run, if the input has settled.
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        self.search.poll(now)
    }

    pub fn on_suggestions(
        &mut self,
        generation: u64,
        result: Result<Vec<Suggestion>, SuggestError>,
    ) {
        self.search.resolve(generation, result);
    }

    #[must_use]
    pub fn visible(&self) -> &[Cause] {
        &self.visible
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    #[must_use]
    pub const fn search_box(&self) -> &SearchBox<S, SessionAnalytics> {
        &self.search
    }

    fn send(&mut self, key: SearchKey) -> Option<ViewAction> {
        if let Some(SearchAction::Search { query, selected }) = self.search.handle_key(key) {
            if let Some(selected) = selected {
                tracing::debug!(kind = selected.kind.as_str(), id = ?selected.id, "suggestion chosen");
            }
            self.applied.search = query;
            self.refresh();
        }
        None
    }

    fn refresh(&mut self) {
        let filter = self.applied.to_filter();
        self.visible = sort_causes(&filter_causes(&self.causes, &filter), self.sort);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dropdown = self.search.display();
        let dropdown_rows = match dropdown {
            Dropdown::Closed => 0,
            Dropdown::Loading | Dropdown::NoResults => 3,
            Dropdown::Suggestions | Dropdown::History => {
                let rows = u16::try_from(self.search.entries().len()).unwrap_or(u16::MAX);
                rows.min(DROPDOWN_MAX_ROWS) + 2
            }
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(dropdown_rows),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        self.box_area = chunks[0].union(chunks[1]);

        let input_style = if self.search.is_focused() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = Paragraph::new(self.search.query())
            .block(Block::default().borders(Borders::ALL).title(" Search causes "))
            .style(input_style);
        frame.render_widget(input, chunks[0]);

        match dropdown {
            Dropdown::Closed => {}
            Dropdown::Loading => render_notice(frame, chunks[1], "Searching..."),
            Dropdown::NoResults => render_notice(frame, chunks[1], "No suggestions found"),
            Dropdown::Suggestions | Dropdown::History => self.render_dropdown(frame, chunks[1]),
        }

        self.render_causes(frame, chunks[2]);

        let status = Line::from(vec![
            Span::styled(
                format!(" {} ", self.sort.label()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(
                " {}/{} causes  Tab sort  ^U clear  ^K forget history  Esc quit",
                self.visible.len(),
                self.causes.len()
            )),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[3]);
    }

    fn render_dropdown(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.search.suggestions().is_empty() {
            " Recent searches "
        } else {
            " Suggestions "
        };
        let items: Vec<ListItem> = self
            .search
            .entries()
            .iter()
            .map(|entry| {
                let marker = match entry.kind {
                    SuggestionKind::History => "↺ ",
                    SuggestionKind::Cause | SuggestionKind::Category => "» ",
                };
                let mut spans = vec![Span::raw(marker), Span::raw(entry.query_text().to_string())];
                if !entry.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", entry.description),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::White)
                    .bg(Color::DarkGray),
            );
        self.dropdown_state.select(self.search.highlighted());
        frame.render_stateful_widget(list, area, &mut self.dropdown_state);
    }

    fn render_causes(&self, frame: &mut Frame, area: Rect) {
        let chips = filters_summary(&self.applied.to_filter());
        let title = if chips.is_empty() {
            " Causes ".to_string()
        } else {
            format!(" Causes · {} ", chips.join(" · "))
        };
        let items: Vec<ListItem> = self
            .visible
            .iter()
            .map(|cause| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>5.1}% ", cause.progress()),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(cause.title.clone()),
                    Span::styled(
                        format!("  {}", cause.category),
                        Style::default().fg(Color::Cyan),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, area);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, text: &str) {
    let notice = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(notice, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use causehive_core::parse_causes;
    use causehive_core::store::MemoryStore;
    use causehive_search::suggest::fallback_suggestions;
    use crossterm::event::KeyEventState;
    use std::time::Duration;

    const CAUSES: &str = r#"[
        {"id": 1, "title": "Clean Water for Tamale", "category": "Water Sanitation",
         "target_amount": 1000, "current_amount": 900, "created_at": "2025-03-01"},
        {"id": 2, "title": "School Roofing", "category": "Education",
         "target_amount": 500, "current_amount": 100, "created_at": "2025-04-01"},
        {"id": 3, "title": "Water Tanks for Clinics", "category": "Healthcare",
         "target_amount": 800, "current_amount": 200, "created_at": "2025-02-01"}
    ]"#;

    fn view() -> SearchView<MemoryStore> {
        let causes = parse_causes(CAUSES).expect("valid");
        SearchView::new(&ClientConfig::default(), MemoryStore::new(), causes)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_text(view: &mut SearchView<MemoryStore>, text: &str, now: Instant) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)), now);
        }
    }

    fn titles(view: &SearchView<MemoryStore>) -> Vec<&str> {
        view.visible().iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn starts_with_every_cause_newest_first() {
        let view = view();
        assert_eq!(
            titles(&view),
            ["School Roofing", "Clean Water for Tamale", "Water Tanks for Clinics"]
        );
    }

    #[test]
    fn typing_then_enter_filters_the_list() {
        let mut view = view();
        let t0 = Instant::now();
        type_text(&mut view, "water", t0);
        assert_eq!(view.search_box().query(), "water");

        let request = view.tick(t0 + Duration::from_millis(300)).expect("fetch");
        assert_eq!(request.query, "water");
        view.on_suggestions(request.generation, Ok(fallback_suggestions(&request.query)));

        view.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(titles(&view), ["Clean Water for Tamale", "Water Tanks for Clinics"]);
        assert_eq!(view.search_box().history(), ["water"]);
    }

    #[test]
    fn choosing_a_suggestion_searches_for_its_title() {
        let mut view = view();
        let t0 = Instant::now();
        type_text(&mut view, "roof", t0);
        let request = view.tick(t0 + Duration::from_millis(300)).expect("fetch");
        let hit = Suggestion {
            kind: SuggestionKind::Cause,
            title: "School Roofing".to_string(),
            description: String::new(),
            id: Some("2".to_string()),
            url: Some("/causes/2".to_string()),
            text: None,
        };
        view.on_suggestions(request.generation, Ok(vec![hit]));

        view.handle_key(key(KeyCode::Down), t0);
        view.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(titles(&view), ["School Roofing"]);
        assert_eq!(view.search_box().analytics().total_clicks(), 1);
    }

    #[test]
    fn tab_cycles_sort() {
        let mut view = view();
        view.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(view.sort(), SortKey::Oldest);
        assert_eq!(titles(&view)[0], "Water Tanks for Clinics");
    }

    #[test]
    fn escape_closes_dropdown_before_quitting() {
        let mut view = view();
        type_text(&mut view, "ed", Instant::now());
        assert_eq!(view.handle_key(key(KeyCode::Esc), Instant::now()), None);
        assert!(!view.search_box().is_open());
        assert_eq!(
            view.handle_key(key(KeyCode::Esc), Instant::now()),
            Some(ViewAction::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let mut view = view();
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        assert_eq!(view.handle_key(ctrl_c, Instant::now()), Some(ViewAction::Quit));
    }

    #[test]
    fn click_outside_closes_dropdown() {
        let mut view = view();
        type_text(&mut view, "ed", Instant::now());
        view.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 20,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!view.search_box().is_open());
    }
}
