use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::filter::{self, FilterCriteria};
use crate::models::JobPosting;
use crate::store::BookmarkSet;

struct AppState {
    jobs: Vec<JobPosting>,
    selected: usize,
    scroll_offset: u16,
}

impl AppState {
    fn new(jobs: Vec<JobPosting>) -> Self {
        Self {
            jobs,
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn current_job(&self) -> Option<&JobPosting> {
        self.jobs.get(self.selected)
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

pub fn run_browse(
    jobs: &[JobPosting],
    criteria: &FilterCriteria,
    bookmarks: &mut BookmarkSet,
) -> Result<()> {
    let filtered = filter::apply(jobs, criteria);
    if filtered.is_empty() {
        println!("No jobs match your filters.");
        return Ok(());
    }

    let mut state = AppState::new(filtered);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, bookmarks);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    bookmarks: &mut BookmarkSet,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, bookmarks, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('b') => {
                    if let Some(job) = state.current_job() {
                        bookmarks.toggle(&job.id);
                    }
                }
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, bookmarks: &BookmarkSet, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(frame.area());

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|job| {
            let marker = if bookmarks.contains(&job.id) { "*" } else { " " };
            let title = if job.title.len() > 32 {
                format!("{}...", &job.title[..29])
            } else {
                job.title.clone()
            };
            ListItem::new(format!(
                "{} {:>3}% {} | {}",
                marker, job.match_percentage, title, job.company
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Jobs ({}) ", state.jobs.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = build_detail(state, bookmarks);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let help = Paragraph::new(" j/k:navigate  J/K:scroll  b:bookmark  q:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area[1]);
}

fn build_detail<'a>(state: &'a AppState, bookmarks: &BookmarkSet) -> Text<'a> {
    let Some(job) = state.current_job() else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("{}, {}", job.company, job.location)));

    let match_style = if job.match_percentage >= 85 {
        Style::default().fg(Color::Green)
    } else if job.match_percentage >= 70 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(Line::from(Span::styled(
        format!("Match: {}%", job.match_percentage),
        match_style,
    )));

    lines.push(Line::from(format!(
        "{} | {} | {}",
        job.job_type, job.work_mode, job.seniority
    )));

    if let Some(salary) = &job.salary {
        lines.push(Line::from(format!("Salary: {}", salary)));
    }
    lines.push(Line::from(format!("Posted: {}", job.posted_ago)));

    if bookmarks.contains(&job.id) {
        lines.push(Line::from(Span::styled(
            "Bookmarked",
            Style::default().fg(Color::Cyan),
        )));
    }

    lines.push(Line::from(""));

    if !job.matched_skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "Matched Skills",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", job.matched_skills.join(", "))));
        lines.push(Line::from(""));
    }

    if !job.gap_skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "Skill Gaps",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", job.gap_skills.join(", "))));
        lines.push(Line::from(""));
    }

    if !job.requirements.is_empty() {
        lines.push(Line::from(Span::styled(
            "Requirements",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for req in &job.requirements {
            lines.push(Line::from(format!("  - {}", req)));
        }
        lines.push(Line::from(""));
    }

    if job.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "(No description)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&job.description, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}
