//! CLI output formatting

use crate::board::{view::EMPTY_COLUMN_PLACEHOLDER, BoardEvent, BoardView, DetailPanel, TransitionSource};
use crate::calendar::{CalendarEvent, EventCategory, MonthGrid};
use crate::chat::{ChatMessage, Role};
use crate::core::{ColorToken, ItemFields, PipelineItem, Stage};
use chrono::Datelike;
use console::{Color, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ARROW: Emoji<'_, '_> = Emoji("➡️  ", "> ");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "- ");

const DEFAULT_WIDTH: usize = 80;

/// Terminal color for a stage accent
pub fn color_for(token: ColorToken) -> Color {
    match token {
        ColorToken::Brand => Color::Color256(168),
        ColorToken::Violet => Color::Color256(135),
        ColorToken::Sky => Color::Color256(39),
        ColorToken::Amber => Color::Color256(214),
        ColorToken::Emerald => Color::Color256(42),
        ColorToken::Rose => Color::Color256(204),
        ColorToken::Slate => Color::Color256(103),
    }
}

/// Terminal width, falling back to 80 columns when not a tty
pub fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(DEFAULT_WIDTH)
}

/// Create a spinner shown while waiting on the network
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Colored stage label
pub fn format_stage(stage: &Stage) -> String {
    style(&stage.label).fg(color_for(stage.color)).bold().to_string()
}

/// One card line: short id and title
pub fn format_card<F: ItemFields>(item: &PipelineItem<F>, width: usize) -> String {
    format!(
        "{} {}",
        style(item.id.short()).dim(),
        truncate(item.fields.title(), width.saturating_sub(12))
    )
}

/// Render a board view as stacked columns
pub fn format_board<F: ItemFields>(name: &str, view: &BoardView<'_, F>, width: usize) -> String {
    let mut out = format!("{} {} ({} items)\n", INFO, style(name).bold(), view.total());

    for column in &view.columns {
        out.push_str(&format!(
            "\n{} {}\n",
            format_stage(column.stage),
            style(format!("({})", column.len())).dim()
        ));

        if column.is_empty() {
            out.push_str(&format!("  {}\n", style(EMPTY_COLUMN_PLACEHOLDER).dim().italic()));
            continue;
        }

        for item in &column.items {
            out.push_str(&format!("  {}\n", format_card(*item, width)));
        }
    }

    out
}

/// Render the detail panel
pub fn format_detail<F: ItemFields>(panel: &DetailPanel<'_, F>) -> String {
    let Some(item) = panel.item() else {
        return format!("{} Nothing selected", INFO);
    };

    let mut out = format!("{} {}\n", INFO, style(item.fields.title()).bold());
    out.push_str(&format!("  {:<10} {}\n", "Id", style(item.id).dim()));
    if let Some(stage) = panel.current_stage() {
        out.push_str(&format!("  {:<10} {}\n", "Stage", format_stage(stage)));
    }
    for (label, value) in panel.rows() {
        out.push_str(&format!("  {:<10} {}\n", label, value));
    }
    out.push_str(&format!(
        "  {:<10} {}\n",
        "Created",
        style(item.created_at.format("%d.%m.%Y %H:%M")).dim()
    ));

    let targets: Vec<String> = panel
        .move_targets()
        .iter()
        .map(|target| format!("{} ({})", format_stage(target.stage), style(&target.stage.key).dim()))
        .collect();
    if !targets.is_empty() {
        out.push_str(&format!("\n  Move to: {}\n", targets.join("  ")));
    }

    out
}

/// Format a board event for display
pub fn format_board_event(event: &BoardEvent) -> String {
    match event {
        BoardEvent::ItemAdded { id, stage } => format!(
            "{} Added {} to {}",
            CHECK,
            style(id.short()).dim(),
            style(stage).cyan()
        ),
        BoardEvent::ItemMoved { id, from, to, source } => {
            let via = match source {
                TransitionSource::Drag => "drag",
                TransitionSource::Button => "button",
            };
            format!(
                "{} {} {} → {} ({})",
                ARROW,
                style(id.short()).dim(),
                style(from).dim(),
                style(to).cyan(),
                via
            )
        }
        BoardEvent::ItemUpdated { id } => format!("{} Updated {}", CHECK, style(id.short()).dim()),
        BoardEvent::ItemRemoved { id } => format!("{} Removed {}", TRASH, style(id.short()).dim()),
    }
}

fn category_color(category: EventCategory) -> Color {
    match category {
        EventCategory::Meetup => color_for(ColorToken::Brand),
        EventCategory::Workshop => color_for(ColorToken::Violet),
        EventCategory::Online => color_for(ColorToken::Sky),
        EventCategory::Fundraiser => color_for(ColorToken::Amber),
    }
}

/// Render a month grid; days with events are marked with `*`
pub fn format_month(grid: &MonthGrid) -> String {
    let mut out = format!("{}\n", style(grid.title()).bold());
    let labels: Vec<String> = grid.week_start().labels().iter().map(|l| format!("{:>4}", l)).collect();
    out.push_str(&format!("{}\n", style(labels.concat()).dim()));

    for week in grid.weeks() {
        for cell in week {
            let marker = if cell.events.is_empty() { ' ' } else { '*' };
            let day = format!("{:>3}{}", cell.date.day(), marker);
            let styled = if cell.is_today {
                style(day).reverse().to_string()
            } else if !cell.in_month {
                style(day).dim().to_string()
            } else if let Some(event) = cell.events.first() {
                style(day).fg(category_color(event.category)).to_string()
            } else {
                day
            };
            out.push_str(&styled);
        }
        out.push('\n');
    }

    out
}

/// One event line for lists under the grid
pub fn format_event(event: &CalendarEvent) -> String {
    let time = event.time.map(|t| t.format(" %H:%M").to_string()).unwrap_or_default();
    let location = if event.location.is_empty() {
        String::new()
    } else {
        format!(" · {}", event.location)
    };
    format!(
        "{}{} {} {}{}",
        style(event.date.format("%d.%m.%Y")).cyan(),
        time,
        style(format!("[{}]", event.category.as_str())).fg(category_color(event.category)),
        style(&event.title).bold(),
        style(location).dim()
    )
}

/// Render one chat message
pub fn format_chat_message(message: &ChatMessage) -> String {
    match message.role {
        Role::User => format!("{} {}", style("you").cyan().bold(), message.content),
        Role::Assistant => format!("{} {}", style("assistant").green().bold(), message.content),
        Role::System => format!("{} {}", style("system").dim(), style(&message.content).dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ItemStore;
    use crate::calendar::WeekStart;
    use crate::core::presets::{grant_registry, GrantFields};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Pro Juventute", 20), "Pro Juventute");
        assert_eq!(truncate("Ernst Göhner Stiftung", 8), "Ernst G…");
    }

    #[test]
    fn test_board_shows_placeholder_for_empty_columns() {
        console::set_colors_enabled(false);
        let registry = grant_registry().unwrap();
        let mut store = ItemStore::new(&registry);
        store.add(GrantFields::new("Pro Juventute", 15_000));

        let items = store.list();
        let view = BoardView::build(&registry, &items);
        let text = format_board("grants", &view, 80);

        assert!(text.contains("Pro Juventute"));
        assert_eq!(text.matches(EMPTY_COLUMN_PLACEHOLDER).count(), 4);
    }

    #[test]
    fn test_month_has_one_line_per_week() {
        console::set_colors_enabled(false);
        let grid = MonthGrid::build(2026, 10, WeekStart::Monday).unwrap();
        let text = format_month(&grid);
        assert!(text.starts_with("October 2026"));
        // title + header + 5 weeks
        assert_eq!(text.lines().count(), 7);
    }
}
