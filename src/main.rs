use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use pipeboard::board::{Board, DragController, FormModal, Transition, TransitionSource};
use pipeboard::calendar::{demo_events, EventList, MonthGrid, WeekStart};
use pipeboard::chat::{
    ChatBackend, ChatClientConfig, ChatError, ChatSession, ChatSessionConfig, HttpChatClient, Notification,
};
use pipeboard::cli::commands::{
    AddCommand, ApplyFields, CalendarCommand, ChatCommand, DetailCommand, EditCommand, MoveCommand,
    RemoveCommand, ShowCommand, ValidateCommand,
};
use pipeboard::cli::output::*;
use pipeboard::cli::{Cli, Command};
use pipeboard::core::config::ChatSettings;
use pipeboard::core::{BoardConfig, BoardKind, GrantFields, ItemFields, NewsletterFields, SearchPattern, StageKey};
use pipeboard::persistence::{InMemoryPersistence, PersistenceBackend};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    if let Err(e) = run(&cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Validate(cmd) => validate_config(cmd),
        Command::Calendar(cmd) => show_calendar(cmd),
        Command::Chat(cmd) => {
            let config = load_config(cli)?;
            chat(cmd, config.chat.as_ref()).await
        }
        _ => {
            let config = load_config(cli)?;
            match config.kind {
                BoardKind::Grants => run_board::<GrantFields>(cli, &config).await,
                BoardKind::Newsletter => run_board::<NewsletterFields>(cli, &config).await,
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<BoardConfig> {
    match &cli.config {
        Some(path) => BoardConfig::from_file(path).context("Failed to load board config"),
        None => Ok(BoardConfig::builtin(cli.kind)),
    }
}

async fn open_backend(cli: &Cli) -> Result<Arc<dyn PersistenceBackend>> {
    if cli.no_persist {
        return Ok(Arc::new(InMemoryPersistence::new()));
    }
    persistent_backend(cli).await
}

#[cfg(feature = "sqlite")]
async fn persistent_backend(cli: &Cli) -> Result<Arc<dyn PersistenceBackend>> {
    use pipeboard::persistence::SqliteItemStore;

    let store = match &cli.db {
        Some(path) => SqliteItemStore::new(path).await?,
        None => SqliteItemStore::with_default_path().await?,
    };
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn persistent_backend(_cli: &Cli) -> Result<Arc<dyn PersistenceBackend>> {
    tracing::warn!("Built without sqlite support, items are kept in memory");
    Ok(Arc::new(InMemoryPersistence::new()))
}

async fn run_board<F: ApplyFields>(cli: &Cli, config: &BoardConfig) -> Result<()> {
    let backend = open_backend(cli).await?;
    let mut board: Board<F> = Board::open(&config.name, config.to_registry()?, backend).await?;

    if config.seed_demo {
        let seeded = board.seed_demo().await?;
        if seeded > 0 {
            info!("Seeded board '{}' with {} demo items", board.name(), seeded);
        }
    }

    board.add_event_handler(|event| println!("{}", format_board_event(event)));

    match &cli.command {
        Command::Show(cmd) => show_board(&board, cmd),
        Command::Add(cmd) => add_item(&mut board, cmd).await,
        Command::Move(cmd) => move_item(&mut board, cmd).await,
        Command::Edit(cmd) => edit_item(&mut board, cmd).await,
        Command::Remove(cmd) => remove_item(&mut board, cmd).await,
        Command::Detail(cmd) => show_detail(&board, cmd),
        Command::Stages => {
            list_stages(&board);
            Ok(())
        }
        other => anyhow::bail!("{:?} does not operate on a board", other),
    }
}

fn show_board<F: ItemFields>(board: &Board<F>, cmd: &ShowCommand) -> Result<()> {
    let search = cmd
        .search
        .as_deref()
        .map(|pattern| {
            SearchPattern::new(pattern, cmd.regex).with_context(|| format!("Invalid search pattern: {}", pattern))
        })
        .transpose()?;
    let items = board.list();
    let view = board.view(&items, search.as_ref());

    if cmd.json {
        let columns: Vec<_> = view
            .columns
            .iter()
            .map(|column| {
                serde_json::json!({
                    "stage": column.stage.key,
                    "label": column.stage.label,
                    "items": column.items,
                })
            })
            .collect();
        let data = serde_json::json!({ "board": board.name(), "columns": columns });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    print!("{}", format_board(board.name(), &view, terminal_width()));
    if search.is_some() {
        println!(
            "\n{} {} of {} items match",
            INFO,
            style(view.total()).cyan(),
            items.len()
        );
    }

    Ok(())
}

async fn add_item<F: ApplyFields>(board: &mut Board<F>, cmd: &AddCommand) -> Result<()> {
    let mut form: FormModal<F> = FormModal::new();
    form.open_create();
    if let Some(draft) = form.draft_mut() {
        draft.apply(&cmd.fields);
    }

    match form.confirm() {
        Some(submission) => {
            board.submit(submission).await?;
        }
        None => println!("{} Nothing added: a {} needs a title", WARN, F::KIND),
    }

    Ok(())
}

async fn edit_item<F: ApplyFields>(board: &mut Board<F>, cmd: &EditCommand) -> Result<()> {
    let item = board.find_by_prefix(&cmd.id)?;
    let (id, current) = (item.id, item.fields.clone());

    let mut form: FormModal<F> = FormModal::new();
    form.open_edit(id, current);
    if let Some(draft) = form.draft_mut() {
        draft.apply(&cmd.fields);
    }

    match form.confirm() {
        Some(submission) => {
            board.submit(submission).await?;
        }
        None => println!("{} Not saved: a {} needs a title", WARN, F::KIND),
    }

    Ok(())
}

async fn move_item<F: ItemFields>(board: &mut Board<F>, cmd: &MoveCommand) -> Result<()> {
    let id = board.find_by_prefix(&cmd.id)?.id;
    let target = StageKey::new(cmd.stage.trim());

    let transition = if cmd.drag {
        let mut drag = DragController::new();
        drag.start(id);
        drag.hover(target.clone());
        let intent = drag.drop_on(target.clone());
        drag.end();

        match intent {
            Some(intent) => board.drop_item(intent).await?,
            None => Transition::NotFound,
        }
    } else {
        let button = board
            .detail(Some(id))
            .move_targets()
            .into_iter()
            .find(|t| t.stage.key == target)
            .map(|t| t.stage.key.clone());

        match button {
            Some(stage) => board.apply_move(id, &stage).await?,
            None => board.move_item(id, target.as_str(), TransitionSource::Button).await?,
        }
    };

    match transition {
        Transition::Moved { .. } => {}
        Transition::Unchanged => println!("{} Already in {}", INFO, style(&target).cyan()),
        Transition::NotFound => println!("{} No such {}", WARN, F::KIND),
    }

    Ok(())
}

async fn remove_item<F: ItemFields>(board: &mut Board<F>, cmd: &RemoveCommand) -> Result<()> {
    let id = board.find_by_prefix(&cmd.id)?.id;
    if !board.remove(id).await? {
        println!("{} No such {}", WARN, F::KIND);
    }
    Ok(())
}

fn show_detail<F: ItemFields>(board: &Board<F>, cmd: &DetailCommand) -> Result<()> {
    let id = board.find_by_prefix(&cmd.id)?.id;
    let panel = board.detail(Some(id));

    if cmd.json {
        let targets: Vec<StageKey> = panel.move_targets().iter().map(|t| t.stage.key.clone()).collect();
        let data = serde_json::json!({
            "item": panel.item(),
            "move_to": targets,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    print!("{}", format_detail(&panel));
    Ok(())
}

fn list_stages<F: ItemFields>(board: &Board<F>) {
    println!("{} Stages of {}:", INFO, style(board.name()).bold());
    for (position, stage) in board.registry().iter().enumerate() {
        println!(
            "  {}. {} {} {}",
            position + 1,
            format_stage(stage),
            style(&stage.key).dim(),
            style(format!("({})", board.store().column(&stage.key).len())).dim()
        );
    }
}

fn validate_config(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating board config...", INFO);

    match BoardConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Board configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Kind: {}", style(config.kind.as_str()).cyan());
            let stages: Vec<String> = config.stages().iter().map(format_stage).collect();
            println!("  Stages: {}", stages.join(" → "));

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}

fn show_calendar(cmd: &CalendarCommand) -> Result<()> {
    let today = Local::now().date_naive();
    let (year, month) = cmd.month.unwrap_or((today.year(), today.month()));
    let week_start = if cmd.sunday_first { WeekStart::Sunday } else { WeekStart::Monday };

    let events = EventList::from_events(demo_events());
    let grid = MonthGrid::build(year, month, week_start)?
        .with_events(events.iter())
        .mark_today(today);

    print!("{}", format_month(&grid));

    let in_month: Vec<_> = grid
        .cells()
        .iter()
        .filter(|cell| cell.in_month)
        .flat_map(|cell| cell.events.iter())
        .collect();
    if !in_month.is_empty() {
        println!();
        for event in in_month {
            println!("  {}", format_event(event));
        }
    }

    let upcoming = events.upcoming(today, cmd.upcoming);
    if !upcoming.is_empty() {
        println!("\n{} Upcoming:", INFO);
        for event in upcoming {
            println!("  {}", format_event(event));
        }
    }

    Ok(())
}

async fn chat(cmd: &ChatCommand, settings: Option<&ChatSettings>) -> Result<()> {
    let mut client_config = ChatClientConfig::from_env();
    let mut session_config = ChatSessionConfig::default();

    if let Some(settings) = settings {
        if client_config.endpoint.is_none() {
            client_config = client_config.with_endpoint(settings.endpoint.clone());
        }
        if let Some(timeout) = settings.timeout_secs {
            client_config = client_config.with_timeout(timeout);
        }
        session_config.history_window = settings.history_window;
    }
    if let Some(endpoint) = &cmd.endpoint {
        client_config = client_config.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = cmd.timeout {
        client_config = client_config.with_timeout(timeout);
    }
    if let Some(window) = cmd.window {
        if window == 0 {
            anyhow::bail!("--window must be at least 1");
        }
        session_config.history_window = Some(window);
    }

    let client = HttpChatClient::new(client_config)?;
    let endpoint = client.endpoint().to_string();
    let session = ChatSession::with_config(client, session_config);

    if !cmd.message.is_empty() {
        send_message(&session, &cmd.message.join(" ")).await?;
        return Ok(());
    }

    println!(
        "{} Chatting with {} (empty line or Ctrl-D to quit)",
        INFO,
        style(endpoint).dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").cyan());
        std::io::stdout().flush()?;

        match lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => {
                // Failures were already shown as a notification
                let _ = send_message(&session, &line).await;
            }
            _ => break,
        }
    }

    Ok(())
}

async fn send_message<B: ChatBackend>(session: &ChatSession<B>, text: &str) -> Result<(), ChatError> {
    let spinner = create_spinner("Waiting for reply...");
    let result = session.send(text).await;
    spinner.finish_and_clear();

    for notification in session.take_notifications().await {
        match notification {
            Notification::Failure(message) => {
                println!("{} Message could not be answered: {}", CROSS, style(message).red())
            }
        }
    }

    if let Some(reply) = result? {
        println!("{}", format_chat_message(&reply));
    }

    Ok(())
}
