use std::collections::HashSet;
use std::sync::Arc;

use branded_login_core::controller::SaveCompletion;
use branded_login_core::notify::{Toast, ToastQueue};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet, LocalSet};
use uuid::Uuid;

use crate::backend::Backend;
use crate::commands::common::{open_panel, print_lines, render_panel, render_toasts, CliPanel};
use crate::error::CliError;

const EDIT_HELP: &str = "Type a line to replace the message. Commands: :save, :enable, \
:disable, :show, :help, :quit";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    Text(String),
    Save,
    Enable,
    Disable,
    Show,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_edit_input(line: &str) -> EditInput {
    let line = line.trim_end_matches(['\n', '\r']);
    let Some(command) = line.strip_prefix(':') else {
        return EditInput::Text(line.to_string());
    };

    match command.trim() {
        "save" | "w" => EditInput::Save,
        "enable" => EditInput::Enable,
        "disable" => EditInput::Disable,
        "show" => EditInput::Show,
        "help" | "h" => EditInput::Help,
        "quit" | "q" => EditInput::Quit,
        // `::text` types a message that starts with a colon.
        other if other.starts_with(':') => EditInput::Text(command.to_string()),
        other => EditInput::Unknown(other.to_string()),
    }
}

/// Tracks which toasts a session has already printed.
///
/// A toast is printed once, when first seen, and stays listed by `:show`
/// until it expires.
#[derive(Debug, Default)]
pub struct ToastFeed {
    printed: HashSet<Uuid>,
}

impl ToastFeed {
    /// Lines for toasts not printed yet. Expired toasts are pruned first.
    pub fn poll(&mut self, queue: &ToastQueue, now: DateTime<Utc>) -> Vec<String> {
        queue.prune(now);
        let active = queue.active_at(now);
        let fresh: Vec<Toast> = active
            .iter()
            .filter(|toast| !self.printed.contains(&toast.id))
            .cloned()
            .collect();
        self.printed = active.iter().map(|toast| toast.id).collect();
        render_toasts(&fresh)
    }
}

pub async fn run_edit(backend: &Backend, community: &str) -> Result<(), CliError> {
    LocalSet::new()
        .run_until(async {
            let mut session = EditSession::open(backend, community).await?;
            session.run(BufReader::new(tokio::io::stdin())).await
        })
        .await
}

/// Line-based editing session.
///
/// Saves run as local tasks so typing continues while they are in flight;
/// each completion is applied as soon as it lands. Must be driven inside a
/// [`LocalSet`].
pub struct EditSession {
    panel: CliPanel,
    toasts: Arc<ToastQueue>,
    feed: ToastFeed,
    saves: JoinSet<SaveCompletion>,
}

impl EditSession {
    pub async fn open(backend: &Backend, community: &str) -> Result<Self, CliError> {
        let (panel, toasts) = open_panel(backend, community).await?;
        Ok(Self {
            panel,
            toasts,
            feed: ToastFeed::default(),
            saves: JoinSet::new(),
        })
    }

    pub const fn panel(&self) -> &CliPanel {
        &self.panel
    }

    pub fn pending_saves(&self) -> usize {
        self.saves.len()
    }

    /// Read commands until `:quit` or end of input, then wait for every
    /// pending save.
    pub async fn run<R>(&mut self, reader: R) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        print_lines(&render_panel(&self.panel().view()));
        println!("{EDIT_HELP}");

        let mut lines = reader.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle(parse_edit_input(&line)).await {
                        break;
                    }
                }
                Some(joined) = self.saves.join_next(), if !self.saves.is_empty() => {
                    self.apply(joined);
                }
            }
            print_lines(&self.poll_toasts());
        }

        self.finish().await;
        print_lines(&self.poll_toasts());
        Ok(())
    }

    /// Returns false when the session should end.
    pub async fn handle(&mut self, input: EditInput) -> bool {
        match input {
            EditInput::Text(text) => match self.panel.input(text) {
                Ok(()) => {
                    if let Some(error) = self.panel_error() {
                        println!("! {error}");
                    }
                }
                Err(error) => println!("! {error}"),
            },
            EditInput::Save => match self.panel.submit() {
                Ok(pending) => {
                    println!("Saving...");
                    self.saves.spawn_local(pending.run());
                }
                Err(error) => println!("! {error}"),
            },
            EditInput::Enable => self.toggle(true).await,
            EditInput::Disable => self.toggle(false).await,
            EditInput::Show => {
                print_lines(&render_panel(&self.panel.view()));
                print_lines(&self.visible_toasts());
            }
            EditInput::Help => println!("{EDIT_HELP}"),
            EditInput::Quit => return false,
            EditInput::Unknown(command) => println!("Unknown command ':{command}'. {EDIT_HELP}"),
        }
        true
    }

    /// Saves are never cancelled; wait for whatever is still running.
    pub async fn finish(&mut self) {
        if self.pending_saves() > 0 {
            tracing::debug!("Waiting for {} pending saves", self.pending_saves());
        }
        while let Some(joined) = self.saves.join_next().await {
            self.apply(joined);
        }
    }

    pub fn poll_toasts(&mut self) -> Vec<String> {
        self.feed.poll(&self.toasts, Utc::now())
    }

    /// Every toast that has not expired yet
    pub fn visible_toasts(&self) -> Vec<String> {
        render_toasts(&self.toasts.active_at(Utc::now()))
    }

    async fn toggle(&mut self, enabled: bool) {
        if let Err(error) = self.panel.set_enabled(enabled).await {
            tracing::debug!("Toggle failed: {}", error);
        }
        print_lines(&render_panel(&self.panel.view()));
    }

    fn apply(&mut self, joined: Result<SaveCompletion, JoinError>) {
        match joined {
            Ok(completion) => self.panel.complete(completion),
            Err(error) => tracing::error!("Save task did not finish: {}", error),
        }
    }

    fn panel_error(&self) -> Option<&'static str> {
        match self.panel.view() {
            branded_login_core::PanelView::Form(form) => form.error,
            _ => None,
        }
    }
}
