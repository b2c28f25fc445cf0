//! Line-oriented front end over the journal view controller.
//!
//! Renders the list and detail screens as text and maps one command per
//! input line onto controller actions. Failed actions print a status line and
//! the shell keeps running.

use journi_core::{CacheError, EntryStore, Screen, SqliteEntryStore, ViewController};
use log::debug;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "journi> ";

const HELP: &str = "\
commands:
  list            show all entries
  go <n>          open entry number <n>
  new             add an empty entry dated now
  edit <text>     replace the open entry's text
  append <text>   add a line to the open entry's text
  save            store the open entry
  back            return to the list (unsaved text is dropped)
  show            show the current screen again
  open <path>     switch to another database file
  create <name>   create <name>.db and switch to it
  dump            print every stored entry as JSON
  help            show this help
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Go(Option<usize>),
    New,
    Edit(String),
    Append(String),
    Save,
    Back,
    Show,
    Open(String),
    Create(String),
    Dump,
    Help,
    Quit,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Go(_) => "go",
            Self::New => "new",
            Self::Edit(_) => "edit",
            Self::Append(_) => "append",
            Self::Save => "save",
            Self::Back => "back",
            Self::Show => "show",
            Self::Open(_) => "open",
            Self::Create(_) => "create",
            Self::Dump => "dump",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "go" => Command::Go(parse_row_number(rest)?),
        "new" => Command::New,
        "edit" => Command::Edit(rest.to_string()),
        "append" => Command::Append(rest.to_string()),
        "save" => Command::Save,
        "back" => Command::Back,
        "show" | "" => Command::Show,
        "open" => Command::Open(rest.to_string()),
        "create" => Command::Create(rest.to_string()),
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(command)
}

// Rows are numbered from 1 on screen.
fn parse_row_number(raw: &str) -> Result<Option<usize>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<usize>() {
        Ok(number) if number > 0 => Ok(Some(number - 1)),
        _ => Err(format!("invalid entry number `{raw}`")),
    }
}

pub struct Shell<W: Write> {
    controller: ViewController<SqliteEntryStore>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(controller: ViewController<SqliteEntryStore>, out: W) -> Self {
        Self { controller, out }
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> io::Result<()> {
        self.render()?;
        let mut lines = input.lines();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
            let Some(line) = lines.next().transpose()? else {
                writeln!(self.out)?;
                return Ok(());
            };
            match parse_command(&line) {
                Ok(Command::Quit) => return Ok(()),
                Ok(command) => self.execute(command)?,
                Err(message) => self.status(&message)?,
            }
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        debug!(
            "event=cli_command module=cli status=start command={}",
            command.name()
        );
        match command {
            Command::List | Command::Show => self.render(),
            Command::Go(index) => match self.controller.select(index) {
                Ok(true) => self.render(),
                Ok(false) if self.controller.detail().is_some() => {
                    self.status("an entry is already open; use `back` first")
                }
                Ok(false) => self.status("No entries selected"),
                Err(err) => self.report(err),
            },
            Command::New => match self.controller.new_entry() {
                Ok(Some(_)) => self.render(),
                Ok(None) => self.status("use `back` before adding an entry"),
                Err(err) => self.report(err),
            },
            Command::Edit(text) => {
                if self.controller.edit(text) {
                    self.render()
                } else {
                    self.status("no entry is open")
                }
            }
            Command::Append(text) => {
                let draft = self.controller.detail().map(|view| {
                    if view.draft.is_empty() {
                        text.clone()
                    } else {
                        format!("{}\n{text}", view.draft)
                    }
                });
                match draft {
                    Some(draft) => {
                        self.controller.edit(draft);
                        self.render()
                    }
                    None => self.status("no entry is open"),
                }
            }
            Command::Save => match self.controller.save() {
                Ok(true) => self.status("entry saved"),
                Ok(false) => self.status("no entry is open"),
                Err(err) => self.report(err),
            },
            Command::Back => {
                if self.controller.back() {
                    self.render()
                } else {
                    self.status("already on the list")
                }
            }
            Command::Open(path) => match self.controller.set_data_source(&path) {
                Ok(true) => {
                    self.status(&format!("Changed active DB to: {path}"))?;
                    self.render()
                }
                Ok(false) => self.status("Didn't change the active DB"),
                Err(err) => self.report(err),
            },
            Command::Create(name) => match self.controller.create_data_source(&name) {
                Ok(path) => {
                    self.status(&format!("Created new DB: {}", path.display()))?;
                    self.render()
                }
                Err(err) => self.report(err),
            },
            Command::Dump => match self.controller.cache().store().list_all() {
                Ok(entries) => {
                    let json = serde_json::to_string_pretty(&entries)
                        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
                    writeln!(self.out, "{json}")
                }
                Err(err) => self.report(err.into()),
            },
            Command::Help => writeln!(self.out, "{HELP}"),
            Command::Quit => Ok(()),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        match self.controller.screen() {
            Screen::List { cursor } => {
                let cursor = *cursor;
                writeln!(
                    self.out,
                    "== {} ==",
                    self.controller.cache().data_source().display()
                )?;
                let rows = self.controller.rows();
                if rows.is_empty() {
                    writeln!(self.out, "  (no entries; `new` adds one)")?;
                }
                for (index, row) in rows.iter().enumerate() {
                    let marker = if cursor == Some(index) { '>' } else { ' ' };
                    writeln!(self.out, "{marker}{:>3}. {row}", index + 1)?;
                }
                Ok(())
            }
            Screen::Detail(view) => {
                writeln!(self.out, "== {} ==", view.date_label)?;
                writeln!(self.out, "{}", view.draft)?;
                writeln!(self.out, "-- `edit`/`append` to change, `save`, `back` --")
            }
        }
    }

    fn status(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "status: {message}")
    }

    fn report(&mut self, err: CacheError) -> io::Result<()> {
        self.status(&err.to_string())
    }
}
