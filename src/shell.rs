//! Interactive shell driving a [`Browser`] session.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tabled::builder::Builder;
use tracing::debug;

use dropzone_core::error::AppError;
use dropzone_core::result::AppResult;
use dropzone_core::traits::NotificationQueue;
use dropzone_core::types::{SortBy, ViewMode};
use dropzone_service::{Browser, FileDraft, FileKind, format_file_size, format_relative};

use crate::output::{self, FileRow, FolderRow, OutputFormat, UploadRow};

/// Names per row in grid view.
const GRID_COLUMNS: usize = 4;

/// One line of shell input.
#[derive(Debug, Parser)]
#[command(name = "dropzone", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// Command to run
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Shell commands
#[derive(Debug, PartialEq, Subcommand)]
pub enum ShellCommand {
    /// List folders and files in the current folder
    Ls,
    /// Change folder (`..` goes up, `/` goes home)
    Cd {
        /// Folder name, `..`, or `/`
        target: String,
    },
    /// Create a folder here
    Mkdir {
        /// Folder name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Delete an empty folder here
    Rmdir {
        /// Folder name
        name: String,
    },
    /// Upload local files into the current folder
    Upload {
        /// Files to upload
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
    /// Show uploads in progress
    Progress {
        /// Wait until every upload has finished
        #[arg(short, long)]
        wait: bool,
    },
    /// Toggle selection of files by name
    Select {
        /// File names
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
    /// Select every visible file
    SelectAll,
    /// Clear the selection
    Clear,
    /// Delete the selected files
    Rm,
    /// Filter files by name; no text clears the filter
    Search {
        /// Text to look for
        text: Vec<String>,
    },
    /// Order files by name, size, or date
    Sort {
        /// Sort key
        by: SortBy,
    },
    /// Switch between grid and list view; no mode toggles
    View {
        /// View mode
        mode: Option<ViewMode>,
    },
    /// Copy a file's share link
    Share {
        /// File name
        name: String,
    },
    /// Show file details
    Info {
        /// File name
        name: String,
    },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Whether the shell keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// Split a line into words, honouring single and double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse a line. Blank lines yield `None`; parse failures and help
/// requests yield the text to show.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.render().to_string())
}

/// The interactive session.
#[derive(Debug)]
pub struct Shell {
    browser: Browser,
    queue: Arc<NotificationQueue>,
    format: OutputFormat,
}

impl Shell {
    /// Creates a shell over a loaded browser. `queue` must be the
    /// browser's notifier.
    pub fn new(browser: Browser, queue: Arc<NotificationQueue>, format: OutputFormat) -> Self {
        Self {
            browser,
            queue,
            format,
        }
    }

    /// Read and run commands until `quit` or end of input.
    pub async fn run(mut self) -> AppResult<()> {
        println!("DropZone. Type `help` for commands.");
        self.list();

        loop {
            let prompt = self.prompt().await;
            let Some(line) = read_line(prompt).await? else {
                break;
            };
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(command)) => match self.execute(command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => output::print_error(&e.message),
                },
                Err(text) => println!("{}", text.trim_end()),
            }
            self.flush_notifications();
        }

        self.flush_notifications();
        Ok(())
    }

    /// Run one command.
    pub async fn execute(&mut self, command: ShellCommand) -> AppResult<Flow> {
        debug!(command = ?command, "Shell command");
        match command {
            ShellCommand::Ls => self.list(),
            ShellCommand::Cd { target } => match target.as_str() {
                ".." => {
                    self.browser.go_up();
                }
                "/" | "~" => self.browser.go_home(),
                name => {
                    let folder = self
                        .browser
                        .folder_named(name)
                        .ok_or_else(|| AppError::not_found(format!("No folder named '{name}'")))?;
                    self.browser.open(folder.id)?;
                }
            },
            ShellCommand::Mkdir { name } => {
                if self.browser.create_folder(&name.join(" ")).await?.is_none() {
                    output::print_warning("Folder name cannot be blank");
                }
            }
            ShellCommand::Rmdir { name } => {
                let folder = self
                    .browser
                    .folder_named(&name)
                    .ok_or_else(|| AppError::not_found(format!("No folder named '{name}'")))?;
                self.browser.delete_folder(folder.id).await?;
            }
            ShellCommand::Upload { paths } => {
                let mut drafts = Vec::with_capacity(paths.len());
                for path in &paths {
                    match FileDraft::from_path(path).await {
                        Ok(draft) => drafts.push(draft),
                        Err(e) => output::print_error(&e.message),
                    }
                }
                let started = self.browser.upload(drafts).len();
                if started > 0 {
                    println!("Uploading {started} file(s). Use `progress` to follow.");
                }
            }
            ShellCommand::Progress { wait } => {
                if wait {
                    self.browser.wait_for_uploads().await;
                    self.flush_notifications();
                }
                let rows: Vec<UploadRow> =
                    self.browser.uploads().iter().map(UploadRow::new).collect();
                output::print_list(&rows, self.format);
            }
            ShellCommand::Select { names } => {
                for name in names {
                    match self.browser.file_named(&name) {
                        Some(file) => {
                            self.browser.toggle_selection(file.id);
                        }
                        None => output::print_warning(&format!("No file named '{name}'")),
                    }
                }
                println!("{} selected", self.browser.selected().len());
            }
            ShellCommand::SelectAll => {
                let count = self.browser.select_all_visible();
                println!("{count} selected");
            }
            ShellCommand::Clear => self.browser.clear_selection(),
            ShellCommand::Rm => {
                if self.browser.delete_selected().await? == 0 {
                    output::print_warning("Nothing selected");
                }
            }
            ShellCommand::Search { text } => self.browser.set_search(text.join(" ")),
            ShellCommand::Sort { by } => self.browser.set_sort(by),
            ShellCommand::View { mode } => match mode {
                Some(mode) => self.browser.set_view_mode(mode),
                None => {
                    self.browser.toggle_view_mode();
                }
            },
            ShellCommand::Share { name } => {
                let file = self
                    .browser
                    .file_named(&name)
                    .ok_or_else(|| AppError::not_found(format!("No file named '{name}'")))?;
                let url = self.browser.share_link(file.id)?;
                println!("{url}");
            }
            ShellCommand::Info { name } => {
                let file = self
                    .browser
                    .file_named(&name)
                    .ok_or_else(|| AppError::not_found(format!("No file named '{name}'")))?;
                match self.format {
                    OutputFormat::Json => output::print_json(&file),
                    OutputFormat::Table => {
                        let now = chrono::Utc::now();
                        output::print_kv("Name", &file.name);
                        output::print_kv("Kind", &FileKind::from_mime(&file.mime_type).to_string());
                        output::print_kv("Type", &file.mime_type);
                        output::print_kv("Size", &format_file_size(file.size));
                        output::print_kv("Uploaded", &format_relative(file.upload_date, now));
                        output::print_kv("Modified", &format_relative(file.last_modified, now));
                        output::print_kv("URL", &file.url);
                        output::print_kv("Tags", &file.tags.join(", "));
                        output::print_kv("Public", &file.is_public.to_string());
                    }
                }
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn prompt(&self) -> String {
        let path = match self.browser.breadcrumbs().await {
            Ok(path) => path.to_string(),
            Err(_) => self.browser.title(),
        };
        format!("{path} [{}]", self.browser.view_mode())
    }

    fn list(&self) {
        let folders = self.browser.visible_folders();
        let files = self.browser.visible_files();

        if self.format == OutputFormat::Json {
            output::print_json(&serde_json::json!({ "folders": folders, "files": files }));
            return;
        }

        println!("{} • {}", self.browser.title(), self.browser.summary());
        match self.browser.view_mode() {
            ViewMode::List => {
                let folder_rows: Vec<FolderRow> = folders.iter().map(FolderRow::new).collect();
                if !folder_rows.is_empty() {
                    output::print_list(&folder_rows, self.format);
                }
                let file_rows: Vec<FileRow> = files
                    .iter()
                    .map(|f| FileRow::new(f, self.browser.is_selected(f.id)))
                    .collect();
                output::print_list(&file_rows, self.format);
            }
            ViewMode::Grid => {
                let cells: Vec<String> = folders
                    .iter()
                    .map(|f| format!("{}/", f.name))
                    .chain(files.iter().map(|f| {
                        let mark = if self.browser.is_selected(f.id) { "✓ " } else { "" };
                        format!("{mark}{}\n{}", f.name, format_file_size(f.size))
                    }))
                    .collect();
                if cells.is_empty() {
                    println!("No results found.");
                } else {
                    let mut builder = Builder::default();
                    for row in cells.chunks(GRID_COLUMNS) {
                        builder.push_record(row.to_vec());
                    }
                    println!("{}", builder.build());
                }
            }
        }
        output::print_usage(self.browser.storage_usage());
    }

    fn flush_notifications(&self) {
        for notification in self.queue.drain() {
            output::print_notification(&notification);
        }
    }
}

/// Read one line from the terminal. End of input yields `None`.
async fn read_line(prompt: String) -> AppResult<Option<String>> {
    let read = tokio::task::spawn_blocking(move || {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .map_err(|e| AppError::internal(format!("Input task failed: {e}")))?;

    match read {
        Ok(line) => Ok(Some(line)),
        Err(e) => {
            debug!(error = %e, "Input closed");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_quotes() {
        assert_eq!(
            split_words(r#"mkdir "Tax Returns" 2024"#).unwrap(),
            vec!["mkdir", "Tax Returns", "2024"]
        );
        assert_eq!(split_words("  ls  ").unwrap(), vec!["ls"]);
        assert_eq!(split_words("share ''").unwrap(), vec!["share", ""]);
        assert!(split_words("cd \"oops").is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("ls").unwrap(), Some(ShellCommand::Ls));
        assert_eq!(parse_line("select-all").unwrap(), Some(ShellCommand::SelectAll));
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            parse_line("sort size").unwrap(),
            Some(ShellCommand::Sort { by: SortBy::Size })
        );
        assert_eq!(
            parse_line("view").unwrap(),
            Some(ShellCommand::View { mode: None })
        );
        assert_eq!(
            parse_line("progress --wait").unwrap(),
            Some(ShellCommand::Progress { wait: true })
        );
        assert_eq!(
            parse_line("cd ..").unwrap(),
            Some(ShellCommand::Cd { target: "..".into() })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_line("sort weight").is_err());
        assert!(parse_line("mkdir").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
