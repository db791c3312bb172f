use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use doclist_core::FileSelection;
use doclist_engine::MAX_UPLOAD_BYTES;
use thiserror::Error;

pub const HELP: &str = "commands: search <text> | type <chars> | delete <id> | upload <path> \
| refresh | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the search text in one edit.
    Search(String),
    /// Append characters one keystroke at a time.
    Type(String),
    Delete(String),
    Upload(PathBuf),
    Refresh,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word {
        "search" => Command::Search(rest.to_string()),
        "type" => Command::Type(required(rest, "type")?.to_string()),
        "delete" => Command::Delete(required(rest.trim(), "delete")?.to_string()),
        "upload" => Command::Upload(PathBuf::from(required(rest.trim(), "upload")?)),
        "refresh" => Command::Refresh,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(arg: &'a str, command: &'static str) -> Result<&'a str, ParseError> {
    if arg.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

/// MIME type from the file extension, as a browser file picker reports it.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Reads the picked file, stopping one byte past the upload cap so an
/// oversized pick is still rejected as too large without being buffered.
pub fn read_selection(path: &Path) -> io::Result<FileSelection> {
    let file = File::open(path)?;
    let limit = MAX_UPLOAD_BYTES + 1;
    let expected = file.metadata()?.len().min(limit);
    let mut contents = Vec::with_capacity(expected as usize);
    file.take(limit).read_to_end(&mut contents)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileSelection {
        file_name,
        mime_type: guess_mime_type(path).to_string(),
        contents: contents.into(),
    })
}
