use std::fs;
use std::path::Path;

use watermark_core::{DragEvent, Msg, OperationKind, SelectedFile};

pub(crate) const HELP: &str = "\
Commands:
  pick <embed|detect> <file>...      choose files as the file picker would
  drag <embed|detect> <enter|over|leave>
  drop <embed|detect> <file>...      drag files onto a drop region
  message <text>                     secret message for embedding
  submit <embed|detect>
  download                           save the sealed file from the last result
  help
  quit";

/// One line typed by the user, translated into UI events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Dispatch(Vec<Msg>),
    /// Events to dispatch plus paths that could not be read and were left out.
    DispatchSkipping { msgs: Vec<Msg>, skipped: Vec<String> },
    Help,
    Quit,
    Invalid(String),
}

pub(crate) fn parse_line(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Vec::new()),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "message" => Command::Dispatch(vec![Msg::MessageEdited(rest.to_string())]),
        "download" => Command::Dispatch(vec![Msg::DownloadClicked]),
        "submit" => match OperationKind::parse(rest) {
            Some(kind) => Command::Dispatch(vec![Msg::SubmitClicked(kind)]),
            None => Command::Invalid(format!("unknown form '{rest}'")),
        },
        "pick" => with_files(rest, |kind, files| {
            vec![Msg::FilesPicked { kind, files }]
        }),
        "drop" => with_files(rest, |kind, files| {
            vec![
                Msg::Drag {
                    kind,
                    event: DragEvent::Enter,
                },
                Msg::Drag {
                    kind,
                    event: DragEvent::Drop(files),
                },
            ]
        }),
        "drag" => parse_drag(rest),
        other => Command::Invalid(format!("unknown command '{other}'")),
    }
}

fn parse_drag(rest: &str) -> Command {
    let mut words = rest.split_whitespace();
    let Some(kind) = words.next().and_then(OperationKind::parse) else {
        return Command::Invalid("drag needs a form: embed or detect".to_string());
    };
    let event = match words.next().map(str::to_ascii_lowercase).as_deref() {
        Some("enter") => DragEvent::Enter,
        Some("over") => DragEvent::Over,
        Some("leave") => DragEvent::Leave,
        _ => return Command::Invalid("drag needs enter, over or leave".to_string()),
    };
    Command::Dispatch(vec![Msg::Drag { kind, event }])
}

/// Resolves the listed paths and always dispatches, even when none of them
/// could be read: a drop has to reach its region to clear the highlight, and
/// an empty file list leaves the slot untouched.
fn with_files(
    rest: &str,
    build: impl FnOnce(OperationKind, Vec<SelectedFile>) -> Vec<Msg>,
) -> Command {
    let mut words = rest.split_whitespace();
    let Some(kind) = words.next().and_then(OperationKind::parse) else {
        return Command::Invalid("expected a form: embed or detect".to_string());
    };
    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for raw in words {
        match resolve_file(Path::new(raw)) {
            Ok(file) => files.push(file),
            Err(err) => skipped.push(err),
        }
    }
    let msgs = build(kind, files);
    if skipped.is_empty() {
        Command::Dispatch(msgs)
    } else {
        Command::DispatchSkipping { msgs, skipped }
    }
}

/// Turns a path into the file reference a picker would hand over.
pub(crate) fn resolve_file(path: &Path) -> Result<SelectedFile, String> {
    let meta = fs::metadata(path).map_err(|err| format!("{}: {err}", path.display()))?;
    if !meta.is_file() {
        return Err(format!("{}: not a file", path.display()));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{}: no file name", path.display()))?;
    Ok(SelectedFile::new(name, path, meta.len()))
}
