use watermark_core::{AppViewModel, DownloadStatus, SlotView};

pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![format_slot(&view.embed), format_slot(&view.detect)];
    if !view.embed.message.is_empty() {
        lines.push(format!("  message: {}", view.embed.message));
    }

    let results = &view.results;
    if results.visible {
        if results.busy {
            lines.push("[results] Processing...".to_string());
        } else {
            let origin = results
                .settled_by
                .map(|kind| format!(" ({kind})"))
                .unwrap_or_default();
            let tag = if results.is_error { "error" } else { "ok" };
            lines.push(format!("[results{origin}] {tag}: {}", results.text));
        }
    }

    if let Some(download) = &view.download {
        lines.push(format_download(download));
    }
    lines
}

fn format_slot(slot: &SlotView) -> String {
    let marker = if slot.highlighted {
        "[drop here]"
    } else if slot.active {
        "[ready]"
    } else {
        "[empty]"
    };
    let pending = if slot.in_flight > 0 {
        format!(" ({} pending)", slot.in_flight)
    } else {
        String::new()
    };
    format!("{:<6} {:<11} {}{}", slot.kind, marker, slot.display_name, pending)
}

fn format_download(download: &DownloadStatus) -> String {
    match download {
        DownloadStatus::InProgress { filename } => format!("[download] fetching {filename}..."),
        DownloadStatus::Saved { filename, location } => {
            format!("[download] {filename} saved to {location}")
        }
        DownloadStatus::Failed { filename, error } => {
            format!("[download] {filename} failed: {error}")
        }
    }
}
