use crate::OperationKind;

/// What the results area shows once a submission has resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettledContent {
    DownloadLink { filename: String },
    SuccessMessage(String),
    ErrorMessage(String),
}

impl SettledContent {
    /// Link target served by the static download route.
    pub fn download_href(filename: &str) -> String {
        format!("/download/{filename}")
    }

    /// Plain-text rendering.
    pub fn text(&self) -> String {
        match self {
            SettledContent::DownloadLink { filename } => {
                format!("Download Sealed File ({filename}): {}", Self::download_href(filename))
            }
            SettledContent::SuccessMessage(text) | SettledContent::ErrorMessage(text) => {
                text.clone()
            }
        }
    }

    /// HTML fragment for the content sub-element of the results area.
    pub fn to_markup(&self) -> String {
        match self {
            SettledContent::DownloadLink { filename } => format!(
                "<a href=\"{}\" download>Download Sealed File ({})</a>",
                escape_html(&Self::download_href(filename)),
                escape_html(filename)
            ),
            SettledContent::SuccessMessage(text) => {
                format!("<p class=\"success\">{}</p>", escape_html(text))
            }
            SettledContent::ErrorMessage(text) => {
                format!("<p class=\"error\">{}</p>", escape_html(text))
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SettledContent::ErrorMessage(_))
    }
}

/// The single rendered state of the results region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresentationState {
    #[default]
    Hidden,
    Busy,
    Settled {
        kind: OperationKind,
        content: SettledContent,
    },
}

/// Owner of the shared results region.
///
/// Both forms drive the same presenter, so whichever submission resolves
/// last is what stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPresenter {
    state: PresentationState,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the loading indicator and drops any previous content.
    pub fn show_busy(&mut self) {
        self.state = PresentationState::Busy;
    }

    pub fn show_settled(&mut self, kind: OperationKind, content: SettledContent) {
        self.state = PresentationState::Settled { kind, content };
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// The filename behind the currently shown download link, if any.
    pub fn download_filename(&self) -> Option<&str> {
        match &self.state {
            PresentationState::Settled {
                content: SettledContent::DownloadLink { filename },
                ..
            } => Some(filename.as_str()),
            _ => None,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
