use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles used by every line the binary prints
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub info: Style,
    pub dim: Style,
    /// Annotation ids
    pub id: Style,
    /// File locations
    pub location: Style,
}

impl Theme {
    /// Colored when stdout and stderr are both terminals
    pub fn detect() -> Self {
        let stdout = console::Term::stdout();
        let stderr = console::Term::stderr();
        if stdout.is_term() && stderr.is_term() && console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            info: Style::new().magenta(),
            dim: Style::new().bright_black(),
            id: Style::new().blue().bold(),
            location: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            header: none,
            success: none,
            error: none,
            info: none,
            dim: none,
            id: none,
            location: none,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
