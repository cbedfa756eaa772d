//! Log line for mirrored messages.
//!
//! The template supports `%date%`, `%author%`, `%server%` and `%channel%`.

use chrono::Local;

/// Where a mirrored message came from, as shown in the log line.
#[derive(Debug, Clone, Default)]
pub struct MessageOrigin {
    pub author: String,
    pub server: String,
    pub channel: String,
}

/// Renders the configured log template.
#[derive(Debug, Clone, Default)]
pub struct MirrorLog {
    template: String,
}

impl MirrorLog {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// A log that never renders anything.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.template.is_empty()
    }

    /// Render the line for `origin`, or `None` when logging is disabled.
    pub fn render(&self, origin: &MessageOrigin) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        Some(
            self.template
                .replace("%date%", &current_date())
                .replace("%author%", &origin.author)
                .replace("%server%", &origin.server)
                .replace("%channel%", &origin.channel),
        )
    }
}

fn current_date() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> MessageOrigin {
        MessageOrigin {
            author: "alice".to_string(),
            server: "Guild".to_string(),
            channel: "general".to_string(),
        }
    }

    #[test]
    fn test_render_placeholders() {
        let log = MirrorLog::new("%author% in %server% #%channel%");
        assert_eq!(log.render(&origin()).unwrap(), "alice in Guild #general");
    }

    #[test]
    fn test_render_date() {
        let log = MirrorLog::new("[%date%] %author%");
        let line = log.render(&origin()).unwrap();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] alice"));
        assert!(!line.contains("%date%"));
    }

    #[test]
    fn test_repeated_placeholder() {
        let log = MirrorLog::new("%author%/%author%");
        assert_eq!(log.render(&origin()).unwrap(), "alice/alice");
    }

    #[test]
    fn test_empty_template_disables() {
        assert!(MirrorLog::new("").render(&origin()).is_none());
        assert!(!MirrorLog::disabled().is_enabled());
    }
}
