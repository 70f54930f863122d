//! View-state values shared by screens. Drawing them is the host's job.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A blocking alert or a toast, depending on how the host shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success".into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn permission_required(message: impl Into<String>) -> Self {
        Self::info("Permission Required", message)
    }
}

/// Bar fill for a progress value in percent, clamped to `0..=100`.
pub fn bar_fill(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Tabs,
    Login,
    Food,
    Progress,
    Coach,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fill_clamps() {
        assert_eq!(bar_fill(140.0), 100.0);
        assert_eq!(bar_fill(-5.0), 0.0);
        assert_eq!(bar_fill(f64::NAN), 0.0);
        assert_eq!(bar_fill(64.5), 64.5);
    }
}
