/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Fire-and-forget notification collaborator. The engine never depends on
/// delivery; failures to notify are not errors.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Default notifier backed by the tracing stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => {
                tracing::info!(severity = severity.as_str(), "{message}")
            }
            Severity::Error => tracing::warn!(severity = severity.as_str(), "{message}"),
        }
    }
}

/// Notifier that drops everything; for callers that want no reporting.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels_are_stable() {
        assert_eq!(Severity::Info.as_str(), "info");
        assert_eq!(Severity::Success.as_str(), "success");
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
