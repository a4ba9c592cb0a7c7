use std::fmt;
use std::sync::{Arc, Mutex};

use ecow::EcoString;

use crate::error::AssetError;

/// A non-fatal diagnostic recorded during one conversion run.
#[derive(Debug, Clone)]
pub enum Warning {
    /// An asset could not be resolved; a placeholder was emitted instead.
    AssetSkipped {
        id: EcoString,
        file_name: EcoString,
        reason: AssetError,
    },
    /// A node type this version does not recognize was passed through.
    UnknownNode { kind: EcoString },
    /// A link mark carried an empty href and was dropped.
    EmptyLink,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AssetSkipped {
                id,
                file_name,
                reason,
            } => {
                if file_name.is_empty() {
                    write!(f, "skipped asset {id}: {reason}")
                } else {
                    write!(f, "skipped asset {file_name} ({id}): {reason}")
                }
            }
            Warning::UnknownNode { kind } => {
                write!(f, "unrecognized node type {kind:?} passed through as text")
            }
            Warning::EmptyLink => write!(f, "dropped a link mark with an empty href"),
        }
    }
}

/// Shared collector for warnings emitted during conversion.
#[derive(Clone, Default)]
pub struct WarningCollector {
    inner: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Record a single warning.
    pub fn push(&self, warning: Warning) {
        let mut guard = self.inner.lock().expect("warning collector poisoned");
        guard.push(warning);
    }

    /// Extend the collector with multiple warnings.
    pub fn extend<I>(&self, warnings: I)
    where
        I: IntoIterator<Item = Warning>,
    {
        let mut guard = self.inner.lock().expect("warning collector poisoned");
        guard.extend(warnings);
    }

    /// Clone all collected warnings into a standalone vector.
    pub fn snapshot(&self) -> Vec<Warning> {
        let guard = self.inner.lock().expect("warning collector poisoned");
        guard.clone()
    }

    pub fn is_empty(&self) -> bool {
        let guard = self.inner.lock().expect("warning collector poisoned");
        guard.is_empty()
    }
}

/// Render warnings into a human-readable string for the caller to report.
pub fn render_warnings<'a>(warnings: impl IntoIterator<Item = &'a Warning>) -> Option<String> {
    let lines: Vec<String> = warnings.into_iter().map(|w| w.to_string()).collect();
    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n"))
}
