//! Location pickers.
//!
//! The file dialog itself belongs to the UI; this crate only defines the
//! seam it plugs into.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::target::{Resolution, SaveTarget};

/// Asks the user where to save or what to open.
pub trait TargetPicker: Send + Sync {
    /// Choose a destination, starting from `proposed`.
    fn pick_save_target(&self, proposed: &Path) -> impl Future<Output = Result<Resolution>> + Send;

    /// Choose an existing document to open.
    fn pick_open_target(&self) -> impl Future<Output = Result<Resolution>> + Send;
}

/// Picker that answers every prompt with a preset path, or cancels when none
/// was given. Used by scripted front ends.
#[derive(Debug, Clone, Default)]
pub struct PresetPicker {
    path: Option<PathBuf>,
}

impl PresetPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// A picker that always cancels.
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

impl TargetPicker for PresetPicker {
    async fn pick_save_target(&self, _proposed: &Path) -> Result<Resolution> {
        Ok(Resolution::from(self.path.clone()))
    }

    async fn pick_open_target(&self) -> Result<Resolution> {
        Ok(Resolution::from(self.path.clone()))
    }
}

/// Default name offered when the document has never been saved.
pub const UNTITLED: &str = "untitled.txt";

/// Ask `picker` for a new save location.
///
/// `proposed` is the current target when there is one, otherwise
/// [`UNTITLED`].
pub async fn resolve_new_target<P: TargetPicker>(
    picker: &P,
    proposed: Option<&SaveTarget>,
) -> Result<Resolution> {
    let proposed = proposed.map_or_else(|| Path::new(UNTITLED), SaveTarget::path);
    tracing::debug!("Resolving save target (proposed {})", proposed.display());

    let resolution = picker.pick_save_target(proposed).await?;
    match &resolution {
        Resolution::Resolved(target) => tracing::debug!("Save target resolved: {target}"),
        Resolution::Cancelled => tracing::debug!("Save target selection cancelled"),
    }
    Ok(resolution)
}
