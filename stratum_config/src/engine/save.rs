//! Writing stale user files back to disk.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::ConfigEngine;
use crate::{SaveFailure, SaveSummary, System, strip_annotations};

impl ConfigEngine {
    /// Rewrites the user file of every dirty component.
    ///
    /// Each document starts from the file on disk, or from nothing when that
    /// file was corrupt. Every isolated system the component has a tree for
    /// is replaced by the stripped in-memory tree, and the `keybinds` section
    /// is replaced by the actions the component owns. Write failures are
    /// logged and collected; the batch always runs to the end and the dirty
    /// set is cleared afterwards.
    pub fn save_all_dirty(&mut self) -> SaveSummary {
        let pending: Vec<String> = self.tracker.components().map(str::to_owned).collect();
        let mut summary = SaveSummary::default();
        for name in pending {
            let Some(manifest) = self.manifests.get(&name) else {
                debug!(component = %name, "skipping unregistered component");
                continue;
            };
            if !manifest.config.allow_user_config {
                continue;
            }
            let document = self.document_for(&name);
            match self.layout.write(&name, &Value::Object(document)) {
                Ok(path) => {
                    debug!(component = %name, %path, "saved user file");
                    self.tracker.clear_corrupted(&path);
                    summary.saved.push(name);
                }
                Err(error) => {
                    warn!(component = %name, %error, "failed to save user file");
                    summary.failures.push(SaveFailure {
                        component: name,
                        error,
                    });
                }
            }
        }
        self.tracker.clear();
        summary
    }

    fn document_for(&self, component: &str) -> Map<String, Value> {
        let mut document = if self.tracker.is_corrupted(&self.layout.path_for(component)) {
            Map::new()
        } else {
            self.layout.load(component).into_document()
        };
        for (system, trees) in &self.isolated {
            if let Some(tree) = trees.get(component) {
                document.insert(system.as_str().to_owned(), strip_annotations(tree));
            }
        }
        if self.keybinds_merged {
            let slice = self.shared.owned_slice(component);
            let key = System::Keybinds.as_str();
            if slice.as_object().is_some_and(|actions| !actions.is_empty()) {
                document.insert(key.to_owned(), slice);
            } else {
                document.remove(key);
            }
        }
        document
    }
}
