// Shader hot reload
//
// Watches the directories that hold the SPIR-V binaries and reports when one
// of the watched files was written. The host then reloads the pair and hands
// it to `Viewport::set_shaders`; nothing here touches the GPU.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

pub struct ShaderWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    files: HashSet<PathBuf>,
}

impl ShaderWatcher {
    pub fn new(files: &[PathBuf]) -> Result<Self> {
        let (tx, events) = channel();
        let mut watcher =
            notify::recommended_watcher(tx).context("Failed to create file watcher")?;

        let mut dirs = HashSet::new();
        for file in files {
            let dir = watch_dir(file);
            if dirs.insert(dir.clone()) {
                watcher
                    .watch(&dir, RecursiveMode::NonRecursive)
                    .with_context(|| format!("Failed to watch {:?}", dir))?;
                log::info!("Watching {:?} for shader changes", dir);
            }
        }

        Ok(Self {
            _watcher: watcher,
            events,
            files: files.iter().map(|f| normalize(f)).collect(),
        })
    }

    /// Drains pending events. True if any watched file was created or modified.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(event) => changed |= self.is_relevant(&event),
                Err(e) => log::warn!("File watcher error: {}", e),
            }
        }
        changed
    }

    fn is_relevant(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event.paths.iter().any(|p| self.files.contains(&normalize(p)))
    }
}

fn watch_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => normalize(dir),
        _ => normalize(Path::new(".")),
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
