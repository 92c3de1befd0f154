use crate::errors::Result;
use crate::{BuildResult, Builder};
use indexmap::IndexSet;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Quiet period that closes a burst of events
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// Watches a set of files through their parent directories.
///
/// Directories are watched instead of the files themselves so editors that
/// save by replacing the file keep triggering events.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    dirs: IndexSet<PathBuf>,
    files: IndexSet<PathBuf>,
}

impl FileWatcher {
    pub fn new() -> Result<Self> {
        let (tx, rx) = channel();
        let watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
        Ok(Self {
            watcher,
            rx,
            dirs: IndexSet::new(),
            files: IndexSet::new(),
        })
    }

    /// Replace the tracked file set, watching any directory not seen before.
    pub fn track(&mut self, files: &[PathBuf]) -> Result<()> {
        self.files = files.iter().map(|path| normalize(path)).collect();

        for file in &self.files {
            let Some(dir) = file.parent() else { continue };
            if self.dirs.insert(dir.to_path_buf()) {
                self.watcher.watch(dir, RecursiveMode::NonRecursive)?;
                tracing::debug!("Watching {}", dir.display());
            }
        }
        Ok(())
    }

    pub fn tracked(&self) -> usize {
        self.files.len()
    }

    /// Block until a tracked file changes, then collect the rest of the burst.
    ///
    /// Returns `None` once the watcher is gone.
    pub fn wait(&self) -> Option<Vec<PathBuf>> {
        loop {
            let event = self.rx.recv().ok()?;
            let mut changed = self.relevant_paths(event);
            if changed.is_empty() {
                continue;
            }

            loop {
                match self.rx.recv_timeout(DEBOUNCE_WINDOW) {
                    Ok(event) => {
                        for path in self.relevant_paths(event) {
                            changed.insert(path);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return None,
                }
            }
            return Some(changed.into_iter().collect());
        }
    }

    /// Throw away events caused by our own writes.
    pub fn drain(&self) {
        while self.rx.recv_timeout(DEBOUNCE_WINDOW).is_ok() {}
    }

    fn relevant_paths(&self, event: notify::Result<Event>) -> IndexSet<PathBuf> {
        match event {
            Ok(event) if is_change(&event.kind) => event
                .paths
                .iter()
                .map(|path| normalize(path))
                .filter(|path| self.files.contains(path))
                .collect(),
            Ok(_) => IndexSet::new(),
            Err(e) => {
                tracing::warn!("Watch error: {}", e);
                IndexSet::new()
            }
        }
    }
}

fn is_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

/// Canonical parent joined with the file name, so paths from events and from
/// globbing compare equal even after the file itself was replaced.
fn normalize(path: &Path) -> PathBuf {
    let absolute = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.canonicalize().ok(),
        _ => std::env::current_dir().ok(),
    };
    match (absolute, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Build once, then rebuild every time an input file or the config changes.
///
/// A failing first build is returned. Later failures are logged and the loop
/// keeps going, so a broken config can be fixed without restarting.
pub fn watch<F>(builder: &mut Builder, mut on_build: F) -> Result<()>
where
    F: FnMut(&BuildResult),
{
    let result = builder.run()?;
    on_build(&result);

    let mut watcher = FileWatcher::new()?;
    watcher.track(&result.watched)?;
    watcher.drain();
    tracing::info!("Watching {} files for changes...", watcher.tracked());

    while let Some(changed) = watcher.wait() {
        for path in &changed {
            tracing::info!("File changed: {}", path.display());
        }

        match builder.run() {
            Ok(result) => {
                on_build(&result);
                if let Err(e) = watcher.track(&result.watched) {
                    tracing::warn!("Failed to watch new files: {}", e);
                }
            }
            Err(e) => tracing::error!("Rebuild failed: {}", e),
        }
        watcher.drain();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use tempfile::TempDir;

    #[test]
    fn test_change_kinds() {
        assert!(is_change(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
        assert!(is_change(&EventKind::Create(CreateKind::File)));
        assert!(!is_change(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_change(&EventKind::Access(notify::event::AccessKind::Any)));
    }

    #[test]
    fn test_normalize_matches_across_spellings() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("index.html");
        std::fs::write(&file, "").unwrap();

        let dotted = temp_dir.path().join(".").join("index.html");
        assert_eq!(normalize(&file), normalize(&dotted));
    }

    #[test]
    fn test_only_tracked_files_are_relevant() {
        let temp_dir = TempDir::new().unwrap();
        let tracked = temp_dir.path().join("a.html");
        let other = temp_dir.path().join("b.css");
        std::fs::write(&tracked, "").unwrap();
        std::fs::write(&other, "").unwrap();

        let mut watcher = FileWatcher::new().unwrap();
        watcher.track(&[tracked.clone()]).unwrap();
        assert_eq!(watcher.tracked(), 1);

        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(tracked.clone())
            .add_path(other);
        let paths = watcher.relevant_paths(Ok(event));
        assert_eq!(paths.len(), 1);
        assert!(paths.contains(&normalize(&tracked)));
    }
}
