use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};

use super::App;
use super::collab::{InputSource, Renderer, UiHooks};
use crate::config::CoreConfig;

/// Watch the directory holding `path` and signal whenever that file changes.
/// The watcher lives on its own thread for the rest of the process.
pub fn spawn_config_watcher(path: &Path) -> Receiver<()> {
    let (tx, rx) = channel::<()>();
    let file = path.to_path_buf();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::thread::spawn(move || {
        use notify::{EventKind, RecursiveMode, Watcher};
        let name = file.file_name().map(|n| n.to_os_string());
        let watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Any => {
                        let hit = event
                            .paths
                            .iter()
                            .any(|p| p.file_name().map(|n| n.to_os_string()) == name);
                        if hit {
                            let _ = tx.send(());
                        }
                    }
                    _ => {}
                }
            }
        });
        match watcher {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(dir.as_path(), RecursiveMode::NonRecursive) {
                    log::warn!("config watch on {} failed: {}", dir.display(), e);
                    return;
                }
                log::debug!("watching {}", file.display());
                loop {
                    std::thread::sleep(std::time::Duration::from_secs(3600));
                }
            }
            Err(e) => log::warn!("config watcher unavailable: {}", e),
        }
    });
    rx
}

impl<R: Renderer, I: InputSource, U: UiHooks> App<R, I, U> {
    /// Reload `path` whenever `rx` fires. Changes land at the start of a frame.
    pub fn set_config_source(&mut self, path: PathBuf, rx: Receiver<()>) {
        self.config_path = Some(path);
        self.config_rx = Some(rx);
    }

    pub fn watch_config(&mut self, path: PathBuf) {
        let rx = spawn_config_watcher(&path);
        self.set_config_source(path, rx);
    }

    pub(crate) fn poll_config_reload(&mut self) {
        let Some(rx) = self.config_rx.as_ref() else {
            return;
        };
        // editors fire several events per save; one reload covers them all
        if rx.try_iter().count() == 0 {
            return;
        }
        let Some(path) = self.config_path.clone() else {
            return;
        };
        match CoreConfig::load_from_path(&path) {
            Ok(cfg) => {
                if cfg != self.config {
                    log::info!("config reloaded from {}", path.display());
                    self.apply_config(cfg);
                }
                self.stats.config_reloads += 1;
            }
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                self.stats.config_rejects += 1;
            }
        }
    }
}
