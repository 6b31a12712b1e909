pub mod debounce;
pub mod event;

use std::path::{Path, PathBuf};

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as tokio_mpsc;
use tokio::task::JoinHandle;

use event::WatchEvent;

/// Handle to a running watcher. Keeps the OS watcher alive (dropping stops watching).
pub struct WatcherHandle {
    _watcher: RecommendedWatcher,
    /// The bridge task forwarding events from the std channel to the tokio channel.
    _bridge_task: JoinHandle<()>,
}

/// Start a recursive watcher on `watch_root`.
///
/// Returns a `WatcherHandle` (must be kept alive) and a tokio mpsc receiver that
/// yields normalised `WatchEvent`s. Paths listed in `ignored` (the engine's own
/// snapshot and log, if configured inside the tree) never produce events.
///
/// Delivery is best-effort: the OS may coalesce or drop notifications. Errors are
/// forwarded as `WatchEvent::Fault` and the watcher is not resubscribed.
pub fn start_watcher(
    watch_root: &Path,
    ignored: Vec<PathBuf>,
) -> anyhow::Result<(WatcherHandle, tokio_mpsc::Receiver<WatchEvent>)> {
    let (std_tx, std_rx) = std::sync::mpsc::channel::<notify::Result<notify::Event>>();

    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = std_tx.send(res);
    })?;
    watcher.watch(watch_root, RecursiveMode::Recursive)?;

    let (tokio_tx, tokio_rx) = tokio_mpsc::channel::<WatchEvent>(256);

    // Bridge: spawn_blocking to receive from std channel, normalise, forward to tokio
    let bridge_task = tokio::task::spawn_blocking(move || {
        while let Ok(result) = std_rx.recv() {
            let events = match result {
                Ok(event) => normalize(event.kind, event.paths),
                Err(err) => vec![WatchEvent::Fault(err.to_string())],
            };
            for event in events {
                if event.path().is_some_and(|p| ignored.iter().any(|i| i == p)) {
                    continue;
                }
                if tokio_tx.blocking_send(event).is_err() {
                    return; // receiver dropped, shutdown
                }
            }
        }
    });

    Ok((
        WatcherHandle {
            _watcher: watcher,
            _bridge_task: bridge_task,
        },
        tokio_rx,
    ))
}

/// Map one raw notify event onto zero or more `WatchEvent`s.
///
/// - create → `Created` per path
/// - data/metadata modification → `Modified` per path
/// - remove → `Deleted` per path
/// - paired rename (`RenameMode::Both`) → `Renamed { from, to }`
/// - rename halves: `From` → `Deleted`, `To` → `Created`
/// - unpaired rename of unknown direction → existence check decides
/// - access and unknown kinds are ignored
pub fn normalize(kind: EventKind, paths: Vec<PathBuf>) -> Vec<WatchEvent> {
    match kind {
        EventKind::Create(_) => paths.into_iter().map(WatchEvent::Created).collect(),
        EventKind::Remove(_) => paths.into_iter().map(WatchEvent::Deleted).collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::Both => {
                let mut it = paths.into_iter();
                match (it.next(), it.next()) {
                    (Some(from), Some(to)) => vec![WatchEvent::Renamed { from, to }],
                    (Some(single), None) => vec![by_existence(single)],
                    _ => Vec::new(),
                }
            }
            RenameMode::From => paths.into_iter().map(WatchEvent::Deleted).collect(),
            RenameMode::To => paths.into_iter().map(WatchEvent::Created).collect(),
            RenameMode::Any | RenameMode::Other => paths.into_iter().map(by_existence).collect(),
        },
        EventKind::Modify(_) => paths.into_iter().map(WatchEvent::Modified).collect(),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

fn by_existence(path: PathBuf) -> WatchEvent {
    if path.exists() {
        WatchEvent::Created(path)
    } else {
        WatchEvent::Deleted(path)
    }
}
