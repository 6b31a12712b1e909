use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::watcher::debounce::PathDebouncer;
use crate::watcher::event::WatchEvent;
use crate::watcher::start_watcher;

use super::TwinEngine;

/// Watch the engine's root until Ctrl-C.
///
/// Notifications are funnelled into one queue drained by a single worker, so
/// the pipeline sees events in arrival order. `Modified` events first pass
/// through a per-path settle timer and join the queue when it fires. On
/// shutdown the queue is closed and the worker finishes what was already
/// queued, including timers still settling.
pub async fn run(engine: Arc<TwinEngine>, settle: Duration) -> anyhow::Result<()> {
    let paths = engine.paths().clone();
    let ignored = vec![paths.snapshot_file.clone(), paths.log_file.clone()];
    let (_handle, mut rx) = start_watcher(&paths.watch_root, ignored)?;
    let debouncer = PathDebouncer::new(settle);
    let (queue, pending) = mpsc::unbounded_channel();
    let worker = spawn_worker(Arc::clone(&engine), pending);

    tracing::info!(root = %paths.watch_root.display(), "watching");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => dispatch(&debouncer, &queue, event),
                None => {
                    tracing::warn!("watcher channel closed");
                    break;
                }
            },
            _ = &mut shutdown => {
                tracing::info!(pending = debouncer.pending(), "shutdown requested");
                break;
            }
        }
    }

    drop(queue);
    if let Err(err) = worker.await {
        tracing::error!(%err, "event worker aborted");
    }
    Ok(())
}

/// Route one notification: `Modified` waits for its settle timer, everything
/// else is queued immediately.
fn dispatch(debouncer: &PathDebouncer, queue: &UnboundedSender<WatchEvent>, event: WatchEvent) {
    match event {
        WatchEvent::Modified(path) => {
            let queue = queue.clone();
            debouncer.schedule(path, move |path| {
                if queue.send(WatchEvent::Modified(path)).is_err() {
                    tracing::debug!("event queue closed before settle timer fired");
                }
            });
        }
        other => {
            if queue.send(other).is_err() {
                tracing::debug!("event queue closed");
            }
        }
    }
}

/// Drain the queue one event at a time. The next event is not taken until the
/// previous one has left the pipeline.
fn spawn_worker(engine: Arc<TwinEngine>, mut queue: UnboundedReceiver<WatchEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = queue.recv().await {
            let engine = Arc::clone(&engine);
            let result = tokio::task::spawn_blocking(move || {
                let outcome = engine.process(&event);
                tracing::debug!(?event, ?outcome, "event processed");
            })
            .await;
            if let Err(err) = result {
                tracing::error!(%err, "event processing panicked");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TwinConfig, TwinPaths};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_dispatch_keeps_arrival_order() {
        let debouncer = PathDebouncer::new(Duration::from_millis(20));
        let (queue, mut pending) = mpsc::unbounded_channel();
        let a = PathBuf::from("/w/a.txt");

        dispatch(&debouncer, &queue, WatchEvent::Deleted(a.clone()));
        dispatch(&debouncer, &queue, WatchEvent::Modified(a.clone()));
        dispatch(&debouncer, &queue, WatchEvent::Modified(a.clone()));
        dispatch(&debouncer, &queue, WatchEvent::Created(a.clone()));
        drop(queue);

        let mut seen = Vec::new();
        while let Some(event) = pending.recv().await {
            seen.push(event);
        }
        // The burst of modifications settles into one event behind the immediate ones.
        assert_eq!(
            seen,
            vec![
                WatchEvent::Deleted(a.clone()),
                WatchEvent::Created(a.clone()),
                WatchEvent::Modified(a),
            ]
        );
        assert_eq!(debouncer.pending(), 0);
    }

    #[tokio::test]
    async fn test_worker_applies_delete_then_recreate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = TwinPaths::resolve(&dir.path().join("ModelData"), &TwinConfig::default());
        let engine = Arc::new(TwinEngine::open(paths).unwrap());
        let file = engine.paths().watch_root.join("cycle.txt");
        std::fs::write(&file, b"v1").unwrap();

        let (queue, pending) = mpsc::unbounded_channel();
        let worker = spawn_worker(Arc::clone(&engine), pending);
        queue.send(WatchEvent::Created(file.clone())).unwrap();
        for _ in 0..50 {
            queue.send(WatchEvent::Deleted(file.clone())).unwrap();
            queue.send(WatchEvent::Created(file.clone())).unwrap();
        }
        drop(queue);
        worker.await.unwrap();

        let record = engine.lookup(&file).expect("file is modelled");
        assert!(!record.is_deleted, "recreated file must end live");
        assert_eq!(engine.processed_events(), 101);
    }
}
