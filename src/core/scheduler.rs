// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Task scheduler for timed operations

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct ScheduledTask {
    enabled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs named periodic tasks on the tokio runtime.
///
/// The period is re-read before every sleep so it can follow runtime
/// settings. A tick that has started always runs to completion.
pub struct Scheduler {
    tasks: Mutex<HashMap<String, ScheduledTask>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            tasks: Mutex::new(HashMap::new()),
            shutdown_tx,
        }
    }

    /// Spawn a periodic task. Must be called from inside a tokio runtime.
    /// A task with the same name is replaced.
    pub fn add_task<P, F>(&self, name: &str, period: P, mut task: F)
    where
        P: Fn() -> Duration + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        let enabled = Arc::new(AtomicBool::new(true));
        let flag = enabled.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        let task_name = name.to_string();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(period()) => {
                        if flag.load(Ordering::Acquire) {
                            task();
                        }
                    }
                    _ = shutdown.recv() => {
                        debug!("Task '{}' shutting down", task_name);
                        break;
                    }
                }
            }
        });

        let previous = self.tasks.lock().insert(
            name.to_string(),
            ScheduledTask { enabled, handle },
        );
        if let Some(old) = previous {
            warn!("Replacing scheduled task '{}'", name);
            old.handle.abort();
        }
        debug!("Scheduled task '{}'", name);
    }

    pub fn remove_task(&self, name: &str) {
        if let Some(task) = self.tasks.lock().remove(name) {
            task.handle.abort();
        }
    }

    pub fn enable_task(&self, name: &str, enabled: bool) {
        if let Some(task) = self.tasks.lock().get(name) {
            task.enabled.store(enabled, Ordering::Release);
        }
    }

    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Signal every task to stop and wait for them to finish.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        let tasks: Vec<(String, ScheduledTask)> = self.tasks.lock().drain().collect();
        for (name, task) in tasks {
            if let Err(e) = task.handle.await {
                if !e.is_cancelled() {
                    warn!("Task '{}' ended abnormally: {}", name, e);
                }
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().values() {
            task.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_periodic_task_runs() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        scheduler.add_task("tick", || Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(count.load(Ordering::SeqCst), 10);

        scheduler.shutdown().await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 10);
        assert!(scheduler.task_names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_task_stops_only_that_task() {
        let scheduler = Scheduler::new();
        let kept = Arc::new(AtomicUsize::new(0));
        let removed = Arc::new(AtomicUsize::new(0));
        let (k, r) = (kept.clone(), removed.clone());
        scheduler.add_task("kept", || Duration::from_millis(100), move || {
            k.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.add_task("removed", || Duration::from_millis(100), move || {
            r.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        scheduler.remove_task("removed");
        scheduler.remove_task("missing");
        assert_eq!(scheduler.task_names(), vec!["kept".to_string()]);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(removed.load(Ordering::SeqCst), 2);
        assert_eq!(kept.load(Ordering::SeqCst), 7);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_task_skips() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        scheduler.add_task("tick", || Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.enable_task("tick", false);

        tokio::time::sleep(Duration::from_millis(550)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.enable_task("tick", true);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
        scheduler.shutdown().await;
    }
}
