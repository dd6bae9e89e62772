//! Fixed-size worker pool for permutation tasks.
//!
//! The calling thread produces every task input in order and feeds it to
//! the workers through a bounded channel, so the inputs never depend on the
//! number of workers or on scheduling. Each task's outcome lands in the slot
//! of its submission index.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};

use crate::dsc::{DscInfo, Statistic};
use crate::model::{BatchLabels, Matrix};
use crate::perm::outcome::{TaskError, TaskErrorKind};

type Outcome = Result<DscInfo, TaskError>;
type TaskQueue = Arc<Mutex<Receiver<(usize, Matrix)>>>;

pub(crate) fn run_pool<S, G>(
    workers: usize,
    n_tasks: usize,
    labels: &BatchLabels,
    statistic: &S,
    next_matrix: G,
) -> Vec<Outcome>
where
    S: Statistic + ?Sized,
    G: FnMut() -> Matrix,
{
    let n_workers = workers.max(1).min(n_tasks);
    let (task_tx, task_rx) = mpsc::sync_channel::<(usize, Matrix)>(n_workers.max(1));
    let (result_tx, result_rx) = mpsc::channel::<(usize, Outcome)>();

    std::thread::scope(|s| {
        // workers own the queue; once the last one exits, sends fail
        let task_rx: TaskQueue = Arc::new(Mutex::new(task_rx));
        for worker in 0..n_workers {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            s.spawn(move || {
                let mut done = 0usize;
                loop {
                    let task = match task_rx.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    let Ok((index, matrix)) = task else {
                        break;
                    };
                    let outcome = run_task(index, &matrix, labels, statistic);
                    done += 1;
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
                tracing::trace!(worker, tasks = done, "permutation worker finished");
            });
        }
        drop(task_rx);
        drop(result_tx);

        let sent = feed_tasks(&task_tx, n_tasks, next_matrix);
        drop(task_tx);
        if sent < n_tasks {
            tracing::warn!(sent, n_tasks, "permutation workers exited early");
        }
        collect_slots(n_tasks, result_rx.iter())
    })
}

/// Sends up to `n_tasks` matrices in submission order; returns how many
/// were accepted before the queue closed.
fn feed_tasks<G>(
    task_tx: &SyncSender<(usize, Matrix)>,
    n_tasks: usize,
    mut next_matrix: G,
) -> usize
where
    G: FnMut() -> Matrix,
{
    for index in 0..n_tasks {
        if task_tx.send((index, next_matrix())).is_err() {
            return index;
        }
    }
    n_tasks
}

fn collect_slots<I>(n_tasks: usize, received: I) -> Vec<Outcome>
where
    I: IntoIterator<Item = (usize, Outcome)>,
{
    let mut slots: Vec<Option<Outcome>> = (0..n_tasks).map(|_| None).collect();
    for (index, outcome) in received {
        slots[index] = Some(outcome);
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or(Err(TaskError {
                index,
                kind: TaskErrorKind::Lost,
            }))
        })
        .collect()
}

fn run_task<S>(index: usize, matrix: &Matrix, labels: &BatchLabels, statistic: &S) -> Outcome
where
    S: Statistic + ?Sized,
{
    match catch_unwind(AssertUnwindSafe(|| statistic.compute(matrix, labels))) {
        Ok(Ok(info)) => Ok(info),
        Ok(Err(e)) => Err(TaskError {
            index,
            kind: TaskErrorKind::Failed(e.to_string()),
        }),
        Err(payload) => Err(TaskError {
            index,
            kind: TaskErrorKind::Panicked(panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/perm/pool.rs"]
mod tests;
