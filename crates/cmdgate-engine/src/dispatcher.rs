//! Queue consumer: drain, parse, route, execute, record
//!
//! A cycle takes a snapshot of the queue (clearing it), executes every
//! command in order and appends one execution record per command. Failures
//! of individual commands become `FAILED` records and never stop the batch;
//! only an unwritable execution log aborts a cycle, and then the command
//! whose record was lost and everything after it go back to the queue head.
//!
//! [`Dispatcher::run`] repeats cycles on a poll interval until shutdown is
//! signalled or a restart is requested.

#![allow(clippy::result_large_err)]

use cmdgate_core::errors::{ExError, ExErrorKind};
use cmdgate_core::{
    log_op_end, log_op_error, log_op_start, log_outcome, EffectRegistry, ExecutionOutcome,
    Instruction, RestartSignal,
};
use cmdgate_core_types::CycleId;
use cmdgate_store::{ExecutionLog, QueueStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Command name of process-level log records
pub const SYSTEM_COMMAND: &str = "SYSTEM";
pub const SYSTEM_ERROR_COMMAND: &str = "SYSTEM_ERROR";

/// What one drain cycle did
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub outcomes: Vec<ExecutionOutcome>,
    pub restart_requested: bool,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Why [`Dispatcher::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// Shutdown was signalled (or a single pass was requested)
    Stopped,
    /// A `RESTART_SYSTEM` command ran; the supervisor should restart
    RestartRequested,
}

/// Loop timing for [`Dispatcher::run`]
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub poll_interval: Duration,
    pub restart_delay: Duration,
    /// Run exactly one cycle, then stop
    pub once: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            restart_delay: Duration::from_secs(3),
            once: false,
        }
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    queue: Arc<QueueStore>,
    registry: EffectRegistry,
    log: Arc<ExecutionLog>,
    restart: RestartSignal,
    command_delay: Duration,
    executions: AtomicU64,
}

impl Dispatcher {
    pub fn new(
        queue: Arc<QueueStore>,
        registry: EffectRegistry,
        log: Arc<ExecutionLog>,
        restart: RestartSignal,
    ) -> Self {
        Self {
            queue,
            registry,
            log,
            restart,
            command_delay: Duration::ZERO,
            executions: AtomicU64::new(0),
        }
    }

    /// Pause after each executed command
    pub fn with_command_delay(mut self, delay: Duration) -> Self {
        self.command_delay = delay;
        self
    }

    /// Commands executed since this dispatcher was created
    pub fn execution_count(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn restart_signal(&self) -> &RestartSignal {
        &self.restart
    }

    /// Parse, route and run one raw command
    pub fn execute(&self, command: &str) -> ExecutionOutcome {
        let instruction = match Instruction::parse(command) {
            Ok(instruction) => instruction,
            Err(err) => return ExecutionOutcome::failed(command, err.to_string()),
        };

        match self.registry.execute(&instruction.route()) {
            Ok(result) => ExecutionOutcome::succeeded(command, result),
            Err(err) => ExecutionOutcome::failed(command, err.to_string()),
        }
    }

    /// Drain the queue once and execute everything in it
    ///
    /// # Errors
    ///
    /// Returns the store error if an outcome cannot be appended to the
    /// execution log. The unrecorded command and the ones after it are
    /// requeued at the head and run again on a later cycle.
    pub fn run_cycle(&self) -> Result<CycleReport, ExError> {
        let cycle_id = CycleId::new();
        let commands = self.queue.snapshot_and_clear();
        if commands.is_empty() {
            return Ok(CycleReport {
                cycle_id,
                outcomes: Vec::new(),
                restart_requested: false,
            });
        }

        let start = Instant::now();
        log_op_start!(
            "dispatch_cycle",
            cycle_id = %cycle_id,
            queue_len = commands.len()
        );

        let mut outcomes = Vec::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            let outcome = self.execute(command);
            log_outcome!(&outcome);

            if let Err(err) = self.log.append(&outcome) {
                let unrecorded = &commands[index..];
                if let Err(requeue_err) = self.queue.requeue_front(unrecorded) {
                    tracing::error!(
                        cycle_id = %cycle_id,
                        lost = unrecorded.len(),
                        error = %requeue_err,
                        "could not return unrecorded commands to the queue"
                    );
                }
                log_op_error!(
                    "dispatch_cycle",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    cycle_id = %cycle_id,
                    requeued = unrecorded.len()
                );
                return Err(err);
            }
            self.executions.fetch_add(1, Ordering::SeqCst);
            outcomes.push(outcome);

            if !self.command_delay.is_zero() {
                thread::sleep(self.command_delay);
            }
        }

        log_op_end!(
            "dispatch_cycle",
            duration_ms = start.elapsed().as_millis() as u64,
            cycle_id = %cycle_id,
            execution_count = self.execution_count()
        );

        Ok(CycleReport {
            cycle_id,
            outcomes,
            restart_requested: self.restart.is_requested(),
        })
    }

    /// Poll the queue until shutdown or restart
    ///
    /// Each cycle runs on the blocking pool. Shutdown is observed between
    /// cycles, so an in-flight cycle always finishes writing its records.
    /// Only a shutdown signal leaves a `SYSTEM` "Gateway stopped" record; a
    /// single pass or a dropped sender ends the loop silently.
    ///
    /// # Errors
    ///
    /// Returns an error when a cycle fails at the process level (execution
    /// log unwritable, worker panic). A `SYSTEM_ERROR` record is attempted
    /// first.
    pub async fn run(
        self: Arc<Self>,
        options: RunOptions,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<RunExit, ExError> {
        tracing::info!(
            queue = %self.queue.path().display(),
            log = %self.log.path().display(),
            poll_interval_ms = options.poll_interval.as_millis() as u64,
            "dispatcher started"
        );

        let mut interrupted = false;
        loop {
            if *shutdown.borrow() {
                interrupted = true;
                break;
            }

            let this = Arc::clone(&self);
            let cycle = tokio::task::spawn_blocking(move || this.run_cycle()).await;
            let report = match cycle {
                Ok(Ok(report)) => report,
                Ok(Err(err)) => return Err(self.fail(err)),
                Err(join_err) => {
                    let err = ExError::new(ExErrorKind::Internal)
                        .with_op("dispatch_cycle")
                        .with_message(format!("dispatcher worker failed: {}", join_err));
                    return Err(self.fail(err));
                }
            };

            if report.restart_requested {
                self.restart.take();
                tracing::info!(
                    delay_ms = options.restart_delay.as_millis() as u64,
                    "restart requested, waiting before handing over"
                );
                tokio::time::sleep(options.restart_delay).await;
                log_op_end!(
                    "restart_system",
                    duration_ms = options.restart_delay.as_millis() as u64,
                    execution_count = self.execution_count()
                );
                return Ok(RunExit::RestartRequested);
            }

            if options.once {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(options.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if interrupted {
            if let Err(err) = self.log.append_system(SYSTEM_COMMAND, true, "Gateway stopped") {
                tracing::warn!(error = %err, "could not record dispatcher stop");
            }
        }
        tracing::info!(
            execution_count = self.execution_count(),
            "dispatcher stopped"
        );
        Ok(RunExit::Stopped)
    }

    fn fail(&self, err: ExError) -> ExError {
        tracing::error!(error = %err, "dispatcher stopping on process-level failure");
        if let Err(log_err) = self
            .log
            .append_system(SYSTEM_ERROR_COMMAND, false, &err.to_string())
        {
            tracing::error!(error = %log_err, "could not record dispatcher failure");
        }
        err
    }
}
