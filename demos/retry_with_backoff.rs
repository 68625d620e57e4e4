//! # Example: retry_with_backoff
//!
//! A task type declares [`RetryPolicy`] and [`ErrorReporting`]. The action fails
//! twice before succeeding, so the retry strategy absorbs both failures and the
//! reporter never sees anything.
//!
//! ## Flow
//! ```text
//! controller.run()
//!   ├─► attempt 1 → Err(Fail "boom #1")
//!   ├─► warn!(attempt=1, delay≈100ms) → sleep
//!   ├─► attempt 2 → Err(Fail "boom #2")
//!   ├─► warn!(attempt=2, delay≈200ms) → sleep
//!   ├─► attempt 3 → Ok
//!   └─► Completed (interceptor not invoked)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example retry_with_backoff
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use taskctl::{
    BackoffPolicy, ErrorReporting, JitterPolicy, LogReporter, LoggerConfig, ProjectConfig,
    RetryPolicy, TaskConfig, TaskContext, TaskController, TaskError, TaskFn, TaskOutput, TaskType,
    logger_init,
};

static ATTEMPTS: AtomicU32 = AtomicU32::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger_init(&LoggerConfig::default())?;

    // 1. Exponential backoff with equal jitter, capped at 1s.
    let backoff = BackoffPolicy {
        first: Duration::from_millis(100),
        max: Duration::from_secs(1),
        factor: 2.0,
        step: Duration::ZERO,
        jitter: JitterPolicy::Equal,
    };

    // 2. Reporting first, retry second: retries run inside interception.
    let flaky = TaskType::builder("flaky")
        .capability(ErrorReporting)
        .capability(RetryPolicy::new(3).with_backoff(backoff))
        .build()?;

    let project = Arc::new(ProjectConfig::default().with_reporter(Arc::new(LogReporter)));

    let action = TaskFn::new(|ctx: TaskContext| async move {
        let n = ATTEMPTS.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[flaky] attempt {} (call #{n})", ctx.attempt());
        if n <= 2 {
            return Err(TaskError::fail(format!("boom #{n}")));
        }
        Ok(TaskOutput::new().with_return("attempts", n))
    });

    // 3. Build and run once.
    let mut controller =
        TaskController::builder(flaky, TaskConfig::default(), project.clone()).build(action)?;
    let values = controller.run().await?;

    println!("return values: {}", serde_json::Value::Object(values));
    println!("reports sent: {}", controller.report_events().len());
    println!("last event: {:?}", project.last_event());
    Ok(())
}
