//! # Example: deploy_task
//!
//! A custom [`Task`] that needs an org, reads options resolved from the project and
//! org contexts, and waits on a simulated remote job with a [`Poller`].
//!
//! The second run of the same controller shows that controllers are single-use.
//!
//! ## Run
//! ```bash
//! cargo run --example deploy_task
//! ```

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::json;
use taskctl::{
    BuildError, ErrorReporting, LogReporter, LoggerConfig, OptionSpec, OrgConfig, PollPolicy,
    PollStatus, ProjectConfig, Task, TaskConfig, TaskContext, TaskController, TaskError,
    TaskOutput, TaskType, logger_init,
};

/// Pretends to deploy a directory and waits for the job to finish.
struct Deploy {
    job_id: Option<String>,
}

#[async_trait]
impl Task for Deploy {
    fn init_task(&mut self, ctx: &TaskContext) -> Result<(), TaskError> {
        let path = ctx
            .options()
            .get_str("path")
            .ok_or_else(|| TaskError::fatal("path must be a string"))?;
        self.job_id = Some(format!("job-{}", path.replace('/', "-")));
        Ok(())
    }

    async fn run_task(&mut self, ctx: &TaskContext) -> Result<TaskOutput, TaskError> {
        let job_id = self.job_id.clone().unwrap_or_default();
        println!("[deploy] started {job_id}");

        let status = ctx
            .poller()
            .poll(|n| async move {
                println!("[deploy] poll #{n}");
                if n < 4 {
                    Ok(PollStatus::Pending)
                } else {
                    Ok(PollStatus::Complete("Succeeded"))
                }
            })
            .await?;

        Ok(TaskOutput::new()
            .with_result(status)
            .with_return("job_id", job_id)
            .with_return("api_version", ctx.option("api_version").cloned()))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger_init(&LoggerConfig {
        task_spans: true,
        ..LoggerConfig::default()
    })?;

    let deploy = TaskType::builder("deploy")
        .option(OptionSpec::required("path", "Directory to deploy"))
        .option(OptionSpec::optional("api_version", "Metadata API version"))
        .option(OptionSpec::optional("user", "Deploying user"))
        .requires_org(true)
        .capability(ErrorReporting)
        .poll(PollPolicy {
            first: Duration::from_millis(50),
            step: Duration::from_millis(50),
            every: 2,
            max_polls: Some(10),
        })
        .build()?;

    let project = Arc::new(
        ProjectConfig::new(json!({ "package": { "api_version": "59.0" } }))
            .with_reporter(Arc::new(LogReporter)),
    );
    let org = Arc::new(OrgConfig::new("dev@example.com", "00D000000000001"));

    let config = TaskConfig::default()
        .option("api_version", "$project_config.package.api_version")
        .option("user", "$org_config.username");

    // Without an org the controller refuses to build.
    let missing = TaskController::builder(deploy.clone(), config.clone(), project.clone())
        .override_option("path", "src")
        .build(Deploy { job_id: None });
    if let Err(e @ BuildError::MissingCredentials { .. }) = missing {
        println!("expected: {e}");
    }

    let mut controller = TaskController::builder(deploy, config, project)
        .org(org)
        .override_option("path", "force-app/main")
        .build(Deploy { job_id: None })?;
    println!("resolved options: {:?}", controller.options());

    let values = controller.run().await?;
    println!("result: {:?}", controller.result());
    println!("return values: {}", serde_json::Value::Object(values));

    match controller.run().await {
        Err(e) => println!("second run: {e}"),
        Ok(_) => println!("second run unexpectedly succeeded"),
    }
    Ok(())
}
