//! Sequential, tree-shaped stage execution
//!
//! A [`Pipeline`] is a list of [`Stage`]s, each optionally carrying a key the
//! [`StageExecutor`] acts on, and optionally holding child stages. Stages run
//! depth-first in declaration order: a parent's own work runs first, then its
//! children, and the next sibling starts only once the whole subtree is done.
//! The first failure aborts the run.

pub mod context;
pub mod reporter;

use crate::error::Result;
use tracing::debug;

pub use context::ExecutionContext;
pub use reporter::{ConsoleReporter, Reporter, SilentReporter};

/// One named unit of work
#[derive(Debug, Clone)]
pub struct Stage<K> {
    title: String,
    key: Option<K>,
    children: Vec<Stage<K>>,
}

impl<K> Stage<K> {
    /// A leaf stage that runs `key`
    pub fn task(title: impl Into<String>, key: K) -> Self {
        Self {
            title: title.into(),
            key: Some(key),
            children: Vec::new(),
        }
    }

    /// A stage that only groups its children
    pub fn group(title: impl Into<String>, children: Vec<Stage<K>>) -> Self {
        Self {
            title: title.into(),
            key: None,
            children,
        }
    }

    /// A stage with its own work followed by its children
    pub fn with_children(title: impl Into<String>, key: K, children: Vec<Stage<K>>) -> Self {
        Self {
            title: title.into(),
            key: Some(key),
            children,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn children(&self) -> &[Stage<K>] {
        &self.children
    }
}

/// Performs the work behind a stage key
#[allow(async_fn_in_trait)]
pub trait StageExecutor<K> {
    async fn execute(
        &self,
        key: &K,
        ctx: &mut ExecutionContext,
        reporter: &dyn Reporter,
    ) -> Result<()>;
}

enum Step<'a, K> {
    Enter(&'a Stage<K>, usize),
    Leave(&'a Stage<K>, usize),
}

/// Ordered top-level stages
#[derive(Debug, Clone)]
pub struct Pipeline<K> {
    stages: Vec<Stage<K>>,
}

impl<K> Pipeline<K> {
    pub fn new(stages: Vec<Stage<K>>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage<K>] {
        &self.stages
    }

    /// Run every stage in order, stopping at the first error
    pub async fn run<E>(
        &self,
        executor: &E,
        ctx: &mut ExecutionContext,
        reporter: &dyn Reporter,
    ) -> Result<()>
    where
        E: StageExecutor<K>,
    {
        let mut pending: Vec<Step<'_, K>> =
            self.stages.iter().rev().map(|stage| Step::Enter(stage, 0)).collect();
        // Stages entered but not yet left; index equals depth
        let mut open: Vec<&Stage<K>> = Vec::new();

        while let Some(step) = pending.pop() {
            match step {
                Step::Enter(stage, depth) => {
                    debug!(stage = stage.title(), depth, "entering stage");
                    reporter.stage_started(stage.title(), depth);
                    open.push(stage);

                    if let Some(key) = stage.key() {
                        if let Err(e) = executor.execute(key, ctx, reporter).await {
                            debug!(stage = stage.title(), error = %e, "stage failed");
                            for (depth, open_stage) in open.iter().enumerate().rev() {
                                reporter.stage_failed(open_stage.title(), depth);
                            }
                            return Err(e);
                        }
                    }

                    pending.push(Step::Leave(stage, depth));
                    for child in stage.children().iter().rev() {
                        pending.push(Step::Enter(child, depth + 1));
                    }
                }
                Step::Leave(stage, depth) => {
                    open.pop();
                    reporter.stage_completed(stage.title(), depth);
                }
            }
        }

        Ok(())
    }
}
