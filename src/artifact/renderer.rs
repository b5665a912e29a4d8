//! Document renderer collaborator
//!
//! A [`Renderer`] opens a [`RenderSession`]; the session converts one page
//! URL into a document file and must be torn down after use, whether the
//! conversion succeeded or not. [`render_document`] enforces that pairing.

use crate::config::RendererConfig;
use crate::RenderError;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Factory for render sessions
#[async_trait]
pub trait Renderer: Send + Sync + fmt::Debug {
    /// Acquires the rendering resource
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// One acquired rendering resource
#[async_trait]
pub trait RenderSession: Send {
    /// Renders `url` into a document at `output`
    async fn render_to_document(&mut self, url: &str, output: &Path) -> Result<(), RenderError>;

    /// Releases the resource; the session is unusable afterwards
    async fn teardown(&mut self);
}

/// Starts a session, renders one document and always tears the session down
pub async fn render_document(
    renderer: &dyn Renderer,
    url: &str,
    output: &Path,
) -> Result<(), RenderError> {
    let mut session = renderer.start().await?;
    let result = session.render_to_document(url, output).await;
    session.teardown().await;
    result
}

/// Renderer backed by an external HTML-to-document program
///
/// `{url}` and `{output}` in the argument list are substituted per call.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout())
    }

    fn command_args(&self, url: &str, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace("{url}", url).replace("{output}", &output))
            .collect()
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(CommandSession {
            renderer: self.clone(),
            child: None,
            closed: false,
        }))
    }
}

struct CommandSession {
    renderer: CommandRenderer,
    child: Option<Child>,
    closed: bool,
}

#[async_trait]
impl RenderSession for CommandSession {
    async fn render_to_document(&mut self, url: &str, output: &Path) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Closed);
        }

        let program = &self.renderer.program;
        tracing::debug!("Rendering {} with {}", url, program);

        let child = Command::new(program)
            .args(self.renderer.command_args(url, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;
        let child = self.child.insert(child);

        let status = match self.renderer.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                // The still-running child is killed by teardown
                Err(_) => return Err(RenderError::Timeout(limit)),
            },
            None => child.wait().await,
        };
        self.child = None;

        let status = status.map_err(|source| RenderError::Spawn {
            program: program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(RenderError::Failed {
                status: status.to_string(),
            });
        }

        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(RenderError::MissingOutput(output.display().to_string())),
        }
    }

    async fn teardown(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to stop renderer process: {}", e);
            }
        }
        self.closed = true;
    }
}
