use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use farm_client::HttpAdvisorServiceFactory;
use farm_core::service::ServiceRegistry;
use farm_core::view::present;
use farm_core::wizard::RawResults;
use farm_core::{FieldName, ResultAggregator, SubmissionTicket, Transition, Wizard};

use crate::commands::{self, Command, HELP};
use crate::config::Settings;
use crate::render::{render, render_options};

/// Registry with every backend this binary ships.
pub fn build_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register(Box::new(HttpAdvisorServiceFactory));
    registry
}

/// Builds the aggregator for the configured backend.
pub async fn connect(settings: &Settings) -> Result<ResultAggregator> {
    let service = build_registry()
        .create(&settings.service)
        .await
        .with_context(|| format!("cannot use backend '{}'", settings.service.backend))?;
    Ok(ResultAggregator::new(service).with_text_model(settings.service.text_model.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive wizard session writing its screens to `out`.
pub struct Session<W> {
    wizard: Wizard,
    aggregator: ResultAggregator,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        aggregator: ResultAggregator,
        out: W,
    ) -> Self {
        Self {
            wizard: Wizard::new(),
            aggregator,
            out,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn show(&mut self) -> Result<()> {
        let screen = render(&present(&self.wizard.snapshot()));
        writeln!(self.out, "{screen}")?;
        Ok(())
    }

    /// Parses and runs one input line. Parse errors are reported to the user
    /// and do not end the session.
    pub async fn handle_line(
        &mut self,
        line: &str,
    ) -> Result<Flow> {
        match commands::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(err) => {
                debug!(input = line, error = %err, "rejected command");
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn handle(
        &mut self,
        command: Command,
    ) -> Result<Flow> {
        match command {
            Command::Set { field, value } => self.set(field, value)?,
            Command::Next => self.next().await?,
            Command::Back => {
                if self.wizard.prev() == Transition::Stayed {
                    writeln!(self.out, "Already at the first step.")?;
                } else {
                    self.show()?;
                }
            }
            Command::Reset => {
                self.wizard.reset();
                self.show()?;
            }
            Command::Show => self.show()?,
            Command::Options(field) => self.options(field)?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn set(
        &mut self,
        field: FieldName,
        value: String,
    ) -> Result<()> {
        let current = self.wizard.step();
        if current.is_results() {
            writeln!(self.out, "The plan is complete; type 'reset' to start a new one.")?;
            return Ok(());
        }
        if !current.required_fields().contains(&field) {
            // Values on other steps are kept but not shown until that step.
            writeln!(self.out, "Note: {} belongs to another step.", field.label())?;
        }
        if let Some(options) = field.options() {
            if !value.is_empty() && !options.contains(&value.as_str()) {
                writeln!(self.out, "Note: '{value}' is not one of the listed options.")?;
            }
        }
        self.wizard.set_field(field, value);
        self.show()
    }

    fn options(
        &mut self,
        field: Option<FieldName>,
    ) -> Result<()> {
        let fields: Vec<FieldName> = match field {
            Some(field) => vec![field],
            None => FieldName::ALL.into_iter().filter(|f| f.options().is_some()).collect(),
        };
        for field in fields {
            match render_options(field) {
                Some(text) => writeln!(self.out, "{text}")?,
                None => writeln!(self.out, "{} takes a number.", field.label())?,
            }
        }
        Ok(())
    }

    async fn next(&mut self) -> Result<()> {
        match self.wizard.next() {
            Transition::Submitting(ticket) => self.submit(ticket).await,
            Transition::Stayed if self.wizard.step().is_results() => {
                writeln!(self.out, "Analysis complete; type 'reset' to start a new plan.")?;
                Ok(())
            }
            _ => self.show(),
        }
    }

    /// Runs the submission stage by stage so progress is visible between
    /// the prediction and summary calls.
    async fn submit(
        &mut self,
        ticket: SubmissionTicket,
    ) -> Result<()> {
        self.show()?;
        self.out.flush()?;

        let outcome = self
            .aggregator
            .fetch_raw(ticket.yield_request(), ticket.fertilizer_request())
            .await;
        if !self.wizard.apply_raw(&ticket, &outcome) {
            debug!(generation = ticket.generation(), "submission superseded");
            return self.show();
        }

        if let Ok(raw) = &outcome {
            self.show()?;
            self.out.flush()?;

            let summaries = self
                .aggregator
                .summarize(ticket.form(), &RawResults::from(raw))
                .await;
            self.wizard.apply_summaries(&ticket, summaries);
        }

        info!(step = self.wizard.step().number(), "analysis finished");
        self.show()
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub async fn run<R, W>(
    aggregator: ResultAggregator,
    input: R,
    out: W,
) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new(aggregator, out);
    writeln!(session.out, "Smart Farm Advisor. Type 'help' for commands.\n")?;
    session.show()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if session.handle_line(&line).await? == Flow::Quit {
            break;
        }
    }
    info!("session ended");
    Ok(session.into_output())
}
