//! Line-oriented chat loop.
//!
//! A sent message is answered in the background so the prompt stays usable
//! while the reply is pending; everything else runs to completion before the
//! next line is read.

use crate::command::{Command, HELP_TEXT};
use crate::error::ChatroomError;
use crate::render;

use chatroom_core::error::SessionError;
use chatroom_core::session::{Acknowledgment, Notice, RequestKind, SendOutcome, SessionController};

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::task::{JoinError, JoinHandle};

type PendingSend = JoinHandle<Result<SendOutcome, SessionError>>;

enum Event {
    Line(Option<String>),
    SendFinished(Result<Result<SendOutcome, SessionError>, JoinError>),
}

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<R, W> {
    controller: SessionController,
    lines: Lines<R>,
    output: W,
    pending_send: Option<PendingSend>,
    shown_notice: Option<Notice>,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(controller: SessionController, input: R, output: W) -> Self {
        Self {
            controller,
            lines: input.lines(),
            output,
            pending_send: None,
            shown_notice: None,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read and execute lines until `/quit` or end of input.
    ///
    /// A reply still pending at that point is waited for and shown first.
    pub async fn run(&mut self) -> Result<(), ChatroomError> {
        self.print(HELP_TEXT).await?;

        loop {
            self.show_notice().await?;

            let state = self.controller.snapshot().await;
            self.output
                .write_all(render::prompt(&state).as_bytes())
                .await?;
            self.output.flush().await?;

            let event = match self.pending_send.as_mut() {
                Some(pending) => tokio::select! {
                    biased;
                    joined = pending => Event::SendFinished(joined),
                    line = self.lines.next_line() => Event::Line(line?),
                },
                None => Event::Line(self.lines.next_line().await?),
            };

            let flow = match event {
                Event::SendFinished(joined) => {
                    self.pending_send = None;
                    self.print("").await?;
                    self.show_send_result(joined).await?;
                    Flow::Continue
                }
                Event::Line(None) => Flow::Quit,
                Event::Line(Some(line)) => match Command::parse(&line) {
                    Ok(command) => self.execute(command).await?,
                    Err(e) => {
                        self.print(e.message()).await?;
                        Flow::Continue
                    }
                },
            };

            if let Flow::Quit = flow {
                break;
            }
        }

        if let Some(pending) = self.pending_send.take() {
            debug!("Waiting for pending reply before exit");
            let joined = pending.await;
            self.show_send_result(joined).await?;
            self.show_notice().await?;
        }
        self.output.flush().await?;

        info!("Chat loop finished");
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<Flow, ChatroomError> {
        debug!("Executing {command:?}");

        match command {
            Command::Empty => {}
            Command::Send(text) => self.send(text).await?,
            Command::Models => {
                let state = self.controller.snapshot().await;
                self.print(&render::render_models(state.models())).await?;
            }
            Command::SelectModel(model) => {
                match self.controller.select_model(model.as_deref()).await {
                    Ok(()) => {
                        let state = self.controller.snapshot().await;
                        let selected = state.models().selected().unwrap_or("none");
                        self.print(&format!("Model: {selected}")).await?;
                    }
                    Err(e) => self.report(e).await?,
                }
            }
            Command::Tools => {
                let state = self.controller.snapshot().await;
                self.print(&render::render_tools(state.tools())).await?;
            }
            Command::NewChat => match self.controller.new_chat().await {
                Ok(()) => self.print("Started a new chat").await?,
                Err(e @ SessionError::Busy { .. }) => self.report(e).await?,
                Err(e) => {
                    let reason = render::render_session_error(&e);
                    self.report_fatal(e)?;
                    self.print(&format!("New chat failed, conversation kept: {reason}"))
                        .await?;
                }
            },
            Command::Upload(path) => {
                match self.controller.upload_file(path.as_deref()).await {
                    Ok(Some(acknowledgment)) => self.acknowledge(&acknowledgment).await?,
                    Ok(None) => {}
                    Err(e) => self.report(e).await?,
                }
            }
            Command::Remember(index) => match self.controller.remember_turn_at(index).await {
                Ok(acknowledgment) => self.acknowledge(&acknowledgment).await?,
                Err(e) => self.report(e).await?,
            },
            Command::Toggle { turn, result } => {
                match self.controller.toggle_tool_result(turn, result).await {
                    Ok(_) => {
                        let state = self.controller.snapshot().await;
                        if let Some(chat_turn) = state.transcript().turn(turn) {
                            self.print(&render::render_turn(turn, chat_turn)).await?;
                        }
                    }
                    Err(e) => self.report(e).await?,
                }
            }
            Command::Dismiss => {
                self.controller.dismiss_notice().await?;
                self.shown_notice = None;
            }
            Command::Help => self.print(HELP_TEXT).await?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn send(&mut self, text: String) -> Result<(), ChatroomError> {
        if self.pending_send.is_some() {
            let busy = Acknowledgment::Busy(RequestKind::Send);
            return self.print(&busy.to_string()).await;
        }

        self.controller.set_draft(text).await?;

        let controller = self.controller.clone();
        self.pending_send = Some(tokio::spawn(async move { controller.send_message().await }));

        Ok(())
    }

    async fn show_send_result(
        &mut self,
        joined: Result<Result<SendOutcome, SessionError>, JoinError>,
    ) -> Result<(), ChatroomError> {
        let outcome = joined.map_err(|e| ChatroomError::Chatroom {
            message: format!("Send task failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        match outcome {
            Ok(SendOutcome::Sent) => {
                let state = self.controller.snapshot().await;
                let transcript = state.transcript();
                if let Some(turn) = transcript.last() {
                    let rendered = render::render_turn(transcript.len() - 1, turn);
                    self.print(&rendered).await?;
                }
            }
            // Failure shows up as a notice.
            Ok(SendOutcome::Failed | SendOutcome::EmptyDraft | SendOutcome::Busy) => {}
            Err(e) => self.report(e).await?,
        }

        Ok(())
    }

    /// Show a blocking message and wait for Enter.
    async fn acknowledge(&mut self, acknowledgment: &Acknowledgment) -> Result<(), ChatroomError> {
        self.print(&render::render_acknowledgment(acknowledgment))
            .await?;
        self.output
            .write_all(render::CONTINUE_PROMPT.as_bytes())
            .await?;
        self.output.flush().await?;

        // End of input counts as confirmation.
        self.lines.next_line().await?;
        self.print("").await
    }

    async fn show_notice(&mut self) -> Result<(), ChatroomError> {
        let notice = self.controller.snapshot().await.notice();
        if notice != self.shown_notice {
            if let Some(notice) = notice {
                self.print(&render::render_notice(notice)).await?;
            }
            self.shown_notice = notice;
        }
        Ok(())
    }

    async fn report(&mut self, error: SessionError) -> Result<(), ChatroomError> {
        let text = render::render_session_error(&error);
        self.report_fatal(error)?;
        self.print(&text).await
    }

    /// A dead session store ends the loop; every other error is shown and survived.
    fn report_fatal(&self, error: SessionError) -> Result<(), ChatroomError> {
        match error {
            SessionError::Store(_) => Err(ChatroomError::from(error)),
            _ => Ok(()),
        }
    }

    async fn print(&mut self, text: &str) -> Result<(), ChatroomError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        Ok(())
    }
}
