//! Command dispatch tables

use core_timing::{FiredEvent, TimingEventId};
use core_types::ResultCode;
use ipc::{CommandBuffer, Header, RequestBuilder};

use crate::context::ServiceContext;
use crate::error::HleError;

/// A command handler: service state, execution context, and the
/// command buffer carrying the request in and the reply out
pub type Handler<S> =
    fn(&mut S, &mut ServiceContext<'_>, &mut CommandBuffer) -> Result<(), HleError>;

/// Whether a table row is backed by real behavior.
///
/// `Stub` rows answer with the canonical success code after logging a
/// warning, so guest code that merely probes for a capability proceeds
/// instead of faulting.
pub enum FunctionEntry<S> {
    /// The command is implemented by this handler
    Implemented(Handler<S>),
    /// The command is known but intentionally unimplemented
    Stub,
}

/// One row of a service's dispatch table
pub struct FunctionInfo<S> {
    /// Command identifier from the request header
    pub id: u16,
    /// Handler or stub marker
    pub entry: FunctionEntry<S>,
    /// Human-readable command name; documentation only, never parsed
    pub name: &'static str,
}

/// An HLE service: a protocol state machine driven by a dispatch table.
pub trait HleService {
    /// The port name guests connect to
    fn port_name(&self) -> &'static str;

    /// The service's static dispatch table
    fn functions(&self) -> &'static [FunctionInfo<Self>]
    where
        Self: Sized;

    /// Called when the client end of a session to this service is
    /// destroyed, before the session record is torn down; release any
    /// service-level resources here
    fn client_disconnected(&mut self, _ctx: &mut ServiceContext<'_>) {}

    /// Called when a scheduler event owned by this service fires
    fn timing_event(&mut self, _ctx: &mut ServiceContext<'_>, _fired: FiredEvent) {}

    /// Scheduler events this service registered at construction, used
    /// by the manager to route firings back here
    fn timing_events(&self) -> Vec<TimingEventId> {
        Vec::new()
    }
}

/// Object-safe view of a service, implemented for every [`HleService`].
///
/// This is the seam the manager stores services behind; the blanket
/// impl carries the table-lookup dispatch so services only declare
/// tables and handlers.
pub trait ErasedService {
    /// The port name guests connect to
    fn port_name(&self) -> &'static str;
    /// Dispatches one synchronous request
    fn handle_sync_request(
        &mut self,
        ctx: &mut ServiceContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<(), HleError>;
    /// Peer-disconnect notification
    fn client_disconnected(&mut self, ctx: &mut ServiceContext<'_>);
    /// Scheduler event firing
    fn timing_event(&mut self, ctx: &mut ServiceContext<'_>, fired: FiredEvent);
    /// Scheduler events this service owns
    fn timing_events(&self) -> Vec<TimingEventId>;
}

/// Writes the log-and-succeed reply shared by stubbed and unknown
/// commands.
fn stub_reply(cmd: &mut CommandBuffer, command_id: u16) -> Result<(), HleError> {
    let mut rb = RequestBuilder::new(cmd, command_id, 1, 0);
    rb.push_result(ResultCode::SUCCESS)?;
    Ok(())
}

impl<S: HleService + 'static> ErasedService for S {
    fn port_name(&self) -> &'static str {
        HleService::port_name(self)
    }

    fn handle_sync_request(
        &mut self,
        ctx: &mut ServiceContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<(), HleError> {
        let header = Header::decode(cmd.word(0));
        let row = self
            .functions()
            .iter()
            .find(|info| info.id == header.command_id);
        match row {
            Some(FunctionInfo {
                entry: FunctionEntry::Implemented(handler),
                ..
            }) => handler(self, ctx, cmd),
            Some(FunctionInfo {
                entry: FunctionEntry::Stub,
                name,
                ..
            }) => {
                ctx.logger.warn(
                    HleService::port_name(self),
                    format!("(stubbed) called: {} (0x{:04X})", name, header.command_id),
                );
                stub_reply(cmd, header.command_id)
            }
            None => {
                ctx.logger.error(
                    HleService::port_name(self),
                    format!("unknown command 0x{:04X}", header.command_id),
                );
                stub_reply(cmd, header.command_id)
            }
        }
    }

    fn client_disconnected(&mut self, ctx: &mut ServiceContext<'_>) {
        HleService::client_disconnected(self, ctx);
    }

    fn timing_event(&mut self, ctx: &mut ServiceContext<'_>, fired: FiredEvent) {
        HleService::timing_event(self, ctx, fired);
    }

    fn timing_events(&self) -> Vec<TimingEventId> {
        HleService::timing_events(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_timing::EventScheduler;
    use hle_kernel::Kernel;
    use ipc::RequestParser;
    use services_logger::{LogLevel, Logger};

    struct EchoService {
        calls: u32,
    }

    fn echo(
        service: &mut EchoService,
        _ctx: &mut ServiceContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<(), HleError> {
        let mut rp = RequestParser::new(cmd, 0x01, 1, 0)?;
        let value = rp.pop()?;
        service.calls += 1;
        let mut rb = rp.make_builder(cmd, 2, 0)?;
        rb.push_result(ResultCode::SUCCESS)?;
        rb.push(value)?;
        Ok(())
    }

    const ECHO_FUNCTIONS: &[FunctionInfo<EchoService>] = &[
        FunctionInfo {
            id: 0x01,
            entry: FunctionEntry::Implemented(echo),
            name: "Echo",
        },
        FunctionInfo {
            id: 0x02,
            entry: FunctionEntry::Stub,
            name: "Probe",
        },
    ];

    impl HleService for EchoService {
        fn port_name(&self) -> &'static str {
            "test:echo"
        }

        fn functions(&self) -> &'static [FunctionInfo<Self>] {
            ECHO_FUNCTIONS
        }
    }

    fn dispatch(service: &mut EchoService, cmd: &mut CommandBuffer) -> (Result<(), HleError>, Logger) {
        let mut kernel = Kernel::new();
        let mut scheduler = EventScheduler::new();
        let mut logger = Logger::new();
        let result = {
            let mut ctx = ServiceContext::new(&mut kernel, &mut scheduler, &mut logger);
            service.handle_sync_request(&mut ctx, cmd)
        };
        (result, logger)
    }

    fn request(command_id: u16, normal: u32, payload: &[u32]) -> CommandBuffer {
        let mut cmd = CommandBuffer::new();
        cmd.set_word(0, Header::new(command_id, normal, 0).encode());
        for (i, word) in payload.iter().enumerate() {
            cmd.set_word(1 + i, *word);
        }
        cmd
    }

    #[test]
    fn test_implemented_handler_runs() {
        let mut service = EchoService { calls: 0 };
        let mut cmd = request(0x01, 1, &[0xFEED]);
        let (result, _) = dispatch(&mut service, &mut cmd);
        result.unwrap();
        assert_eq!(service.calls, 1);

        let mut reply = RequestParser::new(&cmd, 0x01, 2, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
        assert_eq!(reply.pop().unwrap(), 0xFEED);
    }

    #[test]
    fn test_stub_logs_warning_and_succeeds() {
        let mut service = EchoService { calls: 0 };
        let mut cmd = request(0x02, 0, &[]);
        let (result, logger) = dispatch(&mut service, &mut cmd);
        result.unwrap();
        assert_eq!(service.calls, 0);

        assert!(logger.has_entry(|e| {
            e.level == LogLevel::Warn && e.message.contains("(stubbed)") && e.message.contains("Probe")
        }));
        let mut reply = RequestParser::new(&cmd, 0x02, 1, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
    }

    #[test]
    fn test_unknown_command_logs_error_and_succeeds() {
        let mut service = EchoService { calls: 0 };
        let mut cmd = request(0x7F, 0, &[]);
        let (result, logger) = dispatch(&mut service, &mut cmd);
        result.unwrap();
        assert!(logger.has_entry(|e| e.level == LogLevel::Error));

        let mut reply = RequestParser::new(&cmd, 0x7F, 1, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
    }

    #[test]
    fn test_malformed_request_aborts_call() {
        let mut service = EchoService { calls: 0 };
        // Declares 3 normal words where the handler expects 1.
        let mut cmd = request(0x01, 3, &[1, 2, 3]);
        let (result, _) = dispatch(&mut service, &mut cmd);
        assert!(matches!(
            result,
            Err(HleError::Ipc(ipc::IpcError::HeaderMismatch { .. }))
        ));
    }
}
