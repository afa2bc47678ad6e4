//! A milter that prints callback arguments and macros for each stage.

use std::env;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::EnvFilter;

use smfi_common::{
    commands::{Body, Connect, Header, Helo, Mail, Recipient, Unknown},
    decoding::Stage,
    encoding::Writable,
    macros::MacroStage,
    optneg::{Capability, Protocol},
};
use smfi_server::{Config, Dispatcher, Milter, NegotiateReply, SessionContext, Stages, Status};

struct PrintMilter;

fn print_macros(ctx: &SessionContext, stage: MacroStage) {
    for pair in ctx.macros().get(stage).unwrap_or_default().chunks_exact(2) {
        println!(
            "  macro - {}:{}",
            String::from_utf8_lossy(&pair[0]),
            String::from_utf8_lossy(&pair[1])
        );
    }
}

#[async_trait]
impl Milter for PrintMilter {
    fn stages(&self) -> Stages {
        Stages::all()
    }

    async fn negotiate(
        &mut self,
        _ctx: &SessionContext,
        actions: Capability,
        protocol: Protocol,
    ) -> NegotiateReply {
        println!("\n======== NEGOTIATE ========");
        println!("  actions offered: {actions:?}");
        println!("  protocol offered: {protocol:?}");
        NegotiateReply::Replace {
            actions: Capability::empty(),
            protocol: protocol & (Protocol::SKIP | Protocol::HDR_LEADSPC),
        }
    }

    async fn connect(&mut self, ctx: &SessionContext, connect_info: Connect) -> Status {
        println!("\n======== CONNECT ========");
        println!("  hostname: {}", connect_info.hostname());
        println!(
            "  socket_info: {}:{:?}",
            connect_info.address(),
            connect_info.port
        );
        println!("  family: {:?}", connect_info.family);
        print_macros(ctx, MacroStage::Connect);
        Status::Continue
    }

    async fn helo(&mut self, ctx: &SessionContext, helo: Helo) -> Status {
        println!("\n======== HELO ========");
        println!("  hostname: {}", helo.helo());
        print_macros(ctx, MacroStage::Helo);
        Status::Continue
    }

    async fn mail(&mut self, ctx: &SessionContext, mail: Mail) -> Status {
        println!("\n======== MAIL ========");
        println!("  sender: {}", mail.sender());
        for arg in mail.esmtp_args() {
            println!("  esmtp_args: {arg}");
        }
        print_macros(ctx, MacroStage::MailFrom);
        Status::Continue
    }

    async fn rcpt(&mut self, ctx: &SessionContext, recipient: Recipient) -> Status {
        println!("\n======== RCPT ========");
        println!("  recipient: {:?}", recipient.recipient());
        for arg in recipient.esmtp_args() {
            println!("  esmtp_args: {arg}");
        }
        print_macros(ctx, MacroStage::RcptTo);
        Status::Continue
    }

    async fn data(&mut self, ctx: &SessionContext) -> Status {
        println!("\n======== DATA ========");
        print_macros(ctx, MacroStage::Data);
        Status::Continue
    }

    async fn header(&mut self, _ctx: &SessionContext, header: Header) -> Status {
        println!("\n======== HEADER ========");
        println!("  name: {}", header.name());
        println!("  value: {}", header.value());
        Status::Continue
    }

    async fn end_of_header(&mut self, ctx: &SessionContext) -> Status {
        println!("\n======== EOH ========");
        print_macros(ctx, MacroStage::EndOfHeaders);
        Status::Continue
    }

    async fn body(&mut self, _ctx: &SessionContext, body: Body) -> Status {
        println!("\n======== BODY ========");
        println!("  body part: {}", String::from_utf8_lossy(body.as_bytes()));
        Status::Continue
    }

    async fn end_of_body(&mut self, ctx: &SessionContext) -> Status {
        println!("\n======== END OF BODY ========");
        print_macros(ctx, MacroStage::EndOfBody);
        if let Some(queue_id) = ctx.symbol("i") {
            println!("  queue id: {}", String::from_utf8_lossy(queue_id));
        }
        Status::Continue
    }

    async fn unknown(&mut self, _ctx: &SessionContext, cmd: Unknown) -> Status {
        println!("\n======== UNKNOWN ========");
        println!("  Raw: {}", String::from_utf8_lossy(cmd.as_bytes()));
        Status::Continue
    }

    async fn abort(&mut self, _ctx: &SessionContext) -> Status {
        println!("\n======== ABORT ========");
        Status::NoReply
    }

    async fn close(&mut self, _ctx: &SessionContext) {
        println!("\n======== QUIT ========");
    }
}

/// Read length prefixed frames, dispatch them and write back the replies.
async fn handle_connection(mut stream: TcpStream) -> std::io::Result<()> {
    let mut dispatcher = Dispatcher::new(PrintMilter, Config::new("print"));

    loop {
        let len = stream.read_u32().await? as usize;
        let mut frame = BytesMut::zeroed(len);
        stream.read_exact(&mut frame).await?;
        if frame.is_empty() {
            return Ok(());
        }

        let code = frame.get_u8();
        let outcome = dispatcher.dispatch(code, frame).await;

        let reply = Stage::from_code(code).and_then(|s| outcome.reply(s, dispatcher.context()));
        if let Some(reply) = reply {
            let mut buffer = BytesMut::with_capacity(reply.len() + 5);
            buffer.extend_from_slice(&(reply.len() as u32 + 1).to_be_bytes());
            buffer.extend_from_slice(&[reply.code()]);
            reply.write(&mut buffer);
            stream.write_all(&buffer).await?;
        }

        if outcome.is_terminal() {
            if let Some(error) = dispatcher.last_error() {
                println!("  closing after error: {error}");
            }
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr = env::var("LISTEN_ADDR").unwrap_or("0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to addr");
    println!("\n======== Bound to socket ========");

    loop {
        println!();
        println!("=========================================");
        println!("======== Awaiting new connection ========");
        let (stream, _socket_addr) = listener
            .accept()
            .await
            .expect("Failed accepting connection");
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream).await {
                println!("  connection ended: {e}");
            }
        });
    }
}
