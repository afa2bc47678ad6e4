use bytes::{Buf, BytesMut};
use smfi_common::{decoding::StageCommand, ProtocolError};

use crate::{Config, Dispatcher, Milter, Outcome, SequencePolicy, Stages};

/// Parse one frame, code first.
///
/// # Errors
/// If the frame is not a valid command.
pub fn fuzz_parse(buffer: BytesMut) -> Result<StageCommand, ProtocolError> {
    StageCommand::parse(buffer)
}

struct AllStages;

#[async_trait::async_trait]
impl Milter for AllStages {
    fn stages(&self) -> Stages {
        Stages::all()
    }
}

/// Feed one frame, code first, through a dispatcher accepting any order.
pub async fn fuzz_dispatch(mut buffer: BytesMut) -> Outcome {
    let mut dispatcher = Dispatcher::with_policy(
        AllStages,
        Config::default(),
        SequencePolicy::unrestricted(),
    );
    if buffer.is_empty() {
        return Outcome::Abort;
    }
    let code = buffer.get_u8();
    dispatcher.dispatch(code, buffer).await
}
