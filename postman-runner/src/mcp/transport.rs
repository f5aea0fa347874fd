//! In-memory client scripts that stand in for stdio when
//! `POSTMAN_RUNNER_MCP_TEST_TRANSPORT` is set.

use futures::sink::{self, Drain};
use futures::stream::{self, Iter};
use rmcp::model::{
    ClientJsonRpcMessage, ClientNotification, ClientRequest, InitializeRequest,
    InitializeRequestParam, InitializedNotification, NumberOrString,
};
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::RoleServer;

/// Server replies go nowhere; client messages come from a fixed list.
pub(super) type ScriptedTransport = (
    Drain<TxJsonRpcMessage<RoleServer>>,
    Iter<std::vec::IntoIter<RxJsonRpcMessage<RoleServer>>>,
);

/// What the scripted client does before hanging up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ClientScript {
    /// Initialize, acknowledge, disconnect.
    Handshake,
    /// Disconnect before initializing.
    HangUp,
}

impl ClientScript {
    pub(super) fn transport(self) -> ScriptedTransport {
        (sink::drain(), stream::iter(self.messages()))
    }

    fn messages(self) -> Vec<RxJsonRpcMessage<RoleServer>> {
        match self {
            ClientScript::Handshake => vec![
                ClientJsonRpcMessage::request(
                    ClientRequest::InitializeRequest(InitializeRequest::new(
                        InitializeRequestParam::default(),
                    )),
                    NumberOrString::Number(1),
                ),
                ClientJsonRpcMessage::notification(ClientNotification::InitializedNotification(
                    InitializedNotification::default(),
                )),
            ],
            ClientScript::HangUp => Vec::new(),
        }
    }
}
