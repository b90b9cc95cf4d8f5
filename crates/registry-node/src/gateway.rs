//! # Line Gateway
//!
//! One JSON invocation per input line, one JSON response per output line.
//!
//! ```text
//! → {"identity":{"id":"x509::CN=alice::CN=ca","mspId":"Org1MSP","attributes":{"role":"Admin"}},
//!    "function":"GetAllUsers","args":[]}
//! ← {"ok":true,"result":[...]}
//! ← {"ok":false,"error":{"kind":"permission_denied","message":"..."}}
//! ```

use crate::errors::NodeError;
use registry_contract::adapters::{InvocationHandler, StaticClientIdentity};
use registry_contract::domain::rbac::Operation;
use registry_contract::errors::{ContractError, ErrorKind};
use registry_contract::ports::outbound::LedgerState;
use registry_contract::service::RegistryContract;
use registry_telemetry::{record_access_denied, record_outcome, OperationTimer, OUTCOME_OK};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Metric label for lines that name no known function.
const UNKNOWN_OPERATION: &str = "unknown";

/// One invocation read from the input stream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvocationRequest {
    pub identity: StaticClientIdentity,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Error payload of a failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// One response written to the output stream.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvocationResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl InvocationResponse {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(err: &ContractError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.kind().as_str().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Reads invocations, runs them through the contract, writes responses.
pub struct Gateway<L: LedgerState> {
    handler: InvocationHandler<RegistryContract<L>>,
}

impl<L: LedgerState> Gateway<L> {
    pub fn new(handler: InvocationHandler<RegistryContract<L>>) -> Self {
        Self { handler }
    }

    /// Handles one input line. Never fails; errors become error responses.
    pub fn handle_line(&self, line: &str) -> InvocationResponse {
        let request: InvocationRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                record_outcome(UNKNOWN_OPERATION, ErrorKind::InvalidArgument.as_str());
                let err = ContractError::InvalidArgument(format!("malformed request: {e}"));
                warn!(error = %e, "Rejected malformed request line");
                return InvocationResponse::failure(&err);
            }
        };

        let span = info_span!(
            "invocation",
            correlation_id = %Uuid::new_v4(),
            function = %request.function
        );
        let _enter = span.enter();

        let operation = Operation::from_function_name(&request.function)
            .map_or(UNKNOWN_OPERATION, Operation::function_name);
        let _timer = OperationTimer::start(operation);

        match self
            .handler
            .invoke(&request.identity, &request.function, &request.args)
        {
            Ok(result) => {
                record_outcome(operation, OUTCOME_OK);
                debug!("Invocation succeeded");
                InvocationResponse::success(result)
            }
            Err(err) => {
                record_outcome(operation, err.kind().as_str());
                if let Some(reason) = err.denial_label() {
                    record_access_denied(operation, reason);
                }
                info!(kind = %err.kind(), error = %err, "Invocation failed");
                InvocationResponse::failure(&err)
            }
        }
    }

    /// Serves lines until EOF or until `shutdown` resolves.
    ///
    /// A line that is not valid UTF-8 gets an `invalid_argument` response and
    /// the loop continues. Returns the number of responses written.
    pub async fn serve<R, W, S>(
        &self,
        mut reader: R,
        mut writer: W,
        shutdown: S,
    ) -> Result<usize, NodeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut buf = Vec::new();
        let mut handled = 0;
        tokio::pin!(shutdown);

        loop {
            buf.clear();
            let read = tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                debug!("Input stream closed");
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\n', '\r'])),
                Err(e) => Self::reject_undecodable(&e),
            };
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
            handled += 1;
        }

        Ok(handled)
    }

    fn reject_undecodable(e: &std::str::Utf8Error) -> InvocationResponse {
        record_outcome(UNKNOWN_OPERATION, ErrorKind::InvalidArgument.as_str());
        warn!(error = %e, "Rejected request line that is not valid UTF-8");
        InvocationResponse::failure(&ContractError::InvalidArgument(format!(
            "request line is not valid UTF-8: {e}"
        )))
    }
}
