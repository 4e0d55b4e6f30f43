use async_trait::async_trait;
use serde_json::Value;

use crate::{errors::RpcError, methods::RpcMethod, rpc::envelope::Params};

/// Returns the first positional parameter unchanged.
#[derive(Debug, Default)]
pub struct Echo;

#[async_trait]
impl RpcMethod for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn call(&self, params: Params) -> Result<Value, RpcError> {
        match params {
            Params::Positional(values) => values.into_iter().next().ok_or_else(|| {
                RpcError::invalid_params("echo expects at least one positional parameter")
            }),
            Params::Named(_) => Err(RpcError::invalid_params(
                "echo expects positional parameters",
            )),
        }
    }
}
